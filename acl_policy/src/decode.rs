//! Schema-directed decoding: block tree → [`PolicyDocument`].
//!
//! Failures come in three tiers:
//! - structural: no `policy` block, or `acl` missing or not text. No
//!   document is returned.
//! - per block: an unknown child block or a malformed rule body. The block
//!   is skipped and its siblings are still decoded.
//! - per attribute: an optional attribute that is not text. It is treated
//!   as absent.
//!
//! Nothing here logs; every problem is returned as a [`Diagnostic`].

use std::path::Path;

use tracing::{Level, instrument};

use crate::diagnostic::{Diagnostic, Diagnostics};
use crate::document::{PolicyDocument, RuleFields};
use crate::error::PolicyError;
use crate::schema::{
    ACL_ATTR, INTENTIONS_ATTR, NAME_ATTR, POLICY_ATTR, POLICY_BLOCK, POLICY_BODY, RuleKind,
    TOP_LEVEL,
};
use crate::syntax::{self, Attribute, Block, BodyContent, File};

/// Outcome of parsing one policy file.
///
/// A document may come back together with diagnostics when parts of the
/// file were skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub document: Option<PolicyDocument>,
    pub diagnostics: Diagnostics,
}

impl Parsed {
    fn failed(diagnostics: Diagnostics) -> Self {
        Self {
            document: None,
            diagnostics,
        }
    }

    /// Accept the document only if no error was reported.
    pub fn into_result(self, file: impl Into<String>) -> Result<PolicyDocument, PolicyError> {
        match self.document {
            Some(doc) if !self.diagnostics.has_errors() => Ok(doc),
            _ => Err(PolicyError {
                file: file.into(),
                diagnostics: self.diagnostics,
            }),
        }
    }
}

/// Read and decode the policy file at `path`.
#[instrument(level = Level::TRACE, skip(path))]
pub fn parse(path: impl AsRef<Path>) -> Parsed {
    let (file, diagnostics) = syntax::load(path.as_ref());
    finish(file, diagnostics)
}

/// Decode policy source held in memory; `name` is used in diagnostics.
#[instrument(level = Level::TRACE, skip(source))]
pub fn parse_str(name: &str, source: &str) -> Parsed {
    let (file, diagnostics) = syntax::parse_source(name, source);
    finish(file, diagnostics)
}

fn finish(file: Option<File>, mut diagnostics: Diagnostics) -> Parsed {
    match file {
        Some(file) if !diagnostics.has_errors() => {
            let parsed = decode_file(&file);
            diagnostics.extend(parsed.diagnostics);
            Parsed {
                document: parsed.document,
                diagnostics,
            }
        }
        _ => Parsed::failed(diagnostics),
    }
}

/// Decode an already parsed file.
pub fn decode_file(file: &File) -> Parsed {
    let mut diags = Diagnostics::new();

    let (root, root_diags) = file.body.content(&TOP_LEVEL);
    diags.extend(root_diags);

    let Some((policy, extras)) = root.blocks.split_first() else {
        diags.push(Diagnostic::error(
            file.body.missing_item_range.clone(),
            "Missing policy block",
            format!("A {POLICY_BLOCK:?} block is required."),
        ));
        diags.sort_by_position();
        return Parsed::failed(diags);
    };

    let (content, body_diags) = policy.body.content(&POLICY_BODY);
    diags.extend(body_diags);

    // A missing `acl` was already reported by the schema check.
    let acl = content
        .attribute(ACL_ATTR)
        .and_then(|attr| decode_text(attr, &mut diags));

    let mut document = PolicyDocument::new(acl.clone().unwrap_or_default());
    for block in &content.blocks {
        // The policy schema only admits rule keywords.
        let Some(kind) = RuleKind::from_keyword(block.type_name()) else {
            continue;
        };
        if let Some(fields) = decode_rule(kind, block, &mut diags) {
            document.push_rule(kind, fields);
        }
    }

    for extra in extras {
        diags.push(Diagnostic::warning(
            extra.ident.range.clone(),
            "Duplicate policy block",
            format!(
                "Only the first {POLICY_BLOCK:?} block, at {}, is used; this one is ignored.",
                policy.ident.range
            ),
        ));
    }

    // The body checks and the rule checks are separate passes over the
    // same text; report their findings in reading order.
    diags.sort_by_position();

    Parsed {
        document: acl.map(|_| document),
        diagnostics: diags,
    }
}

/// Decode one rule block. Returns `None` when the rule must be skipped.
fn decode_rule(kind: RuleKind, block: &Block, diags: &mut Diagnostics) -> Option<RuleFields> {
    let (content, body_diags) = block.body.content(kind.body_schema());
    let malformed = body_diags.has_errors();
    diags.extend(body_diags);

    // The `name` attribute wins over the header label.
    let name = optional_text(&content, NAME_ATTR, diags)
        .or_else(|| block.labels.first().map(|label| label.value.clone()))
        .unwrap_or_default();

    let policy_attr = content.attribute(POLICY_ATTR);
    let policy = policy_attr.and_then(|attr| decode_text(attr, diags));

    let intentions = if kind.is_service() {
        optional_text(&content, INTENTIONS_ATTR, diags)
    } else {
        None
    };

    let (policy, attr) = (policy?, policy_attr?);
    if policy.is_empty() {
        diags.push(Diagnostic::error(
            attr.expr.range().clone(),
            "Invalid policy value",
            format!("The argument {POLICY_ATTR:?} must not be empty."),
        ));
        return None;
    }
    if malformed {
        return None;
    }

    Some(RuleFields {
        name,
        policy,
        intentions,
    })
}

fn optional_text(content: &BodyContent<'_>, name: &str, diags: &mut Diagnostics) -> Option<String> {
    content
        .attribute(name)
        .and_then(|attr| decode_text(attr, diags))
}

fn decode_text(attr: &Attribute, diags: &mut Diagnostics) -> Option<String> {
    match attr.expr.decode_string() {
        Ok(value) => Some(value),
        Err(diag) => {
            diags.push(diag);
            None
        }
    }
}
