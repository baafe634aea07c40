//! Syntax loader: policy source text → generic block tree.
//!
//! The tree knows nothing about policies. It records attributes, blocks
//! (with their header keyword and labels) and literal expressions, each
//! with the source range it came from. Schema enforcement lives in
//! [`content`], typed decoding in [`crate::decode`].

mod content;
mod expr;
mod parser;

use std::path::Path;
use std::sync::Arc;

use tracing::{Level, instrument};

pub use content::BodyContent;
pub use expr::Expression;

use crate::diagnostic::{Diagnostic, Diagnostics, Range};

/// A parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    pub name: Arc<str>,
    pub body: Body,
}

/// The contents of a file or of a block between its braces.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub items: Vec<Item>,
    pub range: Range,
    /// Where a missing required item is reported: the opening brace of a
    /// block body, or the start of the file for the root body.
    pub missing_item_range: Range,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Attribute(Attribute),
    Block(Block),
}

/// `name = expression`
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: Ident,
    pub expr: Expression,
    pub range: Range,
}

/// `type label* { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub ident: Ident,
    pub labels: Vec<Label>,
    pub open_brace_range: Range,
    pub body: Body,
    pub range: Range,
}

impl Block {
    pub fn type_name(&self) -> &str {
        &self.ident.name
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub range: Range,
}

/// A block header label, either quoted (`"web"`) or bare (`web`).
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub value: String,
    pub range: Range,
}

/// Read and parse the file at `path`.
///
/// The file name recorded in every range is `path` exactly as given. A file
/// that cannot be read yields a single diagnostic and no tree.
#[instrument(level = Level::TRACE)]
pub fn load(path: &Path) -> (Option<File>, Diagnostics) {
    let name: Arc<str> = Arc::from(path.to_string_lossy().as_ref());
    match std::fs::read_to_string(path) {
        Ok(source) => parse_source(name, &source),
        Err(e) => {
            let diag = Diagnostic::error(
                Range::file_start(name.clone()),
                "Failed to read file",
                format!("The configuration file {:?} could not be read: {}.", &*name, e),
            );
            (None, diag.into())
        }
    }
}

/// Parse in-memory source text that claims to come from `name`.
#[instrument(level = Level::TRACE, skip(source))]
pub fn parse_source(name: impl Into<Arc<str>> + std::fmt::Debug, source: &str) -> (Option<File>, Diagnostics) {
    let name = name.into();
    match parser::parse_file(name.clone(), source) {
        Ok(body) => (Some(File { name, body }), Diagnostics::new()),
        Err(diag) => (None, diag.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> File {
        let (file, diags) = parse_source("test.hcl", source);
        assert!(diags.is_empty(), "unexpected diagnostics: {diags}");
        file.unwrap()
    }

    fn parse_err(source: &str) -> Diagnostic {
        let (file, diags) = parse_source("test.hcl", source);
        assert!(file.is_none());
        assert_eq!(diags.len(), 1);
        diags.into_iter().next().unwrap()
    }

    fn only_block(body: &Body) -> &Block {
        match body.items.as_slice() {
            [Item::Block(b)] => b,
            other => panic!("expected one block, got {other:?}"),
        }
    }

    #[test]
    fn parse_empty_file() {
        assert!(parse_ok("").body.items.is_empty());
        assert!(parse_ok("  \n# just a comment\n// another\n").body.items.is_empty());
    }

    #[test]
    fn parse_nested_blocks() {
        let file = parse_ok(
            r#"
policy {
  acl = "read"
  node "test" { policy = "write" }
}
"#,
        );
        let policy = only_block(&file.body);
        assert_eq!(policy.type_name(), "policy");
        assert!(policy.labels.is_empty());
        assert_eq!(policy.body.items.len(), 2);

        let Item::Attribute(acl) = &policy.body.items[0] else {
            panic!("expected attribute");
        };
        assert_eq!(acl.name.name, "acl");
        assert_eq!(acl.expr, Expression::String("read".into(), acl.expr.range().clone()));

        let Item::Block(node) = &policy.body.items[1] else {
            panic!("expected block");
        };
        assert_eq!(node.type_name(), "node");
        assert_eq!(node.labels.len(), 1);
        assert_eq!(node.labels[0].value, "test");
    }

    #[test]
    fn ident_ranges_are_one_based_and_end_exclusive() {
        let file = parse_ok("policy {\n  yolo {\n  }\n}\n");
        let policy = only_block(&file.body);
        let yolo = only_block(&policy.body);
        assert_eq!(yolo.ident.range.to_string(), "test.hcl:2,3-7");
        assert_eq!(policy.open_brace_range.to_string(), "test.hcl:1,8-9");
        assert_eq!(policy.range.to_string(), "test.hcl:1,1-4,2");
    }

    #[test]
    fn columns_count_characters() {
        let file = parse_ok("policy { acl = \"é\" }\nnode \"x\" {}\n");
        let Item::Block(node) = &file.body.items[1] else {
            panic!("expected block");
        };
        assert_eq!(node.ident.range.start.column, 1);
        assert_eq!(node.ident.range.start.line, 2);
    }

    #[test]
    fn bare_and_quoted_labels() {
        let file = parse_ok("node web \"db\" {}");
        let node = only_block(&file.body);
        let labels: Vec<_> = node.labels.iter().map(|l| l.value.as_str()).collect();
        assert_eq!(labels, ["web", "db"]);
    }

    #[test]
    fn block_comments_and_hash_comments() {
        let file = parse_ok("/* header\n spanning lines */\npolicy { # trailing\n acl = \"deny\" // more\n}");
        let policy = only_block(&file.body);
        assert_eq!(policy.body.items.len(), 1);
    }

    #[test]
    fn string_escapes() {
        let file = parse_ok(r#"a = "say \"hi\"\n\tAB""#);
        let Item::Attribute(attr) = &file.body.items[0] else {
            panic!("expected attribute");
        };
        assert_eq!(attr.expr.as_literal_str(), Some("say \"hi\"\n\tAB"));
    }

    #[test]
    fn literal_expressions() {
        let file = parse_ok("a = 12\nb = true\nc = null\nd = [\"x\", 1]\ne = read\n");
        let kinds: Vec<_> = file
            .body
            .items
            .iter()
            .map(|item| match item {
                Item::Attribute(a) => a.expr.type_name(),
                Item::Block(_) => "block",
            })
            .collect();
        assert_eq!(kinds, ["number", "bool", "null", "tuple", "variable"]);
    }

    #[test]
    fn keyword_prefix_is_a_variable() {
        let file = parse_ok("a = trueish");
        let Item::Attribute(attr) = &file.body.items[0] else {
            panic!("expected attribute");
        };
        assert_eq!(attr.expr.type_name(), "variable");
    }

    #[test]
    fn error_unclosed_block() {
        let diag = parse_err("policy {\n  acl = \"read\"\n");
        assert_eq!(diag.summary, "Invalid syntax");
        assert!(diag.detail.contains("closing brace"), "{}", diag.detail);
        assert_eq!(diag.subject.start.line, 3);
    }

    #[test]
    fn error_unterminated_string() {
        let diag = parse_err("policy {\n  acl = \"read\n}\n");
        assert_eq!(diag.summary, "Invalid syntax");
        assert_eq!(diag.subject.start.line, 2);
    }

    #[test]
    fn error_stray_token() {
        let diag = parse_err("policy { acl = \"read\" } }");
        assert!(diag.detail.contains("end of file"), "{}", diag.detail);
        assert_eq!(diag.subject.to_string(), "test.hcl:1,25-26");
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.hcl");
        let (file, diags) = load(&path);
        assert!(file.is_none());
        assert_eq!(diags.len(), 1);
        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.summary, "Failed to read file");
        assert_eq!(diag.subject.start.line, 1);
        assert_eq!(diag.subject.start.column, 1);
        assert!(diag.to_string().starts_with(&format!("{}:1,1-1: ", path.display())));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("acl.hcl");
        std::fs::write(&path, "policy { acl = \"read\" }\n").unwrap();
        let (file, diags) = load(&path);
        assert!(diags.is_empty());
        let file = file.unwrap();
        assert_eq!(&*file.name, path.to_string_lossy().as_ref());
    }
}
