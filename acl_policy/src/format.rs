//! Canonical source printer for policy documents.
//!
//! Output parses back to an equal [`PolicyDocument`]. Rule names are
//! written as header labels; `intentions` appears only when set.

use std::fmt::{self, Write};

use crate::document::{NodeRule, PolicyDocument, ServiceRule};
use crate::schema::{INTENTIONS_ATTR, POLICY_ATTR, POLICY_BLOCK, RuleKind};

/// Render `doc` in the block dialect.
pub fn to_source(doc: &PolicyDocument) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_document(&mut out, doc);
    out
}

fn write_document(out: &mut String, doc: &PolicyDocument) -> fmt::Result {
    writeln!(out, "{POLICY_BLOCK} {{")?;
    writeln!(out, "  acl = {}", quote(&doc.default_acl))?;

    write_nodes(out, RuleKind::Node, &doc.nodes)?;
    write_nodes(out, RuleKind::NodePrefix, &doc.node_prefixes)?;
    write_services(out, RuleKind::Service, &doc.services)?;
    write_services(out, RuleKind::ServicePrefix, &doc.service_prefixes)?;

    writeln!(out, "}}")
}

fn write_nodes(out: &mut String, kind: RuleKind, rules: &[NodeRule]) -> fmt::Result {
    for rule in rules {
        writeln!(out)?;
        writeln!(out, "  {} {} {{", kind.keyword(), quote(&rule.name))?;
        writeln!(out, "    {POLICY_ATTR} = {}", quote(&rule.policy))?;
        writeln!(out, "  }}")?;
    }
    Ok(())
}

fn write_services(out: &mut String, kind: RuleKind, rules: &[ServiceRule]) -> fmt::Result {
    for rule in rules {
        writeln!(out)?;
        writeln!(out, "  {} {} {{", kind.keyword(), quote(&rule.name))?;
        match &rule.intentions {
            Some(intentions) => {
                writeln!(out, "    {POLICY_ATTR}     = {}", quote(&rule.policy))?;
                writeln!(out, "    {INTENTIONS_ATTR} = {}", quote(intentions))?;
            }
            None => writeln!(out, "    {POLICY_ATTR} = {}", quote(&rule.policy))?,
        }
        writeln!(out, "  }}")?;
    }
    Ok(())
}

/// Quote `s` as a string literal the loader reads back verbatim.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::parse_str;

    fn sample() -> PolicyDocument {
        PolicyDocument {
            default_acl: "read".into(),
            nodes: vec![NodeRule {
                name: "test".into(),
                policy: "write".into(),
            }],
            node_prefixes: vec![NodeRule {
                name: "".into(),
                policy: "deny".into(),
            }],
            services: vec![ServiceRule {
                name: "Database".into(),
                policy: "write".into(),
                intentions: Some("deny".into()),
            }],
            service_prefixes: vec![ServiceRule {
                name: "API \"v2\"\\".into(),
                policy: "read".into(),
                intentions: None,
            }],
        }
    }

    #[test]
    fn prints_canonical_layout() {
        let doc = PolicyDocument {
            default_acl: "deny".into(),
            nodes: vec![NodeRule {
                name: "web".into(),
                policy: "write".into(),
            }],
            ..Default::default()
        };
        assert_eq!(
            to_source(&doc),
            "policy {\n  acl = \"deny\"\n\n  node \"web\" {\n    policy = \"write\"\n  }\n}\n"
        );
    }

    #[test]
    fn printed_source_parses_back_equal() {
        let doc = sample();
        let parsed = parse_str("printed.hcl", &to_source(&doc));
        assert!(parsed.diagnostics.is_empty(), "{}", parsed.diagnostics);
        assert_eq!(parsed.document, Some(doc));
    }

    #[test]
    fn quoting_escapes_specials() {
        assert_eq!(quote("a\"b"), r#""a\"b""#);
        assert_eq!(quote("tab\there"), r#""tab\there""#);
        assert_eq!(quote("\u{1}"), r#""\u0001""#);
    }
}
