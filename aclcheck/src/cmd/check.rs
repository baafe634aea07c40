use std::fmt::{Display, Write as _};
use std::process::ExitCode;

use acl_policy::{Diagnostics, PolicyDocument};
use anyhow::Result;
use serde::Serialize;
use tracing::{Level, instrument, warn};

use super::Input;
use crate::errors::render_diagnostics;
use crate::style;

/// Handle `aclcheck check`.
#[instrument(level = Level::TRACE)]
pub fn run(input: &Input, json: bool) -> Result<ExitCode> {
    let parsed = input.parse()?;

    if json {
        let report = Report {
            file: input.display_name(),
            ok: !parsed.diagnostics.has_errors(),
            document: parsed.document.as_ref(),
            diagnostics: &parsed.diagnostics,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(exit_code(report.ok));
    }

    let document = match parsed.document {
        Some(doc) if !parsed.diagnostics.has_errors() => doc,
        _ => {
            warn!(
                input = %input.display_name(),
                errors = parsed.diagnostics.errors().count(),
                "policy file rejected"
            );
            eprintln!("{}", style::err_red_bold("error parsing file:"));
            eprint!("{}", render_diagnostics(&parsed.diagnostics));
            return Ok(ExitCode::FAILURE);
        }
    };

    eprint!("{}", render_diagnostics(&parsed.diagnostics));
    print!("{}", render_document(&document));
    Ok(ExitCode::SUCCESS)
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Machine-readable result of `check --json`.
#[derive(Debug, Serialize)]
struct Report<'a> {
    file: String,
    ok: bool,
    document: Option<&'a PolicyDocument>,
    diagnostics: &'a Diagnostics,
}

/// Human-readable dump of a decoded document. Empty categories are omitted.
pub fn render_document(doc: &PolicyDocument) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", style::header("PARSED CONFIG"));
    let _ = writeln!(
        out,
        "{} {}",
        style::dim("default acl:"),
        style::bold(&doc.default_acl)
    );
    if !doc.has_rules() {
        let _ = writeln!(out, "{}", style::dim("(no rules)"));
        return out;
    }
    section(&mut out, "node policies", &doc.nodes);
    section(&mut out, "node prefix policies", &doc.node_prefixes);
    section(&mut out, "service policies", &doc.services);
    section(&mut out, "service prefix policies", &doc.service_prefixes);
    out
}

fn section(out: &mut String, title: &str, rules: &[impl Display]) {
    if rules.is_empty() {
        return;
    }
    let _ = writeln!(out, "{}", style::bold(&format!("** {title} **")));
    for rule in rules {
        let _ = writeln!(out, "{rule}");
    }
}
