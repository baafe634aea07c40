//! User-facing error display.
//!
//! Formats anyhow errors with causal chains, colored output, and the
//! diagnostics and hints carried by policy errors.

use std::io::Write;

use acl_policy::{Diagnostic, Diagnostics, PolicyError};

use crate::style;

/// Display a user-facing error to stderr with optional verbose output.
///
/// Format:
///   error: top-level message
///     caused by: chain item 1
///
///   <diagnostics, one per line, if a policy error is in the chain>
///
///   hint: actionable suggestion (if available)
pub fn display_error(err: &anyhow::Error, verbose: bool) {
    let mut stderr = std::io::stderr().lock();

    let _ = writeln!(stderr, "{}: {}", style::err_red_bold("error"), err);

    let chain: Vec<_> = err.chain().skip(1).collect();
    if chain.len() == 1 {
        let _ = writeln!(
            stderr,
            "  {}",
            style::err_dim(&format!("caused by: {}", chain[0]))
        );
    } else {
        for (i, cause) in chain.iter().enumerate() {
            let _ = writeln!(
                stderr,
                "  {}",
                style::err_dim(&format!("{}: {}", i + 1, cause))
            );
        }
    }

    let policy_err = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<PolicyError>());

    if let Some(policy_err) = policy_err {
        let _ = writeln!(stderr);
        let _ = write!(stderr, "{}", render_diagnostics(&policy_err.diagnostics));
        if let Some(hint) = policy_err.help() {
            let _ = writeln!(stderr, "\n  {}: {}", style::err_cyan_bold("hint"), hint);
        }
    }

    if verbose {
        let _ = writeln!(stderr, "\nFull error chain:\n{:?}", err);
    } else if !chain.is_empty() && policy_err.is_none() {
        let _ = writeln!(
            stderr,
            "\n  {}",
            style::err_dim("run with --verbose for full details")
        );
    }
}

/// One line per diagnostic in its canonical rendering, colored by severity.
pub fn render_diagnostics(diags: &Diagnostics) -> String {
    diags
        .iter()
        .map(|d| format!("{}\n", render_diagnostic(d)))
        .collect()
}

fn render_diagnostic(diag: &Diagnostic) -> String {
    let text = diag.to_string();
    if diag.is_error() {
        style::err_red(&text)
    } else {
        style::err_yellow(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_one_line_per_diagnostic() {
        style::disable_colors();
        let parsed = acl_policy::parse_str(
            "acl.hcl",
            "policy {\n  acl = \"read\"\n  yolo {}\n}\npolicy { acl = \"x\" }\n",
        );
        assert_eq!(
            render_diagnostics(&parsed.diagnostics),
            "acl.hcl:3,3-7: Unsupported block type; Blocks of type \"yolo\" are not expected here.\n\
             acl.hcl:5,1-7: Duplicate policy block; Only the first \"policy\" block, at acl.hcl:1,1-7, is used; this one is ignored.\n"
        );
    }
}
