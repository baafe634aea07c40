use acl_policy::format::to_source;
use anyhow::{Context, Result};

use super::Input;
use crate::errors::render_diagnostics;

/// Handle `aclcheck fmt`.
pub fn run(input: &Input) -> Result<()> {
    let name = input.display_name();
    let parsed = input.parse()?;
    let warnings = parsed.diagnostics.clone();

    let document = parsed
        .into_result(name.clone())
        .with_context(|| format!("cannot format {name}"))?;

    eprint!("{}", render_diagnostics(&warnings));
    print!("{}", to_source(&document));
    Ok(())
}
