pub mod check;
pub mod fmt;
pub mod schema;

use std::io::Read;
use std::path::{Path, PathBuf};

use acl_policy::Parsed;
use anyhow::{Context, Result};
use tracing::{Level, debug, instrument};

use crate::settings::Settings;

/// Name used in diagnostics for policy text read from stdin.
pub const STDIN_NAME: &str = "<stdin>";

/// Where the policy text for a command comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    /// Resolve the command-line argument, falling back to the configured
    /// default file.
    pub fn resolve(arg: Option<PathBuf>, settings: &Settings) -> Self {
        match arg {
            Some(path) if path == Path::new("-") => Input::Stdin,
            Some(path) => Input::File(path),
            None => Input::File(settings.default_file.clone()),
        }
    }

    /// The file name used in diagnostics and error messages.
    pub fn display_name(&self) -> String {
        match self {
            Input::Stdin => STDIN_NAME.to_string(),
            Input::File(path) => path.display().to_string(),
        }
    }

    /// Parse the input. Unreadable files surface as diagnostics, not errors;
    /// only a failure to read stdin is an error.
    #[instrument(level = Level::TRACE)]
    pub fn parse(&self) -> Result<Parsed> {
        let parsed = match self {
            Input::File(path) => acl_policy::parse(path),
            Input::Stdin => {
                let mut source = String::new();
                std::io::stdin()
                    .read_to_string(&mut source)
                    .context("failed to read policy from stdin")?;
                acl_policy::parse_str(STDIN_NAME, &source)
            }
        };
        debug!(
            input = %self.display_name(),
            diagnostics = parsed.diagnostics.len(),
            decoded = parsed.document.is_some(),
            "parsed policy"
        );
        Ok(parsed)
    }
}
