//! Error type for callers that want a `Result` instead of diagnostics.

use crate::diagnostic::Diagnostics;

/// A policy file that could not be decoded into a document.
#[derive(Debug, thiserror::Error)]
#[error("invalid policy file {file}: {} error(s)", .diagnostics.errors().count())]
pub struct PolicyError {
    pub file: String,
    /// Everything reported while decoding, warnings included.
    pub diagnostics: Diagnostics,
}

impl PolicyError {
    /// Return a help message suggesting how to fix the first error, if any
    /// diagnostic carries one.
    pub fn help(&self) -> Option<String> {
        self.diagnostics.errors().find_map(|d| d.hint.clone())
    }
}
