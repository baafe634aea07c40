//! TTY-aware color and styling helpers for human-friendly CLI output.
//!
//! Built on the [`console`] crate which automatically detects whether
//! stdout/stderr is a terminal and respects the `NO_COLOR` environment
//! variable (<https://no-color.org/>).

use console::Style;

/// A `Style` targeting **stdout** (auto-detects TTY + NO_COLOR).
fn out() -> Style {
    Style::new()
}

/// A `Style` targeting **stderr** (auto-detects TTY + NO_COLOR).
fn err() -> Style {
    Style::new().for_stderr()
}

/// Turn colors off for both streams regardless of terminal detection.
pub fn disable_colors() {
    console::set_colors_enabled(false);
    console::set_colors_enabled_stderr(false);
}

// ---------------------------------------------------------------------------
// stdout
// ---------------------------------------------------------------------------

/// Bold text (for headers/titles).
pub fn bold(text: &str) -> String {
    out().bold().apply_to(text).to_string()
}

/// Dim / muted text (for secondary information).
pub fn dim(text: &str) -> String {
    out().dim().apply_to(text).to_string()
}

/// Bold cyan (section headers).
pub fn header(text: &str) -> String {
    out().cyan().bold().apply_to(text).to_string()
}

/// Cyan (for labels, tags).
pub fn cyan(text: &str) -> String {
    out().cyan().apply_to(text).to_string()
}

/// Magenta (for type names).
pub fn magenta(text: &str) -> String {
    out().magenta().apply_to(text).to_string()
}

/// Yellow (required markers).
pub fn yellow(text: &str) -> String {
    out().yellow().apply_to(text).to_string()
}

// ---------------------------------------------------------------------------
// stderr
// ---------------------------------------------------------------------------

/// Red (stderr).
pub fn err_red(text: &str) -> String {
    err().red().apply_to(text).to_string()
}

/// Bold red (stderr).
pub fn err_red_bold(text: &str) -> String {
    err().red().bold().apply_to(text).to_string()
}

/// Yellow (stderr).
pub fn err_yellow(text: &str) -> String {
    err().yellow().apply_to(text).to_string()
}

/// Bold cyan (stderr).
pub fn err_cyan_bold(text: &str) -> String {
    err().cyan().bold().apply_to(text).to_string()
}

/// Dim (stderr).
pub fn err_dim(text: &str) -> String {
    err().dim().apply_to(text).to_string()
}
