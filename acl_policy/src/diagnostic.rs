//! Positioned diagnostics for policy files.
//!
//! Every problem the loader or the decoder finds is reported as a
//! [`Diagnostic`] value. Rendering follows the form
//! `<file>:<line>,<col>-<endCol>: <summary>; <detail>[ <hint>]`.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// A position in a source file. `line` and `column` are 1-based; `column`
/// counts characters, `byte` is the 0-based byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
    pub byte: usize,
}

impl Pos {
    /// The first position of any file.
    pub const START: Pos = Pos {
        line: 1,
        column: 1,
        byte: 0,
    };
}

/// A half-open source range within a named file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    pub filename: Arc<str>,
    pub start: Pos,
    pub end: Pos,
}

impl Range {
    pub fn new(filename: Arc<str>, start: Pos, end: Pos) -> Self {
        Self {
            filename,
            start,
            end,
        }
    }

    /// Zero-width range at the very beginning of `filename`.
    pub fn file_start(filename: Arc<str>) -> Self {
        Self::new(filename, Pos::START, Pos::START)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{},{}-{}",
                self.filename, self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(
                f,
                "{}:{},{}-{},{}",
                self.filename, self.start.line, self.start.column, self.end.line, self.end.column
            )
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single problem found in a policy file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    pub subject: Range,
    /// Trailing sentence such as `Did you mean "node_prefix"?`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl Diagnostic {
    pub fn error(subject: Range, summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
            subject,
            hint: None,
        }
    }

    pub fn warning(subject: Range, summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(subject, summary, detail)
        }
    }

    pub fn with_hint(mut self, hint: Option<String>) -> Self {
        self.hint = hint;
        self
    }

    pub fn file(&self) -> &str {
        &self.subject.filename
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}; {}", self.subject, self.summary, self.detail)?;
        if let Some(hint) = &self.hint {
            write!(f, " {hint}")?;
        }
        Ok(())
    }
}

/// An ordered collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diag: Diagnostic) {
        self.0.push(diag);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    pub fn has_errors(&self) -> bool {
        self.0.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| !d.is_error())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Order by start position. Stable, so diagnostics at the same position
    /// keep the order they were reported in.
    pub fn sort_by_position(&mut self) {
        self.0
            .sort_by_key(|d| (d.subject.start.line, d.subject.start.column));
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(diag: Diagnostic) -> Self {
        Self(vec![diag])
    }
}

impl From<Vec<Diagnostic>> for Diagnostics {
    fn from(diags: Vec<Diagnostic>) -> Self {
        Self(diags)
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diag) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{diag}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}

/// Compute Levenshtein edit distance between two strings.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();

    if a.is_empty() {
        return b_len;
    }
    if b_len == 0 {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = if ca == *cb { 0 } else { 1 };
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Find the closest match to `name` among `candidates`.
///
/// Only candidates within an edit distance of 2 are considered; ties go to
/// the candidate listed first.
pub fn suggest_closest<'a>(name: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<String> {
    candidates
        .into_iter()
        .map(|c| (c, levenshtein(name, c)))
        .filter(|(_, dist)| *dist < 3)
        .min_by_key(|(_, dist)| *dist)
        .map(|(c, _)| c.to_string())
}

/// Format a "did you mean" hint for the closest candidate, if any.
pub fn did_you_mean<'a>(name: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<String> {
    suggest_closest(name, candidates).map(|s| format!("Did you mean {s:?}?"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(line: usize, col: usize, end_line: usize, end_col: usize) -> Range {
        Range::new(
            Arc::from("acl.hcl"),
            Pos {
                line,
                column: col,
                byte: 0,
            },
            Pos {
                line: end_line,
                column: end_col,
                byte: 0,
            },
        )
    }

    #[test]
    fn renders_single_line_range() {
        let diag = Diagnostic::error(
            range(3, 3, 3, 7),
            "Unsupported block type",
            "Blocks of type \"yolo\" are not expected here.",
        );
        assert_eq!(
            diag.to_string(),
            "acl.hcl:3,3-7: Unsupported block type; Blocks of type \"yolo\" are not expected here."
        );
    }

    #[test]
    fn renders_hint_after_detail() {
        let diag = Diagnostic::error(
            range(7, 3, 7, 15),
            "Unsupported block type",
            "Blocks of type \"node_preefix\" are not expected here.",
        )
        .with_hint(did_you_mean("node_preefix", ["node", "node_prefix"]));
        assert_eq!(
            diag.to_string(),
            "acl.hcl:7,3-15: Unsupported block type; Blocks of type \"node_preefix\" are not expected here. Did you mean \"node_prefix\"?"
        );
    }

    #[test]
    fn renders_multi_line_range() {
        let r = range(2, 5, 4, 2);
        assert_eq!(r.to_string(), "acl.hcl:2,5-4,2");
    }

    #[test]
    fn levenshtein_counts_chars() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("node", "node"), 0);
        assert_eq!(levenshtein("node_preefix", "node_prefix"), 1);
        assert_eq!(levenshtein("yolo", "node"), 3);
        assert_eq!(levenshtein("ñode", "node"), 1);
    }

    #[test]
    fn suggestion_requires_small_distance() {
        let candidates = ["node", "node_prefix", "service", "service_prefix"];
        assert_eq!(suggest_closest("yolo", candidates), None);
        assert_eq!(suggest_closest("nod", candidates), Some("node".into()));
        assert_eq!(
            suggest_closest("servce_prefix", candidates),
            Some("service_prefix".into())
        );
    }

    #[test]
    fn diagnostics_track_severity() {
        let mut diags = Diagnostics::new();
        assert!(!diags.has_errors());
        diags.push(Diagnostic::warning(range(1, 1, 1, 2), "Duplicate policy block", "x."));
        assert!(!diags.has_errors());
        assert_eq!(diags.warnings().count(), 1);
        diags.push(Diagnostic::error(range(2, 1, 2, 2), "Missing policy block", "y."));
        assert!(diags.has_errors());
        assert_eq!(diags.errors().count(), 1);
        assert_eq!(diags.to_string().lines().count(), 2);
    }
}
