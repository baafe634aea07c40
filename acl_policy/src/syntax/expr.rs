//! Literal expressions and their reduction to scalar text.

use crate::diagnostic::{Diagnostic, Range};

/// The right-hand side of an attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    String(String, Range),
    /// Number literal, kept as written.
    Number(String, Range),
    Bool(bool, Range),
    Null(Range),
    Tuple(Vec<Expression>, Range),
    /// A bare identifier. No variables are defined when decoding policies.
    Variable(String, Range),
}

impl Expression {
    pub fn range(&self) -> &Range {
        match self {
            Expression::String(_, r)
            | Expression::Number(_, r)
            | Expression::Bool(_, r)
            | Expression::Null(r)
            | Expression::Tuple(_, r)
            | Expression::Variable(_, r) => r,
        }
    }

    /// Short type name used in messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Expression::String(..) => "string",
            Expression::Number(..) => "number",
            Expression::Bool(..) => "bool",
            Expression::Null(_) => "null",
            Expression::Tuple(..) => "tuple",
            Expression::Variable(..) => "variable",
        }
    }

    /// The value of a quoted string literal.
    pub fn as_literal_str(&self) -> Option<&str> {
        match self {
            Expression::String(s, _) => Some(s),
            _ => None,
        }
    }

    /// Reduce the expression to text.
    ///
    /// Numbers and booleans convert to their literal spelling. Null, tuples
    /// and variable references cannot be used where text is expected.
    pub fn decode_string(&self) -> Result<String, Diagnostic> {
        match self {
            Expression::String(s, _) | Expression::Number(s, _) => Ok(s.clone()),
            Expression::Bool(b, _) => Ok(b.to_string()),
            Expression::Null(range) => Err(Diagnostic::error(
                range.clone(),
                "Unsuitable value type",
                "Unsuitable value: value must not be null.",
            )),
            Expression::Tuple(_, range) => Err(Diagnostic::error(
                range.clone(),
                "Unsuitable value type",
                "Unsuitable value: string required.",
            )),
            Expression::Variable(_, range) => Err(Diagnostic::error(
                range.clone(),
                "Variables not allowed",
                "Variables may not be used here.",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn r() -> Range {
        Range::file_start(Arc::from("t.hcl"))
    }

    #[test]
    fn scalars_decode_to_text() {
        assert_eq!(Expression::String("read".into(), r()).decode_string().unwrap(), "read");
        assert_eq!(Expression::Number("1.5".into(), r()).decode_string().unwrap(), "1.5");
        assert_eq!(Expression::Bool(false, r()).decode_string().unwrap(), "false");
    }

    #[test]
    fn non_scalars_are_rejected() {
        let null = Expression::Null(r()).decode_string().unwrap_err();
        assert_eq!(null.detail, "Unsuitable value: value must not be null.");

        let tuple = Expression::Tuple(vec![], r()).decode_string().unwrap_err();
        assert_eq!(tuple.summary, "Unsuitable value type");
        assert_eq!(tuple.detail, "Unsuitable value: string required.");

        let var = Expression::Variable("read".into(), r()).decode_string().unwrap_err();
        assert_eq!(var.summary, "Variables not allowed");
    }
}
