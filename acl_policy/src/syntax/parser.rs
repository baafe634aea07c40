//! Pest grammar and tree construction.

use std::sync::Arc;

use pest::Parser;
use pest::error::{ErrorVariant, InputLocation};
use pest::iterators::Pair;
use pest_derive::Parser;

use super::{Attribute, Block, Body, Expression, Ident, Item, Label};
use crate::diagnostic::{Diagnostic, Pos, Range};

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
struct BlockParser;

/// Maps byte offsets to 1-based line/column positions.
struct LineIndex<'s> {
    source: &'s str,
    /// Byte offset of the first character of every line.
    line_starts: Vec<usize>,
}

impl<'s> LineIndex<'s> {
    fn new(source: &'s str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .char_indices()
                .filter(|(_, ch)| *ch == '\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            source,
            line_starts,
        }
    }

    fn pos(&self, byte: usize) -> Pos {
        let byte = byte.min(self.source.len());
        let line_idx = match self.line_starts.binary_search(&byte) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let line_start = self.line_starts[line_idx];
        let column = self.source[line_start..byte].chars().count() + 1;
        Pos {
            line: line_idx + 1,
            column,
            byte,
        }
    }
}

struct TreeBuilder<'s> {
    filename: Arc<str>,
    index: LineIndex<'s>,
}

impl TreeBuilder<'_> {
    fn range(&self, start: usize, end: usize) -> Range {
        Range::new(self.filename.clone(), self.index.pos(start), self.index.pos(end))
    }

    fn span_range(&self, pair: &Pair<'_, Rule>) -> Range {
        let span = pair.as_span();
        self.range(span.start(), span.end())
    }

    fn body(&self, pair: Pair<'_, Rule>, range: Range, missing_item_range: Range) -> Body {
        let items = pair
            .into_inner()
            .map(|item| match item.as_rule() {
                Rule::attribute => Item::Attribute(self.attribute(item)),
                Rule::block => Item::Block(self.block(item)),
                other => unreachable!("unexpected rule in body: {other:?}"),
            })
            .collect();
        Body {
            items,
            range,
            missing_item_range,
        }
    }

    fn ident(&self, pair: Pair<'_, Rule>) -> Ident {
        Ident {
            range: self.span_range(&pair),
            name: pair.as_str().to_string(),
        }
    }

    fn attribute(&self, pair: Pair<'_, Rule>) -> Attribute {
        let range = self.span_range(&pair);
        let mut inner = pair.into_inner();
        let name = inner.next().map(|p| self.ident(p));
        let expr = inner.next().map(|p| self.expression(p));
        match (name, expr) {
            (Some(name), Some(expr)) => Attribute { name, expr, range },
            _ => unreachable!("grammar guarantees name and expression"),
        }
    }

    fn block(&self, pair: Pair<'_, Rule>) -> Block {
        let range = self.span_range(&pair);
        let mut ident = None;
        let mut labels = Vec::new();
        let mut open_brace_range = None;
        let mut body_pair = None;
        let mut close_brace_range = None;

        for part in pair.into_inner() {
            match part.as_rule() {
                Rule::identifier => ident = Some(self.ident(part)),
                Rule::label => labels.push(self.label(part)),
                Rule::open_brace => open_brace_range = Some(self.span_range(&part)),
                Rule::body => body_pair = Some(part),
                Rule::close_brace => close_brace_range = Some(self.span_range(&part)),
                other => unreachable!("unexpected rule in block: {other:?}"),
            }
        }

        match (ident, open_brace_range, body_pair, close_brace_range) {
            (Some(ident), Some(open), Some(body), Some(close)) => {
                let body_range = Range::new(self.filename.clone(), open.start, close.end);
                let body = self.body(body, body_range, open.clone());
                Block {
                    ident,
                    labels,
                    open_brace_range: open,
                    body,
                    range,
                }
            }
            _ => unreachable!("grammar guarantees a complete block"),
        }
    }

    fn label(&self, pair: Pair<'_, Rule>) -> Label {
        let range = self.span_range(&pair);
        let value = match pair.into_inner().next() {
            Some(inner) if inner.as_rule() == Rule::string => string_value(inner),
            Some(inner) => inner.as_str().to_string(),
            None => String::new(),
        };
        Label { value, range }
    }

    fn expression(&self, pair: Pair<'_, Rule>) -> Expression {
        // `expression` wraps exactly one concrete alternative.
        let inner = match pair.into_inner().next() {
            Some(inner) => inner,
            None => unreachable!("grammar guarantees an expression alternative"),
        };
        let range = self.span_range(&inner);
        match inner.as_rule() {
            Rule::string => Expression::String(string_value(inner), range),
            Rule::number => Expression::Number(inner.as_str().to_string(), range),
            Rule::boolean => Expression::Bool(inner.as_str() == "true", range),
            Rule::null => Expression::Null(range),
            Rule::tuple => Expression::Tuple(
                inner.into_inner().map(|e| self.expression(e)).collect(),
                range,
            ),
            Rule::variable => Expression::Variable(inner.as_str().to_string(), range),
            other => unreachable!("unexpected rule in expression: {other:?}"),
        }
    }
}

/// Decode the contents of a `string` pair, resolving escape sequences.
fn string_value(pair: Pair<'_, Rule>) -> String {
    let raw = pair
        .into_inner()
        .next()
        .map(|inner| inner.as_str())
        .unwrap_or_default();
    unescape(raw)
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(c) => out.push(c),
                    None => out.push(char::REPLACEMENT_CHARACTER),
                }
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Human names for grammar rules in syntax error messages.
fn describe(rule: &Rule) -> &'static str {
    match rule {
        Rule::EOI => "end of file",
        Rule::attribute => "argument definition",
        Rule::block => "block definition",
        Rule::identifier | Rule::variable => "identifier",
        Rule::label => "block label",
        Rule::open_brace => "opening brace \"{\"",
        Rule::close_brace => "closing brace \"}\"",
        Rule::expression => "expression",
        Rule::string | Rule::string_inner => "quoted string",
        Rule::escape => "escape sequence",
        Rule::number => "number",
        Rule::boolean => "boolean",
        Rule::null => "null",
        Rule::tuple => "tuple",
        Rule::file | Rule::body => "argument or block definition",
        _ => "token",
    }
}

fn join_alternatives(mut names: Vec<&'static str>) -> String {
    names.sort_unstable();
    names.dedup();
    match names.as_slice() {
        [] => String::new(),
        [one] => (*one).to_string(),
        [a, b] => format!("{a} or {b}"),
        [rest @ .., last] => format!("{}, or {last}", rest.join(", ")),
    }
}

fn syntax_error(builder: &TreeBuilder<'_>, err: pest::error::Error<Rule>) -> Diagnostic {
    let (start, end) = match err.location {
        InputLocation::Pos(pos) => {
            let next = builder.index.source[pos..]
                .chars()
                .next()
                .map_or(pos, |ch| pos + ch.len_utf8());
            (pos, next)
        }
        InputLocation::Span((start, end)) => (start, end),
    };
    let detail = match &err.variant {
        ErrorVariant::ParsingError {
            positives,
            negatives,
        } => {
            let expected = join_alternatives(positives.iter().map(describe).collect());
            let unexpected = join_alternatives(negatives.iter().map(describe).collect());
            match (expected.is_empty(), unexpected.is_empty()) {
                (false, true) => format!("Expected {expected}."),
                (true, false) => format!("Unexpected {unexpected}."),
                (false, false) => format!("Unexpected {unexpected}; expected {expected}."),
                (true, true) => "This character is not expected here.".to_string(),
            }
        }
        ErrorVariant::CustomError { message } => format!("{message}."),
    };
    Diagnostic::error(builder.range(start, end), "Invalid syntax", detail)
}

/// Parse `source` into the root body of a file named `filename`.
pub(super) fn parse_file(filename: Arc<str>, source: &str) -> Result<Body, Diagnostic> {
    let builder = TreeBuilder {
        filename: filename.clone(),
        index: LineIndex::new(source),
    };

    let mut pairs = BlockParser::parse(Rule::file, source).map_err(|e| syntax_error(&builder, e))?;
    let body = pairs
        .next()
        .and_then(|file| file.into_inner().find(|p| p.as_rule() == Rule::body));

    let whole = builder.range(0, source.len());
    let start = Range::file_start(filename);
    Ok(match body {
        Some(body) => builder.body(body, whole, start),
        None => Body {
            items: Vec::new(),
            range: whole,
            missing_item_range: start,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_index_positions() {
        let index = LineIndex::new("ab\ncd\n\nx");
        assert_eq!((index.pos(0).line, index.pos(0).column), (1, 1));
        assert_eq!((index.pos(2).line, index.pos(2).column), (1, 3));
        assert_eq!((index.pos(3).line, index.pos(3).column), (2, 1));
        assert_eq!((index.pos(6).line, index.pos(6).column), (3, 1));
        assert_eq!((index.pos(7).line, index.pos(7).column), (4, 1));
        assert_eq!((index.pos(8).line, index.pos(8).column), (4, 2));
    }

    #[test]
    fn unescape_sequences() {
        assert_eq!(unescape(r#"a\"b"#), "a\"b");
        assert_eq!(unescape(r"\\"), "\\");
        assert_eq!(unescape(r"é"), "é");
        assert_eq!(unescape(r"line\nnext"), "line\nnext");
    }

    #[test]
    fn alternatives_are_joined_in_prose() {
        assert_eq!(join_alternatives(vec!["a"]), "a");
        assert_eq!(join_alternatives(vec!["b", "a"]), "a or b");
        assert_eq!(join_alternatives(vec!["c", "a", "b", "a"]), "a, b, or c");
    }
}
