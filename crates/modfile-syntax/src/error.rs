use crate::lexer::{Token, TokenKind};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub line: usize,
    pub col: usize,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(line: usize, col: usize, start: usize, end: usize) -> Self {
        Self { line, col, start, end }
    }
}

/// Broad classification of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An unrecognized character sequence reached the parser.
    Lexical,
    /// A token of the wrong kind for the current grammar state.
    Structural,
    /// The input ended where the grammar required more tokens.
    Incomplete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Lexical { expected: String, text: String, span: Span },
    UnexpectedToken { expected: String, found: String, span: Span },
    UnexpectedEof { expected: String, span: Span },
}

impl ParseError {
    /// Builds the error for `found` appearing where `expected` was required.
    ///
    /// The variant follows the kind of the offending token: end-of-input
    /// yields [`ParseError::UnexpectedEof`], an invalid token yields
    /// [`ParseError::Lexical`], anything else is a structural mismatch.
    pub fn expected(expected: impl Into<String>, found: &Token) -> Self {
        let expected = expected.into();
        match found.kind {
            TokenKind::Eof => ParseError::UnexpectedEof { expected, span: found.span },
            TokenKind::Invalid => ParseError::Lexical {
                expected,
                text: found.value.clone(),
                span: found.span,
            },
            _ => ParseError::UnexpectedToken {
                expected,
                found: found.display_name(),
                span: found.span,
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::Lexical { .. } => ErrorKind::Lexical,
            ParseError::UnexpectedToken { .. } => ErrorKind::Structural,
            ParseError::UnexpectedEof { .. } => ErrorKind::Incomplete,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            ParseError::Lexical { span, .. } => *span,
            ParseError::UnexpectedToken { span, .. } => *span,
            ParseError::UnexpectedEof { span, .. } => *span,
        }
    }

    pub fn expected_what(&self) -> &str {
        match self {
            ParseError::Lexical { expected, .. }
            | ParseError::UnexpectedToken { expected, .. }
            | ParseError::UnexpectedEof { expected, .. } => expected,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let span = self.span();
        match self {
            ParseError::Lexical { expected, text, .. } => {
                write!(f, "expected {}, got invalid token '{}'", expected, text)?
            }
            ParseError::UnexpectedToken { expected, found, .. } => {
                write!(f, "expected {}, got {}", expected, found)?
            }
            ParseError::UnexpectedEof { expected, .. } => {
                write!(f, "expected {}, got end of input", expected)?
            }
        }
        write!(f, " at line {}, column {}", span.line, span.col)
    }
}

impl std::error::Error for ParseError {}

/// A [`ParseError`] paired with the source it was raised against, rendered
/// as a snippet with a caret under the offending token.
pub struct Diagnostic<'a> {
    source: &'a str,
    error: &'a ParseError,
}

impl<'a> Diagnostic<'a> {
    pub fn new(source: &'a str, error: &'a ParseError) -> Self {
        Self { source, error }
    }

    fn error_label(&self) -> &str {
        match self.error.kind() {
            ErrorKind::Lexical => "lexical error",
            ErrorKind::Structural => "syntax error",
            ErrorKind::Incomplete => "unexpected end of input",
        }
    }

    pub fn format_error(&self) -> String {
        let span = self.error.span();
        let label = self.error_label();

        let mut output = format!("error: {}\n", self.error);
        output.push_str(&format!("  --> line {}:{}\n", span.line, span.col));
        output.push_str("   |\n");

        let lines: Vec<&str> = self.source.lines().collect();
        if span.line > 0 && span.line <= lines.len() {
            let line_content = lines[span.line - 1];
            let line_num_width = span.line.to_string().len().max(2);
            output.push_str(&format!(
                " {: >width$} | {}\n",
                span.line,
                line_content,
                width = line_num_width
            ));

            let visual_col: usize = line_content
                .chars()
                .take(span.col.saturating_sub(1))
                .map(|ch| if ch == '\t' { 4 } else { 1 })
                .sum();

            let error_len = self
                .source
                .get(span.start..span.end)
                .map(|text| text.trim_end_matches('\n').chars().count())
                .unwrap_or(0)
                .max(1);

            output.push_str(&format!(
                " {: >width$} | {}{} {}\n",
                "",
                " ".repeat(visual_col),
                "^".repeat(error_len),
                label,
                width = line_num_width
            ));
        } else {
            output.push_str(&format!("   | {}\n", label));
        }

        output.push_str("   |\n");
        output
    }
}

impl fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_error())
    }
}
