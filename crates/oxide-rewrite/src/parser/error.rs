//! Parser error types.

use crate::lexer::{Span, Token};

/// A syntax error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at position {}..{}", .span.start, .span.end)]
pub struct SyntaxError {
    /// The error message.
    pub message: String,
    /// The location of the error.
    pub span: Span,
    /// Index of the offending token.
    pub token_index: usize,
    /// Expected tokens (if applicable).
    pub expected: Option<String>,
    /// The actual token found, as written.
    pub found: Option<String>,
}

impl SyntaxError {
    /// Creates a new syntax error at the given token.
    #[must_use]
    pub fn new(message: impl Into<String>, token: &Token<'_>) -> Self {
        Self {
            message: message.into(),
            span: token.span,
            token_index: token.index,
            expected: None,
            found: None,
        }
    }

    /// Creates an "unexpected token" or "unexpected end of input" error.
    #[must_use]
    pub fn unexpected(expected: impl Into<String>, found: &Token<'_>) -> Self {
        let expected: String = expected.into();
        let message = if found.is_eof() {
            format!("Unexpected end of input: expected {expected}")
        } else {
            format!("Unexpected token: expected {expected}, found {}", found.describe())
        };
        Self {
            message,
            span: found.span,
            token_index: found.index,
            expected: Some(expected),
            found: (!found.is_eof()).then(|| found.text.to_string()),
        }
    }

    /// Returns the error with its span moved `by` bytes to the right.
    ///
    /// Used when the parsed text is a slice of a larger input.
    #[must_use]
    pub fn shifted(mut self, by: usize) -> Self {
        self.span = Span::new(self.span.start + by, self.span.end + by);
        self
    }
}
