//! Lexer error types.

/// The reason tokenization stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    /// A string literal has no closing quote.
    #[error("Unterminated string literal")]
    UnterminatedString,

    /// A quoted identifier has no closing quote.
    #[error("Unterminated quoted identifier")]
    UnterminatedQuotedIdentifier,

    /// A `/* ... */` comment has no closing `*/`.
    #[error("Unterminated block comment")]
    UnterminatedComment,

    /// A character that starts no token.
    #[error("Unexpected character: {0:?}")]
    UnexpectedCharacter(char),
}

/// A tokenization error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at position {offset}")]
pub struct LexError {
    /// What went wrong.
    pub kind: LexErrorKind,
    /// Byte offset where the offending token starts.
    pub offset: usize,
}

impl LexError {
    /// Creates a new lex error.
    #[must_use]
    pub const fn new(kind: LexErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}
