//! Error types for the rewriter.

use crate::lexer::LexError;
use crate::parser::SyntaxError;

/// A failure to tokenize or parse a piece of SQL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The text could not be tokenized.
    #[error(transparent)]
    Lex(#[from] LexError),

    /// The tokens do not form the expected construct.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

impl ParseError {
    /// Returns the error with its position moved `by` bytes to the right.
    #[must_use]
    pub fn shifted(self, by: usize) -> Self {
        match self {
            Self::Lex(err) => Self::Lex(LexError::new(err.kind, err.offset + by)),
            Self::Syntax(err) => Self::Syntax(err.shifted(by)),
        }
    }

    /// Returns the byte offset the error points at.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::Lex(err) => err.offset,
            Self::Syntax(err) => err.span.start,
        }
    }
}

/// Errors that can occur while adding a condition to a statement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RewriteError {
    /// The statement could not be tokenized.
    #[error("SQL parsing failed: {0}")]
    Lex(LexError),

    /// The statement is not one recognised SQL statement.
    #[error("SQL parsing failed: {0}")]
    Syntax(SyntaxError),

    /// The target is not a table name.
    #[error("Invalid target table '{target}': {source}")]
    InvalidTarget {
        /// The target as given.
        target: String,
        /// Why it could not be parsed.
        source: ParseError,
    },

    /// The condition is not a single expression.
    #[error("Invalid condition '{condition}': {source}")]
    InvalidCondition {
        /// The condition as given.
        condition: String,
        /// Why it could not be parsed.
        source: ParseError,
    },

    /// A matching table was found but there is no condition to add.
    #[error("Condition is empty")]
    EmptyCondition,
}

impl RewriteError {
    /// Returns the byte offset into the rewritten statement the error
    /// points at, if it concerns the statement itself.
    #[must_use]
    pub const fn offset(&self) -> Option<usize> {
        match self {
            Self::Lex(err) => Some(err.offset),
            Self::Syntax(err) => Some(err.span.start),
            Self::InvalidTarget { .. } | Self::InvalidCondition { .. } | Self::EmptyCondition => {
                None
            }
        }
    }
}

impl From<ParseError> for RewriteError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Lex(err) => Self::Lex(err),
            ParseError::Syntax(err) => Self::Syntax(err),
        }
    }
}

impl From<LexError> for RewriteError {
    fn from(err: LexError) -> Self {
        Self::Lex(err)
    }
}

impl From<SyntaxError> for RewriteError {
    fn from(err: SyntaxError) -> Self {
        Self::Syntax(err)
    }
}

/// Result type for rewrite operations.
pub type Result<T> = std::result::Result<T, RewriteError>;
