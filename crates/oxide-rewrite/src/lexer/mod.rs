//! SQL Lexer/Tokenizer
//!
//! This module provides a hand-written lexer for Hive-flavoured SQL. Every
//! byte of the input ends up in exactly one token; whitespace and comments
//! are emitted as trivia tokens rather than skipped.

mod error;
mod span;
mod token;
mod tokenizer;

pub use error::{LexError, LexErrorKind};
pub use span::{Span, TokenRange};
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::Lexer;
