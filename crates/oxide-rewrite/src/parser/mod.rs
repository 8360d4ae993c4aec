//! SQL Parser
//!
//! A hand-written recursive descent parser with Pratt expression parsing.
//! It never backtracks, so parsing is linear in the number of tokens.

mod error;
#[allow(clippy::module_inception)]
mod parser;
mod pratt;

pub use error::SyntaxError;
pub use parser::{MAX_DEPTH, Parser};

use crate::ast::Statement;
use crate::lexer::Token;

/// Parses one statement from a full token stream.
///
/// # Errors
///
/// Returns a `SyntaxError` if the tokens do not form exactly one statement.
pub fn parse(tokens: &[Token<'_>]) -> Result<Statement, SyntaxError> {
    Parser::new(tokens).parse_statement()
}
