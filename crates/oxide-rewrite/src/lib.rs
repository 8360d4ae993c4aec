//! # oxide-rewrite
//!
//! Adds row filters to SQL statements without reformatting them.
//!
//! Given one statement, a condition and a target table, the rewriter finds
//! every query block whose `FROM` clause starts with the target table and
//! constrains it:
//!
//! - a block without `WHERE` gets `WHERE <condition>` after its `FROM`
//!   clause, joins included;
//! - a block with `WHERE` gets its condition parenthesized and
//!   `AND <condition>` appended.
//!
//! All other text, whitespace and comments included, is reproduced byte for
//! byte.
//!
//! ```rust
//! use oxide_rewrite::add_where_condition;
//!
//! let sql = add_where_condition(
//!     "SELECT * FROM t WHERE a=1 OR b=2;",
//!     "c=3",
//!     Some("t"),
//! )
//! .unwrap();
//! assert_eq!(sql, "SELECT * FROM t WHERE (a=1 OR b=2) AND c=3;");
//! ```
//!
//! ## Pipeline
//!
//! 1. [`lexer`]: a trivia-preserving tokenizer for Hive-flavoured SQL
//! 2. [`parser`]: recursive descent with Pratt expression parsing, into [`ast`]
//! 3. [`locator`]: a walk over the tree that plans insertion [`Edit`]s
//! 4. [`patcher`]: replays the token stream with the edits applied

pub mod ast;
pub mod error;
pub mod lexer;
pub mod locator;
pub mod parser;
pub mod patcher;
pub mod rewriter;

pub use ast::{Expr, Statement, TableName};
pub use error::{ParseError, Result, RewriteError};
pub use lexer::{LexError, Lexer, Token, TokenKind};
pub use locator::{locate, Edit, Locator};
pub use parser::{Parser, SyntaxError};
pub use rewriter::{add_where_condition, RewriteOptions, RewriteResult, Rewriter};
