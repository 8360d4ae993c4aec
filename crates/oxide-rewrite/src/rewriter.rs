//! The rewrite pipeline: tokenize, parse, locate, patch.

use tracing::debug;

use crate::ast::{Expr, TableName};
use crate::error::{ParseError, Result, RewriteError};
use crate::lexer::{Lexer, TokenKind};
use crate::locator::Locator;
use crate::parser::{Parser, MAX_DEPTH};
use crate::patcher;

/// Options for [`Rewriter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOptions {
    /// Parse the condition as an expression before splicing it in.
    pub validate_condition: bool,
    /// Nesting limit for queries and expressions.
    pub max_depth: usize,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl RewriteOptions {
    /// Creates default options.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            validate_condition: false,
            max_depth: MAX_DEPTH,
        }
    }

    /// Enables condition validation.
    #[must_use]
    pub const fn with_condition_validation(mut self) -> Self {
        self.validate_condition = true;
        self
    }

    /// Sets the nesting limit.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Outcome of a rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteResult {
    /// The statement, normalized and terminated, with every matching
    /// block constrained.
    Rewritten {
        /// The rewritten statement.
        sql: String,
        /// Number of `FROM` clauses the condition was added to.
        clauses: usize,
    },
    /// The target table was not found; the input stands as is.
    Unchanged,
}

impl RewriteResult {
    /// Returns true if any clause was rewritten.
    #[must_use]
    pub const fn is_rewritten(&self) -> bool {
        matches!(self, Self::Rewritten { clauses, .. } if *clauses > 0)
    }

    /// Returns the resulting SQL, falling back to `original` when unchanged.
    #[must_use]
    pub fn into_sql(self, original: &str) -> String {
        match self {
            Self::Rewritten { sql, .. } => sql,
            Self::Unchanged => original.to_string(),
        }
    }
}

/// Adds row filters to SQL statements.
///
/// A `Rewriter` holds only its options, so one instance can serve any
/// number of threads.
#[derive(Debug, Clone, Default)]
pub struct Rewriter {
    options: RewriteOptions,
}

impl Rewriter {
    /// Creates a rewriter with default options.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            options: RewriteOptions::new(),
        }
    }

    /// Creates a rewriter with custom options.
    #[must_use]
    pub const fn with_options(options: RewriteOptions) -> Self {
        Self { options }
    }

    /// Adds `condition` to every query block of `sql` whose home table is
    /// `target`.
    ///
    /// An existing `WHERE` condition is parenthesized and the new one is
    /// joined with `AND`. A block without `WHERE` gets one right after its
    /// `FROM` clause. Everything else is kept byte for byte.
    ///
    /// Without a target (`None` or an empty string), the statement is only
    /// checked and comes back normalized. A whitespace-only target names no
    /// table, so the result is [`RewriteResult::Unchanged`].
    ///
    /// # Errors
    ///
    /// Returns a [`RewriteError`] if the statement, the target, or (with
    /// validation enabled) the condition does not parse, or if the
    /// condition is empty while a matching table was found.
    pub fn rewrite(&self, sql: &str, condition: &str, target: Option<&str>) -> Result<RewriteResult> {
        let (offset, statement_text) = trim_statement(sql);
        let condition = condition.trim();
        let target = target.filter(|target| !target.is_empty());

        let tokens = Lexer::new(statement_text)
            .tokenize()
            .map_err(|err| ParseError::from(err).shifted(offset))?;
        let statement = Parser::new(&tokens)
            .with_max_depth(self.options.max_depth)
            .parse_statement()
            .map_err(|err| ParseError::from(err).shifted(offset))?;
        debug!(tokens = tokens.len(), kind = statement.kind(), "Parsed statement");

        if target.is_some_and(|target| target.trim().is_empty()) {
            debug!("Blank target table");
            return Ok(RewriteResult::Unchanged);
        }
        let target_name = target.map(|target| parse_target(target.trim())).transpose()?;
        if self.options.validate_condition && !condition.is_empty() {
            parse_condition(condition)?;
        }

        let mut locator = Locator::new(target_name.as_ref(), condition);
        locator.visit_statement(&statement);
        let clauses = locator.matches();

        if clauses > 0 && condition.is_empty() {
            return Err(RewriteError::EmptyCondition);
        }
        if target_name.is_some() && clauses == 0 {
            debug!(target = target.unwrap_or_default(), "Target table not found");
            return Ok(RewriteResult::Unchanged);
        }

        let patched = patcher::apply(&tokens, locator.edits());
        debug!(clauses, edits = locator.edits().len(), "Rewrote statement");
        Ok(RewriteResult::Rewritten {
            sql: terminate(patched),
            clauses,
        })
    }
}

/// Adds `new_condition` to `sql_text` wherever `target_table` is the home
/// table of a `FROM` clause.
///
/// Returns the rewritten statement terminated by exactly one `;`, or
/// `sql_text` untouched if the table does not appear. A whitespace-only
/// `target_table` matches nothing. `None` or an empty string only checks
/// the statement and returns it with its terminator normalized.
///
/// # Errors
///
/// Returns a [`RewriteError`] if the statement cannot be parsed.
///
/// # Example
///
/// ```rust
/// use oxide_rewrite::add_where_condition;
///
/// let sql = add_where_condition("SELECT * FROM users;", "age > 18", Some("users")).unwrap();
/// assert_eq!(sql, "SELECT * FROM users WHERE age > 18;");
/// ```
pub fn add_where_condition(
    sql_text: &str,
    new_condition: &str,
    target_table: Option<&str>,
) -> Result<String> {
    Ok(Rewriter::new()
        .rewrite(sql_text, new_condition, target_table)?
        .into_sql(sql_text))
}

/// Strips trailing whitespace and `;` terminators, then leading whitespace.
///
/// Returns the byte offset of the kept text within `sql` with the text.
fn trim_statement(sql: &str) -> (usize, &str) {
    let end_trimmed = sql.trim_end_matches(|c: char| c.is_whitespace() || c == ';');
    let trimmed = end_trimmed.trim_start();
    (end_trimmed.len() - trimmed.len(), trimmed)
}

/// Appends the `;` terminator, on a new line if the text ends in a line
/// comment.
fn terminate(mut sql: String) -> String {
    if sql.ends_with(';') {
        return sql;
    }
    if ends_in_line_comment(&sql) {
        sql.push('\n');
    }
    sql.push(';');
    sql
}

fn ends_in_line_comment(sql: &str) -> bool {
    Lexer::new(sql).tokenize().is_ok_and(|tokens| {
        tokens
            .iter()
            .rev()
            .find(|token| !token.is_eof())
            .is_some_and(|token| token.kind == TokenKind::LineComment)
    })
}

fn parse_target(target: &str) -> Result<TableName> {
    let parsed = Lexer::new(target)
        .tokenize()
        .map_err(ParseError::from)
        .and_then(|tokens| {
            Parser::new(&tokens)
                .parse_table_name_only()
                .map_err(ParseError::from)
        });
    parsed.map_err(|source| RewriteError::InvalidTarget {
        target: target.to_string(),
        source,
    })
}

fn parse_condition(condition: &str) -> Result<Expr> {
    let parsed = Lexer::new(condition)
        .tokenize()
        .map_err(ParseError::from)
        .and_then(|tokens| Parser::new(&tokens).parse_condition().map_err(ParseError::from));
    parsed.map_err(|source| RewriteError::InvalidCondition {
        condition: condition.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_where() {
        assert_eq!(
            add_where_condition("SELECT * FROM users;", "age > 18", Some("users")).unwrap(),
            "SELECT * FROM users WHERE age > 18;"
        );
    }

    #[test]
    fn test_extend_where() {
        assert_eq!(
            add_where_condition(
                "SELECT * FROM users WHERE age > 18;",
                "status = 'active'",
                Some("users")
            )
            .unwrap(),
            "SELECT * FROM users WHERE (age > 18) AND status = 'active';"
        );
    }

    #[test]
    fn test_joined_table_is_not_home_table() {
        let sql = "SELECT * FROM users JOIN orders ON users.id = orders.user_id;";
        assert_eq!(
            add_where_condition(sql, "users.status = 'active'", Some("orders")).unwrap(),
            sql
        );
    }

    #[test]
    fn test_disjunction_is_parenthesized() {
        assert_eq!(
            add_where_condition("SELECT * FROM t WHERE a=1 OR b=2;", "c=3", Some("t")).unwrap(),
            "SELECT * FROM t WHERE (a=1 OR b=2) AND c=3;"
        );
    }

    #[test]
    fn test_unchanged_keeps_original_text() {
        let sql = "  SELECT * FROM users  ;; ";
        assert_eq!(add_where_condition(sql, "x = 1", Some("orders")).unwrap(), sql);
        assert_eq!(
            Rewriter::new().rewrite(sql, "x = 1", Some("orders")).unwrap(),
            RewriteResult::Unchanged
        );
    }

    #[test]
    fn test_no_target_normalizes_terminator() {
        assert_eq!(
            add_where_condition("SELECT 1 ;;\n", "x = 1", None).unwrap(),
            "SELECT 1;"
        );
        assert_eq!(
            add_where_condition("SELECT 1", "x = 1", Some("")).unwrap(),
            "SELECT 1;"
        );
    }

    #[test]
    fn test_blank_target_matches_nothing() {
        let sql = "SELECT * FROM users ";
        assert_eq!(add_where_condition(sql, "x = 1", Some("  ")).unwrap(), sql);
        assert_eq!(
            Rewriter::new().rewrite(sql, "x = 1", Some("\t")).unwrap(),
            RewriteResult::Unchanged
        );
        // The statement is still checked
        assert!(add_where_condition("SELECT FROM", "x = 1", Some(" ")).is_err());
    }

    #[test]
    fn test_trailing_line_comment_keeps_terminator_outside() {
        assert_eq!(
            add_where_condition("SELECT * FROM t -- everything\n;", "x = 1", Some("t")).unwrap(),
            "SELECT * FROM t WHERE x = 1 -- everything\n;"
        );
    }

    #[test]
    fn test_error_positions_account_for_leading_whitespace() {
        let err = add_where_condition("  SELECT FROM;", "x=1", Some("t")).unwrap_err();
        let RewriteError::Syntax(err) = err else {
            panic!("Expected syntax error, got {err:?}");
        };
        assert_eq!(err.span.start, 9);
    }

    #[test]
    fn test_empty_condition_with_match_fails() {
        assert_eq!(
            add_where_condition("SELECT * FROM t", "   ", Some("t")).unwrap_err(),
            RewriteError::EmptyCondition
        );
        // Nothing to add to when the table is absent
        assert_eq!(
            add_where_condition("SELECT * FROM t", "", Some("u")).unwrap(),
            "SELECT * FROM t"
        );
    }

    #[test]
    fn test_invalid_target() {
        let err = add_where_condition("SELECT * FROM t", "x = 1", Some("t u")).unwrap_err();
        assert!(matches!(err, RewriteError::InvalidTarget { ref target, .. } if target == "t u"));
    }

    #[test]
    fn test_condition_validation() {
        let rewriter = Rewriter::with_options(RewriteOptions::new().with_condition_validation());
        let err = rewriter
            .rewrite("SELECT * FROM t", "x = ", Some("t"))
            .unwrap_err();
        assert!(matches!(err, RewriteError::InvalidCondition { .. }));

        // Without validation the fragment is spliced in as given
        let result = Rewriter::new().rewrite("SELECT * FROM t", "x = ", Some("t")).unwrap();
        assert!(result.is_rewritten());
    }

    #[test]
    fn test_trim_statement() {
        assert_eq!(trim_statement("  SELECT 1 ; ;\n"), (2, "SELECT 1"));
        assert_eq!(trim_statement("SELECT 1"), (0, "SELECT 1"));
        assert_eq!(trim_statement(" ;"), (0, ""));
    }

    #[test]
    fn test_rewriter_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Rewriter>();
    }
}
