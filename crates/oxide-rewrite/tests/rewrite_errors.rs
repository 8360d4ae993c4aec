//! Tests for rewrite failures.

mod common;
use common::*;

use std::thread;

use oxide_rewrite::parser::MAX_DEPTH;
use oxide_rewrite::{add_where_condition, LexError, RewriteError, RewriteOptions, Rewriter};

fn syntax_error(err: RewriteError) -> oxide_rewrite::SyntaxError {
    match err {
        RewriteError::Syntax(err) => err,
        other => panic!("Expected syntax error, got {other:?}"),
    }
}

fn lex_error(err: RewriteError) -> LexError {
    match err {
        RewriteError::Lex(err) => err,
        other => panic!("Expected lex error, got {other:?}"),
    }
}

#[test]
fn error_empty_statement() {
    for sql in ["", "   ", ";", " ;; \n"] {
        let err = syntax_error(rewrite_err(sql, "x", "t"));
        assert!(err.message.contains("end of input"), "{err}");
    }
}

#[test]
fn error_message_prefix() {
    let err = rewrite_err("SELECT FROM users", "x", "users");
    assert!(err.to_string().starts_with("SQL parsing failed: "), "{err}");
}

#[test]
fn error_points_at_offending_token() {
    let err = syntax_error(rewrite_err("SELECT * FROM users WHERE", "x", "users"));
    assert_eq!(err.span.start, 25);

    let err = syntax_error(rewrite_err("SELECT * FROM users users2 users3", "x", "users"));
    assert_eq!(err.found.as_deref(), Some("users3"));
}

#[test]
fn error_two_statements() {
    let err = syntax_error(rewrite_err("SELECT 1; SELECT 2", "x", "t"));
    assert_eq!(err.found.as_deref(), Some("SELECT"));
}

#[test]
fn error_unterminated_string() {
    let err = lex_error(rewrite_err("SELECT * FROM t WHERE a = 'open", "x", "t"));
    assert_eq!(err.offset, 26);
}

#[test]
fn error_unterminated_comment() {
    lex_error(rewrite_err("SELECT * FROM t /* never closed", "x", "t"));
}

#[test]
fn error_offsets_include_leading_whitespace() {
    let err = lex_error(rewrite_err("\n\n  SELECT $ FROM t", "x", "t"));
    assert_eq!(err.offset, 11);
}

#[test]
fn error_unbalanced_parentheses() {
    syntax_error(rewrite_err("SELECT * FROM (SELECT * FROM t", "x", "t"));
    syntax_error(rewrite_err("SELECT (a FROM t", "x", "t"));
    syntax_error(rewrite_err("SELECT a) FROM t", "x", "t"));
}

#[test]
fn error_invalid_target() {
    for target in ["a b", "a.", "1t", "SELECT"] {
        let err = rewrite_err("SELECT * FROM t", "x", target);
        assert!(
            matches!(err, RewriteError::InvalidTarget { .. }),
            "{target}: {err:?}"
        );
    }
}

#[test]
fn error_empty_condition_on_match() {
    assert_eq!(
        rewrite_err("SELECT * FROM t", "", "t"),
        RewriteError::EmptyCondition
    );
}

#[test]
fn error_invalid_condition_when_validated() {
    let rewriter = Rewriter::with_options(RewriteOptions::new().with_condition_validation());
    for condition in ["a =", "a = 1)", "a = 1; DROP TABLE t"] {
        let err = rewriter
            .rewrite("SELECT * FROM t", condition, Some("t"))
            .unwrap_err();
        assert!(
            matches!(err, RewriteError::InvalidCondition { .. }),
            "{condition}: {err:?}"
        );
    }
}

#[test]
fn error_nesting_too_deep() {
    let rewriter = Rewriter::with_options(RewriteOptions::new().with_max_depth(8));
    let sql = format!("SELECT {}1{} FROM t", "(".repeat(20), ")".repeat(20));
    let err = syntax_error(rewriter.rewrite(&sql, "x", Some("t")).unwrap_err());
    assert!(err.message.contains("Nesting"), "{err}");
}

/// Rewrites a WHERE clause nested `depth` parentheses deep on a 2 MiB
/// thread, the stack size of test threads and most async workers.
fn rewrite_nested_on_small_stack(depth: usize) -> Result<String, RewriteError> {
    thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(move || {
            let sql = format!(
                "SELECT * FROM t WHERE {}a = 1{}",
                "(".repeat(depth),
                ")".repeat(depth)
            );
            add_where_condition(&sql, "x = 1", Some("t"))
        })
        .unwrap()
        .join()
        .expect("rewrite thread panicked")
}

#[test]
fn error_default_nesting_limit_on_small_stack() {
    for depth in [100, 250, 1000] {
        let err = syntax_error(rewrite_nested_on_small_stack(depth).unwrap_err());
        assert!(
            err.message.contains(&format!("limit of {MAX_DEPTH}")),
            "{depth}: {err}"
        );
    }
}

#[test]
fn nesting_below_default_limit_on_small_stack() {
    let sql = rewrite_nested_on_small_stack(50).unwrap();
    assert!(sql.ends_with(") AND x = 1;"), "{sql}");
}
