#![allow(dead_code)]

use oxide_rewrite::ast::{Query, SelectStatement, Statement};
use oxide_rewrite::{add_where_condition, Lexer, Parser, RewriteError, SyntaxError, Token};

pub fn tokenize(sql: &str) -> Vec<Token<'_>> {
    Lexer::new(sql)
        .tokenize()
        .unwrap_or_else(|e| panic!("Failed to tokenize: {sql}\nError: {e:?}"))
}

pub fn parse(sql: &str) -> Statement {
    let tokens = tokenize(sql);
    Parser::new(&tokens)
        .parse_statement()
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse_err(sql: &str) -> SyntaxError {
    let tokens = tokenize(sql);
    Parser::new(&tokens)
        .parse_statement()
        .expect_err(&format!("Expected parse error for: {sql}"))
}

pub fn parse_query(sql: &str) -> Query {
    match parse(sql) {
        Statement::Select(q) => q,
        other => panic!("Expected SELECT, got {other:?}"),
    }
}

pub fn parse_select(sql: &str) -> SelectStatement {
    parse_query(sql).first_select().clone()
}

/// Rewrites `sql` for `table`, panicking on error.
pub fn rewrite(sql: &str, condition: &str, table: &str) -> String {
    add_where_condition(sql, condition, Some(table))
        .unwrap_or_else(|e| panic!("Failed to rewrite: {sql}\nError: {e}"))
}

pub fn rewrite_err(sql: &str, condition: &str, table: &str) -> RewriteError {
    add_where_condition(sql, condition, Some(table))
        .expect_err(&format!("Expected rewrite error for: {sql}"))
}

/// Asserts that rewriting for `table` leaves `sql` untouched.
pub fn assert_unchanged(sql: &str, table: &str) {
    assert_eq!(
        rewrite(sql, "injected = 1", table),
        sql,
        "Expected no rewrite for table {table}"
    );
}
