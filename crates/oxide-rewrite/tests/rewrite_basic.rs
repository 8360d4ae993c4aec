//! Tests for adding a WHERE clause to queries that have none.

mod common;
use common::*;

use oxide_rewrite::add_where_condition;

#[test]
fn where_added_to_simple_select() {
    assert_eq!(
        rewrite("SELECT * FROM users;", "age > 18", "users"),
        "SELECT * FROM users WHERE age > 18;"
    );
}

#[test]
fn terminator_added_when_missing() {
    assert_eq!(
        rewrite("SELECT * FROM users", "age > 18", "users"),
        "SELECT * FROM users WHERE age > 18;"
    );
}

#[test]
fn repeated_and_padded_terminators_collapse() {
    for sql in [
        "SELECT * FROM users;;",
        "SELECT * FROM users ;  ",
        "SELECT * FROM users;\n;\n",
        "\n  SELECT * FROM users",
    ] {
        assert_eq!(
            rewrite(sql, "age > 18", "users"),
            "SELECT * FROM users WHERE age > 18;"
        );
    }
}

#[test]
fn condition_is_trimmed() {
    assert_eq!(
        rewrite("SELECT * FROM users", "  age > 18 \n", "users"),
        "SELECT * FROM users WHERE age > 18;"
    );
}

#[test]
fn where_goes_before_trailing_clauses() {
    assert_eq!(
        rewrite(
            "SELECT status, COUNT(*) FROM orders GROUP BY status HAVING COUNT(*) > 1 ORDER BY status LIMIT 10",
            "tenant_id = 7",
            "orders"
        ),
        "SELECT status, COUNT(*) FROM orders WHERE tenant_id = 7 GROUP BY status HAVING COUNT(*) > 1 ORDER BY status LIMIT 10;"
    );
}

#[test]
fn where_goes_after_alias() {
    assert_eq!(
        rewrite("SELECT u.id FROM users AS u", "u.active", "users"),
        "SELECT u.id FROM users AS u WHERE u.active;"
    );
}

#[test]
fn qualified_target_matches_qualified_table() {
    assert_eq!(
        rewrite("SELECT * FROM sales.orders o", "o.region = 'EU'", "sales.orders"),
        "SELECT * FROM sales.orders o WHERE o.region = 'EU';"
    );
}

#[test]
fn table_match_ignores_case_and_quotes() {
    assert_eq!(
        rewrite("select * from `Users`", "age > 18", "USERS"),
        "select * from `Users` WHERE age > 18;"
    );
    assert_eq!(
        rewrite("SELECT * FROM Sales.Orders", "x = 1", "`sales`.`orders`"),
        "SELECT * FROM Sales.Orders WHERE x = 1;"
    );
}

#[test]
fn formatting_and_comments_preserved() {
    let sql = "SELECT  id,\n        name -- display name\nFROM   users /* main */\nORDER BY id";
    assert_eq!(
        rewrite(sql, "age > 18", "users"),
        "SELECT  id,\n        name -- display name\nFROM   users WHERE age > 18 /* main */\nORDER BY id;"
    );
}

#[test]
fn trailing_line_comment_keeps_terminator_outside() {
    assert_eq!(
        rewrite("SELECT * FROM users -- all users", "age > 18", "users"),
        "SELECT * FROM users WHERE age > 18 -- all users\n;"
    );
}

#[test]
fn no_target_round_trips() {
    for sql in [
        "SELECT * FROM users",
        "SELECT id, name FROM users WHERE age > 18",
        "SELECT COUNT(*) FROM orders GROUP BY status",
        "CREATE TABLE test (id INT, name STRING)",
        "INSERT INTO TABLE test VALUES (1, 'hello')",
    ] {
        assert_eq!(
            add_where_condition(&format!("{sql};"), "x = 1", None).unwrap(),
            format!("{sql};")
        );
        assert_eq!(
            add_where_condition(sql, "x = 1", None).unwrap(),
            format!("{sql};")
        );
    }
}

#[test]
fn select_without_from_is_unchanged() {
    assert_unchanged("SELECT 1 + 1", "users");
}

#[test]
fn statements_without_queries_are_unchanged() {
    assert_unchanged("CREATE TABLE test (id INT, name STRING);", "test");
    assert_unchanged("INSERT INTO TABLE test VALUES (1, 'hello');", "test");
    assert_unchanged("DROP TABLE IF EXISTS users", "users");
    assert_unchanged("UPDATE users SET name = 'x' WHERE id = 1", "users");
}

#[test]
fn dotted_quoted_identifier_is_not_a_qualified_name() {
    assert_unchanged("SELECT * FROM `a.b`", "a.b");
    assert_unchanged("SELECT * FROM a.b", "`a.b`");
    assert_eq!(
        rewrite("SELECT * FROM `a.b`", "x = 1", "`a.b`"),
        "SELECT * FROM `a.b` WHERE x = 1;"
    );
}
