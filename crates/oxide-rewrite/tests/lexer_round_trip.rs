//! Tests for the trivia-preserving lexer.

mod common;
use common::*;

use oxide_rewrite::lexer::{Keyword, LexErrorKind};
use oxide_rewrite::{Lexer, TokenKind};

fn concat(sql: &str) -> String {
    tokenize(sql).iter().map(|t| t.text).collect()
}

#[test]
fn tokens_cover_the_input() {
    for sql in [
        "SELECT * FROM users",
        "  select\t*\n  from users -- trailing\n",
        "SELECT /* hint */ a, 'it''s', \"x\", `y z` FROM t WHERE a <> 1.5e3",
        "SELECT a||b, c<=>d, e::int, f[0] FROM t;",
        "",
    ] {
        assert_eq!(concat(sql), sql);
    }
}

#[test]
fn token_indexes_are_positions() {
    let tokens = tokenize("SELECT a -- c\nFROM t");
    for (i, token) in tokens.iter().enumerate() {
        assert_eq!(token.index, i);
    }
    assert!(tokens.last().unwrap().is_eof());
}

#[test]
fn spans_index_the_source() {
    let sql = "SELECT naïve FROM t";
    for token in tokenize(sql) {
        assert_eq!(&sql[token.span.start..token.span.end], token.text);
    }
}

#[test]
fn line_comment_excludes_newline() {
    let tokens = tokenize("a -- note\nb");
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier,
            TokenKind::Whitespace,
            TokenKind::LineComment,
            TokenKind::Whitespace,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
    assert_eq!(tokens[2].text, "-- note");
}

#[test]
fn keywords_are_case_insensitive() {
    let tokens = tokenize("select SeLeCt SELECT");
    assert!(tokens
        .iter()
        .filter(|t| !t.is_trivia() && !t.is_eof())
        .all(|t| t.as_keyword() == Some(Keyword::Select)));
}

#[test]
fn lex_errors() {
    let cases = [
        ("SELECT 'open", LexErrorKind::UnterminatedString, 7),
        ("SELECT `open", LexErrorKind::UnterminatedQuotedIdentifier, 7),
        ("SELECT /* open", LexErrorKind::UnterminatedComment, 7),
        ("SELECT #", LexErrorKind::UnexpectedCharacter('#'), 7),
    ];
    for (sql, kind, offset) in cases {
        let err = Lexer::new(sql).tokenize().unwrap_err();
        assert_eq!(err.kind, kind, "{sql}");
        assert_eq!(err.offset, offset, "{sql}");
    }
}
