//! Token types for the SQL lexer.

use super::Span;

/// SQL keywords recognised by the parser.
///
/// Only words that drive statement structure are keywords. Everything else
/// (function names, type names, `DATE`, `DAY`, ...) is lexed as an
/// identifier. Keywords that are not [reserved](Keyword::is_reserved) may
/// still be used as identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Queries
    Select,
    From,
    Where,
    Group,
    By,
    Having,
    Order,
    Limit,
    Offset,
    Distinct,
    All,
    With,
    As,

    // Joins
    Join,
    Inner,
    Left,
    Right,
    Full,
    Outer,
    Cross,
    Semi,
    Anti,
    On,
    Using,
    Lateral,
    View,

    // Set operations
    Union,
    Intersect,
    Except,
    Minus,

    // Hive distribution clauses
    Cluster,
    Distribute,
    Sort,

    // Ordering
    Asc,
    Desc,
    Nulls,
    First,
    Last,

    // DML
    Insert,
    Into,
    Overwrite,
    Table,
    Partition,
    Values,
    Update,
    Set,
    Delete,

    // DDL
    Create,
    Temporary,
    External,
    Replace,
    If,

    // Utility statements
    Explain,
    Drop,
    Alter,
    Show,
    Describe,
    Use,
    Truncate,

    // Expressions
    And,
    Or,
    Not,
    In,
    Between,
    Like,
    Rlike,
    Regexp,
    Is,
    Null,
    True,
    False,
    Exists,
    Case,
    When,
    Then,
    Else,
    End,
    Cast,
    Interval,
    Over,
    Rows,
    Range,
}

impl Keyword {
    /// Attempts to parse a keyword from a string (case-insensitive).
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "SELECT" => Some(Self::Select),
            "FROM" => Some(Self::From),
            "WHERE" => Some(Self::Where),
            "GROUP" => Some(Self::Group),
            "BY" => Some(Self::By),
            "HAVING" => Some(Self::Having),
            "ORDER" => Some(Self::Order),
            "LIMIT" => Some(Self::Limit),
            "OFFSET" => Some(Self::Offset),
            "DISTINCT" => Some(Self::Distinct),
            "ALL" => Some(Self::All),
            "WITH" => Some(Self::With),
            "AS" => Some(Self::As),
            "JOIN" => Some(Self::Join),
            "INNER" => Some(Self::Inner),
            "LEFT" => Some(Self::Left),
            "RIGHT" => Some(Self::Right),
            "FULL" => Some(Self::Full),
            "OUTER" => Some(Self::Outer),
            "CROSS" => Some(Self::Cross),
            "SEMI" => Some(Self::Semi),
            "ANTI" => Some(Self::Anti),
            "ON" => Some(Self::On),
            "USING" => Some(Self::Using),
            "LATERAL" => Some(Self::Lateral),
            "VIEW" => Some(Self::View),
            "UNION" => Some(Self::Union),
            "INTERSECT" => Some(Self::Intersect),
            "EXCEPT" => Some(Self::Except),
            "MINUS" => Some(Self::Minus),
            "CLUSTER" => Some(Self::Cluster),
            "DISTRIBUTE" => Some(Self::Distribute),
            "SORT" => Some(Self::Sort),
            "ASC" => Some(Self::Asc),
            "DESC" => Some(Self::Desc),
            "NULLS" => Some(Self::Nulls),
            "FIRST" => Some(Self::First),
            "LAST" => Some(Self::Last),
            "INSERT" => Some(Self::Insert),
            "INTO" => Some(Self::Into),
            "OVERWRITE" => Some(Self::Overwrite),
            "TABLE" => Some(Self::Table),
            "PARTITION" => Some(Self::Partition),
            "VALUES" => Some(Self::Values),
            "UPDATE" => Some(Self::Update),
            "SET" => Some(Self::Set),
            "DELETE" => Some(Self::Delete),
            "CREATE" => Some(Self::Create),
            "TEMPORARY" => Some(Self::Temporary),
            "EXTERNAL" => Some(Self::External),
            "REPLACE" => Some(Self::Replace),
            "IF" => Some(Self::If),
            "EXPLAIN" => Some(Self::Explain),
            "DROP" => Some(Self::Drop),
            "ALTER" => Some(Self::Alter),
            "SHOW" => Some(Self::Show),
            "DESCRIBE" => Some(Self::Describe),
            "USE" => Some(Self::Use),
            "TRUNCATE" => Some(Self::Truncate),
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            "NOT" => Some(Self::Not),
            "IN" => Some(Self::In),
            "BETWEEN" => Some(Self::Between),
            "LIKE" => Some(Self::Like),
            "RLIKE" => Some(Self::Rlike),
            "REGEXP" => Some(Self::Regexp),
            "IS" => Some(Self::Is),
            "NULL" => Some(Self::Null),
            "TRUE" => Some(Self::True),
            "FALSE" => Some(Self::False),
            "EXISTS" => Some(Self::Exists),
            "CASE" => Some(Self::Case),
            "WHEN" => Some(Self::When),
            "THEN" => Some(Self::Then),
            "ELSE" => Some(Self::Else),
            "END" => Some(Self::End),
            "CAST" => Some(Self::Cast),
            "INTERVAL" => Some(Self::Interval),
            "OVER" => Some(Self::Over),
            "ROWS" => Some(Self::Rows),
            "RANGE" => Some(Self::Range),
            _ => None,
        }
    }

    /// Returns the keyword as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::From => "FROM",
            Self::Where => "WHERE",
            Self::Group => "GROUP",
            Self::By => "BY",
            Self::Having => "HAVING",
            Self::Order => "ORDER",
            Self::Limit => "LIMIT",
            Self::Offset => "OFFSET",
            Self::Distinct => "DISTINCT",
            Self::All => "ALL",
            Self::With => "WITH",
            Self::As => "AS",
            Self::Join => "JOIN",
            Self::Inner => "INNER",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Full => "FULL",
            Self::Outer => "OUTER",
            Self::Cross => "CROSS",
            Self::Semi => "SEMI",
            Self::Anti => "ANTI",
            Self::On => "ON",
            Self::Using => "USING",
            Self::Lateral => "LATERAL",
            Self::View => "VIEW",
            Self::Union => "UNION",
            Self::Intersect => "INTERSECT",
            Self::Except => "EXCEPT",
            Self::Minus => "MINUS",
            Self::Cluster => "CLUSTER",
            Self::Distribute => "DISTRIBUTE",
            Self::Sort => "SORT",
            Self::Asc => "ASC",
            Self::Desc => "DESC",
            Self::Nulls => "NULLS",
            Self::First => "FIRST",
            Self::Last => "LAST",
            Self::Insert => "INSERT",
            Self::Into => "INTO",
            Self::Overwrite => "OVERWRITE",
            Self::Table => "TABLE",
            Self::Partition => "PARTITION",
            Self::Values => "VALUES",
            Self::Update => "UPDATE",
            Self::Set => "SET",
            Self::Delete => "DELETE",
            Self::Create => "CREATE",
            Self::Temporary => "TEMPORARY",
            Self::External => "EXTERNAL",
            Self::Replace => "REPLACE",
            Self::If => "IF",
            Self::Explain => "EXPLAIN",
            Self::Drop => "DROP",
            Self::Alter => "ALTER",
            Self::Show => "SHOW",
            Self::Describe => "DESCRIBE",
            Self::Use => "USE",
            Self::Truncate => "TRUNCATE",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::In => "IN",
            Self::Between => "BETWEEN",
            Self::Like => "LIKE",
            Self::Rlike => "RLIKE",
            Self::Regexp => "REGEXP",
            Self::Is => "IS",
            Self::Null => "NULL",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Exists => "EXISTS",
            Self::Case => "CASE",
            Self::When => "WHEN",
            Self::Then => "THEN",
            Self::Else => "ELSE",
            Self::End => "END",
            Self::Cast => "CAST",
            Self::Interval => "INTERVAL",
            Self::Over => "OVER",
            Self::Rows => "ROWS",
            Self::Range => "RANGE",
        }
    }

    /// Returns true if the keyword can never be used as an identifier or alias.
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        matches!(
            self,
            Self::Select
                | Self::From
                | Self::Where
                | Self::Group
                | Self::By
                | Self::Having
                | Self::Order
                | Self::Limit
                | Self::Distinct
                | Self::All
                | Self::With
                | Self::As
                | Self::Join
                | Self::Inner
                | Self::Left
                | Self::Right
                | Self::Full
                | Self::Outer
                | Self::Cross
                | Self::On
                | Self::Using
                | Self::Lateral
                | Self::Union
                | Self::Intersect
                | Self::Except
                | Self::Minus
                | Self::Cluster
                | Self::Distribute
                | Self::Sort
                | Self::Insert
                | Self::Into
                | Self::Table
                | Self::Values
                | Self::Set
                | Self::Create
                | Self::And
                | Self::Or
                | Self::Not
                | Self::In
                | Self::Between
                | Self::Like
                | Self::Rlike
                | Self::Regexp
                | Self::Is
                | Self::Null
                | Self::True
                | Self::False
                | Self::Exists
                | Self::Case
                | Self::When
                | Self::Then
                | Self::Else
                | Self::End
                | Self::Cast
                | Self::Interval
                | Self::Over
        )
    }
}

/// The kind of token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    /// Numeric literal (e.g., 42, 3.14, 1e10, 100L)
    Number,
    /// String literal (e.g., 'hello')
    String,

    // Identifiers and keywords
    /// Bare identifier (e.g., column_name)
    Identifier,
    /// Quoted identifier (e.g., `column name` or "column name")
    QuotedIdentifier,
    /// SQL keyword
    Keyword(Keyword),

    // Operators
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// =
    Eq,
    /// ==
    EqEq,
    /// != or <>
    NotEq,
    /// <=>
    NullSafeEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,
    /// ||
    Concat,
    /// &
    BitAnd,
    /// |
    BitOr,
    /// ^
    BitXor,
    /// ~
    BitNot,
    /// !
    Bang,
    /// <<
    LeftShift,
    /// >>
    RightShift,

    // Delimiters
    /// (
    LeftParen,
    /// )
    RightParen,
    /// [
    LeftBracket,
    /// ]
    RightBracket,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,
    /// :
    Colon,
    /// ::
    DoubleColon,
    /// ?
    Question,
    /// @
    At,

    // Trivia
    /// A run of whitespace.
    Whitespace,
    /// `-- ...` up to (not including) the line break.
    LineComment,
    /// `/* ... */`
    BlockComment,

    // Special
    /// End of input
    Eof,
}

impl TokenKind {
    /// Returns true for whitespace and comments.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(
            self,
            Self::Whitespace | Self::LineComment | Self::BlockComment
        )
    }
}

/// A token with its original text and location in the source code.
///
/// Tokens borrow their text from the input, so concatenating the text of
/// every token of one [`Lexer::tokenize`](super::Lexer::tokenize) call
/// reproduces the input byte for byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// The kind of token.
    pub kind: TokenKind,
    /// The source text of the token, with its original case.
    pub text: &'a str,
    /// The location in the source code.
    pub span: Span,
    /// Position of the token in the token stream.
    pub index: usize,
}

impl<'a> Token<'a> {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, text: &'a str, span: Span, index: usize) -> Self {
        Self {
            kind,
            text,
            span,
            index,
        }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns true if this is whitespace or a comment.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match self.kind {
            TokenKind::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    /// Returns a short human-readable description for diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        if self.is_eof() {
            String::from("end of input")
        } else {
            format!("`{}`", self.text)
        }
    }
}
