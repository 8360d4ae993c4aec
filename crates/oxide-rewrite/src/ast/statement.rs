//! SQL statement AST types.
//!
//! Nodes that the rewriter edits around carry token indices into the token
//! stream they were parsed from, so that edits can be anchored to exact
//! source positions.

use super::expression::{Expr, FunctionCall};
use super::types::ColumnDef;
use crate::lexer::{Keyword, Span, Token, TokenKind, TokenRange};

/// An identifier, with quotes removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    /// The identifier text, unquoted and unescaped.
    pub value: String,
    /// Whether it was written in backticks or double quotes.
    pub quoted: bool,
}

impl Ident {
    /// Creates an unquoted identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quoted: false,
        }
    }

    /// Builds an identifier from an identifier, quoted identifier or
    /// keyword token.
    #[must_use]
    pub fn from_token(token: &Token<'_>) -> Self {
        if token.kind != TokenKind::QuotedIdentifier || token.text.len() < 2 {
            return Self::new(token.text);
        }
        let quote = &token.text[..1];
        let inner = &token.text[1..token.text.len() - 1];
        Self {
            value: inner.replace(&quote.repeat(2), quote),
            quoted: true,
        }
    }

    /// Returns the case-folded form used for comparisons.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.value.to_lowercase()
    }
}

/// A possibly qualified table name (`users`, `sales.orders`, `` `db`.`t` ``).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName {
    /// Name parts, outermost qualifier first.
    pub parts: Vec<Ident>,
    /// The name as written, without any whitespace or comments between parts.
    pub raw: String,
    /// Lower-cased, unquoted parts joined with `.`, for display and logs.
    ///
    /// Not unique: `` `a.b` `` and `a.b` share it. Use [`TableName::matches`]
    /// to compare names.
    pub normalized: String,
    /// Tokens of the name.
    pub range: TokenRange,
    /// Source location of the name.
    pub span: Span,
}

impl TableName {
    /// Creates a table name from its parts and location.
    #[must_use]
    pub fn new(parts: Vec<Ident>, raw: String, range: TokenRange, span: Span) -> Self {
        let normalized = parts
            .iter()
            .map(Ident::normalized)
            .collect::<Vec<_>>()
            .join(".");
        Self {
            parts,
            raw,
            normalized,
            range,
            span,
        }
    }

    /// Returns true if both names refer to the same table.
    ///
    /// Parts are compared one by one, ignoring case, so `sales.orders` does
    /// not match `orders` and the single identifier `` `a.b` `` does not
    /// match `a.b`.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.parts.len() == other.parts.len()
            && self
                .parts
                .iter()
                .zip(&other.parts)
                .all(|(a, b)| a.normalized() == b.normalized())
    }
}

/// Order direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Ascending order (default).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

/// Null ordering for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullOrdering {
    /// NULLs come first.
    First,
    /// NULLs come last.
    Last,
}

/// An ORDER BY (or SORT BY) entry.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    /// The expression to order by.
    pub expr: Expr,
    /// The direction (ASC or DESC).
    pub direction: OrderDirection,
    /// Null ordering (optional).
    pub nulls: Option<NullOrdering>,
}

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// `[INNER] JOIN`.
    Inner,
    /// `LEFT [OUTER] JOIN`.
    Left,
    /// `RIGHT [OUTER] JOIN`.
    Right,
    /// `FULL [OUTER] JOIN`.
    Full,
    /// `CROSS JOIN`.
    Cross,
    /// `LEFT SEMI JOIN` (Hive).
    LeftSemi,
    /// `LEFT ANTI JOIN` (Hive).
    LeftAnti,
    /// Implicit join, `FROM a, b`.
    Comma,
}

impl JoinType {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
            Self::Cross => "CROSS JOIN",
            Self::LeftSemi => "LEFT SEMI JOIN",
            Self::LeftAnti => "LEFT ANTI JOIN",
            Self::Comma => ",",
        }
    }
}

/// How a joined source is matched against the sources before it.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinConstraint {
    /// `ON condition`.
    On(Expr),
    /// `USING (columns)`.
    Using(Vec<Ident>),
    /// No constraint (cross join, comma join, or Hive's implicit form).
    None,
}

/// One `JOIN` segment of a FROM clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    /// The type of join.
    pub join_type: JoinType,
    /// The joined source.
    pub source: TableSource,
    /// The join condition.
    pub constraint: JoinConstraint,
    /// Tokens from the join keyword to the end of the constraint.
    pub range: TokenRange,
}

/// `LATERAL VIEW [OUTER] fn(args) alias [AS col, ...]` (Hive).
#[derive(Debug, Clone, PartialEq)]
pub struct LateralView {
    /// Whether `OUTER` was specified.
    pub outer: bool,
    /// The generator function.
    pub function: FunctionCall,
    /// Table alias of the generated rows.
    pub alias: Ident,
    /// Column aliases.
    pub columns: Vec<Ident>,
    /// Tokens of the whole lateral view.
    pub range: TokenRange,
}

/// A single source in a FROM clause or join.
#[derive(Debug, Clone, PartialEq)]
pub enum TableSource {
    /// A table name.
    Table {
        /// The table name.
        name: TableName,
        /// Alias.
        alias: Option<Ident>,
    },
    /// A parenthesized subquery.
    Subquery {
        /// The subquery.
        query: Box<Query>,
        /// Alias.
        alias: Option<Ident>,
    },
    /// A parenthesized join group, `(a JOIN b ON ...)`.
    Nested(Box<JoinedSource>),
}

impl TableSource {
    /// Returns the left-most base table of this source, if it has one.
    #[must_use]
    pub fn base_table(&self) -> Option<&TableName> {
        match self {
            Self::Table { name, .. } => Some(name),
            Self::Subquery { .. } => None,
            Self::Nested(joined) => joined.source.base_table(),
        }
    }
}

/// A source followed by its join chain.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedSource {
    /// The left-most source.
    pub source: TableSource,
    /// Joins applied to it, in order.
    pub joins: Vec<Join>,
}

/// A `FROM` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct FromClause {
    /// Index of the `FROM` keyword token.
    pub from_token: usize,
    /// The left-most source.
    pub source: TableSource,
    /// Joins, in order.
    pub joins: Vec<Join>,
    /// Lateral views, in order.
    pub lateral_views: Vec<LateralView>,
    /// Tokens from `FROM` through the last join or lateral view.
    pub range: TokenRange,
}

impl FromClause {
    /// Returns the clause's home table: the left-most base table, before
    /// any join.
    #[must_use]
    pub fn base_table(&self) -> Option<&TableName> {
        self.source.base_table()
    }
}

/// A `WHERE` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    /// Index of the `WHERE` keyword token.
    pub keyword: usize,
    /// The boolean condition.
    pub condition: Expr,
    /// Index of the first token of the condition.
    pub start: usize,
    /// Index of the last token of the condition.
    pub end: usize,
}

impl WhereClause {
    /// Returns the tokens covered by the clause, keyword included.
    #[must_use]
    pub const fn range(&self) -> TokenRange {
        TokenRange::new(self.keyword, self.end)
    }
}

/// A column in SELECT clause.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectColumn {
    /// The expression.
    pub expr: Expr,
    /// Column alias.
    pub alias: Option<Ident>,
}

/// A single `SELECT ... FROM ... WHERE ... GROUP BY ... HAVING ...` block.
///
/// `from` and `where_clause` are siblings here: the WHERE clause that
/// filters a FROM clause is found on the same node, never inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    /// Whether to select DISTINCT values.
    pub distinct: bool,
    /// The columns to select.
    pub columns: Vec<SelectColumn>,
    /// The FROM clause.
    pub from: Option<FromClause>,
    /// The WHERE clause.
    pub where_clause: Option<WhereClause>,
    /// GROUP BY expressions.
    pub group_by: Vec<Expr>,
    /// HAVING clause.
    pub having: Option<Expr>,
    /// Tokens of the whole block.
    pub range: TokenRange,
}

/// Set operators combining query bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    /// UNION
    Union,
    /// INTERSECT
    Intersect,
    /// EXCEPT
    Except,
    /// MINUS (Hive synonym of EXCEPT)
    Minus,
}

/// The body of a query: one block or a combination of blocks.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryBody {
    /// A single SELECT block.
    Select(Box<SelectStatement>),
    /// A parenthesized query.
    Nested(Box<Query>),
    /// `left <op> [ALL|DISTINCT] right`.
    SetOperation {
        /// Left operand.
        left: Box<QueryBody>,
        /// Operator.
        op: SetOperator,
        /// Whether ALL was specified.
        all: bool,
        /// Right operand.
        right: Box<QueryBody>,
    },
}

/// A common table expression, `name [(cols)] AS (query)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cte {
    /// CTE name.
    pub name: Ident,
    /// Column aliases.
    pub columns: Vec<Ident>,
    /// The defining query.
    pub query: Box<Query>,
}

/// `LIMIT count [OFFSET offset]` or Hive's `LIMIT offset, count`.
#[derive(Debug, Clone, PartialEq)]
pub struct Limit {
    /// Maximum number of rows.
    pub count: Expr,
    /// Rows to skip.
    pub offset: Option<Expr>,
}

/// A full query: CTEs, body, and the clauses that apply to the whole result.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// WITH clause.
    pub with: Vec<Cte>,
    /// The query body.
    pub body: QueryBody,
    /// ORDER BY clauses.
    pub order_by: Vec<OrderBy>,
    /// CLUSTER BY expressions (Hive).
    pub cluster_by: Vec<Expr>,
    /// DISTRIBUTE BY expressions (Hive).
    pub distribute_by: Vec<Expr>,
    /// SORT BY clauses (Hive).
    pub sort_by: Vec<OrderBy>,
    /// LIMIT clause.
    pub limit: Option<Limit>,
    /// Tokens of the whole query.
    pub range: TokenRange,
}

impl Query {
    /// Returns the first SELECT block of the body, descending into nested
    /// queries and the left side of set operations.
    #[must_use]
    pub fn first_select(&self) -> &SelectStatement {
        self.body.first_select()
    }
}

impl QueryBody {
    /// Returns the left-most SELECT block.
    #[must_use]
    pub fn first_select(&self) -> &SelectStatement {
        match self {
            Self::Select(select) => select,
            Self::Nested(query) => query.first_select(),
            Self::SetOperation { left, .. } => left.first_select(),
        }
    }
}

/// Source of data for INSERT.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    /// VALUES (...), (...), ...
    Values(Vec<Vec<Expr>>),
    /// A query.
    Query(Box<Query>),
}

/// An INSERT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    /// Whether this is `INSERT OVERWRITE`.
    pub overwrite: bool,
    /// Target table.
    pub table: TableName,
    /// Tokens of the `PARTITION (...)` spec, if any.
    pub partition: Option<TokenRange>,
    /// Column names (optional).
    pub columns: Vec<Ident>,
    /// Values to insert.
    pub source: InsertSource,
}

/// What a CREATE statement creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateObject {
    /// CREATE TABLE
    Table,
    /// CREATE VIEW
    View,
}

/// A CREATE TABLE or CREATE VIEW statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateStatement {
    /// Object kind.
    pub object: CreateObject,
    /// `OR REPLACE`
    pub or_replace: bool,
    /// `TEMPORARY`
    pub temporary: bool,
    /// `EXTERNAL`
    pub external: bool,
    /// `IF NOT EXISTS`
    pub if_not_exists: bool,
    /// Name of the created object.
    pub name: TableName,
    /// Column definitions (tables only).
    pub columns: Vec<ColumnDef>,
    /// Tokens of table options (`PARTITIONED BY`, `STORED AS`, ...), if any.
    pub options: Option<TokenRange>,
    /// `AS query`.
    pub query: Option<Box<Query>>,
}

/// An assignment in UPDATE SET.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateAssignment {
    /// Column name.
    pub column: Ident,
    /// Value expression.
    pub value: Expr,
}

/// An UPDATE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    /// Table name.
    pub table: TableName,
    /// Alias.
    pub alias: Option<Ident>,
    /// SET assignments.
    pub assignments: Vec<UpdateAssignment>,
    /// WHERE clause.
    pub where_clause: Option<WhereClause>,
}

/// A DELETE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    /// Table name.
    pub table: TableName,
    /// WHERE clause.
    pub where_clause: Option<WhereClause>,
}

/// An EXPLAIN statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplainStatement {
    /// Options such as `EXTENDED` or `FORMATTED`.
    pub options: Vec<Ident>,
    /// The explained statement.
    pub statement: Box<Statement>,
}

/// A statement without query structure (`DROP`, `SHOW`, `SET`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtilityStatement {
    /// The leading keyword.
    pub keyword: Keyword,
    /// Tokens of the whole statement.
    pub range: TokenRange,
}

/// A SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// SELECT query (with optional CTEs and set operations).
    Select(Query),
    /// INSERT statement.
    Insert(InsertStatement),
    /// CREATE TABLE / CREATE VIEW statement.
    Create(CreateStatement),
    /// UPDATE statement.
    Update(UpdateStatement),
    /// DELETE statement.
    Delete(DeleteStatement),
    /// EXPLAIN statement.
    Explain(ExplainStatement),
    /// Utility statement, passed through untouched.
    Utility(UtilityStatement),
}

impl Statement {
    /// Returns a short name of the statement kind, for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Select(_) => "SELECT",
            Self::Insert(_) => "INSERT",
            Self::Create(CreateStatement {
                object: CreateObject::Table,
                ..
            }) => "CREATE TABLE",
            Self::Create(CreateStatement {
                object: CreateObject::View,
                ..
            }) => "CREATE VIEW",
            Self::Update(_) => "UPDATE",
            Self::Delete(_) => "DELETE",
            Self::Explain(_) => "EXPLAIN",
            Self::Utility(utility) => utility.keyword.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(parts: &[&str]) -> TableName {
        TableName::new(
            parts.iter().map(|p| Ident::new(*p)).collect(),
            parts.join("."),
            TokenRange::new(0, 0),
            Span::default(),
        )
    }

    #[test]
    fn test_join_type() {
        assert_eq!(JoinType::Inner.as_str(), "INNER JOIN");
        assert_eq!(JoinType::LeftSemi.as_str(), "LEFT SEMI JOIN");
    }

    #[test]
    fn test_ident_from_quoted_token() {
        let token = Token::new(TokenKind::QuotedIdentifier, "`we``ird`", Span::new(0, 9), 0);
        let ident = Ident::from_token(&token);
        assert_eq!(ident.value, "we`ird");
        assert!(ident.quoted);
    }

    #[test]
    fn test_ident_from_bare_token() {
        let token = Token::new(TokenKind::Identifier, "Users", Span::new(0, 5), 0);
        let ident = Ident::from_token(&token);
        assert_eq!(ident.value, "Users");
        assert!(!ident.quoted);
        assert_eq!(ident.normalized(), "users");
    }

    #[test]
    fn test_table_name_normalized() {
        let table = name(&["Sales", "ORDERS"]);
        assert_eq!(table.normalized, "sales.orders");
        assert_eq!(table.parts[1].value, "ORDERS");
    }

    #[test]
    fn test_table_name_matches_full_qualified_name() {
        assert!(name(&["sales", "orders"]).matches(&name(&["SALES", "Orders"])));
        assert!(!name(&["sales", "orders"]).matches(&name(&["orders"])));
        assert!(!name(&["orders"]).matches(&name(&["sales", "orders"])));
    }

    #[test]
    fn test_dotted_quoted_name_is_one_part() {
        let dotted = TableName::new(
            vec![Ident {
                value: String::from("a.b"),
                quoted: true,
            }],
            String::from("`a.b`"),
            TokenRange::new(0, 0),
            Span::new(0, 5),
        );
        let qualified = name(&["a", "b"]);
        assert_eq!(dotted.normalized, qualified.normalized);
        assert!(!dotted.matches(&qualified));
        assert!(!qualified.matches(&dotted));
        assert!(dotted.matches(&dotted.clone()));
    }

    #[test]
    fn test_table_source_base_table() {
        let nested = TableSource::Nested(Box::new(JoinedSource {
            source: TableSource::Table {
                name: name(&["users"]),
                alias: None,
            },
            joins: vec![],
        }));
        assert_eq!(nested.base_table().map(|t| t.normalized.as_str()), Some("users"));
    }
}
