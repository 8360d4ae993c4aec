//! SQL Parser implementation.

use super::error::SyntaxError;
use super::pratt::{
    infix_binding_power, prefix_binding_power, token_to_binary_op, token_to_unary_op,
    UNARY_BINDING_POWER,
};
use crate::ast::{
    BinaryOp, ColumnDef, CreateObject, CreateStatement, Cte, DataType, DeleteStatement,
    ExplainStatement, Expr, FromClause, FunctionCall, Ident, InsertSource, InsertStatement, Join,
    JoinConstraint, JoinType, JoinedSource, LateralView, Limit, Literal, NullOrdering, OrderBy,
    OrderDirection, Query, QueryBody, SelectColumn, SelectStatement, SetOperator, Statement,
    TableName, TableSource, UnaryOp, UpdateAssignment, UpdateStatement, UtilityStatement,
    WhereClause, WindowSpec,
};
use crate::lexer::{Keyword, Span, Token, TokenKind, TokenRange};

/// Default limit on nested queries and parenthesized expressions.
///
/// Deep enough for hand-written and generated Hive queries, and shallow
/// enough to parse on a 2 MiB thread stack in debug builds.
pub const MAX_DEPTH: usize = 64;

/// SQL Parser.
///
/// Works over the full token stream produced by
/// [`Lexer::tokenize`](crate::lexer::Lexer::tokenize), trivia included. The
/// cursor steps over whitespace and comments, so the tree only references
/// significant tokens, by their index in that stream.
pub struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    /// Position of the current significant token in `tokens`.
    pos: usize,
    /// Index of the last consumed significant token.
    previous: usize,
    /// Returned once the cursor runs past the end of `tokens`.
    eof: Token<'a>,
    /// Parameter counter for ? placeholders.
    param_counter: usize,
    depth: usize,
    max_depth: usize,
}

impl<'t, 'a> Parser<'t, 'a> {
    /// Creates a new parser over the given tokens.
    #[must_use]
    pub fn new(tokens: &'t [Token<'a>]) -> Self {
        let end = tokens.last().map_or(0, |token| token.span.end);
        let mut parser = Self {
            tokens,
            pos: 0,
            previous: 0,
            eof: Token::new(TokenKind::Eof, "", Span::new(end, end), tokens.len()),
            param_counter: 0,
            depth: 0,
            max_depth: MAX_DEPTH,
        };
        parser.skip_trivia();
        parser
    }

    /// Sets the nesting limit for queries and expressions.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parses a single SQL statement, optionally terminated by `;`.
    ///
    /// # Errors
    ///
    /// Returns a `SyntaxError` if the tokens do not form exactly one
    /// recognised statement.
    pub fn parse_statement(&mut self) -> Result<Statement, SyntaxError> {
        let statement = self.parse_statement_inner()?;
        if self.check(TokenKind::Semicolon) {
            self.advance();
        }
        self.expect_end("end of statement")?;
        Ok(statement)
    }

    /// Parses a standalone, possibly qualified table name.
    ///
    /// # Errors
    ///
    /// Returns a `SyntaxError` if the tokens are not exactly one table name.
    pub fn parse_table_name_only(&mut self) -> Result<TableName, SyntaxError> {
        let name = self.parse_table_name()?;
        self.expect_end("end of table name")?;
        Ok(name)
    }

    /// Parses a standalone boolean condition, as found after `WHERE`.
    ///
    /// # Errors
    ///
    /// Returns a `SyntaxError` if the tokens are not exactly one expression.
    pub fn parse_condition(&mut self) -> Result<Expr, SyntaxError> {
        let expr = self.parse_expression(0)?;
        self.expect_end("end of condition")?;
        Ok(expr)
    }

    fn parse_statement_inner(&mut self) -> Result<Statement, SyntaxError> {
        self.nested(|p| match p.current().kind {
            TokenKind::Keyword(Keyword::Select | Keyword::With) | TokenKind::LeftParen => {
                Ok(Statement::Select(p.parse_query()?))
            }
            TokenKind::Keyword(Keyword::Insert) => Ok(Statement::Insert(p.parse_insert()?)),
            TokenKind::Keyword(Keyword::Create) => Ok(Statement::Create(p.parse_create()?)),
            TokenKind::Keyword(Keyword::Update) => Ok(Statement::Update(p.parse_update()?)),
            TokenKind::Keyword(Keyword::Delete) => Ok(Statement::Delete(p.parse_delete()?)),
            TokenKind::Keyword(Keyword::Explain) => Ok(Statement::Explain(p.parse_explain()?)),
            TokenKind::Keyword(
                keyword @ (Keyword::Drop
                | Keyword::Alter
                | Keyword::Show
                | Keyword::Describe
                | Keyword::Desc
                | Keyword::Use
                | Keyword::Set
                | Keyword::Truncate),
            ) => Ok(Statement::Utility(p.parse_utility(keyword)?)),
            _ => Err(SyntaxError::unexpected(
                "SELECT, WITH, INSERT, CREATE, UPDATE, DELETE, EXPLAIN or a utility statement",
                p.current(),
            )),
        })
    }

    // --- Queries ---

    /// Parses a query: `[WITH ...] body [ORDER BY ...] ... [LIMIT ...]`.
    fn parse_query(&mut self) -> Result<Query, SyntaxError> {
        self.nested(|p| {
            let start = p.current().index;

            let with = if p.check_keyword(Keyword::With) {
                p.advance();
                p.parse_ctes()?
            } else {
                vec![]
            };

            let body = p.parse_query_body()?;

            let order_by = if p.check_keyword(Keyword::Order) {
                p.advance();
                p.expect_keyword(Keyword::By)?;
                p.parse_order_by_list()?
            } else {
                vec![]
            };

            let cluster_by = if p.check_keyword(Keyword::Cluster) {
                p.advance();
                p.expect_keyword(Keyword::By)?;
                p.parse_expression_list()?
            } else {
                vec![]
            };

            let distribute_by = if p.check_keyword(Keyword::Distribute) {
                p.advance();
                p.expect_keyword(Keyword::By)?;
                p.parse_expression_list()?
            } else {
                vec![]
            };

            let sort_by = if p.check_keyword(Keyword::Sort) {
                p.advance();
                p.expect_keyword(Keyword::By)?;
                p.parse_order_by_list()?
            } else {
                vec![]
            };

            let limit = if p.check_keyword(Keyword::Limit) {
                p.advance();
                Some(p.parse_limit()?)
            } else {
                None
            };

            Ok(Query {
                with,
                body,
                order_by,
                cluster_by,
                distribute_by,
                sort_by,
                limit,
                range: TokenRange::new(start, p.previous),
            })
        })
    }

    /// Parses `name [(cols)] AS (query), ...` after `WITH`.
    fn parse_ctes(&mut self) -> Result<Vec<Cte>, SyntaxError> {
        let mut ctes = vec![];
        loop {
            let name = self.expect_identifier("CTE name")?;
            let columns = if self.check(TokenKind::LeftParen) {
                self.advance();
                let columns = self.parse_identifier_list()?;
                self.expect(TokenKind::RightParen, "`)`")?;
                columns
            } else {
                vec![]
            };
            self.expect_keyword(Keyword::As)?;
            self.expect(TokenKind::LeftParen, "`(`")?;
            let query = self.parse_query()?;
            self.expect(TokenKind::RightParen, "`)`")?;
            ctes.push(Cte {
                name,
                columns,
                query: Box::new(query),
            });

            if !self.check(TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(ctes)
    }

    /// Parses query terms joined by set operators, left to right.
    fn parse_query_body(&mut self) -> Result<QueryBody, SyntaxError> {
        let mut body = self.parse_query_term()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Keyword(Keyword::Union) => SetOperator::Union,
                TokenKind::Keyword(Keyword::Intersect) => SetOperator::Intersect,
                TokenKind::Keyword(Keyword::Except) => SetOperator::Except,
                TokenKind::Keyword(Keyword::Minus) => SetOperator::Minus,
                _ => break,
            };
            self.advance();

            let all = if self.check_keyword(Keyword::All) {
                self.advance();
                true
            } else {
                if self.check_keyword(Keyword::Distinct) {
                    self.advance();
                }
                false
            };

            let right = self.parse_query_term()?;
            body = QueryBody::SetOperation {
                left: Box::new(body),
                op,
                all,
                right: Box::new(right),
            };
        }
        Ok(body)
    }

    fn parse_query_term(&mut self) -> Result<QueryBody, SyntaxError> {
        if self.check(TokenKind::LeftParen) {
            self.advance();
            let query = self.parse_query()?;
            self.expect(TokenKind::RightParen, "`)`")?;
            return Ok(QueryBody::Nested(Box::new(query)));
        }
        Ok(QueryBody::Select(Box::new(self.parse_select()?)))
    }

    /// Parses a SELECT block.
    fn parse_select(&mut self) -> Result<SelectStatement, SyntaxError> {
        let start = self.expect_keyword(Keyword::Select)?;

        // DISTINCT or ALL
        let distinct = if self.check_keyword(Keyword::Distinct) {
            self.advance();
            true
        } else {
            if self.check_keyword(Keyword::All) {
                self.advance();
            }
            false
        };

        let columns = self.parse_select_columns()?;

        // FROM clause (optional for expressions like SELECT 1+1)
        let from = if self.check_keyword(Keyword::From) {
            Some(self.parse_from_clause()?)
        } else {
            None
        };

        let where_clause = self.parse_where_clause()?;

        let group_by = if self.check_keyword(Keyword::Group) {
            self.advance();
            self.expect_keyword(Keyword::By)?;
            self.parse_expression_list()?
        } else {
            vec![]
        };

        let having = if self.check_keyword(Keyword::Having) {
            self.advance();
            Some(self.parse_expression(0)?)
        } else {
            None
        };

        Ok(SelectStatement {
            distinct,
            columns,
            from,
            where_clause,
            group_by,
            having,
            range: TokenRange::new(start, self.previous),
        })
    }

    /// Parses SELECT columns.
    fn parse_select_columns(&mut self) -> Result<Vec<SelectColumn>, SyntaxError> {
        let mut columns = vec![];
        loop {
            let expr = self.parse_expression(0)?;
            let alias = self.parse_optional_alias()?;
            columns.push(SelectColumn { expr, alias });

            if !self.check(TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(columns)
    }

    /// Parses `LIMIT n [OFFSET m]` or `LIMIT m, n` after `LIMIT`.
    fn parse_limit(&mut self) -> Result<Limit, SyntaxError> {
        let first = self.parse_expression(0)?;
        if self.check(TokenKind::Comma) {
            self.advance();
            let count = self.parse_expression(0)?;
            return Ok(Limit {
                count,
                offset: Some(first),
            });
        }
        let offset = if self.check_keyword(Keyword::Offset) {
            self.advance();
            Some(self.parse_expression(0)?)
        } else {
            None
        };
        Ok(Limit {
            count: first,
            offset,
        })
    }

    fn parse_where_clause(&mut self) -> Result<Option<WhereClause>, SyntaxError> {
        if !self.check_keyword(Keyword::Where) {
            return Ok(None);
        }
        let keyword = self.current().index;
        self.advance();
        let start = self.current().index;
        let condition = self.parse_expression(0)?;
        Ok(Some(WhereClause {
            keyword,
            condition,
            start,
            end: self.previous,
        }))
    }

    // --- FROM clause ---

    fn parse_from_clause(&mut self) -> Result<FromClause, SyntaxError> {
        let from_token = self.expect_keyword(Keyword::From)?;
        let source = self.parse_table_source()?;

        let mut joins = vec![];
        let mut lateral_views = vec![];
        loop {
            if self.check_keyword(Keyword::Lateral) {
                lateral_views.push(self.parse_lateral_view()?);
            } else if let Some(join) = self.parse_join()? {
                joins.push(join);
            } else {
                break;
            }
        }

        Ok(FromClause {
            from_token,
            source,
            joins,
            lateral_views,
            range: TokenRange::new(from_token, self.previous),
        })
    }

    /// Parses a table reference: a table, a subquery or a join group.
    fn parse_table_source(&mut self) -> Result<TableSource, SyntaxError> {
        if !self.check(TokenKind::LeftParen) {
            let name = self.parse_table_name()?;
            let alias = self.parse_optional_alias()?;
            return Ok(TableSource::Table { name, alias });
        }

        if self.starts_query_after_parens() {
            self.advance();
            let query = self.parse_query()?;
            self.expect(TokenKind::RightParen, "`)`")?;
            let alias = self.parse_optional_alias()?;
            return Ok(TableSource::Subquery {
                query: Box::new(query),
                alias,
            });
        }

        self.advance();
        let joined = self.nested(Self::parse_joined_source)?;
        self.expect(TokenKind::RightParen, "`)`")?;
        Ok(TableSource::Nested(Box::new(joined)))
    }

    fn parse_joined_source(&mut self) -> Result<JoinedSource, SyntaxError> {
        let source = self.parse_table_source()?;
        let mut joins = vec![];
        while let Some(join) = self.parse_join()? {
            joins.push(join);
        }
        Ok(JoinedSource { source, joins })
    }

    /// Parses one join segment, or returns `None` if no join starts here.
    fn parse_join(&mut self) -> Result<Option<Join>, SyntaxError> {
        let start = self.current().index;
        let join_type = match self.current().kind {
            TokenKind::Comma => {
                self.advance();
                JoinType::Comma
            }
            TokenKind::Keyword(Keyword::Join) => {
                self.advance();
                JoinType::Inner
            }
            TokenKind::Keyword(Keyword::Inner) => {
                self.advance();
                self.expect_keyword(Keyword::Join)?;
                JoinType::Inner
            }
            TokenKind::Keyword(Keyword::Left) => {
                self.advance();
                let join_type = if self.check_keyword(Keyword::Semi) {
                    self.advance();
                    JoinType::LeftSemi
                } else if self.check_keyword(Keyword::Anti) {
                    self.advance();
                    JoinType::LeftAnti
                } else {
                    if self.check_keyword(Keyword::Outer) {
                        self.advance();
                    }
                    JoinType::Left
                };
                self.expect_keyword(Keyword::Join)?;
                join_type
            }
            TokenKind::Keyword(Keyword::Right) => {
                self.advance();
                if self.check_keyword(Keyword::Outer) {
                    self.advance();
                }
                self.expect_keyword(Keyword::Join)?;
                JoinType::Right
            }
            TokenKind::Keyword(Keyword::Full) => {
                self.advance();
                if self.check_keyword(Keyword::Outer) {
                    self.advance();
                }
                self.expect_keyword(Keyword::Join)?;
                JoinType::Full
            }
            TokenKind::Keyword(Keyword::Cross) => {
                self.advance();
                self.expect_keyword(Keyword::Join)?;
                JoinType::Cross
            }
            _ => return Ok(None),
        };

        let source = self.parse_table_source()?;

        let constraint = if self.check_keyword(Keyword::On) {
            self.advance();
            JoinConstraint::On(self.parse_expression(0)?)
        } else if self.check_keyword(Keyword::Using) {
            self.advance();
            self.expect(TokenKind::LeftParen, "`(`")?;
            let columns = self.parse_identifier_list()?;
            self.expect(TokenKind::RightParen, "`)`")?;
            JoinConstraint::Using(columns)
        } else {
            JoinConstraint::None
        };

        Ok(Some(Join {
            join_type,
            source,
            constraint,
            range: TokenRange::new(start, self.previous),
        }))
    }

    /// Parses `LATERAL VIEW [OUTER] fn(args) alias [AS col, ...]`.
    fn parse_lateral_view(&mut self) -> Result<LateralView, SyntaxError> {
        let start = self.expect_keyword(Keyword::Lateral)?;
        self.expect_keyword(Keyword::View)?;
        let outer = if self.check_keyword(Keyword::Outer) {
            self.advance();
            true
        } else {
            false
        };

        let name = self.parse_qualified_name("function name")?;
        let function = self.parse_function_call(name)?;
        let alias = self.expect_identifier("table alias")?;
        let columns = if self.check_keyword(Keyword::As) {
            self.advance();
            self.parse_identifier_list()?
        } else {
            vec![]
        };

        Ok(LateralView {
            outer,
            function,
            alias,
            columns,
            range: TokenRange::new(start, self.previous),
        })
    }

    /// Parses a possibly qualified table name.
    fn parse_table_name(&mut self) -> Result<TableName, SyntaxError> {
        let first = *self.current();
        let mut parts = vec![self.expect_identifier("table name")?];
        while self.check(TokenKind::Dot) {
            self.advance();
            parts.push(self.expect_identifier("table name")?);
        }

        let last = *self.token_at(self.previous);
        let raw: String = self.tokens[first.index..=last.index]
            .iter()
            .filter(|token| !token.is_trivia())
            .map(|token| token.text)
            .collect();

        Ok(TableName::new(
            parts,
            raw,
            TokenRange::new(first.index, last.index),
            Span::new(first.span.start, last.span.end),
        ))
    }

    /// Parses an optional alias (`AS name` or just `name`).
    fn parse_optional_alias(&mut self) -> Result<Option<Ident>, SyntaxError> {
        if self.check_keyword(Keyword::As) {
            self.advance();
            Ok(Some(self.expect_identifier("alias")?))
        } else if is_identifier(self.current()) {
            Ok(Some(self.expect_identifier("alias")?))
        } else {
            Ok(None)
        }
    }

    // --- Other statements ---

    /// Parses an INSERT statement.
    fn parse_insert(&mut self) -> Result<InsertStatement, SyntaxError> {
        self.expect_keyword(Keyword::Insert)?;

        let overwrite = if self.check_keyword(Keyword::Overwrite) {
            self.advance();
            self.expect_keyword(Keyword::Table)?;
            true
        } else {
            self.expect_keyword(Keyword::Into)?;
            if self.check_keyword(Keyword::Table) {
                self.advance();
            }
            false
        };

        let table = self.parse_table_name()?;

        let partition = if self.check_keyword(Keyword::Partition) {
            let start = self.current().index;
            self.advance();
            self.expect(TokenKind::LeftParen, "`(`")?;
            self.skip_balanced(|_| false)?;
            self.expect(TokenKind::RightParen, "`)`")?;
            Some(TokenRange::new(start, self.previous))
        } else {
            None
        };

        if self.check_keyword(Keyword::If) {
            self.advance();
            self.expect_keyword(Keyword::Not)?;
            self.expect_keyword(Keyword::Exists)?;
        }

        // Column list (optional), not to be confused with a parenthesized query
        let columns = if self.check(TokenKind::LeftParen) && !self.starts_query_after_parens() {
            self.advance();
            let columns = self.parse_identifier_list()?;
            self.expect(TokenKind::RightParen, "`)`")?;
            columns
        } else {
            vec![]
        };

        let source = if self.check_keyword(Keyword::Values) {
            self.advance();
            let mut rows = vec![];
            loop {
                self.expect(TokenKind::LeftParen, "`(`")?;
                let row = self.parse_expression_list()?;
                self.expect(TokenKind::RightParen, "`)`")?;
                rows.push(row);
                if !self.check(TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
            InsertSource::Values(rows)
        } else if matches!(
            self.current().kind,
            TokenKind::Keyword(Keyword::Select | Keyword::With) | TokenKind::LeftParen
        ) {
            InsertSource::Query(Box::new(self.parse_query()?))
        } else {
            return Err(SyntaxError::unexpected("VALUES or a query", self.current()));
        };

        Ok(InsertStatement {
            overwrite,
            table,
            partition,
            columns,
            source,
        })
    }

    /// Parses a CREATE TABLE or CREATE VIEW statement.
    fn parse_create(&mut self) -> Result<CreateStatement, SyntaxError> {
        self.expect_keyword(Keyword::Create)?;

        let or_replace = if self.check_keyword(Keyword::Or) {
            self.advance();
            self.expect_keyword(Keyword::Replace)?;
            true
        } else {
            false
        };
        let temporary = self.eat_keyword(Keyword::Temporary);
        let external = self.eat_keyword(Keyword::External);

        let object = match self.current().kind {
            TokenKind::Keyword(Keyword::Table) => CreateObject::Table,
            TokenKind::Keyword(Keyword::View) => CreateObject::View,
            _ => return Err(SyntaxError::unexpected("TABLE or VIEW", self.current())),
        };
        self.advance();

        let if_not_exists = if self.check_keyword(Keyword::If) {
            self.advance();
            self.expect_keyword(Keyword::Not)?;
            self.expect_keyword(Keyword::Exists)?;
            true
        } else {
            false
        };

        let name = self.parse_table_name()?;

        let mut columns = vec![];
        if self.check(TokenKind::LeftParen) && !self.starts_query_after_parens() {
            self.advance();
            if object == CreateObject::Table {
                columns = self.parse_column_defs()?;
            } else {
                self.skip_balanced(|_| false)?;
            }
            self.expect(TokenKind::RightParen, "`)`")?;
        }

        // PARTITIONED BY, STORED AS, LOCATION, TBLPROPERTIES, ...
        let options_start = self.current().index;
        self.skip_balanced(|p| {
            p.check(TokenKind::Semicolon)
                || (p.check_keyword(Keyword::As)
                    && matches!(
                        p.peek_kind(1),
                        TokenKind::Keyword(Keyword::Select | Keyword::With) | TokenKind::LeftParen
                    ))
        })?;
        let options =
            (self.current().index > options_start).then(|| TokenRange::new(options_start, self.previous));

        let query = if self.check_keyword(Keyword::As) {
            self.advance();
            Some(Box::new(self.parse_query()?))
        } else {
            None
        };

        if object == CreateObject::View && query.is_none() {
            return Err(SyntaxError::unexpected("AS query", self.current()));
        }

        Ok(CreateStatement {
            object,
            or_replace,
            temporary,
            external,
            if_not_exists,
            name,
            columns,
            options,
            query,
        })
    }

    /// Parses `name type [COMMENT '...'], ...` inside `CREATE TABLE (...)`.
    fn parse_column_defs(&mut self) -> Result<Vec<ColumnDef>, SyntaxError> {
        let mut columns = vec![];
        loop {
            let name = self.expect_identifier("column name")?;
            let data_type = self.parse_data_type()?;
            let comment = if self.current().kind == TokenKind::Identifier
                && self.current().text.eq_ignore_ascii_case("COMMENT")
            {
                self.advance();
                Some(self.expect_string()?)
            } else {
                None
            };
            columns.push(ColumnDef {
                name,
                data_type,
                comment,
            });

            if !self.check(TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(columns)
    }

    /// Parses an UPDATE statement.
    fn parse_update(&mut self) -> Result<UpdateStatement, SyntaxError> {
        self.expect_keyword(Keyword::Update)?;
        let table = self.parse_table_name()?;
        let alias = self.parse_optional_alias()?;

        self.expect_keyword(Keyword::Set)?;

        let mut assignments = vec![];
        loop {
            let column = self.expect_identifier("column name")?;
            self.expect(TokenKind::Eq, "`=`")?;
            let value = self.parse_expression(0)?;
            assignments.push(UpdateAssignment { column, value });

            if !self.check(TokenKind::Comma) {
                break;
            }
            self.advance();
        }

        let where_clause = self.parse_where_clause()?;

        Ok(UpdateStatement {
            table,
            alias,
            assignments,
            where_clause,
        })
    }

    /// Parses a DELETE statement.
    fn parse_delete(&mut self) -> Result<DeleteStatement, SyntaxError> {
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;
        let table = self.parse_table_name()?;
        let where_clause = self.parse_where_clause()?;
        Ok(DeleteStatement {
            table,
            where_clause,
        })
    }

    fn parse_explain(&mut self) -> Result<ExplainStatement, SyntaxError> {
        self.expect_keyword(Keyword::Explain)?;
        let mut options = vec![];
        while self.current().kind == TokenKind::Identifier {
            options.push(Ident::from_token(self.current()));
            self.advance();
        }
        let statement = self.parse_statement_inner()?;
        Ok(ExplainStatement {
            options,
            statement: Box::new(statement),
        })
    }

    fn parse_utility(&mut self, keyword: Keyword) -> Result<UtilityStatement, SyntaxError> {
        let start = self.current().index;
        self.advance();
        self.skip_balanced(|p| p.check(TokenKind::Semicolon))?;
        Ok(UtilityStatement {
            keyword,
            range: TokenRange::new(start, self.previous),
        })
    }

    // --- Expressions ---

    /// Parses an ORDER BY or SORT BY list.
    fn parse_order_by_list(&mut self) -> Result<Vec<OrderBy>, SyntaxError> {
        let mut items = vec![];
        loop {
            let expr = self.parse_expression(0)?;
            let direction = if self.check_keyword(Keyword::Desc) {
                self.advance();
                OrderDirection::Desc
            } else {
                if self.check_keyword(Keyword::Asc) {
                    self.advance();
                }
                OrderDirection::Asc
            };

            let nulls = if self.check_keyword(Keyword::Nulls) {
                self.advance();
                if self.eat_keyword(Keyword::First) {
                    Some(NullOrdering::First)
                } else {
                    self.expect_keyword(Keyword::Last)?;
                    Some(NullOrdering::Last)
                }
            } else {
                None
            };

            items.push(OrderBy {
                expr,
                direction,
                nulls,
            });

            if !self.check(TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(items)
    }

    /// Parses an expression using Pratt parsing.
    fn parse_expression(&mut self, min_bp: u8) -> Result<Expr, SyntaxError> {
        self.nested(|p| p.parse_expression_inner(min_bp))
    }

    fn parse_expression_inner(&mut self, min_bp: u8) -> Result<Expr, SyntaxError> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let kind = self.current().kind;
            let Some((l_bp, r_bp)) = infix_binding_power(&kind) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }

            lhs = match kind {
                TokenKind::Keyword(Keyword::Is) => {
                    self.advance();
                    let negated = self.eat_keyword(Keyword::Not);
                    let expr = Box::new(lhs);
                    match self.current().kind {
                        TokenKind::Keyword(Keyword::Null) => {
                            self.advance();
                            Expr::IsNull { expr, negated }
                        }
                        TokenKind::Keyword(kw @ (Keyword::True | Keyword::False)) => {
                            self.advance();
                            Expr::IsBool {
                                expr,
                                value: kw == Keyword::True,
                                negated,
                            }
                        }
                        _ => {
                            return Err(SyntaxError::unexpected(
                                "NULL, TRUE or FALSE",
                                self.current(),
                            ))
                        }
                    }
                }
                TokenKind::Keyword(Keyword::Not) => {
                    // Only NOT IN, NOT LIKE, NOT BETWEEN, ... in infix position
                    if !matches!(
                        self.peek_kind(1),
                        TokenKind::Keyword(
                            Keyword::In
                                | Keyword::Between
                                | Keyword::Like
                                | Keyword::Rlike
                                | Keyword::Regexp
                        )
                    ) {
                        break;
                    }
                    self.advance();
                    self.parse_negatable(lhs, r_bp, true)?
                }
                TokenKind::Keyword(
                    Keyword::In | Keyword::Between | Keyword::Like | Keyword::Rlike | Keyword::Regexp,
                ) => self.parse_negatable(lhs, r_bp, false)?,
                TokenKind::LeftBracket => {
                    self.advance();
                    let index = self.parse_expression(0)?;
                    self.expect(TokenKind::RightBracket, "`]`")?;
                    Expr::Index {
                        expr: Box::new(lhs),
                        index: Box::new(index),
                    }
                }
                _ => {
                    let Some(op) = token_to_binary_op(&kind) else {
                        break;
                    };
                    self.advance();
                    let rhs = self.parse_expression(r_bp)?;
                    Expr::Binary {
                        left: Box::new(lhs),
                        op,
                        right: Box::new(rhs),
                    }
                }
            };
        }

        Ok(lhs)
    }

    /// Parses the right side of `IN`, `BETWEEN`, `LIKE`, `RLIKE` or `REGEXP`.
    fn parse_negatable(&mut self, lhs: Expr, r_bp: u8, negated: bool) -> Result<Expr, SyntaxError> {
        let keyword = self.current().as_keyword();
        self.advance();
        let expr = Box::new(lhs);

        match keyword {
            Some(Keyword::In) => {
                self.expect(TokenKind::LeftParen, "`(`")?;
                if matches!(
                    self.current().kind,
                    TokenKind::Keyword(Keyword::Select | Keyword::With)
                ) {
                    let query = self.parse_query()?;
                    self.expect(TokenKind::RightParen, "`)`")?;
                    return Ok(Expr::InSubquery {
                        expr,
                        query: Box::new(query),
                        negated,
                    });
                }
                let list = self.parse_expression_list()?;
                self.expect(TokenKind::RightParen, "`)`")?;
                Ok(Expr::In {
                    expr,
                    list,
                    negated,
                })
            }
            Some(Keyword::Between) => {
                let low = self.parse_expression(r_bp)?;
                self.expect_keyword(Keyword::And)?;
                let high = self.parse_expression(r_bp)?;
                Ok(Expr::Between {
                    expr,
                    low: Box::new(low),
                    high: Box::new(high),
                    negated,
                })
            }
            _ => {
                let op = match keyword {
                    Some(Keyword::Rlike) => BinaryOp::Rlike,
                    Some(Keyword::Regexp) => BinaryOp::Regexp,
                    _ => BinaryOp::Like,
                };
                let right = self.parse_expression(r_bp)?;
                let binary = Expr::Binary {
                    left: expr,
                    op,
                    right: Box::new(right),
                };
                if negated {
                    Ok(Expr::Unary {
                        op: UnaryOp::Not,
                        operand: Box::new(binary),
                    })
                } else {
                    Ok(binary)
                }
            }
        }
    }

    /// Parses a prefix expression.
    fn parse_prefix(&mut self) -> Result<Expr, SyntaxError> {
        let kind = self.current().kind;
        if let (Some(op), Some(bp)) = (token_to_unary_op(&kind), prefix_binding_power(&kind)) {
            self.advance();
            let operand = self.parse_expression(bp)?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            });
        }
        // Nesting path, kept clear of the `parse_primary` frame
        if kind == TokenKind::LeftParen {
            return self.parse_parenthesized();
        }

        self.parse_primary()
    }

    /// Parses a parenthesized expression, row, or subquery.
    fn parse_parenthesized(&mut self) -> Result<Expr, SyntaxError> {
        self.expect(TokenKind::LeftParen, "`(`")?;
        if matches!(
            self.current().kind,
            TokenKind::Keyword(Keyword::Select | Keyword::With)
        ) {
            let query = self.parse_query()?;
            self.expect(TokenKind::RightParen, "`)`")?;
            return Ok(Expr::Subquery(Box::new(query)));
        }
        let expr = self.parse_expression(0)?;
        if self.check(TokenKind::Comma) {
            let mut items = vec![expr];
            while self.check(TokenKind::Comma) {
                self.advance();
                items.push(self.parse_expression(0)?);
            }
            self.expect(TokenKind::RightParen, "`)`")?;
            return Ok(Expr::Tuple(items));
        }
        self.expect(TokenKind::RightParen, "`)`")?;
        Ok(Expr::Paren(Box::new(expr)))
    }

    /// Parses a primary expression.
    fn parse_primary(&mut self) -> Result<Expr, SyntaxError> {
        let token = *self.current();

        match token.kind {
            // Literals
            TokenKind::Number => {
                self.advance();
                Ok(Expr::Literal(Literal::Number(token.text.to_string())))
            }
            TokenKind::String => {
                self.advance();
                Ok(Expr::Literal(Literal::String(unescape_string(token.text))))
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                Ok(Expr::Literal(Literal::Boolean(true)))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                Ok(Expr::Literal(Literal::Boolean(false)))
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                Ok(Expr::Literal(Literal::Null))
            }

            // Parameter placeholders
            TokenKind::Question => {
                self.param_counter += 1;
                self.advance();
                Ok(Expr::Parameter {
                    name: None,
                    position: self.param_counter,
                })
            }
            TokenKind::Colon | TokenKind::At => {
                self.advance();
                let name = self.expect_identifier("parameter name")?;
                Ok(Expr::Parameter {
                    name: Some(name.value),
                    position: 0,
                })
            }

            // Wildcard
            TokenKind::Star => {
                self.advance();
                Ok(Expr::Wildcard { qualifier: None })
            }

            TokenKind::Keyword(Keyword::Case) => self.parse_case_expression(),
            TokenKind::Keyword(Keyword::Cast) => self.parse_cast_expression(),

            TokenKind::Keyword(Keyword::Exists) => {
                self.advance();
                self.expect(TokenKind::LeftParen, "`(`")?;
                let query = self.parse_query()?;
                self.expect(TokenKind::RightParen, "`)`")?;
                Ok(Expr::Exists(Box::new(query)))
            }

            TokenKind::Keyword(Keyword::Interval) => {
                self.advance();
                let value = self.parse_expression(UNARY_BINDING_POWER)?;
                let unit = self.expect_identifier("interval unit")?;
                Ok(Expr::Interval {
                    value: Box::new(value),
                    unit: unit.value,
                })
            }

            // LEFT(...) and RIGHT(...) are functions despite being join keywords
            TokenKind::Keyword(Keyword::Left | Keyword::Right)
                if self.peek_kind(1) == TokenKind::LeftParen =>
            {
                self.advance();
                let call = self.parse_function_call(token.text.to_string())?;
                Ok(Expr::Function(call))
            }

            // Typed literals: DATE '2024-01-01', TIMESTAMP '...'
            TokenKind::Identifier
                if self.peek_kind(1) == TokenKind::String
                    && ["DATE", "TIMESTAMP"]
                        .iter()
                        .any(|name| token.text.eq_ignore_ascii_case(name)) =>
            {
                self.advance();
                let value = unescape_string(self.current().text);
                self.advance();
                Ok(Expr::TypedLiteral {
                    data_type: token.text.to_string(),
                    value,
                })
            }

            // Column reference or function call
            _ if is_identifier(&token) => self.parse_name_expression(),

            _ => Err(SyntaxError::unexpected("expression", &token)),
        }
    }

    /// Parses `a`, `t.a`, `db.t.a`, `t.*` or a (qualified) function call.
    fn parse_name_expression(&mut self) -> Result<Expr, SyntaxError> {
        let span = self.current().span;
        let mut parts = vec![self.expect_identifier("identifier")?.value];

        while self.check(TokenKind::Dot) {
            self.advance();
            if self.check(TokenKind::Star) {
                self.advance();
                return Ok(Expr::Wildcard {
                    qualifier: Some(parts.join(".")),
                });
            }
            parts.push(self.expect_identifier("identifier")?.value);
        }

        if self.check(TokenKind::LeftParen) {
            let call = self.parse_function_call(parts.join("."))?;
            return Ok(Expr::Function(call));
        }

        let name = parts.pop().unwrap_or_default();
        Ok(Expr::Column {
            qualifiers: parts,
            name,
            span,
        })
    }

    /// Parses a dotted name, as used for function names.
    fn parse_qualified_name(&mut self, expected: &str) -> Result<String, SyntaxError> {
        let mut parts = vec![self.expect_identifier(expected)?.value];
        while self.check(TokenKind::Dot) {
            self.advance();
            parts.push(self.expect_identifier(expected)?.value);
        }
        Ok(parts.join("."))
    }

    /// Parses a function call's arguments and optional `OVER` clause.
    fn parse_function_call(&mut self, name: String) -> Result<FunctionCall, SyntaxError> {
        self.expect(TokenKind::LeftParen, "`(`")?;

        let distinct = if self.check_keyword(Keyword::Distinct) {
            self.advance();
            true
        } else {
            false
        };

        let args = if self.check(TokenKind::RightParen) {
            vec![]
        } else {
            self.parse_expression_list()?
        };

        self.expect(TokenKind::RightParen, "`)`")?;

        let over = if self.check_keyword(Keyword::Over) {
            self.advance();
            Some(self.parse_window_spec()?)
        } else {
            None
        };

        Ok(FunctionCall {
            name,
            args,
            distinct,
            over,
        })
    }

    /// Parses `w` or `(PARTITION BY ... ORDER BY ... [frame])` after `OVER`.
    fn parse_window_spec(&mut self) -> Result<WindowSpec, SyntaxError> {
        if !self.check(TokenKind::LeftParen) {
            return Ok(WindowSpec::Named(self.expect_identifier("window name")?));
        }
        self.advance();

        let partition_by = if self.check_keyword(Keyword::Partition) {
            self.advance();
            self.expect_keyword(Keyword::By)?;
            self.parse_expression_list()?
        } else {
            vec![]
        };

        let order_by = if self.check_keyword(Keyword::Order) {
            self.advance();
            self.expect_keyword(Keyword::By)?;
            self.parse_order_by_list()?
        } else {
            vec![]
        };

        let frame = if matches!(
            self.current().kind,
            TokenKind::Keyword(Keyword::Rows | Keyword::Range)
        ) {
            let start = self.current().index;
            self.advance();
            self.skip_balanced(|_| false)?;
            Some(TokenRange::new(start, self.previous))
        } else {
            None
        };

        self.expect(TokenKind::RightParen, "`)`")?;

        Ok(WindowSpec::Inline {
            partition_by,
            order_by,
            frame,
        })
    }

    /// Parses a CAST expression.
    fn parse_cast_expression(&mut self) -> Result<Expr, SyntaxError> {
        self.expect_keyword(Keyword::Cast)?;
        self.expect(TokenKind::LeftParen, "`(`")?;
        let expr = self.parse_expression(0)?;
        self.expect_keyword(Keyword::As)?;
        let data_type = self.parse_data_type()?;
        self.expect(TokenKind::RightParen, "`)`")?;

        Ok(Expr::Cast {
            expr: Box::new(expr),
            data_type,
        })
    }

    /// Parses a CASE expression.
    fn parse_case_expression(&mut self) -> Result<Expr, SyntaxError> {
        self.expect_keyword(Keyword::Case)?;

        // Simple CASE (CASE expr WHEN ...)
        let operand = if self.check_keyword(Keyword::When) {
            None
        } else {
            Some(Box::new(self.parse_expression(0)?))
        };

        let mut when_clauses = vec![];
        while self.check_keyword(Keyword::When) {
            self.advance();
            let when_expr = self.parse_expression(0)?;
            self.expect_keyword(Keyword::Then)?;
            let then_expr = self.parse_expression(0)?;
            when_clauses.push((when_expr, then_expr));
        }
        if when_clauses.is_empty() {
            return Err(SyntaxError::unexpected("WHEN", self.current()));
        }

        let else_clause = if self.check_keyword(Keyword::Else) {
            self.advance();
            Some(Box::new(self.parse_expression(0)?))
        } else {
            None
        };

        self.expect_keyword(Keyword::End)?;

        Ok(Expr::Case {
            operand,
            when_clauses,
            else_clause,
        })
    }

    /// Parses a data type: a name with optional `(...)` or `<...>` parameters.
    fn parse_data_type(&mut self) -> Result<DataType, SyntaxError> {
        let token = *self.current();
        if !is_identifier(&token) {
            return Err(SyntaxError::unexpected("data type", &token));
        }
        self.advance();

        if self.check(TokenKind::LeftParen) {
            self.advance();
            self.skip_balanced(|_| false)?;
            self.expect(TokenKind::RightParen, "`)`")?;
        } else if self.check(TokenKind::Lt) {
            self.skip_angle_brackets()?;
        }

        Ok(DataType {
            name: Ident::from_token(&token).value,
            range: TokenRange::new(token.index, self.previous),
        })
    }

    /// Skips `<...>` type parameters, which may nest (`MAP<K, ARRAY<V>>`).
    fn skip_angle_brackets(&mut self) -> Result<(), SyntaxError> {
        let mut depth = 0_usize;
        loop {
            let token = *self.current();
            match token.kind {
                TokenKind::Lt => depth += 1,
                TokenKind::Gt => depth -= 1,
                // `>>` closes two levels at once
                TokenKind::RightShift if depth >= 2 => depth -= 2,
                TokenKind::RightShift | TokenKind::Eof => {
                    return Err(SyntaxError::unexpected("`>`", &token));
                }
                _ => {}
            }
            self.advance();
            if depth == 0 {
                return Ok(());
            }
        }
    }

    /// Parses a comma-separated list of expressions.
    fn parse_expression_list(&mut self) -> Result<Vec<Expr>, SyntaxError> {
        let mut exprs = vec![];
        loop {
            exprs.push(self.parse_expression(0)?);
            if !self.check(TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(exprs)
    }

    /// Parses a comma-separated list of identifiers.
    fn parse_identifier_list(&mut self) -> Result<Vec<Ident>, SyntaxError> {
        let mut idents = vec![];
        loop {
            idents.push(self.expect_identifier("identifier")?);
            if !self.check(TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(idents)
    }

    // --- Helper methods ---

    /// Returns the current significant token.
    fn current(&self) -> &Token<'a> {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn token_at(&self, index: usize) -> &Token<'a> {
        self.tokens.get(index).unwrap_or(&self.eof)
    }

    /// Returns the kind of the `n`th significant token from the cursor.
    fn peek_kind(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos..)
            .unwrap_or_default()
            .iter()
            .filter(|token| !token.is_trivia())
            .nth(n)
            .map_or(TokenKind::Eof, |token| token.kind)
    }

    /// Returns true if the cursor sits on `(` characters that open a query.
    fn starts_query_after_parens(&self) -> bool {
        let mut n = 0;
        while self.peek_kind(n) == TokenKind::LeftParen {
            n += 1;
        }
        n > 0
            && matches!(
                self.peek_kind(n),
                TokenKind::Keyword(Keyword::Select | Keyword::With)
            )
    }

    /// Advances to the next significant token.
    fn advance(&mut self) {
        if self.current().is_eof() {
            return;
        }
        self.previous = self.current().index;
        self.pos += 1;
        self.skip_trivia();
    }

    fn skip_trivia(&mut self) {
        while self.tokens.get(self.pos).is_some_and(Token::is_trivia) {
            self.pos += 1;
        }
    }

    /// Skips a balanced token run, up to the first token at nesting level
    /// zero for which `stop` returns true, an unmatched closing bracket, or
    /// the end of input.
    fn skip_balanced(&mut self, stop: impl Fn(&Self) -> bool) -> Result<(), SyntaxError> {
        let mut depth = 0_usize;
        loop {
            let token = *self.current();
            match token.kind {
                TokenKind::Eof if depth > 0 => {
                    return Err(SyntaxError::unexpected("closing bracket", &token));
                }
                TokenKind::Eof => return Ok(()),
                TokenKind::LeftParen | TokenKind::LeftBracket => depth += 1,
                TokenKind::RightParen | TokenKind::RightBracket => {
                    if depth == 0 {
                        return Ok(());
                    }
                    depth -= 1;
                }
                _ if depth == 0 && stop(self) => return Ok(()),
                _ => {}
            }
            self.advance();
        }
    }

    /// Runs `f` one nesting level deeper, failing past the depth limit.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, SyntaxError>,
    ) -> Result<T, SyntaxError> {
        if self.depth >= self.max_depth {
            return Err(SyntaxError::new(
                format!("Nesting exceeds the limit of {} levels", self.max_depth),
                self.current(),
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Checks if the current token matches the given kind.
    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    /// Checks if the current token is the given keyword.
    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current().kind == TokenKind::Keyword(keyword)
    }

    /// Consumes the given keyword if present.
    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects the current token to be the given kind and returns its index.
    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<usize, SyntaxError> {
        if self.check(kind) {
            let index = self.current().index;
            self.advance();
            Ok(index)
        } else {
            Err(SyntaxError::unexpected(expected, self.current()))
        }
    }

    /// Expects the current token to be the given keyword and returns its index.
    fn expect_keyword(&mut self, keyword: Keyword) -> Result<usize, SyntaxError> {
        if self.check_keyword(keyword) {
            let index = self.current().index;
            self.advance();
            Ok(index)
        } else {
            Err(SyntaxError::unexpected(keyword.as_str(), self.current()))
        }
    }

    /// Expects and returns an identifier. Non-reserved keywords qualify.
    fn expect_identifier(&mut self, expected: &str) -> Result<Ident, SyntaxError> {
        let token = *self.current();
        if is_identifier(&token) {
            self.advance();
            Ok(Ident::from_token(&token))
        } else {
            Err(SyntaxError::unexpected(expected, &token))
        }
    }

    /// Expects and returns the value of a string literal.
    fn expect_string(&mut self) -> Result<String, SyntaxError> {
        let token = *self.current();
        if token.kind == TokenKind::String {
            self.advance();
            Ok(unescape_string(token.text))
        } else {
            Err(SyntaxError::unexpected("string literal", &token))
        }
    }

    fn expect_end(&self, expected: &str) -> Result<(), SyntaxError> {
        if self.current().is_eof() {
            Ok(())
        } else {
            Err(SyntaxError::unexpected(expected, self.current()))
        }
    }
}

/// Returns true if the token can name a table, column or alias.
fn is_identifier(token: &Token<'_>) -> bool {
    match token.kind {
        TokenKind::Identifier | TokenKind::QuotedIdentifier => true,
        TokenKind::Keyword(keyword) => !keyword.is_reserved(),
        _ => false,
    }
}

/// Returns the value of a single-quoted string literal.
///
/// Both the doubled-quote and the backslash escape forms are resolved.
fn unescape_string(text: &str) -> String {
    let inner = text
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .unwrap_or(text);

    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\'' if chars.peek() == Some(&'\'') => {
                chars.next();
                value.push('\'');
            }
            '\\' => match chars.next() {
                Some('n') => value.push('\n'),
                Some('t') => value.push('\t'),
                Some('r') => value.push('\r'),
                Some('0') => value.push('\0'),
                Some(other) => value.push(other),
                None => value.push('\\'),
            },
            _ => value.push(c),
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(sql: &str) -> Result<Statement, SyntaxError> {
        let tokens = Lexer::new(sql).tokenize().unwrap();
        Parser::new(&tokens).parse_statement()
    }

    fn select(sql: &str) -> SelectStatement {
        match parse(sql).unwrap() {
            Statement::Select(query) => query.first_select().clone(),
            other => panic!("Expected SELECT statement, got {}", other.kind()),
        }
    }

    fn condition(sql: &str) -> Expr {
        let tokens = Lexer::new(sql).tokenize().unwrap();
        Parser::new(&tokens).parse_condition().unwrap()
    }

    #[test]
    fn test_simple_select() {
        let select = select("SELECT id, name FROM users");
        assert_eq!(select.columns.len(), 2);
        let from = select.from.unwrap();
        assert_eq!(from.base_table().unwrap().normalized, "users");
        assert!(select.where_clause.is_none());
    }

    #[test]
    fn test_where_clause_token_indices() {
        // SELECT ␣ * ␣ FROM ␣ users ␣ WHERE ␣ age ␣ > ␣ 18
        // 0      1 2 3 4    5 6     7 8     9 10 11 12 13 14
        let select = select("SELECT * FROM users WHERE age > 18");
        let where_clause = select.where_clause.unwrap();
        assert_eq!(where_clause.keyword, 8);
        assert_eq!(where_clause.start, 10);
        assert_eq!(where_clause.end, 14);
        assert_eq!(select.from.unwrap().range, TokenRange::new(4, 6));
    }

    #[test]
    fn test_from_range_ends_after_joins() {
        let select = select("SELECT * FROM users u JOIN orders o ON u.id = o.user_id GROUP BY u.id");
        let from = select.from.unwrap();
        assert_eq!(from.joins.len(), 1);
        assert_eq!(from.joins[0].join_type, JoinType::Inner);
        assert_eq!(from.range.end, from.joins[0].range.end);
        assert!(matches!(from.joins[0].constraint, JoinConstraint::On(_)));
    }

    #[test]
    fn test_hive_join_types() {
        let select = select(
            "SELECT * FROM a LEFT SEMI JOIN b ON a.id = b.id \
             LEFT ANTI JOIN c ON a.id = c.id LEFT OUTER JOIN d USING (id) CROSS JOIN e, f",
        );
        let types: Vec<_> = select
            .from
            .unwrap()
            .joins
            .iter()
            .map(|join| join.join_type)
            .collect();
        assert_eq!(
            types,
            vec![
                JoinType::LeftSemi,
                JoinType::LeftAnti,
                JoinType::Left,
                JoinType::Cross,
                JoinType::Comma
            ]
        );
    }

    #[test]
    fn test_lateral_view() {
        let select = select(
            "SELECT t.id, tag FROM t LATERAL VIEW OUTER explode(t.tags) tv AS tag WHERE tag <> ''",
        );
        let from = select.from.unwrap();
        assert_eq!(from.lateral_views.len(), 1);
        let view = &from.lateral_views[0];
        assert!(view.outer);
        assert_eq!(view.function.name, "explode");
        assert_eq!(view.alias.value, "tv");
        assert_eq!(view.columns[0].value, "tag");
        assert!(select.where_clause.is_some());
    }

    #[test]
    fn test_subquery_source_has_no_base_table() {
        let select = select("SELECT * FROM (SELECT * FROM users) u");
        let from = select.from.unwrap();
        assert!(from.base_table().is_none());
        assert!(matches!(from.source, TableSource::Subquery { alias: Some(_), .. }));
    }

    #[test]
    fn test_nested_join_group() {
        let select = select("SELECT * FROM (users u JOIN orders o ON u.id = o.uid) JOIN x ON 1 = 1");
        let from = select.from.unwrap();
        assert_eq!(from.base_table().unwrap().normalized, "users");
        assert_eq!(from.joins.len(), 1);
    }

    #[test]
    fn test_qualified_and_quoted_table_name() {
        let select = select("SELECT * FROM `Sales`.Orders");
        let table = select.from.unwrap().base_table().unwrap().clone();
        assert_eq!(table.normalized, "sales.orders");
        assert_eq!(table.raw, "`Sales`.Orders");
    }

    #[test]
    fn test_expression_precedence() {
        // 1 + 2 * 3 should be parsed as 1 + (2 * 3)
        let expr = condition("1 + 2 * 3");
        let Expr::Binary { op, right, .. } = expr else {
            panic!("Expected binary expression");
        };
        assert_eq!(op, BinaryOp::Add);
        assert!(matches!(*right, Expr::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn test_or_is_top_level() {
        assert!(condition("a = 1 OR b = 2 AND c = 3").is_disjunction());
        assert!(!condition("(a = 1 OR b = 2) AND c = 3").is_disjunction());
    }

    #[test]
    fn test_not_binds_looser_than_comparison() {
        let expr = condition("NOT a = 1 AND b = 2");
        let Expr::Binary { left, op, .. } = expr else {
            panic!("Expected binary expression");
        };
        assert_eq!(op, BinaryOp::And);
        assert!(matches!(*left, Expr::Unary { op: UnaryOp::Not, .. }));
    }

    #[test]
    fn test_negated_predicates() {
        assert!(matches!(condition("a NOT IN (1, 2)"), Expr::In { negated: true, .. }));
        assert!(matches!(
            condition("a NOT BETWEEN 1 AND 5"),
            Expr::Between { negated: true, .. }
        ));
        assert!(matches!(
            condition("a NOT LIKE 'x%'"),
            Expr::Unary { op: UnaryOp::Not, .. }
        ));
        assert!(matches!(
            condition("a IS NOT NULL"),
            Expr::IsNull { negated: true, .. }
        ));
        assert!(matches!(
            condition("flag IS FALSE"),
            Expr::IsBool { value: false, negated: false, .. }
        ));
    }

    #[test]
    fn test_between_and_does_not_leak() {
        let expr = condition("a BETWEEN 1 AND 5 AND b = 2");
        assert!(matches!(expr, Expr::Binary { op: BinaryOp::And, .. }));
    }

    #[test]
    fn test_in_subquery() {
        let expr = condition("id IN (SELECT user_id FROM orders)");
        assert!(matches!(expr, Expr::InSubquery { negated: false, .. }));
    }

    #[test]
    fn test_interval_and_functions() {
        let expr = condition("created_at >= DATE_SUB(CURRENT_DATE(), INTERVAL 7 DAY)");
        let Expr::Binary { right, .. } = expr else {
            panic!("Expected binary expression");
        };
        let Expr::Function(call) = *right else {
            panic!("Expected function call");
        };
        assert_eq!(call.name, "DATE_SUB");
        assert!(matches!(&call.args[1], Expr::Interval { unit, .. } if unit == "DAY"));
    }

    #[test]
    fn test_window_function() {
        let select = select(
            "SELECT ROW_NUMBER() OVER (PARTITION BY dept ORDER BY salary DESC \
             ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW) rn FROM emp",
        );
        let Expr::Function(call) = &select.columns[0].expr else {
            panic!("Expected function call");
        };
        assert!(matches!(
            call.over,
            Some(WindowSpec::Inline { frame: Some(_), .. })
        ));
        assert_eq!(select.columns[0].alias.as_ref().unwrap().value, "rn");
    }

    #[test]
    fn test_cast_with_nested_type() {
        let expr = condition("CAST(m AS MAP<STRING, ARRAY<INT>>) IS NOT NULL");
        let Expr::IsNull { expr, .. } = expr else {
            panic!("Expected IS NULL");
        };
        assert!(matches!(*expr, Expr::Cast { ref data_type, .. } if data_type.is("map")));
    }

    #[test]
    fn test_typed_literal_and_index() {
        assert!(matches!(
            condition("d = DATE '2024-01-01'"),
            Expr::Binary { right, .. } if matches!(*right, Expr::TypedLiteral { .. })
        ));
        assert!(matches!(condition("tags[0] = 'a'"), Expr::Binary { left, .. } if matches!(*left, Expr::Index { .. })));
    }

    #[test]
    fn test_string_unescape() {
        assert_eq!(unescape_string("'it''s'"), "it's");
        assert_eq!(unescape_string(r"'it\'s'"), "it's");
        assert_eq!(unescape_string(r"'a\\b'"), r"a\b");
    }

    #[test]
    fn test_parameter_placeholders() {
        let expr = condition("id = ? AND name = :name");
        let Expr::Binary { left, right, .. } = expr else {
            panic!("Expected Binary expression");
        };
        assert!(matches!(
            *left,
            Expr::Binary { right, .. } if matches!(*right, Expr::Parameter { name: None, position: 1 })
        ));
        assert!(matches!(
            *right,
            Expr::Binary { right, .. } if matches!(&*right, Expr::Parameter { name: Some(n), .. } if n == "name")
        ));
    }

    #[test]
    fn test_set_operation_and_query_clauses() {
        let Statement::Select(query) = parse(
            "SELECT a FROM t1 UNION ALL SELECT a FROM t2 ORDER BY a DESC NULLS LAST LIMIT 10, 5",
        )
        .unwrap() else {
            panic!("Expected SELECT statement");
        };
        assert!(matches!(
            query.body,
            QueryBody::SetOperation { op: SetOperator::Union, all: true, .. }
        ));
        assert_eq!(query.order_by[0].nulls, Some(NullOrdering::Last));
        let limit = query.limit.unwrap();
        assert_eq!(limit.count, Expr::Literal(Literal::Number(String::from("5"))));
        assert!(limit.offset.is_some());
    }

    #[test]
    fn test_with_clause() {
        let Statement::Select(query) =
            parse("WITH recent (id) AS (SELECT id FROM orders) SELECT * FROM recent").unwrap()
        else {
            panic!("Expected SELECT statement");
        };
        assert_eq!(query.with.len(), 1);
        assert_eq!(query.with[0].name.value, "recent");
        assert_eq!(query.with[0].columns.len(), 1);
    }

    #[test]
    fn test_insert_statements() {
        let Statement::Insert(insert) = parse("INSERT INTO TABLE test VALUES (1, 'hello')").unwrap()
        else {
            panic!("Expected INSERT statement");
        };
        assert_eq!(insert.table.normalized, "test");
        assert!(matches!(insert.source, InsertSource::Values(ref rows) if rows[0].len() == 2));

        let Statement::Insert(insert) = parse(
            "INSERT OVERWRITE TABLE dst PARTITION (dt = '2024-01-01') SELECT * FROM src",
        )
        .unwrap() else {
            panic!("Expected INSERT statement");
        };
        assert!(insert.overwrite);
        assert!(insert.partition.is_some());
        assert!(matches!(insert.source, InsertSource::Query(_)));
    }

    #[test]
    fn test_create_statements() {
        let Statement::Create(create) = parse(
            "CREATE TABLE test (id INT COMMENT 'key', tags ARRAY<STRING>) STORED AS ORC",
        )
        .unwrap() else {
            panic!("Expected CREATE statement");
        };
        assert_eq!(create.columns.len(), 2);
        assert_eq!(create.columns[0].comment.as_deref(), Some("key"));
        assert!(create.options.is_some());
        assert!(create.query.is_none());

        let Statement::Create(create) =
            parse("CREATE OR REPLACE VIEW v AS SELECT * FROM users").unwrap()
        else {
            panic!("Expected CREATE statement");
        };
        assert!(create.or_replace);
        assert_eq!(create.object, CreateObject::View);
        assert!(create.query.is_some());
    }

    #[test]
    fn test_update_and_delete() {
        let Statement::Update(update) = parse("UPDATE users SET name = 'Bob' WHERE id = 1").unwrap()
        else {
            panic!("Expected UPDATE statement");
        };
        assert_eq!(update.assignments.len(), 1);
        assert!(update.where_clause.is_some());

        let Statement::Delete(delete) = parse("DELETE FROM users WHERE id = 1").unwrap() else {
            panic!("Expected DELETE statement");
        };
        assert_eq!(delete.table.normalized, "users");
    }

    #[test]
    fn test_explain_and_utility() {
        let Statement::Explain(explain) = parse("EXPLAIN EXTENDED SELECT * FROM t").unwrap() else {
            panic!("Expected EXPLAIN statement");
        };
        assert_eq!(explain.options[0].value, "EXTENDED");
        assert!(matches!(*explain.statement, Statement::Select(_)));

        let statement = parse("SET hive.exec.dynamic.partition = true").unwrap();
        assert_eq!(statement.kind(), "SET");
        assert_eq!(parse("DROP TABLE IF EXISTS t;").unwrap().kind(), "DROP");
    }

    #[test]
    fn test_trailing_semicolon() {
        assert!(parse("SELECT * FROM users;").is_ok());
        assert!(parse("SELECT * FROM users; SELECT 1").is_err());
    }

    #[test]
    fn test_select_without_columns_fails() {
        let err = parse("SELECT FROM;").unwrap_err();
        assert_eq!(err.expected.as_deref(), Some("expression"));
        assert_eq!(err.found.as_deref(), Some("FROM"));
        assert_eq!(err.span, Span::new(7, 11));
    }

    #[test]
    fn test_table_name_only() {
        let tokens = Lexer::new("db.`My Table`").tokenize().unwrap();
        let name = Parser::new(&tokens).parse_table_name_only().unwrap();
        assert_eq!(name.normalized, "db.my table");

        let tokens = Lexer::new("users u").tokenize().unwrap();
        assert!(Parser::new(&tokens).parse_table_name_only().is_err());
    }

    #[test]
    fn test_depth_limit() {
        let sql = format!("SELECT {}1{}", "(".repeat(40), ")".repeat(40));
        let tokens = Lexer::new(&sql).tokenize().unwrap();
        let err = Parser::new(&tokens)
            .with_max_depth(16)
            .parse_statement()
            .unwrap_err();
        assert!(err.message.contains("limit of 16"));

        let tokens = Lexer::new(&sql).tokenize().unwrap();
        assert!(Parser::new(&tokens).parse_statement().is_ok());
    }
}
