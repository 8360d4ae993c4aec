//! Finds the query blocks that read from a target table and plans the
//! insertions that constrain them.
//!
//! The walk is a pre-order traversal over the statement tree. Each
//! `SELECT` block decides on its own `FROM` clause before any query nested
//! inside it is visited, so edits come out in source order of the blocks
//! that produced them.

use std::borrow::Cow;

use tracing::{debug, trace};

use crate::ast::{
    BinaryOp, Cte, Expr, FromClause, FunctionCall, InsertSource, JoinConstraint, OrderBy, Query, QueryBody,
    SelectStatement, Statement, TableName, TableSource, WhereClause, WindowSpec,
};
use crate::lexer::{Lexer, TokenKind};
use crate::parser::Parser;

/// A text insertion after a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Index of the token the text is inserted after.
    pub anchor: usize,
    /// The inserted text.
    pub text: String,
    /// Position among edits sharing the same anchor; lower goes first.
    pub order: usize,
}

/// Walks a statement and collects the edits for every matching block.
#[derive(Debug)]
pub struct Locator<'q> {
    target: Option<&'q TableName>,
    condition: Cow<'q, str>,
    conjunct: Cow<'q, str>,
    edits: Vec<Edit>,
    matches: usize,
}

impl<'q> Locator<'q> {
    /// Creates a locator for `target`. Without a target nothing is edited.
    #[must_use]
    pub fn new(target: Option<&'q TableName>, condition: &'q str) -> Self {
        let (condition, conjunct) = condition_texts(condition);
        Self {
            target,
            condition,
            conjunct,
            edits: Vec::new(),
            matches: 0,
        }
    }

    /// Returns the edits collected so far.
    #[must_use]
    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    /// Returns the number of `FROM` clauses that matched the target.
    #[must_use]
    pub const fn matches(&self) -> usize {
        self.matches
    }

    /// Consumes the locator and returns its edits.
    #[must_use]
    pub fn into_edits(self) -> Vec<Edit> {
        self.edits
    }

    /// Visits a statement and everything nested in it.
    pub fn visit_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Select(query) => self.visit_query(query),
            Statement::Insert(insert) => match &insert.source {
                InsertSource::Values(rows) => rows.iter().flatten().for_each(|e| self.visit_expr(e)),
                InsertSource::Query(query) => self.visit_query(query),
            },
            Statement::Create(create) => {
                if let Some(query) = &create.query {
                    self.visit_query(query);
                }
            }
            Statement::Update(update) => {
                for assignment in &update.assignments {
                    self.visit_expr(&assignment.value);
                }
                self.visit_where(update.where_clause.as_ref());
            }
            Statement::Delete(delete) => self.visit_where(delete.where_clause.as_ref()),
            Statement::Explain(explain) => self.visit_statement(&explain.statement),
            Statement::Utility(_) => {}
        }
    }

    /// Visits a query: its body first, then its CTEs and trailing clauses.
    pub fn visit_query(&mut self, query: &Query) {
        self.visit_body(&query.body);
        for Cte { query, .. } in &query.with {
            self.visit_query(query);
        }
        self.visit_order_by(&query.order_by);
        query
            .cluster_by
            .iter()
            .chain(&query.distribute_by)
            .for_each(|e| self.visit_expr(e));
        self.visit_order_by(&query.sort_by);
        if let Some(limit) = &query.limit {
            self.visit_expr(&limit.count);
            if let Some(offset) = &limit.offset {
                self.visit_expr(offset);
            }
        }
    }

    fn visit_body(&mut self, body: &QueryBody) {
        match body {
            QueryBody::Select(select) => self.visit_select(select),
            QueryBody::Nested(query) => self.visit_query(query),
            QueryBody::SetOperation { left, right, .. } => {
                self.visit_body(left);
                self.visit_body(right);
            }
        }
    }

    /// Visits a `SELECT` block, deciding on its own `FROM` clause first.
    pub fn visit_select(&mut self, select: &SelectStatement) {
        if let Some(from) = &select.from {
            self.decide(from, select.where_clause.as_ref());
        }

        for column in &select.columns {
            self.visit_expr(&column.expr);
        }
        if let Some(from) = &select.from {
            self.visit_from(from);
        }
        self.visit_where(select.where_clause.as_ref());
        for expr in &select.group_by {
            self.visit_expr(expr);
        }
        if let Some(having) = &select.having {
            self.visit_expr(having);
        }
    }

    /// Emits the edits for one `FROM` clause if its home table matches.
    fn decide(&mut self, from: &FromClause, where_clause: Option<&WhereClause>) {
        let Some(target) = self.target else {
            return;
        };
        let Some(table) = from.base_table() else {
            debug!(from = from.from_token, "FROM clause starts with a subquery");
            return;
        };

        let matched = table.matches(target);
        let has_where = where_clause.is_some();
        debug!(table = %table.raw, matched, has_where, "Resolved FROM clause");
        if !matched {
            return;
        }

        self.matches += 1;
        match where_clause {
            Some(where_clause) => {
                // The parenthesis hugs the condition, after any trivia
                // following the keyword.
                if where_clause.start > where_clause.keyword + 1 {
                    self.push(where_clause.start - 1, String::from("("));
                } else {
                    self.push(where_clause.keyword, String::from(" ("));
                }
                self.push(where_clause.end, format!(") AND {}", self.conjunct));
            }
            None => self.push(from.range.end, format!(" WHERE {}", self.condition)),
        }
    }

    fn push(&mut self, anchor: usize, text: String) {
        let order = self.edits.len();
        trace!(anchor, order, text = %text, "Planned edit");
        self.edits.push(Edit {
            anchor,
            text,
            order,
        });
    }

    fn visit_from(&mut self, from: &FromClause) {
        self.visit_source(&from.source);
        for join in &from.joins {
            self.visit_source(&join.source);
            if let JoinConstraint::On(expr) = &join.constraint {
                self.visit_expr(expr);
            }
        }
        for view in &from.lateral_views {
            self.visit_function(&view.function);
        }
    }

    fn visit_source(&mut self, source: &TableSource) {
        match source {
            TableSource::Table { .. } => {}
            TableSource::Subquery { query, .. } => self.visit_query(query),
            TableSource::Nested(joined) => {
                self.visit_source(&joined.source);
                for join in &joined.joins {
                    self.visit_source(&join.source);
                    if let JoinConstraint::On(expr) = &join.constraint {
                        self.visit_expr(expr);
                    }
                }
            }
        }
    }

    fn visit_where(&mut self, where_clause: Option<&WhereClause>) {
        if let Some(where_clause) = where_clause {
            self.visit_expr(&where_clause.condition);
        }
    }

    fn visit_order_by(&mut self, items: &[OrderBy]) {
        for item in items {
            self.visit_expr(&item.expr);
        }
    }

    fn visit_function(&mut self, call: &FunctionCall) {
        for arg in &call.args {
            self.visit_expr(arg);
        }
        if let Some(WindowSpec::Inline {
            partition_by,
            order_by,
            ..
        }) = &call.over
        {
            for expr in partition_by {
                self.visit_expr(expr);
            }
            self.visit_order_by(order_by);
        }
    }

    /// Visits the subqueries of an expression.
    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(_)
            | Expr::TypedLiteral { .. }
            | Expr::Column { .. }
            | Expr::Wildcard { .. }
            | Expr::Parameter { .. } => {}
            Expr::Binary { left, right, .. } => {
                self.visit_expr(left);
                self.visit_expr(right);
            }
            Expr::Unary { operand, .. } => self.visit_expr(operand),
            Expr::Function(call) => self.visit_function(call),
            Expr::Case {
                operand,
                when_clauses,
                else_clause,
            } => {
                if let Some(operand) = operand {
                    self.visit_expr(operand);
                }
                for (when, then) in when_clauses {
                    self.visit_expr(when);
                    self.visit_expr(then);
                }
                if let Some(else_clause) = else_clause {
                    self.visit_expr(else_clause);
                }
            }
            Expr::Cast { expr, .. }
            | Expr::IsNull { expr, .. }
            | Expr::IsBool { expr, .. }
            | Expr::Paren(expr)
            | Expr::Interval { value: expr, .. } => self.visit_expr(expr),
            Expr::Between {
                expr, low, high, ..
            } => {
                self.visit_expr(expr);
                self.visit_expr(low);
                self.visit_expr(high);
            }
            Expr::In { expr, list, .. } => {
                self.visit_expr(expr);
                for item in list {
                    self.visit_expr(item);
                }
            }
            Expr::InSubquery { expr, query, .. } => {
                self.visit_expr(expr);
                self.visit_query(query);
            }
            Expr::Exists(query) | Expr::Subquery(query) => self.visit_query(query),
            Expr::Tuple(items) => {
                for item in items {
                    self.visit_expr(item);
                }
            }
            Expr::Index { expr, index } => {
                self.visit_expr(expr);
                self.visit_expr(index);
            }
        }
    }
}

/// Returns the text inserted after `WHERE` and the text inserted after
/// `AND`.
///
/// The `AND` operand is parenthesized when the condition has a top-level
/// `OR` or does not parse. A condition ending in a line comment is followed
/// by a line break so the comment ends where the condition does.
fn condition_texts(condition: &str) -> (Cow<'_, str>, Cow<'_, str>) {
    let Ok(tokens) = Lexer::new(condition).tokenize() else {
        return (Cow::Borrowed(condition), Cow::Owned(format!("({condition})")));
    };
    let single_operand = Parser::new(&tokens)
        .parse_condition()
        .is_ok_and(|expr| !matches!(expr, Expr::Binary { op: BinaryOp::Or, .. }));
    let ends_in_line_comment = tokens
        .iter()
        .rev()
        .find(|token| !token.is_eof())
        .is_some_and(|token| token.kind == TokenKind::LineComment);

    let standalone = if ends_in_line_comment {
        Cow::Owned(format!("{condition}\n"))
    } else {
        Cow::Borrowed(condition)
    };
    let conjunct = if single_operand {
        standalone.clone()
    } else {
        Cow::Owned(format!("({standalone})"))
    };
    (standalone, conjunct)
}

/// Returns the edits that add `condition` to every block whose home table
/// is `target`.
///
/// With no target the statement is walked but nothing is edited.
#[must_use]
pub fn locate(statement: &Statement, target: Option<&TableName>, condition: &str) -> Vec<Edit> {
    let mut locator = Locator::new(target, condition);
    locator.visit_statement(statement);
    locator.into_edits()
}
