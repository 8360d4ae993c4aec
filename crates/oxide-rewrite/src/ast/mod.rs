//! Abstract Syntax Tree (AST) types for SQL statements.

mod expression;
mod statement;
mod types;

pub use expression::{BinaryOp, Expr, FunctionCall, Literal, UnaryOp, WindowSpec};
pub use statement::{
    CreateObject, CreateStatement, Cte, DeleteStatement, ExplainStatement, FromClause, Ident,
    InsertSource, InsertStatement, Join, JoinConstraint, JoinType, JoinedSource, LateralView,
    Limit, NullOrdering, OrderBy, OrderDirection, Query, QueryBody, SelectColumn,
    SelectStatement, SetOperator, Statement, TableName, TableSource, UpdateAssignment,
    UpdateStatement, UtilityStatement, WhereClause,
};
pub use types::{ColumnDef, DataType};
