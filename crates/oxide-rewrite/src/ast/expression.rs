//! Expression AST types.

use super::statement::{Ident, OrderBy, Query};
use super::types::DataType;
use crate::lexer::{Span, TokenRange};

/// A literal value.
///
/// Numbers keep their source text so that Hive suffixes (`100L`, `1BD`)
/// and arbitrary precision survive untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Numeric literal, as written.
    Number(String),
    /// String literal, with quotes removed and escapes resolved.
    String(String),
    /// Boolean literal.
    Boolean(bool),
    /// NULL literal.
    Null,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    NullSafeEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,

    // String
    Concat,
    Like,
    Rlike,
    Regexp,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    LeftShift,
    RightShift,
}

impl BinaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::NullSafeEq => "<=>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Concat => "||",
            Self::Like => "LIKE",
            Self::Rlike => "RLIKE",
            Self::Regexp => "REGEXP",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
        }
    }

    /// Returns true for `AND` and `OR`.
    #[must_use]
    pub const fn is_logical(&self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Negation (-)
    Neg,
    /// Identity (+)
    Plus,
    /// Logical NOT (or `!`)
    Not,
    /// Bitwise NOT (~)
    BitNot,
}

impl UnaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Plus => "+",
            Self::Not => "NOT",
            Self::BitNot => "~",
        }
    }
}

/// The `OVER` part of a window function call.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowSpec {
    /// `OVER w`, referring to a named window.
    Named(Ident),
    /// `OVER (PARTITION BY ... ORDER BY ... [frame])`.
    Inline {
        /// PARTITION BY expressions.
        partition_by: Vec<Expr>,
        /// ORDER BY items.
        order_by: Vec<OrderBy>,
        /// Tokens of the `ROWS`/`RANGE` frame, if any.
        frame: Option<TokenRange>,
    },
}

/// A function call.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// Function name, qualified with dots when written that way.
    pub name: String,
    /// Arguments.
    pub args: Vec<Expr>,
    /// Whether DISTINCT was specified.
    pub distinct: bool,
    /// Window specification for analytic functions.
    pub over: Option<WindowSpec>,
}

/// A SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// A typed literal such as `DATE '2024-01-01'`.
    TypedLiteral {
        /// The type keyword as written.
        data_type: String,
        /// The literal value.
        value: String,
    },

    /// A column reference, optionally qualified (`t.col`, `db.t.col`).
    Column {
        /// Qualifiers, outermost first.
        qualifiers: Vec<String>,
        /// Column name.
        name: String,
        /// Source location of the first name part.
        span: Span,
    },

    /// A wildcard (`*` or `t.*`).
    Wildcard {
        /// Qualifier for `t.*`.
        qualifier: Option<String>,
    },

    /// A parameter placeholder (`?` or `:name`).
    Parameter {
        /// Parameter name (for named parameters).
        name: Option<String>,
        /// Position (for positional parameters).
        position: usize,
    },

    /// A binary expression.
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
    },

    /// A unary expression.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
    },

    /// A function call.
    Function(FunctionCall),

    /// A CASE expression.
    Case {
        /// The operand (for simple CASE).
        operand: Option<Box<Expr>>,
        /// WHEN/THEN pairs.
        when_clauses: Vec<(Expr, Expr)>,
        /// ELSE clause.
        else_clause: Option<Box<Expr>>,
    },

    /// CAST expression.
    Cast {
        /// Expression to cast.
        expr: Box<Expr>,
        /// Target data type.
        data_type: DataType,
    },

    /// BETWEEN expression.
    Between {
        /// Expression to test.
        expr: Box<Expr>,
        /// Lower bound.
        low: Box<Expr>,
        /// Upper bound.
        high: Box<Expr>,
        /// Whether NOT BETWEEN.
        negated: bool,
    },

    /// IN expression with a value list.
    In {
        /// Expression to test.
        expr: Box<Expr>,
        /// List of values.
        list: Vec<Expr>,
        /// Whether NOT IN.
        negated: bool,
    },

    /// IN expression with a subquery.
    InSubquery {
        /// Expression to test.
        expr: Box<Expr>,
        /// The subquery.
        query: Box<Query>,
        /// Whether NOT IN.
        negated: bool,
    },

    /// IS NULL / IS NOT NULL.
    IsNull {
        /// Expression to test.
        expr: Box<Expr>,
        /// Whether IS NOT NULL.
        negated: bool,
    },

    /// IS TRUE / IS FALSE (optionally negated).
    IsBool {
        /// Expression to test.
        expr: Box<Expr>,
        /// The boolean tested against.
        value: bool,
        /// Whether IS NOT.
        negated: bool,
    },

    /// EXISTS (subquery).
    Exists(Box<Query>),

    /// A scalar subquery.
    Subquery(Box<Query>),

    /// A parenthesized expression.
    Paren(Box<Expr>),

    /// A parenthesized row of expressions, e.g. `(a, b) IN (...)`.
    Tuple(Vec<Expr>),

    /// `INTERVAL value unit`.
    Interval {
        /// The interval quantity.
        value: Box<Expr>,
        /// The unit (`DAY`, `HOUR`, ...).
        unit: String,
    },

    /// Array or map subscript, `expr[index]`.
    Index {
        /// The subscripted expression.
        expr: Box<Expr>,
        /// The subscript.
        index: Box<Expr>,
    },
}

impl Expr {
    /// Returns true if the expression is a top-level `OR` chain.
    ///
    /// Appending `AND cond` to such an expression without parentheses would
    /// bind to its last disjunct only.
    #[must_use]
    pub const fn is_disjunction(&self) -> bool {
        matches!(
            self,
            Self::Binary {
                op: BinaryOp::Or,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str) -> Expr {
        Expr::Column {
            qualifiers: vec![],
            name: String::from(name),
            span: Span::default(),
        }
    }

    #[test]
    fn test_binary_op_as_str() {
        assert_eq!(BinaryOp::NullSafeEq.as_str(), "<=>");
        assert_eq!(BinaryOp::Rlike.as_str(), "RLIKE");
        assert!(BinaryOp::Or.is_logical());
        assert!(!BinaryOp::Eq.is_logical());
    }

    #[test]
    fn test_unary_op_as_str() {
        assert_eq!(UnaryOp::Not.as_str(), "NOT");
        assert_eq!(UnaryOp::Neg.as_str(), "-");
    }

    #[test]
    fn test_is_disjunction() {
        let or = Expr::Binary {
            left: Box::new(column("a")),
            op: BinaryOp::Or,
            right: Box::new(column("b")),
        };
        let paren = Expr::Paren(Box::new(or.clone()));
        assert!(or.is_disjunction());
        assert!(!paren.is_disjunction());
        assert!(!column("a").is_disjunction());
    }
}
