//! Data type and column definition AST types.

use super::statement::Ident;
use crate::lexer::TokenRange;

/// A data type as written in `CAST` or a column definition.
///
/// Hive types nest freely (`MAP<STRING, ARRAY<STRUCT<a:INT>>>`), so only
/// the base name is interpreted; the full type is addressable through its
/// token range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataType {
    /// Base type name as written (`DECIMAL`, `array`, ...).
    pub name: String,
    /// Tokens of the full type, parameters included.
    pub range: TokenRange,
}

impl DataType {
    /// Returns true if the base name matches `name`, ignoring case.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// A column definition in `CREATE TABLE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name.
    pub name: Ident,
    /// Column type.
    pub data_type: DataType,
    /// `COMMENT '...'` text, if present.
    pub comment: Option<String>,
}
