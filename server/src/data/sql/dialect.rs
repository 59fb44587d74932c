//! SQL dialect trait for multi-database support
//!
//! This trait defines the interface for generating database-specific SQL syntax.

use super::TruncUnit;

/// SQL dialect trait for generating database-specific SQL
///
/// Different databases have different syntax for:
/// - Parameter placeholders
/// - Date truncation
/// - Type casting
pub trait SqlDialect: Send + Sync {
    /// Generate a parameter placeholder for the given index (1-based)
    ///
    /// Both DuckDB and ClickHouse use positional "?"
    fn placeholder(&self, index: usize) -> String;

    /// Truncate a date column to the start of its calendar unit
    ///
    /// - DuckDB: `CAST(date_trunc('week', col) AS DATE)`
    /// - ClickHouse: `toMonday(col)`
    fn date_trunc(&self, unit: TruncUnit, col: &str) -> String;

    /// Bound parameter (passed as `YYYY-MM-DD` text) interpreted as a date
    ///
    /// - DuckDB: `CAST(? AS DATE)`
    /// - ClickHouse: `toDate(?)`
    fn date_param(&self, index: usize) -> String;

    /// Number of rows in the group
    fn count_rows(&self) -> &'static str {
        "count(*)"
    }

    /// Cast an expression to a 64-bit float
    ///
    /// - DuckDB: `CAST(expr AS DOUBLE)`
    /// - ClickHouse: `toFloat64(expr)`
    fn cast_to_double(&self, expr: &str) -> String;

    /// Cast a column to string type (dates render as `YYYY-MM-DD`)
    ///
    /// - DuckDB: `CAST(col AS VARCHAR)`
    /// - ClickHouse: `toString(col)`
    fn cast_to_string(&self, col: &str) -> String;
}
