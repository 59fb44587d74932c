//! DuckDB SQL dialect implementation

use super::{SqlDialect, TruncUnit};

/// DuckDB SQL dialect
pub struct DuckdbDialect;

impl SqlDialect for DuckdbDialect {
    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn date_trunc(&self, unit: TruncUnit, col: &str) -> String {
        // date_trunc('week') follows ISO 8601 and truncates to Monday
        match unit {
            TruncUnit::Day => format!("CAST({} AS DATE)", col),
            TruncUnit::Week => format!("CAST(date_trunc('week', {}) AS DATE)", col),
            TruncUnit::Month => format!("CAST(date_trunc('month', {}) AS DATE)", col),
        }
    }

    fn date_param(&self, index: usize) -> String {
        format!("CAST({} AS DATE)", self.placeholder(index))
    }

    fn cast_to_double(&self, expr: &str) -> String {
        format!("CAST({} AS DOUBLE)", expr)
    }

    fn cast_to_string(&self, col: &str) -> String {
        format!("CAST({} AS VARCHAR)", col)
    }
}
