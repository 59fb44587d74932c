//! ClickHouse SQL dialect implementation

use super::{SqlDialect, TruncUnit};

/// ClickHouse SQL dialect
pub struct ClickhouseDialect;

impl SqlDialect for ClickhouseDialect {
    fn placeholder(&self, _index: usize) -> String {
        // ClickHouse uses ? for positional parameters
        "?".to_string()
    }

    fn date_trunc(&self, unit: TruncUnit, col: &str) -> String {
        match unit {
            TruncUnit::Day => format!("toDate({})", col),
            // toStartOfWeek defaults to Sunday; toMonday is the ISO week start
            TruncUnit::Week => format!("toMonday({})", col),
            TruncUnit::Month => format!("toStartOfMonth({})", col),
        }
    }

    fn date_param(&self, index: usize) -> String {
        format!("toDate({})", self.placeholder(index))
    }

    fn cast_to_double(&self, expr: &str) -> String {
        format!("toFloat64({})", expr)
    }

    fn cast_to_string(&self, col: &str) -> String {
        format!("toString({})", col)
    }
}
