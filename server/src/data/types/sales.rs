//! Sales query plan and result types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::constants::{COLUMN_SALE_DATE, TABLE_FACT_SALES};
use crate::data::sql::{SqlDialect, TruncUnit};

/// Grouping expression of a plan
///
/// Opaque outside the data layer; built only from a fixed set of truncations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketExpr {
    unit: TruncUnit,
    column: &'static str,
}

impl BucketExpr {
    /// Bucket `column` by the start of its calendar `unit`
    pub const fn truncate(unit: TruncUnit, column: &'static str) -> Self {
        Self { unit, column }
    }

    fn render(&self, dialect: &dyn SqlDialect) -> String {
        dialect.date_trunc(self.unit, self.column)
    }
}

/// Aggregate computed per bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateExpr {
    /// Number of sales rows
    CountRows,
    /// Sum of a numeric column
    Sum(&'static str),
}

impl AggregateExpr {
    fn render(&self, dialect: &dyn SqlDialect) -> String {
        match self {
            Self::CountRows => dialect.count_rows().to_string(),
            Self::Sum(column) => format!("sum({})", column),
        }
    }
}

/// Rows selected by a plan: one product over an inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SalesFilter {
    pub product_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Fully resolved aggregate query, independent of any backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryPlan {
    pub bucket: BucketExpr,
    pub aggregate: AggregateExpr,
    pub filter: SalesFilter,
}

/// Value bound to a positional placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryParam {
    UInt64(u64),
    /// Sent as `YYYY-MM-DD` text and converted by the dialect's `date_param`
    Date(NaiveDate),
}

/// SQL text plus its positional parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedQuery {
    pub sql: String,
    pub params: Vec<QueryParam>,
}

impl QueryPlan {
    /// Render the plan for a dialect
    ///
    /// Result columns are `time` (bucket start as `YYYY-MM-DD` text) and
    /// `value` (64-bit float). Filter values are always bound, never inlined.
    pub fn render(&self, dialect: &dyn SqlDialect) -> RenderedQuery {
        let bucket = self.bucket.render(dialect);
        let aggregate = self.aggregate.render(dialect);

        let sql = format!(
            "SELECT {time} AS time, {value} AS value \
             FROM {table} \
             WHERE product_id = {p1} AND {date_col} BETWEEN {p2} AND {p3} \
             GROUP BY {bucket} \
             ORDER BY {bucket} ASC",
            time = dialect.cast_to_string(&bucket),
            value = dialect.cast_to_double(&aggregate),
            table = TABLE_FACT_SALES,
            p1 = dialect.placeholder(1),
            date_col = COLUMN_SALE_DATE,
            p2 = dialect.date_param(2),
            p3 = dialect.date_param(3),
            bucket = bucket,
        );

        RenderedQuery {
            sql,
            params: vec![
                QueryParam::UInt64(self.filter.product_id),
                QueryParam::Date(self.filter.start_date),
                QueryParam::Date(self.filter.end_date),
            ],
        }
    }
}

/// One bucket of an aggregate series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SeriesPoint {
    /// Bucket start date (YYYY-MM-DD)
    #[schema(value_type = String, format = Date, example = "2023-01-05")]
    pub time: NaiveDate,
    pub value: f64,
}

/// Earliest and latest sale dates present in the fact table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DateBounds {
    #[schema(value_type = String, format = Date, example = "2023-01-01")]
    pub min_date: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2023-12-31")]
    pub max_date: NaiveDate,
}
