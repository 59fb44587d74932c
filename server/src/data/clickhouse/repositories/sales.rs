//! Sales repository (ClickHouse backend)

use chrono::NaiveDate;
use clickhouse::{Client, Row};
use serde::Deserialize;

use crate::data::clickhouse::ClickhouseError;
use crate::data::sql::ClickhouseDialect;
use crate::data::types::{DateBounds, QueryParam, QueryPlan, SeriesPoint};

/// ClickHouse row for one aggregate bucket
#[derive(Row, Deserialize)]
struct ChSeriesRow {
    time: String,
    value: f64,
}

/// ClickHouse row for distinct product ids
#[derive(Row, Deserialize)]
struct ChProductRow {
    id: String,
}

/// Ids are stringified in the store so any integer column width decodes;
/// ordering stays numeric
const DISTINCT_PRODUCTS_SQL: &str = "SELECT toString(product_id) AS id \
     FROM fact_sales \
     GROUP BY product_id \
     ORDER BY product_id";

/// ClickHouse row for distinct categories
#[derive(Row, Deserialize)]
struct ChCategoryRow {
    category: String,
}

/// ClickHouse row for sale date bounds
///
/// min/max of an empty table are the Date default (1970-01-01), so the row
/// count decides whether the bounds are meaningful.
#[derive(Row, Deserialize)]
struct ChDateBoundsRow {
    row_count: u64,
    min_date: String,
    max_date: String,
}

fn parse_date(raw: &str) -> Result<NaiveDate, ClickhouseError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| ClickhouseError::InvalidRow(format!("bad date '{}': {}", raw, e)))
}

/// Execute an aggregate plan
pub async fn aggregate(
    client: &Client,
    plan: &QueryPlan,
) -> Result<Vec<SeriesPoint>, ClickhouseError> {
    let rendered = plan.render(&ClickhouseDialect);
    tracing::trace!(sql = %rendered.sql, params = ?rendered.params, "ClickHouse aggregate");

    let mut q = client.query(&rendered.sql);
    for param in &rendered.params {
        q = match param {
            QueryParam::UInt64(v) => q.bind(*v),
            QueryParam::Date(d) => q.bind(d.format("%Y-%m-%d").to_string()),
        };
    }

    let rows: Vec<ChSeriesRow> = q.fetch_all().await?;
    rows.into_iter()
        .map(|row| {
            Ok(SeriesPoint {
                time: parse_date(&row.time)?,
                value: row.value,
            })
        })
        .collect()
}

/// Distinct product ids with at least one sale, ascending
pub async fn distinct_products(client: &Client) -> Result<Vec<String>, ClickhouseError> {
    let rows: Vec<ChProductRow> = client.query(DISTINCT_PRODUCTS_SQL).fetch_all().await?;
    Ok(rows.into_iter().map(|r| r.id).collect())
}

/// Distinct categories from the product dimension, ascending
pub async fn distinct_categories(client: &Client) -> Result<Vec<String>, ClickhouseError> {
    let rows: Vec<ChCategoryRow> = client
        .query("SELECT DISTINCT toString(category) AS category FROM dim_products ORDER BY category")
        .fetch_all()
        .await?;
    Ok(rows.into_iter().map(|r| r.category).collect())
}

/// Earliest and latest sale dates; None when there are no sales
pub async fn sale_date_bounds(client: &Client) -> Result<Option<DateBounds>, ClickhouseError> {
    let row: ChDateBoundsRow = client
        .query(
            "SELECT count() AS row_count, \
                    toString(min(sale_date)) AS min_date, \
                    toString(max(sale_date)) AS max_date \
             FROM fact_sales",
        )
        .fetch_one()
        .await?;

    if row.row_count == 0 {
        return Ok(None);
    }
    Ok(Some(DateBounds {
        min_date: parse_date(&row.min_date)?,
        max_date: parse_date(&row.max_date)?,
    }))
}
