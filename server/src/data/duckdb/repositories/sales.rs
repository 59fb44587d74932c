//! Sales repository: aggregate series and selector lookups

use chrono::NaiveDate;
use duckdb::Connection;
use duckdb::types::Value;

use crate::data::duckdb::DuckdbError;
use crate::data::sql::DuckdbDialect;
use crate::data::types::{DateBounds, QueryParam, QueryPlan, SeriesPoint};

fn to_value(param: &QueryParam) -> Value {
    match param {
        QueryParam::UInt64(v) => Value::UBigInt(*v),
        QueryParam::Date(d) => Value::Text(d.format("%Y-%m-%d").to_string()),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, DuckdbError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| DuckdbError::InvalidRow(format!("bad date '{}': {}", raw, e)))
}

/// Execute an aggregate plan
pub fn aggregate(conn: &Connection, plan: &QueryPlan) -> Result<Vec<SeriesPoint>, DuckdbError> {
    let rendered = plan.render(&DuckdbDialect);
    tracing::trace!(sql = %rendered.sql, params = ?rendered.params, "DuckDB aggregate");

    let mut stmt = conn.prepare(&rendered.sql)?;
    let rows = stmt.query_map(
        duckdb::params_from_iter(rendered.params.iter().map(to_value)),
        |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)),
    )?;

    let mut points = Vec::new();
    for row in rows {
        let (time, value) = row?;
        points.push(SeriesPoint {
            time: parse_date(&time)?,
            value,
        });
    }
    Ok(points)
}

/// Distinct product ids with at least one sale, ascending
pub fn distinct_products(conn: &Connection) -> Result<Vec<String>, DuckdbError> {
    let mut stmt =
        conn.prepare("SELECT DISTINCT product_id FROM fact_sales ORDER BY product_id")?;
    let ids = stmt
        .query_map([], |row| row.get::<_, u64>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ids.into_iter().map(|id| id.to_string()).collect())
}

/// Distinct categories from the product dimension, ascending
pub fn distinct_categories(conn: &Connection) -> Result<Vec<String>, DuckdbError> {
    let mut stmt = conn.prepare("SELECT DISTINCT category FROM dim_products ORDER BY category")?;
    let categories = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(categories)
}

/// Earliest and latest sale dates; None when there are no sales
pub fn sale_date_bounds(conn: &Connection) -> Result<Option<DateBounds>, DuckdbError> {
    let (min, max): (Option<String>, Option<String>) = conn.query_row(
        "SELECT CAST(min(sale_date) AS VARCHAR), CAST(max(sale_date) AS VARCHAR) FROM fact_sales",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    match (min, max) {
        (Some(min), Some(max)) => Ok(Some(DateBounds {
            min_date: parse_date(&min)?,
            max_date: parse_date(&max)?,
        })),
        _ => Ok(None),
    }
}

/// Insert products and sales rows (test fixture)
#[cfg(test)]
pub(crate) fn seed(
    conn: &Connection,
    products: &[(u64, &str)],
    sales: &[(u64, &str, f64)],
) -> Result<(), DuckdbError> {
    for (id, category) in products {
        conn.execute(
            "INSERT INTO dim_products (product_id, product_name, category) VALUES (?, ?, ?)",
            duckdb::params![id, format!("Product {}", id), category],
        )?;
    }
    for (i, (product_id, date, amount)) in sales.iter().enumerate() {
        conn.execute(
            "INSERT INTO fact_sales (sale_id, product_id, sale_date, quantity, total_amount) \
             VALUES (?, ?, CAST(? AS DATE), 1, ?)",
            duckdb::params![i as u64 + 1, product_id, date, amount],
        )?;
    }
    Ok(())
}
