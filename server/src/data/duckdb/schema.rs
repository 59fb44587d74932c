//! DuckDB schema definitions
//!
//! Star schema used by the embedded backend: one fact row per sale plus a
//! product dimension carrying the category. Mirrors the ClickHouse layout.

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema SQL
pub const SCHEMA: &str = r#"
-- Infrastructure: Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at BIGINT NOT NULL,
    description VARCHAR
);

-- Product dimension
CREATE TABLE IF NOT EXISTS dim_products (
    product_id          UBIGINT PRIMARY KEY,
    product_name        VARCHAR,
    category            VARCHAR NOT NULL
);

-- Sales fact: one row per sale, amount may be negative for refunds
CREATE TABLE IF NOT EXISTS fact_sales (
    sale_id             UBIGINT,
    product_id          UBIGINT NOT NULL,
    sale_date           DATE NOT NULL,
    quantity            INTEGER,
    total_amount        DOUBLE NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_fact_sales_product_date ON fact_sales (product_id, sale_date);
"#;
