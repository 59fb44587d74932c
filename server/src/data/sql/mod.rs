//! SQL abstraction layer for multi-database support
//!
//! This module provides abstractions for generating SQL that works across
//! the analytics backends (DuckDB, ClickHouse).

mod clickhouse_dialect;
mod dialect;
mod duckdb_dialect;

pub use clickhouse_dialect::ClickhouseDialect;
pub use dialect::SqlDialect;
pub use duckdb_dialect::DuckdbDialect;

/// Calendar unit a date column is truncated to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TruncUnit {
    Day,
    /// ISO week, starting Monday
    Week,
    Month,
}
