//! Shared data types for all database backends
//!
//! This module contains types that are used by both analytics backends
//! (DuckDB, ClickHouse) to ensure consistent data models.

mod sales;

pub use sales::{
    AggregateExpr, BucketExpr, DateBounds, QueryParam, QueryPlan, RenderedQuery, SalesFilter,
    SeriesPoint,
};
