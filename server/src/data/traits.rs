//! Repository traits for database backends
//!
//! This module defines the trait that provides a unified interface for sales
//! reads across backends. Each backend (DuckDB, ClickHouse) implements it
//! with its own specific logic.

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::types::{DateBounds, QueryPlan, SeriesPoint};

// ============================================================================
// Sales Repository Trait
// ============================================================================

/// Read-only repository over the sales fact and product dimension tables
///
/// Implemented by DuckDB and ClickHouse backends. Every call issues exactly
/// one store query bounded by the configured query timeout.
#[async_trait]
pub trait SalesRepository: Send + Sync {
    /// Execute an aggregate plan, returning points in store order
    async fn aggregate(&self, plan: &QueryPlan) -> Result<Vec<SeriesPoint>, DataError>;

    /// Distinct product identifiers present in the fact table, as decimal strings
    async fn distinct_products(&self) -> Result<Vec<String>, DataError>;

    /// Distinct category names from the product dimension
    async fn distinct_categories(&self) -> Result<Vec<String>, DataError>;

    /// Earliest and latest sale dates (None when the fact table is empty)
    async fn sale_date_bounds(&self) -> Result<Option<DateBounds>, DataError>;
}
