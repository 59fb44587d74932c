//! Data storage layer
//!
//! Provides read access to the sales store:
//! - `duckdb` - Embedded analytics backend (default)
//! - `clickhouse` - Networked analytics backend
//! - `cache` - In-memory lookup cache
//! - `types` - Query plans and result rows shared by both backends
//! - `traits` - Repository trait for multi-backend support
//! - `sql` - SQL dialects for plan rendering
//! - `error` - Unified error type for all backends

pub mod cache;
pub mod clickhouse;
pub mod duckdb;
pub mod error;
pub mod sql;
pub mod traits;
pub mod types;

// Re-export backend-specific services
pub use clickhouse::ClickhouseService;
pub use duckdb::DuckdbService;

// Re-export unified error type
pub use error::DataError;

// Re-export repository trait
pub use traits::SalesRepository;

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::core::config::{AnalyticsBackend, DatabaseConfig};

/// Analytics database service enum
///
/// Wraps the underlying backend-specific service (DuckDB or ClickHouse).
/// Services are stored as Arc to enable safe extraction.
pub enum AnalyticsService {
    /// DuckDB backend (default, embedded)
    Duckdb(Arc<DuckdbService>),
    /// ClickHouse backend (for shared deployments)
    Clickhouse(Arc<ClickhouseService>),
}

impl AnalyticsService {
    /// Initialize the analytics service based on configuration
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DataError> {
        match config.analytics {
            AnalyticsBackend::Duckdb => {
                let service = DuckdbService::init(&config.duckdb, config.query_timeout_secs).await?;
                Ok(Self::Duckdb(Arc::new(service)))
            }
            AnalyticsBackend::Clickhouse => {
                let ch_config = config.clickhouse.as_ref().ok_or_else(|| {
                    DataError::Config("ClickHouse configuration required".to_string())
                })?;
                let service = ClickhouseService::init(ch_config, config.query_timeout_secs).await?;
                Ok(Self::Clickhouse(Arc::new(service)))
            }
        }
    }

    /// Close the database connection gracefully
    pub async fn close(&self) -> Result<(), DataError> {
        match self {
            Self::Duckdb(d) => Arc::clone(d).close().await.map_err(Into::into),
            Self::Clickhouse(c) => {
                c.close().await;
                Ok(())
            }
        }
    }

    /// Start the background health check task
    pub fn start_health_check_task(&self, shutdown_rx: watch::Receiver<bool>) -> JoinHandle<()> {
        match self {
            Self::Duckdb(d) => d.start_health_check_task(shutdown_rx),
            Self::Clickhouse(c) => c.start_health_check_task(shutdown_rx),
        }
    }

    /// Get the backend type
    pub fn backend(&self) -> AnalyticsBackend {
        match self {
            Self::Duckdb(_) => AnalyticsBackend::Duckdb,
            Self::Clickhouse(_) => AnalyticsBackend::Clickhouse,
        }
    }

    /// Get the repository trait object for sales reads
    pub fn repository(&self) -> Box<dyn SalesRepository> {
        match self {
            Self::Duckdb(d) => Box::new(Arc::clone(d)),
            Self::Clickhouse(c) => Box::new(Arc::clone(c)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DuckdbConfig;
    use crate::core::constants::DUCKDB_IN_MEMORY;

    fn memory_config() -> DatabaseConfig {
        DatabaseConfig {
            analytics: AnalyticsBackend::Duckdb,
            duckdb: DuckdbConfig {
                path: DUCKDB_IN_MEMORY.to_string(),
            },
            clickhouse: None,
            query_timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_init_duckdb_backend() {
        let service = AnalyticsService::init(&memory_config()).await.unwrap();
        assert_eq!(service.backend(), AnalyticsBackend::Duckdb);

        let repo = service.repository();
        assert!(repo.distinct_products().await.unwrap().is_empty());
        assert!(repo.sale_date_bounds().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clickhouse_without_config_rejected() {
        let config = DatabaseConfig {
            analytics: AnalyticsBackend::Clickhouse,
            ..memory_config()
        };
        let result = AnalyticsService::init(&config).await;
        assert!(matches!(result, Err(DataError::Config(_))));
    }

    #[tokio::test]
    async fn test_close_makes_reads_transient_failures() {
        let service = AnalyticsService::init(&memory_config()).await.unwrap();
        service.close().await.unwrap();

        let err = service.repository().distinct_categories().await.unwrap_err();
        assert!(err.is_transient());
    }
}
