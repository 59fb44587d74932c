//! SalesRepository trait implementation for ClickHouse
//!
//! The clickhouse Client is Clone + Send + Sync and pools HTTP connections,
//! so each call borrows it directly. Every call is bounded by the service's
//! query timeout.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::traits::SalesRepository;
use crate::data::types::{DateBounds, QueryPlan, SeriesPoint};

use super::repositories::sales;
use super::{ClickhouseError, ClickhouseService};

impl ClickhouseService {
    /// Await a query future, failing with `Timeout` past the configured limit
    ///
    /// The request is dropped on timeout; work already running on the server
    /// is not cancelled.
    async fn with_timeout<T, F>(&self, fut: F) -> Result<T, ClickhouseError>
    where
        F: Future<Output = Result<T, ClickhouseError>>,
    {
        let timeout_secs = self.query_timeout_secs();
        tokio::time::timeout(Duration::from_secs(timeout_secs), fut)
            .await
            .map_err(|_| {
                tracing::warn!("ClickHouse query timed out after {}s", timeout_secs);
                ClickhouseError::Timeout { timeout_secs }
            })?
    }
}

#[async_trait]
impl SalesRepository for Arc<ClickhouseService> {
    async fn aggregate(&self, plan: &QueryPlan) -> Result<Vec<SeriesPoint>, DataError> {
        self.with_timeout(sales::aggregate(self.client(), plan))
            .await
            .map_err(Into::into)
    }

    async fn distinct_products(&self) -> Result<Vec<String>, DataError> {
        self.with_timeout(sales::distinct_products(self.client()))
            .await
            .map_err(Into::into)
    }

    async fn distinct_categories(&self) -> Result<Vec<String>, DataError> {
        self.with_timeout(sales::distinct_categories(self.client()))
            .await
            .map_err(Into::into)
    }

    async fn sale_date_bounds(&self) -> Result<Option<DateBounds>, DataError> {
        self.with_timeout(sales::sale_date_bounds(self.client()))
            .await
            .map_err(Into::into)
    }
}
