//! SalesRepository trait implementation for DuckDB
//!
//! Implemented for Arc<DuckdbService> rather than DuckdbService directly
//! because the mutex guard protecting the connection is not Send, so the Arc
//! is cloned and the connection taken inside the spawn_blocking closure.

use std::sync::Arc;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::traits::SalesRepository;
use crate::data::types::{DateBounds, QueryPlan, SeriesPoint};

use super::DuckdbService;
use super::repositories::sales;

#[async_trait]
impl SalesRepository for Arc<DuckdbService> {
    async fn aggregate(&self, plan: &QueryPlan) -> Result<Vec<SeriesPoint>, DataError> {
        let plan = *plan;
        self.run_query(move |conn| sales::aggregate(conn, &plan))
            .await
            .map_err(Into::into)
    }

    async fn distinct_products(&self) -> Result<Vec<String>, DataError> {
        self.run_query(sales::distinct_products)
            .await
            .map_err(Into::into)
    }

    async fn distinct_categories(&self) -> Result<Vec<String>, DataError> {
        self.run_query(sales::distinct_categories)
            .await
            .map_err(Into::into)
    }

    async fn sale_date_bounds(&self) -> Result<Option<DateBounds>, DataError> {
        self.run_query(sales::sale_date_bounds)
            .await
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::duckdb::repositories::sales::seed;

    fn service() -> Arc<DuckdbService> {
        let service = DuckdbService::open_in_memory(5).unwrap();
        {
            let conn = service.conn().unwrap();
            seed(
                &conn,
                &[(1, "Toys")],
                &[(1, "2023-03-01", 2.0), (1, "2023-03-04", 4.0)],
            )
            .unwrap();
        }
        Arc::new(service)
    }

    #[tokio::test]
    async fn test_repository_via_trait_object() {
        let repo: Box<dyn SalesRepository> = Box::new(service());

        assert_eq!(repo.distinct_products().await.unwrap(), vec!["1"]);
        assert_eq!(repo.distinct_categories().await.unwrap(), vec!["Toys"]);
        let bounds = repo.sale_date_bounds().await.unwrap().unwrap();
        assert_eq!(bounds.min_date.to_string(), "2023-03-01");
        assert_eq!(bounds.max_date.to_string(), "2023-03-04");
    }

    #[tokio::test]
    async fn test_closed_service_errors_are_transient() {
        let service = service();
        let repo: Box<dyn SalesRepository> = Box::new(Arc::clone(&service));
        service.close().await.unwrap();

        let err = repo.distinct_categories().await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(err.backend(), "duckdb");
    }
}
