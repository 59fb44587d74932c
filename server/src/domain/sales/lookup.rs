//! Lookup lists for dashboard selectors
//!
//! Products, categories and the sale date range, each read independently and
//! cached for one freshness window. Failed reads are never cached.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::config::{CacheConfig, LookupsConfig};
use crate::data::cache::{CacheKey, CacheService};
use crate::data::error::DataError;
use crate::data::traits::SalesRepository;
use crate::data::types::DateBounds;

/// Cached lookup reads
#[derive(Debug, Clone)]
pub struct LookupService {
    cache: Arc<CacheService>,
    /// None disables caching
    ttl: Option<Duration>,
    fallback: DateBounds,
}

impl LookupService {
    pub fn new(
        cache: Arc<CacheService>,
        cache_config: &CacheConfig,
        lookups: &LookupsConfig,
    ) -> Self {
        let ttl = match cache_config.lookup_ttl_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        Self {
            cache,
            ttl,
            fallback: DateBounds {
                min_date: lookups.fallback_min_date,
                max_date: lookups.fallback_max_date,
            },
        }
    }

    /// Distinct product identifiers
    pub async fn products(&self, repo: &dyn SalesRepository) -> Result<Vec<String>, DataError> {
        self.cached(&CacheKey::products(), repo.distinct_products())
            .await
    }

    /// Distinct category names
    pub async fn categories(&self, repo: &dyn SalesRepository) -> Result<Vec<String>, DataError> {
        self.cached(&CacheKey::categories(), repo.distinct_categories())
            .await
    }

    /// Earliest and latest sale dates, or the configured fallback when the
    /// store holds no sales
    pub async fn date_range(&self, repo: &dyn SalesRepository) -> Result<DateBounds, DataError> {
        let fallback = self.fallback;
        self.cached(&CacheKey::date_range(), async move {
            Ok::<_, DataError>(repo.sale_date_bounds().await?.unwrap_or(fallback))
        })
        .await
    }

    async fn cached<T, F>(&self, key: &str, load: F) -> Result<T, DataError>
    where
        T: Serialize + DeserializeOwned,
        F: Future<Output = Result<T, DataError>>,
    {
        let Some(ttl) = self.ttl else {
            return load.await;
        };

        match self.cache.get::<T>(key).await {
            Ok(Some(value)) => {
                tracing::trace!(key, "Lookup cache hit");
                return Ok(value);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(key, error = %e, "Lookup cache read failed"),
        }

        let value = load.await?;
        if let Err(e) = self.cache.set(key, &value, Some(ttl)).await {
            tracing::warn!(key, error = %e, "Lookup cache write failed");
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sales::testing::{Failure, MockSalesRepository};
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn service(ttl_secs: u64) -> LookupService {
        let cache_config = CacheConfig {
            max_entries: 100,
            lookup_ttl_secs: ttl_secs,
        };
        let cache = Arc::new(CacheService::new(&cache_config).unwrap());
        LookupService::new(cache, &cache_config, &LookupsConfig::default())
    }

    #[tokio::test]
    async fn test_products_cached_within_window() {
        let lookups = service(300);
        let repo = MockSalesRepository::new().with_products(&["1", "42"]);

        assert_eq!(lookups.products(&repo).await.unwrap(), vec!["1", "42"]);
        repo.set_products(&["1", "42", "77"]);
        assert_eq!(lookups.products(&repo).await.unwrap(), vec!["1", "42"]);
        assert_eq!(repo.calls(), 1);
    }

    #[tokio::test]
    async fn test_zero_ttl_disables_caching() {
        let lookups = service(0);
        let repo = MockSalesRepository::new().with_categories(&["Books"]);

        lookups.categories(&repo).await.unwrap();
        lookups.categories(&repo).await.unwrap();
        assert_eq!(repo.calls(), 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let lookups = service(300);
        let repo = MockSalesRepository::new().with_categories(&["Books", "Games"]);

        repo.fail_categories(Some(Failure::Timeout));
        let err = lookups.categories(&repo).await.unwrap_err();
        assert!(err.is_transient());

        repo.fail_categories(None);
        assert_eq!(
            lookups.categories(&repo).await.unwrap(),
            vec!["Books", "Games"]
        );
        assert_eq!(repo.calls(), 2);
    }

    #[tokio::test]
    async fn test_lookups_fail_independently() {
        let lookups = service(300);
        let repo = MockSalesRepository::new()
            .with_products(&["42"])
            .with_categories(&["Books"]);

        repo.fail_products(Some(Failure::Broken));
        assert!(lookups.products(&repo).await.is_err());
        assert_eq!(lookups.categories(&repo).await.unwrap(), vec!["Books"]);
        assert!(lookups.date_range(&repo).await.is_ok());
    }

    #[tokio::test]
    async fn test_date_range_from_store() {
        let lookups = service(300);
        let bounds = DateBounds {
            min_date: date("2023-01-05"),
            max_date: date("2023-06-30"),
        };
        let repo = MockSalesRepository::new().with_bounds(bounds);
        assert_eq!(lookups.date_range(&repo).await.unwrap(), bounds);
    }

    #[tokio::test]
    async fn test_date_range_fallback_on_empty_store() {
        let lookups = service(300);
        let repo = MockSalesRepository::new();
        let range = lookups.date_range(&repo).await.unwrap();
        assert_eq!(range.min_date, date("2023-01-01"));
        assert_eq!(range.max_date, date("2023-12-31"));
    }

    #[tokio::test]
    async fn test_date_range_error_propagates() {
        let lookups = service(300);
        let repo = MockSalesRepository::new();
        repo.fail_bounds(Some(Failure::Broken));
        assert!(lookups.date_range(&repo).await.is_err());
    }
}
