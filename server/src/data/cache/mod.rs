//! Cache module
//!
//! Process-local cache for lookup lists. Entries expire per key, values are
//! stored as MessagePack bytes.

mod backend;
mod error;
mod key;
mod memory;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use backend::CacheBackend;
pub use error::CacheError;
pub use key::CacheKey;

use memory::InMemoryCache;

use crate::core::config::CacheConfig;

/// Cache service providing typed access to cache backend
///
/// Wraps the underlying cache backend and provides:
/// - Raw bytes API for flexibility
/// - Typed API using MessagePack serialization
pub struct CacheService {
    backend: Arc<dyn CacheBackend>,
}

impl std::fmt::Debug for CacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheService")
            .field("backend", &self.backend.backend_name())
            .finish()
    }
}

impl CacheService {
    /// Create a new cache service from configuration
    pub fn new(config: &CacheConfig) -> Result<Self, CacheError> {
        if config.max_entries == 0 {
            return Err(CacheError::Config(
                "max_entries must be greater than 0".into(),
            ));
        }
        tracing::debug!(
            max_entries = config.max_entries,
            lookup_ttl_secs = config.lookup_ttl_secs,
            "Initializing in-memory cache"
        );
        Ok(Self::with_backend(Arc::new(InMemoryCache::new(config))))
    }

    /// Create a cache service over an explicit backend
    pub fn with_backend(backend: Arc<dyn CacheBackend>) -> Self {
        Self { backend }
    }

    /// Get the backend name
    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    // =========================================================================
    // Raw bytes API
    // =========================================================================

    /// Get raw bytes from cache
    pub async fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.backend.get(key).await
    }

    /// Set raw bytes in cache
    pub async fn set_raw(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        self.backend.set(key, value, ttl).await
    }

    // =========================================================================
    // Typed API (serde)
    // =========================================================================

    /// Get a typed value from cache
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.get_raw(key).await? {
            Some(bytes) => {
                let value = rmp_serde::from_slice(&bytes)
                    .map_err(|e| CacheError::Serialization(e.to_string()))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a typed value in cache
    pub async fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let bytes =
            rmp_serde::to_vec(value).map_err(|e| CacheError::Serialization(e.to_string()))?;
        self.set_raw(key, bytes, ttl).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::DateBounds;
    use chrono::NaiveDate;

    fn test_config() -> CacheConfig {
        CacheConfig {
            max_entries: 1000,
            lookup_ttl_secs: 300,
        }
    }

    #[tokio::test]
    async fn test_cache_service_backend_name() {
        let service = CacheService::new(&test_config()).unwrap();
        assert_eq!(service.backend_name(), "memory");
    }

    #[tokio::test]
    async fn test_zero_capacity_rejected() {
        let config = CacheConfig {
            max_entries: 0,
            lookup_ttl_secs: 300,
        };
        assert!(matches!(
            CacheService::new(&config),
            Err(CacheError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_typed_get_set() {
        let service = CacheService::new(&test_config()).unwrap();

        let products = vec!["1".to_string(), "42".to_string()];
        service
            .set(&CacheKey::products(), &products, None)
            .await
            .unwrap();
        let fetched: Option<Vec<String>> = service.get(&CacheKey::products()).await.unwrap();
        assert_eq!(fetched, Some(products));

        let bounds = DateBounds {
            min_date: NaiveDate::from_ymd_opt(2023, 1, 5).unwrap(),
            max_date: NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
        };
        service
            .set(&CacheKey::date_range(), &bounds, None)
            .await
            .unwrap();
        let fetched: Option<DateBounds> = service.get(&CacheKey::date_range()).await.unwrap();
        assert_eq!(fetched, Some(bounds));
    }

    #[tokio::test]
    async fn test_get_with_wrong_type_is_serialization_error() {
        let service = CacheService::new(&test_config()).unwrap();
        service
            .set_raw("v1:lookup:products", vec![0xc1], None)
            .await
            .unwrap();
        let result: Result<Option<Vec<String>>, _> = service.get("v1:lookup:products").await;
        assert!(matches!(result, Err(CacheError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let service = CacheService::new(&test_config()).unwrap();
        let fetched: Option<Vec<String>> = service.get(&CacheKey::categories()).await.unwrap();
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn test_ttl_applies_to_typed_values() {
        let service = CacheService::new(&test_config()).unwrap();
        service
            .set(
                &CacheKey::categories(),
                &vec!["Books".to_string()],
                Some(Duration::from_millis(50)),
            )
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let fetched: Option<Vec<String>> = service.get(&CacheKey::categories()).await.unwrap();
        assert!(fetched.is_none());
    }
}
