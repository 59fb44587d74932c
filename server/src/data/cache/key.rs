//! Type-safe cache key builder with versioning

use crate::core::constants::CACHE_KEY_VERSION;

/// Type-safe cache key builder
///
/// All keys are prefixed with a version (e.g., "v1:") to allow
/// invalidating all cached data on schema changes.
pub struct CacheKey;

impl CacheKey {
    // =========================================================================
    // Lookups
    // =========================================================================

    /// Cache key for the distinct product list
    pub fn products() -> String {
        format!("{}:lookup:products", CACHE_KEY_VERSION)
    }

    /// Cache key for the distinct category list
    pub fn categories() -> String {
        format!("{}:lookup:categories", CACHE_KEY_VERSION)
    }

    /// Cache key for the sale date bounds
    pub fn date_range() -> String {
        format!("{}:lookup:date_range", CACHE_KEY_VERSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_keys_are_versioned() {
        assert_eq!(CacheKey::products(), "v1:lookup:products");
        assert_eq!(CacheKey::categories(), "v1:lookup:categories");
        assert_eq!(CacheKey::date_range(), "v1:lookup:date_range");
    }
}
