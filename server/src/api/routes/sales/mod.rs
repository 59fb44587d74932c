//! Sales API endpoints

pub mod aggregate;
pub mod lookups;

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::get;

use crate::data::AnalyticsService;
use crate::domain::sales::LookupService;

// ============================================================================
// State
// ============================================================================

#[derive(Clone)]
pub struct SalesApiState {
    pub analytics: Arc<AnalyticsService>,
    pub lookups: Arc<LookupService>,
    /// Cache-Control sent with lookup lists
    pub lookup_cache_control: HeaderValue,
}

impl SalesApiState {
    pub fn new(
        analytics: Arc<AnalyticsService>,
        lookups: Arc<LookupService>,
        lookup_ttl_secs: u64,
    ) -> Self {
        let lookup_cache_control = match lookup_ttl_secs {
            0 => HeaderValue::from_static("no-store"),
            secs => HeaderValue::from_str(&format!("private, max-age={}", secs))
                .unwrap_or_else(|_| HeaderValue::from_static("no-store")),
        };
        Self {
            analytics,
            lookups,
            lookup_cache_control,
        }
    }
}

/// Sales routes, including the `/get_*` aliases kept for older clients
pub fn routes(state: SalesApiState) -> Router<()> {
    Router::new()
        .route("/products", get(lookups::list_products))
        .route("/categories", get(lookups::list_categories))
        .route("/date_range", get(lookups::get_date_range))
        .route("/aggregate", get(aggregate::get_aggregate))
        .route("/get_products", get(lookups::list_products))
        .route("/get_categories", get(lookups::list_categories))
        .route("/get_date_range", get(lookups::get_date_range))
        .route("/get_aggregate", get(aggregate::get_aggregate))
        .with_state(state)
}
