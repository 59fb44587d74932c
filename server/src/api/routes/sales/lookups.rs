//! Selector lookups: products, categories, date range

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, header};
use axum::response::IntoResponse;

use super::SalesApiState;
use crate::api::types::{ApiError, ErrorResponse};
use crate::data::types::DateBounds;

fn lookup_headers(state: &SalesApiState) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::CACHE_CONTROL, state.lookup_cache_control.clone());
    headers
}

/// List distinct product identifiers
#[utoipa::path(
    get,
    path = "/products",
    tag = "lookups",
    responses(
        (status = 200, description = "Product identifiers", body = Vec<String>, example = json!(["1", "42"])),
        (status = 500, description = "Store failure", body = ErrorResponse),
        (status = 503, description = "Store unavailable", body = ErrorResponse)
    )
)]
pub async fn list_products(
    State(state): State<SalesApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = state.analytics.repository();
    let products = state
        .lookups
        .products(repo.as_ref())
        .await
        .map_err(|e| ApiError::from_data(e, "Failed to fetch products"))?;
    Ok((lookup_headers(&state), Json(products)))
}

/// List distinct product categories
#[utoipa::path(
    get,
    path = "/categories",
    tag = "lookups",
    responses(
        (status = 200, description = "Category names", body = Vec<String>, example = json!(["Books", "Games"])),
        (status = 500, description = "Store failure", body = ErrorResponse),
        (status = 503, description = "Store unavailable", body = ErrorResponse)
    )
)]
pub async fn list_categories(
    State(state): State<SalesApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = state.analytics.repository();
    let categories = state
        .lookups
        .categories(repo.as_ref())
        .await
        .map_err(|e| ApiError::from_data(e, "Failed to fetch categories"))?;
    Ok((lookup_headers(&state), Json(categories)))
}

/// Earliest and latest sale dates
///
/// Reports the configured fallback range when there are no sales.
#[utoipa::path(
    get,
    path = "/date_range",
    tag = "lookups",
    responses(
        (status = 200, description = "Sale date bounds", body = DateBounds),
        (status = 500, description = "Store failure", body = ErrorResponse),
        (status = 503, description = "Store unavailable", body = ErrorResponse)
    )
)]
pub async fn get_date_range(
    State(state): State<SalesApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = state.analytics.repository();
    let range = state
        .lookups
        .date_range(repo.as_ref())
        .await
        .map_err(|e| ApiError::from_data(e, "Failed to fetch date range"))?;
    Ok((lookup_headers(&state), Json(range)))
}
