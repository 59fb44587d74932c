//! Aggregate time series endpoint

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::IntoResponse;

use super::SalesApiState;
use crate::api::extractors::ApiQuery;
use crate::api::types::{ApiError, ErrorResponse};
use crate::data::types::SeriesPoint;
use crate::domain::sales::{self, RawAggregateParams};

/// Aggregate sales of one product per day, week or month
///
/// Points are ascending by bucket start, one per bucket with sales.
#[utoipa::path(
    get,
    path = "/aggregate",
    tag = "aggregate",
    params(RawAggregateParams),
    responses(
        (status = 200, description = "Time series", body = Vec<SeriesPoint>,
            example = json!([{"time": "2023-01-05", "value": 15.0}, {"time": "2023-01-20", "value": 3.0}])),
        (status = 400, description = "Invalid parameters", body = ErrorResponse),
        (status = 500, description = "Query failed", body = ErrorResponse),
        (status = 503, description = "Store unavailable", body = ErrorResponse)
    )
)]
pub async fn get_aggregate(
    State(state): State<SalesApiState>,
    ApiQuery(params): ApiQuery<RawAggregateParams>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = state.analytics.repository();
    let series = sales::execute(repo.as_ref(), &params)
        .await
        .map_err(ApiError::from_sales)?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));

    Ok((headers, Json(series)))
}
