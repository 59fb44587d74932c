//! Aggregate service: validate, build, execute, format

use thiserror::Error;

use crate::data::error::DataError;
use crate::data::traits::SalesRepository;
use crate::data::types::SeriesPoint;

use super::plan::build_plan;
use super::validate::{RawAggregateParams, ValidationError, validate};

/// Failure of an aggregate call
#[derive(Debug, Error)]
pub enum SalesError {
    /// Client-caused, never retried
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Store failed, timed out or returned rows of the wrong shape
    #[error("Query failed: {0}")]
    Execution(#[from] DataError),
}

impl SalesError {
    /// Whether retrying the same call may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Validation(_) => false,
            Self::Execution(e) => e.is_transient(),
        }
    }
}

/// Run one aggregate request
///
/// Invalid input never reaches the store. A valid request issues exactly
/// one store query; an empty result is an empty series.
pub async fn execute(
    repo: &dyn SalesRepository,
    raw: &RawAggregateParams,
) -> Result<Vec<SeriesPoint>, SalesError> {
    let request = validate(raw)?;
    let plan = build_plan(&request);

    tracing::debug!(
        product_id = request.product_id,
        start_date = %request.start_date,
        end_date = %request.end_date,
        aggregate = ?request.aggregate,
        granularity = ?request.granularity,
        "Executing aggregate"
    );

    let rows = repo.aggregate(&plan).await?;
    Ok(format_series(rows))
}

/// Sort by bucket and merge duplicate buckets
///
/// Stores return grouped, ordered rows; for those this is the identity.
/// Duplicates can only come from a misbehaving store and are summed, which
/// is correct for both count and sum aggregates.
pub fn format_series(mut rows: Vec<SeriesPoint>) -> Vec<SeriesPoint> {
    rows.sort_by_key(|p| p.time);
    let mut series: Vec<SeriesPoint> = Vec::with_capacity(rows.len());
    for point in rows {
        match series.last_mut() {
            Some(last) if last.time == point.time => last.value += point.value,
            _ => series.push(point),
        }
    }
    series
}
