//! Query plan builder

use crate::core::constants::{COLUMN_AMOUNT, COLUMN_SALE_DATE};
use crate::data::sql::TruncUnit;
use crate::data::types::{AggregateExpr, BucketExpr, QueryPlan, SalesFilter};

use super::validate::{AggregateKind, AggregateRequest, Granularity};

/// Bucket expression per granularity, indexed by `Granularity as usize`.
/// Weeks start on Monday.
const BUCKETS: [(Granularity, BucketExpr); 3] = [
    (
        Granularity::Day,
        BucketExpr::truncate(TruncUnit::Day, COLUMN_SALE_DATE),
    ),
    (
        Granularity::Week,
        BucketExpr::truncate(TruncUnit::Week, COLUMN_SALE_DATE),
    ),
    (
        Granularity::Month,
        BucketExpr::truncate(TruncUnit::Month, COLUMN_SALE_DATE),
    ),
];

fn bucket_for(granularity: Granularity) -> BucketExpr {
    BUCKETS[granularity as usize].1
}

fn aggregate_for(kind: AggregateKind) -> AggregateExpr {
    match kind {
        AggregateKind::Count => AggregateExpr::CountRows,
        AggregateKind::Sum => AggregateExpr::Sum(COLUMN_AMOUNT),
    }
}

/// Build the plan for a validated request. Pure, no I/O.
pub fn build_plan(request: &AggregateRequest) -> QueryPlan {
    QueryPlan {
        bucket: bucket_for(request.granularity),
        aggregate: aggregate_for(request.aggregate),
        filter: SalesFilter {
            product_id: request.product_id,
            start_date: request.start_date,
            end_date: request.end_date,
        },
    }
}
