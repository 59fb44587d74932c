//! Sales analytics
//!
//! - `validate` - raw parameters to a typed request
//! - `plan` - request to backend-independent query plan
//! - `service` - aggregate orchestration and result formatting
//! - `lookup` - cached selector lists

pub mod lookup;
pub mod plan;
pub mod service;
pub mod validate;

#[cfg(test)]
pub(crate) mod testing;

pub use lookup::LookupService;
pub use plan::build_plan;
pub use service::{SalesError, execute, format_series};
pub use validate::{
    AggregateKind, AggregateRequest, Granularity, RawAggregateParams, ValidationError, validate,
};
