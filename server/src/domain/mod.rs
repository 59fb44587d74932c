//! Domain logic for sales analytics
//!
//! - `sales` - aggregate requests and lookup lists

pub mod sales;

pub use sales::{LookupService, SalesError};
