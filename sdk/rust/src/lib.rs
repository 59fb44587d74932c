//! # Salesboard
//!
//! Client for the Salesboard sales analytics API, plus a [`Dashboard`]
//! façade that turns every call into something rendering code can show
//! without handling errors.
//!
//! ```no_run
//! use salesboard::{AggregateKind, AggregateQuery, Dashboard, DashboardClient, Granularity, Panel};
//!
//! # async fn demo() -> Result<(), salesboard::ClientError> {
//! let dashboard = Dashboard::new(DashboardClient::new("http://127.0.0.1:5000")?);
//! let window = dashboard.date_range().await;
//! let query = AggregateQuery {
//!     product_id: 42,
//!     start_date: window.min,
//!     end_date: window.max,
//!     aggregate: AggregateKind::from_label("Сумма продаж").unwrap_or(AggregateKind::Count),
//!     granularity: Granularity::Day,
//! };
//! match dashboard.aggregate(&query).await {
//!     Panel::Ready(series) => println!("{} points", series.len()),
//!     Panel::Empty => println!("{}", salesboard::NO_DATA_MESSAGE),
//!     Panel::Unavailable(warning) => eprintln!("{}", warning),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod dashboard;
mod error;
mod types;

pub use client::{DEFAULT_TIMEOUT_SECS, DashboardClient};
pub use dashboard::{DEFAULT_LOOKUP_TTL_SECS, DateWindow, Dashboard, NO_DATA_MESSAGE, Panel};
pub use error::ClientError;
pub use types::{AggregateKind, AggregateQuery, DateBounds, Granularity, Language, SeriesPoint};
