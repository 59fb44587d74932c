//! Rendering-side façade over [`DashboardClient`]
//!
//! Every call resolves to a value the UI can show directly. Failures become
//! warnings; nothing here returns an error or panics. Lookup lists change
//! rarely, so they are memoized for a TTL while aggregates always hit the API.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use moka::future::Cache;

use crate::client::DashboardClient;
use crate::error::ClientError;
use crate::types::{AggregateQuery, DateBounds, SeriesPoint};

/// Lookup memoization window used by [`Dashboard::new`]
pub const DEFAULT_LOOKUP_TTL_SECS: u64 = 300;

/// Shown in place of a chart when an aggregate matched nothing
pub const NO_DATA_MESSAGE: &str = "No data for the selected filters";

/// What a widget should render
#[derive(Debug, Clone, PartialEq)]
pub enum Panel<T> {
    Ready(T),
    Empty,
    /// Data could not be loaded; the string is a user-facing warning
    Unavailable(String),
}

impl<T> Panel<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            Self::Unavailable(warning) => Some(warning),
            _ => None,
        }
    }
}

/// Bounds for the date pickers
///
/// Always usable: when the API cannot provide bounds both ends are today and
/// `warning` says why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateWindow {
    pub min: NaiveDate,
    pub max: NaiveDate,
    pub warning: Option<String>,
}

pub struct Dashboard {
    client: DashboardClient,
    products: Cache<(), Arc<Vec<String>>>,
    categories: Cache<(), Arc<Vec<String>>>,
    bounds: Cache<(), DateBounds>,
}

impl Dashboard {
    pub fn new(client: DashboardClient) -> Self {
        Self::with_lookup_ttl(client, Duration::from_secs(DEFAULT_LOOKUP_TTL_SECS))
    }

    pub fn with_lookup_ttl(client: DashboardClient, ttl: Duration) -> Self {
        Self {
            client,
            products: lookup_cache(ttl),
            categories: lookup_cache(ttl),
            bounds: lookup_cache(ttl),
        }
    }

    pub fn client(&self) -> &DashboardClient {
        &self.client
    }

    pub async fn products(&self) -> Panel<Arc<Vec<String>>> {
        let fetch = async { self.client.products().await.map(Arc::new) };
        list_panel("products", memoized(&self.products, fetch).await)
    }

    pub async fn categories(&self) -> Panel<Arc<Vec<String>>> {
        let fetch = async { self.client.categories().await.map(Arc::new) };
        list_panel("categories", memoized(&self.categories, fetch).await)
    }

    /// Store date bounds, or (today, today) with a warning
    pub async fn date_range(&self) -> DateWindow {
        let bounds = match memoized(&self.bounds, self.client.date_range()).await {
            Ok(bounds) => bounds,
            Err(e) => return DateWindow::today(format!("Could not load date range: {}", e)),
        };

        match (parse_date(&bounds.min_date), parse_date(&bounds.max_date)) {
            (Some(min), Some(max)) => DateWindow {
                min,
                max,
                warning: None,
            },
            _ => {
                tracing::warn!(min = %bounds.min_date, max = %bounds.max_date, "Unparseable date bounds");
                DateWindow::today(format!(
                    "Could not load date range: unexpected bounds {} .. {}",
                    bounds.min_date, bounds.max_date
                ))
            }
        }
    }

    pub async fn aggregate(&self, query: &AggregateQuery) -> Panel<Vec<SeriesPoint>> {
        match self.client.aggregate(query).await {
            Ok(series) if series.is_empty() => Panel::Empty,
            Ok(series) => Panel::Ready(series),
            Err(e) => {
                tracing::warn!(product_id = query.product_id, error = %e, "Aggregate request failed");
                Panel::Unavailable(format!("Could not load sales data: {}", e))
            }
        }
    }

    /// Drop memoized lookups so the next call refetches
    pub fn invalidate_lookups(&self) {
        self.products.invalidate_all();
        self.categories.invalidate_all();
        self.bounds.invalidate_all();
    }
}

impl DateWindow {
    fn today(warning: String) -> Self {
        tracing::warn!(warning = %warning, "Falling back to today's date");
        let today = Local::now().date_naive();
        Self {
            min: today,
            max: today,
            warning: Some(warning),
        }
    }
}

fn lookup_cache<T: Clone + Send + Sync + 'static>(ttl: Duration) -> Cache<(), T> {
    Cache::builder().max_capacity(1).time_to_live(ttl).build()
}

/// Fetch through a single-entry cache; errors are not stored
async fn memoized<T, F>(cache: &Cache<(), T>, fetch: F) -> Result<T, Arc<ClientError>>
where
    T: Clone + Send + Sync + 'static,
    F: Future<Output = Result<T, ClientError>>,
{
    cache.try_get_with((), fetch).await
}

fn list_panel(
    what: &str,
    result: Result<Arc<Vec<String>>, Arc<ClientError>>,
) -> Panel<Arc<Vec<String>>> {
    match result {
        Ok(list) if list.is_empty() => Panel::Empty,
        Ok(list) => Panel::Ready(list),
        Err(e) => {
            tracing::warn!(lookup = what, error = %e, "Lookup request failed");
            Panel::Unavailable(format!("Could not load {}: {}", what, e))
        }
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
