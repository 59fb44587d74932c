//! In-process repository double for service tests

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::data::error::DataError;
use crate::data::traits::SalesRepository;
use crate::data::types::{DateBounds, QueryPlan, SeriesPoint};

/// Which call should fail, and how
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Timeout,
    Broken,
}

impl Failure {
    fn error(self) -> DataError {
        match self {
            Self::Timeout => DataError::timeout("mock", 5),
            Self::Broken => DataError::unexpected_shape("mock", "broken row"),
        }
    }
}

#[derive(Default)]
struct State {
    points: Vec<SeriesPoint>,
    products: Vec<String>,
    categories: Vec<String>,
    bounds: Option<DateBounds>,
    fail_aggregate: Option<Failure>,
    fail_products: Option<Failure>,
    fail_categories: Option<Failure>,
    fail_bounds: Option<Failure>,
    last_plan: Option<QueryPlan>,
}

/// Repository returning canned rows and counting every access
#[derive(Clone, Default)]
pub struct MockSalesRepository {
    state: Arc<Mutex<State>>,
    calls: Arc<AtomicUsize>,
}

impl MockSalesRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_points(self, points: Vec<SeriesPoint>) -> Self {
        self.state.lock().points = points;
        self
    }

    pub fn with_products(self, products: &[&str]) -> Self {
        self.state.lock().products = products.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_categories(self, categories: &[&str]) -> Self {
        self.state.lock().categories = categories.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_bounds(self, bounds: DateBounds) -> Self {
        self.state.lock().bounds = Some(bounds);
        self
    }

    pub fn fail_aggregate(&self, failure: Option<Failure>) {
        self.state.lock().fail_aggregate = failure;
    }

    pub fn fail_products(&self, failure: Option<Failure>) {
        self.state.lock().fail_products = failure;
    }

    pub fn fail_categories(&self, failure: Option<Failure>) {
        self.state.lock().fail_categories = failure;
    }

    pub fn fail_bounds(&self, failure: Option<Failure>) {
        self.state.lock().fail_bounds = failure;
    }

    pub fn set_products(&self, products: &[&str]) {
        self.state.lock().products = products.iter().map(|p| p.to_string()).collect();
    }

    /// Total store accesses so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_plan(&self) -> Option<QueryPlan> {
        self.state.lock().last_plan
    }
}

#[async_trait]
impl SalesRepository for MockSalesRepository {
    async fn aggregate(&self, plan: &QueryPlan) -> Result<Vec<SeriesPoint>, DataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock();
        state.last_plan = Some(*plan);
        match state.fail_aggregate {
            Some(failure) => Err(failure.error()),
            None => Ok(state.points.clone()),
        }
    }

    async fn distinct_products(&self) -> Result<Vec<String>, DataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock();
        match state.fail_products {
            Some(failure) => Err(failure.error()),
            None => Ok(state.products.clone()),
        }
    }

    async fn distinct_categories(&self) -> Result<Vec<String>, DataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock();
        match state.fail_categories {
            Some(failure) => Err(failure.error()),
            None => Ok(state.categories.clone()),
        }
    }

    async fn sale_date_bounds(&self) -> Result<Option<DateBounds>, DataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock();
        match state.fail_bounds {
            Some(failure) => Err(failure.error()),
            None => Ok(state.bounds),
        }
    }
}
