//! HTTP client for the analytics API

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::types::{AggregateQuery, DateBounds, SeriesPoint};

/// Per-request timeout used by [`DashboardClient::new`]
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct DashboardClient {
    http: reqwest::Client,
    base_url: String,
}

impl DashboardClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::Config(format!(
                "base URL must start with http:// or https://, got '{}'",
                base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("salesboard/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {}", e)))?;

        tracing::debug!(base_url = %base_url, timeout_ms = timeout.as_millis() as u64, "Dashboard client initialized");
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Product identifiers, ascending
    pub async fn products(&self) -> Result<Vec<String>, ClientError> {
        self.get_json("/products", &[]).await
    }

    /// Category names, ascending
    pub async fn categories(&self) -> Result<Vec<String>, ClientError> {
        self.get_json("/categories", &[]).await
    }

    pub async fn date_range(&self) -> Result<DateBounds, ClientError> {
        self.get_json("/date_range", &[]).await
    }

    /// Time-ordered series; empty when nothing matched
    pub async fn aggregate(&self, query: &AggregateQuery) -> Result<Vec<SeriesPoint>, ClientError> {
        self.get_json("/aggregate", &query.to_params()).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.http.get(&url).query(params).send().await?;

        let status = resp.status();
        let body = resp.bytes().await?;

        if !status.is_success() {
            let message = error_message(status, &body);
            tracing::debug!(url = %url, status = status.as_u16(), message = %message, "API request failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

/// Pull the `error` field out of a failure body, falling back to the status text
fn error_message(status: StatusCode, body: &[u8]) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: String,
    }

    serde_json::from_slice::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("Unexpected status")
                .to_string()
        })
}
