//! ClickHouse analytics service
//!
//! Networked backend for deployments where the sales warehouse already lives
//! in ClickHouse. Uses async HTTP/S connections with connection pooling.
//!
//! The tables are owned by the warehouse loader; this service only reads.

pub mod error;
pub mod repositories;
mod repository_impl;

pub use error::ClickhouseError;

use std::sync::Arc;
use std::time::Duration;

use clickhouse::Client;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::core::config::ClickhouseConfig;
use crate::core::constants::HEALTH_CHECK_INTERVAL_SECS;

/// ClickHouse analytics service
///
/// The clickhouse crate's Client internally uses hyper with connection pooling
/// via HTTP keep-alive for efficient connection reuse.
pub struct ClickhouseService {
    client: Client,
    query_timeout_secs: u64,
}

impl ClickhouseService {
    /// Build the client and probe the server once
    ///
    /// An unreachable server is logged, not fatal: lookups and aggregates
    /// report the failure per request until it comes back.
    pub async fn init(
        config: &ClickhouseConfig,
        query_timeout_secs: u64,
    ) -> Result<Self, ClickhouseError> {
        let service = Self {
            client: build_client(config),
            query_timeout_secs,
        };

        if let Err(e) = service.health_check().await {
            tracing::warn!(url = %config.url, error = %e, "ClickHouse is not reachable yet");
        }

        tracing::debug!(
            url = %config.url,
            database = %config.database,
            compression = %config.compression,
            "ClickhouseService initialized"
        );

        Ok(service)
    }

    /// Get the ClickHouse client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Upper bound for one query in seconds
    pub fn query_timeout_secs(&self) -> u64 {
        self.query_timeout_secs
    }

    /// Health check - verify connection to ClickHouse
    pub async fn health_check(&self) -> Result<(), ClickhouseError> {
        let timeout_secs = self.query_timeout_secs;
        tokio::time::timeout(
            Duration::from_secs(timeout_secs),
            self.client.query("SELECT 1").execute(),
        )
        .await
        .map_err(|_| ClickhouseError::Timeout { timeout_secs })?
        .map_err(|e| ClickhouseError::Connection(e.to_string()))
    }

    /// Start health check task
    pub fn start_health_check_task(
        self: &Arc<Self>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(HEALTH_CHECK_INTERVAL_SECS));
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::debug!("ClickHouse health check task shutting down");
                            break;
                        }
                    }
                    _ = interval.tick() => {
                        if let Err(e) = service.health_check().await {
                            tracing::warn!("ClickHouse health check failed: {}", e);
                        }
                    }
                }
            }
        })
    }

    /// Close the connection gracefully (no-op for ClickHouse HTTP client)
    pub async fn close(&self) {
        tracing::debug!("ClickHouse connection closed");
    }
}

fn build_client(config: &ClickhouseConfig) -> Client {
    let mut client = Client::default()
        .with_url(&config.url)
        .with_database(&config.database);

    if let Some(ref user) = config.user {
        client = client.with_user(user);
    }
    if let Some(ref password) = config.password {
        client = client.with_password(password);
    }

    if config.compression {
        client = client.with_compression(clickhouse::Compression::Lz4);
    }

    client
}
