//! DuckDB analytics service
//!
//! Embedded backend holding the sales tables in a single database file.
//! All schema definitions and migrations are managed here.

pub mod error;
mod migrations;
pub mod repositories;
mod repository_impl;
pub mod schema;

pub use repositories::sales as sales_repository;

pub use error::DuckdbError;

use std::sync::Arc;
use std::time::Duration;

use duckdb::Connection;
use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::core::config::DuckdbConfig;
use crate::core::constants::{DUCKDB_IN_MEMORY, HEALTH_CHECK_INTERVAL_SECS};
use crate::utils::file::{ensure_parent_dir, expand_path};

/// DuckDB analytics service
///
/// Uses a single shared connection protected by a mutex. Each query holds the
/// lock for its whole duration on a blocking thread.
pub struct DuckdbService {
    conn: Mutex<Option<Connection>>,
    query_timeout_secs: u64,
}

impl Drop for DuckdbService {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.get_mut().take() {
            // Best-effort close - log but don't panic on error
            if let Err((_, e)) = conn.close() {
                tracing::warn!("DuckDB connection close failed during drop: {}", e);
            }
        }
    }
}

impl DuckdbService {
    /// Open the configured database file (or memory) and apply the schema
    pub async fn init(config: &DuckdbConfig, query_timeout_secs: u64) -> Result<Self, DuckdbError> {
        let path = config.path.clone();
        let existed = database_exists(&path);

        let conn = tokio::task::spawn_blocking(move || {
            let conn = if path == DUCKDB_IN_MEMORY {
                Connection::open_in_memory()?
            } else {
                let db_path = expand_path(&path);
                ensure_parent_dir(&db_path)?;
                Connection::open(&db_path)?
            };
            conn.execute_batch(
                "SET autoinstall_known_extensions = false;
                 SET autoload_known_extensions = false;",
            )?;
            Ok::<_, DuckdbError>(conn)
        })
        .await
        .map_err(|e| DuckdbError::Io(std::io::Error::other(e)))??;

        migrations::run_migrations(&conn)?;

        tracing::debug!(path = %config.path, existed, "DuckdbService initialized");
        Ok(Self::from_connection(conn, query_timeout_secs))
    }

    /// Wrap an already opened connection (schema must be applied separately)
    pub(crate) fn from_connection(conn: Connection, query_timeout_secs: u64) -> Self {
        Self {
            conn: Mutex::new(Some(conn)),
            query_timeout_secs,
        }
    }

    /// Open an in-memory database with the schema applied
    pub fn open_in_memory(query_timeout_secs: u64) -> Result<Self, DuckdbError> {
        let conn = Connection::open_in_memory()?;
        migrations::run_migrations(&conn)?;
        Ok(Self::from_connection(conn, query_timeout_secs))
    }

    /// Get exclusive access to the connection.
    ///
    /// Fails with `Closed` once `close()` has run.
    pub fn conn(&self) -> Result<MappedMutexGuard<'_, Connection>, DuckdbError> {
        MutexGuard::try_map(self.conn.lock(), |opt| opt.as_mut()).map_err(|_| DuckdbError::Closed)
    }

    /// Check if the connection is still open (test utility only)
    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.conn.lock().is_some()
    }

    /// Run a blocking DuckDB query on the shared connection with timeout
    ///
    /// On timeout the blocking task keeps running until DuckDB returns; only
    /// the caller stops waiting.
    pub async fn run_query<T, F>(self: &Arc<Self>, f: F) -> Result<T, DuckdbError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, DuckdbError> + Send + 'static,
    {
        let db = Arc::clone(self);
        let timeout_secs = self.query_timeout_secs;
        let task = tokio::task::spawn_blocking(move || {
            let conn = db.conn()?;
            f(&conn)
        });

        tokio::time::timeout(Duration::from_secs(timeout_secs), task)
            .await
            .map_err(|_| {
                tracing::warn!("DuckDB query timed out after {}s", timeout_secs);
                DuckdbError::Timeout { timeout_secs }
            })?
            .map_err(|e| {
                tracing::error!(error = %e, "DuckDB query task failed");
                DuckdbError::Io(std::io::Error::other(format!(
                    "Query execution failed: {}",
                    e
                )))
            })?
    }

    /// Health check - verify the connection answers
    pub async fn health_check(self: &Arc<Self>) -> Result<(), DuckdbError> {
        self.run_query(|conn| {
            conn.execute_batch("SELECT 1")?;
            Ok(())
        })
        .await
    }

    /// Close the DuckDB connection gracefully with explicit error handling
    pub async fn close(self: Arc<Self>) -> Result<(), DuckdbError> {
        tokio::task::spawn_blocking(move || {
            let mut conn_guard = self.conn.lock();
            if let Some(conn) = conn_guard.take() {
                conn.close().map_err(|(_, e)| DuckdbError::Database(e))?;
                tracing::debug!("DuckDB connection closed");
            }
            Ok(())
        })
        .await
        .map_err(|e| DuckdbError::Io(std::io::Error::other(e)))?
    }

    /// Start health check task
    pub fn start_health_check_task(
        self: &Arc<Self>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let db = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(HEALTH_CHECK_INTERVAL_SECS));
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::debug!("DuckDB health check task shutting down");
                            break;
                        }
                    }
                    _ = interval.tick() => {
                        if let Err(e) = db.health_check().await {
                            tracing::warn!("DuckDB health check failed: {}", e);
                        }
                    }
                }
            }
        })
    }
}

/// Execute a function within a transaction, automatically rolling back on error.
pub(crate) fn in_transaction<F, T>(conn: &Connection, f: F) -> Result<T, DuckdbError>
where
    F: FnOnce(&Connection) -> Result<T, DuckdbError>,
{
    conn.execute_batch("BEGIN TRANSACTION")?;
    match f(conn) {
        Ok(val) => {
            conn.execute_batch("COMMIT")?;
            Ok(val)
        }
        Err(e) => {
            // Best-effort rollback - log but return original error
            if let Err(rollback_err) = conn.execute_batch("ROLLBACK") {
                tracing::warn!("ROLLBACK failed after transaction error: {}", rollback_err);
            }
            Err(e)
        }
    }
}

/// True when `path` names a DuckDB file that already exists on disk
pub fn database_exists(path: &str) -> bool {
    path != DUCKDB_IN_MEMORY && expand_path(path).exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_service_init_creates_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("nested").join("sales.duckdb");
        let config = DuckdbConfig {
            path: path.display().to_string(),
        };
        assert!(!database_exists(&config.path));

        let service = DuckdbService::init(&config, 5)
            .await
            .expect("Init should succeed");
        assert!(service.is_open());
        assert!(database_exists(&config.path));
    }

    #[tokio::test]
    async fn test_service_init_in_memory() {
        let config = DuckdbConfig {
            path: DUCKDB_IN_MEMORY.to_string(),
        };
        let service = DuckdbService::init(&config, 5)
            .await
            .expect("Init should succeed");

        let conn = service.conn().expect("connection should be open");
        let version: i32 = conn
            .query_row(
                "SELECT version FROM schema_version WHERE id = 1",
                [],
                |row| row.get(0),
            )
            .expect("Should read schema version");
        assert_eq!(version, schema::SCHEMA_VERSION);
        assert!(!database_exists(DUCKDB_IN_MEMORY));
    }

    #[tokio::test]
    async fn test_run_query_returns_closure_result() {
        let service = Arc::new(DuckdbService::open_in_memory(5).unwrap());
        let answer: i64 = service
            .run_query(|conn| Ok(conn.query_row("SELECT 40 + 2", [], |row| row.get(0))?))
            .await
            .unwrap();
        assert_eq!(answer, 42);
    }

    #[tokio::test]
    async fn test_health_check() {
        let service = Arc::new(DuckdbService::open_in_memory(5).unwrap());
        assert!(service.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_query_after_close_reports_closed() {
        let service = Arc::new(DuckdbService::open_in_memory(5).unwrap());
        let for_query = Arc::clone(&service);

        service.close().await.expect("Close should succeed");

        let result = for_query.health_check().await;
        assert!(matches!(result, Err(DuckdbError::Closed)));
    }

    #[tokio::test]
    async fn test_run_query_timeout() {
        let service = Arc::new(DuckdbService::open_in_memory(1).unwrap());
        let result: Result<(), _> = service
            .run_query(|_| {
                std::thread::sleep(Duration::from_millis(1500));
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(DuckdbError::Timeout { timeout_secs: 1 })));
    }
}
