//! Unified error type for data layer
//!
//! This module provides a unified error type that can represent errors from
//! both analytics backends (DuckDB, ClickHouse).

use thiserror::Error;

/// Unified error type for data layer operations
///
/// This error type wraps backend-specific errors while preserving context
/// about which backend generated the error.
#[derive(Error, Debug)]
pub enum DataError {
    /// DuckDB database error (embedded backend)
    #[error("DuckDB error: {0}")]
    Duckdb(#[from] duckdb::Error),

    /// ClickHouse database error (networked backend)
    #[error("ClickHouse error: {0}")]
    Clickhouse(#[from] clickhouse::error::Error),

    /// Migration failed
    #[error("Migration {version} ({name}) failed on {backend}: {error}")]
    MigrationFailed {
        backend: &'static str,
        version: i32,
        name: String,
        error: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Query timeout
    #[error("Query timeout after {timeout_secs}s on {backend}")]
    Timeout {
        backend: &'static str,
        timeout_secs: u64,
    },

    /// Backend not available
    #[error("Backend {backend} is not available: {reason}")]
    BackendUnavailable {
        backend: &'static str,
        reason: String,
    },

    /// Row returned by the store did not have the expected shape
    #[error("Unexpected result from {backend}: {reason}")]
    UnexpectedShape {
        backend: &'static str,
        reason: String,
    },
}

impl DataError {
    /// Create a timeout error
    pub fn timeout(backend: &'static str, timeout_secs: u64) -> Self {
        Self::Timeout {
            backend,
            timeout_secs,
        }
    }

    /// Create an unexpected shape error
    pub fn unexpected_shape(backend: &'static str, reason: impl Into<String>) -> Self {
        Self::UnexpectedShape {
            backend,
            reason: reason.into(),
        }
    }

    /// Check if this is a connection-related error that might be transient
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::BackendUnavailable { .. } => true,
            Self::Duckdb(_) => false, // DuckDB errors are typically not transient
            Self::Clickhouse(e) => {
                let msg = e.to_string().to_lowercase();
                msg.contains("connection") || msg.contains("timeout") || msg.contains("network")
            }
            _ => false,
        }
    }

    /// Get the backend name that generated this error
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Duckdb(_) => "duckdb",
            Self::Clickhouse(_) => "clickhouse",
            Self::MigrationFailed { backend, .. } => backend,
            Self::Timeout { backend, .. } => backend,
            Self::BackendUnavailable { backend, .. } => backend,
            Self::UnexpectedShape { backend, .. } => backend,
            Self::Config(_) | Self::Io(_) => "unknown",
        }
    }
}

impl From<crate::data::duckdb::DuckdbError> for DataError {
    fn from(e: crate::data::duckdb::DuckdbError) -> Self {
        use crate::data::duckdb::DuckdbError;
        match e {
            DuckdbError::Database(e) => Self::Duckdb(e),
            DuckdbError::MigrationFailed {
                version,
                name,
                error,
            } => Self::MigrationFailed {
                backend: "duckdb",
                version,
                name,
                error,
            },
            DuckdbError::Io(e) => Self::Io(e),
            DuckdbError::Timeout { timeout_secs } => Self::Timeout {
                backend: "duckdb",
                timeout_secs,
            },
            DuckdbError::Closed => Self::BackendUnavailable {
                backend: "duckdb",
                reason: "connection closed".to_string(),
            },
            DuckdbError::InvalidRow(reason) => Self::UnexpectedShape {
                backend: "duckdb",
                reason,
            },
        }
    }
}

impl From<crate::data::clickhouse::ClickhouseError> for DataError {
    fn from(e: crate::data::clickhouse::ClickhouseError) -> Self {
        use crate::data::clickhouse::ClickhouseError;
        match e {
            ClickhouseError::Database(e) => Self::Clickhouse(e),
            ClickhouseError::Connection(reason) => Self::BackendUnavailable {
                backend: "clickhouse",
                reason,
            },
            ClickhouseError::Timeout { timeout_secs } => Self::Timeout {
                backend: "clickhouse",
                timeout_secs,
            },
            ClickhouseError::InvalidRow(reason) => Self::UnexpectedShape {
                backend: "clickhouse",
                reason,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::clickhouse::ClickhouseError;
    use crate::data::duckdb::DuckdbError;

    #[test]
    fn test_migration_failed_error_display() {
        let err: DataError = DuckdbError::MigrationFailed {
            version: 2,
            name: "sales_tables".to_string(),
            error: "syntax error".to_string(),
        }
        .into();
        assert!(!err.is_transient());
        assert_eq!(
            err.to_string(),
            "Migration 2 (sales_tables) failed on duckdb: syntax error"
        );
    }

    #[test]
    fn test_timeout_error_display() {
        let err = DataError::timeout("duckdb", 5);
        assert_eq!(err.to_string(), "Query timeout after 5s on duckdb");
    }

    #[test]
    fn test_backend_unavailable_error_display() {
        let err: DataError = ClickhouseError::Connection("connection refused".into()).into();
        assert!(err.is_transient());
        assert_eq!(
            err.to_string(),
            "Backend clickhouse is not available: connection refused"
        );
    }

    #[test]
    fn test_backend_method() {
        assert_eq!(DataError::timeout("duckdb", 5).backend(), "duckdb");
        assert_eq!(
            DataError::unexpected_shape("clickhouse", "bad date").backend(),
            "clickhouse"
        );
        assert_eq!(DataError::Config("x".into()).backend(), "unknown");
    }

    #[test]
    fn test_is_transient() {
        assert!(DataError::timeout("duckdb", 5).is_transient());
        assert!(!DataError::Config("bad config".into()).is_transient());
        assert!(!DataError::unexpected_shape("duckdb", "bad date").is_transient());
    }

    #[test]
    fn test_from_backend_errors_keep_backend() {
        let err: DataError = DuckdbError::Timeout { timeout_secs: 5 }.into();
        assert!(err.is_transient());
        assert_eq!(err.backend(), "duckdb");

        let err: DataError = DuckdbError::Closed.into();
        assert!(err.is_transient());

        let err: DataError = ClickhouseError::Timeout { timeout_secs: 5 }.into();
        assert_eq!(err.backend(), "clickhouse");
        assert!(err.is_transient());

        let err: DataError = ClickhouseError::InvalidRow("bad".into()).into();
        assert!(!err.is_transient());
    }
}
