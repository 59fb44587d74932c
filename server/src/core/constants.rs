// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "Salesboard";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "salesboard";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".salesboard";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "salesboard.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "SALESBOARD_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "SALESBOARD_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "SALESBOARD_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "SALESBOARD_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port (the dashboard expects the API on 5000)
pub const DEFAULT_PORT: u16 = 5000;

/// Port the dashboard is served from by default, allowed by CORS
pub const DEFAULT_DASHBOARD_PORT: u16 = 8501;

// =============================================================================
// Environment Variables - Database
// =============================================================================

/// Environment variable for analytics backend (duckdb or clickhouse)
pub const ENV_ANALYTICS_BACKEND: &str = "SALESBOARD_ANALYTICS_BACKEND";

/// Environment variable for the DuckDB database file
pub const ENV_DUCKDB_PATH: &str = "SALESBOARD_DUCKDB_PATH";

/// Environment variable for ClickHouse connection URL
pub const ENV_CLICKHOUSE_URL: &str = "SALESBOARD_CLICKHOUSE_URL";

/// Environment variable for the store query timeout
pub const ENV_QUERY_TIMEOUT_SECS: &str = "SALESBOARD_QUERY_TIMEOUT_SECS";

/// Environment variable for the lookup cache freshness window
pub const ENV_LOOKUP_TTL_SECS: &str = "SALESBOARD_LOOKUP_TTL_SECS";

// =============================================================================
// Database Defaults
// =============================================================================

/// Default DuckDB database file (relative to the working directory)
pub const DEFAULT_DUCKDB_PATH: &str = "salesboard.duckdb";

/// Path value that opens an in-memory DuckDB database
pub const DUCKDB_IN_MEMORY: &str = ":memory:";

/// Default ClickHouse database name
pub const DEFAULT_CLICKHOUSE_DATABASE: &str = "default";

/// Default store query timeout in seconds
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 5;

/// Interval between store health checks
pub const HEALTH_CHECK_INTERVAL_SECS: u64 = 60;

// =============================================================================
// Sales Schema
// =============================================================================

/// Fact table holding one row per sale
pub const TABLE_FACT_SALES: &str = "fact_sales";

/// Column used for SUM aggregates
pub const COLUMN_AMOUNT: &str = "total_amount";

/// Column used for bucketing and range filters
pub const COLUMN_SALE_DATE: &str = "sale_date";

/// Fallback lower bound returned when the fact table is empty
pub const DEFAULT_FALLBACK_MIN_DATE: &str = "2023-01-01";

/// Fallback upper bound returned when the fact table is empty
pub const DEFAULT_FALLBACK_MAX_DATE: &str = "2023-12-31";

// =============================================================================
// Cache
// =============================================================================

/// Cache key version prefix (bump to invalidate every cached value)
pub const CACHE_KEY_VERSION: &str = "v1";

/// Default maximum number of cache entries
pub const DEFAULT_CACHE_MAX_ENTRIES: u64 = 1000;

/// Default freshness window for lookup lists (seconds)
pub const DEFAULT_LOOKUP_TTL_SECS: u64 = 300;

// =============================================================================
// Shutdown
// =============================================================================

/// Maximum time to wait for background tasks during shutdown
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;
