use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CLICKHOUSE_DATABASE,
    DEFAULT_DUCKDB_PATH, DEFAULT_FALLBACK_MAX_DATE, DEFAULT_FALLBACK_MIN_DATE, DEFAULT_HOST,
    DEFAULT_LOOKUP_TTL_SECS, DEFAULT_PORT, DEFAULT_QUERY_TIMEOUT_SECS,
};

// =============================================================================
// Analytics Backend Enum (DuckDB or ClickHouse)
// =============================================================================

/// Store holding the sales fact and product dimension tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsBackend {
    #[default]
    Duckdb,
    Clickhouse,
}

impl fmt::Display for AnalyticsBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyticsBackend::Duckdb => write!(f, "duckdb"),
            AnalyticsBackend::Clickhouse => write!(f, "clickhouse"),
        }
    }
}

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Origins allowed by CORS (replaces the derived localhost list)
    pub cors_origins: Option<Vec<String>>,
}

/// DuckDB configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DuckdbFileConfig {
    /// Database file path, or ":memory:"
    pub path: Option<String>,
}

/// ClickHouse configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ClickhouseFileConfig {
    /// ClickHouse connection URL (or use SALESBOARD_CLICKHOUSE_URL env var)
    pub url: Option<String>,
    /// Database name (default: "default")
    pub database: Option<String>,
    /// Username for authentication
    pub user: Option<String>,
    /// Password for authentication
    pub password: Option<String>,
    /// Enable LZ4 compression (default: true)
    pub compression: Option<bool>,
}

/// Database configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseFileConfig {
    /// Analytics backend: duckdb (default) or clickhouse
    pub analytics: Option<AnalyticsBackend>,
    pub duckdb: Option<DuckdbFileConfig>,
    pub clickhouse: Option<ClickhouseFileConfig>,
    /// Upper bound for a single store query, in seconds
    pub query_timeout_secs: Option<u64>,
}

/// Cache configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CacheFileConfig {
    pub max_entries: Option<u64>,
    pub lookup_ttl_secs: Option<u64>,
}

/// Lookup fallback configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LookupsFileConfig {
    pub fallback_min_date: Option<String>,
    pub fallback_max_date: Option<String>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub database: Option<DatabaseFileConfig>,
    pub cache: Option<CacheFileConfig>,
    pub lookups: Option<LookupsFileConfig>,
    pub debug: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Unknown top-level keys in the config (possible typos)
    fn unknown_fields(&self) -> Vec<String> {
        match &self.extra {
            serde_json::Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    fn warn_unknown_fields(&self) {
        let unknown = self.unknown_fields();
        if !unknown.is_empty() {
            tracing::warn!(
                fields = %unknown.join(", "),
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        // Server
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
            if server.cors_origins.is_some() {
                tracing::trace!(cors_origins = ?server.cors_origins, "Merging server.cors_origins");
                current.cors_origins = server.cors_origins;
            }
        }

        // Database
        if let Some(database) = other.database {
            let current = self.database.get_or_insert_with(DatabaseFileConfig::default);
            if database.analytics.is_some() {
                tracing::trace!(analytics = ?database.analytics, "Merging database.analytics");
                current.analytics = database.analytics;
            }
            if database.query_timeout_secs.is_some() {
                tracing::trace!(
                    query_timeout_secs = ?database.query_timeout_secs,
                    "Merging database.query_timeout_secs"
                );
                current.query_timeout_secs = database.query_timeout_secs;
            }
            if let Some(duckdb) = database.duckdb {
                let cd = current.duckdb.get_or_insert_with(DuckdbFileConfig::default);
                if duckdb.path.is_some() {
                    tracing::trace!(path = ?duckdb.path, "Merging database.duckdb.path");
                    cd.path = duckdb.path;
                }
            }
            if let Some(ch) = database.clickhouse {
                let cc = current
                    .clickhouse
                    .get_or_insert_with(ClickhouseFileConfig::default);
                if ch.url.is_some() {
                    tracing::trace!(url = ?ch.url, "Merging database.clickhouse.url");
                    cc.url = ch.url;
                }
                if ch.database.is_some() {
                    tracing::trace!(database = ?ch.database, "Merging database.clickhouse.database");
                    cc.database = ch.database;
                }
                if ch.user.is_some() {
                    tracing::trace!(user = ?ch.user, "Merging database.clickhouse.user");
                    cc.user = ch.user;
                }
                if ch.password.is_some() {
                    tracing::trace!(password = "***", "Merging database.clickhouse.password");
                    cc.password = ch.password;
                }
                if ch.compression.is_some() {
                    tracing::trace!(
                        compression = ?ch.compression,
                        "Merging database.clickhouse.compression"
                    );
                    cc.compression = ch.compression;
                }
            }
        }

        // Cache
        if let Some(cache) = other.cache {
            let current = self.cache.get_or_insert_with(CacheFileConfig::default);
            if cache.max_entries.is_some() {
                tracing::trace!(max_entries = ?cache.max_entries, "Merging cache.max_entries");
                current.max_entries = cache.max_entries;
            }
            if cache.lookup_ttl_secs.is_some() {
                tracing::trace!(
                    lookup_ttl_secs = ?cache.lookup_ttl_secs,
                    "Merging cache.lookup_ttl_secs"
                );
                current.lookup_ttl_secs = cache.lookup_ttl_secs;
            }
        }

        // Lookups
        if let Some(lookups) = other.lookups {
            let current = self.lookups.get_or_insert_with(LookupsFileConfig::default);
            if lookups.fallback_min_date.is_some() {
                tracing::trace!(
                    fallback_min_date = ?lookups.fallback_min_date,
                    "Merging lookups.fallback_min_date"
                );
                current.fallback_min_date = lookups.fallback_min_date;
            }
            if lookups.fallback_max_date.is_some() {
                tracing::trace!(
                    fallback_max_date = ?lookups.fallback_max_date,
                    "Merging lookups.fallback_max_date"
                );
                current.fallback_max_date = lookups.fallback_max_date;
            }
        }

        // Debug
        if other.debug.is_some() {
            tracing::trace!(debug = ?other.debug, "Merging debug");
            self.debug = other.debug;
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Explicit CORS origins (None = derive from host)
    pub cors_origins: Option<Vec<String>>,
}

/// DuckDB configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct DuckdbConfig {
    pub path: String,
}

/// ClickHouse configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct ClickhouseConfig {
    /// ClickHouse connection URL
    pub url: String,
    /// Database name
    pub database: String,
    /// Username for authentication
    pub user: Option<String>,
    /// Password for authentication
    pub password: Option<String>,
    /// Enable LZ4 compression for requests/responses
    pub compression: bool,
}

/// Database configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Analytics backend: duckdb (default) or clickhouse
    pub analytics: AnalyticsBackend,
    pub duckdb: DuckdbConfig,
    /// ClickHouse-specific configuration (only used if analytics = clickhouse)
    pub clickhouse: Option<ClickhouseConfig>,
    pub query_timeout_secs: u64,
}

/// Cache configuration used by CacheService
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub max_entries: u64,
    /// Freshness window for lookup lists (0 = lookups are not cached)
    pub lookup_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            lookup_ttl_secs: DEFAULT_LOOKUP_TTL_SECS,
        }
    }
}

/// Date range reported when the fact table is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupsConfig {
    pub fallback_min_date: NaiveDate,
    pub fallback_max_date: NaiveDate,
}

impl Default for LookupsConfig {
    fn default() -> Self {
        Self {
            fallback_min_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            fallback_max_date: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or_default(),
        }
    }
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub lookups: LookupsConfig,
    pub debug: bool,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.salesboard/salesboard.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Load from profile dir (~/.salesboard/salesboard.json) - skip if not exists
        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. Load from CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        Self::from_sources(file_config, cli)
    }

    /// Layer defaults -> merged file config -> CLI/env overrides, then validate
    pub(crate) fn from_sources(file_config: FileConfig, cli: &CliConfig) -> Result<Self> {
        let file_server = file_config.server.unwrap_or_default();
        let file_database = file_config.database.unwrap_or_default();
        let file_duckdb = file_database.duckdb.unwrap_or_default();
        let file_cache = file_config.cache.unwrap_or_default();
        let file_lookups = file_config.lookups.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        let analytics = cli
            .analytics_backend
            .or(file_database.analytics)
            .unwrap_or_default();

        let duckdb = DuckdbConfig {
            path: cli
                .duckdb_path
                .clone()
                .or(file_duckdb.path)
                .unwrap_or_else(|| DEFAULT_DUCKDB_PATH.to_string()),
        };

        // ClickHouse config is only resolved when it is the selected backend
        let clickhouse = if analytics == AnalyticsBackend::Clickhouse {
            let file_ch = file_database.clickhouse.unwrap_or_default();
            let url = cli.clickhouse_url.clone().or(file_ch.url).context(
                "Configuration error: database.clickhouse.url is required when analytics backend is clickhouse",
            )?;
            Some(ClickhouseConfig {
                url,
                database: file_ch
                    .database
                    .unwrap_or_else(|| DEFAULT_CLICKHOUSE_DATABASE.to_string()),
                user: file_ch.user,
                password: file_ch.password,
                compression: file_ch.compression.unwrap_or(true),
            })
        } else {
            None
        };

        let query_timeout_secs = cli
            .query_timeout_secs
            .or(file_database.query_timeout_secs)
            .unwrap_or(DEFAULT_QUERY_TIMEOUT_SECS);

        let cache = CacheConfig {
            max_entries: file_cache.max_entries.unwrap_or(DEFAULT_CACHE_MAX_ENTRIES),
            lookup_ttl_secs: cli
                .lookup_ttl_secs
                .or(file_cache.lookup_ttl_secs)
                .unwrap_or(DEFAULT_LOOKUP_TTL_SECS),
        };

        let lookups = LookupsConfig {
            fallback_min_date: parse_config_date(
                "lookups.fallback_min_date",
                file_lookups
                    .fallback_min_date
                    .as_deref()
                    .unwrap_or(DEFAULT_FALLBACK_MIN_DATE),
            )?,
            fallback_max_date: parse_config_date(
                "lookups.fallback_max_date",
                file_lookups
                    .fallback_max_date
                    .as_deref()
                    .unwrap_or(DEFAULT_FALLBACK_MAX_DATE),
            )?,
        };

        let config = Self {
            server: ServerConfig {
                host,
                port,
                cors_origins: file_server.cors_origins,
            },
            database: DatabaseConfig {
                analytics,
                duckdb,
                clickhouse,
                query_timeout_secs,
            },
            cache,
            lookups,
            debug: file_config.debug.unwrap_or(false),
        };

        config.validate()?;

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            analytics_backend = %config.database.analytics,
            query_timeout_secs = config.database.query_timeout_secs,
            cache_max_entries = config.cache.max_entries,
            lookup_ttl_secs = config.cache.lookup_ttl_secs,
            fallback_min_date = %config.lookups.fallback_min_date,
            fallback_max_date = %config.lookups.fallback_max_date,
            debug = config.debug,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }

        // Port 0 would bind a random port the dashboard cannot find
        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        if self.database.query_timeout_secs == 0 {
            anyhow::bail!("Configuration error: database.query_timeout_secs must be greater than 0");
        }

        if self.database.duckdb.path.trim().is_empty() {
            anyhow::bail!("Configuration error: database.duckdb.path must not be empty");
        }

        if let Some(ch) = &self.database.clickhouse
            && !(ch.url.starts_with("http://") || ch.url.starts_with("https://"))
        {
            anyhow::bail!(
                "Configuration error: database.clickhouse.url must start with http:// or https://, got '{}'",
                ch.url
            );
        }

        if self.cache.max_entries == 0 {
            anyhow::bail!("Configuration error: cache.max_entries must be greater than 0");
        }

        if self.lookups.fallback_min_date > self.lookups.fallback_max_date {
            anyhow::bail!(
                "Configuration error: lookups.fallback_min_date ({}) must not be after lookups.fallback_max_date ({})",
                self.lookups.fallback_min_date,
                self.lookups.fallback_max_date
            );
        }

        if is_all_interfaces(&self.server.host) {
            tracing::warn!(
                host = %self.server.host,
                "Server is listening on all interfaces; the API has no authentication"
            );
        }

        Ok(())
    }
}

fn parse_config_date(key: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").with_context(|| {
        format!("Configuration error: {key} must be a YYYY-MM-DD date, got '{value}'")
    })
}

/// Get the profile config path (~/.salesboard/salesboard.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Check if host binds to all network interfaces
pub fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}
