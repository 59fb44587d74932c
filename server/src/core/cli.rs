use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::config::AnalyticsBackend;
use super::constants::{
    ENV_ANALYTICS_BACKEND, ENV_CLICKHOUSE_URL, ENV_CONFIG, ENV_DUCKDB_PATH, ENV_HOST,
    ENV_LOOKUP_TTL_SECS, ENV_PORT, ENV_QUERY_TIMEOUT_SECS,
};

#[derive(Parser)]
#[command(name = "salesboard")]
#[command(version, about = "Sales analytics API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Analytics database backend (duckdb or clickhouse)
    #[arg(long, global = true, env = ENV_ANALYTICS_BACKEND, value_parser = parse_analytics_backend)]
    pub analytics_backend: Option<AnalyticsBackend>,

    /// DuckDB database file (":memory:" for an in-memory database)
    #[arg(long, global = true, env = ENV_DUCKDB_PATH)]
    pub duckdb_path: Option<String>,

    /// ClickHouse connection URL (when using clickhouse backend)
    #[arg(long, global = true, env = ENV_CLICKHOUSE_URL)]
    pub clickhouse_url: Option<String>,

    /// Store query timeout in seconds
    #[arg(long, global = true, env = ENV_QUERY_TIMEOUT_SECS)]
    pub query_timeout_secs: Option<u64>,

    /// Freshness window for cached lookup lists in seconds (0 = no caching)
    #[arg(long, global = true, env = ENV_LOOKUP_TTL_SECS)]
    pub lookup_ttl_secs: Option<u64>,
}

/// Parse analytics backend from CLI/env string
fn parse_analytics_backend(s: &str) -> Result<AnalyticsBackend, String> {
    match s.to_lowercase().as_str() {
        "duckdb" => Ok(AnalyticsBackend::Duckdb),
        "clickhouse" => Ok(AnalyticsBackend::Clickhouse),
        _ => Err(format!(
            "Invalid analytics backend '{}'. Valid options: duckdb, clickhouse",
            s
        )),
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
    /// Print the effective configuration and exit
    Config,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
    pub analytics_backend: Option<AnalyticsBackend>,
    pub duckdb_path: Option<String>,
    pub clickhouse_url: Option<String>,
    pub query_timeout_secs: Option<u64>,
    pub lookup_ttl_secs: Option<u64>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig {
        host: cli.host,
        port: cli.port,
        config: cli.config,
        analytics_backend: cli.analytics_backend,
        duckdb_path: cli.duckdb_path,
        clickhouse_url: cli.clickhouse_url,
        query_timeout_secs: cli.query_timeout_secs,
        lookup_ttl_secs: cli.lookup_ttl_secs,
    };
    (config, cli.command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analytics_backend() {
        assert_eq!(
            parse_analytics_backend("duckdb").unwrap(),
            AnalyticsBackend::Duckdb
        );
        assert_eq!(
            parse_analytics_backend("ClickHouse").unwrap(),
            AnalyticsBackend::Clickhouse
        );
        assert!(parse_analytics_backend("postgres").is_err());
    }

    #[test]
    fn test_cli_parses_global_flags() {
        let cli = Cli::try_parse_from([
            "salesboard",
            "--port",
            "8080",
            "--analytics-backend",
            "clickhouse",
            "--clickhouse-url",
            "http://localhost:8123",
            "start",
        ])
        .unwrap();
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.analytics_backend, Some(AnalyticsBackend::Clickhouse));
        assert_eq!(cli.clickhouse_url.as_deref(), Some("http://localhost:8123"));
        assert!(matches!(cli.command, Some(Commands::Start)));
    }
}
