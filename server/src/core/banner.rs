//! Startup banner and effective configuration display

use super::config::{AnalyticsBackend, AppConfig, is_all_interfaces};
use super::constants::{APP_NAME, DEFAULT_DASHBOARD_PORT};

// Label column width
const W: usize = 12;

/// Host shown in URLs (wildcard binds are reached via localhost)
fn display_host(host: &str) -> &str {
    if is_all_interfaces(host) {
        "localhost"
    } else {
        host
    }
}

/// Where the configured store lives, with credentials left out
fn store_location(config: &AppConfig) -> String {
    match config.database.analytics {
        AnalyticsBackend::Duckdb => config.database.duckdb.path.clone(),
        AnalyticsBackend::Clickhouse => config
            .database
            .clickhouse
            .as_ref()
            .map(|ch| format!("{} (database {})", ch.url, ch.database))
            .unwrap_or_default(),
    }
}

/// Print the startup banner with URLs
pub fn print_banner(config: &AppConfig) {
    let host = display_host(&config.server.host);
    let port = config.server.port;

    println!();
    println!(
        "  \x1b[1m\x1b[36m{}\x1b[0m \x1b[90mv{}\x1b[0m",
        APP_NAME,
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!(
        "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m http://{}:{}",
        "API:", host, port
    );
    println!(
        "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m http://{}:{}/api/docs",
        "Docs:", host, port
    );
    if config.server.cors_origins.is_none() {
        println!(
            "  \x1b[33m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m http://{}:{}",
            "Dashboard:", host, DEFAULT_DASHBOARD_PORT
        );
    }
    println!(
        "  \x1b[90m➜  {:<W$} {} {}\x1b[0m",
        "Store:",
        config.database.analytics,
        store_location(config)
    );
    println!();
}

/// Print the effective configuration (passwords masked)
pub fn print_config(config: &AppConfig) {
    let db = &config.database;
    println!("server.host                = {}", config.server.host);
    println!("server.port                = {}", config.server.port);
    match &config.server.cors_origins {
        Some(origins) => println!("server.cors_origins        = {}", origins.join(", ")),
        None => println!("server.cors_origins        = (derived from host)"),
    }
    println!("database.analytics         = {}", db.analytics);
    println!("database.duckdb.path       = {}", db.duckdb.path);
    if let Some(ch) = &db.clickhouse {
        println!("database.clickhouse.url    = {}", ch.url);
        println!("database.clickhouse.db     = {}", ch.database);
        println!(
            "database.clickhouse.user   = {}",
            ch.user.as_deref().unwrap_or("(none)")
        );
        println!(
            "database.clickhouse.pass   = {}",
            if ch.password.is_some() { "***" } else { "(none)" }
        );
        println!("database.clickhouse.lz4    = {}", ch.compression);
    }
    println!("database.query_timeout_secs= {}", db.query_timeout_secs);
    println!("cache.max_entries          = {}", config.cache.max_entries);
    println!("cache.lookup_ttl_secs      = {}", config.cache.lookup_ttl_secs);
    println!(
        "lookups.fallback_min_date  = {}",
        config.lookups.fallback_min_date
    );
    println!(
        "lookups.fallback_max_date  = {}",
        config.lookups.fallback_max_date
    );
    println!("debug                      = {}", config.debug);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cli::CliConfig;
    use crate::core::config::FileConfig;

    #[test]
    fn test_display_host() {
        assert_eq!(display_host("0.0.0.0"), "localhost");
        assert_eq!(display_host("10.0.0.5"), "10.0.0.5");
    }

    #[test]
    fn test_store_location_hides_credentials() {
        let cli = CliConfig {
            analytics_backend: Some(AnalyticsBackend::Clickhouse),
            clickhouse_url: Some("http://ch.internal:8123".to_string()),
            ..Default::default()
        };
        let mut config = AppConfig::from_sources(FileConfig::default(), &cli).unwrap();
        if let Some(ch) = config.database.clickhouse.as_mut() {
            ch.password = Some("secret".to_string());
        }
        let location = store_location(&config);
        assert_eq!(location, "http://ch.internal:8123 (database default)");
        assert!(!location.contains("secret"));
    }
}
