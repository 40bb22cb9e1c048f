//! Configuration for the report ingestion service.
//!
//! Everything is loaded from environment variables (a `.env` file is
//! honored by the binary) into one [`Config`] value that gets passed into
//! the wiring explicitly; nothing here is module-level state.

use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL for the trading-result store.
    pub database_url: String,
    /// Directory URL the exchange publishes the daily report files under.
    pub reports_base_url: String,
    /// Per-request timeout for report downloads, in seconds.
    pub fetch_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://data/trading_results.db".to_string());

        let reports_base_url = env::var("REPORTS_BASE_URL")
            .unwrap_or_else(|_| "https://spimex.com/upload/reports/oil_xls".to_string());

        let fetch_timeout_secs = env::var("FETCH_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .context("FETCH_TIMEOUT_SECS must be a number of seconds")?;

        Ok(Self {
            database_url,
            reports_base_url,
            fetch_timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_defaults() {
        let config = Config::from_env().expect("Should parse with defaults");
        assert!(config.database_url.starts_with("sqlite://"));
        assert!(config.reports_base_url.starts_with("https://"));
        assert_eq!(config.fetch_timeout_secs, 30);
    }
}
