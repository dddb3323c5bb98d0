//! API server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use rx_core::StockPolicy;
use rx_db::DbConfig;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Interface to bind (`RX_BIND_ADDR`)
    pub bind_addr: String,

    /// HTTP port (`RX_HTTP_PORT`)
    pub http_port: u16,

    /// SQLite database file (`RX_DATABASE_PATH`)
    pub database_path: PathBuf,

    /// Pool size (`RX_DB_MAX_CONNECTIONS`)
    pub db_max_connections: u32,

    /// Pool acquire timeout in seconds (`RX_DB_CONNECT_TIMEOUT_SECS`)
    pub db_connect_timeout_secs: u64,

    /// Oversell policy (`RX_STOCK_POLICY`: reject | allow_negative)
    pub stock_policy: StockPolicy,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let config = ApiConfig {
            bind_addr: var("RX_BIND_ADDR", "0.0.0.0"),

            http_port: var("RX_HTTP_PORT", "8080")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("RX_HTTP_PORT".to_string()))?,

            database_path: PathBuf::from(var("RX_DATABASE_PATH", "./rx_ledger.db")),

            db_max_connections: var("RX_DB_MAX_CONNECTIONS", "5")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("RX_DB_MAX_CONNECTIONS".to_string()))?,

            db_connect_timeout_secs: var("RX_DB_CONNECT_TIMEOUT_SECS", "30")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("RX_DB_CONNECT_TIMEOUT_SECS".to_string()))?,

            stock_policy: var("RX_STOCK_POLICY", "reject")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("RX_STOCK_POLICY".to_string()))?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("RX_DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// `host:port` for the TCP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.http_port)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
            .max_connections(self.db_max_connections)
            .connect_timeout(Duration::from_secs(self.db_connect_timeout_secs))
            .stock_policy(self.stock_policy)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
