//! API server configuration.
//!
//! Layered with the `config` crate, later sources win:
//!
//! ```text
//! built-in defaults ──► sportline.toml (optional) ──► SPORTLINE_* env vars
//! ```
//!
//! e.g. `SPORTLINE_HTTP_ADDR=127.0.0.1:9000 SPORTLINE_LOCK_WAIT_MS=50`.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use sportline_db::DbConfig;
use std::time::Duration;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output for development.
    Pretty,
    /// One JSON object per line for log shippers.
    Json,
}

/// API server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Listen address, `host:port`.
    pub http_addr: String,

    /// SQLite database file.
    pub database_path: String,

    pub max_connections: u32,
    pub min_connections: u32,

    /// Seconds to wait for a pooled connection before failing the request.
    pub acquire_timeout_secs: u64,

    /// Milliseconds to wait for a held write lock. Zero fails immediately.
    /// Default: 5000
    pub lock_wait_ms: u64,

    pub log_format: LogFormat,
}

impl ApiConfig {
    /// Loads defaults, then `sportline.toml` if present, then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::with_name("sportline").required(false))
            .add_source(Environment::with_prefix("SPORTLINE").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Builder pre-filled with the built-in defaults.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("http_addr", "0.0.0.0:8080")?
            .set_default("database_path", "./sportline.db")?
            .set_default("max_connections", 10)?
            .set_default("min_connections", 2)?
            .set_default("acquire_timeout_secs", 30)?
            .set_default("lock_wait_ms", 5000)?
            .set_default("log_format", "pretty")
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .lock_wait(Duration::from_millis(self.lock_wait_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_defaults() {
        let config: ApiConfig = ApiConfig::defaults()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.http_addr, "0.0.0.0:8080");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.lock_wait_ms, 5000);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let toml = r#"
            http_addr = "127.0.0.1:9000"
            lock_wait_ms = 25
            log_format = "json"
        "#;

        let config: ApiConfig = ApiConfig::defaults()
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.http_addr, "127.0.0.1:9000");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.database_path, "./sportline.db");

        let db = config.db_config();
        assert_eq!(db.lock_wait, Duration::from_millis(25));
        assert_eq!(db.max_connections, 10);
    }
}
