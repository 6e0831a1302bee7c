//! Service configuration.
//!
//! Read from a TOML file, then overridden field by field from the environment.
//! Every setting has a default, so an empty file (or no file) is valid.
//!
//! ```toml
//! [server]
//! addr = "0.0.0.0:3000"
//!
//! [database]
//! url = "sqlite://orderdesk.db"
//! max_connections = 10
//! min_connections = 0
//! acquire_timeout_secs = 5
//! connect_timeout_secs = 10
//!
//! [orders]
//! allow_rekey = true
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Names the config file to load.
pub const CONFIG_ENV: &str = "ORDERDESK_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: {value:?}")]
    Env { key: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub orders: OrdersConfig,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: SocketAddr,
}

/// Connection pool settings.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default)]
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OrdersConfig {
    /// Whether `PUT /orders/{id}` may write a body `ord_no` that differs from
    /// the path id.
    #[serde(default = "default_allow_rekey")]
    pub allow_rekey: bool,
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}

fn default_url() -> String {
    "sqlite://orderdesk.db".to_owned()
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout() -> u64 {
    5
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_allow_rekey() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { addr: default_addr() }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            max_connections: default_max_connections(),
            min_connections: 0,
            acquire_timeout_secs: default_acquire_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self { allow_rekey: default_allow_rekey() }
    }
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Config {
    /// Loads the file named by `ORDERDESK_CONFIG` (defaults when unset), then
    /// applies environment overrides and validates the result.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Overrides settings from `lookup`, which maps an environment variable
    /// name to its value.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(v) = lookup("ORDERDESK_ADDR") {
            self.server.addr = parse_env("ORDERDESK_ADDR", v)?;
        }
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(v) = lookup("ORDERDESK_MAX_CONNECTIONS") {
            self.database.max_connections = parse_env("ORDERDESK_MAX_CONNECTIONS", v)?;
        }
        if let Some(v) = lookup("ORDERDESK_ACQUIRE_TIMEOUT_SECS") {
            self.database.acquire_timeout_secs = parse_env("ORDERDESK_ACQUIRE_TIMEOUT_SECS", v)?;
        }
        if let Some(v) = lookup("ORDERDESK_CONNECT_TIMEOUT_SECS") {
            self.database.connect_timeout_secs = parse_env("ORDERDESK_CONNECT_TIMEOUT_SECS", v)?;
        }
        if let Some(v) = lookup("ORDERDESK_ALLOW_REKEY") {
            self.orders.allow_rekey = parse_env("ORDERDESK_ALLOW_REKEY", v)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let db = &self.database;
        if db.url.trim().is_empty() {
            return Err(ConfigError::Invalid("database.url must not be empty".into()));
        }
        if db.max_connections == 0 {
            return Err(ConfigError::Invalid("database.max_connections must be at least 1".into()));
        }
        if db.min_connections > db.max_connections {
            return Err(ConfigError::Invalid(format!(
                "database.min_connections ({}) exceeds max_connections ({})",
                db.min_connections, db.max_connections
            )));
        }
        if db.acquire_timeout_secs == 0 || db.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid("database timeouts must be non-zero".into()));
        }
        Ok(())
    }
}

fn parse_env<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Env { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.server.addr, default_addr());
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.acquire_timeout(), Duration::from_secs(5));
        assert!(config.orders.allow_rekey);
        config.validate().unwrap();
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = Config::from_toml(
            r#"
            [database]
            url = "sqlite:///var/lib/orderdesk/orders.db"
            max_connections = 4

            [orders]
            allow_rekey = false
            "#,
        )
        .unwrap();
        assert_eq!(config.database.url, "sqlite:///var/lib/orderdesk/orders.db");
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.database.connect_timeout_secs, 10);
        assert!(!config.orders.allow_rekey);
    }

    #[test]
    fn env_overrides_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("ORDERDESK_ADDR", "127.0.0.1:8080"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("ORDERDESK_MAX_CONNECTIONS", " 2 "),
            ("ORDERDESK_ALLOW_REKEY", "false"),
        ]);
        let mut config = Config::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.server.addr.port(), 8080);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.database.max_connections, 2);
        assert!(!config.orders.allow_rekey);
    }

    #[test]
    fn malformed_env_value_names_the_key() {
        let mut config = Config::default();
        let err = config
            .apply_env(|k| (k == "ORDERDESK_MAX_CONNECTIONS").then(|| "many".to_owned()))
            .unwrap_err();
        assert!(err.to_string().contains("ORDERDESK_MAX_CONNECTIONS"));
    }

    #[test]
    fn validate_rejects_unusable_pools() {
        let mut config = Config::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.database.min_connections = 11;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.database.acquire_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn unreadable_file_reports_path() {
        let err = Config::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
