//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Balance ledger policy.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Calendar feed configuration.
    #[serde(default)]
    pub calendar: CalendarConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL (`postgres://...` or `sqlite://...`).
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Apply pending migrations on startup.
    #[serde(default)]
    pub run_migrations: bool,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Balance ledger policy.
///
/// A debit may not take `days_remaining` below `floor` unless
/// `allow_negative` is set, in which case no floor applies at all.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LedgerConfig {
    /// Disables the floor check entirely.
    #[serde(default)]
    pub allow_negative: bool,
    /// Lowest balance a debit may leave behind.
    #[serde(default)]
    pub floor: i32,
}

/// Calendar feed configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// Product name used in `PRODID` and the calendar display name.
    #[serde(default = "default_product_name")]
    pub product_name: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            product_name: default_product_name(),
        }
    }
}

fn default_product_name() -> String {
    "PTO Portal".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FURLOUGH").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults_with_only_database_url() {
        temp_env::with_vars(
            [
                ("FURLOUGH__DATABASE__URL", Some("sqlite::memory:")),
                ("FURLOUGH__SERVER__PORT", None),
                ("FURLOUGH__LEDGER__ALLOW_NEGATIVE", None),
                ("FURLOUGH__LEDGER__FLOOR", None),
                ("FURLOUGH__CALENDAR__PRODUCT_NAME", None),
                ("RUN_MODE", Some("test")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "sqlite::memory:");
                assert_eq!(config.database.max_connections, 10);
                assert!(!config.database.run_migrations);
                assert_eq!(config.server.host, "0.0.0.0");
                assert_eq!(config.server.port, 8080);
                assert!(!config.ledger.allow_negative);
                assert_eq!(config.ledger.floor, 0);
                assert_eq!(config.calendar.product_name, "PTO Portal");
            },
        );
    }

    #[test]
    fn test_load_overrides_from_environment() {
        temp_env::with_vars(
            [
                ("FURLOUGH__DATABASE__URL", Some("postgres://localhost/furlough")),
                ("FURLOUGH__SERVER__PORT", Some("9090")),
                ("FURLOUGH__LEDGER__ALLOW_NEGATIVE", Some("true")),
                ("FURLOUGH__LEDGER__FLOOR", Some("-5")),
                ("FURLOUGH__CALENDAR__PRODUCT_NAME", Some("Acme Leave")),
                ("RUN_MODE", Some("test")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.server.port, 9090);
                assert!(config.ledger.allow_negative);
                assert_eq!(config.ledger.floor, -5);
                assert_eq!(config.calendar.product_name, "Acme Leave");
            },
        );
    }

    #[test]
    fn test_load_fails_without_database_url() {
        temp_env::with_vars(
            [
                ("FURLOUGH__DATABASE__URL", None::<&str>),
                ("RUN_MODE", Some("test")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}
