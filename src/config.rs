//! Configuration loading and constants.
//!
//! Loads application configuration from a TOML file and defines the defaults
//! for the HTTP listener, the SQLite store, and logging. `AppConfig` is the
//! root configuration struct containing all settings.

use const_format::formatcp;
use serde::Deserialize;
use std::path::Path;

// =============================================================================
// HTTP Response Constants
// =============================================================================

/// Forecasts and health reports must always reflect the store at request time
pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

/// Body returned by the `/` liveness route
pub const LIVENESS_MESSAGE: &str = formatcp!(
    "{} {} is running",
    env!("CARGO_PKG_NAME"),
    env!("CARGO_PKG_VERSION")
);

/// Seconds to wait for open connections to drain on shutdown
pub const SHUTDOWN_GRACE_PERIOD_SECS: u64 = 30;

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "almanac=debug,tower_http=debug";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Default SQLite database location
pub const DEFAULT_DATABASE_URL: &str = "sqlite://weather.db";

/// Default port for the HTTP->HTTPS redirect listener
pub const DEFAULT_REDIRECT_PORT: u16 = 80;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    pub http: HttpServerConfig,
    /// Forecast store configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub tls: TlsConfig,
}

/// How the listener terminates TLS
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// Plain HTTP, for development or behind a TLS-terminating proxy
    #[default]
    None,
    /// PEM certificate and key loaded from disk
    Manual,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TlsConfig {
    #[serde(default)]
    pub mode: TlsMode,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
    /// Spawn a plain HTTP listener that redirects to HTTPS
    #[serde(default)]
    pub redirect_http: bool,
    #[serde(default = "TlsConfig::default_redirect_port")]
    pub redirect_port: u16,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            mode: TlsMode::None,
            cert_path: None,
            key_path: None,
            redirect_http: false,
            redirect_port: DEFAULT_REDIRECT_PORT,
        }
    }
}

impl TlsConfig {
    fn default_redirect_port() -> u16 {
        DEFAULT_REDIRECT_PORT
    }

    /// Certificate and key paths, present only when both are configured
    pub fn pem_paths(&self) -> Option<(&str, &str)> {
        Some((self.cert_path.as_deref()?, self.key_path.as_deref()?))
    }
}

/// SQLite store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL, e.g. `sqlite://weather.db`
    #[serde(default = "DatabaseConfig::default_url")]
    pub url: String,
    /// Upper bound on pooled connections (default: 5)
    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,
    /// How long a request waits for a free connection (default: 30 seconds)
    #[serde(default = "DatabaseConfig::default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
            max_connections: Self::default_max_connections(),
            acquire_timeout_seconds: Self::default_acquire_timeout(),
        }
    }
}

impl DatabaseConfig {
    fn default_url() -> String {
        DEFAULT_DATABASE_URL.to_string()
    }
    fn default_max_connections() -> u32 {
        5
    }
    fn default_acquire_timeout() -> u64 {
        30
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.http.tls.mode == TlsMode::Manual && self.http.tls.pem_paths().is_none() {
            return Err(ConfigError::Validation(
                "http.tls.mode = \"manual\" requires both cert_path and key_path".to_string(),
            ));
        }

        if self.http.tls.redirect_http && self.http.tls.mode != TlsMode::Manual {
            return Err(ConfigError::Validation(
                "http.tls.redirect_http requires http.tls.mode = \"manual\"".to_string(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "database.max_connections must be at least 1".to_string(),
            ));
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(ConfigError::Validation(format!(
                "logging.format must be \"text\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [http]
        host = "127.0.0.1"
        port = 8080
    "#;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = AppConfig::from_toml(MINIMAL).unwrap();

        assert_eq!(config.http.port, 8080);
        assert_eq!(config.http.tls.mode, TlsMode::None);
        assert_eq!(config.http.tls.redirect_port, DEFAULT_REDIRECT_PORT);
        assert_eq!(config.database.url, DEFAULT_DATABASE_URL);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.acquire_timeout_seconds, 30);
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_full_config() {
        let config = AppConfig::from_toml(
            r#"
            [http]
            host = "0.0.0.0"
            port = 443

            [http.tls]
            mode = "manual"
            cert_path = "/etc/almanac/cert.pem"
            key_path = "/etc/almanac/key.pem"
            redirect_http = true
            redirect_port = 8080

            [database]
            url = "sqlite:///var/lib/almanac/weather.db"
            max_connections = 2

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.http.tls.mode, TlsMode::Manual);
        assert_eq!(
            config.http.tls.pem_paths(),
            Some(("/etc/almanac/cert.pem", "/etc/almanac/key.pem"))
        );
        assert!(config.http.tls.redirect_http);
        assert_eq!(config.http.tls.redirect_port, 8080);
        assert_eq!(config.database.max_connections, 2);
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_manual_tls_without_key_is_rejected() {
        let err = AppConfig::from_toml(
            r#"
            [http]
            host = "0.0.0.0"
            port = 443
            [http.tls]
            mode = "manual"
            cert_path = "/etc/almanac/cert.pem"
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_redirect_without_tls_is_rejected() {
        let err = AppConfig::from_toml(
            r#"
            [http]
            host = "0.0.0.0"
            port = 8080
            [http.tls]
            mode = "none"
            redirect_http = true
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_zero_connections_is_rejected() {
        let toml = format!("{MINIMAL}\n[database]\nmax_connections = 0\n");
        assert!(matches!(
            AppConfig::from_toml(&toml),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_unknown_log_format_is_rejected() {
        let toml = format!("{MINIMAL}\n[logging]\nformat = \"xml\"\n");
        assert!(matches!(
            AppConfig::from_toml(&toml),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_bundled_default_config_parses() {
        let config = AppConfig::load(concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml"))
            .unwrap();
        assert_eq!(config.http.port, 8080);
    }
}
