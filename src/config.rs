//! Configuration loading and constants.
//!
//! Loads application configuration from TOML files and defines constants for
//! the ping target, default paths, and logging. `AppConfig` is the root
//! configuration struct; `PingSettings::resolve` turns the raw settings into
//! the runtime `PingConfig` consumed by the keep-alive service.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

// =============================================================================
// Ping Target Constants
// =============================================================================

/// Base URL pinged when neither the config file nor the environment names one
pub const DEFAULT_TARGET_URL: &str = "http://localhost:5000";

/// Environment variable consulted for the target base URL
pub const TARGET_URL_ENV: &str = "RENDER_EXTERNAL_URL";

/// Path of the health endpoint, appended to the target base URL
pub const HEALTH_PATH: &str = "/health";

/// User-Agent header sent with every ping
pub const PING_USER_AGENT: &str = "KeepAlive/1.0";

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "caffeine=debug";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Ping target and timing settings
    #[serde(default)]
    pub ping: PingSettings,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Raw ping settings as they appear in the config file
#[derive(Debug, Clone, Deserialize)]
pub struct PingSettings {
    /// Base URL of the service to keep awake. Takes precedence over the
    /// RENDER_EXTERNAL_URL environment variable.
    pub target_url: Option<String>,
    /// Seconds between pings (default: 300)
    #[serde(default = "PingSettings::default_interval")]
    pub interval_seconds: u64,
    /// Seconds to wait before the first ping, giving the target time to boot
    /// (default: 120)
    #[serde(default = "PingSettings::default_startup_delay")]
    pub startup_delay_seconds: u64,
    /// Seconds to wait before retrying after an unexpected failure
    /// (default: 60)
    #[serde(default = "PingSettings::default_retry_delay")]
    pub retry_delay_seconds: u64,
    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "PingSettings::default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for PingSettings {
    fn default() -> Self {
        Self {
            target_url: None,
            interval_seconds: Self::default_interval(),
            startup_delay_seconds: Self::default_startup_delay(),
            retry_delay_seconds: Self::default_retry_delay(),
            request_timeout_seconds: Self::default_request_timeout(),
        }
    }
}

impl PingSettings {
    fn default_interval() -> u64 {
        300 // 5 minutes
    }
    fn default_startup_delay() -> u64 {
        120 // 2 minutes
    }
    fn default_retry_delay() -> u64 {
        60
    }
    fn default_request_timeout() -> u64 {
        30
    }

    /// Resolve into a runtime config, consulting RENDER_EXTERNAL_URL when the
    /// file names no explicit target.
    pub fn resolve(&self) -> PingConfig {
        self.resolve_with_env(std::env::var(TARGET_URL_ENV).ok())
    }

    /// Precedence: explicit config, then the environment value, then the
    /// local default. An empty environment value counts as unset.
    fn resolve_with_env(&self, env_url: Option<String>) -> PingConfig {
        let target_url = self
            .target_url
            .clone()
            .or_else(|| env_url.filter(|url| !url.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_TARGET_URL.to_string());

        PingConfig {
            target_url,
            interval: Duration::from_secs(self.interval_seconds),
            startup_delay: Duration::from_secs(self.startup_delay_seconds),
            retry_delay: Duration::from_secs(self.retry_delay_seconds),
            request_timeout: Duration::from_secs(self.request_timeout_seconds),
        }
    }
}

/// Resolved runtime configuration for the keep-alive service
#[derive(Debug, Clone)]
pub struct PingConfig {
    /// Base URL of the service to keep awake
    pub target_url: String,
    /// Delay between pings
    pub interval: Duration,
    /// Delay before the first ping after start
    pub startup_delay: Duration,
    /// Delay before the next ping after an unexpected failure
    pub retry_delay: Duration,
    /// Timeout applied to each ping request
    pub request_timeout: Duration,
}

impl PingConfig {
    /// Full URL of the health endpoint
    pub fn ping_url(&self) -> String {
        format!("{}{}", self.target_url.trim_end_matches('/'), HEALTH_PATH)
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
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;

        // Validate: an explicitly configured target must not be blank
        if let Some(url) = &config.ping.target_url {
            if url.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "ping.target_url is empty. Remove it to fall back to RENDER_EXTERNAL_URL or the local default".to_string(),
                ));
            }
        }

        Ok(config)
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
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = PingSettings::default();
        assert!(settings.target_url.is_none());
        assert_eq!(settings.interval_seconds, 300);
        assert_eq!(settings.startup_delay_seconds, 120);
        assert_eq!(settings.retry_delay_seconds, 60);
        assert_eq!(settings.request_timeout_seconds, 30);
    }

    #[test]
    fn test_empty_file_parses_with_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.ping.interval_seconds, 300);
        assert_eq!(config.logging.format, "text");
    }

    #[test]
    fn test_load_full_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[ping]
target_url = "https://example.onrender.com"
interval_seconds = 600
startup_delay_seconds = 10
retry_delay_seconds = 5
request_timeout_seconds = 15

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(
            config.ping.target_url.as_deref(),
            Some("https://example.onrender.com")
        );
        assert_eq!(config.ping.interval_seconds, 600);
        assert_eq!(config.ping.startup_delay_seconds, 10);
        assert_eq!(config.ping.retry_delay_seconds, 5);
        assert_eq!(config.ping.request_timeout_seconds, 15);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_load_partial_config_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[ping]\ninterval_seconds = 60\n").unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.ping.interval_seconds, 60);
        assert_eq!(config.ping.startup_delay_seconds, 120);
        assert!(config.ping.target_url.is_none());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = AppConfig::load("/nonexistent/caffeine.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_invalid_toml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[ping\ninterval_seconds =").unwrap();

        let err = AppConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_blank_target_url_is_validation_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[ping]\ntarget_url = \"  \"\n").unwrap();

        let err = AppConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_resolve_prefers_explicit_target() {
        let settings = PingSettings {
            target_url: Some("https://configured.example.com".to_string()),
            ..PingSettings::default()
        };
        let config = settings.resolve_with_env(Some("https://env.example.com".to_string()));
        assert_eq!(config.target_url, "https://configured.example.com");
    }

    #[test]
    fn test_resolve_falls_back_to_env() {
        let settings = PingSettings::default();
        let config = settings.resolve_with_env(Some("https://env.example.com".to_string()));
        assert_eq!(config.target_url, "https://env.example.com");
    }

    #[test]
    fn test_resolve_ignores_empty_env() {
        let config = PingSettings::default().resolve_with_env(Some(String::new()));
        assert_eq!(config.target_url, DEFAULT_TARGET_URL);
    }

    #[test]
    fn test_resolve_defaults_without_env() {
        let config = PingSettings::default().resolve_with_env(None);
        assert_eq!(config.target_url, DEFAULT_TARGET_URL);
        assert_eq!(config.interval, Duration::from_secs(300));
        assert_eq!(config.startup_delay, Duration::from_secs(120));
        assert_eq!(config.retry_delay, Duration::from_secs(60));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_ping_url_joins_health_path() {
        let config = PingSettings::default().resolve_with_env(None);
        assert_eq!(config.ping_url(), "http://localhost:5000/health");
    }

    #[test]
    fn test_ping_url_trims_trailing_slash() {
        let settings = PingSettings {
            target_url: Some("https://example.onrender.com/".to_string()),
            ..PingSettings::default()
        };
        let config = settings.resolve_with_env(None);
        assert_eq!(config.ping_url(), "https://example.onrender.com/health");
    }
}
