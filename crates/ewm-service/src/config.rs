//! Main service configuration.
//!
//! Layered as built-in defaults, then an optional YAML file, then `EWM__*`
//! environment variables (`EWM__STATS_URL=http://stats:9090`).

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use ewm_http::LogFormat;
use serde::Deserialize;

/// Configuration for the main service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// HTTP listen address.
    pub listen_addr: SocketAddr,
    /// Base URL of the stats service.
    pub stats_url: String,
    /// Timeout for each stats call, in milliseconds.
    pub stats_timeout_ms: u64,
    /// Application name recorded with every hit.
    pub app_name: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
}

impl ServiceConfig {
    /// Loads configuration, reading `path` when it exists.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("listen_addr", "0.0.0.0:8080")?
            .set_default("stats_url", "http://localhost:9090")?
            .set_default("stats_timeout_ms", 2000)?
            .set_default("app_name", "ewm-main-service")?
            .set_default("log_level", "info")?
            .set_default("log_format", "pretty")?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder
            .add_source(
                Environment::with_prefix("EWM")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    pub fn stats_timeout(&self) -> Duration {
        Duration::from_millis(self.stats_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::load(None).unwrap();
        assert_eq!(config.listen_addr.port(), 8080);
        assert_eq!(config.app_name, "ewm-main-service");
        assert_eq!(config.stats_timeout(), Duration::from_secs(2));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_yaml_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "stats_url: \"http://stats-server:9090\"\nstats_timeout_ms: 500\nlog_format: json"
        )
        .unwrap();

        let config = ServiceConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.stats_url, "http://stats-server:9090");
        assert_eq!(config.stats_timeout(), Duration::from_millis(500));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.listen_addr.port(), 8080);
    }
}
