//! Stats server configuration.
//!
//! Layered as built-in defaults, then an optional YAML file, then
//! `EWM_STATS__*` environment variables.

use std::net::SocketAddr;
use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use ewm_http::LogFormat;
use serde::Deserialize;

/// Configuration for the stats server.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsConfig {
    /// HTTP listen address.
    pub listen_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
}

impl StatsConfig {
    /// Loads configuration, reading `path` when it exists.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("listen_addr", "0.0.0.0:9090")?
            .set_default("log_level", "info")?
            .set_default("log_format", "pretty")?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder
            .add_source(
                Environment::with_prefix("EWM_STATS")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}
