//! Server configuration
//!
//! Sources, lowest priority first: built-in defaults, an optional config
//! file (`roster.toml`, or the path in `ROSTER_CONFIG`), then `ROSTER_*`
//! environment variables (`ROSTER_BIND_ADDRESS`, `ROSTER_UNSUBSCRIBE_GUARD`,
//! `ROSTER_LOG_FORMAT`).

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use roster_core::UnsubscribeGuard;
use serde::Deserialize;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
pub const DEFAULT_CONFIG_FILE: &str = "roster";

/// Shape of the log lines written to stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub unsubscribe_guard: UnsubscribeGuard,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Builder pre-loaded with the defaults
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("unsubscribe_guard", UnsubscribeGuard::default().to_string())?
            .set_default("log_format", "text")
    }

    pub fn load() -> Result<Self, ConfigError> {
        let file =
            std::env::var("ROSTER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        Self::defaults()?
            .add_source(File::with_name(&file).required(false))
            .add_source(Environment::with_prefix("ROSTER"))
            .build()?
            .try_deserialize()
    }
}
