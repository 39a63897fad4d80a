//! Configuration loading
//!
//! Layered sources, later ones win: built-in defaults, an optional TOML
//! file (path from `LINKTRACKER_CONFIG`, default `config.toml`), then
//! `LINKTRACKER_*` environment variables (`__` as section separator,
//! e.g. `LINKTRACKER_SERVER__PORT=8080`).

mod structs;

pub use structs::{AppConfig, DatabaseConfig, GeoIpConfig, LoggingConfig, ServerConfig};

use crate::errors::{LinkTrackerError, Result};

impl AppConfig {
    pub fn load() -> Result<Self> {
        let path =
            std::env::var("LINKTRACKER_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        let settings = config::Config::builder()
            .add_source(config::File::with_name(&path).required(false))
            .add_source(config::Environment::with_prefix("LINKTRACKER").separator("__"))
            .build()
            .map_err(|e| {
                LinkTrackerError::config(format!("Failed to load configuration: {}", e))
            })?;

        settings
            .try_deserialize()
            .map_err(|e| LinkTrackerError::config(format!("Invalid configuration: {}", e)))
    }
}
