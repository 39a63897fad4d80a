//! GeoIP provider abstraction
//!
//! One lookup interface, implementation chosen from configuration:
//! 1. `maxminddb_path` configured and readable -> MaxMindProvider
//! 2. `api_url` configured -> ExternalApiProvider
//! 3. neither -> disabled (every lookup resolves to `None`)
//!
//! Geolocation is best-effort everywhere; callers tolerate absence.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::external_api::ExternalApiProvider;
use super::maxmind::MaxMindProvider;
use crate::config::GeoIpConfig;

/// Geolocation result
#[derive(Debug, Clone, Default)]
pub struct GeoInfo {
    /// ISO 3166-1 alpha-2 country code (e.g. "US", "DE")
    pub country: Option<String>,
    pub city: Option<String>,
}

#[async_trait]
pub trait GeoIpLookup: Send + Sync {
    async fn lookup(&self, ip: &str) -> Option<GeoInfo>;

    /// Provider name, for logs
    fn name(&self) -> &'static str;
}

struct DisabledProvider;

#[async_trait]
impl GeoIpLookup for DisabledProvider {
    async fn lookup(&self, _ip: &str) -> Option<GeoInfo> {
        None
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Unified GeoIP provider, implementation selected at startup
pub struct GeoIpProvider {
    inner: Arc<dyn GeoIpLookup>,
}

impl GeoIpProvider {
    pub fn new(config: &GeoIpConfig) -> Self {
        let inner: Arc<dyn GeoIpLookup> = if let Some(ref path) = config.maxminddb_path {
            match MaxMindProvider::new(path) {
                Ok(provider) => {
                    info!("GeoIP: Using MaxMind database at {}", path);
                    Arc::new(provider)
                }
                Err(e) => {
                    warn!(
                        "GeoIP: Failed to load MaxMind database at {}: {}, falling back",
                        path, e
                    );
                    Self::fallback(config)
                }
            }
        } else {
            Self::fallback(config)
        };

        info!("GeoIP: Initialized with {} provider", inner.name());
        Self { inner }
    }

    fn fallback(config: &GeoIpConfig) -> Arc<dyn GeoIpLookup> {
        match config.api_url {
            Some(ref url) => Arc::new(ExternalApiProvider::new(url)),
            None => {
                debug!("GeoIP: No database or API configured, lookups disabled");
                Arc::new(DisabledProvider)
            }
        }
    }

    /// Provider that never resolves; used by tests and zero-config runs
    pub fn disabled() -> Self {
        Self {
            inner: Arc::new(DisabledProvider),
        }
    }

    pub async fn lookup(&self, ip: &str) -> Option<GeoInfo> {
        self.inner.lookup(ip).await
    }

    pub fn provider_name(&self) -> &'static str {
        self.inner.name()
    }
}

impl Clone for GeoIpProvider {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
