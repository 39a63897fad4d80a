//! Click recording service
//!
//! Resolves best-effort geolocation, then appends the click atomically
//! with the owning link's counter increment. The geolocation lookup is
//! bounded by a timeout and skipped on expiry; it can never stall a
//! redirect.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::debug;

use crate::errors::Result;
use crate::services::geoip::{GeoInfo, GeoIpProvider};
use crate::storage::{Click, ClickDetail, Storage};
use crate::utils::ip::is_private_or_local;

#[derive(Clone)]
pub struct ClickRecorder {
    storage: Arc<dyn Storage>,
    geoip: GeoIpProvider,
    lookup_timeout: Duration,
}

impl ClickRecorder {
    pub fn new(storage: Arc<dyn Storage>, geoip: GeoIpProvider, lookup_timeout: Duration) -> Self {
        Self {
            storage,
            geoip,
            lookup_timeout,
        }
    }

    /// Records one click for `link_id`. Fails with `NotFound` when the
    /// link no longer exists.
    pub async fn record(
        &self,
        link_id: &str,
        ip_address: &str,
        user_agent: &str,
        referrer: &str,
    ) -> Result<Click> {
        let geo = self.resolve_geo(ip_address).await;
        let (country, city) = match geo {
            Some(GeoInfo { country, city }) => (country, city),
            None => (None, None),
        };

        let detail =
            ClickDetail::new(link_id, ip_address, user_agent, referrer).with_geo(country, city);
        let click = self.storage.record_click(detail).await?;

        debug!("Recorded click {} for link '{}'", click.id, link_id);
        Ok(click)
    }

    async fn resolve_geo(&self, ip: &str) -> Option<GeoInfo> {
        let addr: IpAddr = ip.parse().ok()?;
        if is_private_or_local(&addr) {
            return None;
        }

        match timeout(self.lookup_timeout, self.geoip.lookup(ip)).await {
            Ok(geo) => geo,
            Err(_) => {
                debug!("GeoIP lookup for {} timed out, skipping", ip);
                None
            }
        }
    }
}
