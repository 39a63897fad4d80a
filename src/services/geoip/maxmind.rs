//! MaxMind GeoLite2 database implementation
//!
//! Resolves IPs against a local GeoLite2-City.mmdb file.

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use maxminddb::Reader;
use tracing::trace;

use super::provider::{GeoInfo, GeoIpLookup};

pub struct MaxMindProvider {
    reader: Arc<Reader<Vec<u8>>>,
}

impl MaxMindProvider {
    pub fn new(path: &str) -> Result<Self, maxminddb::MaxMindDbError> {
        let reader = Reader::open_readfile(path)?;
        Ok(Self {
            reader: Arc::new(reader),
        })
    }
}

#[async_trait]
impl GeoIpLookup for MaxMindProvider {
    async fn lookup(&self, ip: &str) -> Option<GeoInfo> {
        let ip_addr: IpAddr = ip.parse().ok()?;

        let result = self.reader.lookup(ip_addr).ok()?;
        let city: maxminddb::geoip2::City = result.decode().ok()??;

        let country = city.country.iso_code.map(String::from);
        let city_name = city.city.names.english.map(|s| s.to_string());

        trace!(
            "MaxMind lookup for {}: country={:?}, city={:?}",
            ip, country, city_name
        );

        Some(GeoInfo {
            country,
            city: city_name,
        })
    }

    fn name(&self) -> &'static str {
        "MaxMind"
    }
}
