use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A trackable short link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Opaque unique identifier (UUID v4)
    pub id: String,
    pub destination_url: String,
    /// Unique across live links; the redirect lookup key
    pub short_code: String,
    pub title: String,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Denormalized; equals the number of Click rows referencing this link
    pub total_clicks: i64,
}

/// One recorded visit through a link's redirect. Immutable once created;
/// removed only when the owning link is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Click {
    pub id: i64,
    pub link_id: String,
    /// Best-effort; `"unknown"` when undeterminable
    pub ip_address: String,
    pub user_agent: String,
    pub referrer: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub clicked_at: DateTime<Utc>,
}

/// Input for recording a click; the store assigns the id
#[derive(Debug, Clone)]
pub struct ClickDetail {
    pub link_id: String,
    pub ip_address: String,
    pub user_agent: String,
    pub referrer: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub clicked_at: DateTime<Utc>,
}

impl ClickDetail {
    pub fn new(link_id: &str, ip_address: &str, user_agent: &str, referrer: &str) -> Self {
        Self {
            link_id: link_id.to_string(),
            ip_address: ip_address.to_string(),
            user_agent: user_agent.to_string(),
            referrer: referrer.to_string(),
            country: None,
            city: None,
            clicked_at: Utc::now(),
        }
    }

    pub fn with_geo(mut self, country: Option<String>, city: Option<String>) -> Self {
        self.country = country;
        self.city = city;
        self
    }
}

/// Store totals for the health endpoint
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StoreStats {
    pub links_count: u64,
    pub clicks_count: u64,
}
