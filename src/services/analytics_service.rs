//! Analytics service layer
//!
//! Derives per-link summary statistics from the click history: totals,
//! unique visitors, top referrer hosts, top countries and the recent
//! click feed. Output is fully deterministic for a fixed click set:
//! counts sort with a stable sort, so ties keep first-seen order.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{LinkTrackerError, Result};
use crate::storage::{Click, Storage};
use crate::utils::referrer_host;

/// Referrer/country lists are truncated to this many entries
pub const TOP_ENTRIES_LIMIT: usize = 10;

/// Size of the recent click feed
pub const RECENT_CLICKS_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferrerCount {
    pub referrer: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryCount {
    pub country: String,
    pub count: u64,
}

/// Summary statistics for one link
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAnalytics {
    pub total_clicks: u64,
    /// Distinct IPs, empty and "unknown" excluded
    pub unique_visitors: u64,
    /// Referrer host -> clicks, descending, ties by first-seen, top 10
    pub referrers: Vec<ReferrerCount>,
    /// Country code -> clicks, same shape as referrers
    pub countries: Vec<CountryCount>,
    /// The 20 most recent clicks, most recent first
    pub recent_clicks: Vec<Click>,
}

#[derive(Clone)]
pub struct AnalyticsService {
    storage: Arc<dyn Storage>,
}

impl AnalyticsService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Summarizes the click history of one link. Fails with `NotFound`
    /// for unknown link ids.
    pub async fn summarize(&self, link_id: &str) -> Result<LinkAnalytics> {
        if self.storage.get_by_id(link_id).await?.is_none() {
            return Err(LinkTrackerError::not_found(format!(
                "Link '{}' not found",
                link_id
            )));
        }

        // most recent first
        let clicks = self.storage.clicks_for_link(link_id).await?;

        let total_clicks = clicks.len() as u64;

        let unique_visitors = clicks
            .iter()
            .map(|c| c.ip_address.as_str())
            .filter(|ip| !ip.is_empty() && *ip != "unknown")
            .collect::<HashSet<_>>()
            .len() as u64;

        // iterate chronologically so count ties resolve by first appearance
        let referrers = top_counts(clicks.iter().rev().filter_map(|c| referrer_host(&c.referrer)))
            .into_iter()
            .map(|(referrer, count)| ReferrerCount { referrer, count })
            .collect();

        let countries = top_counts(clicks.iter().rev().filter_map(|c| c.country.clone()))
            .into_iter()
            .map(|(country, count)| CountryCount { country, count })
            .collect();

        let recent_clicks: Vec<Click> =
            clicks.into_iter().take(RECENT_CLICKS_LIMIT).collect();

        debug!(
            "Analytics: summarized link '{}' ({} clicks)",
            link_id, total_clicks
        );

        Ok(LinkAnalytics {
            total_clicks,
            unique_visitors,
            referrers,
            countries,
            recent_clicks,
        })
    }
}

/// Counts occurrences preserving first-seen order, then sorts descending
/// by count (stable, so ties keep that order) and truncates to the top
/// entries.
fn top_counts(keys: impl Iterator<Item = String>) -> Vec<(String, u64)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, u64> = HashMap::new();

    for key in keys {
        match counts.entry(key) {
            Entry::Occupied(mut e) => *e.get_mut() += 1,
            Entry::Vacant(e) => {
                order.push(e.key().clone());
                e.insert(1);
            }
        }
    }

    let mut entries: Vec<(String, u64)> = order
        .into_iter()
        .map(|key| {
            let count = counts[&key];
            (key, count)
        })
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(TOP_ENTRIES_LIMIT);
    entries
}
