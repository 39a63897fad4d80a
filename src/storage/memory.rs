//! In-memory storage backend
//!
//! A single `RwLock` guards all state, so every mutation (click insert +
//! counter increment, link delete + click cascade) is atomic as observed
//! by readers. No lock is held across an await point.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use super::models::{Click, ClickDetail, Link, StoreStats};
use super::Storage;
use crate::errors::{LinkTrackerError, Result};

#[derive(Default)]
struct MemoryInner {
    /// Links keyed by id
    links: HashMap<String, Link>,
    /// short_code -> link id
    codes: HashMap<String, String>,
    clicks: Vec<Click>,
    next_click_id: i64,
}

#[derive(Default)]
pub struct MemoryStorage {
    inner: RwLock<MemoryInner>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn create_link(&self, link: Link) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.codes.contains_key(&link.short_code) {
            return Err(LinkTrackerError::code_conflict(format!(
                "Short code '{}' already exists",
                link.short_code
            )));
        }
        inner.codes.insert(link.short_code.clone(), link.id.clone());
        inner.links.insert(link.id.clone(), link);
        Ok(())
    }

    async fn get_by_code(&self, code: &str) -> Result<Option<Link>> {
        let inner = self.inner.read();
        Ok(inner
            .codes
            .get(code)
            .and_then(|id| inner.links.get(id))
            .cloned())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Link>> {
        Ok(self.inner.read().links.get(id).cloned())
    }

    async fn list_links(&self) -> Result<Vec<Link>> {
        let mut links: Vec<Link> = self.inner.read().links.values().cloned().collect();
        links.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(links)
    }

    async fn delete_link(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write();
        if let Some(link) = inner.links.remove(id) {
            inner.codes.remove(&link.short_code);
            inner.clicks.retain(|c| c.link_id != id);
            debug!("MemoryStorage: deleted link '{}'", link.short_code);
        }
        Ok(())
    }

    async fn record_click(&self, detail: ClickDetail) -> Result<Click> {
        let mut inner = self.inner.write();
        if !inner.links.contains_key(&detail.link_id) {
            return Err(LinkTrackerError::not_found(format!(
                "Link '{}' not found",
                detail.link_id
            )));
        }

        inner.next_click_id += 1;
        let click = Click {
            id: inner.next_click_id,
            link_id: detail.link_id,
            ip_address: detail.ip_address,
            user_agent: detail.user_agent,
            referrer: detail.referrer,
            country: detail.country,
            city: detail.city,
            clicked_at: detail.clicked_at,
        };
        inner.clicks.push(click.clone());

        // same write-lock section as the insert: no lost updates
        if let Some(link) = inner.links.get_mut(&click.link_id) {
            link.total_clicks += 1;
        }

        Ok(click)
    }

    async fn clicks_for_link(&self, link_id: &str) -> Result<Vec<Click>> {
        let mut clicks: Vec<Click> = self
            .inner
            .read()
            .clicks
            .iter()
            .filter(|c| c.link_id == link_id)
            .cloned()
            .collect();
        clicks.sort_by(|a, b| {
            b.clicked_at
                .cmp(&a.clicked_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(clicks)
    }

    async fn stats(&self) -> Result<StoreStats> {
        let inner = self.inner.read();
        Ok(StoreStats {
            links_count: inner.links.len() as u64,
            clicks_count: inner.clicks.len() as u64,
        })
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
