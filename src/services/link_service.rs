//! Link management service
//!
//! Business logic for link creation, listing and deletion. Short code
//! generation is a pure function; the store's insert is the sole arbiter
//! of uniqueness, with one regenerate-and-retry for generated codes.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::errors::{LinkTrackerError, Result};
use crate::storage::{Link, Storage};
use crate::utils::{generate_random_code, is_valid_short_code, RANDOM_CODE_LENGTH};

/// Title applied when the caller supplies none
pub const DEFAULT_TITLE: &str = "Untitled Link";

/// Initial insert plus one regenerate on a random-code collision
const CODE_INSERT_ATTEMPTS: usize = 2;

/// Request to create a new link
#[derive(Debug, Clone, Default)]
pub struct CreateLinkRequest {
    pub destination_url: String,
    pub title: Option<String>,
    /// Caller-supplied short code; generated when absent
    pub custom_code: Option<String>,
    pub source: Option<String>,
}

/// Result of link creation
#[derive(Debug, Clone)]
pub struct LinkCreateResult {
    pub link: Link,
    /// Whether the short code was auto-generated
    pub generated_code: bool,
}

#[derive(Clone)]
pub struct LinkService {
    storage: Arc<dyn Storage>,
}

impl LinkService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn create_link(&self, req: CreateLinkRequest) -> Result<LinkCreateResult> {
        let CreateLinkRequest {
            destination_url,
            title,
            custom_code,
            source,
        } = req;

        if destination_url.trim().is_empty() {
            return Err(LinkTrackerError::validation(
                "Destination URL is required",
            ));
        }

        let title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        match custom_code.filter(|c| !c.is_empty()) {
            Some(code) => {
                if !is_valid_short_code(&code) {
                    return Err(LinkTrackerError::validation(format!(
                        "Invalid short code '{}'. Only alphanumeric, underscore and hyphen allowed.",
                        code
                    )));
                }

                let link = Self::build_link(code, &destination_url, &title, source.as_deref());
                self.storage.create_link(link.clone()).await?;

                info!(
                    "LinkService: created link '{}' -> '{}'",
                    link.short_code, link.destination_url
                );
                Ok(LinkCreateResult {
                    link,
                    generated_code: false,
                })
            }
            None => {
                let mut last_conflict = None;

                for _ in 0..CODE_INSERT_ATTEMPTS {
                    let code = generate_random_code(RANDOM_CODE_LENGTH);
                    let link =
                        Self::build_link(code, &destination_url, &title, source.as_deref());

                    match self.storage.create_link(link.clone()).await {
                        Ok(()) => {
                            info!(
                                "LinkService: created link '{}' -> '{}'",
                                link.short_code, link.destination_url
                            );
                            return Ok(LinkCreateResult {
                                link,
                                generated_code: true,
                            });
                        }
                        Err(e @ LinkTrackerError::CodeConflict(_)) => {
                            last_conflict = Some(e);
                        }
                        Err(e) => return Err(e),
                    }
                }

                Err(last_conflict.unwrap_or_else(|| {
                    LinkTrackerError::code_conflict("Exhausted short code generation attempts")
                }))
            }
        }
    }

    pub async fn get_link(&self, id: &str) -> Result<Option<Link>> {
        self.storage.get_by_id(id).await
    }

    /// All links, newest first
    pub async fn list_links(&self) -> Result<Vec<Link>> {
        self.storage.list_links().await
    }

    /// Idempotent: deleting an unknown id succeeds
    pub async fn delete_link(&self, id: &str) -> Result<()> {
        self.storage.delete_link(id).await?;
        info!("LinkService: deleted '{}'", id);
        Ok(())
    }

    fn build_link(code: String, destination_url: &str, title: &str, source: Option<&str>) -> Link {
        Link {
            id: Uuid::new_v4().to_string(),
            destination_url: destination_url.to_string(),
            short_code: code,
            title: title.to_string(),
            source: source.map(|s| s.to_string()),
            created_at: Utc::now(),
            total_clicks: 0,
        }
    }
}
