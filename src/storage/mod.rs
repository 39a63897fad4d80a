//! Link and click storage
//!
//! The `Storage` trait is the sole owner of mutable link/click state.
//! Two backends: `MemoryStorage` (in-process, used by tests and
//! zero-config runs) and `SeaOrmStorage` (SQLite/MySQL/PostgreSQL,
//! schema managed by the `migration` workspace member).

pub mod backend;
mod memory;
mod models;

pub use backend::SeaOrmStorage;
pub use memory::MemoryStorage;
pub use models::{Click, ClickDetail, Link, StoreStats};

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::DatabaseConfig;
use crate::errors::Result;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Inserts a new link. Fails with `CodeConflict` when the short code
    /// is already taken; the store is unchanged on failure.
    async fn create_link(&self, link: Link) -> Result<()>;

    async fn get_by_code(&self, code: &str) -> Result<Option<Link>>;

    async fn get_by_id(&self, id: &str) -> Result<Option<Link>>;

    /// All links, newest creation time first. Ties are broken by id so
    /// the ordering is deterministic across backends.
    async fn list_links(&self) -> Result<Vec<Link>>;

    /// Removes a link and all its clicks atomically as observed by
    /// readers. Idempotent: deleting an unknown id is not an error.
    async fn delete_link(&self, id: &str) -> Result<()>;

    /// Appends a click and increments the owning link's counter by
    /// exactly 1 in the same logical transaction. Fails with `NotFound`
    /// when the link does not exist.
    async fn record_click(&self, detail: ClickDetail) -> Result<Click>;

    /// Click history of one link, most recent first (ties by id).
    async fn clicks_for_link(&self, link_id: &str) -> Result<Vec<Click>>;

    async fn stats(&self) -> Result<StoreStats>;

    fn backend_name(&self) -> &str;
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create(config: &DatabaseConfig) -> Result<Arc<dyn Storage>> {
        match config.backend.as_str() {
            "memory" => Ok(Arc::new(MemoryStorage::new())),
            "auto" => {
                if config.url.is_empty() {
                    return Ok(Arc::new(MemoryStorage::new()));
                }
                let backend = backend::infer_backend_from_url(&config.url)?;
                Ok(Arc::new(SeaOrmStorage::new(&config.url, &backend).await?))
            }
            other => {
                let backend = backend::normalize_backend_name(other);
                Ok(Arc::new(SeaOrmStorage::new(&config.url, &backend).await?))
            }
        }
    }
}
