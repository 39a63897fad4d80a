//! SeaORM storage backend
//!
//! Database storage using SeaORM, supporting SQLite, MySQL/MariaDB and
//! PostgreSQL. Click recording and link deletion run inside database
//! transactions so the click-counter invariant holds under concurrency.

mod connection;
mod converters;
mod operations;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::errors::{LinkTrackerError, Result};

pub use connection::{connect_generic, connect_sqlite, run_migrations};

/// Infers the database type from a connection URL
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite://")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(LinkTrackerError::database_config(format!(
            "Cannot infer database type from URL: {}. Supported URL schemes: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

pub fn normalize_backend_name(backend: &str) -> String {
    match backend {
        "mariadb" => "mysql".to_string(),
        other => other.to_string(),
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(LinkTrackerError::database_config(
                "Database URL is not set".to_string(),
            ));
        }

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
        };

        run_migrations(&storage.db).await?;

        info!(
            "{} storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    /// Raw connection handle, for callers that need direct database access
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}
