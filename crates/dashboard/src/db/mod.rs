//! Storage for store delivery settings.
//!
//! # Database: `dukkan`
//!
//! ## Tables
//!
//! - `dashboard.store` - Storefronts; `delivery_fees` holds the raw JSONB record
//! - `dashboard.session` - Merchant sessions (tower-sessions)
//!
//! The `delivery_fees` column may hold any of the legacy formats understood by
//! [`dukkan_core::delivery::LegacyShape`]. Writes always store the normalized form.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/dashboard/migrations/` and run via:
//! ```bash
//! cargo run -p dukkan-cli -- migrate
//! ```

pub mod memory;
pub mod stores;

use std::time::Duration;

use async_trait::async_trait;
use dukkan_core::StoreId;
use dukkan_core::delivery::DeliveryConfiguration;
use secrecy::ExposeSecret;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use memory::MemoryDeliveryStore;
pub use stores::PgDeliveryStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data could not be encoded for storage.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Storage is temporarily refusing writes.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Read/write access to a store's delivery settings.
///
/// `write` replaces the whole record; there is no merge and no version check,
/// so the last writer wins.
#[async_trait]
pub trait DeliveryStore: Send + Sync {
    /// Raw stored value, `None` if the column is null.
    ///
    /// Returns `RepositoryError::NotFound` if the store does not exist.
    async fn read(&self, store_id: StoreId) -> Result<Option<JsonValue>, RepositoryError>;

    /// Replace the stored record with `configuration`.
    async fn write(
        &self,
        store_id: StoreId,
        configuration: &DeliveryConfiguration,
    ) -> Result<(), RepositoryError>;

    /// Resolve a storefront slug to its store.
    async fn find_by_slug(&self, slug: &str) -> Result<StoreId, RepositoryError>;

    /// Every store id, ascending.
    async fn list_store_ids(&self) -> Result<Vec<StoreId>, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
