//! Application state shared across handlers.

use std::sync::Arc;

use dukkan_core::delivery::LocationCatalog;
use sqlx::PgPool;

use crate::config::DashboardConfig;
use crate::db::{DeliveryStore, PgDeliveryStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like storage and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: DashboardConfig,
    catalog: LocationCatalog,
    pool: Option<PgPool>,
    store: Arc<dyn DeliveryStore>,
}

impl AppState {
    /// Create state backed by `PostgreSQL`.
    #[must_use]
    pub fn new(config: DashboardConfig, pool: PgPool) -> Self {
        let store = Arc::new(PgDeliveryStore::new(pool.clone()));
        Self::build(config, Some(pool), store)
    }

    /// Create state over any store, without a database pool.
    ///
    /// Used by tests and local runs with [`crate::db::MemoryDeliveryStore`].
    #[must_use]
    pub fn with_store(config: DashboardConfig, store: Arc<dyn DeliveryStore>) -> Self {
        Self::build(config, None, store)
    }

    fn build(config: DashboardConfig, pool: Option<PgPool>, store: Arc<dyn DeliveryStore>) -> Self {
        let catalog = config.catalog();
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                pool,
                store,
            }),
        }
    }

    /// Get a reference to the dashboard configuration.
    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    /// Known locations and default fees.
    #[must_use]
    pub fn catalog(&self) -> &LocationCatalog {
        &self.inner.catalog
    }

    /// The database pool, if storage is `PostgreSQL`.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    #[must_use]
    pub fn store(&self) -> &dyn DeliveryStore {
        self.inner.store.as_ref()
    }
}
