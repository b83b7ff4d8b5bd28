//! `PostgreSQL` implementation of [`DeliveryStore`].

use async_trait::async_trait;
use dukkan_core::StoreId;
use dukkan_core::delivery::DeliveryConfiguration;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use tracing::{debug, instrument};

use super::{DeliveryStore, RepositoryError};

/// Reads and writes `dashboard.store.delivery_fees`.
#[derive(Debug, Clone)]
pub struct PgDeliveryStore {
    pool: PgPool,
}

impl PgDeliveryStore {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DeliveryStore for PgDeliveryStore {
    #[instrument(skip(self), fields(store_id = %store_id))]
    async fn read(&self, store_id: StoreId) -> Result<Option<JsonValue>, RepositoryError> {
        let row: Option<(Option<JsonValue>,)> = sqlx::query_as(
            r"
            SELECT delivery_fees FROM dashboard.store
            WHERE id = $1
            ",
        )
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(value,)| value).ok_or(RepositoryError::NotFound)
    }

    #[instrument(skip(self, configuration), fields(store_id = %store_id, zones = configuration.zones.len()))]
    async fn write(
        &self,
        store_id: StoreId,
        configuration: &DeliveryConfiguration,
    ) -> Result<(), RepositoryError> {
        let value = serde_json::to_value(configuration)?;

        let result = sqlx::query::<sqlx::Postgres>(
            r"
            UPDATE dashboard.store
            SET delivery_fees = $2, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(store_id)
        .bind(&value)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        debug!("Wrote delivery configuration");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_slug(&self, slug: &str) -> Result<StoreId, RepositoryError> {
        let row: Option<(StoreId,)> = sqlx::query_as(
            r"
            SELECT id FROM dashboard.store
            WHERE slug = $1
            ",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(id,)| id).ok_or(RepositoryError::NotFound)
    }

    #[instrument(skip(self))]
    async fn list_store_ids(&self) -> Result<Vec<StoreId>, RepositoryError> {
        let rows: Vec<(StoreId,)> = sqlx::query_as(
            r"
            SELECT id FROM dashboard.store
            ORDER BY id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
