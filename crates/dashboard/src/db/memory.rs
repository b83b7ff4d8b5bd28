//! In-memory [`DeliveryStore`] for tests and local experiments.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dukkan_core::StoreId;
use dukkan_core::delivery::DeliveryConfiguration;
use serde_json::Value as JsonValue;
use tokio::sync::RwLock;

use super::{DeliveryStore, RepositoryError};

#[derive(Debug, Clone)]
struct StoreRecord {
    slug: String,
    delivery_fees: Option<JsonValue>,
}

/// Stores delivery records in a shared map. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryDeliveryStore {
    records: Arc<RwLock<BTreeMap<StoreId, StoreRecord>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryDeliveryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a store with a raw delivery value in any supported format.
    pub async fn insert(&self, store_id: StoreId, slug: &str, delivery_fees: Option<JsonValue>) {
        self.records.write().await.insert(
            store_id,
            StoreRecord {
                slug: slug.to_owned(),
                delivery_fees,
            },
        );
    }

    /// Make subsequent writes fail with `RepositoryError::Unavailable`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The raw stored value, bypassing the trait.
    pub async fn raw(&self, store_id: StoreId) -> Option<JsonValue> {
        self.records
            .read()
            .await
            .get(&store_id)
            .and_then(|record| record.delivery_fees.clone())
    }
}

#[async_trait]
impl DeliveryStore for MemoryDeliveryStore {
    async fn read(&self, store_id: StoreId) -> Result<Option<JsonValue>, RepositoryError> {
        self.records
            .read()
            .await
            .get(&store_id)
            .map(|record| record.delivery_fees.clone())
            .ok_or(RepositoryError::NotFound)
    }

    async fn write(
        &self,
        store_id: StoreId,
        configuration: &DeliveryConfiguration,
    ) -> Result<(), RepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("writes disabled".to_string()));
        }

        let value = serde_json::to_value(configuration)?;
        let mut records = self.records.write().await;
        let record = records.get_mut(&store_id).ok_or(RepositoryError::NotFound)?;
        record.delivery_fees = Some(value);
        Ok(())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<StoreId, RepositoryError> {
        self.records
            .read()
            .await
            .iter()
            .find(|(_, record)| record.slug == slug)
            .map(|(&id, _)| id)
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_store_ids(&self) -> Result<Vec<StoreId>, RepositoryError> {
        Ok(self.records.read().await.keys().copied().collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_read_unknown_store() {
        let store = MemoryDeliveryStore::new();
        assert!(matches!(
            store.read(StoreId::new(1)).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_write_replaces_record() {
        let store = MemoryDeliveryStore::new();
        store
            .insert(StoreId::new(1), "bakery", Some(json!({ "baghdad": 5000 })))
            .await;

        store
            .write(StoreId::new(1), &DeliveryConfiguration::new(Vec::new(), true))
            .await
            .unwrap();

        assert_eq!(
            store.read(StoreId::new(1)).await.unwrap(),
            Some(json!({ "zones": [], "isFreeDelivery": true }))
        );
    }

    #[tokio::test]
    async fn test_failed_write_keeps_record() {
        let store = MemoryDeliveryStore::new();
        store.insert(StoreId::new(1), "bakery", None).await;
        store.set_fail_writes(true);

        let result = store
            .write(StoreId::new(1), &DeliveryConfiguration::default())
            .await;

        assert!(matches!(result, Err(RepositoryError::Unavailable(_))));
        assert_eq!(store.raw(StoreId::new(1)).await, None);
    }

    #[tokio::test]
    async fn test_find_by_slug_and_list() {
        let store = MemoryDeliveryStore::new();
        store.insert(StoreId::new(2), "books", None).await;
        store.insert(StoreId::new(1), "bakery", None).await;

        assert_eq!(store.find_by_slug("books").await.unwrap(), StoreId::new(2));
        assert!(store.find_by_slug("nope").await.is_err());
        assert_eq!(
            store.list_store_ids().await.unwrap(),
            [StoreId::new(1), StoreId::new(2)]
        );
    }
}
