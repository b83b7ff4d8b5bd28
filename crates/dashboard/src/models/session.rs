//! Session keys for merchant editing state.
//!
//! Each store being edited gets its own [`dukkan_core::delivery::ZoneEditor`]
//! in the session, so a merchant can work on two stores in two tabs.

use dukkan_core::StoreId;

/// Session keys for dashboard data.
pub mod keys {
    /// Prefix for the per-store delivery editor.
    pub const DELIVERY_EDITOR_PREFIX: &str = "delivery_editor";
}

/// Session key holding the delivery editor for `store_id`.
#[must_use]
pub fn delivery_editor_key(store_id: StoreId) -> String {
    format!("{}:{store_id}", keys::DELIVERY_EDITOR_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_key_is_per_store() {
        assert_eq!(delivery_editor_key(StoreId::new(12)), "delivery_editor:12");
        assert_ne!(
            delivery_editor_key(StoreId::new(1)),
            delivery_editor_key(StoreId::new(2))
        );
    }
}
