//! Wishlist store.
//!
//! A persisted list of product IDs in insertion order. Unlike the catalog
//! this is client-owned data - the backend knows nothing about it - but it
//! still goes through the storage port and is cleared at the session
//! boundary so one shopper's wishlist never leaks into the next session.

use std::sync::{Arc, RwLock};

use superlian_core::ProductId;

use super::persist::StoragePort;

/// Persisted key for the wishlist.
const WISHLIST_KEY: &str = "wishlist";

/// Favorite products, by ID, in insertion order.
pub struct WishlistStore {
    storage: Arc<dyn StoragePort>,
    items: RwLock<Vec<ProductId>>,
}

impl WishlistStore {
    /// Create a store, rehydrating the persisted list if present.
    #[must_use]
    pub fn new(storage: Arc<dyn StoragePort>) -> Self {
        let items = storage
            .load(WISHLIST_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self {
            storage,
            items: RwLock::new(items),
        }
    }

    /// Add a product (no-op if already present).
    pub fn add(&self, id: ProductId) {
        let mut items = self.write();
        if !items.contains(&id) {
            items.push(id);
            self.persist(&items);
        }
    }

    /// Remove a product (no-op if absent).
    pub fn remove(&self, id: ProductId) {
        let mut items = self.write();
        let before = items.len();
        items.retain(|item| *item != id);
        if items.len() != before {
            self.persist(&items);
        }
    }

    /// Toggle membership; returns whether the product is present afterwards.
    pub fn toggle(&self, id: ProductId) -> bool {
        let mut items = self.write();
        let present = if let Some(pos) = items.iter().position(|item| *item == id) {
            items.remove(pos);
            false
        } else {
            items.push(id);
            true
        };
        self.persist(&items);
        present
    }

    /// Whether a product is wishlisted.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.read().contains(&id)
    }

    /// Clone of the list, in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<ProductId> {
        self.read().clone()
    }

    /// Empty the wishlist and remove the persisted copy.
    pub fn clear(&self) {
        let mut items = self.write();
        items.clear();
        self.storage.remove(WISHLIST_KEY);
    }

    fn persist(&self, items: &[ProductId]) {
        match serde_json::to_string(items) {
            Ok(raw) => self.storage.save(WISHLIST_KEY, &raw),
            Err(e) => tracing::warn!(error = %e, "failed to serialize wishlist"),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<ProductId>> {
        self.items.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<ProductId>> {
        self.items.write().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::store::persist::MemoryStorage;

    use super::*;

    #[test]
    fn test_toggle_roundtrip() {
        let store = WishlistStore::new(Arc::new(MemoryStorage::new()) as Arc<dyn StoragePort>);
        let id = ProductId::new(5);

        assert!(store.toggle(id));
        assert!(store.contains(id));
        assert!(!store.toggle(id));
        assert!(!store.contains(id));
    }

    #[test]
    fn test_add_is_idempotent() {
        let store = WishlistStore::new(Arc::new(MemoryStorage::new()) as Arc<dyn StoragePort>);
        store.add(ProductId::new(1));
        store.add(ProductId::new(1));
        assert_eq!(store.items().len(), 1);
    }

    #[test]
    fn test_persists_across_instances() {
        let storage = Arc::new(MemoryStorage::new());
        {
            let store = WishlistStore::new(Arc::clone(&storage) as Arc<dyn StoragePort>);
            store.add(ProductId::new(3));
            store.add(ProductId::new(9));
        }
        let store = WishlistStore::new(storage as Arc<dyn StoragePort>);
        assert_eq!(store.items(), vec![ProductId::new(3), ProductId::new(9)]);
    }

    #[test]
    fn test_clear_removes_persisted_copy() {
        let storage = Arc::new(MemoryStorage::new());
        let store = WishlistStore::new(Arc::clone(&storage) as Arc<dyn StoragePort>);
        store.add(ProductId::new(3));
        store.clear();
        assert!(store.items().is_empty());
        assert!(storage.keys().is_empty());
    }
}
