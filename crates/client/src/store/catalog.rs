//! Catalog snapshot store.
//!
//! Holds the last-fetched product list, the cart snapshot, and the order
//! history, mirrored from the backend. Every write replaces a field
//! wholesale and re-serializes the entire snapshot to the `products`
//! partition, so a reload resumes from exactly what the server last said.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use superlian_core::{Cart, Order, Product};

use super::persist::StoragePort;

/// Persisted key for the whole snapshot.
const SNAPSHOT_KEY: &str = "products";

/// Everything the catalog store holds, in its persisted shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// Last-fetched product list.
    pub products: Vec<Product>,
    /// Cart snapshot from the most recent cart-affecting refetch.
    pub cart: Option<Cart>,
    /// Order history snapshot.
    pub orders: Vec<Order>,
}

/// Server-authoritative catalog/cart/order mirror.
pub struct CatalogStore {
    storage: Arc<dyn StoragePort>,
    state: RwLock<CatalogSnapshot>,
}

impl CatalogStore {
    /// Create a store, rehydrating the persisted snapshot if present.
    #[must_use]
    pub fn new(storage: Arc<dyn StoragePort>) -> Self {
        let state = storage
            .load(SNAPSHOT_KEY)
            .and_then(|raw| match serde_json::from_str(&raw) {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    tracing::warn!(error = %e, "discarding unreadable catalog snapshot");
                    None
                }
            })
            .unwrap_or_default();
        Self {
            storage,
            state: RwLock::new(state),
        }
    }

    /// Replace the product list.
    pub fn set_products(&self, products: Vec<Product>) {
        let mut state = self.write();
        state.products = products;
        self.persist(&state);
    }

    /// Replace the cart snapshot.
    pub fn set_cart(&self, cart: Cart) {
        let mut state = self.write();
        state.cart = Some(cart);
        self.persist(&state);
    }

    /// Replace the order history.
    pub fn set_orders(&self, orders: Vec<Order>) {
        let mut state = self.write();
        state.orders = orders;
        self.persist(&state);
    }

    /// Drop the cart snapshot (after a successful checkout).
    pub fn clear_cart(&self) {
        let mut state = self.write();
        state.cart = None;
        self.persist(&state);
    }

    /// Clear products, cart, and orders together and remove the persisted
    /// copy. Called by the session boundary.
    pub fn reset(&self) {
        let mut state = self.write();
        *state = CatalogSnapshot::default();
        self.storage.remove(SNAPSHOT_KEY);
    }

    /// Clone of the current products.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.read().products.clone()
    }

    /// Clone of the current cart snapshot.
    #[must_use]
    pub fn cart(&self) -> Option<Cart> {
        self.read().cart.clone()
    }

    /// Clone of the current order history.
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.read().orders.clone()
    }

    /// Look up one order from the snapshot by ID.
    #[must_use]
    pub fn order(&self, id: superlian_core::OrderId) -> Option<Order> {
        self.read().orders.iter().find(|o| o.id == id).cloned()
    }

    /// Clone of the full snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CatalogSnapshot {
        self.read().clone()
    }

    fn persist(&self, state: &CatalogSnapshot) {
        match serde_json::to_string(state) {
            Ok(raw) => self.storage.save(SNAPSHOT_KEY, &raw),
            Err(e) => tracing::warn!(error = %e, "failed to serialize catalog snapshot"),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, CatalogSnapshot> {
        self.state.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, CatalogSnapshot> {
        self.state.write().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
