//! Local stores mirroring remote state.
//!
//! Three stores share one injected [`StoragePort`]:
//!
//! - [`SessionStore`] - tokens (persisted) plus user/profile (memory only)
//! - [`CatalogStore`] - products, cart, and orders, fully persisted
//! - [`WishlistStore`] - client-owned favorites, persisted
//!
//! All mutations replace values wholesale; there are no field-by-field
//! updates in transit, so readers always see a complete snapshot.

pub mod catalog;
pub mod persist;
pub mod session;
pub mod wishlist;

pub use catalog::{CatalogSnapshot, CatalogStore};
pub use persist::{FileStorage, MemoryStorage, StoragePort};
pub use session::SessionStore;
pub use wishlist::WishlistStore;
