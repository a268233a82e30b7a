//! Catalog wire types.
//!
//! These mirror the backend's catalog resources exactly; the client never
//! derives or rewrites catalog data, it only mirrors what the server sent.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};

/// A color variant of a product with its stock state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorOption {
    /// Display name of the color (e.g., "Black", "Gold").
    pub color: String,
    /// Whether this color is currently purchasable.
    pub in_stock: bool,
}

/// A storage-size variant of a product with its stock state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageOption {
    /// Storage size label (e.g., "128gb", "1tb").
    pub size: String,
    /// Whether this size is currently purchasable.
    pub in_stock: bool,
}

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Brand name.
    pub brand: String,
    /// Category name (flat string; grouping happens client-side).
    pub category: String,
    /// Plain-text description.
    #[serde(default)]
    pub description: String,
    /// Primary image URL.
    #[serde(default)]
    pub image: String,
    /// Unit price; the backend serializes decimals as strings.
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    /// Units in stock across all variants.
    pub stock: i32,
    /// Color variants.
    #[serde(default)]
    pub colors: Vec<ColorOption>,
    /// Storage-size variants.
    #[serde(default)]
    pub storage: Vec<StorageOption>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Category name.
    pub name: String,
    /// Description shown on category pages.
    #[serde(default)]
    pub description: String,
    /// Banner image URL.
    #[serde(default)]
    pub image: String,
}
