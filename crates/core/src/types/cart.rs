//! Cart wire types.
//!
//! The cart is server-authoritative: every field here, including
//! `total_price`, is a snapshot of what the backend computed. The client
//! never adjusts quantities or totals locally.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CartId, CartItemId, ProductId, UserId};

/// A line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Cart-item ID (distinct from the product ID).
    pub id: CartItemId,
    /// Product this line refers to.
    pub product_id: ProductId,
    /// Product name at snapshot time.
    pub product_name: String,
    /// Product image URL at snapshot time.
    #[serde(default)]
    pub product_image: String,
    /// Selected color.
    #[serde(default)]
    pub color: String,
    /// Selected storage size.
    #[serde(default)]
    pub size: String,
    /// Quantity of this line.
    pub quantity: u32,
    /// Line total as computed by the backend.
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
}

/// The current user's cart, as returned by `GET /api/cart/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    /// Cart ID.
    pub id: CartId,
    /// Owning user.
    pub user: UserId,
    /// Line items.
    pub items: Vec<CartItem>,
    /// Sum of the line totals, computed by the backend.
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Quantity adjustment actions accepted by `PATCH /api/cart-item/{id}/`.
///
/// Removal is a separate `DELETE`; it is not an action variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartItemAction {
    Increment,
    Decrement,
}

/// Payload for adding a line to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartItem {
    /// Product to add.
    pub product: ProductId,
    /// Quantity to add.
    pub quantity: u32,
    /// Selected color.
    #[serde(default)]
    pub color: String,
    /// Selected storage size.
    #[serde(default)]
    pub size: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_item_action_wire_format() {
        assert_eq!(
            serde_json::to_string(&CartItemAction::Increment).unwrap(),
            "\"increment\""
        );
        assert_eq!(
            serde_json::to_string(&CartItemAction::Decrement).unwrap(),
            "\"decrement\""
        );
    }

    #[test]
    fn test_cart_deserializes_backend_shape() {
        let json = r#"{
            "id": 10,
            "user": 4,
            "items": [{
                "id": 100,
                "product_id": 1,
                "product_name": "iPhone 15",
                "product_image": "",
                "color": "black",
                "size": "256gb",
                "quantity": 2,
                "total_price": "1998.00"
            }],
            "total_price": "1998.00",
            "created_at": "2025-03-01T10:00:00Z",
            "updated_at": "2025-03-01T10:05:00Z"
        }"#;

        let cart: Cart = serde_json::from_str(json).unwrap();
        assert!(!cart.is_empty());
        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(cart.total_price, cart.items[0].total_price);
    }
}
