//! Order wire types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cart::CartItem;
use super::id::{OrderId, ProductId, UserId};

/// Fulfillment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

/// A placed order, as returned by `GET /api/orders/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order ID.
    pub id: OrderId,
    /// Owning user.
    pub user: UserId,
    /// Flattened billing address string.
    pub billing_address: String,
    /// Flattened shipping address string.
    pub shipping_address: String,
    /// Payment method chosen at checkout (e.g., "card").
    pub payment_method: String,
    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
    /// Current fulfillment status.
    pub status: OrderStatus,
    /// Order subtotal as computed by the backend.
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
    /// Line items captured from the cart at placement time.
    pub items: Vec<CartItem>,
}

/// One line of an order payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemPayload {
    /// Product being ordered.
    pub product: ProductId,
    /// Quantity.
    pub quantity: u32,
    /// Selected color.
    #[serde(default)]
    pub color: String,
    /// Selected storage size.
    #[serde(default)]
    pub size: String,
}

/// Payload for `POST /api/orders/`.
///
/// Card data is already masked by the checkout layer before it reaches this
/// type; the full PAN and CVV never enter an order payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPayload {
    /// Ordering user.
    pub user: UserId,
    /// Lines copied from the authoritative cart snapshot.
    pub items: Vec<OrderItemPayload>,
    /// Payment method (e.g., "card").
    pub payment_method: String,
    /// Flattened shipping address.
    pub shipping_address: String,
    /// Flattened billing address.
    pub billing_address: String,
    /// Masked card reference, when paying by card.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<MaskedCard>,
}

/// Masked card reference included in an order payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskedCard {
    /// Card number masked to the last four digits.
    pub card_number: String,
    /// Expiry as entered (MM/YY).
    pub expiry: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Shipped).unwrap(),
            "\"shipped\""
        );
        let parsed: OrderStatus = serde_json::from_str("\"delivered\"").unwrap();
        assert_eq!(parsed, OrderStatus::Delivered);
    }

    #[test]
    fn test_order_payload_skips_missing_card() {
        let payload = OrderPayload {
            user: UserId::new(1),
            items: vec![],
            payment_method: "paypal".to_owned(),
            shipping_address: "1 Main St, Springfield".to_owned(),
            billing_address: "1 Main St, Springfield".to_owned(),
            card: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("card").is_none());
    }
}
