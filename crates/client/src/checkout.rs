//! Checkout: display totals and order assembly.
//!
//! The cart subtotal is server-authoritative; shipping and tax are
//! display-only figures recomputed from that subtotal every time. They are
//! never persisted, so changing the rate or threshold constants cannot
//! desynchronize stored data.

use rust_decimal::Decimal;

use superlian_core::{Cart, MaskedCard, OrderItemPayload, OrderPayload, User, UserProfile};

use crate::error::ApiError;
use crate::validate::sanitize_text;

/// Sales tax rate applied to the subtotal (8%).
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Orders strictly above this subtotal ship free ($1000).
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Flat shipping fee below the threshold ($5.00).
pub const STANDARD_SHIPPING: Decimal = Decimal::from_parts(500, 0, 0, false, 2);

/// Minimum length of a flattened address string.
pub const ADDRESS_MIN_LENGTH: usize = 5;

/// Display totals derived from the authoritative subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    /// The cart's server-computed subtotal.
    pub subtotal: Decimal,
    /// Derived shipping fee.
    pub shipping: Decimal,
    /// Derived tax.
    pub tax: Decimal,
    /// `subtotal + shipping + tax`.
    pub total: Decimal,
}

impl OrderTotals {
    /// Compute display totals for a subtotal.
    ///
    /// Shipping is zero for an empty cart (nothing to ship) and above the
    /// free-shipping threshold; otherwise the flat fee applies.
    #[must_use]
    pub fn from_subtotal(subtotal: Decimal) -> Self {
        let shipping = if subtotal.is_zero() || subtotal > FREE_SHIPPING_THRESHOLD {
            Decimal::ZERO
        } else {
            STANDARD_SHIPPING
        };
        let tax = (subtotal * TAX_RATE).round_dp(2);
        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }

    /// Compute display totals for a cart snapshot.
    #[must_use]
    pub fn for_cart(cart: Option<&Cart>) -> Self {
        Self::from_subtotal(cart.map_or(Decimal::ZERO, |c| c.total_price))
    }
}

/// Payment methods offered at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    #[default]
    Card,
    Paypal,
}

impl PaymentMethod {
    /// Wire value for the order payload.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Paypal => "paypal",
        }
    }
}

/// A newly entered address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressForm {
    pub full_name: String,
    pub address_line1: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl AddressForm {
    /// Flatten to the single comma-joined string the backend stores.
    #[must_use]
    pub fn flatten(&self) -> String {
        [
            &self.full_name,
            &self.address_line1,
            &self.city,
            &self.state,
            &self.postal_code,
            &self.country,
        ]
        .iter()
        .map(|field| sanitize_text(field))
        .filter(|field| !field.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }

    fn validate(&self) -> Result<String, ApiError> {
        if sanitize_text(&self.address_line1).is_empty() {
            return Err(ApiError::Validation(
                "Address line is required.".to_owned(),
            ));
        }
        let flattened = self.flatten();
        if flattened.chars().count() < ADDRESS_MIN_LENGTH {
            return Err(ApiError::Validation(format!(
                "Address must be at least {ADDRESS_MIN_LENGTH} characters."
            )));
        }
        Ok(flattened)
    }
}

/// Use the profile's saved address or a newly entered one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressChoice {
    /// The address saved on the user's profile.
    Saved,
    /// A new address entered at checkout.
    New(AddressForm),
}

impl AddressChoice {
    /// Resolve to the flattened address string for the payload.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] if `Saved` was chosen with no saved
    /// address available, or if a new address fails validation.
    pub fn resolve(&self, saved: Option<&str>) -> Result<String, ApiError> {
        match self {
            Self::Saved => saved
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned)
                .ok_or_else(|| {
                    ApiError::Validation(
                        "No saved address on your profile. Please enter one.".to_owned(),
                    )
                }),
            Self::New(form) => form.validate(),
        }
    }
}

/// Card details as entered; masked before they enter a payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardDetails {
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
}

impl CardDetails {
    /// Validate and mask to the last four digits.
    ///
    /// The CVV is checked but never leaves this type.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a malformed number, expiry, or
    /// CVV.
    pub fn masked(&self) -> Result<MaskedCard, ApiError> {
        let digits: String = self
            .card_number
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        if !(12..=19).contains(&digits.chars().count()) {
            return Err(ApiError::Validation(
                "Please enter a valid card number.".to_owned(),
            ));
        }

        let expiry = self.expiry.trim();
        let valid_expiry = expiry.len() == 5
            && expiry.as_bytes().get(2) == Some(&b'/')
            && expiry
                .chars()
                .enumerate()
                .all(|(i, c)| i == 2 || c.is_ascii_digit());
        if !valid_expiry {
            return Err(ApiError::Validation(
                "Card expiry must be in MM/YY format.".to_owned(),
            ));
        }

        let cvv_len = self.cvv.chars().count();
        if !(3..=4).contains(&cvv_len) || !self.cvv.chars().all(|c| c.is_ascii_digit()) {
            return Err(ApiError::Validation(
                "Please enter a valid security code.".to_owned(),
            ));
        }

        let last_four: String = digits.chars().skip(digits.chars().count() - 4).collect();
        Ok(MaskedCard {
            card_number: format!("**** **** **** {last_four}"),
            expiry: expiry.to_owned(),
        })
    }
}

/// Everything the shopper entered at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutForm {
    /// Shipping address choice.
    pub shipping: AddressChoice,
    /// Billing address choice.
    pub billing: AddressChoice,
    /// Payment method.
    pub payment_method: PaymentMethod,
    /// Card details when paying by card.
    pub card: Option<CardDetails>,
}

impl Default for CheckoutForm {
    fn default() -> Self {
        Self {
            shipping: AddressChoice::Saved,
            billing: AddressChoice::Saved,
            payment_method: PaymentMethod::Card,
            card: None,
        }
    }
}

impl CheckoutForm {
    /// Assemble the order payload from the form and the authoritative cart
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for an empty cart, unresolved
    /// addresses, or missing/malformed card details.
    pub fn build_payload(
        &self,
        user: &User,
        profile: Option<&UserProfile>,
        cart: &Cart,
    ) -> Result<OrderPayload, ApiError> {
        if cart.is_empty() {
            return Err(ApiError::Validation("Your cart is empty.".to_owned()));
        }

        let shipping_address = self
            .shipping
            .resolve(profile.map(|p| p.shipping_address.as_str()))?;
        let billing_address = self
            .billing
            .resolve(profile.map(|p| p.billing_address.as_str()))?;

        let card = match (self.payment_method, &self.card) {
            (PaymentMethod::Card, Some(details)) => Some(details.masked()?),
            (PaymentMethod::Card, None) => {
                return Err(ApiError::Validation(
                    "Card details are required to pay by card.".to_owned(),
                ));
            }
            _ => None,
        };

        Ok(OrderPayload {
            user: user.id,
            items: cart
                .items
                .iter()
                .map(|item| OrderItemPayload {
                    product: item.product_id,
                    quantity: item.quantity,
                    color: item.color.clone(),
                    size: item.size.clone(),
                })
                .collect(),
            payment_method: self.payment_method.as_str().to_owned(),
            shipping_address,
            billing_address,
            card,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use superlian_core::{CartId, CartItem, CartItemId, ProductId, ProfileId, UserId};

    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn cart_with_subtotal(subtotal: &str) -> Cart {
        Cart {
            id: CartId::new(1),
            user: UserId::new(1),
            items: vec![CartItem {
                id: CartItemId::new(1),
                product_id: ProductId::new(1),
                product_name: "iPhone 15".to_owned(),
                product_image: String::new(),
                color: "black".to_owned(),
                size: "256gb".to_owned(),
                quantity: 1,
                total_price: dec(subtotal),
            }],
            total_price: dec(subtotal),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn user() -> User {
        User {
            id: UserId::new(1),
            email: "a@b.c".to_owned(),
            username: "ab".to_owned(),
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            id: ProfileId::new(1),
            user: UserId::new(1),
            first_name: "Ada".to_owned(),
            last_name: "Li".to_owned(),
            phone_number: "0000000000".to_owned(),
            billing_address: "1 Main St, Springfield".to_owned(),
            shipping_address: "2 Oak Ave, Springfield".to_owned(),
        }
    }

    fn card() -> CardDetails {
        CardDetails {
            card_number: "4242 4242 4242 4242".to_owned(),
            expiry: "02/27".to_owned(),
            cvv: "123".to_owned(),
        }
    }

    #[test]
    fn test_totals_above_free_shipping_threshold() {
        let totals = OrderTotals::from_subtotal(dec("1200"));
        assert_eq!(totals.shipping, Decimal::ZERO);
        assert_eq!(totals.tax, dec("96.00"));
        assert_eq!(totals.total, dec("1296.00"));
    }

    #[test]
    fn test_totals_below_threshold_pay_flat_shipping() {
        let totals = OrderTotals::from_subtotal(dec("100"));
        assert_eq!(totals.shipping, dec("5.00"));
        assert_eq!(totals.tax, dec("8.00"));
        assert_eq!(totals.total, dec("113.00"));
    }

    #[test]
    fn test_totals_at_threshold_still_pay_shipping() {
        // Free shipping is strictly above the threshold
        let totals = OrderTotals::from_subtotal(dec("1000"));
        assert_eq!(totals.shipping, dec("5.00"));
    }

    #[test]
    fn test_empty_cart_totals_are_all_zero() {
        let totals = OrderTotals::for_cart(None);
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.shipping, Decimal::ZERO);
        assert_eq!(totals.tax, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn test_tax_rounds_to_cents() {
        let totals = OrderTotals::from_subtotal(dec("19.99"));
        assert_eq!(totals.tax, dec("1.60"));
    }

    #[test]
    fn test_card_masking_keeps_last_four_only() {
        let masked = card().masked().unwrap();
        assert_eq!(masked.card_number, "**** **** **** 4242");
        assert_eq!(masked.expiry, "02/27");
    }

    #[test]
    fn test_card_validation_rejects_bad_input() {
        let mut bad = card();
        bad.card_number = "1234".to_owned();
        assert!(bad.masked().unwrap_err().is_validation_error());

        let mut bad = card();
        bad.expiry = "2027-02".to_owned();
        assert!(bad.masked().unwrap_err().is_validation_error());

        let mut bad = card();
        bad.cvv = "12a".to_owned();
        assert!(bad.masked().unwrap_err().is_validation_error());
    }

    #[test]
    fn test_saved_address_requires_profile_value() {
        assert!(AddressChoice::Saved.resolve(None).unwrap_err().is_validation_error());
        assert!(AddressChoice::Saved.resolve(Some("  ")).unwrap_err().is_validation_error());
        assert_eq!(
            AddressChoice::Saved.resolve(Some("1 Main St")).unwrap(),
            "1 Main St"
        );
    }

    #[test]
    fn test_new_address_flattens_comma_joined() {
        let form = AddressForm {
            full_name: "Ada Li".to_owned(),
            address_line1: "2 Oak Ave".to_owned(),
            city: "Springfield".to_owned(),
            state: "IL".to_owned(),
            postal_code: "62704".to_owned(),
            country: "USA".to_owned(),
        };
        assert_eq!(
            AddressChoice::New(form).resolve(None).unwrap(),
            "Ada Li, 2 Oak Ave, Springfield, IL, 62704, USA"
        );
    }

    #[test]
    fn test_payload_uses_cart_snapshot_and_masks_card() {
        let form = CheckoutForm {
            card: Some(card()),
            ..CheckoutForm::default()
        };
        let payload = form
            .build_payload(&user(), Some(&profile()), &cart_with_subtotal("999.00"))
            .unwrap();

        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.items[0].product, ProductId::new(1));
        assert_eq!(payload.shipping_address, "2 Oak Ave, Springfield");
        assert_eq!(payload.billing_address, "1 Main St, Springfield");
        assert_eq!(payload.card.as_ref().unwrap().card_number, "**** **** **** 4242");
        assert_eq!(payload.payment_method, "card");
    }

    #[test]
    fn test_payload_rejects_empty_cart() {
        let mut cart = cart_with_subtotal("0.00");
        cart.items.clear();
        let form = CheckoutForm {
            card: Some(card()),
            ..CheckoutForm::default()
        };
        let err = form
            .build_payload(&user(), Some(&profile()), &cart)
            .unwrap_err();
        assert_eq!(err.user_message(), "Your cart is empty.");
    }

    #[test]
    fn test_card_payment_requires_card_details() {
        let form = CheckoutForm::default();
        let err = form
            .build_payload(&user(), Some(&profile()), &cart_with_subtotal("10.00"))
            .unwrap_err();
        assert!(err.is_validation_error());
    }
}
