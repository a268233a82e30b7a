//! Integration test harness for the SuperLian storefront client.
//!
//! Provides a scripted [`MockTransport`] standing in for the commerce
//! backend, fixture builders for wire-shaped domain values, and a
//! [`TestStore`] bundling a [`Storefront`] with its transport and storage so
//! tests can observe every side of an operation.
//!
//! # Example
//!
//! ```rust,ignore
//! let ctx = TestStore::new();
//! ctx.transport.respond(EndpointId::GetCart, to_value(&cart));
//! let fetched = ctx.store.load_cart().await.unwrap();
//! assert_eq!(ctx.transport.calls(EndpointId::GetCart), 1);
//! ```

#![allow(clippy::unwrap_used)] // test support crate

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use superlian_client::{ApiError, ApiRequest, EndpointId, MemoryStorage, Storefront, Transport};
use superlian_core::{
    Cart, CartId, CartItem, CartItemId, Category, CategoryId, LoginResponse, Order, OrderId,
    OrderStatus, Product, ProductId, ProfileId, User, UserId, UserProfile,
};

/// One recorded request.
#[derive(Debug, Clone)]
pub struct Call {
    /// Endpoint targeted.
    pub endpoint: EndpointId,
    /// Path as it would appear on the wire.
    pub path: String,
    /// Access token attached, if any.
    pub token: Option<String>,
    /// Serialized body, if any.
    pub body: Option<Value>,
}

/// Scripted transport: sticky responses per endpoint, one-shot overrides,
/// and a full call log.
#[derive(Default)]
pub struct MockTransport {
    sticky: Mutex<HashMap<EndpointId, Result<Value, ApiError>>>,
    once: Mutex<HashMap<EndpointId, VecDeque<Result<Value, ApiError>>>>,
    log: Mutex<Vec<Call>>,
}

impl MockTransport {
    /// Create a transport with no scripted responses (everything answers
    /// JSON `null`).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every future call to `endpoint` with `value`.
    pub fn respond(&self, endpoint: EndpointId, value: Value) {
        self.sticky.lock().unwrap().insert(endpoint, Ok(value));
    }

    /// Answer every future call to `endpoint` with `err`.
    pub fn fail(&self, endpoint: EndpointId, err: ApiError) {
        self.sticky.lock().unwrap().insert(endpoint, Err(err));
    }

    /// Answer the next call to `endpoint` with `value`, then fall back.
    pub fn respond_once(&self, endpoint: EndpointId, value: Value) {
        self.once
            .lock()
            .unwrap()
            .entry(endpoint)
            .or_default()
            .push_back(Ok(value));
    }

    /// Fail the next call to `endpoint`, then fall back.
    pub fn fail_once(&self, endpoint: EndpointId, err: ApiError) {
        self.once
            .lock()
            .unwrap()
            .entry(endpoint)
            .or_default()
            .push_back(Err(err));
    }

    /// Number of calls made to `endpoint`.
    #[must_use]
    pub fn calls(&self, endpoint: EndpointId) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.endpoint == endpoint)
            .count()
    }

    /// The most recent call to `endpoint`.
    #[must_use]
    pub fn last_call(&self, endpoint: EndpointId) -> Option<Call> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|call| call.endpoint == endpoint)
            .cloned()
    }

    /// Every recorded call, in order.
    #[must_use]
    pub fn call_log(&self) -> Vec<Call> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        req: &ApiRequest,
        access_token: Option<&str>,
    ) -> Result<Value, ApiError> {
        let endpoint = req.endpoint();
        self.log.lock().unwrap().push(Call {
            endpoint,
            path: req.path(),
            token: access_token.map(ToOwned::to_owned),
            body: req.body().expect("fixture payloads serialize"),
        });

        if let Some(queued) = self
            .once
            .lock()
            .unwrap()
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front)
        {
            return queued;
        }

        self.sticky
            .lock()
            .unwrap()
            .get(&endpoint)
            .cloned()
            .unwrap_or(Ok(Value::Null))
    }
}

/// A storefront wired to a mock transport and in-memory storage.
pub struct TestStore {
    pub store: Storefront,
    pub transport: Arc<MockTransport>,
    pub storage: Arc<MemoryStorage>,
}

impl TestStore {
    /// Fresh client, empty storage.
    #[must_use]
    pub fn new() -> Self {
        let transport = Arc::new(MockTransport::new());
        let storage = Arc::new(MemoryStorage::new());
        let store = Storefront::with_transport(
            Arc::clone(&transport) as Arc<dyn Transport>,
            Arc::clone(&storage) as Arc<dyn superlian_client::StoragePort>,
        );
        Self {
            store,
            transport,
            storage,
        }
    }

    /// A second client over the same storage (simulates a reload).
    #[must_use]
    pub fn reload(&self) -> Storefront {
        Storefront::with_transport(
            Arc::clone(&self.transport) as Arc<dyn Transport>,
            Arc::clone(&self.storage) as Arc<dyn superlian_client::StoragePort>,
        )
    }

    /// Script a login response and sign in as `user`.
    pub async fn sign_in(&self, user: &User) {
        self.transport.respond(
            EndpointId::Login,
            to_value(&login_response(user, &format!("access-{}", user.id))),
        );
        self.store
            .login(&user.email, "password1")
            .await
            .expect("scripted login succeeds");
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Fixed timestamp used by every fixture.
#[must_use]
pub fn fixture_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
}

/// Serialize a wire type to the JSON the backend would send.
#[must_use]
pub fn to_value<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap()
}

/// Parse a decimal literal.
#[must_use]
pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// A user.
#[must_use]
pub fn user(id: i32, username: &str) -> User {
    User {
        id: UserId::new(id),
        email: format!("{username}@example.com"),
        username: username.to_owned(),
    }
}

/// A login response for `user`.
#[must_use]
pub fn login_response(user: &User, access: &str) -> LoginResponse {
    LoginResponse {
        access: access.to_owned(),
        refresh: format!("refresh-{access}"),
        user: user.clone(),
    }
}

/// A profile with saved addresses.
#[must_use]
pub fn profile(user_id: i32) -> UserProfile {
    UserProfile {
        id: ProfileId::new(user_id),
        user: UserId::new(user_id),
        first_name: "Ada".to_owned(),
        last_name: "Li".to_owned(),
        phone_number: "0000000000".to_owned(),
        billing_address: "1 Main St, Springfield, IL, 62704, USA".to_owned(),
        shipping_address: "2 Oak Ave, Springfield, IL, 62704, USA".to_owned(),
    }
}

/// A product with no variant options.
#[must_use]
pub fn product(id: i32, name: &str, brand: &str, category: &str, price: &str) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        brand: brand.to_owned(),
        category: category.to_owned(),
        description: String::new(),
        image: String::new(),
        price: dec(price),
        stock: 10,
        colors: vec![],
        storage: vec![],
        created_at: fixture_time(),
        updated_at: fixture_time(),
    }
}

/// A cart line.
#[must_use]
pub fn cart_item(id: i32, product_id: i32, name: &str, quantity: u32, total: &str) -> CartItem {
    CartItem {
        id: CartItemId::new(id),
        product_id: ProductId::new(product_id),
        product_name: name.to_owned(),
        product_image: String::new(),
        color: "black".to_owned(),
        size: "256gb".to_owned(),
        quantity,
        total_price: dec(total),
    }
}

/// A cart owned by `user_id` whose `total_price` is the sum of its items.
#[must_use]
pub fn cart(user_id: i32, items: Vec<CartItem>) -> Cart {
    let total = items.iter().map(|item| item.total_price).sum();
    Cart {
        id: CartId::new(user_id),
        user: UserId::new(user_id),
        items,
        total_price: total,
        created_at: fixture_time(),
        updated_at: fixture_time(),
    }
}

/// An order owned by `user_id`.
#[must_use]
pub fn order(id: i32, user_id: i32, items: Vec<CartItem>) -> Order {
    let total = items.iter().map(|item| item.total_price).sum();
    Order {
        id: OrderId::new(id),
        user: UserId::new(user_id),
        billing_address: "1 Main St, Springfield, IL, 62704, USA".to_owned(),
        shipping_address: "2 Oak Ave, Springfield, IL, 62704, USA".to_owned(),
        payment_method: "card".to_owned(),
        placed_at: fixture_time(),
        status: OrderStatus::Pending,
        total_price: total,
        items,
    }
}

/// A category.
#[must_use]
pub fn category(id: i32, name: &str) -> Category {
    Category {
        id: CategoryId::new(id),
        name: name.to_owned(),
        description: String::new(),
        image: String::new(),
    }
}
