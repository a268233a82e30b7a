//! The storefront facade.
//!
//! [`Storefront`] wires the remote cache, the three stores, and the
//! notification queue together, and owns the two coordination rules with
//! real teeth:
//!
//! - **Session boundary**: login, registration, logout, and a 401 received
//!   mid-session all reset session store, catalog store, wishlist, and the
//!   entire cache, in that order, before any new session data is written.
//!   No response cached for one user is ever servable to another.
//! - **Server-authoritative cart**: every cart mutation round-trips through
//!   the backend and only the refetched cart snapshot is written locally.
//!   A failed mutation leaves the previous snapshot untouched.

use std::sync::Arc;

use superlian_core::{
    Cart, CartItemAction, CartItemId, Category, CategoryId, NewCartItem, Order, OrderId, Product,
    ProductId, ProfilePayload, User, UserProfile,
};

use crate::api::{ApiData, ApiRequest, HttpTransport, QueryCache, Subscription, Transport};
use crate::checkout::CheckoutForm;
use crate::config::StoreConfig;
use crate::error::ApiError;
use crate::notify::{Notice, Notifier};
use crate::store::{CatalogStore, SessionStore, StoragePort, WishlistStore};
use crate::validate;

/// The storefront client.
///
/// Cheaply cloneable via `Arc`; all state lives in the shared inner value.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    cache: QueryCache,
    session: SessionStore,
    catalog: CatalogStore,
    wishlist: WishlistStore,
    notifier: Notifier,
}

impl Storefront {
    /// Create a client over the real HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &StoreConfig, storage: Arc<dyn StoragePort>) -> Result<Self, ApiError> {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(config)?);
        Ok(Self::with_transport(transport, storage))
    }

    /// Create a client over an arbitrary transport (tests use a scripted one).
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>, storage: Arc<dyn StoragePort>) -> Self {
        Self {
            inner: Arc::new(StorefrontInner {
                cache: QueryCache::new(transport),
                session: SessionStore::new(Arc::clone(&storage)),
                catalog: CatalogStore::new(Arc::clone(&storage)),
                wishlist: WishlistStore::new(storage),
                notifier: Notifier::new(),
            }),
        }
    }

    // =========================================================================
    // Component access
    // =========================================================================

    /// The session store.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// The catalog store.
    #[must_use]
    pub fn catalog(&self) -> &CatalogStore {
        &self.inner.catalog
    }

    /// The wishlist store.
    #[must_use]
    pub fn wishlist(&self) -> &WishlistStore {
        &self.inner.wishlist
    }

    /// The remote cache.
    #[must_use]
    pub fn cache(&self) -> &QueryCache {
        &self.inner.cache
    }

    /// Drain pending user-facing notices.
    #[must_use]
    pub fn take_notices(&self) -> Vec<Notice> {
        self.inner.notifier.drain()
    }

    // =========================================================================
    // Session boundary
    // =========================================================================

    /// Log in, atomically replacing any previous session.
    ///
    /// The three-part reset (session, catalog+wishlist, cache) runs *before*
    /// the new tokens are written, so a stale cached cart from a previous
    /// session is never briefly visible to the new user.
    ///
    /// # Errors
    ///
    /// Validation failures never reach the network; backend rejections come
    /// back as `Http` errors. On any failure the current session is left
    /// untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let credentials = validate::login_credentials(email, password)?;
        let data = self
            .mutate(ApiRequest::Login(credentials))
            .await
            .inspect_err(|e| self.notify_failure("Login failed. ", e))?;
        let ApiData::Session(session) = data else {
            return Err(shape_error("session", &data));
        };

        self.boundary_reset();
        self.inner
            .session
            .set_tokens(Some(session.access), Some(session.refresh));
        self.inner.session.set_user(session.user.clone());
        tracing::info!(user = %session.user.id, "signed in");
        Ok(session.user)
    }

    /// Register a new account.
    ///
    /// Runs the same session boundary as login so nothing from a previous
    /// session leaks into the fresh account; the backend does not issue
    /// tokens on registration, so the caller signs in afterwards.
    ///
    /// # Errors
    ///
    /// Validation failures never reach the network; backend rejections come
    /// back as `Http` errors.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<User, ApiError> {
        let registration = validate::registration(email, username, password)?;
        let data = self
            .mutate(ApiRequest::Register(registration))
            .await
            .inspect_err(|e| self.notify_failure("Registration failed. ", e))?;
        let ApiData::User(user) = data else {
            return Err(shape_error("user", &data));
        };

        self.boundary_reset();
        tracing::info!(user = %user.id, "registered");
        Ok(user)
    }

    /// Log out: the only legal way to end a session.
    pub fn logout(&self) {
        self.boundary_reset();
        tracing::info!("signed out");
    }

    /// Reset every stateful component, in dependency order: session first,
    /// then the mirrored stores, then the cache - the cache must be empty
    /// before anything re-subscribes under a new session.
    fn boundary_reset(&self) {
        self.inner.session.reset();
        self.inner.catalog.reset();
        self.inner.wishlist.clear();
        self.inner.cache.reset();
    }

    /// Forced logout on a 401 while a session is believed active. Never a
    /// silent retry.
    fn handle_auth_failure(&self, err: &ApiError) {
        if matches!(err, ApiError::Http { status: 401 }) && self.inner.session.is_authenticated() {
            tracing::warn!("session rejected by backend, forcing logout");
            self.boundary_reset();
            self.inner
                .notifier
                .error("Your session has expired. Please log in again.");
        }
    }

    // =========================================================================
    // User and profile
    // =========================================================================

    /// Fetch the authenticated user and store it in the session.
    ///
    /// # Errors
    ///
    /// Propagates API failures; a 401 forces logout.
    pub async fn fetch_current_user(&self) -> Result<User, ApiError> {
        let data = self.query(ApiRequest::GetCurrentUser).await?;
        let ApiData::User(user) = data else {
            return Err(shape_error("user", &data));
        };
        self.inner.session.set_user(user.clone());
        Ok(user)
    }

    /// Fetch the user's profile and store it in the session.
    ///
    /// # Errors
    ///
    /// Propagates API failures; a 401 forces logout.
    pub async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
        let data = self.query(ApiRequest::GetUserProfile).await?;
        let ApiData::Profile(profile) = data else {
            return Err(shape_error("profile", &data));
        };
        self.inner.session.set_profile(profile.clone());
        Ok(profile)
    }

    /// Update the user's profile and store the backend's version.
    ///
    /// # Errors
    ///
    /// Propagates API failures. The stored profile is only replaced by the
    /// backend's response, never by the submitted payload.
    pub async fn update_profile(&self, data: ProfilePayload) -> Result<UserProfile, ApiError> {
        let current = match self.inner.session.profile() {
            Some(profile) => profile,
            None => self.fetch_profile().await?,
        };
        let data = sanitize_profile(data);
        let response = self
            .mutate(ApiRequest::PatchUserProfile {
                id: current.id,
                data,
            })
            .await
            .inspect_err(|e| self.notify_failure("Failed to update profile. ", e))?;
        let ApiData::Profile(profile) = response else {
            return Err(shape_error("profile", &response));
        };
        self.inner.session.set_profile(profile.clone());
        Ok(profile)
    }

    /// Create the user's profile (first checkout) and store it.
    ///
    /// # Errors
    ///
    /// Propagates API failures.
    pub async fn create_profile(&self, data: ProfilePayload) -> Result<UserProfile, ApiError> {
        let data = sanitize_profile(data);
        let response = self
            .mutate(ApiRequest::CreateUserProfile(data))
            .await
            .inspect_err(|e| self.notify_failure("Failed to update profile. ", e))?;
        let ApiData::Profile(profile) = response else {
            return Err(shape_error("profile", &response));
        };
        self.inner.session.set_profile(profile.clone());
        Ok(profile)
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetch all categories.
    ///
    /// # Errors
    ///
    /// Propagates API failures.
    pub async fn load_categories(&self) -> Result<Vec<Category>, ApiError> {
        let data = self.query(ApiRequest::GetCategories).await?;
        let ApiData::Categories(categories) = data else {
            return Err(shape_error("categories", &data));
        };
        Ok(categories)
    }

    /// Fetch one category.
    ///
    /// # Errors
    ///
    /// Propagates API failures.
    pub async fn fetch_category(&self, id: CategoryId) -> Result<Category, ApiError> {
        let data = self.query(ApiRequest::GetCategory { id }).await?;
        let ApiData::Category(category) = data else {
            return Err(shape_error("category", &data));
        };
        Ok(category)
    }

    /// Fetch the product list and mirror it into the catalog store.
    ///
    /// # Errors
    ///
    /// Propagates API failures; the previous product snapshot stays in place
    /// on failure.
    pub async fn load_products(&self) -> Result<Vec<Product>, ApiError> {
        let data = self
            .query(ApiRequest::GetProducts)
            .await
            .inspect_err(|e| self.notify_failure("Failed to load products. ", e))?;
        let ApiData::Products(products) = data else {
            return Err(shape_error("products", &data));
        };
        self.inner.catalog.set_products(products.clone());
        Ok(products)
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Propagates API failures.
    pub async fn fetch_product(&self, id: ProductId) -> Result<Product, ApiError> {
        let data = self.query(ApiRequest::GetProduct { id }).await?;
        let ApiData::Product(product) = data else {
            return Err(shape_error("product", &data));
        };
        Ok(product)
    }

    // =========================================================================
    // Cart (server-authoritative)
    // =========================================================================

    /// Fetch the cart and mirror it into the catalog store.
    ///
    /// # Errors
    ///
    /// Propagates API failures; the previous cart snapshot stays in place on
    /// failure.
    pub async fn load_cart(&self) -> Result<Cart, ApiError> {
        let data = self.query(ApiRequest::GetCart).await?;
        let ApiData::Cart(cart) = data else {
            return Err(shape_error("cart", &data));
        };
        self.inner.catalog.set_cart(cart.clone());
        Ok(cart)
    }

    /// Add a product to the cart, then refetch the authoritative snapshot.
    ///
    /// # Errors
    ///
    /// On failure the displayed cart is unchanged and an error notice is
    /// queued.
    pub async fn add_to_cart(&self, item: NewCartItem) -> Result<Cart, ApiError> {
        self.mutate(ApiRequest::AddToCart(item))
            .await
            .inspect_err(|e| self.notify_failure("Failed to add item to cart. ", e))?;
        self.load_cart().await
    }

    /// Add a line through the cart-item endpoint, then refetch.
    ///
    /// # Errors
    ///
    /// Same failure behavior as [`Storefront::add_to_cart`].
    pub async fn create_cart_item(&self, item: NewCartItem) -> Result<Cart, ApiError> {
        self.mutate(ApiRequest::CreateCartItem(item))
            .await
            .inspect_err(|e| self.notify_failure("Failed to add item to cart. ", e))?;
        self.load_cart().await
    }

    /// Increment or decrement a line's quantity, then refetch.
    ///
    /// The client never adjusts the quantity locally - callers should
    /// serialize mutations per line (the UI disables the buttons while one
    /// is outstanding).
    ///
    /// # Errors
    ///
    /// On failure the displayed cart is unchanged and an error notice is
    /// queued.
    pub async fn update_cart_item(
        &self,
        id: CartItemId,
        action: CartItemAction,
    ) -> Result<Cart, ApiError> {
        self.mutate(ApiRequest::UpdateCartItem { id, action })
            .await
            .inspect_err(|e| self.notify_failure("Failed to update cart. ", e))?;
        self.load_cart().await
    }

    /// Remove a line from the cart, then refetch.
    ///
    /// # Errors
    ///
    /// On failure the displayed cart is unchanged and an error notice is
    /// queued.
    pub async fn remove_cart_item(&self, id: CartItemId) -> Result<Cart, ApiError> {
        self.mutate(ApiRequest::DeleteCartItem { id })
            .await
            .inspect_err(|e| self.notify_failure("Failed to remove item from cart. ", e))?;
        self.load_cart().await
    }

    /// Clear the cart on the backend and drop the local snapshot.
    ///
    /// # Errors
    ///
    /// On failure the displayed cart is unchanged and an error notice is
    /// queued.
    pub async fn clear_cart(&self) -> Result<(), ApiError> {
        self.mutate(ApiRequest::ClearCart)
            .await
            .inspect_err(|e| self.notify_failure("Failed to update cart. ", e))?;
        self.inner.catalog.clear_cart();
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Fetch the order history and mirror it into the catalog store.
    ///
    /// # Errors
    ///
    /// Propagates API failures; the previous snapshot stays in place.
    pub async fn load_orders(&self) -> Result<Vec<Order>, ApiError> {
        let data = self
            .query(ApiRequest::GetOrders)
            .await
            .inspect_err(|e| self.notify_failure("Failed to load orders. ", e))?;
        let ApiData::Orders(orders) = data else {
            return Err(shape_error("orders", &data));
        };
        self.inner.catalog.set_orders(orders.clone());
        Ok(orders)
    }

    /// Fetch one order.
    ///
    /// # Errors
    ///
    /// Propagates API failures.
    pub async fn fetch_order(&self, id: OrderId) -> Result<Order, ApiError> {
        let data = self.query(ApiRequest::GetOrder { id }).await?;
        let ApiData::Order(order) = data else {
            return Err(shape_error("order", &data));
        };
        Ok(order)
    }

    /// Place an order assembled from the checkout form and the authoritative
    /// cart snapshot.
    ///
    /// On success the cart is cleared (backend and store) and the order list
    /// is invalidated. On failure the cart is untouched and the caller stays
    /// where it is.
    ///
    /// # Errors
    ///
    /// Validation failures never reach the network; backend failures queue a
    /// "Failed to place order." notice.
    pub async fn place_order(&self, form: &CheckoutForm) -> Result<Order, ApiError> {
        let user = self.inner.session.user().ok_or_else(|| {
            ApiError::Validation("You must be signed in to check out.".to_owned())
        })?;
        let profile = self.inner.session.profile();
        let cart = self
            .inner
            .catalog
            .cart()
            .ok_or_else(|| ApiError::Validation("Your cart is empty.".to_owned()))?;

        let payload = form.build_payload(&user, profile.as_ref(), &cart)?;

        let data = self
            .mutate(ApiRequest::CreateOrder(payload))
            .await
            .inspect_err(|e| self.notify_failure("Failed to place order. ", e))?;
        let ApiData::Order(order) = data else {
            return Err(shape_error("order", &data));
        };

        // The order owns the items now; clear the cart everywhere. A failed
        // remote clear degrades to a stale backend cart, not a failed order.
        if let Err(e) = self.mutate(ApiRequest::ClearCart).await {
            tracing::warn!(error = %e, "cart clear after checkout failed");
        }
        self.inner.catalog.clear_cart();

        self.inner.notifier.success("Order placed successfully!");
        tracing::info!(order = %order.id, "order placed");
        Ok(order)
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Keep the cart entry eagerly refreshed while the guard lives.
    #[must_use]
    pub fn watch_cart(&self) -> Subscription {
        self.inner.cache.subscribe(&ApiRequest::GetCart)
    }

    /// Keep the product list eagerly refreshed while the guard lives.
    #[must_use]
    pub fn watch_products(&self) -> Subscription {
        self.inner.cache.subscribe(&ApiRequest::GetProducts)
    }

    /// Keep the order history eagerly refreshed while the guard lives.
    #[must_use]
    pub fn watch_orders(&self) -> Subscription {
        self.inner.cache.subscribe(&ApiRequest::GetOrders)
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    async fn query(&self, req: ApiRequest) -> Result<ApiData, ApiError> {
        let token = self.inner.session.access_token();
        self.inner
            .cache
            .fetch(&req, token.as_deref())
            .await
            .inspect_err(|e| self.handle_auth_failure(e))
    }

    async fn mutate(&self, req: ApiRequest) -> Result<ApiData, ApiError> {
        let token = self.inner.session.access_token();
        let anonymous = req.endpoint().is_anonymous();
        self.inner
            .cache
            .mutate(&req, token.as_deref())
            .await
            .inspect_err(|e| {
                // A rejected login is not a session expiry
                if !anonymous {
                    self.handle_auth_failure(e);
                }
            })
    }

    fn notify_failure(&self, prefix: &str, err: &ApiError) {
        self.inner
            .notifier
            .error(format!("{prefix}{}", err.user_message()));
    }
}

/// Payload fields are free-form text; scrub them before they go anywhere.
fn sanitize_profile(data: ProfilePayload) -> ProfilePayload {
    ProfilePayload {
        first_name: validate::sanitize_text(&data.first_name),
        last_name: validate::sanitize_text(&data.last_name),
        phone_number: validate::sanitize_text(&data.phone_number),
        billing_address: validate::sanitize_text(&data.billing_address),
        shipping_address: validate::sanitize_text(&data.shipping_address),
    }
}

fn shape_error(expected: &str, data: &ApiData) -> ApiError {
    ApiError::Parsing(format!(
        "expected {expected} response, got {}",
        data.kind()
    ))
}
