//! Endpoint declarations and the capability-tag dependency graph.
//!
//! Every backend operation is named by an [`EndpointId`]. Query endpoints
//! declare which [`Tag`]s their cached responses *provide*; mutation
//! endpoints declare which tags they *invalidate*. Together these two tables
//! form a bipartite graph: invalidation is a pure traversal from a mutation's
//! tag set to the query entries that must be refetched, with no knowledge of
//! transport or cache internals.
//!
//! Adding a tag is a deliberate design decision - the taxonomy is closed.

use std::collections::BTreeSet;

use serde_json::Value;

use superlian_core::{
    CartItemAction, CartItemId, CategoryId, Credentials, NewCartItem, OrderId, OrderPayload,
    ProductId, ProfileId, ProfilePayload, Registration,
};

/// Capability tags attached to cached responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    /// The current user's cart.
    Cart,
    /// Catalog data: products and categories.
    Product,
    /// The current user's order history.
    Orders,
    /// The current user's profile.
    UserProfile,
}

impl Tag {
    /// Tag name for logging.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cart => "Cart",
            Self::Product => "Product",
            Self::Orders => "Orders",
            Self::UserProfile => "UserProfile",
        }
    }
}

/// HTTP method of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Method name as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// Identifier for every backend operation the client knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EndpointId {
    GetCategories,
    GetCategory,
    GetProducts,
    GetProduct,
    GetCart,
    AddToCart,
    ClearCart,
    CreateCartItem,
    UpdateCartItem,
    DeleteCartItem,
    GetOrders,
    GetOrder,
    CreateOrder,
    Login,
    Register,
    GetCurrentUser,
    GetUserProfile,
    CreateUserProfile,
    PatchUserProfile,
}

impl EndpointId {
    /// Tags a cached response from this endpoint provides (queries only).
    #[must_use]
    pub const fn provides(self) -> &'static [Tag] {
        match self {
            Self::GetCategories | Self::GetCategory | Self::GetProducts | Self::GetProduct => {
                &[Tag::Product]
            }
            Self::GetCart => &[Tag::Cart],
            Self::GetOrders | Self::GetOrder => &[Tag::Orders],
            Self::GetUserProfile => &[Tag::UserProfile],
            _ => &[],
        }
    }

    /// Tags a successful call to this endpoint invalidates (mutations only).
    #[must_use]
    pub const fn invalidates(self) -> &'static [Tag] {
        match self {
            Self::AddToCart
            | Self::ClearCart
            | Self::CreateCartItem
            | Self::UpdateCartItem
            | Self::DeleteCartItem => &[Tag::Cart],
            Self::CreateOrder => &[Tag::Orders],
            Self::CreateUserProfile | Self::PatchUserProfile => &[Tag::UserProfile],
            _ => &[],
        }
    }

    /// Whether this endpoint is a cacheable read.
    #[must_use]
    pub const fn is_query(self) -> bool {
        matches!(
            self,
            Self::GetCategories
                | Self::GetCategory
                | Self::GetProducts
                | Self::GetProduct
                | Self::GetCart
                | Self::GetOrders
                | Self::GetOrder
                | Self::GetCurrentUser
                | Self::GetUserProfile
        )
    }

    /// Whether this endpoint is called without an `Authorization` header.
    #[must_use]
    pub const fn is_anonymous(self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// All query endpoints, in declaration order.
    #[must_use]
    pub const fn queries() -> &'static [Self] {
        &[
            Self::GetCategories,
            Self::GetCategory,
            Self::GetProducts,
            Self::GetProduct,
            Self::GetCart,
            Self::GetOrders,
            Self::GetOrder,
            Self::GetCurrentUser,
            Self::GetUserProfile,
        ]
    }
}

/// Query endpoints whose cached entries are affected by invalidating `tags`.
///
/// This is the pure half of cache invalidation: a traversal of the
/// provides/invalidates graph with no cache state involved.
#[must_use]
pub fn invalidated_endpoints(tags: &[Tag]) -> BTreeSet<EndpointId> {
    EndpointId::queries()
        .iter()
        .copied()
        .filter(|endpoint| endpoint.provides().iter().any(|tag| tags.contains(tag)))
        .collect()
}

/// Cache key: an endpoint plus its serialized arguments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryKey {
    /// The endpoint.
    pub endpoint: EndpointId,
    /// Serialized request arguments ("" for argument-free endpoints).
    pub args: String,
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.args.is_empty() {
            write!(f, "{:?}", self.endpoint)
        } else {
            write!(f, "{:?}({})", self.endpoint, self.args)
        }
    }
}

/// A fully-typed request to one endpoint.
///
/// Each variant carries exactly the payload its endpoint accepts; there is no
/// untyped pass-through. The duck-typed payloads of earlier revisions of this
/// system are deliberately unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    GetCategories,
    GetCategory { id: CategoryId },
    GetProducts,
    GetProduct { id: ProductId },
    GetCart,
    AddToCart(NewCartItem),
    ClearCart,
    CreateCartItem(NewCartItem),
    UpdateCartItem { id: CartItemId, action: CartItemAction },
    DeleteCartItem { id: CartItemId },
    GetOrders,
    GetOrder { id: OrderId },
    CreateOrder(OrderPayload),
    Login(Credentials),
    Register(Registration),
    GetCurrentUser,
    GetUserProfile,
    CreateUserProfile(ProfilePayload),
    PatchUserProfile { id: ProfileId, data: ProfilePayload },
}

impl ApiRequest {
    /// The endpoint this request targets.
    #[must_use]
    pub const fn endpoint(&self) -> EndpointId {
        match self {
            Self::GetCategories => EndpointId::GetCategories,
            Self::GetCategory { .. } => EndpointId::GetCategory,
            Self::GetProducts => EndpointId::GetProducts,
            Self::GetProduct { .. } => EndpointId::GetProduct,
            Self::GetCart => EndpointId::GetCart,
            Self::AddToCart(_) => EndpointId::AddToCart,
            Self::ClearCart => EndpointId::ClearCart,
            Self::CreateCartItem(_) => EndpointId::CreateCartItem,
            Self::UpdateCartItem { .. } => EndpointId::UpdateCartItem,
            Self::DeleteCartItem { .. } => EndpointId::DeleteCartItem,
            Self::GetOrders => EndpointId::GetOrders,
            Self::GetOrder { .. } => EndpointId::GetOrder,
            Self::CreateOrder(_) => EndpointId::CreateOrder,
            Self::Login(_) => EndpointId::Login,
            Self::Register(_) => EndpointId::Register,
            Self::GetCurrentUser => EndpointId::GetCurrentUser,
            Self::GetUserProfile => EndpointId::GetUserProfile,
            Self::CreateUserProfile(_) => EndpointId::CreateUserProfile,
            Self::PatchUserProfile { .. } => EndpointId::PatchUserProfile,
        }
    }

    /// HTTP method for this request.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        match self {
            Self::GetCategories
            | Self::GetCategory { .. }
            | Self::GetProducts
            | Self::GetProduct { .. }
            | Self::GetCart
            | Self::GetOrders
            | Self::GetOrder { .. }
            | Self::GetCurrentUser
            | Self::GetUserProfile => HttpMethod::Get,
            Self::AddToCart(_)
            | Self::ClearCart
            | Self::CreateCartItem(_)
            | Self::CreateOrder(_)
            | Self::Login(_)
            | Self::Register(_)
            | Self::CreateUserProfile(_) => HttpMethod::Post,
            Self::UpdateCartItem { .. } | Self::PatchUserProfile { .. } => HttpMethod::Patch,
            Self::DeleteCartItem { .. } => HttpMethod::Delete,
        }
    }

    /// Request path relative to the API base URL.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::GetCategories => "/api/category".to_owned(),
            Self::GetCategory { id } => format!("/api/category/{id}"),
            Self::GetProducts => "/api/products".to_owned(),
            Self::GetProduct { id } => format!("/api/products/{id}"),
            Self::GetCart => "/api/cart/me".to_owned(),
            Self::AddToCart(_) => "/api/cart/".to_owned(),
            Self::ClearCart => "/api/cart/clear/".to_owned(),
            Self::CreateCartItem(_) => "/api/cart-item/".to_owned(),
            Self::UpdateCartItem { id, .. } | Self::DeleteCartItem { id } => {
                format!("/api/cart-item/{id}/")
            }
            Self::GetOrders => "/api/orders/me".to_owned(),
            Self::GetOrder { id } => format!("/api/orders/{id}/"),
            Self::CreateOrder(_) => "/api/orders/".to_owned(),
            Self::Login(_) => "/auth/login/".to_owned(),
            Self::Register(_) => "/auth/users/".to_owned(),
            Self::GetCurrentUser => "/auth/users/me/".to_owned(),
            Self::GetUserProfile | Self::CreateUserProfile(_) => "/api/user-profile/".to_owned(),
            Self::PatchUserProfile { id, .. } => format!("/api/user-profile/{id}/"),
        }
    }

    /// JSON body for this request, if the endpoint takes one.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if payload serialization fails (which
    /// would indicate a bug in the payload types, not bad user input).
    pub fn body(&self) -> Result<Option<Value>, serde_json::Error> {
        Ok(match self {
            Self::AddToCart(item) | Self::CreateCartItem(item) => {
                Some(serde_json::to_value(item)?)
            }
            Self::UpdateCartItem { action, .. } => {
                Some(serde_json::json!({ "action": action }))
            }
            Self::CreateOrder(payload) => Some(serde_json::to_value(payload)?),
            Self::Login(credentials) => Some(serde_json::to_value(credentials)?),
            Self::Register(registration) => Some(serde_json::to_value(registration)?),
            Self::CreateUserProfile(data) | Self::PatchUserProfile { data, .. } => {
                Some(serde_json::to_value(data)?)
            }
            _ => None,
        })
    }

    /// Cache key for this request: the endpoint plus serialized arguments.
    #[must_use]
    pub fn cache_key(&self) -> QueryKey {
        let args = match self {
            Self::GetCategory { id } => id.to_string(),
            Self::GetProduct { id } => id.to_string(),
            Self::GetOrder { id } => id.to_string(),
            _ => String::new(),
        };
        QueryKey {
            endpoint: self.endpoint(),
            args,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_tag_maps_to_cart_read_only() {
        let affected = invalidated_endpoints(&[Tag::Cart]);
        assert_eq!(affected.len(), 1);
        assert!(affected.contains(&EndpointId::GetCart));
    }

    #[test]
    fn test_product_tag_maps_to_catalog_reads() {
        let affected = invalidated_endpoints(&[Tag::Product]);
        assert!(affected.contains(&EndpointId::GetProducts));
        assert!(affected.contains(&EndpointId::GetProduct));
        assert!(affected.contains(&EndpointId::GetCategories));
        assert!(affected.contains(&EndpointId::GetCategory));
        assert!(!affected.contains(&EndpointId::GetCart));
    }

    #[test]
    fn test_multiple_tags_union() {
        let affected = invalidated_endpoints(&[Tag::Cart, Tag::Orders]);
        assert!(affected.contains(&EndpointId::GetCart));
        assert!(affected.contains(&EndpointId::GetOrders));
        assert!(affected.contains(&EndpointId::GetOrder));
        assert!(!affected.contains(&EndpointId::GetProducts));
    }

    #[test]
    fn test_empty_tags_affect_nothing() {
        assert!(invalidated_endpoints(&[]).is_empty());
    }

    #[test]
    fn test_every_mutation_declares_its_invalidations() {
        assert_eq!(EndpointId::AddToCart.invalidates(), &[Tag::Cart]);
        assert_eq!(EndpointId::ClearCart.invalidates(), &[Tag::Cart]);
        assert_eq!(EndpointId::CreateCartItem.invalidates(), &[Tag::Cart]);
        assert_eq!(EndpointId::UpdateCartItem.invalidates(), &[Tag::Cart]);
        assert_eq!(EndpointId::DeleteCartItem.invalidates(), &[Tag::Cart]);
        assert_eq!(EndpointId::CreateOrder.invalidates(), &[Tag::Orders]);
        assert_eq!(EndpointId::PatchUserProfile.invalidates(), &[Tag::UserProfile]);
        // Queries invalidate nothing
        assert!(EndpointId::GetCart.invalidates().is_empty());
    }

    #[test]
    fn test_paths_match_backend_contract() {
        assert_eq!(ApiRequest::GetCart.path(), "/api/cart/me");
        assert_eq!(
            ApiRequest::DeleteCartItem {
                id: CartItemId::new(7)
            }
            .path(),
            "/api/cart-item/7/"
        );
        assert_eq!(
            ApiRequest::GetProduct {
                id: ProductId::new(3)
            }
            .path(),
            "/api/products/3"
        );
        assert_eq!(ApiRequest::ClearCart.path(), "/api/cart/clear/");
        assert_eq!(ApiRequest::GetCurrentUser.path(), "/auth/users/me/");
    }

    #[test]
    fn test_update_cart_item_body_shape() {
        let req = ApiRequest::UpdateCartItem {
            id: CartItemId::new(1),
            action: CartItemAction::Increment,
        };
        let body = req.body().unwrap().unwrap();
        assert_eq!(body, serde_json::json!({ "action": "increment" }));
    }

    #[test]
    fn test_cache_keys_distinguish_arguments() {
        let a = ApiRequest::GetProduct {
            id: ProductId::new(1),
        }
        .cache_key();
        let b = ApiRequest::GetProduct {
            id: ProductId::new(2),
        }
        .cache_key();
        assert_ne!(a, b);
        assert_eq!(a.endpoint, b.endpoint);
    }

    #[test]
    fn test_anonymous_endpoints() {
        assert!(EndpointId::Login.is_anonymous());
        assert!(EndpointId::Register.is_anonymous());
        assert!(!EndpointId::GetCart.is_anonymous());
    }
}
