//! Typed response boundary.
//!
//! Raw JSON from the transport is validated into an [`ApiData`] variant
//! matching the endpoint that produced it. Anything that does not fit the
//! declared shape becomes [`ApiError::Parsing`] here, so the stores only ever
//! see well-formed domain types.

use serde::de::DeserializeOwned;
use serde_json::Value;

use superlian_core::{Cart, Category, LoginResponse, Order, Product, User, UserProfile};

use crate::error::ApiError;

use super::endpoints::EndpointId;

/// A validated response from one endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiData {
    Categories(Vec<Category>),
    Category(Category),
    Products(Vec<Product>),
    Product(Product),
    Cart(Cart),
    Orders(Vec<Order>),
    Order(Order),
    Session(LoginResponse),
    User(User),
    Profile(UserProfile),
    /// Acknowledged mutation whose body the client ignores; the follow-up
    /// refetch is the source of truth.
    Ack,
}

impl ApiData {
    /// Variant name for logging and shape-mismatch errors.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Categories(_) => "categories",
            Self::Category(_) => "category",
            Self::Products(_) => "products",
            Self::Product(_) => "product",
            Self::Cart(_) => "cart",
            Self::Orders(_) => "orders",
            Self::Order(_) => "order",
            Self::Session(_) => "session",
            Self::User(_) => "user",
            Self::Profile(_) => "profile",
            Self::Ack => "ack",
        }
    }
}

/// Validate a raw JSON response against the endpoint's declared shape.
///
/// # Errors
///
/// Returns [`ApiError::Parsing`] if the body does not deserialize into the
/// expected type, or if the profile endpoint returns an empty list.
pub fn parse_response(endpoint: EndpointId, value: Value) -> Result<ApiData, ApiError> {
    match endpoint {
        EndpointId::GetCategories => decode(value).map(ApiData::Categories),
        EndpointId::GetCategory => decode(value).map(ApiData::Category),
        EndpointId::GetProducts => decode(value).map(ApiData::Products),
        EndpointId::GetProduct => decode(value).map(ApiData::Product),
        EndpointId::GetCart => decode(value).map(ApiData::Cart),
        EndpointId::GetOrders => decode(value).map(ApiData::Orders),
        EndpointId::GetOrder | EndpointId::CreateOrder => decode(value).map(ApiData::Order),
        EndpointId::Login => decode(value).map(ApiData::Session),
        EndpointId::Register | EndpointId::GetCurrentUser => decode(value).map(ApiData::User),
        EndpointId::GetUserProfile => parse_profile(value),
        EndpointId::CreateUserProfile | EndpointId::PatchUserProfile => {
            decode(value).map(ApiData::Profile)
        }
        EndpointId::AddToCart
        | EndpointId::ClearCart
        | EndpointId::CreateCartItem
        | EndpointId::UpdateCartItem
        | EndpointId::DeleteCartItem => Ok(ApiData::Ack),
    }
}

/// Normalize the profile endpoint's list-vs-object ambiguity.
///
/// The backend has served both a bare profile object and a one-element list
/// for the same resource. The client's contract is "exactly one profile per
/// user": a list is unwrapped to its first element, an empty list is a
/// malformed response.
fn parse_profile(value: Value) -> Result<ApiData, ApiError> {
    let value = match value {
        Value::Array(items) => items
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Parsing("user profile list is empty".to_owned()))?,
        other => other,
    };
    decode(value).map(ApiData::Profile)
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| {
        tracing::error!(error = %e, "failed to decode API response");
        ApiError::Parsing(e.to_string())
    })
}
