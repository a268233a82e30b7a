//! Core types for the SuperLian storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod email;
pub mod id;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{Cart, CartItem, CartItemAction, NewCartItem};
pub use email::{Email, EmailError};
pub use id::*;
pub use order::{MaskedCard, Order, OrderItemPayload, OrderPayload, OrderStatus};
pub use product::{Category, ColorOption, Product, StorageOption};
pub use user::{Credentials, LoginResponse, ProfilePayload, Registration, User, UserProfile};
