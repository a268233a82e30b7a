//! CLI command implementations.

use std::sync::Arc;

use thiserror::Error;

use superlian_client::{ApiError, ConfigError, FileStorage, StoreConfig, Storefront};

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod wishlist;

/// Default state directory when `SUPERLIAN_STATE_DIR` is unset.
const DEFAULT_STATE_DIR: &str = ".superlian";

/// Errors shared by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// State directory could not be opened.
    #[error("state directory error: {0}")]
    State(#[from] std::io::Error),

    /// The client reported an error.
    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),
}

/// Build the storefront client with file-backed persistence.
pub fn storefront() -> Result<Storefront, CliError> {
    let config = StoreConfig::from_env()?;
    let state_dir =
        std::env::var("SUPERLIAN_STATE_DIR").unwrap_or_else(|_| DEFAULT_STATE_DIR.to_owned());
    let storage = Arc::new(FileStorage::open(state_dir)?);
    Ok(Storefront::new(&config, storage)?)
}
