//! HTTP transport for the commerce backend.
//!
//! The [`Transport`] trait is the only seam through which the client touches
//! the network; tests substitute a scripted implementation. [`HttpTransport`]
//! is the production implementation over `reqwest`.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::StoreConfig;
use crate::error::ApiError;

use super::endpoints::{ApiRequest, HttpMethod};

/// Sends one typed request and returns the raw JSON body.
///
/// Implementations map transport-level failures into the [`ApiError`]
/// taxonomy and treat an empty body as JSON `null`; shape validation happens
/// above this trait, at the response boundary.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute `req`, attaching `access_token` where the endpoint allows it.
    async fn send(&self, req: &ApiRequest, access_token: Option<&str>)
    -> Result<Value, ApiError>;
}

/// Production transport over `reqwest`.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the underlying HTTP client cannot be
    /// constructed (e.g., TLS backend initialization failure).
    pub fn new(config: &StoreConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.as_str().trim_end_matches('/').to_owned(),
        })
    }

    /// Absolute URL for a request.
    fn endpoint_url(&self, req: &ApiRequest) -> String {
        format!("{}{}", self.base_url, req.path())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        req: &ApiRequest,
        access_token: Option<&str>,
    ) -> Result<Value, ApiError> {
        let url = self.endpoint_url(req);

        let mut builder = match req.method() {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Patch => self.client.patch(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        // Bearer credentials ride on every request that allows them; the
        // backend expects the JWT scheme rather than Bearer
        if let Some(token) = access_token
            && !req.endpoint().is_anonymous()
        {
            builder = builder.header("Authorization", format!("JWT {token}"));
        }

        if let Some(body) = req.body()? {
            builder = builder.json(&body);
        }

        let response = builder.send().await.map_err(ApiError::from)?;
        let status = response.status();

        // Read the body as text first for better error diagnostics
        let text = response.text().await.map_err(ApiError::from)?;

        if !status.is_success() {
            tracing::error!(
                endpoint = ?req.endpoint(),
                status = %status,
                body = %text.chars().take(500).collect::<String>(),
                "backend returned non-success status"
            );
            return Err(ApiError::Http {
                status: status.as_u16(),
            });
        }

        if text.trim().is_empty() {
            // 204s and empty mutation bodies
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                endpoint = ?req.endpoint(),
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "failed to parse backend response body"
            );
            ApiError::Parsing(e.to_string())
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use superlian_core::{CartItemAction, CartItemId};

    use super::*;

    fn transport() -> HttpTransport {
        let config = StoreConfig::new("http://localhost:8000".parse().unwrap());
        HttpTransport::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_url_joins_base_and_path() {
        let t = transport();
        assert_eq!(
            t.endpoint_url(&ApiRequest::GetProducts),
            "http://localhost:8000/api/products"
        );
        assert_eq!(
            t.endpoint_url(&ApiRequest::UpdateCartItem {
                id: CartItemId::new(12),
                action: CartItemAction::Decrement,
            }),
            "http://localhost:8000/api/cart-item/12/"
        );
    }

    #[test]
    fn test_endpoint_url_tolerates_trailing_slash_in_base() {
        let config = StoreConfig::new("http://localhost:8000/".parse().unwrap());
        let t = HttpTransport::new(&config).unwrap();
        assert_eq!(
            t.endpoint_url(&ApiRequest::GetCart),
            "http://localhost:8000/api/cart/me"
        );
    }
}
