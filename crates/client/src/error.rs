//! Unified error taxonomy for the storefront client.
//!
//! Every failure surfaced by the client maps onto one of five variants, and
//! each variant renders to a user-facing message via [`ApiError::user_message`].
//! Business-empty conditions (empty cart, zero filtered results) are valid
//! states, never errors.

use thiserror::Error;

/// Errors produced by the API layer and surfaced to the presentation layer.
///
/// Variants hold plain data rather than wrapping transport types, so errors
/// stay `Clone` and comparable; classification of `reqwest` failures happens
/// in the `From` impl.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, TLS, ...).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status code.
    #[error("http error: status {status}")]
    Http {
        /// HTTP status code (4xx/5xx).
        status: u16,
    },

    /// The response body could not be parsed into the expected shape.
    #[error("parsing error: {0}")]
    Parsing(String),

    /// The request timed out before a response arrived.
    #[error("request timed out")]
    Timeout,

    /// Client-side validation failed; the request never reached the network.
    #[error("validation error: {0}")]
    Validation(String),
}

impl ApiError {
    /// Render this error as a user-facing message.
    ///
    /// Internal detail (status codes, parser messages) is translated, not
    /// exposed; validation messages are shown verbatim since they originate
    /// from client-side form checks.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Http { status } => http_status_message(*status).to_owned(),
            Self::Network(_) => {
                "Network error. Please check your internet connection and try again.".to_owned()
            }
            Self::Parsing(_) => "Error processing server response. Please try again.".to_owned(),
            Self::Timeout => "Request timeout. Please try again.".to_owned(),
            Self::Validation(message) => message.clone(),
        }
    }

    /// Whether this error represents a missing or rejected authentication.
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Http { status: 401 | 403 })
    }

    /// Whether the request failed before reaching the server.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Whether this error originated from client-side validation.
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// User-facing message for an HTTP status code.
const fn http_status_message(status: u16) -> &'static str {
    match status {
        400 => "Invalid request. Please check your information and try again.",
        401 | 403 => "You are not authorized. Please log in and try again.",
        404 => "The requested resource was not found.",
        409 => "This resource already exists or conflicts with existing data.",
        422 => "The data you provided is invalid. Please check and try again.",
        429 => "Too many requests. Please wait a moment and try again.",
        500 => "Server error. Please try again later.",
        502 | 503 => "Service temporarily unavailable. Please try again later.",
        504 => "Request timeout. Please check your connection and try again.",
        _ => "An error occurred. Please try again.",
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Parsing(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parsing(err.to_string())
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_predicate() {
        assert!(ApiError::Http { status: 401 }.is_auth_error());
        assert!(ApiError::Http { status: 403 }.is_auth_error());
        assert!(!ApiError::Http { status: 404 }.is_auth_error());
        assert!(!ApiError::Timeout.is_auth_error());
    }

    #[test]
    fn test_user_message_for_statuses() {
        assert_eq!(
            ApiError::Http { status: 401 }.user_message(),
            "You are not authorized. Please log in and try again."
        );
        assert_eq!(
            ApiError::Http { status: 500 }.user_message(),
            "Server error. Please try again later."
        );
        assert_eq!(
            ApiError::Http { status: 418 }.user_message(),
            "An error occurred. Please try again."
        );
    }

    #[test]
    fn test_network_message_mentions_connection() {
        let msg = ApiError::Network("connection refused".to_owned()).user_message();
        assert!(msg.contains("internet connection"));
    }

    #[test]
    fn test_validation_message_shown_verbatim() {
        let err = ApiError::Validation("Password must be at least 6 characters.".to_owned());
        assert_eq!(err.user_message(), "Password must be at least 6 characters.");
        assert!(err.is_validation_error());
    }
}
