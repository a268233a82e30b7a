//! Client-side form validation.
//!
//! Everything here runs before a request is built; failures are
//! [`ApiError::Validation`] and never reach the network. Messages are
//! user-facing as written.

use superlian_core::{Credentials, Email, Registration};

use crate::error::ApiError;

/// Minimum username length.
pub const USERNAME_MIN_LENGTH: usize = 3;
/// Minimum password length (registration).
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Strip control characters and angle brackets from free-form text input,
/// then trim.
#[must_use]
pub fn sanitize_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_control() && *c != '<' && *c != '>')
        .collect::<String>()
        .trim()
        .to_owned()
}

/// Normalize and validate an email address from form input.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] with a user-facing message.
pub fn normalize_email(raw: &str) -> Result<String, ApiError> {
    let candidate = sanitize_text(raw).to_lowercase();
    Email::parse(&candidate)
        .map(Email::into_inner)
        .map_err(|_| ApiError::Validation("Please enter a valid email address.".to_owned()))
}

/// Validate login form input into a request payload.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for a malformed email or empty password.
pub fn login_credentials(email: &str, password: &str) -> Result<Credentials, ApiError> {
    let email = normalize_email(email)?;
    if password.is_empty() {
        return Err(ApiError::Validation("Password is required.".to_owned()));
    }
    Ok(Credentials {
        email,
        password: password.to_owned(),
    })
}

/// Validate registration form input into a request payload.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for a malformed email, short username,
/// or short password.
pub fn registration(email: &str, username: &str, password: &str) -> Result<Registration, ApiError> {
    let email = normalize_email(email)?;
    let username = sanitize_text(username);
    if username.chars().count() < USERNAME_MIN_LENGTH {
        return Err(ApiError::Validation(format!(
            "Username must be at least {USERNAME_MIN_LENGTH} characters."
        )));
    }
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(ApiError::Validation(format!(
            "Password must be at least {PASSWORD_MIN_LENGTH} characters."
        )));
    }
    Ok(Registration {
        email,
        username,
        password: password.to_owned(),
    })
}
