//! Local input validation for the auth forms.
//!
//! Validation failures carry the offending field so the caller can render
//! inline guidance; they never reach the repository or the network.

use thiserror::Error;

/// A field-level validation failure
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// A syntactically plausible email: one `@`, non-empty local part, and a
/// dot somewhere in the domain.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let Some(domain) = parts.next() else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// At least 8 characters with at least one letter and one digit.
pub fn is_valid_password(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| c.is_ascii_alphabetic())
}

/// Validate a credentials pair, reporting the first failing field.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), ValidationError> {
    if !is_valid_email(email) {
        return Err(ValidationError::new(
            "email",
            "Please enter a valid email address.",
        ));
    }
    if !is_valid_password(password) {
        return Err(ValidationError::new(
            "password",
            "Password must be at least 8 characters and contain a letter and a number.",
        ));
    }
    Ok(())
}
