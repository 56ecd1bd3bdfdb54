//! Mocked authentication for SkyCast
//!
//! The flow is real (validation, session state, persistence) but the user
//! backend is an injected [`UserRepository`] with an in-memory
//! implementation, so it can later point at a real service without touching
//! the callers.

pub mod repository;
pub mod session;
pub mod validate;

pub use repository::{InMemoryUserRepository, UserRecord, UserRepository};
pub use session::{AuthSession, AuthStatus, UserUpdate};
pub use validate::{validate_credentials, ValidationError};

use thiserror::Error;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// A field failed local validation; never reaches the repository.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Failed to persist session: {0}")]
    Storage(#[from] anyhow::Error),
}

impl AuthError {
    /// A user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Validation(e) => e.message.clone(),
            AuthError::InvalidCredentials => {
                "Invalid email or password. Please check and try again.".to_string()
            }
            AuthError::EmailTaken => {
                "That email is already registered. Try signing in instead.".to_string()
            }
            AuthError::NotAuthenticated => "Please sign in first.".to_string(),
            AuthError::Storage(_) => "Failed to save your session. Please try again.".to_string(),
        }
    }
}
