//! Session state and the login/register/logout flows.

use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use skycast_store::{LocalStore, User, UserPreferences};

use crate::repository::{UserRecord, UserRepository};
use crate::validate::validate_credentials;
use crate::AuthError;

/// The token a successful mock sign-in stores. A real backend would issue
/// a session token here.
const MOCK_AUTH_TOKEN: &str = "mock-auth-token";

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// Stored session not yet restored
    Loading,
    Authenticated,
    Unauthenticated,
}

/// Partial profile update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Authenticated-session handle.
///
/// Owns the current user and status, writes every mutation through the
/// store, and delegates account lookups to the injected repository.
pub struct AuthSession {
    repository: Arc<dyn UserRepository>,
    store: LocalStore,
    user: Mutex<Option<User>>,
    status: Mutex<AuthStatus>,
}

impl AuthSession {
    pub fn new(repository: Arc<dyn UserRepository>, store: LocalStore) -> Self {
        Self {
            repository,
            store,
            user: Mutex::new(None),
            status: Mutex::new(AuthStatus::Loading),
        }
    }

    /// Restore the session from the store: a stored user together with a
    /// token means authenticated, anything else means signed out.
    pub fn initialize(&self) {
        let stored_user = self.store.user();
        let token = self.store.auth_token();

        let mut status = self.status.lock();
        match (stored_user, token) {
            (Some(user), Some(_)) => {
                tracing::info!("Restored session for {}", user.email);
                *self.user.lock() = Some(user);
                *status = AuthStatus::Authenticated;
            }
            _ => {
                *status = AuthStatus::Unauthenticated;
            }
        }
    }

    pub fn status(&self) -> AuthStatus {
        *self.status.lock()
    }

    pub fn user(&self) -> Option<User> {
        self.user.lock().clone()
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    /// `Validation` for malformed input (checked before any lookup),
    /// `InvalidCredentials` on a mismatch, `Storage` if persisting fails.
    pub fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        validate_credentials(email, password)?;

        let record = self
            .repository
            .find_by_email(email)
            .filter(|record| record.password == password)
            .ok_or(AuthError::InvalidCredentials)?;

        self.enter_session(record.user.clone())?;
        tracing::info!("Signed in {}", record.user.email);
        Ok(record.user)
    }

    /// Create an account and sign in.
    ///
    /// # Errors
    /// `Validation` for malformed input, `EmailTaken` for a duplicate,
    /// `Storage` if persisting fails.
    pub fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<User, AuthError> {
        validate_credentials(email, password)?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: name.map(str::to_string),
            preferences: UserPreferences::default(),
        };
        self.repository.create(UserRecord {
            user: user.clone(),
            password: password.to_string(),
        })?;

        self.enter_session(user.clone())?;
        tracing::info!("Registered {}", user.email);
        Ok(user)
    }

    /// Sign out, removing the stored user and token.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.store.remove_user().map_err(AuthError::Storage)?;
        self.store.remove_auth_token().map_err(AuthError::Storage)?;
        *self.user.lock() = None;
        *self.status.lock() = AuthStatus::Unauthenticated;
        Ok(())
    }

    /// Apply a partial profile update to the signed-in user.
    pub fn update_user(&self, update: UserUpdate) -> Result<User, AuthError> {
        let mut guard = self.user.lock();
        let user = guard.as_mut().ok_or(AuthError::NotAuthenticated)?;

        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(name) = update.name {
            user.name = Some(name);
        }

        self.store.save_user(user).map_err(AuthError::Storage)?;
        self.repository.update(user);
        Ok(user.clone())
    }

    /// Replace the signed-in user's preferences.
    pub fn update_preferences(&self, preferences: UserPreferences) -> Result<User, AuthError> {
        let mut guard = self.user.lock();
        let user = guard.as_mut().ok_or(AuthError::NotAuthenticated)?;

        user.preferences = preferences;
        self.store.save_user(user).map_err(AuthError::Storage)?;
        self.repository.update(user);
        Ok(user.clone())
    }

    fn enter_session(&self, user: User) -> Result<(), AuthError> {
        self.store.save_user(&user).map_err(AuthError::Storage)?;
        self.store
            .save_auth_token(MOCK_AUTH_TOKEN)
            .map_err(AuthError::Storage)?;
        *self.user.lock() = Some(user);
        *self.status.lock() = AuthStatus::Authenticated;
        Ok(())
    }
}
