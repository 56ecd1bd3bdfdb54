//! User repository port and its in-memory implementation.
//!
//! The trait is the seam between the auth flow and whatever backs user
//! accounts. The in-memory implementation is the mock backend; a real one
//! would talk to a service without the session code changing.

use parking_lot::Mutex;

use skycast_store::{User, UserPreferences};

use crate::AuthError;

/// A stored account: the public user plus its password.
///
/// Passwords are plain text because this backend is a demo mock; a real
/// implementation would store a hash.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password: String,
}

/// Backend for user accounts.
pub trait UserRepository: Send + Sync {
    /// Look up an account by email.
    fn find_by_email(&self, email: &str) -> Option<UserRecord>;

    /// Create a new account.
    ///
    /// # Errors
    /// Returns `AuthError::EmailTaken` when the email already exists.
    fn create(&self, record: UserRecord) -> Result<(), AuthError>;

    /// Replace the stored user for an existing account. Unknown users are
    /// ignored.
    fn update(&self, user: &User);
}

/// In-memory user repository, optionally seeded with the demo account.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<UserRecord>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository seeded with the demo account
    /// (`demo@example.com` / `Password123`).
    pub fn with_demo_user() -> Self {
        let repo = Self::new();
        repo.users.lock().push(UserRecord {
            user: User {
                id: "1".to_string(),
                email: "demo@example.com".to_string(),
                name: Some("Demo User".to_string()),
                preferences: UserPreferences::default(),
            },
            password: "Password123".to_string(),
        });
        repo
    }

    pub fn len(&self) -> usize {
        self.users.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.lock().is_empty()
    }
}

impl UserRepository for InMemoryUserRepository {
    fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        self.users
            .lock()
            .iter()
            .find(|record| record.user.email == email)
            .cloned()
    }

    fn create(&self, record: UserRecord) -> Result<(), AuthError> {
        let mut users = self.users.lock();
        if users.iter().any(|r| r.user.email == record.user.email) {
            return Err(AuthError::EmailTaken);
        }
        tracing::debug!("Created account for {}", record.user.email);
        users.push(record);
        Ok(())
    }

    fn update(&self, user: &User) {
        let mut users = self.users.lock();
        if let Some(record) = users.iter_mut().find(|r| r.user.id == user.id) {
            record.user = user.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn demo_user_is_seeded() {
        let repo = InMemoryUserRepository::with_demo_user();
        let record = repo.find_by_email("demo@example.com").unwrap();
        assert_eq!(record.password, "Password123");
        assert_eq!(record.user.name.as_deref(), Some("Demo User"));
    }

    #[test]
    fn create_rejects_duplicate_email() {
        let repo = InMemoryUserRepository::with_demo_user();
        let record = repo.find_by_email("demo@example.com").unwrap();

        let result = repo.create(record);
        assert!(matches!(result, Err(AuthError::EmailTaken)));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn update_replaces_existing_user() {
        let repo = InMemoryUserRepository::with_demo_user();
        let mut user = repo.find_by_email("demo@example.com").unwrap().user;
        user.name = Some("Renamed".to_string());

        repo.update(&user);

        let record = repo.find_by_email("demo@example.com").unwrap();
        assert_eq!(record.user.name.as_deref(), Some("Renamed"));
    }

    #[test]
    fn update_ignores_unknown_user() {
        let repo = InMemoryUserRepository::new();
        let user = User {
            id: "missing".to_string(),
            email: "ghost@example.com".to_string(),
            name: None,
            preferences: UserPreferences::default(),
        };

        repo.update(&user);
        assert!(repo.is_empty());
    }
}
