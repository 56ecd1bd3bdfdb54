//! File-backed key-value persistence.
//!
//! Four independent records, one JSON file each, under a data directory.
//! Reads of missing or corrupt records return well-defined defaults; writes
//! are whole-record replacements. Nothing here is transactional across
//! records; a crash between two writes can leave them inconsistent, which
//! is acceptable for single-process, best-effort persistence.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{FavoriteLocation, RecentLocation, User, UserPreferences};

const USER_FILE: &str = "user.json";
const AUTH_TOKEN_FILE: &str = "auth_token.json";
const RECENT_LOCATIONS_FILE: &str = "recent_locations.json";
const FAVORITE_LOCATIONS_FILE: &str = "favorite_locations.json";

/// Recent-locations list is capped; oldest entries fall off the end.
pub const MAX_RECENT_LOCATIONS: usize = 10;

/// Local persistence store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    data_dir: PathBuf,
}

impl LocalStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn record_path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    /// Read a record, treating a missing or corrupt file as absent.
    fn read_record<T: DeserializeOwned>(&self, file: &str) -> Option<T> {
        let path = self.record_path(file);
        let contents = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring corrupt record {}: {}", path.display(), e);
                None
            }
        }
    }

    fn write_record<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.data_dir).context("Failed to create data directory")?;

        let json = serde_json::to_string_pretty(value).context("Failed to serialize record")?;
        let path = self.record_path(file);
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    fn remove_record(&self, file: &str) -> Result<()> {
        let path = self.record_path(file);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        Ok(())
    }

    // --- user ---

    pub fn user(&self) -> Option<User> {
        self.read_record(USER_FILE)
    }

    pub fn save_user(&self, user: &User) -> Result<()> {
        self.write_record(USER_FILE, user)?;
        tracing::debug!("Saved user record for {}", user.email);
        Ok(())
    }

    pub fn remove_user(&self) -> Result<()> {
        self.remove_record(USER_FILE)
    }

    // --- preferences (stored inside the user record) ---

    /// The stored user's preferences, or the defaults when no user record
    /// exists.
    pub fn preferences(&self) -> UserPreferences {
        self.user().map(|u| u.preferences).unwrap_or_default()
    }

    /// Write preferences through the user record. No-op when nobody is
    /// signed in.
    pub fn save_preferences(&self, preferences: &UserPreferences) -> Result<()> {
        let Some(mut user) = self.user() else {
            return Ok(());
        };
        user.preferences = preferences.clone();
        self.save_user(&user)
    }

    // --- auth token ---

    pub fn auth_token(&self) -> Option<String> {
        self.read_record(AUTH_TOKEN_FILE)
    }

    pub fn save_auth_token(&self, token: &str) -> Result<()> {
        self.write_record(AUTH_TOKEN_FILE, &token)
    }

    pub fn remove_auth_token(&self) -> Result<()> {
        self.remove_record(AUTH_TOKEN_FILE)
    }

    // --- recent locations ---

    pub fn recent_locations(&self) -> Vec<RecentLocation> {
        self.read_record(RECENT_LOCATIONS_FILE).unwrap_or_default()
    }

    /// Record a visit: any existing entry with the same id is removed, the
    /// new entry goes to the front, and the list is truncated to
    /// [`MAX_RECENT_LOCATIONS`]. Relative order of the surviving entries is
    /// preserved.
    pub fn add_recent(&self, location: RecentLocation) -> Result<()> {
        let mut recents = self.recent_locations();
        recents.retain(|loc| loc.id != location.id);
        recents.insert(0, location);
        recents.truncate(MAX_RECENT_LOCATIONS);
        self.write_record(RECENT_LOCATIONS_FILE, &recents)
    }

    pub fn clear_recents(&self) -> Result<()> {
        self.remove_record(RECENT_LOCATIONS_FILE)
    }

    // --- favorite locations ---

    pub fn favorite_locations(&self) -> Vec<FavoriteLocation> {
        self.read_record(FAVORITE_LOCATIONS_FILE).unwrap_or_default()
    }

    /// Add a favorite. Adding an id that is already present is a no-op.
    pub fn add_favorite(&self, location: FavoriteLocation) -> Result<()> {
        let mut favorites = self.favorite_locations();
        if favorites.iter().any(|loc| loc.id == location.id) {
            return Ok(());
        }
        favorites.push(location);
        self.write_record(FAVORITE_LOCATIONS_FILE, &favorites)
    }

    /// Remove a favorite by id. A missing id is not an error.
    pub fn remove_favorite(&self, location_id: &str) -> Result<()> {
        let mut favorites = self.favorite_locations();
        favorites.retain(|loc| loc.id != location_id);
        self.write_record(FAVORITE_LOCATIONS_FILE, &favorites)
    }

    pub fn is_favorite(&self, location_id: &str) -> bool {
        self.favorite_locations()
            .iter()
            .any(|loc| loc.id == location_id)
    }

    // --- housekeeping ---

    /// Remove all four records.
    pub fn clear_all(&self) -> Result<()> {
        self.remove_record(USER_FILE)?;
        self.remove_record(AUTH_TOKEN_FILE)?;
        self.remove_record(RECENT_LOCATIONS_FILE)?;
        self.remove_record(FAVORITE_LOCATIONS_FILE)?;
        Ok(())
    }
}
