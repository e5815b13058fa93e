// SPDX-License-Identifier: AGPL-3.0
// Cardbook Core - Local favorites storage
//
// Favorites are a set of contact names stored under the "favorites" key of a
// local JSON preference file. Every successful change is published on a
// watch channel so views can recombine from the latest value.

use crate::settings::config_dir;
use crate::types::AppError;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tokio::sync::watch;

/// Key the favorite names live under inside the preference file
pub const FAVORITES_KEY: &str = "favorites";

/// Preference namespace, used as the file stem
pub const PREFERENCES_NAMESPACE: &str = "contacts";

/// Names of the contacts marked as favorite
pub type FavoriteSet = BTreeSet<String>;

/// Durable storage for the favorites set
pub trait FavoritesPersistence: Send + Sync {
    /// Stream of the favorites set; the current value is available immediately
    fn observe(&self) -> watch::Receiver<FavoriteSet>;

    /// Current favorites set
    fn current(&self) -> FavoriteSet;

    /// Add a name; adding an existing member leaves the set unchanged
    fn add(&self, name: &str) -> Result<(), AppError>;

    /// Remove a name; removing a non-member leaves the set unchanged
    fn remove(&self, name: &str) -> Result<(), AppError>;
}

/// File-based favorites store
pub struct FileFavoritesStore {
    /// Whole preference object; held for the duration of a read-modify-write
    preferences: Mutex<Map<String, Value>>,
    sender: watch::Sender<FavoriteSet>,
    file_path: PathBuf,
}

impl FileFavoritesStore {
    /// Create a new favorites store in the platform config directory
    pub fn new() -> Result<Self, AppError> {
        let file_path = Self::get_preferences_path()?;
        Ok(Self::open(file_path))
    }

    /// Open a favorites store backed by the given file
    pub fn open(file_path: impl Into<PathBuf>) -> Self {
        let file_path = file_path.into();
        tracing::info!("Favorites file path: {:?}", file_path);

        let preferences = load_preferences(&file_path);
        let favorites = favorites_from(&preferences);

        let (sender, _) = watch::channel(favorites);

        Self {
            preferences: Mutex::new(preferences),
            sender,
            file_path,
        }
    }

    /// Get the path to the preference file
    fn get_preferences_path() -> Result<PathBuf, AppError> {
        Ok(config_dir()?.join(format!("{}.preferences.json", PREFERENCES_NAMESPACE)))
    }

    /// Path of the backing file
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Read-modify-write of the favorites set under the writer lock
    fn edit<F>(&self, change: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut FavoriteSet),
    {
        let mut preferences = self
            .preferences
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut favorites = favorites_from(&preferences);
        change(&mut favorites);

        let mut updated = preferences.clone();
        updated.insert(
            FAVORITES_KEY.to_string(),
            Value::Array(favorites.iter().cloned().map(Value::String).collect()),
        );

        persist(&self.file_path, &updated).inspect_err(|e| {
            tracing::error!("Failed to persist favorites: {}", e);
        })?;

        *preferences = updated;
        self.sender.send_replace(favorites);
        Ok(())
    }
}

impl FavoritesPersistence for FileFavoritesStore {
    fn observe(&self) -> watch::Receiver<FavoriteSet> {
        self.sender.subscribe()
    }

    fn current(&self) -> FavoriteSet {
        self.sender.borrow().clone()
    }

    fn add(&self, name: &str) -> Result<(), AppError> {
        tracing::debug!("Adding favorite: {}", name);
        self.edit(|favorites| {
            favorites.insert(name.to_string());
        })
    }

    fn remove(&self, name: &str) -> Result<(), AppError> {
        tracing::debug!("Removing favorite: {}", name);
        self.edit(|favorites| {
            favorites.remove(name);
        })
    }
}

/// Load the preference object; anything unreadable counts as empty
fn load_preferences(file_path: &Path) -> Map<String, Value> {
    if !file_path.exists() {
        tracing::info!("No preference file found, starting with no favorites");
        return Map::new();
    }

    let content = match fs::read_to_string(file_path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Failed to read preferences, starting empty: {}", e);
            return Map::new();
        }
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            tracing::warn!("Preference file is not an object, starting empty");
            Map::new()
        }
        Err(e) => {
            tracing::warn!("Failed to parse preferences, starting empty: {}", e);
            Map::new()
        }
    }
}

/// Favorites stored in the preference object; a malformed value is empty
fn favorites_from(preferences: &Map<String, Value>) -> FavoriteSet {
    match preferences.get(FAVORITES_KEY) {
        None => FavoriteSet::new(),
        Some(value) => serde_json::from_value::<FavoriteSet>(value.clone()).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed favorites value: {}", e);
            FavoriteSet::new()
        }),
    }
}

/// Persist the preference object to disk
fn persist(file_path: &Path, preferences: &Map<String, Value>) -> Result<(), AppError> {
    let content = serde_json::to_string_pretty(preferences)
        .map_err(|e| AppError::Serialization(format!("Failed to serialize favorites: {}", e)))?;

    fs::write(file_path, content)
        .map_err(|e| AppError::FileIo(format!("Failed to write favorites: {}", e)))?;

    Ok(())
}
