// SPDX-License-Identifier: AGPL-3.0
// Cardbook CLI - Application State

use crate::session_bridge::SessionBridge;
use cardbook_core::{
    favorites::PREFERENCES_NAMESPACE, sample_contacts, AppError, ContactRepository,
    FileFavoritesStore, SettingsStore,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Everything one command-line session needs
pub struct AppState {
    pub bridge: SessionBridge,
    pub settings: SettingsStore,
}

impl AppState {
    /// Create new application state with all stores initialized
    ///
    /// `config_dir` overrides the platform config directory.
    pub fn new(config_dir: Option<PathBuf>) -> Result<Self, AppError> {
        let (settings, favorites) = match config_dir {
            Some(dir) => {
                std::fs::create_dir_all(&dir)?;
                let favorites_file = dir.join(format!("{}.preferences.json", PREFERENCES_NAMESPACE));
                (
                    SettingsStore::open(dir.join("settings.json"))?,
                    FileFavoritesStore::open(favorites_file),
                )
            }
            None => (SettingsStore::new()?, FileFavoritesStore::new()?),
        };

        let initial = if settings.get().seed_sample_contacts {
            sample_contacts()
        } else {
            Vec::new()
        };
        let repository = Arc::new(ContactRepository::new(initial));
        let bridge = SessionBridge::new(repository, Arc::new(favorites))?;

        Ok(Self { bridge, settings })
    }
}
