// SPDX-License-Identifier: AGPL-3.0
// Cardbook Core - Shared logic for all frontends
//
// This crate provides:
// - Contact records and edit validation
// - FileFavoritesStore for the persistent favorites set
// - ContactRepository holding the session's contacts
// - ContactsViewModel merging contacts with favorites
// - List presentation (search filter and letter sections)
// - Share intents and business card templates
// - AppSettings, SettingsStore and AppError
//
// Frontend-specific code lives in separate crates.

pub mod card;
pub mod contact;
pub mod favorites;
pub mod presentation;
pub mod repository;
pub mod settings;
pub mod share;
pub mod types;
pub mod view_model;

// Re-export commonly used items
pub use card::{CardPreview, CardTemplate};
pub use contact::{sample_contacts, Contact, ContactDraft};
pub use favorites::{FavoriteSet, FavoritesPersistence, FileFavoritesStore};
pub use presentation::{group_contacts, GroupedContacts};
pub use repository::ContactRepository;
pub use settings::SettingsStore;
pub use share::{ShareIntent, ShareTarget};
pub use types::{AppError, AppSettings, Theme};
pub use view_model::{merge_contacts, ContactsViewModel};
