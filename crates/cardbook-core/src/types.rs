// SPDX-License-Identifier: AGPL-3.0
// Cardbook Core - Type definitions

use crate::card::CardTemplate;
use serde::{Deserialize, Serialize};

/// UI theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::System => "system",
            Self::Light => "light",
            Self::Dark => "dark",
        };
        f.write_str(label)
    }
}

impl std::str::FromStr for Theme {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "system" => Ok(Self::System),
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(AppError::InvalidConfig(format!("Unknown theme: {}", other))),
        }
    }
}

/// Application settings (GUI-agnostic)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Theme preference: "dark", "light", or "system"
    #[serde(default)]
    pub theme: Theme,
    /// Load the bundled sample contacts when a session starts
    #[serde(default = "default_seed_sample_contacts")]
    pub seed_sample_contacts: bool,
    /// Last card template the user saved
    #[serde(default)]
    pub card_template: CardTemplate,
}

fn default_seed_sample_contacts() -> bool {
    true
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            seed_sample_contacts: default_seed_sample_contacts(),
            card_template: CardTemplate::default(),
        }
    }
}

/// Error types for the application
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("File I/O error: {0}")]
    FileIo(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Contact not found: {0}")]
    ContactNotFound(u32),

    #[error("Session closed")]
    SessionClosed,

    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileIo(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_names() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(Theme::Light.to_string().parse::<Theme>().unwrap(), Theme::Light);
        assert!(matches!(
            "sepia".parse::<Theme>(),
            Err(AppError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.theme, Theme::System);
        assert!(settings.seed_sample_contacts);
        assert_eq!(settings.card_template, CardTemplate::default());
    }

    #[test]
    fn test_settings_fill_missing_fields() {
        let settings: AppSettings = serde_json::from_str(r#"{"theme":"dark"}"#).unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        assert!(settings.seed_sample_contacts);
    }

    #[test]
    fn test_io_error_conversion() {
        let err: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, AppError::FileIo(_)));
    }
}
