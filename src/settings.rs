//! Run settings
//!
//! Injected configuration for the engine and the headless driver, loadable
//! from a JSON file. Missing fields fall back to their defaults.

use core::fmt;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{MIN_SCREEN_HEIGHT, MIN_SCREEN_WIDTH, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Errors raised while loading settings
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(&'static str),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read settings: {err}"),
            Self::Parse(err) => write!(f, "failed to parse settings: {err}"),
            Self::Invalid(reason) => write!(f, "invalid settings: {reason}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// Engine and driver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Play area width (pixels)
    pub screen_width: f32,
    /// Play area height (pixels)
    pub screen_height: f32,
    /// RNG seed for the run
    pub seed: u64,

    // === Headless driver ===
    /// Ticks to simulate before stopping
    pub demo_ticks: u64,
    /// Log a status line every N ticks (0 = never)
    pub log_every: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            seed: 42,
            demo_ticks: 200_000,
            log_every: 10_000,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!(
            "Loaded settings: {}x{}, seed {}",
            settings.screen_width,
            settings.screen_height,
            settings.seed
        );
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.screen_width > 0.0 && self.screen_height > 0.0) {
            return Err(SettingsError::Invalid("screen size must be positive"));
        }
        if self.screen_width < MIN_SCREEN_WIDTH {
            return Err(SettingsError::Invalid("screen too narrow for the formation"));
        }
        if self.screen_height < MIN_SCREEN_HEIGHT {
            return Err(SettingsError::Invalid(
                "screen too short for the formation and player",
            ));
        }
        Ok(())
    }

    pub fn screen(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.screen(), Vec2::new(800.0, 600.0));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 7, "demo_ticks": 500 }"#).unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.demo_ticks, 500);
        assert_eq!(settings.screen_width, 800.0);
    }

    #[test]
    fn test_invalid_json() {
        let err = Settings::from_json("{ seed: }").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_rejects_non_positive_screen() {
        let err = Settings::from_json(r#"{ "screen_width": 0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
        assert_eq!(err.to_string(), "invalid settings: screen size must be positive");
    }

    #[test]
    fn test_rejects_screen_narrower_than_formation() {
        let err = Settings::from_json(r#"{ "screen_width": 499 }"#).unwrap_err();
        assert_eq!(err.to_string(), "invalid settings: screen too narrow for the formation");
        assert!(Settings::from_json(r#"{ "screen_width": 500 }"#).is_ok());
    }

    #[test]
    fn test_rejects_screen_shorter_than_layout() {
        let err = Settings::from_json(r#"{ "screen_height": 384 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
        assert!(Settings::from_json(r#"{ "screen_height": 385 }"#).is_ok());
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load("/definitely/not/here/settings.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
