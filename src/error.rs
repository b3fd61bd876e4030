//! Error types for Event Horizon.
//!
//! The simulation core itself never fails: bad spawn parameters fall back to
//! defaults and stale callbacks are no-ops. Loading configuration is the one
//! place where errors surface to the caller.

use std::fmt;

/// Errors that can occur while loading or validating [`Settings`](crate::Settings).
#[derive(Debug)]
pub enum SettingsError {
    /// Failed to read the settings file.
    Io(std::io::Error),
    /// Settings file is not valid JSON for the settings schema.
    Parse(serde_json::Error),
    /// A value parsed fine but is outside its allowed range.
    Invalid(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "Failed to read settings file: {}", e),
            SettingsError::Parse(e) => write!(f, "Failed to parse settings: {}", e),
            SettingsError::Invalid(msg) => write!(f, "Invalid settings: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Parse(e) => Some(e),
            SettingsError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e)
    }
}
