//! Session settings
//!
//! Loaded once at startup from an optional JSON file. Missing fields take
//! their defaults, so a partial file only overrides what it names.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// Size of the simulation area in simulation units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaSize {
    pub width: f32,
    pub height: f32,
}

impl Default for AreaSize {
    fn default() -> Self {
        Self {
            width: AREA_WIDTH,
            height: AREA_HEIGHT,
        }
    }
}

impl AreaSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Attractor position (center of the area)
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulation area (attractor sits at its center)
    pub area: AreaSize,

    // === Consumption ===
    /// Distance from the attractor below which a thrown object is consumed
    pub horizon_radius: f32,
    /// Seconds between consumption checks for each thrown object
    pub poll_interval: f64,

    // === Particles ===
    /// Ambient particles seeded by `init`
    pub initial_particles: u32,
    /// Particles added by the "add particles" action
    pub particle_burst: u32,
    /// Particles added by the "add nebula" action
    pub nebula_burst: u32,

    // === Visual toggles (passed through to the surface) ===
    /// Gravitational lensing overlay
    pub lensing: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            area: AreaSize::default(),

            horizon_radius: HORIZON_RADIUS,
            poll_interval: POLL_INTERVAL,

            initial_particles: 50,
            particle_burst: 30,
            nebula_burst: 15,

            lensing: true,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.area.width > 0.0 && self.area.height > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "area must be positive, got {}x{}",
                self.area.width, self.area.height
            )));
        }
        if !(self.horizon_radius > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "horizon_radius must be positive, got {}",
                self.horizon_radius
            )));
        }
        if !(self.poll_interval > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "poll_interval must be positive, got {}",
                self.poll_interval
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_behavior() {
        let s = Settings::default();
        assert_eq!(s.horizon_radius, 80.0);
        assert!((s.poll_interval - 0.05).abs() < 1e-12);
        assert_eq!(s.area.center(), Vec2::new(400.0, 300.0));
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s = Settings::from_json(r#"{ "horizon_radius": 120.0, "lensing": false }"#).unwrap();
        assert_eq!(s.horizon_radius, 120.0);
        assert!(!s.lensing);
        assert_eq!(s.particle_burst, 30);
        assert_eq!(s.area, AreaSize::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Settings::from_json(r#"{ "poll_interval": 0.0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));

        let err = Settings::from_json(r#"{ "area": { "width": -1.0, "height": 10.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let s = Settings::load_or_default("/nonexistent/event-horizon.json");
        assert_eq!(s.initial_particles, Settings::default().initial_particles);
    }

    #[test]
    fn test_json_roundtrip_preserves_area() {
        let mut s = Settings::default();
        s.area = AreaSize::new(1024.0, 768.0);
        let back = Settings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back.area, s.area);
    }
}
