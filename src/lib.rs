//! Event Horizon - simulation core for a black hole particle visualizer
//!
//! Core modules:
//! - `sim`: Entity lifecycle, trajectories, consumption detection, bursts, stats
//! - `settings`: Session configuration (JSON)
//! - `error`: Configuration errors
//!
//! Rendering, input gestures and UI chrome live outside this crate. The core
//! talks to them through [`sim::RenderSurface`] and [`sim::Command`].

pub mod error;
pub mod settings;
pub mod sim;

pub use error::SettingsError;
pub use settings::{AreaSize, Settings};
pub use sim::{SimulationState, Snapshot};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Event horizon radius around the attractor (simulation units)
    pub const HORIZON_RADIUS: f32 = 80.0;
    /// Consumption poll cadence (seconds)
    pub const POLL_INTERVAL: f64 = 0.05;

    /// Default simulation area
    pub const AREA_WIDTH: f32 = 800.0;
    pub const AREA_HEIGHT: f32 = 600.0;

    /// Thrown object trajectory: gravity_factor = BASE + mass * PER_MASS
    pub const GRAVITY_BASE: f32 = 0.5;
    pub const GRAVITY_PER_MASS: f32 = 0.1;
    /// Thrown object target spread: spread = BASE - mass * PER_MASS, floored at MIN
    pub const SPREAD_BASE: f32 = 100.0;
    pub const SPREAD_PER_MASS: f32 = 10.0;
    pub const MIN_SPREAD: f32 = 10.0;
    /// Thrown object fall time: BASE + mass * PER_MASS + uniform(0, JITTER)
    pub const FALL_BASE: f32 = 3.0;
    pub const FALL_PER_MASS: f32 = 0.5;
    pub const FALL_JITTER: f32 = 2.0;

    /// Ambient particle target spread and lifetime range (seconds)
    pub const AMBIENT_SPREAD: f32 = 200.0;
    pub const AMBIENT_LIFETIME: (f32, f32) = (2.0, 7.0);
    /// Nebula particle target spread and lifetime range (seconds)
    pub const NEBULA_SPREAD: f32 = 300.0;
    pub const NEBULA_LIFETIME: (f32, f32) = (10.0, 20.0);

    /// Fragment flight radius and lifetime range
    pub const FRAGMENT_RADIUS: (f32, f32) = (30.0, 70.0);
    pub const FRAGMENT_LIFETIME: (f32, f32) = (0.5, 1.5);
    pub const FRAGMENT_SIZE: f32 = 2.0;
    /// Fragments per burst: BASE + mass * PER_MASS
    pub const BURST_BASE: u32 = 20;
    pub const BURST_PER_MASS: u32 = 5;

    /// Mass of anything without an object type
    pub const DEFAULT_MASS: f32 = 1.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// True when both components are finite (no NaN/inf from a half-laid-out surface)
#[inline]
pub fn is_finite_point(p: Vec2) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(10.0, PI / 2.0);
        assert!(p.x.abs() < 0.0001);
        assert!((p.y - 10.0).abs() < 0.0001);
    }

    #[test]
    fn test_is_finite_point() {
        assert!(is_finite_point(Vec2::new(1.0, -2.0)));
        assert!(!is_finite_point(Vec2::new(f32::NAN, 0.0)));
        assert!(!is_finite_point(Vec2::new(0.0, f32::INFINITY)));
    }
}
