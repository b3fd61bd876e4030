//! Session statistics
//!
//! Read-only view over the live collections. Taking `&self` means a snapshot
//! can never observe a spawn or destroy half-way through.

use std::fmt;

use rand::Rng;
use serde::Serialize;

use super::state::SimulationState;
use super::surface::RenderSurface;

/// Counts shown by the stats display
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Snapshot {
    /// Thrown objects alive or being consumed
    pub live_object_count: usize,
    /// Thrown objects consumed since the last reset
    pub consumed_total: u64,
    /// Ambient, nebula and fragment entities alive
    pub live_particle_count: usize,
    /// Seconds since the session started or was last reset
    pub elapsed: f64,
}

impl Snapshot {
    /// Whole seconds, as the stats line shows them
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed.max(0.0).floor() as u64
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "objects: {} | consumed: {} | particles: {} | time: {}s",
            self.live_object_count,
            self.consumed_total,
            self.live_particle_count,
            self.elapsed_secs()
        )
    }
}

impl<S: RenderSurface, R: Rng> SimulationState<S, R> {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            live_object_count: self.live_objects.len(),
            consumed_total: self.consumed_total,
            live_particle_count: self.live_particles.len(),
            elapsed: self.now() - self.session_start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::entity::{EntityKind, ObjectType};
    use crate::sim::surface::HeadlessSurface;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn state() -> SimulationState<HeadlessSurface> {
        SimulationState::new(Settings::default(), HeadlessSurface::new(), Pcg32::seed_from_u64(5))
    }

    #[test]
    fn test_snapshot_counts() {
        let mut s = state();
        s.spawn(EntityKind::ThrownObject, Some(ObjectType::Star), Vec2::ZERO);
        s.spawn(EntityKind::ThrownObject, None, Vec2::ZERO);
        s.spawn(EntityKind::NebulaParticle, None, Vec2::ZERO);
        s.advance(1.5);

        let snap = s.snapshot();
        assert_eq!(snap.live_object_count, 2);
        assert_eq!(snap.live_particle_count, 1);
        assert_eq!(snap.consumed_total, 0);
        assert!((snap.elapsed - 1.5).abs() < 1e-9);
        assert_eq!(snap.elapsed_secs(), 1);
    }

    #[test]
    fn test_snapshot_after_reset_is_zero() {
        let mut s = state();
        s.init();
        s.spawn(EntityKind::ThrownObject, Some(ObjectType::Planet), Vec2::ZERO);
        s.advance(3.0);
        s.reset();

        let snap = s.snapshot();
        assert_eq!(snap.live_object_count, 0);
        assert_eq!(snap.live_particle_count, 0);
        assert_eq!(snap.consumed_total, 0);
        assert!(snap.elapsed.abs() < 1e-9);

        s.advance(2.0);
        assert!((s.snapshot().elapsed - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_display_line() {
        let snap = Snapshot {
            live_object_count: 2,
            consumed_total: 7,
            live_particle_count: 41,
            elapsed: 12.9,
        };
        assert_eq!(
            snap.to_string(),
            "objects: 2 | consumed: 7 | particles: 41 | time: 12s"
        );
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let snap = Snapshot {
            live_object_count: 1,
            consumed_total: 2,
            live_particle_count: 3,
            elapsed: 4.5,
        };
        let value = serde_json::to_value(snap).unwrap();
        assert_eq!(value["live_object_count"], 1);
        assert_eq!(value["consumed_total"], 2);
        assert_eq!(value["live_particle_count"], 3);
        assert_eq!(value["elapsed"], 4.5);
    }
}
