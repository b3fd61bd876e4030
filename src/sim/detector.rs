//! Event horizon consumption detection
//!
//! Thrown objects move on the surface's timeline, not ours, so each one is
//! polled on a fixed cadence: ask the surface where it is, and if it is
//! inside the horizon, burst it and destroy it. Detection latency is at most
//! one poll interval.

use glam::Vec2;
use rand::Rng;

use super::entity::{EntityId, EntityState};
use super::state::{DestroyCause, SimulationState};
use super::surface::RenderSurface;
use crate::is_finite_point;

/// True if a sampled position is strictly inside the horizon.
///
/// Missing or non-finite samples count as "not there yet".
pub fn inside_horizon(position: Option<Vec2>, center: Vec2, radius: f32) -> bool {
    match position {
        Some(p) if is_finite_point(p) => p.distance(center) < radius,
        _ => false,
    }
}

impl<S: RenderSurface, R: Rng> SimulationState<S, R> {
    /// One consumption check for a thrown object (poll timer callback)
    pub(crate) fn poll_consumption(&mut self, id: EntityId) {
        let now = self.now();
        let center = self.attractor();
        let radius = self.settings.horizon_radius;
        let sampled = self.surface.query_position(id, now);

        let Some(entity) = self.live_objects.get_mut(&id) else {
            return;
        };
        if entity.state != EntityState::Alive {
            return;
        }
        if let Some(p) = sampled.filter(|p| is_finite_point(*p)) {
            entity.position = p;
        }
        if !inside_horizon(sampled, center, radius) {
            log::trace!("Poll {}: outside horizon", id);
            return;
        }

        entity.advance_state(EntityState::Consuming);
        let (position, object_type, mass) = (entity.position, entity.object_type, entity.mass);
        log::info!(
            "{} ({:?}) consumed at ({:.1}, {:.1})",
            id,
            object_type,
            position.x,
            position.y
        );

        self.burst(position, object_type, mass);
        if self.finish(id, DestroyCause::Consumed).is_some() {
            self.consumed_total += 1;
        }
    }
}
