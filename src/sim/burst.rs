//! Disintegration bursts ("spaghettification")
//!
//! A consumed object breaks into `20 + 5 * mass` fragments that fly outward
//! from the point where it crossed the horizon. Fragments are ordinary
//! entities: they expire on their own timers and are never consumed.

use glam::Vec2;
use rand::Rng;

use super::entity::{EntityId, EntityKind, ObjectType, TypeProfile, VisualStyle};
use super::state::SimulationState;
use super::surface::RenderSurface;
use super::trajectory::plan_fragment;
use crate::consts::*;

/// Fragments produced by consuming an object of the given mass
#[inline]
pub fn fragment_count(mass: f32) -> u32 {
    (BURST_BASE as f32 + mass.max(0.0) * BURST_PER_MASS as f32).round() as u32
}

impl<S: RenderSurface, R: Rng> SimulationState<S, R> {
    /// Spawn a burst of fragments at `position`, colored by `object_type`
    pub fn burst(
        &mut self,
        position: Vec2,
        object_type: Option<ObjectType>,
        mass: f32,
    ) -> Vec<EntityId> {
        let count = fragment_count(mass);
        let style = VisualStyle::fragment(TypeProfile::lookup(object_type));
        let mut ids = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let motion = plan_fragment(&mut self.rng);
            ids.push(self.register(EntityKind::Fragment, None, position, motion, style));
        }
        log::debug!(
            "Burst of {} fragments at ({:.1}, {:.1})",
            count,
            position.x,
            position.y
        );
        ids
    }
}
