//! Render surface boundary
//!
//! The core hands each entity's motion to the surface once at spawn and
//! afterwards only asks where it currently is. How anything gets painted is
//! the surface's business.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{EntityId, EntityKind, Motion, ObjectType, VisualStyle};

/// Visual toggles passed straight through to the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    /// Gravitational lensing ring around the attractor
    Lensing,
}

/// Everything the surface needs to attach and animate one entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualSpec {
    pub id: EntityId,
    pub kind: EntityKind,
    pub object_type: Option<ObjectType>,
    /// Start position (center)
    pub position: Vec2,
    pub motion: Motion,
    pub style: VisualStyle,
    /// Simulation time the flight starts at
    pub start_time: f64,
}

/// Outbound interface from the core to whatever draws entities
pub trait RenderSurface {
    /// Start showing an entity and animating it along its motion
    fn attach_visual(&mut self, visual: &VisualSpec);

    /// Stop showing an entity. Returns false if it was already gone.
    fn detach_visual(&mut self, id: EntityId) -> bool;

    /// Current on-screen center, or `None` if the surface cannot tell yet
    fn query_position(&self, id: EntityId, now: f64) -> Option<Vec2>;

    fn set_feature(&mut self, _feature: Feature, _enabled: bool) {}
}

/// CSS-style ease-in over normalized time
#[inline]
pub fn ease_in(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Surface without a screen: evaluates the motion curve itself
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    visuals: HashMap<EntityId, VisualSpec>,
    features: HashMap<Feature, bool>,
    attached_total: u64,
    detached_total: u64,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visual_count(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_attached(&self, id: EntityId) -> bool {
        self.visuals.contains_key(&id)
    }

    pub fn visual(&self, id: EntityId) -> Option<&VisualSpec> {
        self.visuals.get(&id)
    }

    pub fn feature(&self, feature: Feature) -> Option<bool> {
        self.features.get(&feature).copied()
    }

    pub fn attached_total(&self) -> u64 {
        self.attached_total
    }

    pub fn detached_total(&self) -> u64 {
        self.detached_total
    }

    /// Drop a visual behind the core's back (e.g. the page removed it)
    pub fn forget(&mut self, id: EntityId) {
        self.visuals.remove(&id);
    }
}

impl RenderSurface for HeadlessSurface {
    fn attach_visual(&mut self, visual: &VisualSpec) {
        self.attached_total += 1;
        self.visuals.insert(visual.id, *visual);
    }

    fn detach_visual(&mut self, id: EntityId) -> bool {
        let removed = self.visuals.remove(&id).is_some();
        if removed {
            self.detached_total += 1;
        }
        removed
    }

    fn query_position(&self, id: EntityId, now: f64) -> Option<Vec2> {
        let visual = self.visuals.get(&id)?;
        let motion = visual.motion;
        if motion.duration <= 0.0 {
            return Some(visual.position + motion.target_delta);
        }
        let t = ((now - visual.start_time) / motion.duration as f64) as f32;
        Some(visual.position + motion.target_delta * ease_in(t))
    }

    fn set_feature(&mut self, feature: Feature, enabled: bool) {
        self.features.insert(feature, enabled);
    }
}

/// Test surface whose positions are set by hand
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ScriptedSurface {
    pub positions: HashMap<EntityId, Vec2>,
    pub attached: HashMap<EntityId, VisualSpec>,
    pub detach_calls: Vec<EntityId>,
}

#[cfg(test)]
impl ScriptedSurface {
    pub fn place(&mut self, id: EntityId, pos: Vec2) {
        self.positions.insert(id, pos);
    }
}

#[cfg(test)]
impl RenderSurface for ScriptedSurface {
    fn attach_visual(&mut self, visual: &VisualSpec) {
        self.attached.insert(visual.id, *visual);
    }

    fn detach_visual(&mut self, id: EntityId) -> bool {
        self.detach_calls.push(id);
        self.attached.remove(&id).is_some()
    }

    fn query_position(&self, id: EntityId, _now: f64) -> Option<Vec2> {
        self.positions.get(&id).copied()
    }
}
