//! Inbound commands from the input layer
//!
//! Gesture capture turns clicks, drags and button presses into these
//! commands; the core applies them one at a time between timer callbacks.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{EntityId, EntityKind, ObjectType};
use super::state::SimulationState;
use super::surface::{Feature, RenderSurface};

/// Particles the manual "add" actions can create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Ambient,
    Nebula,
}

impl From<ParticleKind> for EntityKind {
    fn from(kind: ParticleKind) -> Self {
        match kind {
            ParticleKind::Ambient => EntityKind::AmbientParticle,
            ParticleKind::Nebula => EntityKind::NebulaParticle,
        }
    }
}

/// A single request from the input layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Throw an object (or place any entity) at a point
    Spawn {
        kind: EntityKind,
        object_type: Option<ObjectType>,
        position: Vec2,
    },
    /// Throw an object by type name; unknown names get the default row
    SpawnNamed { name: String, position: Vec2 },
    /// Add `count` particles on random edges
    Burst { kind: ParticleKind, count: u32 },
    /// Flip a visual feature
    Toggle(Feature),
    /// Clear the session
    Reset,
}

/// What applying a command did
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    Spawned(Vec<EntityId>),
    Toggled(Feature, bool),
    Reset,
}

impl<S: RenderSurface, R: Rng> SimulationState<S, R> {
    pub fn apply(&mut self, command: Command) -> Applied {
        match command {
            Command::Spawn {
                kind,
                object_type,
                position,
            } => Applied::Spawned(vec![self.request_spawn(kind, object_type, position)]),
            Command::SpawnNamed { name, position } => {
                Applied::Spawned(vec![self.request_spawn_named(&name, position)])
            }
            Command::Burst { kind, count } => Applied::Spawned(self.request_burst(kind, count)),
            Command::Toggle(feature) => Applied::Toggled(feature, self.request_toggle(feature)),
            Command::Reset => {
                self.request_reset();
                Applied::Reset
            }
        }
    }

    pub fn request_spawn(
        &mut self,
        kind: EntityKind,
        object_type: Option<ObjectType>,
        position: Vec2,
    ) -> EntityId {
        self.spawn(kind, object_type, position)
    }

    /// Throw an object by name. Unknown names fall back to the default row.
    pub fn request_spawn_named(&mut self, name: &str, position: Vec2) -> EntityId {
        let object_type = ObjectType::parse(name);
        if object_type.is_none() {
            log::debug!("Unknown object type {:?}, using defaults", name);
        }
        self.spawn(EntityKind::ThrownObject, object_type, position)
    }

    /// Spawn `count` particles, each on its own random edge and timer
    pub fn request_burst(&mut self, kind: ParticleKind, count: u32) -> Vec<EntityId> {
        let ids: Vec<EntityId> = (0..count)
            .map(|_| self.spawn_at_edge(kind.into()))
            .collect();
        log::debug!("Added {} {:?} particles", ids.len(), kind);
        ids
    }

    /// The "add particles" button
    pub fn add_particles(&mut self) -> Vec<EntityId> {
        let count = self.settings.particle_burst;
        self.request_burst(ParticleKind::Ambient, count)
    }

    /// The "add nebula" button
    pub fn add_nebula(&mut self) -> Vec<EntityId> {
        let count = self.settings.nebula_burst;
        self.request_burst(ParticleKind::Nebula, count)
    }

    /// Flip a feature and tell the surface. Returns the new state.
    pub fn request_toggle(&mut self, feature: Feature) -> bool {
        let enabled = match feature {
            Feature::Lensing => {
                let enabled = !self.lensing();
                self.set_lensing(enabled);
                enabled
            }
        };
        self.surface.set_feature(feature, enabled);
        log::debug!("{:?} {}", feature, if enabled { "on" } else { "off" });
        enabled
    }

    pub fn request_reset(&mut self) {
        self.reset();
    }
}
