//! Entity model and the static object type table

use std::fmt;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::scheduler::TimerId;
use crate::consts::*;

/// Opaque entity identity. Allocated monotonically and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What an entity is, which decides how it can die
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// User-spawned object, subject to consumption detection
    ThrownObject,
    /// Small drifting particle (expires by timeout)
    AmbientParticle,
    /// Large slow nebula cloud (expires by timeout)
    NebulaParticle,
    /// Disintegration debris (expires by timeout)
    Fragment,
}

impl EntityKind {
    /// Only thrown objects are polled against the event horizon
    pub fn is_consumable(&self) -> bool {
        matches!(self, EntityKind::ThrownObject)
    }
}

/// Object types a user can throw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    Star,
    Planet,
    Spaceship,
    Asteroid,
}

impl ObjectType {
    pub const ALL: [ObjectType; 4] = [
        ObjectType::Star,
        ObjectType::Planet,
        ObjectType::Spaceship,
        ObjectType::Asteroid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Star => "star",
            ObjectType::Planet => "planet",
            ObjectType::Spaceship => "spaceship",
            ObjectType::Asteroid => "asteroid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "star" => Some(ObjectType::Star),
            "planet" => Some(ObjectType::Planet),
            "spaceship" | "ship" => Some(ObjectType::Spaceship),
            "asteroid" => Some(ObjectType::Asteroid),
            _ => None,
        }
    }

    pub fn profile(&self) -> &'static TypeProfile {
        TypeProfile::lookup(Some(*self))
    }
}

/// Static per-type properties
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeProfile {
    pub mass: f32,
    /// Visual diameter
    pub size: f32,
    /// 0xRRGGBB
    pub color: u32,
    /// Fragment color when the object is consumed
    pub burst_color: u32,
}

static STAR: TypeProfile = TypeProfile {
    mass: 5.0,
    size: 30.0,
    color: 0xa0e0ff,
    burst_color: 0xa0e0ff,
};

static PLANET: TypeProfile = TypeProfile {
    mass: 3.0,
    size: 24.0,
    color: 0xffaa00,
    burst_color: 0xff5500,
};

static SPACESHIP: TypeProfile = TypeProfile {
    mass: 1.0,
    size: 18.0,
    color: 0x6060ff,
    burst_color: 0x6060ff,
};

static ASTEROID: TypeProfile = TypeProfile {
    mass: 2.0,
    size: 15.0,
    color: 0x888888,
    burst_color: 0x888888,
};

/// Row used for unknown or missing types
pub static DEFAULT_PROFILE: TypeProfile = TypeProfile {
    mass: DEFAULT_MASS,
    size: 20.0,
    color: 0xffffff,
    burst_color: 0xffffff,
};

impl TypeProfile {
    pub fn lookup(object_type: Option<ObjectType>) -> &'static TypeProfile {
        match object_type {
            Some(ObjectType::Star) => &STAR,
            Some(ObjectType::Planet) => &PLANET,
            Some(ObjectType::Spaceship) => &SPACESHIP,
            Some(ObjectType::Asteroid) => &ASTEROID,
            None => &DEFAULT_PROFILE,
        }
    }
}

/// Terminal-state machine. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntityState {
    Alive,
    /// Crossed the horizon, burst in progress
    Consuming,
    Destroyed,
}

/// Motion parameters handed to the render surface once at spawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    /// Total displacement over the flight
    pub target_delta: Vec2,
    /// Flight time in seconds
    pub duration: f32,
}

/// Visual parameters passed to the surface (the core keeps no color state)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualStyle {
    pub size: f32,
    pub color: u32,
}

impl VisualStyle {
    pub fn for_object(profile: &TypeProfile) -> Self {
        Self {
            size: profile.size,
            color: profile.color,
        }
    }

    pub fn fragment(profile: &TypeProfile) -> Self {
        Self {
            size: FRAGMENT_SIZE,
            color: profile.burst_color,
        }
    }

    /// Randomized look for ambient and nebula particles
    pub fn particle(kind: EntityKind, rng: &mut impl Rng) -> Self {
        match kind {
            EntityKind::NebulaParticle => {
                // Pinks and purples
                let palette = [0xff66cc, 0xaa66ff, 0x6688ff, 0xff88aa];
                Self {
                    size: rng.random_range(20.0..60.0),
                    color: palette[rng.random_range(0..palette.len())],
                }
            }
            _ => Self {
                size: rng.random_range(1.0..3.0),
                color: 0xffffff,
            },
        }
    }
}

/// Pending timers owned by an entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct EntityTimers {
    pub expiry: Option<TimerId>,
    pub poll: Option<TimerId>,
}

/// A live object or particle
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Set only for thrown objects with a known type
    pub object_type: Option<ObjectType>,
    pub mass: f32,
    /// Last sampled center position
    pub position: Vec2,
    pub spawn_position: Vec2,
    pub motion: Motion,
    pub spawn_time: f64,
    pub state: EntityState,
    pub(crate) timers: EntityTimers,
}

impl Entity {
    pub fn new(
        id: EntityId,
        kind: EntityKind,
        object_type: Option<ObjectType>,
        spawn_position: Vec2,
        motion: Motion,
        spawn_time: f64,
    ) -> Self {
        let mass = if kind.is_consumable() {
            TypeProfile::lookup(object_type).mass
        } else {
            DEFAULT_MASS
        };
        Self {
            id,
            kind,
            object_type: if kind.is_consumable() { object_type } else { None },
            mass,
            position: spawn_position,
            spawn_position,
            motion,
            spawn_time,
            state: EntityState::Alive,
            timers: EntityTimers::default(),
        }
    }

    pub fn profile(&self) -> &'static TypeProfile {
        TypeProfile::lookup(self.object_type)
    }

    /// Time at which the duration timeout fires
    pub fn expires_at(&self) -> f64 {
        self.spawn_time + self.motion.duration as f64
    }

    /// Move to `next` if it is strictly later in the state machine
    pub fn advance_state(&mut self, next: EntityState) -> bool {
        if next > self.state {
            self.state = next;
            true
        } else {
            false
        }
    }
}
