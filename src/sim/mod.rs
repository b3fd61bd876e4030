//! Simulation core
//!
//! Everything that decides what exists, where it is heading and when it
//! disappears. Nothing in here draws:
//! - Single-threaded, driven by a virtual clock and cooperative timers
//! - Random source and render surface are injected
//! - One guarded destroy path for timeouts, horizon crossings and resets

pub mod burst;
pub mod detector;
pub mod entity;
pub mod input;
pub mod scheduler;
pub mod state;
pub mod stats;
pub mod surface;
pub mod trajectory;

pub use burst::fragment_count;
pub use detector::inside_horizon;
pub use entity::{
    Entity, EntityId, EntityKind, EntityState, Motion, ObjectType, TypeProfile, VisualStyle,
    DEFAULT_PROFILE,
};
pub use input::{Applied, Command, ParticleKind};
pub use scheduler::{Scheduler, TimerAction, TimerId};
pub use state::{DestroyCause, SimulationState};
pub use stats::Snapshot;
pub use surface::{Feature, HeadlessSurface, RenderSurface, VisualSpec, ease_in};
pub use trajectory::{
    edge_spawn_point, gravity_factor, min_fall_time, plan_fragment, plan_particle, plan_thrown,
    target_spread,
};
