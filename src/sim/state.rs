//! Simulation state and entity lifecycle
//!
//! `SimulationState` owns every live entity, the timer queue that expires
//! and polls them, the injected render surface and random source.
//!
//! All destruction funnels through one guarded transition
//! ([`SimulationState::destroy`] and the internal `finish`), so an entity
//! hit by its expiry timer, its consumption poll and a reset in any order is
//! torn down exactly once.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entity::{
    Entity, EntityId, EntityKind, EntityState, EntityTimers, Motion, ObjectType, TypeProfile,
    VisualStyle,
};
use super::scheduler::{Scheduler, TimerAction};
use super::surface::{Feature, RenderSurface, VisualSpec};
use super::trajectory::{edge_spawn_point, plan_fragment, plan_particle, plan_thrown};
use crate::settings::{AreaSize, Settings};

/// Shortest allowed poll period; keeps a zero interval from spinning forever
const MIN_POLL_INTERVAL: f64 = 1e-3;

/// Why an entity left the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyCause {
    /// Its flight duration elapsed
    Expired,
    /// It crossed the event horizon
    Consumed,
    /// Explicit `destroy` call
    Removed,
    /// Session reset
    Reset,
}

/// The whole simulation core for one session
pub struct SimulationState<S: RenderSurface, R: Rng = Pcg32> {
    pub(crate) settings: Settings,
    pub(crate) surface: S,
    pub(crate) rng: R,
    pub(crate) scheduler: Scheduler,
    /// Thrown objects, alive or consuming
    pub(crate) live_objects: BTreeMap<EntityId, Entity>,
    /// Every other live entity
    pub(crate) live_particles: BTreeMap<EntityId, Entity>,
    pub(crate) consumed_total: u64,
    pub(crate) session_start: f64,
    attractor: Vec2,
    lensing: bool,
    next_id: u64,
}

impl<S: RenderSurface> SimulationState<S, Pcg32> {
    /// Create a state whose generator is seeded from the thread RNG
    pub fn with_entropy(settings: Settings, surface: S) -> Self {
        let rng = Pcg32::from_rng(&mut rand::rng());
        Self::new(settings, surface, rng)
    }
}

impl<S: RenderSurface, R: Rng> SimulationState<S, R> {
    pub fn new(settings: Settings, surface: S, rng: R) -> Self {
        if let Err(e) = settings.validate() {
            log::warn!("Starting with invalid settings: {}", e);
        }
        let attractor = settings.area.center();
        let lensing = settings.lensing;
        Self {
            settings,
            surface,
            rng,
            scheduler: Scheduler::new(),
            live_objects: BTreeMap::new(),
            live_particles: BTreeMap::new(),
            consumed_total: 0,
            session_start: 0.0,
            attractor,
            lensing,
            next_id: 1,
        }
    }

    /// Start the session: push feature toggles to the surface and seed the
    /// initial ambient particles.
    pub fn init(&mut self) {
        self.surface.set_feature(Feature::Lensing, self.lensing);
        let count = self.settings.initial_particles;
        for _ in 0..count {
            self.spawn_at_edge(EntityKind::AmbientParticle);
        }
        log::info!(
            "Simulation started: {}x{} area, {} initial particles",
            self.settings.area.width,
            self.settings.area.height,
            count
        );
    }

    // === Accessors ===

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Current simulation time (seconds)
    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    pub fn attractor(&self) -> Vec2 {
        self.attractor
    }

    pub fn lensing(&self) -> bool {
        self.lensing
    }

    pub(crate) fn set_lensing(&mut self, enabled: bool) {
        self.lensing = enabled;
    }

    pub fn consumed_total(&self) -> u64 {
        self.consumed_total
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.live_objects
            .get(&id)
            .or_else(|| self.live_particles.get(&id))
    }

    pub fn is_live(&self, id: EntityId) -> bool {
        self.entity(id).is_some()
    }

    /// Thrown objects in id order
    pub fn live_objects(&self) -> impl Iterator<Item = &Entity> {
        self.live_objects.values()
    }

    /// Particles and fragments in id order
    pub fn live_particles(&self) -> impl Iterator<Item = &Entity> {
        self.live_particles.values()
    }

    /// Timers that will still fire
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// Resize the simulation area; the attractor follows its center.
    /// Sizes that are not finite and positive keep the previous area.
    pub fn resize(&mut self, width: f32, height: f32) {
        let usable = |v: f32| v.is_finite() && v > 0.0;
        if !(usable(width) && usable(height)) {
            log::warn!(
                "Ignoring resize to {}x{}, keeping {}x{}",
                width,
                height,
                self.settings.area.width,
                self.settings.area.height
            );
            return;
        }
        self.settings.area = AreaSize::new(width, height);
        self.attractor = self.settings.area.center();
        log::debug!("Area resized to {}x{}", width, height);
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    // === Spawning ===

    /// Spawn an entity at `position` and plan its flight.
    ///
    /// `object_type` only matters for thrown objects; `None` there means the
    /// default row of the type table.
    pub fn spawn(
        &mut self,
        kind: EntityKind,
        object_type: Option<ObjectType>,
        position: Vec2,
    ) -> EntityId {
        let profile = TypeProfile::lookup(object_type);
        let (motion, style) = match kind {
            EntityKind::ThrownObject => (
                plan_thrown(profile, position, self.attractor, &mut self.rng),
                VisualStyle::for_object(profile),
            ),
            EntityKind::AmbientParticle | EntityKind::NebulaParticle => (
                plan_particle(kind, position, self.attractor, &mut self.rng),
                VisualStyle::particle(kind, &mut self.rng),
            ),
            EntityKind::Fragment => (plan_fragment(&mut self.rng), VisualStyle::fragment(profile)),
        };
        self.register(kind, object_type, position, motion, style)
    }

    /// Spawn an ambient or nebula particle on a random edge of the area
    pub fn spawn_at_edge(&mut self, kind: EntityKind) -> EntityId {
        let position = edge_spawn_point(&self.settings.area, &mut self.rng);
        self.spawn(kind, None, position)
    }

    /// Insert a planned entity, show it and arm its timers
    pub(crate) fn register(
        &mut self,
        kind: EntityKind,
        object_type: Option<ObjectType>,
        position: Vec2,
        motion: Motion,
        style: VisualStyle,
    ) -> EntityId {
        let id = self.next_entity_id();
        let now = self.now();
        let mut entity = Entity::new(id, kind, object_type, position, motion, now);

        let expiry = self
            .scheduler
            .schedule_once(motion.duration.max(0.0) as f64, TimerAction::Expire(id));
        let poll = kind.is_consumable().then(|| {
            let period = self.settings.poll_interval.max(MIN_POLL_INTERVAL);
            self.scheduler.schedule_repeating(period, TimerAction::Poll(id))
        });
        entity.timers = EntityTimers {
            expiry: Some(expiry),
            poll,
        };

        self.surface.attach_visual(&VisualSpec {
            id,
            kind,
            object_type: entity.object_type,
            position,
            motion,
            style,
            start_time: now,
        });

        log::debug!(
            "Spawned {:?} {} ({:?}) at ({:.1}, {:.1}), {:.2}s flight",
            kind,
            id,
            entity.object_type,
            position.x,
            position.y,
            motion.duration
        );

        if kind.is_consumable() {
            self.live_objects.insert(id, entity);
        } else {
            self.live_particles.insert(id, entity);
        }
        id
    }

    // === Destruction ===

    /// Destroy an entity. A no-op returning `None` if it is already gone.
    pub fn destroy(&mut self, id: EntityId) -> Option<Entity> {
        self.finish(id, DestroyCause::Removed)
    }

    /// The single guarded terminal transition.
    ///
    /// Removes the entity from its collection, cancels every pending timer it
    /// owns and detaches its visual. Once this returns, no callback for `id`
    /// will run.
    pub(crate) fn finish(&mut self, id: EntityId, cause: DestroyCause) -> Option<Entity> {
        let mut entity = self
            .live_objects
            .remove(&id)
            .or_else(|| self.live_particles.remove(&id))?;

        if !entity.advance_state(EntityState::Destroyed) {
            return None;
        }

        if let Some(timer) = entity.timers.expiry.take() {
            self.scheduler.cancel(timer);
        }
        if let Some(timer) = entity.timers.poll.take() {
            self.scheduler.cancel(timer);
        }

        if !self.surface.detach_visual(id) {
            log::debug!("Visual for {} was already gone", id);
        }

        log::debug!("Destroyed {:?} {} ({:?})", entity.kind, id, cause);
        Some(entity)
    }

    /// Duration timeout: destroy unconditionally if still live
    fn expire(&mut self, id: EntityId) {
        self.finish(id, DestroyCause::Expired);
    }

    /// Destroy everything without bursts and start a fresh session clock
    pub fn reset(&mut self) {
        let ids: Vec<EntityId> = self
            .live_objects
            .keys()
            .chain(self.live_particles.keys())
            .copied()
            .collect();
        let count = ids.len();
        for id in ids {
            self.finish(id, DestroyCause::Reset);
        }
        // Every timer belongs to an entity; anything left is stale
        self.scheduler.clear();

        self.consumed_total = 0;
        self.session_start = self.now();
        log::info!("Simulation reset ({} entities cleared)", count);
    }

    // === Clock ===

    /// Advance the clock by `dt` seconds
    pub fn advance(&mut self, dt: f64) {
        let target = self.now() + dt.max(0.0);
        self.advance_to(target);
    }

    /// Run every timer due up to `t`, in order, then move the clock to `t`
    pub fn advance_to(&mut self, t: f64) {
        while let Some(fired) = self.scheduler.pop_due(t) {
            match fired.action {
                TimerAction::Expire(id) => self.expire(id),
                TimerAction::Poll(id) => self.poll_consumption(id),
            }
        }
        self.scheduler.set_now(t);
    }
}
