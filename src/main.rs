//! Event Horizon entry point
//!
//! Headless session driver: runs the simulation core against a surface that
//! evaluates motion itself and logs the stats line once per simulated second.
//!
//! Usage: `event-horizon [settings.json]` (set `RUST_LOG=debug` for entity traces)

use event_horizon::sim::{Command, EntityKind, HeadlessSurface, ObjectType, ParticleKind};
use event_horizon::{Settings, SimulationState};
use glam::Vec2;

/// Display/tick cadence (60 Hz)
const FRAME_DT: f64 = 1.0 / 60.0;
/// Simulated session length in seconds
const SESSION_SECS: u32 = 20;

fn main() {
    env_logger::init();
    log::info!("Event Horizon (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    let area = settings.area;

    let mut sim = SimulationState::with_entropy(settings, HeadlessSurface::new());
    sim.init();

    // One of each type from the corners, plus a manual particle burst
    let corners = [
        Vec2::new(0.0, 0.0),
        Vec2::new(area.width, 0.0),
        Vec2::new(area.width, area.height),
        Vec2::new(0.0, area.height),
    ];
    for (object_type, corner) in ObjectType::ALL.iter().zip(corners) {
        sim.apply(Command::Spawn {
            kind: EntityKind::ThrownObject,
            object_type: Some(*object_type),
            position: corner,
        });
    }
    sim.apply(Command::Burst {
        kind: ParticleKind::Nebula,
        count: sim.settings().nebula_burst,
    });

    let frames_per_sec = (1.0 / FRAME_DT).round() as u32;
    for second in 1..=SESSION_SECS {
        for _ in 0..frames_per_sec {
            sim.advance(FRAME_DT);
        }
        log::info!("{}", sim.snapshot());

        // Keep something falling in
        if second % 5 == 0 {
            sim.apply(Command::SpawnNamed {
                name: "star".to_string(),
                position: Vec2::new(area.width * 0.1, area.height * 0.5),
            });
            sim.add_particles();
        }
    }

    let snap = sim.snapshot();
    match serde_json::to_string(&snap) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize snapshot: {}", e),
    }
}
