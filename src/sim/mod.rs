//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Seeded RNG only
//! - Time comes in as arguments (frame dt and wall-clock ms)
//! - Stable iteration order (spawn order, resolved back to front)
//! - No rendering or platform dependencies

pub mod camera;
pub mod clock;
pub mod collision;
pub mod difficulty;
pub mod machine;
pub mod particles;
pub mod schedule;
pub mod spawn;
pub mod state;
pub mod tick;

pub use camera::{Projected, Projector, ScreenShake};
pub use clock::FrameClock;
pub use collision::{in_depth_window, overlaps_player, resolve_collisions};
pub use difficulty::{speed_intensity, spawn_interval_ms, world_speed};
pub use schedule::Scheduler;
pub use state::{
    Block, BlockKind, Boss, Entity, EntityKind, GameEvent, GamePhase, GameState, Particle, Player,
};
pub use tick::{TickInput, autopilot_direction, tick};
