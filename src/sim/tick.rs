//! Per-frame simulation step
//!
//! Core game loop: one call advances the world by the frame's elapsed time.

use super::collision::resolve_collisions;
use super::difficulty::{spawn_interval_ms, world_speed};
use super::machine::{begin_boss_fight, poll_scheduled, start_run};
use super::particles::update_particles;
use super::spawn::spawn_entity;
use super::state::{EntityKind, GamePhase, GameState};
use crate::consts::*;
use crate::{lane_offset, nearest_lane};

/// How far ahead the autopilot looks when choosing a lane
const AUTOPILOT_LOOKAHEAD: f32 = 1500.0;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Lateral steering in [-1, 1]
    pub direction: f32,
    /// Start or restart a run (ignored while a run is active)
    pub start: bool,
}

/// Advance the game state by one frame of `dt` seconds at wall-clock `now_ms`
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64, dt: f32) {
    poll_scheduled(state, now_ms);

    if input.start && !state.phase.is_active() {
        start_run(state, now_ms);
    }

    state.shake.decay(dt);
    state.time_secs += dt;

    if !state.phase.is_active() {
        return;
    }

    state.player.steer(input.direction, dt);

    if state.phase != GamePhase::LevelTransition {
        state.distance += state.speed * dt;
    }

    if state.phase == GamePhase::Playing && state.distance > state.next_boss_distance {
        begin_boss_fight(state);
    }

    if state.phase == GamePhase::Playing
        && !state.has_boss()
        && now_ms - state.last_spawn_ms > spawn_interval_ms(state.score, state.level)
    {
        let id = state.next_entity_id();
        let entity = spawn_entity(&mut state.rng, id, state.level, state.score);
        state.entities.push(entity);
        state.last_spawn_ms = now_ms;
    }

    resolve_collisions(state, dt, now_ms);
    update_particles(&mut state.particles, dt);

    // Frozen during boss fights and level transitions
    if state.phase == GamePhase::Playing {
        state.speed = world_speed(state.score, state.level);
    }
}

/// Steering for demo/headless play: head for the most valuable nearby lane
pub fn autopilot_direction(state: &GameState) -> f32 {
    let mut lane_value = [0.0f32; LANE_COUNT as usize];

    for entity in &state.entities {
        let z = entity.pos.z;
        if z <= 0.0 || z > AUTOPILOT_LOOKAHEAD {
            continue;
        }
        let value = match &entity.kind {
            EntityKind::Block(block) if block.kind.is_positive() => 1.0,
            EntityKind::Boss(_) => continue,
            _ => -3.0,
        };
        let weight = 1.0 - z / AUTOPILOT_LOOKAHEAD;
        lane_value[nearest_lane(entity.pos.x) as usize] += value * weight;
    }

    // Ties keep the current lane
    let current = nearest_lane(state.player.x) as usize;
    let mut best = current;
    for (lane, &value) in lane_value.iter().enumerate() {
        if value > lane_value[best] {
            best = lane;
        }
    }

    let dx = lane_offset(best as u32) - state.player.x;
    if dx.abs() < 8.0 { 0.0 } else { dx.signum() }
}
