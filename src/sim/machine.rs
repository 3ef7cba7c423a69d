//! Game state machine transitions
//!
//! Start -> Playing -> BossFight -> LevelTransition -> Playing ...
//! Any active phase -> GameOver; the final boss fight -> Victory.

use super::difficulty::{level_bonus, next_boss_distance, world_speed};
use super::spawn::spawn_boss;
use super::state::{EntityKind, GameEvent, GamePhase, GameState, Player};
use crate::consts::*;

/// Begin a new run (from Start, GameOver or Victory)
pub fn start_run(state: &mut GameState, now_ms: f64) {
    state.run_id += 1;
    state.scheduler.cancel();

    state.score = STARTING_SCORE;
    state.level = 1;
    state.speed = GAME_SPEED_INITIAL;
    state.entities.clear();
    state.particles.clear();
    state.distance = 0.0;
    state.level_start_distance = 0.0;
    state.next_boss_distance = LEVEL_DISTANCE_BASE;
    state.last_spawn_ms = now_ms;
    state.player = Player::default();
    state.shake = Default::default();
    state.phase = GamePhase::Playing;

    log::info!("Run {} started", state.run_id);
    state.emit(GameEvent::RunStarted {
        run_id: state.run_id,
    });
}

/// Put the level's boss on the road
pub fn begin_boss_fight(state: &mut GameState) {
    let id = state.next_entity_id();
    let boss = spawn_boss(id, state.level);
    let health = match &boss.kind {
        EntityKind::Boss(b) => b.max_health,
        _ => 0,
    };
    state.entities.push(boss);
    state.phase = GamePhase::BossFight;

    log::info!(
        "Boss spawned (level {}, health {}) at distance {:.0}",
        state.level,
        health,
        state.distance
    );
    state.emit(GameEvent::BossSpawned {
        level: state.level,
        health,
    });
}

/// Boss beaten with score to spare: advance the level, or win on the final boss
///
/// The final boss still pays its clear bonus; the level stays at the last one.
pub fn boss_defeated(state: &mut GameState, boss_level: u32, now_ms: f64) {
    if boss_level >= FINAL_BOSS_LEVEL {
        let bonus = level_bonus(boss_level + 1);
        state.score = state.score.saturating_add(bonus);
        log::info!("Final boss cleared (bonus {bonus})");
        end_run(state, true);
        return;
    }

    state.level += 1;
    let bonus = level_bonus(state.level);
    state.score = state.score.saturating_add(bonus);
    state.level_start_distance = state.distance;
    state.next_boss_distance = next_boss_distance(state.distance, state.level);
    state.phase = GamePhase::LevelTransition;
    state.scheduler.schedule(
        state.run_id,
        now_ms,
        LEVEL_TRANSITION_MS,
        GamePhase::Playing,
    );

    log::info!(
        "Level up -> {} (bonus {}, next boss at {:.0})",
        state.level,
        bonus,
        state.next_boss_distance
    );
    state.emit(GameEvent::LevelUp {
        level: state.level,
        bonus,
    });
}

/// Terminal transition; only the first call in a run has any effect
pub fn end_run(state: &mut GameState, victory: bool) {
    if state.phase.is_terminal() {
        return;
    }
    state.scheduler.cancel();

    let (score, level) = (state.score, state.level);
    if victory {
        state.phase = GamePhase::Victory;
        log::info!("Victory! score {score}, level {level}");
        state.emit(GameEvent::Victory { score, level });
    } else {
        state.phase = GamePhase::GameOver;
        log::info!("Game over: score {score}, level {level}");
        state.emit(GameEvent::GameOver { score, level });
    }
}

/// Fire a due scheduled transition for the current run
pub fn poll_scheduled(state: &mut GameState, now_ms: f64) {
    let Some(target) = state.scheduler.poll(state.run_id, now_ms) else {
        return;
    };
    if state.phase != GamePhase::LevelTransition {
        log::debug!("Ignoring transition to {:?} from {:?}", target, state.phase);
        return;
    }
    state.phase = target;
    if target == GamePhase::Playing {
        state.speed = world_speed(state.score, state.level);
        state.last_spawn_ms = now_ms;
    }
    log::info!("Level {} begins", state.level);
}
