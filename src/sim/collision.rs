//! Collision detection and score resolution
//!
//! Entities scroll toward the player every tick. Anything inside the depth
//! window that overlaps the player laterally is consumed exactly once.

use super::machine::{boss_defeated, end_run};
use super::particles::spawn_burst;
use super::state::{BlockKind, Entity, EntityKind, GameEvent, GameState, Player};
use crate::consts::*;
use crate::palette::{self, Color};

/// Particle count for a block pickup or penalty
const BLOCK_BURST: usize = 15;
const ENEMY_BURST: usize = 20;
const BOSS_BURST: usize = 50;

const PENALTY_SHAKE: f32 = 5.0;
const ENEMY_SHAKE: f32 = 10.0;
const DEATH_SHAKE: f32 = 20.0;
const BOSS_SHAKE: f32 = 30.0;

/// Whether a depth lies inside the symmetric window around the player plane
#[inline]
pub fn in_depth_window(z: f32) -> bool {
    z.abs() < COLLISION_DEPTH
}

/// Lateral overlap test. Bosses span the road and always overlap.
pub fn overlaps_player(entity: &Entity, player: &Player) -> bool {
    if entity.is_boss() {
        return true;
    }
    let reach = player.width / 2.0 + 0.8 * (entity.width / 2.0);
    (entity.pos.x - player.x).abs() < reach
}

/// Move every entity toward the player, resolve hits and drop entities
/// that slipped behind the camera.
///
/// Iterates from the back so removals never skip an element. Once the run
/// ends no further hits are resolved this tick.
pub fn resolve_collisions(state: &mut GameState, dt: f32, now_ms: f64) {
    let travel = state.speed * dt;

    for i in (0..state.entities.len()).rev() {
        state.entities[i].pos.z -= travel;
        let entity = &state.entities[i];

        if !state.phase.is_terminal()
            && in_depth_window(entity.pos.z)
            && overlaps_player(entity, &state.player)
        {
            let entity = state.entities.remove(i);
            resolve_hit(state, entity, now_ms);
            continue;
        }

        if entity.pos.z < DESPAWN_Z {
            state.entities.remove(i);
        }
    }
}

/// Apply one collision to the score and trigger its feedback
fn resolve_hit(state: &mut GameState, entity: Entity, now_ms: f64) {
    match entity.kind {
        EntityKind::Block(block) => {
            burst_at_player(state, entity.color, BLOCK_BURST, 1.0);
            state.score = block.kind.apply(state.score, block.value);
            match block.kind {
                BlockKind::Add | BlockKind::Mult => {
                    state.emit(GameEvent::Collected { kind: block.kind });
                }
                BlockKind::Sub | BlockKind::Div => {
                    state.shake.trigger(PENALTY_SHAKE);
                    state.emit(GameEvent::Penalty { kind: block.kind });
                }
                BlockKind::Death => {
                    state.shake.trigger(DEATH_SHAKE);
                    state.emit(GameEvent::Death);
                }
            }
        }
        EntityKind::Enemy { power } => {
            burst_at_player(state, entity.color, ENEMY_BURST, 1.0);
            state.score = state.score.saturating_sub(power);
            state.shake.trigger(ENEMY_SHAKE);
            state.emit(GameEvent::Crash { power });
        }
        EntityKind::Boss(boss) => {
            burst_at_player(state, palette::BOSS, BOSS_BURST, 2.0);
            state.score = state.score.saturating_sub(boss.current_health);
            state.shake.trigger(BOSS_SHAKE);

            if state.score > 0 {
                log::info!(
                    "Boss {} defeated with {} to spare",
                    boss.level,
                    state.score
                );
                boss_defeated(state, boss.level, now_ms);
            } else {
                log::info!("Lost boss battle (score {})", state.score);
                state.emit(GameEvent::Death);
                end_run(state, false);
            }
        }
    }

    if state.score < 0 {
        end_run(state, false);
    }
}

/// Particle burst at the player's projected screen position, jittered by
/// the shake already in effect before this hit
fn burst_at_player(state: &mut GameState, color: Color, count: usize, scale: f32) {
    let projector = state.projector();
    let origin = projector
        .project(state.player.world_pos(), &state.shake, &mut state.rng)
        .pos;
    let cap = state.max_particles;
    spawn_burst(
        &mut state.particles,
        &mut state.rng,
        origin,
        color,
        count,
        scale,
        cap,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::machine::{poll_scheduled, start_run};
    use crate::sim::spawn::spawn_boss;
    use crate::sim::state::{Block, GamePhase};
    use glam::Vec3;
    use proptest::prelude::*;

    fn playing_state(score: i64) -> GameState {
        let mut state = GameState::new(2024);
        start_run(&mut state, 0.0);
        state.score = score;
        state.drain_events();
        state
    }

    fn push_block(state: &mut GameState, kind: BlockKind, value: i64, x: f32, z: f32) {
        let id = state.next_entity_id();
        state.entities.push(Entity {
            id,
            pos: Vec3::new(x, 0.0, z),
            width: BLOCK_SIZE,
            height: BLOCK_SIZE,
            color: kind.color(),
            kind: EntityKind::Block(Block::new(kind, value)),
        });
    }

    fn push_boss(state: &mut GameState, level: u32) {
        let id = state.next_entity_id();
        let mut boss = spawn_boss(id, level);
        boss.pos.z = 0.0;
        state.entities.push(boss);
        state.phase = GamePhase::BossFight;
    }

    #[test]
    fn test_depth_window_is_strict() {
        assert!(in_depth_window(0.0));
        assert!(in_depth_window(149.9));
        assert!(in_depth_window(-149.9));
        assert!(!in_depth_window(150.0));
        assert!(!in_depth_window(-150.0));
    }

    #[test]
    fn test_basic_collect() {
        let mut state = playing_state(20);
        push_block(&mut state, BlockKind::Add, 10, 0.0, 0.0);

        resolve_collisions(&mut state, 0.0, 0.0);

        assert_eq!(state.score, 30);
        assert!(state.entities.is_empty());
        assert_eq!(state.particles.len(), BLOCK_BURST);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Collected {
                kind: BlockKind::Add
            }]
        );
    }

    #[test]
    fn test_division_floor() {
        let mut state = playing_state(7);
        push_block(&mut state, BlockKind::Div, 2, 0.0, 0.0);
        resolve_collisions(&mut state, 0.0, 0.0);
        assert_eq!(state.score, 3);
        assert_eq!(state.shake.intensity(), PENALTY_SHAKE);
    }

    #[test]
    fn test_instant_death() {
        let mut state = playing_state(50);
        push_block(&mut state, BlockKind::Death, 0, 0.0, 0.0);
        resolve_collisions(&mut state, 0.0, 0.0);

        assert_eq!(state.score, -1);
        assert_eq!(state.phase, GamePhase::GameOver);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Death));
        assert!(events.contains(&GameEvent::GameOver { score: -1, level: 1 }));
    }

    #[test]
    fn test_enemy_can_end_run() {
        let mut state = playing_state(10);
        let id = state.next_entity_id();
        state.entities.push(Entity {
            id,
            pos: Vec3::ZERO,
            width: BLOCK_SIZE,
            height: BLOCK_SIZE,
            color: palette::ENEMY,
            kind: EntityKind::Enemy { power: 25 },
        });
        resolve_collisions(&mut state, 0.0, 0.0);

        assert_eq!(state.score, -15);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.particles.len(), ENEMY_BURST);
    }

    #[test]
    fn test_level_up_after_boss() {
        let mut state = playing_state(200);
        push_boss(&mut state, 1);

        resolve_collisions(&mut state, 0.0, 1000.0);

        // 200 - 150 = 50, then +100 bonus for reaching level 2
        assert_eq!(state.level, 2);
        assert_eq!(state.score, 150);
        assert_eq!(state.phase, GamePhase::LevelTransition);
        assert!(!state.has_boss());
        assert_eq!(state.shake.intensity(), BOSS_SHAKE);

        poll_scheduled(&mut state, 1000.0 + LEVEL_TRANSITION_MS);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_boss_battle_lost() {
        let mut state = playing_state(100);
        push_boss(&mut state, 1);

        resolve_collisions(&mut state, 0.0, 0.0);

        assert_eq!(state.score, -50);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_boss_battle_exact_zero_is_defeat() {
        let mut state = playing_state(150);
        push_boss(&mut state, 1);
        resolve_collisions(&mut state, 0.0, 0.0);
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_boss_ignores_lateral_position() {
        let mut state = playing_state(500);
        state.player.x = state.player.x_limit();
        push_boss(&mut state, 1);
        resolve_collisions(&mut state, 0.0, 0.0);
        assert_eq!(state.phase, GamePhase::LevelTransition);
    }

    #[test]
    fn test_other_lane_is_missed() {
        let mut state = playing_state(20);
        push_block(&mut state, BlockKind::Add, 10, crate::lane_offset(4), 0.0);
        resolve_collisions(&mut state, 0.0, 0.0);
        assert_eq!(state.score, 20);
        assert_eq!(state.entities.len(), 1);
    }

    #[test]
    fn test_depth_culling_is_silent() {
        let mut state = playing_state(20);
        push_block(&mut state, BlockKind::Sub, 10, crate::lane_offset(4), -150.0);
        push_block(&mut state, BlockKind::Add, 10, crate::lane_offset(0), 2000.0);

        // 600 * 0.1 = 60 units of travel
        resolve_collisions(&mut state, 0.1, 0.0);

        assert_eq!(state.entities.len(), 1);
        assert!((state.entities[0].pos.z - 1940.0).abs() < 1e-3);
        assert_eq!(state.score, 20);
        assert!(state.particles.is_empty());
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_no_hits_after_run_ends() {
        let mut state = playing_state(50);
        // Resolved first (iteration runs from the back)
        push_block(&mut state, BlockKind::Add, 40, 0.0, 0.0);
        push_block(&mut state, BlockKind::Death, 0, 0.0, 0.0);

        resolve_collisions(&mut state, 0.0, 0.0);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score, -1);
        assert_eq!(state.entities.len(), 1);
    }

    #[test]
    fn test_simultaneous_hits_all_resolve() {
        let mut state = playing_state(20);
        push_block(&mut state, BlockKind::Add, 10, 0.0, 10.0);
        push_block(&mut state, BlockKind::Mult, 2, 0.0, -10.0);
        push_block(&mut state, BlockKind::Add, 5, 0.0, 0.0);

        resolve_collisions(&mut state, 0.0, 0.0);

        // Back to front: +5, x2, +10
        assert_eq!(state.score, 60);
        assert!(state.entities.is_empty());
        assert_eq!(state.particles.len(), BLOCK_BURST * 3);
    }

    #[test]
    fn test_huge_multiplier_keeps_run_alive() {
        let mut state = playing_state(i64::MAX / 2 + 1);
        push_block(&mut state, BlockKind::Mult, 2, 0.0, 0.0);
        resolve_collisions(&mut state, 0.0, 0.0);

        assert_eq!(state.score, i64::MAX);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    fn player_origin(state: &GameState) -> glam::Vec2 {
        state
            .projector()
            .project_steady(state.player.world_pos())
            .pos
    }

    #[test]
    fn test_enemy_burst_origin_is_steady() {
        let mut state = playing_state(500);
        let id = state.next_entity_id();
        state.entities.push(Entity {
            id,
            pos: Vec3::ZERO,
            width: BLOCK_SIZE,
            height: BLOCK_SIZE,
            color: palette::ENEMY,
            kind: EntityKind::Enemy { power: 5 },
        });
        let origin = player_origin(&state);

        resolve_collisions(&mut state, 0.0, 0.0);

        assert_eq!(state.particles.len(), ENEMY_BURST);
        assert!(state.particles.iter().all(|p| p.pos == origin));
        assert_eq!(state.shake.intensity(), ENEMY_SHAKE);
    }

    #[test]
    fn test_boss_burst_origin_is_steady() {
        let mut state = playing_state(500);
        push_boss(&mut state, 1);
        let origin = player_origin(&state);

        resolve_collisions(&mut state, 0.0, 0.0);

        assert_eq!(state.particles.len(), BOSS_BURST);
        assert!(state.particles.iter().all(|p| p.pos == origin));
        assert_eq!(state.shake.intensity(), BOSS_SHAKE);
    }

    proptest! {
        #[test]
        fn prop_add_then_sub_restores_score(score in 0i64..100_000, value in 5i64..50) {
            let mut state = playing_state(score);
            push_block(&mut state, BlockKind::Add, value, 0.0, 0.0);
            resolve_collisions(&mut state, 0.0, 0.0);
            push_block(&mut state, BlockKind::Sub, value, 0.0, 0.0);
            resolve_collisions(&mut state, 0.0, 0.0);
            prop_assert_eq!(state.score, score);
            prop_assert_eq!(state.phase, GamePhase::Playing);
        }

        #[test]
        fn prop_mult_then_div_restores_score(score in 0i64..1_000_000) {
            let mut state = playing_state(score);
            push_block(&mut state, BlockKind::Mult, 2, 0.0, 0.0);
            resolve_collisions(&mut state, 0.0, 0.0);
            push_block(&mut state, BlockKind::Div, 2, 0.0, 0.0);
            resolve_collisions(&mut state, 0.0, 0.0);
            prop_assert_eq!(state.score, score);
        }
    }
}
