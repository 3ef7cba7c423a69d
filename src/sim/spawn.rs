//! Procedural entity and boss spawning

use glam::Vec3;
use rand::Rng;

use super::difficulty::boss_health;
use super::state::{Block, BlockKind, Boss, Entity, EntityKind};
use crate::consts::*;
use crate::lane_offset;
use crate::palette;

/// Probability of a hazard (enemy or negative block) at a level
pub fn bad_chance(level: u32) -> f32 {
    (0.3 + 0.05 * level as f32).min(0.6)
}

/// Enemy strength grows with score and level
pub fn enemy_power<R: Rng>(rng: &mut R, score: i64, level: u32) -> i64 {
    rng.random_range(5..=24) + score.max(0).div_euclid(10) + level as i64 * 5
}

/// Pick the payload for a hazard block
fn negative_block<R: Rng>(rng: &mut R) -> Block {
    if rng.random::<f32>() < 0.1 {
        Block::new(BlockKind::Death, 0)
    } else if rng.random::<f32>() < 0.7 {
        Block::new(BlockKind::Sub, rng.random_range(5..=29))
    } else {
        Block::new(BlockKind::Div, 2)
    }
}

/// Pick the payload for a helpful block
fn positive_block<R: Rng>(rng: &mut R) -> Block {
    if rng.random::<f32>() < 0.2 {
        let value = if rng.random::<f32>() < 0.7 { 2 } else { 3 };
        Block::new(BlockKind::Mult, value)
    } else {
        Block::new(BlockKind::Add, rng.random_range(5..=49))
    }
}

/// Create a regular entity in a random lane at `SPAWN_Z`
pub fn spawn_entity<R: Rng>(rng: &mut R, id: u32, level: u32, score: i64) -> Entity {
    let lane = rng.random_range(0..LANE_COUNT);
    let pos = Vec3::new(lane_offset(lane), 0.0, SPAWN_Z);

    let kind = if rng.random::<f32>() < bad_chance(level) {
        if rng.random::<f32>() < 0.5 {
            EntityKind::Enemy {
                power: enemy_power(rng, score, level),
            }
        } else {
            EntityKind::Block(negative_block(rng))
        }
    } else {
        EntityKind::Block(positive_block(rng))
    };

    let color = match &kind {
        EntityKind::Block(block) => block.kind.color(),
        _ => palette::ENEMY,
    };

    Entity {
        id,
        pos,
        width: BLOCK_SIZE,
        height: BLOCK_SIZE,
        color,
        kind,
    }
}

/// Create the boss for `level`; it is wider than the road so it cannot be dodged
pub fn spawn_boss(id: u32, level: u32) -> Entity {
    let health = boss_health(level);
    Entity {
        id,
        pos: Vec3::new(0.0, 0.0, SPAWN_Z),
        width: ROAD_WIDTH * 1.5,
        height: BLOCK_SIZE * 3.5,
        color: palette::BOSS,
        kind: EntityKind::Boss(Boss {
            max_health: health,
            current_health: health,
            level,
        }),
    }
}
