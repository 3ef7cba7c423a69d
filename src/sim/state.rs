//! Game state and core simulation types
//!
//! Everything the frame driver mutates lives in one owned `GameState`.

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::{Projector, ScreenShake};
use super::schedule::Scheduler;
use crate::consts::*;
use crate::palette::{self, Color};

/// Current phase of the game state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for a start command
    Start,
    /// Normal running: spawning, speed scaling, boss threshold checks
    Playing,
    /// A boss is on the road; spawning and speed are frozen
    BossFight,
    /// Short pause after a boss kill; world distance is frozen
    LevelTransition,
    /// Run lost
    GameOver,
    /// Final boss beaten
    Victory,
}

impl GamePhase {
    /// Phases in which the world updates
    pub fn is_active(self) -> bool {
        matches!(
            self,
            GamePhase::Playing | GamePhase::BossFight | GamePhase::LevelTransition
        )
    }

    /// Run has ended; only a start command leaves these
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Victory)
    }
}

/// The runner
#[derive(Debug, Clone)]
pub struct Player {
    /// Lateral position (0 = road center)
    pub x: f32,
    pub z: f32,
    pub width: f32,
    pub height: f32,
    /// Lateral speed (units/s)
    pub lateral_speed: f32,
    /// Visual lean in degrees (positive = leaning right)
    pub lean: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            x: 0.0,
            z: PLAYER_Z,
            width: PLAYER_SIZE,
            height: PLAYER_SIZE * 2.0,
            lateral_speed: PLAYER_LATERAL_SPEED,
            lean: 0.0,
        }
    }
}

impl Player {
    /// Furthest lateral offset from the road center
    #[inline]
    pub fn x_limit(&self) -> f32 {
        ROAD_WIDTH / 2.0 - self.width / 4.0
    }

    /// Move laterally and ease the lean toward the steering direction
    pub fn steer(&mut self, direction: f32, dt: f32) {
        let direction = direction.clamp(-1.0, 1.0);
        self.x += direction * self.lateral_speed * dt;

        let target_lean = direction * MAX_LEAN_DEG;
        self.lean += (target_lean - self.lean) * (LEAN_RESPONSE * dt).min(1.0);

        let limit = self.x_limit();
        self.x = self.x.clamp(-limit, limit);
    }

    /// World position of the player's feet
    pub fn world_pos(&self) -> Vec3 {
        Vec3::new(self.x, 0.0, self.z)
    }
}

/// Arithmetic applied to the score when a block is hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Add,
    Mult,
    Sub,
    Div,
    /// Instant loss
    Death,
}

impl BlockKind {
    /// Blocks that help the player
    pub fn is_positive(self) -> bool {
        matches!(self, BlockKind::Add | BlockKind::Mult)
    }

    pub fn color(self) -> Color {
        match self {
            BlockKind::Add => palette::BLOCK_ADD,
            BlockKind::Mult => palette::BLOCK_MULT,
            BlockKind::Sub => palette::BLOCK_SUB,
            BlockKind::Div => palette::BLOCK_DIV,
            BlockKind::Death => palette::BLOCK_DEATH,
        }
    }

    /// Text shown on the block face
    pub fn label(self, value: i64) -> String {
        match self {
            BlockKind::Add => format!("+{value}"),
            BlockKind::Mult => format!("x{value}"),
            BlockKind::Sub => format!("-{value}"),
            BlockKind::Div => format!("÷{value}"),
            BlockKind::Death => "☠".to_string(),
        }
    }

    /// Apply this block to a score (division floors toward negative infinity).
    /// Saturates at the `i64` bounds.
    pub fn apply(self, score: i64, value: i64) -> i64 {
        match self {
            BlockKind::Add => score.saturating_add(value),
            BlockKind::Mult => score.saturating_mul(value),
            BlockKind::Sub => score.saturating_sub(value),
            BlockKind::Div if value != 0 => score.div_euclid(value),
            BlockKind::Div => score,
            BlockKind::Death => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    pub value: i64,
    pub text: String,
    pub text_color: Color,
}

impl Block {
    pub fn new(kind: BlockKind, value: i64) -> Self {
        Self {
            kind,
            value,
            text: kind.label(value),
            text_color: palette::WHITE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Boss {
    pub max_health: i64,
    pub current_health: i64,
    pub level: u32,
}

/// Variant data for an entity
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    Block(Block),
    /// Subtracts `power` from the score on contact
    Enemy { power: i64 },
    /// Spans the whole road; contact is a single pass/fail battle
    Boss(Boss),
}

/// Something on the road travelling toward the player
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: u32,
    /// y is always 0 (entities sit on the road)
    pub pos: Vec3,
    pub width: f32,
    pub height: f32,
    pub color: Color,
    pub kind: EntityKind,
}

impl Entity {
    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EntityKind::Boss(_))
    }
}

/// Short-lived screen-space debris
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds left
    pub life: f32,
    /// Lifetime at spawn
    pub max_life: f32,
    pub color: Color,
    pub size: f32,
}

impl Particle {
    /// Opacity from the remaining lifetime fraction
    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Default particle cap
pub const MAX_PARTICLES: usize = 512;

/// Notifications for audio, HUD and platform services, drained each frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RunStarted { run_id: u64 },
    /// Positive block picked up
    Collected { kind: BlockKind },
    /// Sub/Div block hit
    Penalty { kind: BlockKind },
    /// Enemy hit
    Crash { power: i64 },
    /// Fatal hazard (Death block or a lost boss battle)
    Death,
    BossSpawned { level: u32, health: i64 },
    LevelUp { level: u32, bonus: i64 },
    GameOver { score: i64, level: u32 },
    Victory { score: i64, level: u32 },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    /// Incremented on every run start; scheduled tasks are tied to it
    pub run_id: u64,
    pub phase: GamePhase,
    pub player: Player,
    /// Live entities in spawn order
    pub entities: Vec<Entity>,
    pub particles: Vec<Particle>,
    pub max_particles: usize,
    pub score: i64,
    /// 1-based
    pub level: u32,
    /// Accumulated world distance
    pub distance: f32,
    /// Distance at which the next boss appears
    pub next_boss_distance: f32,
    /// Distance at which the current level began
    pub level_start_distance: f32,
    /// World scroll speed (units/s)
    pub speed: f32,
    /// Wall-clock time of the last regular spawn
    pub last_spawn_ms: f64,
    pub shake: ScreenShake,
    /// Drawing surface size in pixels
    pub viewport: Vec2,
    pub scheduler: Scheduler,
    /// Seconds since the state was created (animation clock)
    pub time_secs: f32,
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a fresh state on the start screen
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            run_id: 0,
            phase: GamePhase::Start,
            player: Player::default(),
            entities: Vec::new(),
            particles: Vec::new(),
            max_particles: MAX_PARTICLES,
            score: 0,
            level: 1,
            distance: 0.0,
            next_boss_distance: LEVEL_DISTANCE_BASE,
            level_start_distance: 0.0,
            speed: GAME_SPEED_INITIAL,
            last_spawn_ms: 0.0,
            shake: ScreenShake::default(),
            viewport: Vec2::new(800.0, 600.0),
            scheduler: Scheduler::default(),
            time_secs: 0.0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn projector(&self) -> Projector {
        Projector::new(self.viewport)
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width.max(1.0), height.max(1.0));
    }

    /// The live boss, if any
    pub fn boss(&self) -> Option<&Boss> {
        self.entities.iter().find_map(|e| match &e.kind {
            EntityKind::Boss(boss) => Some(boss),
            _ => None,
        })
    }

    pub fn has_boss(&self) -> bool {
        self.entities.iter().any(Entity::is_boss)
    }

    /// Distance as shown to the player
    pub fn display_distance(&self) -> u64 {
        (self.distance / 100.0).floor().max(0.0) as u64
    }

    /// Fraction of the current level covered before the boss appears
    pub fn level_progress(&self) -> f32 {
        let span = self.next_boss_distance - self.level_start_distance;
        if span <= 0.0 {
            return 1.0;
        }
        ((self.distance - self.level_start_distance) / span).clamp(0.0, 1.0)
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
