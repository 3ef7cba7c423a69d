//! Lane Rush - A pseudo-3D endless lane runner
//!
//! Core modules:
//! - `sim`: Simulation (entities, collisions, difficulty, game state machine)
//! - `renderer`: Scene tessellation and the WebGPU pipeline
//! - `session`: Frame driver glue between input, simulation and high scores
//! - `persistence`: Key-value storage for records and settings
//! - `platform`: Optional mobile leaderboard integration

pub mod audio;
pub mod highscores;
pub mod input;
pub mod palette;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::HighScoreData;
pub use session::Session;
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    // === Camera ===
    /// Field of view (focal length in pixels)
    pub const FOV: f32 = 400.0;
    /// Camera height above the road plane
    pub const CAMERA_HEIGHT: f32 = 240.0;
    /// Camera distance behind the player plane
    pub const CAMERA_DIST: f32 = 400.0;
    /// Horizon line as a fraction of viewport height
    pub const HORIZON_Y: f32 = 0.35;
    /// Floor for the perspective divide
    pub const MIN_CAMERA_DEPTH: f32 = 0.001;

    // === World ===
    pub const ROAD_WIDTH: f32 = 600.0;
    pub const LANE_COUNT: u32 = 5;
    pub const SPAWN_Z: f32 = 3000.0;
    pub const PLAYER_Z: f32 = 0.0;
    /// Entities within +/- this depth of the player plane can collide
    pub const COLLISION_DEPTH: f32 = 150.0;
    /// Entities behind this depth are discarded
    pub const DESPAWN_Z: f32 = -200.0;
    /// Spacing of the scrolling road grid
    pub const GRID_SPACING: f32 = 300.0;

    // === Speed / spawning ===
    pub const GAME_SPEED_INITIAL: f32 = 600.0;
    pub const GAME_SPEED_MAX: f32 = 3000.0;
    pub const SPEED_SCALE_PER_POINT: f32 = 0.2;
    /// Extra world speed per level above 1
    pub const SPEED_PER_LEVEL: f32 = 100.0;
    pub const PLAYER_LATERAL_SPEED: f32 = 900.0;
    /// Spawn interval at score 0, level 0 (ms)
    pub const SPAWN_RATE_INITIAL: f64 = 1000.0;
    /// Fastest spawn interval (ms)
    pub const SPAWN_RATE_MIN: f64 = 250.0;

    // === Levels / bosses ===
    pub const LEVEL_DISTANCE_BASE: f32 = 10000.0;
    /// Each level is 20% longer
    pub const LEVEL_DISTANCE_SCALING: f32 = 1.2;
    pub const BOSS_BASE_HEALTH: f64 = 150.0;
    pub const BOSS_HP_SCALING: f64 = 1.8;
    /// Beating this level's boss wins the game
    pub const FINAL_BOSS_LEVEL: u32 = 10;
    /// Pause after a boss kill before play resumes (ms, wall clock)
    pub const LEVEL_TRANSITION_MS: f64 = 2000.0;

    // === Sizes ===
    pub const BLOCK_SIZE: f32 = 80.0;
    pub const PLAYER_SIZE: f32 = 70.0;

    // === Scoring ===
    pub const STARTING_SCORE: i64 = 20;

    // === Frame / feel ===
    /// Largest simulation step after a stall (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Screen shake lost per second
    pub const SHAKE_DECAY_PER_SEC: f32 = 30.0;
    /// Downward acceleration of debris particles (pixels/s²)
    pub const PARTICLE_GRAVITY: f32 = 300.0;
    /// Maximum visual lean (degrees)
    pub const MAX_LEAN_DEG: f32 = 25.0;
    /// Lean interpolation rate (1/s)
    pub const LEAN_RESPONSE: f32 = 10.0;
}

/// Lateral offset of a lane center (lane 0 is leftmost)
#[inline]
pub fn lane_offset(lane: u32) -> f32 {
    let lane_width = consts::ROAD_WIDTH / consts::LANE_COUNT as f32;
    (lane as f32 - (consts::LANE_COUNT / 2) as f32) * lane_width
}

/// Lane whose center is closest to a lateral offset
pub fn nearest_lane(x: f32) -> u32 {
    let lane_width = consts::ROAD_WIDTH / consts::LANE_COUNT as f32;
    let lane = (x / lane_width).round() + (consts::LANE_COUNT / 2) as f32;
    lane.clamp(0.0, (consts::LANE_COUNT - 1) as f32) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_offsets_are_symmetric() {
        assert_eq!(lane_offset(0), -240.0);
        assert_eq!(lane_offset(2), 0.0);
        assert_eq!(lane_offset(4), 240.0);
    }

    #[test]
    fn test_nearest_lane() {
        assert_eq!(nearest_lane(0.0), 2);
        assert_eq!(nearest_lane(-250.0), 0);
        assert_eq!(nearest_lane(100.0), 3);
        assert_eq!(nearest_lane(9000.0), 4);
    }
}
