//! Frame driver glue
//!
//! Owns everything that persists between animation frames: the simulation,
//! the frame clock, the input flags and the stored best score.

use crate::highscores::HighScoreData;
use crate::input::InputState;
use crate::persistence::{KeyValueStore, StoreError};
use crate::settings::Settings;
use crate::sim::{
    FrameClock, GameEvent, GamePhase, GameState, ScreenShake, TickInput, autopilot_direction, tick,
};

/// A finished run that beat the stored best and awaits a name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingHighScore {
    pub score: i64,
    pub level: u32,
}

pub struct Session {
    pub state: GameState,
    pub input: InputState,
    pub high_score: HighScoreData,
    /// Steer automatically (attract mode / headless runs)
    pub autopilot: bool,
    clock: FrameClock,
    start_requested: bool,
    shake_enabled: bool,
    pending_high_score: Option<PendingHighScore>,
}

impl Session {
    pub fn new(seed: u64, high_score: HighScoreData) -> Self {
        Self {
            state: GameState::new(seed),
            input: InputState::default(),
            high_score,
            autopilot: false,
            clock: FrameClock::default(),
            start_requested: false,
            shake_enabled: true,
            pending_high_score: None,
        }
    }

    /// Apply the simulation-facing settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.state.max_particles = settings.max_particles();
        self.shake_enabled = settings.effective_screen_shake();
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.state.set_viewport(width, height);
    }

    /// Queue a start/restart for the next frame
    pub fn request_start(&mut self) {
        self.start_requested = true;
    }

    /// Window lost focus: let go of every control
    pub fn release_input(&mut self) {
        self.input.release_all();
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn pending_high_score(&self) -> Option<PendingHighScore> {
        self.pending_high_score
    }

    /// Run one animation frame and return the events it produced
    pub fn frame(&mut self, now_ms: f64) -> Vec<GameEvent> {
        let dt = self.clock.advance(now_ms);
        let direction = if self.autopilot {
            autopilot_direction(&self.state)
        } else {
            self.input.direction()
        };
        let input = TickInput {
            direction,
            start: std::mem::take(&mut self.start_requested),
        };

        tick(&mut self.state, &input, now_ms, dt);
        if !self.shake_enabled {
            self.state.shake = ScreenShake::default();
        }

        let events = self.state.drain_events();
        for event in &events {
            match *event {
                GameEvent::RunStarted { .. } => self.pending_high_score = None,
                GameEvent::GameOver { score, level } | GameEvent::Victory { score, level } => {
                    if self.high_score.is_new_high_score(score) {
                        log::info!("New high score {score} (previous {})", self.high_score.score);
                        self.pending_high_score = Some(PendingHighScore { score, level });
                    }
                }
                _ => {}
            }
        }
        events
    }

    /// Store the pending high score under `name`. Returns false when there
    /// was nothing to record.
    pub fn confirm_high_score(
        &mut self,
        name: &str,
        store: &mut dyn KeyValueStore,
    ) -> Result<bool, StoreError> {
        let Some(pending) = self.pending_high_score.take() else {
            return Ok(false);
        };
        self.high_score.record(pending.score, name, pending.level);
        self.high_score.save(store)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::persistence::MemoryStore;
    use crate::sim::spawn::spawn_boss;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn started(best: i64) -> Session {
        let mut session = Session::new(
            11,
            HighScoreData {
                score: best,
                name: "Old".into(),
                max_level: 2,
            },
        );
        session.request_start();
        session.frame(0.0);
        session
    }

    fn win_final_boss(session: &mut Session, score: i64) {
        let state = &mut session.state;
        state.level = FINAL_BOSS_LEVEL;
        state.score = score;
        state.phase = GamePhase::BossFight;
        let id = state.next_entity_id();
        let mut boss = spawn_boss(id, FINAL_BOSS_LEVEL);
        boss.pos.z = 0.0;
        state.entities.push(boss);
    }

    #[test]
    fn test_start_is_consumed_once() {
        let mut session = started(0);
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.state.run_id, 1);
        session.frame(FRAME_MS);
        assert_eq!(session.state.run_id, 1);
    }

    #[test]
    fn test_input_drives_player() {
        let mut session = started(0);
        session.input.set_key("ArrowRight", true);
        session.frame(FRAME_MS);
        session.frame(2.0 * FRAME_MS);
        assert!(session.state.player.x > 0.0);

        session.release_input();
        let x = session.state.player.x;
        session.frame(3.0 * FRAME_MS);
        assert_eq!(session.state.player.x, x);
    }

    #[test]
    fn test_victory_records_high_score() {
        let mut session = started(100);
        let health = crate::sim::difficulty::boss_health(FINAL_BOSS_LEVEL);
        win_final_boss(&mut session, health + 500);

        let events = session.frame(FRAME_MS);
        assert_eq!(session.phase(), GamePhase::Victory);
        assert!(events.iter().any(|e| matches!(e, GameEvent::Victory { .. })));
        // Leftover score plus the final clear bonus
        let expected = 500 + crate::sim::difficulty::level_bonus(FINAL_BOSS_LEVEL + 1);
        assert_eq!(
            session.pending_high_score(),
            Some(PendingHighScore {
                score: expected,
                level: FINAL_BOSS_LEVEL
            })
        );

        let mut store = MemoryStore::default();
        assert!(session.confirm_high_score("  ", &mut store).unwrap());
        assert_eq!(session.high_score.score, expected);
        assert_eq!(session.high_score.name, "Anonymous");
        assert_eq!(session.high_score.max_level, FINAL_BOSS_LEVEL);
        assert_eq!(HighScoreData::load(&store), session.high_score);

        // Nothing left to confirm
        assert!(!session.confirm_high_score("Again", &mut store).unwrap());
    }

    #[test]
    fn test_lower_score_is_not_a_high_score() {
        let mut session = started(10_000);
        let health = crate::sim::difficulty::boss_health(FINAL_BOSS_LEVEL);
        win_final_boss(&mut session, health + 500);
        session.frame(FRAME_MS);
        assert_eq!(session.phase(), GamePhase::Victory);
        assert_eq!(session.pending_high_score(), None);
    }

    #[test]
    fn test_restart_clears_pending_high_score() {
        let mut session = started(0);
        let health = crate::sim::difficulty::boss_health(FINAL_BOSS_LEVEL);
        win_final_boss(&mut session, health + 50);
        session.frame(FRAME_MS);
        assert!(session.pending_high_score().is_some());

        session.request_start();
        session.frame(2.0 * FRAME_MS);
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.pending_high_score(), None);
    }

    #[test]
    fn test_settings_disable_shake_and_particles() {
        let mut session = started(0);
        let settings = Settings {
            reduced_motion: true,
            particles: false,
            ..Settings::default()
        };
        session.apply_settings(&settings);
        session.state.shake.trigger(30.0);
        session.frame(FRAME_MS);
        assert_eq!(session.state.shake.intensity(), 0.0);
        assert_eq!(session.state.max_particles, 0);
    }

    #[test]
    fn test_autopilot_steers() {
        let mut session = started(0);
        session.autopilot = true;
        for frame in 1..600 {
            session.frame(frame as f64 * FRAME_MS);
        }
        assert!(session.state.distance > 0.0);
    }
}
