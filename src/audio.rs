//! Audio system using Web Audio API
//!
//! Procedurally generated cues and a filtered drone, no external files.
//! Cue selection is platform independent; playback exists on wasm32 only.

use crate::sim::GameEvent;
use crate::sim::difficulty::speed_intensity;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Positive block picked up
    Collect,
    /// Sub/Div block hit
    Negative,
    /// Enemy hit
    Crash,
    /// Fatal hazard
    Death,
    /// Level up or victory
    Win,
    /// Run lost
    GameOver,
}

impl SoundEffect {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Collected { .. } => Some(SoundEffect::Collect),
            GameEvent::Penalty { .. } => Some(SoundEffect::Negative),
            GameEvent::Crash { .. } => Some(SoundEffect::Crash),
            GameEvent::Death => Some(SoundEffect::Death),
            GameEvent::LevelUp { .. } | GameEvent::Victory { .. } => Some(SoundEffect::Win),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::RunStarted { .. } | GameEvent::BossSpawned { .. } => None,
        }
    }
}

/// Drone intensity in [0, 1] for a world speed
pub fn music_intensity(speed: f32) -> f32 {
    speed_intensity(speed)
}

/// Low-pass cutoff for the drone at an intensity
pub fn drone_cutoff(intensity: f32) -> f32 {
    200.0 + 800.0 * intensity.clamp(0.0, 1.0)
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{
        AudioBuffer, AudioContext, AudioContextState, BiquadFilterNode, BiquadFilterType,
        GainNode, OscillatorNode, OscillatorType,
    };

    use super::{SoundEffect, drone_cutoff};
    use crate::settings::Settings;

    /// Nodes of the running background drone
    struct Drone {
        osc: OscillatorNode,
        filter: BiquadFilterNode,
        gain: GainNode,
    }

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        drone: Option<Drone>,
        master_volume: f32,
        sfx_volume: f32,
        music_volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                drone: None,
                master_volume: 0.8,
                sfx_volume: 1.0,
                music_volume: 0.7,
                muted: false,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx
                && ctx.state() == AudioContextState::Suspended
            {
                let _ = ctx.resume();
            }
        }

        /// Pull volumes from settings
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.master_volume = settings.master_volume.clamp(0.0, 1.0);
            self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
            self.music_volume = settings.music_volume.clamp(0.0, 1.0);
            self.update_drone_gain();
        }

        /// Mute/unmute all audio
        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
            self.update_drone_gain();
        }

        fn sfx_gain(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        fn music_gain(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                0.15 * self.master_volume * self.music_volume
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.sfx_gain();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            self.resume();

            match effect {
                SoundEffect::Collect => self.play_collect(ctx, vol),
                SoundEffect::Negative => self.play_negative(ctx, vol),
                SoundEffect::Crash => self.play_noise(ctx, vol * 0.3, 0.2, true),
                SoundEffect::Death => self.play_noise(ctx, vol * 0.2, 0.5, false),
                SoundEffect::Win => self.play_win(ctx, vol),
                SoundEffect::GameOver => self.play_game_over(ctx, vol),
            }
        }

        // === Background drone ===

        /// Start the drone (no-op if already running)
        pub fn start_music(&mut self) {
            self.resume();
            if self.drone.is_some() {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            match Self::build_drone(ctx, self.music_gain()) {
                Some(drone) => {
                    log::debug!("Drone started");
                    self.drone = Some(drone);
                }
                None => log::warn!("Failed to start background drone"),
            }
        }

        fn build_drone(ctx: &AudioContext, gain_value: f32) -> Option<Drone> {
            let osc = ctx.create_oscillator().ok()?;
            let filter = ctx.create_biquad_filter().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(OscillatorType::Sawtooth);
            osc.frequency().set_value(55.0);
            filter.set_type(BiquadFilterType::Lowpass);
            filter.frequency().set_value(drone_cutoff(0.0));
            gain.gain().set_value(gain_value);

            osc.connect_with_audio_node(&filter).ok()?;
            filter.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;
            osc.start().ok()?;

            Some(Drone { osc, filter, gain })
        }

        /// Fade the drone out and release its nodes
        pub fn stop_music(&mut self) {
            let Some(drone) = self.drone.take() else {
                return;
            };
            let t = self.ctx.as_ref().map(|c| c.current_time()).unwrap_or(0.0);
            drone.gain.gain().set_target_at_time(0.0, t, 0.1).ok();
            drone.osc.stop_with_when(t + 0.2).ok();
            log::debug!("Drone stopped");
        }

        /// Open the filter as the run speeds up
        pub fn set_intensity(&self, intensity: f32) {
            let (Some(ctx), Some(drone)) = (&self.ctx, &self.drone) else {
                return;
            };
            drone
                .filter
                .frequency()
                .set_target_at_time(drone_cutoff(intensity), ctx.current_time(), 0.1)
                .ok();
        }

        fn update_drone_gain(&self) {
            if let Some(drone) = &self.drone {
                drone.gain.gain().set_value(self.music_gain());
            }
        }

        // === Sound generators ===

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Collect - two-step chirp up an octave
        fn play_collect(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 880.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(880.0, t).ok();
            osc.frequency().set_value_at_time(1760.0, t + 0.1).ok();
            gain.gain().set_value_at_time(vol * 0.1, t).ok();
            gain.gain().linear_ramp_to_value_at_time(0.01, t + 0.2).ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.2).ok();
        }

        /// Negative - short sawtooth buzz
        fn play_negative(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.1, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + 0.3)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }

        /// White noise burst; `punchy` bakes an exponential decay into the buffer
        fn play_noise(&self, ctx: &AudioContext, peak: f32, duration: f64, punchy: bool) {
            let Some(buffer) = Self::noise_buffer(ctx, duration, punchy) else {
                return;
            };
            let Ok(source) = ctx.create_buffer_source() else {
                return;
            };
            let Ok(gain) = ctx.create_gain() else { return };
            let t = ctx.current_time();

            source.set_buffer(Some(&buffer));
            gain.gain().set_value_at_time(peak, t).ok();
            if punchy {
                gain.gain().linear_ramp_to_value_at_time(0.0, t + duration).ok();
            } else {
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.001, t + duration)
                    .ok();
            }

            if source.connect_with_audio_node(&gain).is_err()
                || gain.connect_with_audio_node(&ctx.destination()).is_err()
            {
                return;
            }
            source.start().ok();
        }

        fn noise_buffer(ctx: &AudioContext, duration: f64, punchy: bool) -> Option<AudioBuffer> {
            let rate = ctx.sample_rate();
            let len = (rate as f64 * duration) as u32;
            let buffer = ctx.create_buffer(1, len, rate).ok()?;

            let mut data: Vec<f32> = (0..len)
                .map(|i| {
                    let n = rand::random::<f32>() * 2.0 - 1.0;
                    if punchy {
                        n * (-(i as f32) / (len as f32 * 0.3)).exp()
                    } else {
                        n
                    }
                })
                .collect();
            buffer.copy_to_channel(&mut data, 0).ok()?;
            Some(buffer)
        }

        /// Win - major arpeggio
        fn play_win(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            for (i, freq) in [523.25, 659.25, 783.99, 1046.5].into_iter().enumerate() {
                let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Square) else {
                    continue;
                };
                gain.gain().set_value_at_time(vol * 0.05, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.001, t + 1.5)
                    .ok();
                osc.start_with_when(t + i as f64 * 0.1).ok();
                osc.stop_with_when(t + 2.0).ok();
            }
        }

        /// Game over - falling triangle
        fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 440.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(440.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(110.0, t + 1.0)
                .ok();
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain().linear_ramp_to_value_at_time(0.01, t + 1.0).ok();

            osc.start().ok();
            osc.stop_with_when(t + 1.0).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::BlockKind;

    #[test]
    fn test_event_cues() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Collected {
                kind: BlockKind::Mult
            }),
            Some(SoundEffect::Collect)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Penalty {
                kind: BlockKind::Div
            }),
            Some(SoundEffect::Negative)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::LevelUp { level: 2, bonus: 100 }),
            Some(SoundEffect::Win)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::BossSpawned { level: 1, health: 150 }),
            None
        );
    }

    #[test]
    fn test_drone_cutoff_range() {
        assert_eq!(drone_cutoff(music_intensity(600.0)), 200.0);
        assert_eq!(drone_cutoff(music_intensity(3000.0)), 1000.0);
        assert_eq!(drone_cutoff(7.0), 1000.0);
    }
}
