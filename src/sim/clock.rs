//! Wall-clock frame timing

use crate::consts::MAX_FRAME_DT;

/// Turns successive frame timestamps into clamped step sizes
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    /// Seconds since the previous call, clamped to `[0, MAX_FRAME_DT]`.
    /// The first call returns 0.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        dt.clamp(0.0, MAX_FRAME_DT)
    }

    /// Forget the previous timestamp (e.g. after the tab was hidden)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_zero() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.advance(12_345.0), 0.0);
        assert!((clock.advance(12_361.0) - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut clock = FrameClock::default();
        clock.advance(0.0);
        assert_eq!(clock.advance(5_000.0), MAX_FRAME_DT);
    }

    #[test]
    fn test_time_going_backwards() {
        let mut clock = FrameClock::default();
        clock.advance(1_000.0);
        assert_eq!(clock.advance(900.0), 0.0);
        clock.reset();
        assert_eq!(clock.advance(2_000.0), 0.0);
    }
}
