//! Asynchronous input capture
//!
//! Event handlers only flip flags here; the frame driver reads the
//! resulting direction once per frame.

/// Steering controls currently held
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    /// Touch zone direction: -1, 0 or +1
    pub touch: f32,
}

impl InputState {
    /// Record a key press or release. Returns true when the key is a
    /// steering key.
    pub fn set_key(&mut self, code: &str, pressed: bool) -> bool {
        match code {
            "ArrowLeft" | "KeyA" => self.left = pressed,
            "ArrowRight" | "KeyD" => self.right = pressed,
            _ => return false,
        }
        true
    }

    /// Touch zones report their sign; releasing reports 0
    pub fn set_touch(&mut self, direction: f32) {
        self.touch = if direction > 0.0 {
            1.0
        } else if direction < 0.0 {
            -1.0
        } else {
            0.0
        };
    }

    /// Which half of the surface a touch at `x` falls in
    pub fn touch_zone(x: f32, surface_width: f32) -> f32 {
        if x < surface_width / 2.0 { -1.0 } else { 1.0 }
    }

    /// Drop everything (window lost focus)
    pub fn release_all(&mut self) {
        *self = Self::default();
    }

    /// Signed lateral direction. Touch wins, then right, then left.
    pub fn direction(&self) -> f32 {
        if self.touch != 0.0 {
            self.touch
        } else if self.right {
            1.0
        } else if self.left {
            -1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys() {
        let mut input = InputState::default();
        assert!(input.set_key("KeyA", true));
        assert_eq!(input.direction(), -1.0);
        assert!(input.set_key("ArrowRight", true));
        assert_eq!(input.direction(), 1.0);
        input.set_key("ArrowRight", false);
        assert_eq!(input.direction(), -1.0);
        assert!(!input.set_key("Space", true));
    }

    #[test]
    fn test_touch_overrides_keys() {
        let mut input = InputState::default();
        input.set_key("KeyD", true);
        input.set_touch(InputState::touch_zone(10.0, 400.0));
        assert_eq!(input.direction(), -1.0);
        input.set_touch(0.0);
        assert_eq!(input.direction(), 1.0);
        assert_eq!(InputState::touch_zone(300.0, 400.0), 1.0);
    }

    #[test]
    fn test_release_all() {
        let mut input = InputState::default();
        input.set_key("ArrowLeft", true);
        input.set_touch(0.7);
        input.release_all();
        assert_eq!(input.direction(), 0.0);
    }
}
