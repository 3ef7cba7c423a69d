//! Perspective projection from world space to the 2D drawing surface
//!
//! World axes: x is lateral (0 = road center), y is height above the road,
//! z is depth in front of the player plane (negative = behind).

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::consts::*;

/// Decaying screen-shake intensity (pixels of peak-to-peak jitter)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenShake {
    intensity: f32,
}

impl ScreenShake {
    /// Set the shake level (an impact replaces whatever was left)
    pub fn trigger(&mut self, intensity: f32) {
        self.intensity = intensity.max(0.0);
    }

    /// Linear decay toward zero
    pub fn decay(&mut self, dt: f32) {
        if self.intensity > 0.0 {
            self.intensity = (self.intensity - dt * SHAKE_DECAY_PER_SEC).max(0.0);
        }
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Random offset in [-intensity/2, intensity/2] on both axes
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Vec2 {
        if self.intensity <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            (rng.random::<f32>() - 0.5) * self.intensity,
            (rng.random::<f32>() - 0.5) * self.intensity,
        )
    }
}

/// A projected point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub pos: Vec2,
    /// Pixels per world unit at this depth
    pub scale: f32,
}

/// Perspective camera bound to a viewport size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub viewport: Vec2,
}

impl Projector {
    pub fn new(viewport: Vec2) -> Self {
        Self { viewport }
    }

    /// Screen-space y of the horizon line
    #[inline]
    pub fn horizon_y(&self) -> f32 {
        self.viewport.y * HORIZON_Y
    }

    /// Project without jitter
    pub fn project_steady(&self, world: Vec3) -> Projected {
        let camera_z = world.z + CAMERA_DIST;
        let scale = FOV / camera_z.max(MIN_CAMERA_DEPTH);

        let x = world.x * scale + self.viewport.x / 2.0;
        let y = self.horizon_y() - (world.y - CAMERA_HEIGHT) * scale;

        Projected {
            pos: Vec2::new(x, y),
            scale,
        }
    }

    /// Project with an independent shake jitter per call
    pub fn project<R: Rng>(
        &self,
        world: Vec3,
        shake: &ScreenShake,
        rng: &mut R,
    ) -> Projected {
        let mut p = self.project_steady(world);
        p.pos += shake.sample(rng);
        p
    }
}
