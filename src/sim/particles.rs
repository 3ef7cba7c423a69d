//! Decorative debris bursts with simple ballistic motion

use glam::Vec2;
use rand::Rng;

use super::state::Particle;
use crate::consts::PARTICLE_GRAVITY;
use crate::palette::Color;

/// Emit `count` particles from `origin` in random directions.
/// `scale` multiplies both speed and size. Oldest particles are dropped past `cap`.
pub fn spawn_burst<R: Rng>(
    particles: &mut Vec<Particle>,
    rng: &mut R,
    origin: Vec2,
    color: Color,
    count: usize,
    scale: f32,
    cap: usize,
) {
    for _ in 0..count {
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let speed = (rng.random::<f32>() * 200.0 + 50.0) * scale;
        let life = 0.5 + rng.random::<f32>() * 0.3;
        particles.push(Particle {
            pos: origin,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            life,
            max_life: life,
            color,
            size: (rng.random::<f32>() * 5.0 + 2.0) * scale,
        });
    }

    if particles.len() > cap {
        let excess = particles.len() - cap;
        particles.drain(..excess);
    }
}

/// Integrate and cull expired particles
pub fn update_particles(particles: &mut Vec<Particle>, dt: f32) {
    for p in particles.iter_mut() {
        p.pos += p.vel * dt;
        p.vel.y += PARTICLE_GRAVITY * dt;
        p.life -= dt;
    }
    particles.retain(|p| p.life > 0.0);
}
