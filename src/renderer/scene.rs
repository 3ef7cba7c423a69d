//! Scene tessellation
//!
//! Turns a `GameState` into one pixel-space triangle list, drawn back to
//! front: sky and ground, road, entities (far first), the runner, particles.

use std::cmp::Ordering;
use std::f32::consts::{PI, TAU};

use glam::{Affine2, Vec2, Vec3};
use rand::Rng;

use super::shapes;
use super::vertex::Vertex;
use crate::consts::*;
use crate::palette::{self, Color, with_alpha};
use crate::settings::Settings;
use crate::sim::{Entity, EntityKind, GameState, Projector, ScreenShake};

/// Road is drawn from here...
const ROAD_FAR_Z: f32 = 2500.0;
/// ...to just behind the player plane
const ROAD_NEAR_Z: f32 = -100.0;
/// Canvas-style font size to bitmap glyph height
const CAP_HEIGHT: f32 = 0.7;

/// Score thresholds for the runner's armor upgrades
const ARMOR_SCORE: i64 = 100;
const WINGS_SCORE: i64 = 300;

/// Projection plus the shake it jitters with
struct View<'a, R> {
    projector: Projector,
    shake: &'a ScreenShake,
    rng: &'a mut R,
}

impl<R: Rng> View<'_, R> {
    fn project(&mut self, x: f32, y: f32, z: f32) -> (Vec2, f32) {
        let p = self
            .projector
            .project(Vec3::new(x, y, z), self.shake, self.rng);
        (p.pos, p.scale)
    }
}

/// Build the frame's triangle list
pub fn build_scene<R: Rng>(state: &GameState, settings: &Settings, rng: &mut R) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(4096);
    let mut view = View {
        projector: state.projector(),
        shake: &state.shake,
        rng,
    };

    draw_backdrop(&mut out, state);
    draw_road(&mut out, state, settings, &mut view);

    let mut entities: Vec<&Entity> = state.entities.iter().collect();
    entities.sort_by(|a, b| b.pos.z.partial_cmp(&a.pos.z).unwrap_or(Ordering::Equal));
    for entity in entities {
        draw_entity(&mut out, entity, state.time_secs, &mut view);
    }

    draw_runner(&mut out, state, &mut view);

    if settings.particles {
        for p in &state.particles {
            shapes::circle(
                &mut out,
                p.pos,
                p.size,
                with_alpha(p.color, p.alpha()),
                shapes::segments_for(p.size),
            );
        }
    }

    out
}

fn draw_backdrop(out: &mut Vec<Vertex>, state: &GameState) {
    let theme = palette::theme_for_level(state.level);
    let Vec2 { x: w, y: h } = state.viewport;
    let horizon = state.projector().horizon_y();

    shapes::gradient_rect(out, 0.0, 0.0, w, horizon, theme.sky_top, theme.sky_bottom);
    shapes::rect(out, 0.0, horizon, w, h - horizon, theme.ground);
}

fn draw_road<R: Rng>(
    out: &mut Vec<Vertex>,
    state: &GameState,
    settings: &Settings,
    view: &mut View<'_, R>,
) {
    let half = ROAD_WIDTH / 2.0;
    let (far_l, _) = view.project(-half, 0.0, ROAD_FAR_Z);
    let (far_r, _) = view.project(half, 0.0, ROAD_FAR_Z);
    let (near_r, _) = view.project(half, 0.0, ROAD_NEAR_Z);
    let (near_l, _) = view.project(-half, 0.0, ROAD_NEAR_Z);
    shapes::quad(out, [far_l, far_r, near_r, near_l], palette::ROAD_MAIN);

    if !settings.quality.road_detail() {
        return;
    }

    // Cross lines scroll toward the player with distance
    let offset = state.distance.rem_euclid(GRID_SPACING);
    let mut z = SPAWN_Z;
    while z > 0.0 {
        let draw_z = z - offset;
        if draw_z > 0.0 {
            let (l, _) = view.project(-half, 0.0, draw_z);
            let (r, _) = view.project(half, 0.0, draw_z);
            shapes::line(out, l, r, 1.0, palette::ROAD_STRIPE);
        }
        z -= GRID_SPACING;
    }

    for lane in 0..LANE_COUNT {
        let x = crate::lane_offset(lane);
        let (far, _) = view.project(x, 0.0, SPAWN_Z);
        let (near, _) = view.project(x, 0.0, ROAD_NEAR_Z);
        shapes::line(out, far, near, 2.0, palette::ROAD_STRIPE);
    }
}

fn label(out: &mut Vec<Vertex>, text: &str, at: Vec2, font_px: f32, color: Color) {
    shapes::text(out, text, at, font_px * CAP_HEIGHT, color);
}

fn draw_entity<R: Rng>(out: &mut Vec<Vertex>, entity: &Entity, time: f32, view: &mut View<'_, R>) {
    let (p, scale) = view.project(entity.pos.x, entity.pos.y, entity.pos.z);
    let w = entity.width * scale;
    let h = entity.height * scale;

    shapes::ellipse(out, p, Vec2::new(w / 1.5, w / 4.0), palette::SHADOW, 24);

    match &entity.kind {
        EntityKind::Block(block) => {
            shapes::rect(out, p.x - w / 2.0, p.y - h, w, h, entity.color);
            shapes::rect(out, p.x - w / 2.0, p.y - h, w, h * 0.3, palette::BLOCK_SHINE);
            label(
                out,
                &block.text,
                Vec2::new(p.x, p.y - h / 2.0),
                28.0 * scale,
                block.text_color,
            );
        }
        EntityKind::Enemy { power } => {
            let center = Vec2::new(p.x, p.y - h / 2.0);
            shapes::circle(out, center, w / 2.0, entity.color, shapes::segments_for(w / 2.0));
            // Spinning spikes
            for i in 0..8 {
                let angle = TAU / 8.0 * i as f32 + time * 2.0;
                let tip = center + Vec2::new(angle.cos() * w / 1.4, angle.sin() * h / 1.4);
                shapes::line(out, center, tip, 3.0 * scale, palette::ENEMY_SPIKE);
            }
            label(
                out,
                &power.to_string(),
                Vec2::new(p.x, p.y - h * 1.1),
                24.0 * scale,
                palette::WHITE,
            );
        }
        EntityKind::Boss(boss) => {
            shapes::rect(out, p.x - w / 2.0, p.y - h, w, h, entity.color);

            let bar_w = w * 0.8;
            let bar_h = 10.0 * scale;
            let bar_y = p.y - h - bar_h * 2.0;
            let fill = if boss.max_health > 0 {
                (boss.current_health as f32 / boss.max_health as f32).clamp(0.0, 1.0)
            } else {
                0.0
            };
            shapes::rect(out, p.x - bar_w / 2.0, bar_y, bar_w, bar_h, palette::BLACK);
            shapes::rect(out, p.x - bar_w / 2.0, bar_y, bar_w * fill, bar_h, palette::HEALTH_BAR);

            label(
                out,
                &boss.current_health.to_string(),
                Vec2::new(p.x, p.y - h / 2.0),
                40.0 * scale,
                palette::WHITE,
            );
            label(
                out,
                &format!("BOSS LVL {}", boss.level),
                Vec2::new(p.x, p.y - h - 25.0 * scale),
                20.0 * scale,
                palette::WHITE,
            );
        }
    }
}

/// Runner colors and gear for the current score
struct Outfit {
    primary: Color,
    secondary: Color,
    armor: bool,
    wings: bool,
}

impl Outfit {
    fn for_score(score: i64) -> Self {
        if score >= WINGS_SCORE {
            Self {
                primary: palette::ARMOR_GOLD,
                secondary: palette::BLACK,
                armor: true,
                wings: true,
            }
        } else if score >= ARMOR_SCORE {
            Self {
                primary: palette::ARMOR_RED,
                secondary: palette::ARMOR_DARK,
                armor: true,
                wings: false,
            }
        } else {
            Self {
                primary: palette::ARMOR_GREY,
                secondary: palette::ARMOR_BLUE,
                armor: false,
                wings: false,
            }
        }
    }
}

/// Limb with a highlight strip down its middle
fn limb(out: &mut Vec<Vertex>, xf: &Affine2, x: f32, y: f32, w: f32, len: f32, color: Color) {
    shapes::rect_transformed(out, xf, x - w / 2.0, y, w, len, color);
    shapes::rect_transformed(out, xf, x - w / 4.0, y, w / 2.0, len, palette::BLOCK_SHINE);
}

/// Figure coordinates: origin at the feet, y up is negative, 1 unit = 1 px at scale 1
fn draw_runner<R: Rng>(out: &mut Vec<Vertex>, state: &GameState, view: &mut View<'_, R>) {
    const LEG_LEN: f32 = 40.0;
    const BODY_W: f32 = 35.0;
    const BODY_H: f32 = 45.0;
    const HEAD: f32 = 24.0;

    let player = &state.player;
    let (p, s) = view.project(player.x, 0.0, player.z);
    let outfit = Outfit::for_score(state.score);

    let lean = player.lean.to_radians() * 0.5;
    let xf = Affine2::from_translation(p) * Affine2::from_angle(lean) * Affine2::from_scale(Vec2::splat(s));
    let at = |x: f32, y: f32| xf.transform_point2(Vec2::new(x, y));

    shapes::ellipse(
        out,
        p,
        Vec2::new(player.width * 0.6, player.width * 0.2) * s,
        [0.0, 0.0, 0.0, 0.4],
        24,
    );

    // Legs swing in opposite phase with distance
    let stride = state.distance / 30.0;
    let hip = -LEG_LEN * 2.0;
    limb(out, &xf, 10.0, hip + (stride + PI).sin() * 5.0, 12.0, LEG_LEN, palette::LEGS);
    limb(out, &xf, -10.0, hip + stride.sin() * 5.0, 12.0, LEG_LEN, palette::LEGS);

    let chest = hip - BODY_H;
    shapes::quad(
        out,
        [
            at(-BODY_W / 2.0, hip),
            at(BODY_W / 2.0, hip),
            at(BODY_W / 1.5, chest),
            at(-BODY_W / 1.5, chest),
        ],
        outfit.primary,
    );
    shapes::rect_transformed(out, &xf, -10.0, chest + 10.0, 20.0, 25.0, outfit.secondary);

    let head_y = chest - HEAD / 2.0;
    shapes::circle(out, at(0.0, head_y), HEAD / 2.0 * s, outfit.primary, 16);
    shapes::rect_transformed(out, &xf, -10.0, head_y - 2.0, 20.0, 4.0, palette::VISOR);

    let shoulder = chest + 5.0;
    if outfit.armor {
        shapes::circle(out, at(-22.0, shoulder), 12.0 * s, outfit.secondary, 16);
        shapes::circle(out, at(22.0, shoulder), 12.0 * s, outfit.secondary, 16);
    }
    limb(out, &xf, -22.0, shoulder, 10.0, 30.0, outfit.primary);
    limb(out, &xf, 22.0, shoulder, 10.0, 30.0, outfit.primary);

    if outfit.wings {
        for side in [-1.0, 1.0] {
            let root = at(side * 10.0, chest + 20.0);
            let tip = at(side * 60.0, chest - 20.0);
            let back = at(side * 20.0, chest + 10.0);
            shapes::line(out, root, tip, 4.0 * s, palette::WINGS);
            shapes::line(out, tip, back, 4.0 * s, palette::WINGS);
        }

        // Thruster flicker
        if view.rng.random::<f32>() > 0.5 {
            let flame = with_alpha(palette::ARMOR_BLUE, 0.6);
            for base in [-20.0, 20.0] {
                let c = at(base + view.rng.random::<f32>() * 10.0, chest + 20.0);
                let r = view.rng.random::<f32>() * 8.0 * s;
                shapes::circle(out, c, r, flame, 12);
            }
        }
    }

    label(out, &state.score.to_string(), at(0.0, -160.0), 18.0 * s, palette::WHITE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::QualityPreset;
    use crate::sim::spawn::spawn_boss;
    use crate::sim::{GamePhase, Particle};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn playing() -> GameState {
        let mut state = GameState::new(3);
        state.phase = GamePhase::Playing;
        state.set_viewport(800.0, 600.0);
        state
    }

    #[test]
    fn test_scene_is_a_triangle_list() {
        let mut state = playing();
        let id = state.next_entity_id();
        state.entities.push(spawn_boss(id, 2));
        let mut rng = Pcg32::seed_from_u64(1);
        let vertices = build_scene(&state, &Settings::default(), &mut rng);
        assert!(!vertices.is_empty());
        assert_eq!(vertices.len() % 3, 0);
    }

    #[test]
    fn test_backdrop_comes_first() {
        let state = playing();
        let mut rng = Pcg32::seed_from_u64(1);
        let vertices = build_scene(&state, &Settings::default(), &mut rng);
        let theme = palette::theme_for_level(1);
        assert_eq!(vertices[0].color, theme.sky_top);
        assert_eq!(vertices[0].position, [0.0, 0.0]);
    }

    #[test]
    fn test_particles_are_drawn_last() {
        let mut state = playing();
        let color = [0.1, 0.2, 0.3, 1.0];
        state.particles.push(Particle {
            pos: Vec2::new(100.0, 100.0),
            vel: Vec2::ZERO,
            life: 0.25,
            max_life: 0.5,
            color,
            size: 4.0,
        });
        let mut rng = Pcg32::seed_from_u64(1);
        let vertices = build_scene(&state, &Settings::default(), &mut rng);
        let last = vertices.last().copied().unwrap();
        assert_eq!(last.color, [0.1, 0.2, 0.3, 0.5]);

        let hidden = Settings {
            particles: false,
            ..Settings::default()
        };
        let vertices = build_scene(&state, &hidden, &mut rng);
        assert!(vertices.iter().all(|v| v.color != [0.1, 0.2, 0.3, 0.5]));
    }

    #[test]
    fn test_low_quality_skips_road_lines() {
        let state = playing();
        let mut rng = Pcg32::seed_from_u64(1);
        let high = build_scene(&state, &Settings::from_preset(QualityPreset::High), &mut rng);
        let low = build_scene(&state, &Settings::from_preset(QualityPreset::Low), &mut rng);
        let stripes = |v: &[Vertex]| v.iter().filter(|v| v.color == palette::ROAD_STRIPE).count();
        // Legs share the stripe color; the difference is the grid and lanes
        assert!(stripes(&high) > stripes(&low));
    }

    #[test]
    fn test_outfit_upgrades_with_score() {
        assert!(!Outfit::for_score(99).armor);
        let mid = Outfit::for_score(100);
        assert!(mid.armor && !mid.wings);
        assert_eq!(mid.primary, palette::ARMOR_RED);
        let top = Outfit::for_score(300);
        assert!(top.wings);
        assert_eq!(top.primary, palette::ARMOR_GOLD);
    }

    #[test]
    fn test_far_entities_draw_before_near_ones() {
        let mut state = playing();
        for (z, color) in [(200.0, [0.9, 0.0, 0.0, 1.0]), (2000.0, [0.0, 0.9, 0.0, 1.0])] {
            let id = state.next_entity_id();
            state.entities.push(Entity {
                id,
                pos: Vec3::new(0.0, 0.0, z),
                width: BLOCK_SIZE,
                height: BLOCK_SIZE,
                color,
                kind: EntityKind::Enemy { power: 5 },
            });
        }
        let mut rng = Pcg32::seed_from_u64(1);
        let vertices = build_scene(&state, &Settings::default(), &mut rng);
        let first = |c: [f32; 4]| vertices.iter().position(|v| v.color == c).unwrap();
        assert!(first([0.0, 0.9, 0.0, 1.0]) < first([0.9, 0.0, 0.0, 1.0]));
    }
}
