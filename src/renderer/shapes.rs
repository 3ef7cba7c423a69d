//! Shape generation for 2D primitives
//!
//! Every builder appends triangles to an output list in pixel space.

use glam::{Affine2, Vec2};
use std::f32::consts::TAU;

use super::vertex::Vertex;
use crate::palette::Color;

pub fn triangle(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: Color) {
    out.push(Vertex::at(a, color));
    out.push(Vertex::at(b, color));
    out.push(Vertex::at(c, color));
}

/// Convex quad given in winding order
pub fn quad(out: &mut Vec<Vertex>, corners: [Vec2; 4], color: Color) {
    let [a, b, c, d] = corners;
    triangle(out, a, b, c, color);
    triangle(out, a, c, d, color);
}

/// Axis-aligned rectangle from its top-left corner
pub fn rect(out: &mut Vec<Vertex>, x: f32, y: f32, w: f32, h: f32, color: Color) {
    quad(
        out,
        [
            Vec2::new(x, y),
            Vec2::new(x + w, y),
            Vec2::new(x + w, y + h),
            Vec2::new(x, y + h),
        ],
        color,
    );
}

/// Rectangle pushed through a transform (for rotated figures)
pub fn rect_transformed(
    out: &mut Vec<Vertex>,
    xf: &Affine2,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    color: Color,
) {
    quad(
        out,
        [
            xf.transform_point2(Vec2::new(x, y)),
            xf.transform_point2(Vec2::new(x + w, y)),
            xf.transform_point2(Vec2::new(x + w, y + h)),
            xf.transform_point2(Vec2::new(x, y + h)),
        ],
        color,
    );
}

/// Rectangle with a vertical color gradient
pub fn gradient_rect(out: &mut Vec<Vertex>, x: f32, y: f32, w: f32, h: f32, top: Color, bottom: Color) {
    let tl = Vertex::new(x, y, top);
    let tr = Vertex::new(x + w, y, top);
    let br = Vertex::new(x + w, y + h, bottom);
    let bl = Vertex::new(x, y + h, bottom);
    out.extend_from_slice(&[tl, tr, br, tl, br, bl]);
}

/// Line segment with thickness
pub fn line(out: &mut Vec<Vertex>, from: Vec2, to: Vec2, width: f32, color: Color) {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    let perp = dir.perp() * (width / 2.0);
    quad(out, [from + perp, to + perp, to - perp, from - perp], color);
}

/// Filled ellipse
pub fn ellipse(out: &mut Vec<Vertex>, center: Vec2, radii: Vec2, color: Color, segments: u32) {
    let segments = segments.max(3);
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        triangle(
            out,
            center,
            center + Vec2::new(theta1.cos(), theta1.sin()) * radii,
            center + Vec2::new(theta2.cos(), theta2.sin()) * radii,
            color,
        );
    }
}

/// Filled circle
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: Color, segments: u32) {
    ellipse(out, center, Vec2::splat(radius), color, segments);
}

/// Segment count that keeps circles smooth without wasting triangles
pub fn segments_for(radius: f32) -> u32 {
    (radius * 0.75).clamp(8.0, 48.0) as u32
}

// === Bitmap text ===

/// Glyph cells are 5x5; each row stores its pixels in the low five bits
const GLYPH_SIZE: usize = 5;
/// Horizontal advance in glyph pixels (one pixel of spacing)
const GLYPH_ADVANCE: f32 = 6.0;

fn glyph(c: char) -> Option<[u8; GLYPH_SIZE]> {
    let rows = match c {
        '0' => [0b01110, 0b10011, 0b10101, 0b11001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b01110],
        '2' => [0b11110, 0b00001, 0b01110, 0b10000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00110, 0b00001, 0b11110],
        '4' => [0b10010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b11110],
        '6' => [0b01110, 0b10000, 0b11110, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b00100],
        '8' => [0b01110, 0b10001, 0b01110, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b01111, 0b00001, 0b01110],
        '+' => [0b00100, 0b00100, 0b11111, 0b00100, 0b00100],
        '-' => [0b00000, 0b00000, 0b11111, 0b00000, 0b00000],
        'x' => [0b10001, 0b01010, 0b00100, 0b01010, 0b10001],
        '÷' => [0b00100, 0b00000, 0b11111, 0b00000, 0b00100],
        '☠' => [0b01110, 0b10101, 0b11111, 0b01110, 0b01010],
        'B' => [0b11110, 0b10001, 0b11110, 0b10001, 0b11110],
        'H' => [0b10001, 0b10001, 0b11111, 0b10001, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b11110, 0b10000, 0b10000],
        'S' => [0b01111, 0b10000, 0b01110, 0b00001, 0b11110],
        'V' => [0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        _ => return None,
    };
    Some(rows)
}

/// Width in pixels of `text` drawn `height` pixels tall
pub fn text_width(text: &str, height: f32) -> f32 {
    let n = text.chars().count() as f32;
    if n == 0.0 {
        return 0.0;
    }
    let px = height / GLYPH_SIZE as f32;
    (n * GLYPH_ADVANCE - 1.0) * px
}

/// Draw `text` centered on `center`. Unknown characters render as gaps.
pub fn text(out: &mut Vec<Vertex>, text: &str, center: Vec2, height: f32, color: Color) {
    if height <= 0.0 {
        return;
    }
    let px = height / GLYPH_SIZE as f32;
    let origin = center - Vec2::new(text_width(text, height), height) / 2.0;

    for (i, c) in text.chars().enumerate() {
        let Some(rows) = glyph(c) else { continue };
        let cell_x = origin.x + i as f32 * GLYPH_ADVANCE * px;

        for (row, bits) in rows.iter().enumerate() {
            let y = origin.y + row as f32 * px;
            // Merge horizontal runs into one rectangle
            let mut col = 0;
            while col < GLYPH_SIZE {
                if bits & (1 << (GLYPH_SIZE - 1 - col)) == 0 {
                    col += 1;
                    continue;
                }
                let start = col;
                while col < GLYPH_SIZE && bits & (1 << (GLYPH_SIZE - 1 - col)) != 0 {
                    col += 1;
                }
                rect(
                    out,
                    cell_x + start as f32 * px,
                    y,
                    (col - start) as f32 * px,
                    px,
                    color,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette;

    #[test]
    fn test_triangle_counts() {
        let mut out = Vec::new();
        rect(&mut out, 0.0, 0.0, 10.0, 10.0, palette::WHITE);
        assert_eq!(out.len(), 6);

        out.clear();
        circle(&mut out, Vec2::ZERO, 5.0, palette::WHITE, 12);
        assert_eq!(out.len(), 36);

        out.clear();
        line(&mut out, Vec2::ZERO, Vec2::ZERO, 3.0, palette::WHITE);
        assert!(out.is_empty());
    }

    #[test]
    fn test_every_block_label_has_glyphs() {
        for label in ["+12", "x3", "-7", "÷2", "☠", "BOSS LVL 10", "HP 486"] {
            for c in label.chars().filter(|c| *c != ' ') {
                assert!(glyph(c).is_some(), "missing glyph {c:?}");
            }
        }
    }

    #[test]
    fn test_text_is_centered() {
        let mut out = Vec::new();
        text(&mut out, "-", Vec2::new(100.0, 50.0), 10.0, palette::WHITE);
        // One merged run: the middle row of the minus sign
        assert_eq!(out.len(), 6);
        let xs: Vec<f32> = out.iter().map(|v| v.position[0]).collect();
        let min = xs.iter().cloned().fold(f32::MAX, f32::min);
        let max = xs.iter().cloned().fold(f32::MIN, f32::max);
        assert!(((min + max) / 2.0 - 100.0).abs() < 1e-4);
        assert_eq!(text_width("12", 10.0), 22.0);
    }

    #[test]
    fn test_rotated_rect_keeps_area() {
        let mut out = Vec::new();
        let xf = Affine2::from_angle(0.5);
        rect_transformed(&mut out, &xf, 0.0, 0.0, 4.0, 2.0, palette::WHITE);
        let p: Vec<Vec2> = out.iter().map(|v| Vec2::from(v.position)).collect();
        let area = |a: Vec2, b: Vec2, c: Vec2| ((b - a).perp_dot(c - a) / 2.0).abs();
        let total = area(p[0], p[1], p[2]) + area(p[3], p[4], p[5]);
        assert!((total - 8.0).abs() < 1e-4);
    }
}
