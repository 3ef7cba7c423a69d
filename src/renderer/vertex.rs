//! Vertex type for the 2D triangle list

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::palette::Color;

/// Position in pixels (scene) or NDC (uploaded), plus color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: Color) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn at(p: Vec2, color: Color) -> Self {
        Self::new(p.x, p.y, color)
    }

    /// Map a pixel-space vertex (y down) to clip space (y up)
    pub fn to_ndc(self, viewport: Vec2) -> Self {
        let [x, y] = self.position;
        Self::new(
            x / viewport.x * 2.0 - 1.0,
            1.0 - y / viewport.y * 2.0,
            self.color,
        )
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_to_ndc_corners() {
        let viewport = Vec2::new(800.0, 600.0);
        let top_left = Vertex::new(0.0, 0.0, [1.0; 4]).to_ndc(viewport);
        assert_eq!(top_left.position, [-1.0, 1.0]);
        let bottom_right = Vertex::new(800.0, 600.0, [1.0; 4]).to_ndc(viewport);
        assert_eq!(bottom_right.position, [1.0, -1.0]);
        let center = Vertex::new(400.0, 300.0, [1.0; 4]).to_ndc(viewport);
        assert_eq!(center.position, [0.0, 0.0]);
    }
}
