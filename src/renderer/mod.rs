//! WebGPU rendering module
//!
//! The scene is tessellated on the CPU into a pixel-space triangle list,
//! then uploaded and drawn with a single flat-color pipeline.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build_scene;
pub use vertex::Vertex;
