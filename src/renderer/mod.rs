//! Rendering module
//!
//! `canvas` turns game state into draw primitives; `pipeline` puts the
//! shape primitives on a WebGPU surface.

pub mod canvas;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use canvas::{Canvas, Color, DrawCommand, DrawList, draw_frame};
pub use pipeline::RenderState;
pub use vertex::Vertex;
