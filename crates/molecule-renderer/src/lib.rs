//! # Molecule Renderer
//!
//! Draws molecules as filled circles: a backend-agnostic [`Canvas`]
//! contract plus a wgpu implementation of it.

pub mod canvas;
pub mod projection;
pub mod renderer;

pub use canvas::*;
pub use projection::*;
pub use renderer::*;
