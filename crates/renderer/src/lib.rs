//! Rendering seam for the warp field.
//!
//! The field never talks to a graphics API directly. It asks a [`RenderBackend`]
//! for textured surfaces and a particle buffer, and hands it one
//! [`FrameSubmission`] per tick.

pub mod backend;
pub mod camera;
pub mod headless;
pub mod vertex;

pub use backend::*;
pub use camera::*;
pub use headless::*;
pub use vertex::*;
