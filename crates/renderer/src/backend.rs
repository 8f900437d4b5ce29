//! The capabilities the field needs from whatever draws it.

use crate::camera::CameraUniform;
use crate::vertex::{BillboardInstance, ParticleVertex};

/// Handle to a textured rectangle owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u32);

/// Handle to a point-cloud buffer owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleBufferId(pub u32);

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// No graphics context can be obtained at all.
    #[error("rendering is unavailable: {0}")]
    Unavailable(String),
    #[error("failed to create surface: {0}")]
    SurfaceCreation(String),
    #[error("failed to create particle buffer: {0}")]
    BufferCreation(String),
    #[error("surface {0:?} is not live")]
    UnknownSurface(SurfaceId),
    #[error("particle buffer {0:?} is not live")]
    UnknownBuffer(ParticleBufferId),
}

/// Pre-wrapped text and the pixel metrics to draw it with. Lines are centred.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub font_px: u32,
    pub line_height_px: u32,
    pub padding_px: u32,
    /// Glyph colour, RGBA 0..1.
    pub color: [f32; 4],
}

/// Everything a backend needs to build one billboard.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceDesc {
    /// World-space width of the rectangle.
    pub width: f32,
    /// World-space height of the rectangle.
    pub height: f32,
    /// Texture size in pixels.
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub background: [f32; 4],
    pub text: TextBlock,
}

/// One frame's worth of draw data.
#[derive(Debug)]
pub struct FrameSubmission<'a> {
    pub camera: CameraUniform,
    pub billboards: &'a [BillboardInstance],
    pub particles: ParticleBufferId,
    /// Full buffer contents; hidden slots sit far outside the view volume.
    pub particle_vertices: &'a [ParticleVertex],
    pub active_particles: usize,
    /// Point size in world units.
    pub particle_size: f32,
    pub particle_opacity: f32,
}

/// A graphics collaborator.
///
/// Surfaces and buffers are explicitly released; a handle that is never
/// released is a leak in the backend.
pub trait RenderBackend {
    /// Report whether a graphics context exists at all.
    fn probe(&self) -> Result<(), RenderError>;

    /// Build a textured rectangle from a text description.
    fn create_surface(&mut self, desc: &SurfaceDesc) -> Result<SurfaceId, RenderError>;

    /// Free a surface with its geometry and texture.
    fn release_surface(&mut self, id: SurfaceId);

    fn create_particle_buffer(&mut self, capacity: usize) -> Result<ParticleBufferId, RenderError>;

    fn release_particle_buffer(&mut self, id: ParticleBufferId);

    /// Draw one frame.
    fn submit(&mut self, frame: &FrameSubmission<'_>) -> Result<(), RenderError>;
}

impl<B: RenderBackend + ?Sized> RenderBackend for &mut B {
    fn probe(&self) -> Result<(), RenderError> {
        (**self).probe()
    }

    fn create_surface(&mut self, desc: &SurfaceDesc) -> Result<SurfaceId, RenderError> {
        (**self).create_surface(desc)
    }

    fn release_surface(&mut self, id: SurfaceId) {
        (**self).release_surface(id)
    }

    fn create_particle_buffer(&mut self, capacity: usize) -> Result<ParticleBufferId, RenderError> {
        (**self).create_particle_buffer(capacity)
    }

    fn release_particle_buffer(&mut self, id: ParticleBufferId) {
        (**self).release_particle_buffer(id)
    }

    fn submit(&mut self, frame: &FrameSubmission<'_>) -> Result<(), RenderError> {
        (**self).submit(frame)
    }
}
