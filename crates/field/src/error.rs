//! Errors raised by the field and its session.

use renderer::RenderError;

#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    /// No rendering capability; the field is never constructed.
    #[error("cannot start the warp field: {0}")]
    Precondition(#[source] RenderError),
    /// One billboard could not be built. The slot keeps whatever it held.
    #[error("billboard slot {slot} could not be spawned: {source}")]
    Resource {
        slot: usize,
        #[source]
        source: RenderError,
    },
    #[error("particle buffer could not be created: {0}")]
    ParticleBuffer(#[source] RenderError),
    #[error("frame submission failed: {0}")]
    Submit(#[source] RenderError),
    #[error("the session is not running")]
    NotRunning,
}
