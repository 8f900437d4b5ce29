//! What the host does when a tick fails.

use field::{FieldError, Session};
use renderer::RenderBackend;

/// Handle a failed tick. Returns whether the host should keep running.
///
/// Only a missing rendering context is fatal. Anything else, such as a
/// surface failure while rebuilding after a reseed, leaves the session idle;
/// it is restarted here and, if that fails too, again on the next frame.
pub fn keep_running_after<B: RenderBackend>(session: &mut Session<B>, error: FieldError) -> bool {
    if let FieldError::Precondition(e) = &error {
        log::error!("Rendering unavailable: {}", e);
        return false;
    }
    if !matches!(error, FieldError::NotRunning) {
        log::warn!("{}; restarting the warp field", error);
    }
    match session.start() {
        Ok(()) => true,
        Err(FieldError::Precondition(e)) => {
            log::error!("Rendering unavailable: {}", e);
            false
        }
        Err(e) => {
            log::debug!("Restart failed: {}; retrying next frame", e);
            true
        }
    }
}
