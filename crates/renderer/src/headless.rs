//! A backend that draws nothing but keeps exact books on every resource.
//!
//! Used by the windowed host when no GPU renderer is attached, and by tests
//! to prove that teardown releases everything it created.

use crate::backend::{
    FrameSubmission, ParticleBufferId, RenderBackend, RenderError, SurfaceDesc, SurfaceId,
};
use std::collections::HashMap;

/// Counters from the most recent [`RenderBackend::submit`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub billboards: usize,
    pub active_particles: usize,
}

#[derive(Debug)]
pub struct HeadlessBackend {
    unavailable: Option<String>,
    next_id: u32,
    surfaces: HashMap<SurfaceId, SurfaceDesc>,
    buffers: HashMap<ParticleBufferId, usize>,
    /// Remaining surface creations that should fail.
    fail_surfaces: usize,
    /// Successful creations left before failures start.
    fail_after: Option<usize>,
    surfaces_created: u64,
    surfaces_released: u64,
    frames: u64,
    last_frame: FrameStats,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self {
            unavailable: None,
            next_id: 1,
            surfaces: HashMap::new(),
            buffers: HashMap::new(),
            fail_surfaces: 0,
            fail_after: None,
            surfaces_created: 0,
            surfaces_released: 0,
            frames: 0,
            last_frame: FrameStats::default(),
        }
    }

    /// A backend whose probe fails, as if no graphics context existed.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            unavailable: Some(reason.into()),
            ..Self::new()
        }
    }

    /// Make the next `count` surface creations fail.
    pub fn fail_next_surfaces(&mut self, count: usize) {
        self.fail_surfaces = count;
    }

    /// Let `successes` more surfaces through, then fail one.
    pub fn fail_after_surfaces(&mut self, successes: usize) {
        self.fail_after = Some(successes);
    }

    pub fn live_surfaces(&self) -> usize {
        self.surfaces.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&SurfaceDesc> {
        self.surfaces.get(&id)
    }

    pub fn surfaces_created(&self) -> u64 {
        self.surfaces_created
    }

    pub fn surfaces_released(&self) -> u64 {
        self.surfaces_released
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_frame(&self) -> FrameStats {
        self.last_frame
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }
}

impl RenderBackend for HeadlessBackend {
    fn probe(&self) -> Result<(), RenderError> {
        match &self.unavailable {
            Some(reason) => Err(RenderError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }

    fn create_surface(&mut self, desc: &SurfaceDesc) -> Result<SurfaceId, RenderError> {
        self.probe()?;
        match self.fail_after {
            Some(0) => {
                self.fail_after = None;
                return Err(RenderError::SurfaceCreation("injected failure".into()));
            }
            Some(n) => self.fail_after = Some(n - 1),
            None => {}
        }
        if self.fail_surfaces > 0 {
            self.fail_surfaces -= 1;
            return Err(RenderError::SurfaceCreation("injected failure".into()));
        }
        if desc.canvas_width == 0 || desc.canvas_height == 0 {
            return Err(RenderError::SurfaceCreation(format!(
                "empty canvas {}x{}",
                desc.canvas_width, desc.canvas_height
            )));
        }
        let id = SurfaceId(self.allocate_id());
        self.surfaces.insert(id, desc.clone());
        self.surfaces_created += 1;
        Ok(id)
    }

    fn release_surface(&mut self, id: SurfaceId) {
        if self.surfaces.remove(&id).is_some() {
            self.surfaces_released += 1;
        } else {
            log::warn!("Release of unknown surface {:?}", id);
        }
    }

    fn create_particle_buffer(&mut self, capacity: usize) -> Result<ParticleBufferId, RenderError> {
        self.probe()?;
        let id = ParticleBufferId(self.allocate_id());
        self.buffers.insert(id, capacity);
        Ok(id)
    }

    fn release_particle_buffer(&mut self, id: ParticleBufferId) {
        if self.buffers.remove(&id).is_none() {
            log::warn!("Release of unknown particle buffer {:?}", id);
        }
    }

    fn submit(&mut self, frame: &FrameSubmission<'_>) -> Result<(), RenderError> {
        let capacity = *self
            .buffers
            .get(&frame.particles)
            .ok_or(RenderError::UnknownBuffer(frame.particles))?;
        if frame.particle_vertices.len() > capacity {
            return Err(RenderError::BufferCreation(format!(
                "{} vertices submitted to a buffer of {}",
                frame.particle_vertices.len(),
                capacity
            )));
        }
        if let Some(stale) = frame
            .billboards
            .iter()
            .map(|b| SurfaceId(b.surface))
            .find(|id| !self.surfaces.contains_key(id))
        {
            return Err(RenderError::UnknownSurface(stale));
        }
        self.frames += 1;
        self.last_frame = FrameStats {
            billboards: frame.billboards.len(),
            active_particles: frame.active_particles,
        };
        Ok(())
    }
}
