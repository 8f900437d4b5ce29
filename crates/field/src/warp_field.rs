//! The billboard pool and particle cloud, advanced once per tick.

use crate::billboard::{Billboard, Placement};
use crate::config::FieldConfig;
use crate::error::FieldError;
use crate::layout::layout_text;
use crate::motion::{frames_for, Direction, MotionState};
use crate::particles::ParticleField;
use glam::Vec3;
use procgen::{ProfileStats, PromptGenerator};
use rand::rngs::StdRng;
use rand::SeedableRng;
use renderer::{
    BillboardInstance, Camera, CameraUniform, FrameSubmission, RenderBackend, PARTICLE_OPACITY,
    PARTICLE_SIZE,
};

/// Seed plus the next prompt index. The index only ever goes up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationState {
    pub seed: u32,
    pub next_index: u64,
}

impl GenerationState {
    pub fn new(seed: u32, first_index: u64) -> Self {
        Self {
            seed,
            next_index: first_index,
        }
    }

    /// Claim the next index.
    pub fn advance(&mut self) -> u64 {
        let index = self.next_index;
        self.next_index += 1;
        index
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub recycled: usize,
    pub failed_spawns: usize,
    pub active_particles: usize,
}

/// Snapshot for HUD display.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldStats {
    pub seed: u32,
    pub next_index: u64,
    pub current_speed: f32,
    pub target_speed: f32,
    pub direction: Direction,
    pub billboards: usize,
    pub active_particles: usize,
    pub recycled: u64,
    pub profile: ProfileStats,
}

/// Owner of every live billboard, the particle buffer, and the motion state.
#[derive(Debug)]
pub struct WarpField {
    config: FieldConfig,
    generator: PromptGenerator,
    generation: GenerationState,
    motion: MotionState,
    camera: Camera,
    billboards: Vec<Billboard>,
    particles: ParticleField,
    rng: StdRng,
    instances: Vec<BillboardInstance>,
    recycled: u64,
    /// Per slot, latched while that slot's replacement keeps failing so each
    /// fault episode is reported once.
    slot_faults: Vec<bool>,
    submit_fault: bool,
    pending_error: Option<FieldError>,
}

impl WarpField {
    /// Build a full pool. Fails without leaking anything if the backend
    /// is unavailable or any resource cannot be created.
    pub fn new<B: RenderBackend + ?Sized>(
        backend: &mut B,
        config: &FieldConfig,
        generator: PromptGenerator,
        seed: u32,
        motion: MotionState,
    ) -> Result<Self, FieldError> {
        backend.probe().map_err(FieldError::Precondition)?;

        let config = config.sanitized();
        let mut rng = match config.spawn_seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let buffer = backend
            .create_particle_buffer(config.particle_capacity)
            .map_err(FieldError::ParticleBuffer)?;
        let particles = ParticleField::new(&mut rng, &config, buffer);

        let mut field = Self {
            generator,
            generation: GenerationState::new(seed, config.variant.first_index()),
            motion,
            camera: Camera::default(),
            billboards: Vec::with_capacity(config.billboard_count),
            slot_faults: vec![false; config.billboard_count],
            particles,
            rng,
            instances: Vec::with_capacity(config.billboard_count),
            recycled: 0,
            submit_fault: false,
            pending_error: None,
            config,
        };

        for slot in 0..field.config.billboard_count {
            match field.spawn(backend, slot) {
                Ok(billboard) => field.billboards.push(billboard),
                Err(e) => {
                    field.release(backend);
                    return Err(e);
                }
            }
        }

        log::info!(
            "Warp field ready: seed {:08X}, {} billboards, {} particles, profile {:?}",
            seed,
            field.billboards.len(),
            field.particles.capacity(),
            field.generator.profile().display_name()
        );
        Ok(field)
    }

    /// Generate the next prompt and build a billboard for it.
    ///
    /// Size and placement follow the live speed and direction.
    fn spawn<B: RenderBackend + ?Sized>(&mut self, backend: &mut B, slot: usize) -> Result<Billboard, FieldError> {
        let index = self.generation.advance();
        let text = self.generator.generate(self.generation.seed, index);
        let desc = layout_text(&text, self.motion.current_speed, self.config.variant);
        let placement = Placement::sample(&mut self.rng, self.motion.direction, self.config.variant);
        let surface = backend
            .create_surface(&desc)
            .map_err(|source| FieldError::Resource { slot, source })?;
        Ok(Billboard::spawn(text, index, placement, &desc, surface, self.camera.position()))
    }

    /// Advance one frame. `dt` of `None` is one reference frame.
    pub fn tick<B: RenderBackend + ?Sized>(&mut self, backend: &mut B, dt: Option<f32>) -> TickReport {
        let frames = frames_for(dt);
        self.motion.ease(self.config.lerp_factor, frames);

        let step = self.motion.step(frames);
        let direction = self.motion.direction;
        let viewpoint = self.camera.position();
        let mut report = TickReport::default();

        for slot in 0..self.billboards.len() {
            self.billboards[slot].update(step, direction, viewpoint, &self.config);
            if self.billboards[slot].should_recycle(direction, &self.config) {
                if self.recycle(backend, slot) {
                    report.recycled += 1;
                } else {
                    report.failed_spawns += 1;
                }
            }
        }
        self.recycled += report.recycled as u64;
        if report.recycled > 0 {
            log::debug!("Recycled {} billboards (next index {})", report.recycled, self.generation.next_index);
        }

        self.particles
            .update(self.motion.current_speed, step, direction, &self.config);
        report.active_particles = self.particles.active_count();

        self.submit(backend);
        report
    }

    /// Replace the billboard in `slot`. On failure the old one stays put.
    fn recycle<B: RenderBackend + ?Sized>(&mut self, backend: &mut B, slot: usize) -> bool {
        match self.spawn(backend, slot) {
            Ok(fresh) => {
                let old = std::mem::replace(&mut self.billboards[slot], fresh);
                backend.release_surface(old.surface);
                self.slot_faults[slot] = false;
                true
            }
            Err(e) => {
                if !std::mem::replace(&mut self.slot_faults[slot], true) {
                    log::warn!("{}; keeping the previous billboard", e);
                    self.pending_error = Some(e);
                }
                false
            }
        }
    }

    fn submit<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        self.instances.clear();
        self.instances.extend(self.billboards.iter().map(Billboard::instance));
        let frame = FrameSubmission {
            camera: CameraUniform::from_camera(&self.camera),
            billboards: &self.instances,
            particles: self.particles.buffer(),
            particle_vertices: self.particles.vertices(),
            active_particles: self.particles.active_count(),
            particle_size: PARTICLE_SIZE,
            particle_opacity: PARTICLE_OPACITY,
        };
        match backend.submit(&frame) {
            Ok(()) => self.submit_fault = false,
            Err(e) => {
                if !self.submit_fault {
                    log::warn!("Frame submission failed: {}", e);
                    self.pending_error = Some(FieldError::Submit(e));
                    self.submit_fault = true;
                }
            }
        }
    }

    /// Release every surface and the particle buffer.
    pub fn release<B: RenderBackend + ?Sized>(mut self, backend: &mut B) {
        let count = self.billboards.len();
        for billboard in self.billboards.drain(..) {
            backend.release_surface(billboard.surface);
        }
        backend.release_particle_buffer(self.particles.buffer());
        log::debug!("Released {} billboards and the particle buffer", count);
    }

    /// Take the error raised since the last call, if any.
    pub fn take_error(&mut self) -> Option<FieldError> {
        self.pending_error.take()
    }

    pub fn stats(&self) -> FieldStats {
        FieldStats {
            seed: self.generation.seed,
            next_index: self.generation.next_index,
            current_speed: self.motion.current_speed,
            target_speed: self.motion.target_speed,
            direction: self.motion.direction,
            billboards: self.billboards.len(),
            active_particles: self.particles.active_count(),
            recycled: self.recycled,
            profile: self.generator.profile().stats(),
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn generation(&self) -> GenerationState {
        self.generation
    }

    pub fn motion(&self) -> &MotionState {
        &self.motion
    }

    pub fn motion_mut(&mut self) -> &mut MotionState {
        &mut self.motion
    }

    pub fn billboards(&self) -> &[Billboard] {
        &self.billboards
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn viewpoint(&self) -> Vec3 {
        self.camera.position()
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procgen::{Profile, Variant};
    use renderer::HeadlessBackend;
    use std::sync::Arc;

    fn config() -> FieldConfig {
        FieldConfig {
            spawn_seed: Some(11),
            ..Default::default()
        }
    }

    fn generator() -> PromptGenerator {
        PromptGenerator::for_variant(Arc::new(Profile::builtin().unwrap()), Variant::Elastic)
    }

    fn build(backend: &mut HeadlessBackend) -> WarpField {
        WarpField::new(backend, &config(), generator(), 12345, MotionState::default()).unwrap()
    }

    #[test]
    fn new_fills_the_pool_with_consecutive_indices() {
        let mut backend = HeadlessBackend::new();
        let field = build(&mut backend);
        assert_eq!(field.billboards().len(), 30);
        assert_eq!(backend.live_surfaces(), 30);
        assert_eq!(backend.live_buffers(), 1);
        let indices: Vec<_> = field.billboards().iter().map(|b| b.generation_index).collect();
        assert_eq!(indices, (1..=30).collect::<Vec<_>>());
        assert_eq!(field.generation().next_index, 31);
        assert_eq!(
            field.billboards()[0].text,
            "a shark investigating an underwater cavern, documentary photography, sunset backlight, bokeh background, 4k, horrific atmosphere"
        );
    }

    #[test]
    fn unavailable_backend_is_a_precondition_error() {
        let mut backend = HeadlessBackend::unavailable("no context");
        let err = WarpField::new(&mut backend, &config(), generator(), 1, MotionState::default()).unwrap_err();
        assert!(matches!(err, FieldError::Precondition(_)));
        assert_eq!(backend.live_buffers(), 0);
    }

    #[test]
    fn failed_construction_releases_partial_pool() {
        let mut backend = HeadlessBackend::new();
        backend.fail_after_surfaces(10);
        let err = WarpField::new(&mut backend, &config(), generator(), 1, MotionState::default()).unwrap_err();
        assert!(matches!(err, FieldError::Resource { slot: 10, .. }));
        assert_eq!(backend.surfaces_created(), 10);
        assert_eq!(backend.live_surfaces(), 0);
        assert_eq!(backend.live_buffers(), 0);
    }

    #[test]
    fn first_tick_eases_speed() {
        let mut backend = HeadlessBackend::new();
        let mut field = build(&mut backend);
        field.motion_mut().target_speed = 5.0;
        field.tick(&mut backend, None);
        assert!((field.motion().current_speed - 1.2).abs() < 1e-6);
        assert_eq!(backend.frames(), 1);
        assert_eq!(backend.last_frame().billboards, 30);
    }

    #[test]
    fn forward_billboard_past_near_threshold_is_replaced_in_place() {
        let mut backend = HeadlessBackend::new();
        let mut field = build(&mut backend);
        let old_index = field.billboards[4].generation_index;
        let old_surface = field.billboards[4].surface;
        field.billboards[4].transform.position.z = 9.5;

        let report = field.tick(&mut backend, None);

        assert!(report.recycled >= 1);
        let fresh = &field.billboards()[4];
        assert!(fresh.generation_index > old_index);
        assert!(fresh.generation_index >= 30);
        assert_ne!(fresh.surface, old_surface);
        assert!(fresh.depth() <= -50.0);
        assert!(backend.surface(old_surface).is_none());
        assert_eq!(backend.live_surfaces(), 30);
        assert_eq!(field.billboards().len(), 30);
    }

    #[test]
    fn backward_billboards_fade_then_recycle_behind_viewer() {
        let mut backend = HeadlessBackend::new();
        let mut field = build(&mut backend);
        field.motion_mut().toggle_direction();
        field.billboards[0].transform.position.z = -100.0;
        field.billboards[1].transform.position.z = -149.0;
        let base = field.billboards[0].base_opacity;

        field.tick(&mut backend, None);

        let faded = &field.billboards()[0];
        assert!(faded.opacity < base);
        assert!(faded.opacity > 0.0);
        let respawned = &field.billboards()[1];
        assert!(respawned.generation_index >= 30);
        assert!((10.0..=110.0).contains(&respawned.depth()));
    }

    #[test]
    fn spawn_failure_keeps_old_billboard_and_reports_once() {
        let mut backend = HeadlessBackend::new();
        let mut field = build(&mut backend);
        field.billboards[2].transform.position.z = 50.0;
        let stuck_surface = field.billboards[2].surface;
        backend.fail_next_surfaces(3);

        let report = field.tick(&mut backend, None);
        assert_eq!(report.failed_spawns, 1);
        assert_eq!(field.billboards()[2].surface, stuck_surface);
        assert!(matches!(field.take_error(), Some(FieldError::Resource { slot: 2, .. })));

        field.tick(&mut backend, None);
        assert!(field.take_error().is_none(), "fault must be reported once");

        // Third failure consumed, then recovery.
        field.tick(&mut backend, None);
        field.tick(&mut backend, None);
        assert_ne!(field.billboards()[2].surface, stuck_surface);
        assert_eq!(backend.live_surfaces(), 30);
    }

    #[test]
    fn recurring_slot_failure_is_reported_once_while_others_recycle() {
        let mut backend = HeadlessBackend::new();
        let mut field = build(&mut backend);
        let mut reports = 0;
        for _ in 0..5 {
            field.billboards[0].transform.position.z = 9.5;
            field.billboards[1].transform.position.z = 9.5;
            backend.fail_next_surfaces(1);
            let report = field.tick(&mut backend, None);
            assert_eq!(report.failed_spawns, 1);
            assert!(report.recycled >= 1);
            if field.take_error().is_some() {
                reports += 1;
            }
        }
        assert_eq!(reports, 1);

        // Slot 0 recovers, then a fresh failure is a new episode.
        field.billboards[0].transform.position.z = 9.5;
        field.tick(&mut backend, None);
        assert!(field.take_error().is_none());
        field.billboards[0].transform.position.z = 9.5;
        backend.fail_next_surfaces(1);
        field.tick(&mut backend, None);
        assert!(matches!(field.take_error(), Some(FieldError::Resource { slot: 0, .. })));
    }

    #[test]
    fn classic_fields_start_at_index_zero() {
        let mut backend = HeadlessBackend::new();
        let config = FieldConfig {
            variant: Variant::Classic,
            ..config()
        };
        let generator = PromptGenerator::for_variant(Arc::new(Profile::classic().unwrap()), Variant::Classic);
        let field = WarpField::new(&mut backend, &config, generator, 12345, MotionState::default()).unwrap();
        assert_eq!(field.billboards()[0].generation_index, 0);
        assert_eq!(field.billboards()[0].text, "a golem hovering over a crystal cave, dark academia, playful");
        assert_eq!(field.generation().next_index, 30);
    }

    #[test]
    fn particle_count_follows_current_speed() {
        let mut backend = HeadlessBackend::new();
        let mut field = build(&mut backend);
        *field.motion_mut() = MotionState::at_rest(0.1);
        let report = field.tick(&mut backend, None);
        assert_eq!(report.active_particles, 190);
        assert_eq!(backend.last_frame().active_particles, 190);
    }

    #[test]
    fn spawn_size_tracks_live_speed() {
        let mut backend = HeadlessBackend::new();
        let mut field = build(&mut backend);
        let normal_width = field.billboards()[0].size.x;
        *field.motion_mut() = MotionState::at_rest(0.2);
        field.billboards[0].transform.position.z = 9.9;
        field.tick(&mut backend, None);
        assert!(field.billboards()[0].size.x > normal_width);
    }

    #[test]
    fn release_frees_everything() {
        let mut backend = HeadlessBackend::new();
        let mut field = build(&mut backend);
        for _ in 0..200 {
            field.tick(&mut backend, None);
        }
        field.release(&mut backend);
        assert_eq!(backend.live_surfaces(), 0);
        assert_eq!(backend.live_buffers(), 0);
        assert_eq!(backend.surfaces_created(), backend.surfaces_released());
    }

    #[test]
    fn stats_snapshot() {
        let mut backend = HeadlessBackend::new();
        let field = build(&mut backend);
        let stats = field.stats();
        assert_eq!(stats.seed, 12345);
        assert_eq!(stats.billboards, 30);
        assert_eq!(stats.profile.pools, 8);
        assert_eq!(stats.direction, Direction::Forward);
    }
}
