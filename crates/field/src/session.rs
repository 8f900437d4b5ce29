//! Session lifecycle: `Idle -> Rebuilding -> Running`.
//!
//! Input handlers only ever queue a [`Command`]. The queue is drained at the
//! start of the next tick, so a seed change never lands mid-frame. Reseeding
//! or switching profiles tears the whole field down and builds a new one;
//! the motion state survives the switch, the generation index does not.

use crate::config::FieldConfig;
use crate::error::FieldError;
use crate::motion::MotionState;
use crate::warp_field::{FieldStats, TickReport, WarpField};
use procgen::{Profile, PromptGenerator};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use renderer::RenderBackend;
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No field exists. Either never started, shut down, or a rebuild failed.
    Idle,
    Rebuilding,
    Running,
}

/// Fire-and-forget control input, applied before the next tick.
#[derive(Debug, Clone)]
pub enum Command {
    Slower,
    Faster,
    ResetSpeed,
    /// Multiply the target speed.
    ScaleSpeed(f32),
    SetTargetSpeed(f32),
    ToggleDirection,
    Reseed(u32),
    RandomSeed,
    SwitchProfile(Arc<Profile>),
}

#[derive(Debug)]
pub struct Session<B: RenderBackend> {
    backend: B,
    config: FieldConfig,
    profile: Arc<Profile>,
    seed: u32,
    /// Motion used for the next build. Kept in sync while running.
    motion: MotionState,
    field: Option<WarpField>,
    state: SessionState,
    queue: VecDeque<Command>,
    seed_rng: StdRng,
    aspect: Option<(u32, u32)>,
    rebuilds: u64,
}

impl<B: RenderBackend> Session<B> {
    pub fn new(backend: B, config: &FieldConfig, profile: Arc<Profile>, seed: u32) -> Self {
        let config = config.sanitized();
        let seed_rng = match config.spawn_seed {
            Some(s) => StdRng::seed_from_u64(s.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };
        Self {
            backend,
            motion: MotionState::at_rest(config.default_speed),
            config,
            profile,
            seed,
            field: None,
            state: SessionState::Idle,
            queue: VecDeque::new(),
            seed_rng,
            aspect: None,
            rebuilds: 0,
        }
    }

    /// Build the first field. A missing rendering context is fatal and the
    /// session stays idle; nothing is retried.
    pub fn start(&mut self) -> Result<(), FieldError> {
        if self.state == SessionState::Running {
            return Ok(());
        }
        if let Err(e) = self.backend.probe() {
            log::error!("Rendering unavailable: {}", e);
            return Err(FieldError::Precondition(e));
        }
        self.rebuild()
    }

    /// Queue a command for the next tick.
    pub fn command(&mut self, command: Command) {
        self.queue.push_back(command);
    }

    /// Apply queued commands, then advance the field one tick.
    pub fn tick(&mut self, dt: Option<f32>) -> Result<TickReport, FieldError> {
        if self.state != SessionState::Running {
            return Err(FieldError::NotRunning);
        }
        if self.apply_commands() {
            self.rebuild()?;
        }
        let field = self.field.as_mut().ok_or(FieldError::NotRunning)?;
        let report = field.tick(&mut self.backend, dt);
        self.motion = *field.motion();
        Ok(report)
    }

    /// Drain the queue. Returns whether the field must be rebuilt.
    fn apply_commands(&mut self) -> bool {
        let mut rebuild = false;
        while let Some(command) = self.queue.pop_front() {
            let motion = match self.field.as_mut() {
                Some(field) => field.motion_mut(),
                None => &mut self.motion,
            };
            match command {
                Command::Slower => motion.scale_target(self.config.slower_step, &self.config),
                Command::Faster => motion.scale_target(self.config.faster_step, &self.config),
                Command::ResetSpeed => motion.reset(&self.config),
                Command::ScaleSpeed(factor) => motion.scale_target(factor, &self.config),
                Command::SetTargetSpeed(speed) => motion.set_target(speed, &self.config),
                Command::ToggleDirection => motion.toggle_direction(),
                Command::Reseed(seed) => {
                    self.seed = seed;
                    rebuild = true;
                }
                Command::RandomSeed => {
                    self.seed = self.seed_rng.gen();
                    rebuild = true;
                }
                Command::SwitchProfile(profile) => {
                    self.profile = profile;
                    rebuild = true;
                }
            }
        }
        rebuild
    }

    /// Release the current field, if any, and build a fresh one.
    fn rebuild(&mut self) -> Result<(), FieldError> {
        self.state = SessionState::Rebuilding;
        if let Some(old) = self.field.take() {
            self.motion = *old.motion();
            old.release(&mut self.backend);
        }

        let generator = PromptGenerator::for_variant(self.profile.clone(), self.config.variant);
        match WarpField::new(&mut self.backend, &self.config, generator, self.seed, self.motion) {
            Ok(mut field) => {
                if let Some((width, height)) = self.aspect {
                    field.set_aspect(width, height);
                }
                self.field = Some(field);
                self.state = SessionState::Running;
                self.rebuilds += 1;
                log::info!(
                    "Session running with seed {:08X} and profile {:?}",
                    self.seed,
                    self.profile.display_name()
                );
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Idle;
                Err(e)
            }
        }
    }

    /// Release everything and return to `Idle`. Pending commands are dropped.
    pub fn shutdown(&mut self) {
        if let Some(field) = self.field.take() {
            self.motion = *field.motion();
            field.release(&mut self.backend);
            log::info!("Session shut down");
        }
        self.queue.clear();
        self.state = SessionState::Idle;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn profile(&self) -> &Arc<Profile> {
        &self.profile
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn motion(&self) -> MotionState {
        self.field.as_ref().map_or(self.motion, |f| *f.motion())
    }

    pub fn pending_commands(&self) -> usize {
        self.queue.len()
    }

    /// Number of successful builds so far.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    pub fn field(&self) -> Option<&WarpField> {
        self.field.as_ref()
    }

    pub fn stats(&self) -> Option<FieldStats> {
        self.field.as_ref().map(WarpField::stats)
    }

    /// Take the resource error raised since the last call, if any.
    pub fn take_error(&mut self) -> Option<FieldError> {
        self.field.as_mut().and_then(WarpField::take_error)
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = Some((width, height));
        if let Some(field) = self.field.as_mut() {
            field.set_aspect(width, height);
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: RenderBackend> Drop for Session<B> {
    fn drop(&mut self) {
        if let Some(field) = self.field.take() {
            field.release(&mut self.backend);
        }
    }
}
