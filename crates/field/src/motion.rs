//! Speed easing and travel direction.

use crate::config::FieldConfig;

/// Which way the field flows relative to the viewer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    /// Objects approach the viewer (+Z).
    #[default]
    Forward,
    /// Objects recede into the distance (-Z).
    Backward,
}

impl Direction {
    /// Sign applied to depth motion.
    pub fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        }
    }
}

/// Length of one tick in reference (60 Hz) frames.
///
/// `None` means exactly one reference frame, which is how a display-refresh
/// driven host ticks.
pub fn frames_for(dt: Option<f32>) -> f32 {
    match dt {
        Some(dt) => (dt * engine_core::REFERENCE_FPS).max(0.0),
        None => 1.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionState {
    pub current_speed: f32,
    pub target_speed: f32,
    pub direction: Direction,
}

impl Default for MotionState {
    fn default() -> Self {
        Self::at_rest(crate::config::DEFAULT_SPEED)
    }
}

impl MotionState {
    /// Cruising at `speed` with nothing to ease toward.
    pub fn at_rest(speed: f32) -> Self {
        Self {
            current_speed: speed,
            target_speed: speed,
            direction: Direction::Forward,
        }
    }

    /// Close part of the gap to the target speed.
    ///
    /// One frame moves `lerp` of the remaining gap; `frames` other than 1
    /// compound the same per-frame factor so the curve does not depend on
    /// the tick rate.
    pub fn ease(&mut self, lerp: f32, frames: f32) {
        let factor = if frames == 1.0 {
            lerp
        } else {
            1.0 - (1.0 - lerp).powf(frames)
        };
        self.current_speed += (self.target_speed - self.current_speed) * factor;
    }

    /// Set the target, clamped to the configured speed range.
    pub fn set_target(&mut self, speed: f32, config: &FieldConfig) {
        if speed.is_nan() {
            return;
        }
        self.target_speed = speed.clamp(config.min_speed, config.max_speed);
    }

    /// Multiply the target by `factor`, clamped.
    pub fn scale_target(&mut self, factor: f32, config: &FieldConfig) {
        self.set_target(self.target_speed * factor, config);
    }

    /// Ease back toward the default speed.
    pub fn reset(&mut self, config: &FieldConfig) {
        self.set_target(config.default_speed, config);
    }

    pub fn toggle_direction(&mut self) {
        self.direction = self.direction.toggled();
    }

    /// Depth travelled this tick by an object with unit velocity.
    pub fn step(&self, frames: f32) -> f32 {
        self.current_speed * frames * self.direction.sign()
    }
}
