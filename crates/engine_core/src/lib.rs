//! Core engine types shared by every warp-field crate.
//!
//! This crate provides the foundational types used across the workspace:
//! - Transform and the "face a viewpoint" orientation helper
//! - Frame timing for the host loop

pub mod time;
pub mod transform;

pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
