//! The warp field: a fixed pool of prompt billboards and a particle cloud,
//! advanced once per frame and recycled as they leave the view.
//!
//! [`WarpField`] owns the live objects. [`Session`] owns a backend and a
//! field, queues control commands between ticks, and rebuilds the field from
//! scratch when the seed or profile changes.

pub mod billboard;
pub mod config;
pub mod error;
pub mod layout;
pub mod motion;
pub mod particles;
pub mod session;
pub mod warp_field;

pub use billboard::*;
pub use config::*;
pub use error::*;
pub use layout::*;
pub use motion::*;
pub use particles::*;
pub use session::*;
pub use warp_field::*;
