//! Procedural prompt generation: vocabulary profiles and the positional-hash generator.

pub mod error;
pub mod hash;
pub mod profile;
pub mod prompt;

pub use error::*;
pub use hash::*;
pub use profile::*;
pub use prompt::*;
