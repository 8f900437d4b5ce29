//! Profile loading and validation errors.

use std::path::PathBuf;

/// A profile that does not have the shape the generator needs.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Profile must have 'templates' array with at least one template")]
    MissingTemplates,
    #[error("Profile 'templates' must only contain strings (entry {index} is not)")]
    InvalidTemplate { index: usize },
    #[error("Profile must have 'pools' object")]
    MissingPools,
    #[error("Pool '{name}' must be a non-empty array")]
    EmptyPool { name: String },
    #[error("Pool '{name}' must only contain strings (entry {index} is not)")]
    InvalidEntry { name: String, index: usize },
    #[error("Profile is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Could not read profile {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
