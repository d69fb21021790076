//! Mesh generation error types

use nineslice_image::ImageError;
use thiserror::Error;

/// Errors raised before any geometry is produced
#[derive(Error, Debug)]
pub enum MeshError {
    /// Non-positive sprite size or pixels-per-unit
    #[error("Invalid mesh configuration: {0}")]
    Configuration(String),

    /// Requested geometry exceeds the vertex or cut-line ceiling
    #[error("Mesh too large: {requested} {what} requested, limit is {limit}")]
    Capacity {
        what: &'static str,
        requested: usize,
        limit: usize,
    },

    /// `FillMethod::Custom` without a strategy attached to the request
    #[error("Custom fill method requested without a custom fill strategy")]
    MissingCustomFill,

    /// Invalid sprite border, or a preview buffer that cannot be allocated
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Result type for mesh operations
pub type Result<T> = std::result::Result<T, MeshError>;
