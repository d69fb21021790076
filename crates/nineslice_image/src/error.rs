//! Image error types

use thiserror::Error;

/// Errors raised by bitmap operations and the codec boundary
#[derive(Error, Debug)]
pub enum ImageError {
    /// Border leaves no stretchable center on one of the axes
    #[error(
        "invalid border (left {left}, bottom {bottom}, right {right}, top {top}) for {width}x{height} bitmap: {reason}"
    )]
    InvalidBorder {
        left: u32,
        bottom: u32,
        right: u32,
        top: u32,
        width: u32,
        height: u32,
        reason: &'static str,
    },

    /// Zero-sized bitmap or pixel count not matching the dimensions
    #[error("invalid bitmap dimensions {width}x{height} for {pixel_count} pixels")]
    InvalidDimensions {
        width: u32,
        height: u32,
        pixel_count: usize,
    },

    /// Every pixel is fully transparent
    #[error("image has no opaque pixels")]
    EmptyImage,

    /// Requested extension is smaller than the source bitmap
    #[error("cannot extend {width}x{height} bitmap to {target_width}x{target_height}")]
    InvalidExtension {
        width: u32,
        height: u32,
        target_width: u32,
        target_height: u32,
    },

    /// Failed to read or write an image file
    #[error("image I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to decode or encode image bytes
    #[cfg(feature = "codec")]
    #[error("image codec failed: {0}")]
    Codec(#[from] image::ImageError),
}

/// Result type for image operations
pub type Result<T> = std::result::Result<T, ImageError>;
