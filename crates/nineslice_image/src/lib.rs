//! Nineslice Image
//!
//! Bitmap tooling for nine-slice sprites.
//!
//! # Features
//!
//! - Infer a sprite's border from color discontinuities
//! - Crop fully transparent margins while keeping the border consistent
//! - Trim, collapse and re-extend the stretchable center
//! - Load and save PNG, JPEG, TGA and EXR files (`codec` feature)
//!
//! Pixel rows are stored bottom-up: row 0 is the bottom edge of the sprite
//! and [`Border::bottom`] counts rows from it.
//!
//! # Example
//!
//! ```ignore
//! use nineslice_image::{codec, SlicedSprite};
//!
//! let buffer = codec::load("button.png")?;
//! let sprite = SlicedSprite::auto_detect(buffer, 0.5)?.trim_alpha()?;
//! println!("border: {}", sprite.border());
//! codec::save(sprite.buffer(), "button_trimmed.png")?;
//! ```

mod border;
mod buffer;
mod color;
mod detect;
mod error;
mod ops;
mod sprite;

#[cfg(feature = "codec")]
pub mod codec;

pub use border::Border;
pub use buffer::PixelBuffer;
pub use color::Color;
pub use detect::{
    column_discontinuities, detect_border, row_discontinuities, select_run, Run, MAX_DIFFERENCE,
};
pub use error::{ImageError, Result};
pub use ops::{collapse_center, extend_center, opaque_rect, trim_alpha, trim_center, PixelRect};
pub use sprite::SlicedSprite;
