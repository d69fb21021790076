//! A bitmap paired with its nine-slice border

use crate::border::Border;
use crate::buffer::PixelBuffer;
use crate::detect::detect_border;
use crate::error::Result;
use crate::ops;

/// Bitmap plus a border that is kept valid for it.
///
/// Each transformation consumes the sprite and returns the updated one, so a
/// pipeline reads as a chain:
///
/// ```ignore
/// let sprite = SlicedSprite::auto_detect(buffer, 0.5)?
///     .trim_alpha()?
///     .collapse_center()?;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SlicedSprite {
    buffer: PixelBuffer,
    border: Border,
}

impl SlicedSprite {
    pub fn new(buffer: PixelBuffer, border: Border) -> Result<Self> {
        border.validate(buffer.width(), buffer.height())?;
        Ok(Self { buffer, border })
    }

    /// Sprite with a border inferred by [`detect_border`]
    pub fn auto_detect(buffer: PixelBuffer, tolerance: f32) -> Result<Self> {
        let border = detect_border(&buffer, tolerance)?;
        Ok(Self { buffer, border })
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn border(&self) -> Border {
        self.border
    }

    pub fn into_parts(self) -> (PixelBuffer, Border) {
        (self.buffer, self.border)
    }

    pub fn set_border(&mut self, border: Border) -> Result<()> {
        border.validate(self.buffer.width(), self.buffer.height())?;
        self.border = border;
        Ok(())
    }

    /// Replace the border with one detected from the current pixels
    pub fn auto_detect_border(&mut self, tolerance: f32) -> Result<Border> {
        self.border = detect_border(&self.buffer, tolerance)?;
        Ok(self.border)
    }

    /// Crop to the opaque bounds and shrink the border with them
    pub fn trim_alpha(self) -> Result<Self> {
        let (buffer, border) = ops::trim_alpha(self.buffer, self.border)?;
        Ok(Self { buffer, border })
    }

    /// Remove one row and column from the center. The border is unchanged.
    pub fn trim_center(self) -> Result<Self> {
        let buffer = ops::trim_center(self.buffer, self.border)?;
        Ok(Self {
            buffer,
            border: self.border,
        })
    }

    /// Shrink the center to a single row and column
    pub fn collapse_center(self) -> Result<Self> {
        let buffer = ops::collapse_center(self.buffer, self.border)?;
        Ok(Self {
            buffer,
            border: self.border,
        })
    }

    /// Grow the center by replicating its first row and column
    pub fn extended(&self, width: u32, height: u32) -> Result<PixelBuffer> {
        ops::extend_center(&self.buffer, self.border, width, height)
    }
}
