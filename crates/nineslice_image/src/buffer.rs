//! Owned RGBA pixel buffers

use crate::color::Color;
use crate::error::{ImageError, Result};

/// A `width x height` row-major bitmap of float colors.
///
/// Row 0 is the bottom row, matching the y-up convention of [`crate::Border`]
/// (`bottom` counts rows from index 0).
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl PixelBuffer {
    /// Wrap an existing pixel vector, checking it matches the dimensions
    pub fn new(width: u32, height: u32, pixels: Vec<Color>) -> Result<Self> {
        if width == 0 || height == 0 || pixels.len() != width as usize * height as usize {
            return Err(ImageError::InvalidDimensions {
                width,
                height,
                pixel_count: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A buffer filled with one color
    pub fn filled(width: u32, height: u32, color: Color) -> Result<Self> {
        Self::new(width, height, vec![color; width as usize * height as usize])
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Color) -> Result<Self> {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self::new(width, height, pixels)
    }

    /// Build from tightly packed RGBA8 bytes (row 0 first)
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        let pixels = bytes
            .chunks_exact(4)
            .map(|c| Color::from_rgba8(c[0], c[1], c[2], c[3]))
            .collect();
        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<Color> {
        self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the bitmap
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[self.index(x, y)])
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width && y < self.height {
            let index = self.index(x, y);
            self.pixels[index] = color;
        }
    }

    /// Row `y` as a slice
    pub fn row(&self, y: u32) -> &[Color] {
        let start = y as usize * self.width as usize;
        &self.pixels[start..start + self.width as usize]
    }

    /// Tightly packed RGBA8 bytes (row 0 first)
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_rgba8()).collect()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_mismatched_length() {
        let err = PixelBuffer::new(2, 2, vec![Color::WHITE; 3]).unwrap_err();
        assert!(matches!(err, ImageError::InvalidDimensions { .. }));
    }

    #[test]
    fn test_new_rejects_zero_size() {
        assert!(PixelBuffer::new(0, 4, Vec::new()).is_err());
    }

    #[test]
    fn test_from_fn_is_row_major_bottom_first() {
        let buffer =
            PixelBuffer::from_fn(3, 2, |x, y| Color::new(x as f32, y as f32, 0.0, 1.0)).unwrap();
        assert_eq!(buffer.pixels()[4], Color::new(1.0, 1.0, 0.0, 1.0));
        assert_eq!(buffer.row(1)[2], Color::new(2.0, 1.0, 0.0, 1.0));
        assert_eq!(buffer.get(3, 0), None);
    }
}
