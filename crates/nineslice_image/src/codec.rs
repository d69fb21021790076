//! File codec boundary
//!
//! Decoding and encoding go through the `image` crate. Files store the top
//! row first, so rows are flipped on the way in and out to keep row 0 at the
//! bottom of a [`PixelBuffer`].

use std::path::Path;

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::error::Result;

/// Output encodings selected from a file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodedFormat {
    Png,
    Jpeg,
    Tga,
    Exr,
}

impl EncodedFormat {
    /// Format for `path`; unknown or missing extensions encode as PNG
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("jpg") | Some("jpeg") => EncodedFormat::Jpeg,
            Some("tga") => EncodedFormat::Tga,
            Some("exr") => EncodedFormat::Exr,
            _ => EncodedFormat::Png,
        }
    }
}

/// Decode an image file into a bottom-up float buffer
pub fn load(path: impl AsRef<Path>) -> Result<PixelBuffer> {
    let path = path.as_ref();
    let decoded = image::open(path)?.into_rgba32f();
    let (width, height) = decoded.dimensions();

    let buffer = PixelBuffer::from_fn(width, height, |x, y| {
        let [r, g, b, a] = decoded.get_pixel(x, height - 1 - y).0;
        Color::new(r, g, b, a)
    })?;

    tracing::debug!("Loaded {}x{} image from {}", width, height, path.display());
    Ok(buffer)
}

/// Encode `buffer` to `path`, choosing the format from the extension
pub fn save(buffer: &PixelBuffer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let (width, height) = buffer.dimensions();
    let format = EncodedFormat::from_path(path);

    let top_down = |x: u32, y: u32| buffer.row(height - 1 - y)[x as usize];

    match format {
        EncodedFormat::Exr => {
            let image = ImageBuffer::from_fn(width, height, |x, y| {
                let c = top_down(x, y);
                Rgba([c.r, c.g, c.b, c.a])
            });
            DynamicImage::ImageRgba32F(image).save_with_format(path, ImageFormat::OpenExr)?;
        }
        _ => {
            let image = DynamicImage::ImageRgba8(ImageBuffer::from_fn(width, height, |x, y| {
                Rgba(top_down(x, y).to_rgba8())
            }));
            match format {
                // JPEG has no alpha channel
                EncodedFormat::Jpeg => {
                    DynamicImage::ImageRgb8(image.to_rgb8()).save_with_format(path, ImageFormat::Jpeg)?
                }
                EncodedFormat::Tga => image.save_with_format(path, ImageFormat::Tga)?,
                _ => image.save_with_format(path, ImageFormat::Png)?,
            }
        }
    }

    tracing::debug!("Saved {}x{} {:?} image to {}", width, height, format, path.display());
    Ok(())
}
