//! Pixel buffer transforms
//!
//! Every transform reads its input once and writes a fresh buffer. The
//! per-pixel work is split into independent output rows and run on the
//! rayon pool; no two rows share mutable state.

use std::ops::Range;

use rayon::prelude::*;

use crate::border::Border;
use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::error::{ImageError, Result};

/// Inclusive pixel rectangle `[min_x, max_x] x [min_y, max_y]`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl PixelRect {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// Smallest rectangle containing both
    pub fn union(self, other: PixelRect) -> PixelRect {
        PixelRect {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Bounding rectangle of every pixel with alpha above zero.
///
/// Returns `None` for a fully transparent buffer.
pub fn opaque_rect(buffer: &PixelBuffer) -> Option<PixelRect> {
    let width = buffer.width() as usize;
    buffer
        .pixels()
        .par_chunks(width)
        .enumerate()
        .filter_map(|(y, row)| {
            let first = row.iter().position(Color::is_visible)?;
            let last = row.iter().rposition(Color::is_visible)?;
            Some(PixelRect {
                min_x: first as u32,
                min_y: y as u32,
                max_x: last as u32,
                max_y: y as u32,
            })
        })
        .reduce_with(PixelRect::union)
}

/// Crop the buffer to its opaque rect and move the border along with it.
///
/// Each inset shrinks by the transparent margin cut from its side, floored
/// at zero. Fails with [`ImageError::EmptyImage`] when nothing is opaque.
pub fn trim_alpha(buffer: PixelBuffer, border: Border) -> Result<(PixelBuffer, Border)> {
    let (width, height) = buffer.dimensions();
    border.validate(width, height)?;

    let rect = opaque_rect(&buffer).ok_or(ImageError::EmptyImage)?;
    let trimmed_width = rect.width() as usize;
    let source_width = width as usize;

    let mut pixels = vec![Color::TRANSPARENT; trimmed_width * rect.height() as usize];
    pixels
        .par_chunks_mut(trimmed_width)
        .enumerate()
        .for_each(|(row, out)| {
            let start = (rect.min_y as usize + row) * source_width + rect.min_x as usize;
            out.copy_from_slice(&buffer.pixels()[start..start + trimmed_width]);
        });

    let trimmed_border = Border::new(
        border.left.saturating_sub(rect.min_x),
        border.bottom.saturating_sub(rect.min_y),
        border.right.saturating_sub(width - 1 - rect.max_x),
        border.top.saturating_sub(height - 1 - rect.max_y),
    );
    trimmed_border.validate(rect.width(), rect.height())?;

    tracing::debug!(
        "trim_alpha: {}x{} -> {}x{}, border {} -> {}",
        width,
        height,
        rect.width(),
        rect.height(),
        border,
        trimmed_border
    );

    let trimmed = PixelBuffer::new(rect.width(), rect.height(), pixels)?;
    Ok((trimmed, trimmed_border))
}

/// Remove the first stretchable row and column, the ones directly inside
/// the left and bottom insets.
///
/// An axis whose center is a single pixel is left untouched, so the border
/// stays valid for the returned buffer.
pub fn trim_center(buffer: PixelBuffer, border: Border) -> Result<PixelBuffer> {
    let (width, height) = buffer.dimensions();
    border.validate(width, height)?;
    let columns = border.center_columns(width);
    let rows = border.center_rows(height);

    let first_only = |range: Range<u32>| {
        if range.end - range.start >= 2 {
            range.start..range.start + 1
        } else {
            range.start..range.start
        }
    };
    let trimmed = remove_span(&buffer, first_only(columns), first_only(rows))?;
    tracing::debug!(
        "trim_center: {}x{} -> {}x{}",
        width,
        height,
        trimmed.width(),
        trimmed.height()
    );
    Ok(trimmed)
}

/// Collapse the stretchable center down to the single row and column
/// adjacent to the left and bottom insets.
///
/// A zero border marks an unsliced bitmap and is returned as is.
/// [`extend_center`] grows the result back out.
pub fn collapse_center(buffer: PixelBuffer, border: Border) -> Result<PixelBuffer> {
    let (width, height) = buffer.dimensions();
    border.validate(width, height)?;
    if border.is_zero() {
        return Ok(buffer);
    }

    let columns = border.center_columns(width);
    let rows = border.center_rows(height);
    let collapsed = remove_span(
        &buffer,
        columns.start + 1..columns.end,
        rows.start + 1..rows.end,
    )?;
    tracing::debug!(
        "collapse_center: {}x{} -> {}x{}",
        width,
        height,
        collapsed.width(),
        collapsed.height()
    );
    Ok(collapsed)
}

/// Grow a bitmap to `extended_width x extended_height` by repeating the
/// stretchable row and column next to the left and bottom insets.
///
/// Border pixels keep their content; every extended center coordinate reads
/// from the first center row/column of the source.
pub fn extend_center(
    buffer: &PixelBuffer,
    border: Border,
    extended_width: u32,
    extended_height: u32,
) -> Result<PixelBuffer> {
    let (width, height) = buffer.dimensions();
    border.validate(width, height)?;
    if extended_width < width || extended_height < height {
        return Err(ImageError::InvalidExtension {
            width,
            height,
            target_width: extended_width,
            target_height: extended_height,
        });
    }

    let extension_x = extended_width - width;
    let extension_y = extended_height - height;
    let center_end_x = width - border.right + extension_x;
    let center_end_y = height - border.top + extension_y;
    let out_width = extended_width as usize;

    let mut pixels = vec![Color::TRANSPARENT; out_width * extended_height as usize];
    pixels
        .par_chunks_mut(out_width)
        .enumerate()
        .for_each(|(y, out)| {
            let source_y = remap(y as u32, border.bottom, center_end_y, extension_y);
            let source = buffer.row(source_y);
            for (x, pixel) in out.iter_mut().enumerate() {
                *pixel = source[remap(x as u32, border.left, center_end_x, extension_x) as usize];
            }
        });

    tracing::debug!(
        "extend_center: {}x{} -> {}x{}",
        width,
        height,
        extended_width,
        extended_height
    );
    PixelBuffer::new(extended_width, extended_height, pixels)
}

/// Map an extended coordinate back to the source axis
#[inline]
fn remap(coordinate: u32, center_start: u32, center_end: u32, extension: u32) -> u32 {
    if coordinate < center_start {
        coordinate
    } else if coordinate >= center_end {
        coordinate - extension
    } else {
        center_start
    }
}

/// Copy `buffer` without the given column and row spans
fn remove_span(buffer: &PixelBuffer, columns: Range<u32>, rows: Range<u32>) -> Result<PixelBuffer> {
    let removed_columns = (columns.end - columns.start) as usize;
    let removed_rows = rows.end - rows.start;
    let out_width = buffer.width() as usize - removed_columns;
    let out_height = buffer.height() - removed_rows;
    let column_start = columns.start as usize;

    let mut pixels = vec![Color::TRANSPARENT; out_width * out_height as usize];
    pixels
        .par_chunks_mut(out_width)
        .enumerate()
        .for_each(|(y, out)| {
            let y = y as u32;
            let source_y = if y < rows.start { y } else { y + removed_rows };
            let source = buffer.row(source_y);
            let (head, tail) = out.split_at_mut(column_start);
            head.copy_from_slice(&source[..column_start]);
            tail.copy_from_slice(&source[column_start + removed_columns..]);
        });

    PixelBuffer::new(out_width as u32, out_height, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |x, y| {
            Color::new(x as f32 / width as f32, y as f32 / height as f32, 0.5, 1.0)
        })
        .unwrap()
    }

    #[test]
    fn test_opaque_rect_none_when_transparent() {
        let buffer = PixelBuffer::filled(5, 4, Color::TRANSPARENT).unwrap();
        assert_eq!(opaque_rect(&buffer), None);
    }

    #[test]
    fn test_opaque_rect_bounds() {
        let mut buffer = PixelBuffer::filled(10, 8, Color::TRANSPARENT).unwrap();
        buffer.set(2, 6, Color::WHITE);
        buffer.set(7, 1, Color::new(1.0, 0.0, 0.0, 0.01));
        assert_eq!(
            opaque_rect(&buffer),
            Some(PixelRect {
                min_x: 2,
                min_y: 1,
                max_x: 7,
                max_y: 6
            })
        );
    }

    #[test]
    fn test_trim_alpha_crops_and_moves_border() {
        let buffer = PixelBuffer::from_fn(10, 10, |x, y| {
            if (2..8).contains(&x) && (1..9).contains(&y) {
                Color::rgb(x as f32 / 10.0, y as f32 / 10.0, 0.0)
            } else {
                Color::TRANSPARENT
            }
        })
        .unwrap();

        let (trimmed, border) = trim_alpha(buffer.clone(), Border::new(3, 3, 1, 3)).unwrap();
        assert_eq!(trimmed.dimensions(), (6, 8));
        assert_eq!(trimmed.get(0, 0), buffer.get(2, 1));
        assert_eq!(trimmed.get(5, 7), buffer.get(7, 8));
        // left 3 - 2, bottom 3 - 1, right 1 - 2 floored, top 3 - 1
        assert_eq!(border, Border::new(1, 2, 0, 2));
    }

    #[test]
    fn test_trim_alpha_empty_image() {
        let buffer = PixelBuffer::filled(4, 4, Color::TRANSPARENT).unwrap();
        let err = trim_alpha(buffer, Border::ZERO).unwrap_err();
        assert!(matches!(err, ImageError::EmptyImage));
    }

    #[test]
    fn test_trim_alpha_rejects_invalid_border() {
        let buffer = PixelBuffer::filled(4, 4, Color::WHITE).unwrap();
        assert!(trim_alpha(buffer, Border::new(2, 0, 2, 0)).is_err());
    }

    #[test]
    fn test_trim_center_removes_one_row_and_column() {
        let buffer = gradient(8, 6);
        let border = Border::new(2, 1, 2, 1);
        let trimmed = trim_center(buffer.clone(), border).unwrap();
        assert_eq!(trimmed.dimensions(), (7, 5));

        // Left of the removed column is untouched
        assert_eq!(trimmed.get(1, 0), buffer.get(1, 0));
        // Right of it shifts down by one
        assert_eq!(trimmed.get(2, 0), buffer.get(3, 0));
        assert_eq!(trimmed.get(6, 4), buffer.get(7, 5));
        assert_eq!(trimmed.get(0, 1), buffer.get(0, 2));
    }

    #[test]
    fn test_trim_center_noop_on_single_pixel_center() {
        let buffer = gradient(5, 5);
        let trimmed = trim_center(buffer.clone(), Border::new(2, 2, 2, 2)).unwrap();
        assert_eq!(trimmed, buffer);
    }

    #[test]
    fn test_collapse_center_keeps_one_row_and_column() {
        let buffer = gradient(10, 9);
        let border = Border::new(3, 2, 2, 3);
        let collapsed = collapse_center(buffer.clone(), border).unwrap();
        assert_eq!(collapsed.dimensions(), (6, 6));
        assert_eq!(collapsed.get(3, 0), buffer.get(3, 0));
        assert_eq!(collapsed.get(4, 0), buffer.get(8, 0));
        assert_eq!(collapsed.get(0, 3), buffer.get(0, 6));
    }

    #[test]
    fn test_collapse_center_zero_border_is_noop() {
        let buffer = gradient(4, 4);
        assert_eq!(collapse_center(buffer.clone(), Border::ZERO).unwrap(), buffer);
    }

    #[test]
    fn test_extend_center_replicates_first_center_line() {
        let buffer = gradient(5, 5);
        let border = Border::new(2, 2, 2, 2);
        let extended = extend_center(&buffer, border, 8, 7).unwrap();
        assert_eq!(extended.dimensions(), (8, 7));
        for x in 2..5 {
            assert_eq!(extended.get(x, 0), buffer.get(2, 0));
        }
        assert_eq!(extended.get(7, 6), buffer.get(4, 4));
        assert_eq!(extended.get(5, 4), buffer.get(2, 2));
    }

    #[test]
    fn test_extend_center_rejects_shrinking() {
        let buffer = gradient(5, 5);
        let err = extend_center(&buffer, Border::uniform(1), 4, 5).unwrap_err();
        assert!(matches!(err, ImageError::InvalidExtension { .. }));
    }
}
