//! Border inference from pixel discontinuities
//!
//! Detection runs in two phases. First every column and row is flagged in
//! parallel when any pixel in it differs noticeably from its left (or lower)
//! neighbour. Once both flag vectors are complete, each axis is reduced
//! sequentially to the longest flag-free run inside the opaque rect, which
//! becomes the stretchable center.

use rayon::prelude::*;

use crate::border::Border;
use crate::buffer::PixelBuffer;
use crate::error::{ImageError, Result};
use crate::ops::opaque_rect;

/// Color distance that a tolerance of 1.0 allows between neighbours
pub const MAX_DIFFERENCE: f32 = 3.16;

/// Half-open span `[start, end)` of indices along one axis
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Run {
    pub start: u32,
    pub end: u32,
}

impl Run {
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    fn midpoint(&self) -> f32 {
        self.start as f32 + self.len() as f32 / 2.0
    }
}

/// Infer the nine-slice border of `buffer`.
///
/// `tolerance` scales [`MAX_DIFFERENCE`]; 0 treats any color change as an
/// edge. Negative tolerances are clamped to 0.
pub fn detect_border(buffer: &PixelBuffer, tolerance: f32) -> Result<Border> {
    let (width, height) = buffer.dimensions();
    let opaque = opaque_rect(buffer).ok_or(ImageError::EmptyImage)?;
    let threshold = MAX_DIFFERENCE * tolerance.max(0.0);

    let (column_edges, row_edges) = rayon::join(
        || column_discontinuities(buffer, threshold),
        || row_discontinuities(buffer, threshold),
    );

    let columns = select_run(
        &column_edges,
        opaque.min_x,
        opaque.max_x,
        width as f32 / 2.0,
    );
    let rows = select_run(&row_edges, opaque.min_y, opaque.max_y, height as f32 / 2.0);

    let border = Border::new(
        columns.start,
        rows.start,
        width - columns.end,
        height - rows.end,
    );
    border.validate(width, height)?;

    tracing::debug!(
        "detect_border: {}x{} tolerance {} -> {}",
        width,
        height,
        tolerance,
        border
    );
    Ok(border)
}

/// `flags[x]` is set when some pixel in column `x` differs from its left neighbour
pub fn column_discontinuities(buffer: &PixelBuffer, threshold: f32) -> Vec<bool> {
    let (width, height) = buffer.dimensions();
    (0..width)
        .into_par_iter()
        .map(|x| {
            x > 0
                && (0..height).any(|y| {
                    let row = buffer.row(y);
                    row[x as usize].difference(&row[x as usize - 1]) > threshold
                })
        })
        .collect()
}

/// `flags[y]` is set when some pixel in row `y` differs from the pixel below it
pub fn row_discontinuities(buffer: &PixelBuffer, threshold: f32) -> Vec<bool> {
    (0..buffer.height())
        .into_par_iter()
        .map(|y| {
            y > 0
                && buffer
                    .row(y)
                    .iter()
                    .zip(buffer.row(y - 1))
                    .any(|(pixel, below)| pixel.difference(below) > threshold)
        })
        .collect()
}

/// Pick the longest flag-free run within `[min, max]`.
///
/// A flagged index starts a new run. On equal length the run whose midpoint
/// lies closer to `preferred` wins; exact ties keep the earlier run.
pub fn select_run(flags: &[bool], min: u32, max: u32, preferred: f32) -> Run {
    let mut current = Run {
        start: min,
        end: min + 1,
    };
    let mut selected = Run::default();

    for index in min..=max {
        current = Run {
            start: if flags[index as usize] {
                index
            } else {
                current.start
            },
            end: index + 1,
        };

        if selected.start == current.start {
            selected = current;
        } else if current.len() > selected.len()
            || (current.len() == selected.len()
                && (current.midpoint() - preferred).abs() < (selected.midpoint() - preferred).abs())
        {
            selected = current;
        }
    }

    selected
}
