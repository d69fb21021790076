//! Mesh layout planning
//!
//! Turns sprite metrics and the slice/tile configuration into per-axis
//! numbers: scaled border offsets, how many vertices one tile needs, how the
//! stretchable center is subdivided and how many tiles cover the target.
//! Both axes are planned independently with the same rules.

use serde::{Deserialize, Serialize};

use crate::error::{MeshError, Result};
use crate::geometry::{approx_eq, Rect, Vec2};
use crate::sprite::{SpriteMetrics, WrapMode};

/// Fractional cell remainder treated as an exact fit
const REMAINDER_EPSILON: f32 = 1e-4;

/// Nine-slice configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceSpec {
    pub sliced: bool,
    /// Draw the stretchable center; when false only the border ring is emitted
    pub fill_center: bool,
    /// Repeat the center in fixed-size cells instead of stretching it
    pub tile_scaled_slices: bool,
    /// Cell size in sprite pixels, `[0, 0]` for the sprite's center size
    pub sliced_tile_size: [u32; 2],
}

impl Default for SliceSpec {
    fn default() -> Self {
        Self {
            sliced: false,
            fill_center: true,
            tile_scaled_slices: false,
            sliced_tile_size: [0, 0],
        }
    }
}

/// Tiling configuration; sizes are in sprite pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TileSpec {
    pub tiled: bool,
    /// `0` on an axis uses the sprite size
    pub tile_size: [u32; 2],
    pub tile_spacing: [u32; 2],
}

/// Layout of one axis, in target units relative to the tile origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisLayout {
    /// Transparent padding at the low and high end
    pub padding: [f32; 2],
    /// Scaled border offsets at the low and high end
    pub borders: [f32; 2],
    /// Size of one repeating center cell
    pub inner_tile_size: f32,
    /// Number of center cells; 0 when the axis is a single span
    pub inner_tile_count: usize,
    /// Whether the last center cell is cut short
    pub partial_inner_tile: bool,
    /// Grid vertices across one tile
    pub vertex_count: usize,
    pub tile_size: f32,
    pub tile_spacing: f32,
    pub tile_count: usize,
    /// Whether the tiles overshoot the target and need a boundary cut
    pub cut: bool,
    /// Factor applied to the high outer UV for native texture repetition
    pub uv_multiplier: f32,
}

impl AxisLayout {
    /// Grid line positions `[outer low, inner low, inner high, outer high]`
    pub fn stops(&self) -> [f32; 4] {
        [
            self.padding[0],
            self.borders[0],
            self.tile_size - self.borders[1],
            self.tile_size - self.padding[1],
        ]
    }
}

/// Derived per-request layout. Recomputed for every generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeshLayout {
    /// Target rect after aspect fitting
    pub rect: Rect,
    pub pixels_per_unit: f32,
    pub fill_center: bool,
    pub x: AxisLayout,
    pub y: AxisLayout,
}

impl MeshLayout {
    pub fn vertices_per_tile(&self) -> usize {
        self.x.vertex_count.saturating_mul(self.y.vertex_count)
    }

    pub fn tile_count(&self) -> usize {
        self.x.tile_count.saturating_mul(self.y.tile_count)
    }

    /// Grid vertices for one polygon pass over every tile
    pub fn grid_vertex_count(&self) -> usize {
        self.vertices_per_tile().saturating_mul(self.tile_count())
    }

    /// Offset of tile `(i, j)` from the rect origin
    pub fn tile_offset(&self, i: usize, j: usize) -> Vec2 {
        Vec2::new(
            (self.x.tile_size + self.x.tile_spacing) * i as f32,
            (self.y.tile_size + self.y.tile_spacing) * j as f32,
        )
    }
}

/// Layout inputs that are not part of the sprite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub slice: SliceSpec,
    pub tile: TileSpec,
    pub pixels_per_unit: f32,
    pub preserve_aspect: bool,
    pub pivot: Vec2,
}

/// Plan the mesh layout for `sprite` drawn into `target`.
///
/// Fails for zero-sized sprites, invalid borders and non-positive
/// pixels-per-unit. Any target rect is accepted; an empty one yields a layout
/// without tiles.
pub fn plan_layout(sprite: &SpriteMetrics, target: Rect, options: &LayoutOptions) -> Result<MeshLayout> {
    sprite.validate()?;
    let ppu = options.pixels_per_unit;
    if !(ppu.is_finite() && ppu > 0.0) {
        return Err(MeshError::Configuration(format!(
            "pixels per unit must be positive, got {ppu}"
        )));
    }

    let slice = &options.slice;
    let tile = &options.tile;

    let mut rect = target;
    if options.preserve_aspect && !slice.sliced && !tile.tiled && !rect.is_empty() {
        rect = rect.fit_aspect(sprite.size(), options.pivot);
    }

    let sliced = slice.sliced && sprite.has_border();
    let can_simplify = slice.fill_center && approx_eq(ppu, 1.0);
    let border = sprite.border;
    let padding = sprite.padding;
    let outer_uv = sprite.outer_uv;

    let x = plan_axis(AxisInput {
        sprite_size: sprite.width,
        borders: [border.left, border.right],
        padding: [padding[0], padding[2]],
        target_size: rect.width,
        sliced_tile_size: slice.sliced_tile_size[0],
        tile_size: tile.tile_size[0],
        tile_spacing: tile.tile_spacing[0],
        uv_origin: outer_uv.u_min,
        ppu,
        sliced,
        tile_scaled: slice.tile_scaled_slices,
        tiled: tile.tiled,
        can_simplify,
        wrap_mode: sprite.wrap_mode,
    });
    let y = plan_axis(AxisInput {
        sprite_size: sprite.height,
        borders: [border.bottom, border.top],
        padding: [padding[1], padding[3]],
        target_size: rect.height,
        sliced_tile_size: slice.sliced_tile_size[1],
        tile_size: tile.tile_size[1],
        tile_spacing: tile.tile_spacing[1],
        uv_origin: outer_uv.v_min,
        ppu,
        sliced,
        tile_scaled: slice.tile_scaled_slices,
        tiled: tile.tiled,
        can_simplify,
        wrap_mode: sprite.wrap_mode,
    });

    let layout = MeshLayout {
        rect,
        pixels_per_unit: ppu,
        fill_center: slice.fill_center,
        x,
        y,
    };
    tracing::trace!(
        "plan_layout: {}x{} vertices per tile, {}x{} tiles",
        x.vertex_count,
        y.vertex_count,
        x.tile_count,
        y.tile_count
    );
    Ok(layout)
}

struct AxisInput {
    sprite_size: u32,
    borders: [u32; 2],
    padding: [f32; 2],
    target_size: f32,
    sliced_tile_size: u32,
    tile_size: u32,
    tile_spacing: u32,
    uv_origin: f32,
    ppu: f32,
    sliced: bool,
    tile_scaled: bool,
    tiled: bool,
    can_simplify: bool,
    wrap_mode: WrapMode,
}

fn plan_axis(input: AxisInput) -> AxisLayout {
    let ppu = input.ppu;
    let sprite_px = input.sprite_size as f32;
    let [low_px, high_px] = input.borders;

    let tile_px = if input.tiled {
        if input.tile_size == 0 {
            sprite_px
        } else {
            input.tile_size as f32
        }
    } else {
        input.target_size
    };
    // Size one tile occupies in target units
    let extent = if input.tiled { tile_px / ppu } else { tile_px };
    let native_size = approx_eq(extent, sprite_px);

    let mut borders = [0.0, 0.0];
    let mut inner_tile_size = 0.0;
    let mut inner_tile_count = 0;
    let mut partial_inner_tile = false;
    let mut vertex_count = 2;

    let has_border = low_px + high_px > 0;
    if input.sliced && (has_border || input.tile_scaled) {
        borders = scaled_borders(low_px, high_px, ppu, extent);
        let inner = extent - borders[0] - borders[1];

        if input.tile_scaled {
            let base_px = (input.sprite_size - low_px - high_px) as f32;
            let cell_px = if input.sliced_tile_size == 0 {
                base_px
            } else {
                input.sliced_tile_size as f32
            }
            .max(1.0);
            if !(native_size && approx_eq(cell_px, base_px) && input.can_simplify) {
                inner_tile_size = cell_px / ppu;
                let (count, partial) = split_inner(inner, inner_tile_size);
                if count == 0 || (count == 1 && !partial) {
                    // No room for repeating cells, lay out as a plain sliced axis
                    inner_tile_size = inner.max(0.0);
                    inner_tile_count = 1;
                    vertex_count = 4;
                } else {
                    inner_tile_count = count;
                    partial_inner_tile = partial;
                    vertex_count = count
                        .saturating_mul(2)
                        .saturating_add(2 + partial as usize);
                }
            }
        } else if !(native_size && input.can_simplify) {
            inner_tile_size = inner;
            inner_tile_count = 1;
            vertex_count = 4;
        }
    }

    let spacing = input.tile_spacing as f32 / ppu;
    let can_repeat = input.tiled
        && input.wrap_mode == WrapMode::Repeat
        && input.tile_spacing == 0
        && approx_eq(tile_px, sprite_px)
        && vertex_count == 2
        && approx_eq(input.uv_origin, 0.0);

    let (tile_size, tile_count, cut, uv_multiplier) = if !input.tiled {
        (extent, 1, false, 1.0)
    } else if can_repeat {
        (
            input.target_size,
            1,
            false,
            input.target_size * ppu / tile_px,
        )
    } else {
        let tile_size = tile_px / ppu;
        // Tiles past the rect are removed entirely by the edge cut
        let count = (input.target_size / tile_size).ceil();
        let count = if count.is_finite() && count > 0.0 {
            count as usize
        } else {
            0
        };
        let covered = count as f32 * tile_size + count.saturating_sub(1) as f32 * spacing;
        (tile_size, count, covered > input.target_size, 1.0)
    };

    AxisLayout {
        padding: [input.padding[0] / ppu, input.padding[1] / ppu],
        borders,
        inner_tile_size,
        inner_tile_count,
        partial_inner_tile,
        vertex_count,
        tile_size,
        tile_spacing: spacing,
        tile_count,
        cut,
        uv_multiplier,
    }
}

/// Borders in target units, shrunk proportionally when they overlap within `extent`
fn scaled_borders(low_px: u32, high_px: u32, ppu: f32, extent: f32) -> [f32; 2] {
    let mut low = low_px as f32 / ppu;
    let mut high = high_px as f32 / ppu;
    let combined = low + high;
    if combined > 0.0 && extent < combined {
        let ratio = extent.max(0.0) / combined;
        low *= ratio;
        high *= ratio;
    }
    [low, high]
}

/// Split `inner` into cells of `cell`; returns the cell count and whether
/// the last cell is partial. An empty center has no cells.
fn split_inner(inner: f32, cell: f32) -> (usize, bool) {
    if !(inner > 0.0) || !(cell > 0.0) {
        return (0, false);
    }
    let ratio = inner / cell;
    let whole = ratio.floor();
    let fraction = ratio - whole;
    // `as` saturates, oversized counts are rejected by the capacity check
    let whole = whole as usize;
    if fraction <= REMAINDER_EPSILON {
        (whole.max(1), false)
    } else if fraction >= 1.0 - REMAINDER_EPSILON {
        (whole.saturating_add(1), false)
    } else {
        (whole.saturating_add(1), true)
    }
}
