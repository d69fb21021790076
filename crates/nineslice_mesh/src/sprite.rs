//! Sprite metrics consumed by the layout planner

use nineslice_image::Border;
use serde::{Deserialize, Serialize};

use crate::error::{MeshError, Result};
use crate::geometry::{lerp, UvRect, Vec2};

/// Smallest pixels-per-unit multiplier accepted
pub const MIN_PIXELS_PER_UNIT_MULTIPLIER: f32 = 0.01;

/// Texture addressing outside the `[0, 1]` UV range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    #[default]
    Clamp,
    Repeat,
}

/// A tight sprite mesh, as produced by sprite packers that outline opaque pixels.
///
/// Positions are in sprite pixels with the origin at the bottom-left corner
/// of the sprite rect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpriteGeometry {
    pub positions: Vec<Vec2>,
    pub uvs: Vec<Vec2>,
    pub triangles: Vec<u16>,
}

/// Everything the mesh generator needs to know about a sprite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteMetrics {
    /// Sprite rect size in pixels
    pub width: u32,
    pub height: u32,
    pub border: Border,
    /// Sprite pixels per world unit
    pub pixels_per_unit: f32,
    /// Texture-space rect of the (padding-trimmed) sprite
    pub outer_uv: UvRect,
    /// Transparent pixels removed by packing, `[left, bottom, right, top]`
    pub padding: [f32; 4],
    pub wrap_mode: WrapMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<SpriteGeometry>,
}

impl Default for SpriteMetrics {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            border: Border::ZERO,
            pixels_per_unit: 100.0,
            outer_uv: UvRect::FULL,
            padding: [0.0; 4],
            wrap_mode: WrapMode::Clamp,
            geometry: None,
        }
    }
}

impl SpriteMetrics {
    /// A full-texture sprite of the given size
    pub fn new(width: u32, height: u32, border: Border) -> Self {
        Self {
            width,
            height,
            border,
            ..Default::default()
        }
    }

    pub fn with_wrap_mode(mut self, wrap_mode: WrapMode) -> Self {
        self.wrap_mode = wrap_mode;
        self
    }

    pub fn with_outer_uv(mut self, outer_uv: UvRect) -> Self {
        self.outer_uv = outer_uv;
        self
    }

    pub fn with_geometry(mut self, geometry: SpriteGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    pub fn has_border(&self) -> bool {
        !self.border.is_zero()
    }

    /// Reject zero-sized sprites and borders without a stretchable center
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(MeshError::Configuration(format!(
                "sprite size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        self.border.validate(self.width, self.height)?;
        Ok(())
    }

    /// Texture-space rect of the stretchable center.
    ///
    /// The border is measured on the untrimmed sprite, so padding is removed
    /// before mapping it into the outer UV rect.
    pub fn inner_uv(&self) -> UvRect {
        let [pad_left, pad_bottom, pad_right, pad_top] = self.padding;
        let tight_w = (self.width as f32 - pad_left - pad_right).max(f32::EPSILON);
        let tight_h = (self.height as f32 - pad_bottom - pad_top).max(f32::EPSILON);
        let uv = self.outer_uv;

        let u = |px: f32| lerp(uv.u_min, uv.u_max, (px - pad_left).clamp(0.0, tight_w) / tight_w);
        let v = |px: f32| lerp(uv.v_min, uv.v_max, (px - pad_bottom).clamp(0.0, tight_h) / tight_h);

        UvRect::new(
            u(self.border.left as f32),
            v(self.border.bottom as f32),
            u(self.width as f32 - self.border.right as f32),
            v(self.height as f32 - self.border.top as f32),
        )
    }

    /// Size of the border frame alone, `(left + right, bottom + top)` in pixels
    pub fn min_size(&self) -> Vec2 {
        Vec2::new(
            (self.border.left + self.border.right) as f32,
            (self.border.bottom + self.border.top) as f32,
        )
    }

    /// Layout size hint in units.
    ///
    /// Sliced and filled images prefer their border frame; simple and tiled
    /// images prefer the sprite's native size.
    pub fn preferred_size(&self, sliced_or_filled: bool, pixels_per_unit: f32) -> Vec2 {
        let size = if sliced_or_filled {
            self.min_size()
        } else {
            self.size()
        };
        size * (1.0 / pixels_per_unit)
    }
}

/// Pixels-per-unit used for layout: sprite density relative to the host's
/// reference density, scaled by a user multiplier floored at
/// [`MIN_PIXELS_PER_UNIT_MULTIPLIER`]
pub fn multiplied_pixels_per_unit(sprite_ppu: f32, reference_ppu: f32, multiplier: f32) -> f32 {
    sprite_ppu / reference_ppu * multiplier.max(MIN_PIXELS_PER_UNIT_MULTIPLIER)
}
