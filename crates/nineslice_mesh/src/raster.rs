//! Preview rasterizer
//!
//! Software rendering of a [`Mesh`] into a [`PixelBuffer`], for previews and
//! for comparing generated geometry against the source bitmap. Pixels are
//! sampled at their centers with nearest-neighbour texture lookup; later
//! triangles overwrite earlier ones.

use nineslice_image::{Color, PixelBuffer};
use rayon::prelude::*;

use crate::error::Result;
use crate::geometry::{Rect, Vec2};
use crate::mesh::{Mesh, MeshVertex};
use crate::sprite::WrapMode;

/// Barycentric slack so pixel centers on shared edges are not lost
const EDGE_EPSILON: f32 = 1e-5;

/// Region of mesh space rendered into an output bitmap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub rect: Rect,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(rect: Rect, width: u32, height: u32) -> Self {
        Self { rect, width, height }
    }

    /// One output pixel per mesh unit
    pub fn unit_pixels(rect: Rect) -> Self {
        Self {
            rect,
            width: rect.width.ceil().max(0.0) as u32,
            height: rect.height.ceil().max(0.0) as u32,
        }
    }

    fn to_pixels(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            (position.x - self.rect.x) * self.width as f32 / self.rect.width,
            (position.y - self.rect.y) * self.height as f32 / self.rect.height,
        )
    }
}

struct RasterTriangle {
    points: [Vec2; 3],
    uvs: [Vec2; 3],
    tint: Color,
    min: Vec2,
    max: Vec2,
    inv_det: f32,
}

impl RasterTriangle {
    fn new(vertices: [&MeshVertex; 3], viewport: &Viewport) -> Option<Self> {
        let points = vertices.map(|v| viewport.to_pixels(v.position()));
        let [a, b, c] = points;
        let det = (b.y - c.y) * (a.x - c.x) + (c.x - b.x) * (a.y - c.y);
        if det.abs() <= f32::EPSILON {
            return None;
        }
        let [r, g, b_, a_] = vertices[0].color;
        Some(Self {
            points,
            uvs: vertices.map(|v| v.uv()),
            tint: Color::from_rgba8(r, g, b_, a_),
            min: Vec2::new(a.x.min(b.x).min(c.x), a.y.min(b.y).min(c.y)),
            max: Vec2::new(a.x.max(b.x).max(c.x), a.y.max(b.y).max(c.y)),
            inv_det: 1.0 / det,
        })
    }

    /// Interpolated UV at `p`, or `None` outside the triangle
    fn uv_at(&self, p: Vec2) -> Option<Vec2> {
        let [a, b, c] = self.points;
        let l0 = ((b.y - c.y) * (p.x - c.x) + (c.x - b.x) * (p.y - c.y)) * self.inv_det;
        let l1 = ((c.y - a.y) * (p.x - c.x) + (a.x - c.x) * (p.y - c.y)) * self.inv_det;
        let l2 = 1.0 - l0 - l1;
        if l0 < -EDGE_EPSILON || l1 < -EDGE_EPSILON || l2 < -EDGE_EPSILON {
            return None;
        }
        Some(self.uvs[0] * l0 + self.uvs[1] * l1 + self.uvs[2] * l2)
    }

    /// Inclusive range of pixel columns whose centers may fall inside
    fn columns(&self, width: usize) -> Option<(usize, usize)> {
        let first = (self.min.x - 0.5 - EDGE_EPSILON).ceil().max(0.0);
        let last = (self.max.x - 0.5 + EDGE_EPSILON).floor();
        if last < 0.0 || first > last || width == 0 {
            return None;
        }
        let first = first as usize;
        let last = (last as usize).min(width - 1);
        (first <= last).then_some((first, last))
    }
}

/// Rasterize `mesh` textured with `texture` into a new bitmap.
///
/// Vertex colors tint the sampled texels (taken from the first vertex of
/// each triangle). Uncovered pixels stay transparent.
pub fn render_preview(
    mesh: &Mesh,
    texture: &PixelBuffer,
    wrap: WrapMode,
    viewport: Viewport,
) -> Result<PixelBuffer> {
    let mut output = PixelBuffer::filled(viewport.width, viewport.height, Color::TRANSPARENT)?;
    if viewport.rect.is_empty() {
        return Ok(output);
    }

    let triangles: Vec<RasterTriangle> = mesh
        .triangles()
        .filter_map(|t| RasterTriangle::new(t, &viewport))
        .collect();
    let width = viewport.width as usize;

    output
        .pixels_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, out)| {
            let center_y = row as f32 + 0.5;
            for triangle in &triangles {
                if center_y < triangle.min.y - EDGE_EPSILON || center_y > triangle.max.y + EDGE_EPSILON {
                    continue;
                }
                let Some((first, last)) = triangle.columns(width) else {
                    continue;
                };
                for (x, pixel) in out.iter_mut().enumerate().take(last + 1).skip(first) {
                    let center = Vec2::new(x as f32 + 0.5, center_y);
                    if let Some(uv) = triangle.uv_at(center) {
                        *pixel = sample(texture, uv, wrap).multiply(triangle.tint);
                    }
                }
            }
        });

    tracing::debug!(
        "render_preview: {} triangles into {}x{}",
        triangles.len(),
        viewport.width,
        viewport.height
    );
    Ok(output)
}

fn sample(texture: &PixelBuffer, uv: Vec2, wrap: WrapMode) -> Color {
    let (width, height) = texture.dimensions();
    let x = texel(uv.x, width, wrap);
    let y = texel(uv.y, height, wrap);
    texture.pixels()[y * width as usize + x]
}

fn texel(coord: f32, size: u32, wrap: WrapMode) -> usize {
    let t = (coord * size as f32).floor();
    match wrap {
        WrapMode::Clamp => t.clamp(0.0, (size - 1) as f32) as usize,
        WrapMode::Repeat => (t as i64).rem_euclid(size as i64) as usize,
    }
}
