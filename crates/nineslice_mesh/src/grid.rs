//! Vertex grid construction
//!
//! Each axis of a tile becomes a list of `(position, uv)` stops: outer edge,
//! border, the start and end of every center cell, border, outer edge. The
//! grid is the cross product of the column and row stops, stored column-major.

use smallvec::SmallVec;

use crate::geometry::{lerp, Vec2};
use crate::layout::{AxisLayout, MeshLayout};
use crate::sprite::SpriteMetrics;

/// `(position, uv)` break points along one axis
pub type AxisStops = SmallVec<[(f32, f32); 8]>;

/// A grid vertex with its output slot
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridVertex {
    pub position: Vec2,
    pub uv: Vec2,
    /// Output index once emitted into the mesh
    pub index: Option<u32>,
}

/// Column-major grid of one tile's vertices
#[derive(Clone, Debug, Default)]
pub struct VertexGrid {
    columns: usize,
    rows: usize,
    vertices: Vec<GridVertex>,
}

impl VertexGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn vertices(&self) -> &[GridVertex] {
        &self.vertices
    }

    pub fn is_empty(&self) -> bool {
        self.columns == 0 || self.rows == 0
    }

    /// Flat index of column `x`, row `y`
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        self.rows * x + y
    }

    pub fn get(&self, index: usize) -> &GridVertex {
        &self.vertices[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut GridVertex {
        &mut self.vertices[index]
    }

    /// Rebuild as the base tile of `layout`, positioned at the rect origin
    pub fn build(&mut self, layout: &MeshLayout, sprite: &SpriteMetrics) {
        let outer = sprite.outer_uv;
        let inner = sprite.inner_uv();

        let mut columns = AxisStops::new();
        axis_stops(
            &layout.x,
            [
                outer.u_min,
                inner.u_min,
                inner.u_max,
                outer.u_max * layout.x.uv_multiplier,
            ],
            &mut columns,
        );
        let mut rows = AxisStops::new();
        axis_stops(
            &layout.y,
            [
                outer.v_min,
                inner.v_min,
                inner.v_max,
                outer.v_max * layout.y.uv_multiplier,
            ],
            &mut rows,
        );

        let origin = layout.rect.position();
        self.columns = columns.len();
        self.rows = rows.len();
        self.vertices.clear();
        self.vertices.reserve(columns.len() * rows.len());
        for &(x, u) in &columns {
            for &(y, v) in &rows {
                self.vertices.push(GridVertex {
                    position: origin + Vec2::new(x, y),
                    uv: Vec2::new(u, v),
                    index: None,
                });
            }
        }
    }

    /// Copy `base` shifted by `offset`, with every output slot cleared
    pub fn copy_shifted(&mut self, base: &VertexGrid, offset: Vec2) {
        self.columns = base.columns;
        self.rows = base.rows;
        self.vertices.clear();
        self.vertices.extend(base.vertices.iter().map(|v| GridVertex {
            position: v.position + offset,
            uv: v.uv,
            index: None,
        }));
    }
}

/// Expand one axis into its stops.
///
/// `uv` holds the outer low, inner low, inner high and outer high texture
/// coordinates. A partial last cell gets an extra stop where it is cut, with
/// its UV interpolated inside the cell.
pub fn axis_stops(axis: &AxisLayout, uv: [f32; 4], out: &mut AxisStops) {
    let [p1, p2, p3, p4] = axis.stops();
    let [uv1, uv2, uv3, uv4] = uv;
    let cell = axis.inner_tile_size;

    out.clear();
    out.push((p1, uv1));
    for i in 0..axis.inner_tile_count {
        let start = p2 + i as f32 * cell;
        out.push((start, uv2));
        if i + 1 == axis.inner_tile_count {
            if axis.partial_inner_tile {
                out.push((p3, lerp(uv2, uv3, (p3 - start) / cell)));
            }
            out.push((p3, uv3));
        } else {
            out.push((start + cell, uv3));
        }
    }
    out.push((p4, uv4));
}
