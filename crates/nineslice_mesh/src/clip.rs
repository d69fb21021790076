//! Quad clipping and mesh assembly
//!
//! Every grid cell is a quad that gets clipped against the active cut lines
//! one after another (Sutherland-Hodgman). Quad corners remember which grid
//! edges they lie on, so an intersection on an edge shared by two cells is
//! computed once per cut line and emitted once. Output indices are assigned
//! lazily when a triangle first references a vertex.

use smallvec::SmallVec;

use crate::fill::CutLine;
use crate::geometry::{approx_eq, Vec2};
use crate::grid::VertexGrid;
use crate::mesh::{Mesh, MeshVertex};

/// Where a clipped vertex came from, for writing back its output index
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Origin {
    /// Grid vertex at this flat index
    Grid(usize),
    /// Edge intersection cached at this slot
    Cached(usize),
    /// Intersection inside a cell, never shared
    Free,
}

#[derive(Clone, Copy, Debug)]
struct ClipVertex {
    position: Vec2,
    uv: Vec2,
    origin: Origin,
    /// Horizontal grid edge (bottom or top of a cell) the vertex lies on
    horizontal_edge: Option<usize>,
    /// Vertical grid edge (left or right of a cell) the vertex lies on
    vertical_edge: Option<usize>,
    index: Option<u32>,
}

impl ClipVertex {
    fn is_grid(&self) -> bool {
        matches!(self.origin, Origin::Grid(_))
    }
}

type Polygon = SmallVec<[ClipVertex; 8]>;

/// Reusable clipping state.
///
/// Holding one clipper across generations keeps the edge cache and polygon
/// buffers allocated.
#[derive(Debug, Default)]
pub struct QuadClipper {
    edge_cache: Vec<Option<ClipVertex>>,
    polygon: Polygon,
    scratch: Polygon,
}

impl QuadClipper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clip every cell of `grid` against `cut_lines` and append the result to `mesh`.
    ///
    /// With `skip_center` the interior cells (those not touching the outer
    /// ring of the grid) are left out.
    pub fn clip_grid(
        &mut self,
        grid: &mut VertexGrid,
        cut_lines: &[CutLine],
        color: [u8; 4],
        skip_center: bool,
        mesh: &mut Mesh,
    ) {
        let (width, height) = (grid.columns(), grid.rows());
        if width < 2 || height < 2 {
            return;
        }

        let edges = (width - 1) * height + width * (height - 1);
        self.edge_cache.clear();
        self.edge_cache.resize(edges * cut_lines.len(), None);

        for x in 0..width - 1 {
            for y in 0..height - 1 {
                if skip_center && x > 0 && x < width - 2 && y > 0 && y < height - 2 {
                    continue;
                }
                self.clip_cell(grid, cut_lines, edges, x, y);
                self.emit_polygon(grid, color, mesh);
            }
        }
    }

    fn clip_cell(&mut self, grid: &VertexGrid, cut_lines: &[CutLine], edges: usize, x: usize, y: usize) {
        let h = grid.rows();
        let bottom_left = grid.index(x, y);

        let left = (2 * h - 1) * x + y;
        let top = (2 * h - 1) * x + y + h;
        let right = (2 * h - 1) * (x + 1) + y;
        let bottom = (2 * h - 1) * x + y + h - 1;

        let corner = |index: usize, horizontal: usize, vertical: usize| {
            let v = grid.get(index);
            ClipVertex {
                position: v.position,
                uv: v.uv,
                origin: Origin::Grid(index),
                horizontal_edge: Some(horizontal),
                vertical_edge: Some(vertical),
                index: v.index,
            }
        };

        self.polygon.clear();
        self.polygon.push(corner(bottom_left, bottom, left));
        self.polygon.push(corner(bottom_left + 1, top, left));
        self.polygon.push(corner(bottom_left + h + 1, top, right));
        self.polygon.push(corner(bottom_left + h, bottom, right));

        for (line_index, line) in cut_lines.iter().enumerate() {
            self.scratch.clear();
            cut_polygon(
                &self.polygon,
                &mut self.scratch,
                &mut self.edge_cache,
                edges * line_index,
                line,
            );
            std::mem::swap(&mut self.polygon, &mut self.scratch);
            if self.polygon.len() < 3 {
                break;
            }
        }
    }

    /// Fan-triangulate the clipped polygon, skipping slivers whose three
    /// points share an x or a y coordinate
    fn emit_polygon(&mut self, grid: &mut VertexGrid, color: [u8; 4], mesh: &mut Mesh) {
        if self.polygon.len() < 3 {
            return;
        }
        let first = self.polygon[0].position;
        for i in 1..self.polygon.len() - 1 {
            let (b, c) = (self.polygon[i].position, self.polygon[i + 1].position);
            if approx_eq(first.x, b.x) && approx_eq(first.x, c.x) {
                continue;
            }
            if approx_eq(first.y, b.y) && approx_eq(first.y, c.y) {
                continue;
            }
            let a = self.output_index(0, grid, color, mesh);
            let b = self.output_index(i, grid, color, mesh);
            let c = self.output_index(i + 1, grid, color, mesh);
            mesh.push_triangle(a, b, c);
        }
    }

    fn output_index(&mut self, slot: usize, grid: &mut VertexGrid, color: [u8; 4], mesh: &mut Mesh) -> u32 {
        let vertex = &mut self.polygon[slot];
        if let Some(index) = vertex.index {
            return index;
        }
        let index = mesh.push_vertex(MeshVertex::new(vertex.position, vertex.uv, color));
        vertex.index = Some(index);
        match vertex.origin {
            Origin::Grid(i) => grid.get_mut(i).index = Some(index),
            Origin::Cached(i) => {
                if let Some(cached) = self.edge_cache[i].as_mut() {
                    cached.index = Some(index);
                }
            }
            Origin::Free => {}
        }
        index
    }
}

/// Clip `input` against one half-plane into `output`
fn cut_polygon(
    input: &Polygon,
    output: &mut Polygon,
    cache: &mut [Option<ClipVertex>],
    cache_offset: usize,
    line: &CutLine,
) {
    if input.len() < 3 {
        return;
    }
    let mut p1 = input[input.len() - 1];
    let mut p1_in = line.contains(p1.position);

    for &p2 in input.iter() {
        let p2_in = line.contains(p2.position);
        if p1_in && p2_in {
            push_distinct(output, p2);
        } else if p1_in {
            let hit = intersection(&p1, &p2, cache, cache_offset, line);
            if hit.position != p1.position {
                push_distinct(output, hit);
            }
        } else if p2_in {
            let hit = intersection(&p1, &p2, cache, cache_offset, line);
            if hit.position != p2.position {
                push_distinct(output, hit);
            }
            push_distinct(output, p2);
        }
        p1 = p2;
        p1_in = p2_in;
    }

    if output.len() > 1 && output[0].position == output[output.len() - 1].position {
        if let Some(last) = output.pop() {
            if output[0].origin != last.origin && last.is_grid() {
                output[0] = last;
            }
        }
    }
}

/// Push unless it repeats the previous vertex's position.
///
/// Of two vertices at one position the grid vertex is kept.
fn push_distinct(output: &mut Polygon, vertex: ClipVertex) {
    match output.last_mut() {
        Some(last) if last.position == vertex.position => {
            if vertex.is_grid() && !last.is_grid() {
                *last = vertex;
            }
        }
        _ => output.push(vertex),
    }
}

/// Crossing of segment `p1 -> p2` with `line`, shared through the cache
/// when the segment runs along a grid edge
fn intersection(
    p1: &ClipVertex,
    p2: &ClipVertex,
    cache: &mut [Option<ClipVertex>],
    cache_offset: usize,
    line: &CutLine,
) -> ClipVertex {
    let shared = match (p1.horizontal_edge, p2.horizontal_edge, p1.vertical_edge, p2.vertical_edge) {
        (Some(a), Some(b), _, _) if a == b => Some((a, true)),
        (_, _, Some(a), Some(b)) if a == b => Some((a, false)),
        _ => None,
    };

    // A crossing on an endpoint is that endpoint
    let mut hit = interpolate(p1, p2, line);
    if same_point(hit.position, p1.position) {
        return *p1;
    }
    if same_point(hit.position, p2.position) {
        return *p2;
    }
    let Some((edge, horizontal)) = shared else {
        return hit;
    };

    let slot = cache_offset + edge;
    if let Some(cached) = cache[slot] {
        if cached.index.is_some() {
            return cached;
        }
    }

    if horizontal {
        hit.horizontal_edge = Some(edge);
    } else {
        hit.vertical_edge = Some(edge);
    }
    hit.origin = Origin::Cached(slot);
    cache[slot] = Some(hit);
    hit
}

fn same_point(a: Vec2, b: Vec2) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn interpolate(p1: &ClipVertex, p2: &ClipVertex, line: &CutLine) -> ClipVertex {
    let d1 = line.signed_distance(p1.position);
    let d2 = line.signed_distance(p2.position);
    let denom = d1 - d2;
    let t = if approx_eq(denom, 0.0) { 0.0 } else { d1 / denom }.clamp(0.0, 1.0);
    let (position, uv) = if t <= 0.0 {
        (p1.position, p1.uv)
    } else if t >= 1.0 {
        (p2.position, p2.uv)
    } else {
        (p1.position.lerp(p2.position, t), p1.uv.lerp(p2.uv, t))
    };

    ClipVertex {
        position,
        uv,
        origin: Origin::Free,
        horizontal_edge: None,
        vertical_edge: None,
        index: None,
    }
}
