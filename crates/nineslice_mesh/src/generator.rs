//! Mesh generation entry points
//!
//! A [`MeshRequest`] bundles a sprite, a target rect and the
//! slice/tile/fill configuration. [`SlicedMeshGenerator`] turns it into a
//! [`Mesh`]: plan the layout, build the base tile grid once, then for every
//! fill polygon clip every tile against the tile boundary and fill cut lines.

use crate::clip::QuadClipper;
use crate::error::{MeshError, Result};
use crate::fill::{self, CustomFill, CutLines, FillSpec};
use crate::geometry::{Rect, Vec2};
use crate::grid::VertexGrid;
use crate::layout::{plan_layout, LayoutOptions, MeshLayout, SliceSpec, TileSpec};
use crate::mesh::Mesh;
use crate::sprite::SpriteMetrics;
use crate::sprite_mesh::map_sprite_geometry;

/// Most grid vertices a single generation may touch
pub const MAX_MESH_VERTICES: usize = 65_000;

/// Most cut lines (tile boundary plus fill) applied to one polygon
pub const MAX_CUT_LINES: usize = 16;

/// One mesh generation request
#[derive(Clone, Copy)]
pub struct MeshRequest<'a> {
    pub sprite: &'a SpriteMetrics,
    /// Target rect in the host's local space
    pub target: Rect,
    pub slice: SliceSpec,
    pub tile: TileSpec,
    pub fill: FillSpec,
    /// Final sprite pixels per target unit
    pub pixels_per_unit: f32,
    /// RGBA8 color written to every vertex
    pub color: [u8; 4],
    /// Shrink simple images to the sprite's aspect ratio
    pub preserve_aspect: bool,
    /// Alignment of the aspect-fitted rect inside the target
    pub pivot: Vec2,
    /// Emit the sprite's own tight mesh in simple, unfilled mode
    pub use_sprite_mesh: bool,
    pub custom_fill: Option<&'a dyn CustomFill>,
}

impl<'a> MeshRequest<'a> {
    /// Simple mode at one sprite pixel per unit, white, centered pivot
    pub fn new(sprite: &'a SpriteMetrics, target: Rect) -> Self {
        Self {
            sprite,
            target,
            slice: SliceSpec::default(),
            tile: TileSpec::default(),
            fill: FillSpec::default(),
            pixels_per_unit: 1.0,
            color: [255; 4],
            preserve_aspect: false,
            pivot: Vec2::new(0.5, 0.5),
            use_sprite_mesh: false,
            custom_fill: None,
        }
    }

    pub fn with_slice(mut self, slice: SliceSpec) -> Self {
        self.slice = slice;
        self
    }

    pub fn with_tile(mut self, tile: TileSpec) -> Self {
        self.tile = tile;
        self
    }

    pub fn with_fill(mut self, fill: FillSpec) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_pixels_per_unit(mut self, pixels_per_unit: f32) -> Self {
        self.pixels_per_unit = pixels_per_unit;
        self
    }

    pub fn with_color(mut self, color: [u8; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn with_preserve_aspect(mut self, pivot: Vec2) -> Self {
        self.preserve_aspect = true;
        self.pivot = pivot;
        self
    }

    pub fn with_sprite_mesh(mut self) -> Self {
        self.use_sprite_mesh = true;
        self
    }

    pub fn with_custom_fill(mut self, custom_fill: &'a dyn CustomFill) -> Self {
        self.custom_fill = Some(custom_fill);
        self
    }

    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            slice: self.slice,
            tile: self.tile,
            pixels_per_unit: self.pixels_per_unit,
            preserve_aspect: self.preserve_aspect,
            pivot: self.pivot,
        }
    }

    /// Whether the sprite's own geometry replaces the generated grid
    pub fn uses_sprite_mesh(&self) -> bool {
        self.use_sprite_mesh
            && !self.slice.sliced
            && !self.tile.tiled
            && !self.fill.is_filled()
            && self.sprite.geometry.is_some()
    }
}

/// Reusable generator state.
///
/// Keeps the grids, clipper buffers and cut-line scratch allocated between
/// calls; generating the same request twice yields the same mesh.
#[derive(Debug, Default)]
pub struct SlicedMeshGenerator {
    base: VertexGrid,
    tile: VertexGrid,
    clipper: QuadClipper,
    cut_lines: CutLines,
}

impl SlicedMeshGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a fresh mesh for `request`
    pub fn generate(&mut self, request: &MeshRequest<'_>) -> Result<Mesh> {
        let mut mesh = Mesh::new();
        self.generate_into(request, &mut mesh)?;
        Ok(mesh)
    }

    /// Generate into `mesh`, replacing its contents.
    ///
    /// On error `mesh` is left empty.
    pub fn generate_into(&mut self, request: &MeshRequest<'_>, mesh: &mut Mesh) -> Result<()> {
        mesh.clear();
        let layout = plan_layout(request.sprite, request.target, &request.layout_options())?;

        if request.uses_sprite_mesh() {
            if let Some(geometry) = &request.sprite.geometry {
                map_sprite_geometry(geometry, request.sprite, layout.rect, request.color, mesh)?;
                tracing::debug!(
                    "generate_mesh: sprite mesh, {} vertices, {} triangles",
                    mesh.vertex_count(),
                    mesh.triangle_count()
                );
                return Ok(());
            }
        }

        if layout.rect.is_empty() || layout.tile_count() == 0 {
            tracing::trace!("generate_mesh: empty target {:?}", layout.rect);
            return Ok(());
        }

        let polygons = fill::polygon_count(&request.fill, request.custom_fill)?;
        check_vertex_capacity(&layout, polygons)?;

        self.base.build(&layout, request.sprite);
        let result = self.emit_polygons(request, &layout, polygons, mesh);
        if result.is_err() {
            mesh.clear();
        }
        result?;

        tracing::debug!(
            "generate_mesh: {} vertices, {} triangles ({} tiles, {} polygons)",
            mesh.vertex_count(),
            mesh.triangle_count(),
            layout.tile_count(),
            polygons
        );
        Ok(())
    }

    fn emit_polygons(
        &mut self,
        request: &MeshRequest<'_>,
        layout: &MeshLayout,
        polygons: usize,
        mesh: &mut Mesh,
    ) -> Result<()> {
        let skip_center = request.slice.sliced && !layout.fill_center;

        for polygon in 0..polygons {
            self.cut_lines.clear();
            fill::tile_cut_lines(layout.rect, layout.x.cut, layout.y.cut, &mut self.cut_lines);

            let requested = self.cut_lines.len()
                + fill::cut_line_count(&request.fill, polygon, request.custom_fill)?;
            if requested > MAX_CUT_LINES {
                tracing::warn!(
                    "generate_mesh: polygon {} needs {} cut lines, limit is {}",
                    polygon,
                    requested,
                    MAX_CUT_LINES
                );
                return Err(MeshError::Capacity {
                    what: "cut lines",
                    requested,
                    limit: MAX_CUT_LINES,
                });
            }
            fill::fill_cut_lines(
                &request.fill,
                layout.rect,
                polygon,
                request.custom_fill,
                &mut self.cut_lines,
            )?;

            for i in 0..layout.x.tile_count {
                for j in 0..layout.y.tile_count {
                    self.tile.copy_shifted(&self.base, layout.tile_offset(i, j));
                    self.clipper.clip_grid(
                        &mut self.tile,
                        &self.cut_lines,
                        request.color,
                        skip_center,
                        mesh,
                    );
                }
            }
        }
        Ok(())
    }
}

fn check_vertex_capacity(layout: &MeshLayout, polygons: usize) -> Result<()> {
    let requested = layout.grid_vertex_count().saturating_mul(polygons);
    if requested > MAX_MESH_VERTICES {
        tracing::warn!(
            "generate_mesh: {} grid vertices requested, limit is {}",
            requested,
            MAX_MESH_VERTICES
        );
        return Err(MeshError::Capacity {
            what: "vertices",
            requested,
            limit: MAX_MESH_VERTICES,
        });
    }
    Ok(())
}

/// Generate a mesh with a throwaway [`SlicedMeshGenerator`]
pub fn generate_mesh(request: &MeshRequest<'_>) -> Result<Mesh> {
    SlicedMeshGenerator::new().generate(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fill::{CutLine, FillMethod};
    use crate::sprite::SpriteGeometry;
    use nineslice_image::Border;

    fn sliced() -> SliceSpec {
        SliceSpec {
            sliced: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_simple_quad() {
        let sprite = SpriteMetrics::new(32, 16, Border::ZERO);
        let mesh = generate_mesh(&MeshRequest::new(&sprite, Rect::new(0.0, 0.0, 64.0, 32.0))).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.area(), 64.0 * 32.0);
    }

    #[test]
    fn test_sliced_scenario_counts() {
        let sprite = SpriteMetrics::new(64, 64, Border::uniform(4));
        let request = MeshRequest::new(&sprite, Rect::new(0.0, 0.0, 128.0, 128.0)).with_slice(sliced());
        let mesh = generate_mesh(&request).unwrap();
        assert_eq!(mesh.vertex_count(), 16);
        assert_eq!(mesh.triangle_count(), 18);
    }

    #[test]
    fn test_hollow_center() {
        let sprite = SpriteMetrics::new(64, 64, Border::uniform(4));
        let slice = SliceSpec {
            fill_center: false,
            ..sliced()
        };
        let request = MeshRequest::new(&sprite, Rect::new(0.0, 0.0, 128.0, 128.0)).with_slice(slice);
        let mesh = generate_mesh(&request).unwrap();
        assert_eq!(mesh.triangle_count(), 16);
        assert_eq!(mesh.area(), 128.0 * 128.0 - 120.0 * 120.0);
    }

    #[test]
    fn test_tiled_with_cut() {
        let sprite = SpriteMetrics::new(10, 10, Border::ZERO);
        let tile = TileSpec {
            tiled: true,
            ..Default::default()
        };
        let request = MeshRequest::new(&sprite, Rect::new(0.0, 0.0, 35.0, 20.0)).with_tile(tile);
        let mesh = generate_mesh(&request).unwrap();
        assert_eq!(mesh.triangle_count(), 4 * 2 * 2);
        assert!((mesh.area() - 35.0 * 20.0).abs() < 1e-3);
        assert!(mesh.vertices.iter().all(|v| v.position[0] <= 35.0 + 1e-4));
    }

    #[test]
    fn test_spaced_tiles_past_the_edge_are_dropped() {
        let sprite = SpriteMetrics::new(10, 10, Border::ZERO);
        let tile = TileSpec {
            tiled: true,
            tile_spacing: [5, 0],
            ..Default::default()
        };
        let request = MeshRequest::new(&sprite, Rect::new(0.0, 0.0, 40.0, 10.0)).with_tile(tile);
        let mesh = generate_mesh(&request).unwrap();
        // Tiles at 0, 15 and 30 are visible, the one at 45 is cut away
        assert!((mesh.area() - 300.0).abs() < 1e-3);
        assert!(mesh.vertices.iter().all(|v| v.position[0] <= 40.0 + 1e-4));
    }

    #[test]
    fn test_colors_and_offset_rect() {
        let sprite = SpriteMetrics::new(8, 8, Border::ZERO);
        let request = MeshRequest::new(&sprite, Rect::new(5.0, 7.0, 8.0, 8.0)).with_color([10, 20, 30, 40]);
        let mesh = generate_mesh(&request).unwrap();
        assert!(mesh.vertices.iter().all(|v| v.color == [10, 20, 30, 40]));
        assert!(mesh.vertices.iter().any(|v| v.position == [5.0, 7.0]));
        assert!(mesh.vertices.iter().any(|v| v.position == [13.0, 15.0]));
    }

    #[test]
    fn test_empty_rect_and_zero_fill() {
        let sprite = SpriteMetrics::new(8, 8, Border::ZERO);
        let mesh = generate_mesh(&MeshRequest::new(&sprite, Rect::new(0.0, 0.0, 0.0, 8.0))).unwrap();
        assert!(mesh.is_empty());

        let fill = FillSpec::new(FillMethod::Horizontal, 0, true, 0.0);
        let request = MeshRequest::new(&sprite, Rect::new(0.0, 0.0, 8.0, 8.0)).with_fill(fill);
        assert!(generate_mesh(&request).unwrap().is_empty());
    }

    #[test]
    fn test_horizontal_fill_halves_area() {
        let sprite = SpriteMetrics::new(64, 64, Border::uniform(4));
        let fill = FillSpec::new(FillMethod::Horizontal, 0, true, 0.5);
        let request = MeshRequest::new(&sprite, Rect::new(0.0, 0.0, 128.0, 128.0))
            .with_slice(sliced())
            .with_fill(fill);
        let mesh = generate_mesh(&request).unwrap();
        assert!((mesh.area() - 64.0 * 128.0).abs() < 1e-2);
        assert!(mesh.vertices.iter().all(|v| v.position[0] <= 64.0 + 1e-4));
    }

    #[test]
    fn test_capacity_rejection() {
        let sprite = SpriteMetrics::new(2, 2, Border::ZERO);
        let tile = TileSpec {
            tiled: true,
            ..Default::default()
        };
        let request = MeshRequest::new(&sprite, Rect::new(0.0, 0.0, 1000.0, 1000.0)).with_tile(tile);
        let mut mesh = Mesh::new();
        let err = SlicedMeshGenerator::new().generate_into(&request, &mut mesh);
        assert!(matches!(
            err,
            Err(MeshError::Capacity {
                what: "vertices",
                limit: MAX_MESH_VERTICES,
                ..
            })
        ));
        assert!(mesh.is_empty());
    }

    struct ManyLines;

    impl CustomFill for ManyLines {
        fn polygon_count(&self, _amount: f32) -> usize {
            1
        }

        fn cut_line_count(&self, _polygon: usize, _amount: f32) -> usize {
            MAX_CUT_LINES + 1
        }

        fn fill_cut_lines(&self, cut_lines: &mut [CutLine], _amount: f32, rect: Rect, _polygon: usize) {
            for line in cut_lines {
                *line = CutLine::new(rect.position(), Vec2::RIGHT);
            }
        }
    }

    #[test]
    fn test_cut_line_capacity() {
        let sprite = SpriteMetrics::new(8, 8, Border::ZERO);
        let fill = FillSpec::new(FillMethod::Custom, 0, true, 0.5);
        let request = MeshRequest::new(&sprite, Rect::new(0.0, 0.0, 8.0, 8.0))
            .with_fill(fill)
            .with_custom_fill(&ManyLines);
        assert!(matches!(
            generate_mesh(&request),
            Err(MeshError::Capacity {
                what: "cut lines",
                ..
            })
        ));
    }

    #[test]
    fn test_sprite_mesh_passthrough() {
        let geometry = SpriteGeometry {
            positions: vec![Vec2::new(0.0, 0.0), Vec2::new(8.0, 16.0), Vec2::new(16.0, 0.0)],
            uvs: vec![Vec2::new(0.0, 0.0), Vec2::new(0.5, 1.0), Vec2::new(1.0, 0.0)],
            triangles: vec![0, 1, 2],
        };
        let sprite = SpriteMetrics::new(16, 16, Border::ZERO).with_geometry(geometry);
        let request = MeshRequest::new(&sprite, Rect::new(0.0, 0.0, 32.0, 32.0)).with_sprite_mesh();
        assert!(request.uses_sprite_mesh());
        let mesh = generate_mesh(&request).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.vertices[1].position, [16.0, 32.0]);

        // Slicing ignores the sprite mesh
        let request = request.with_slice(sliced());
        assert!(!request.uses_sprite_mesh());
    }

    #[test]
    fn test_generator_is_repeatable() {
        let sprite = SpriteMetrics::new(64, 64, Border::uniform(4));
        let fill = FillSpec::new(FillMethod::Radial360, 2, false, 0.7);
        let request = MeshRequest::new(&sprite, Rect::new(0.0, 0.0, 100.0, 80.0))
            .with_slice(sliced())
            .with_fill(fill);
        let mut generator = SlicedMeshGenerator::new();
        let first = generator.generate(&request).unwrap();
        let second = generator.generate(&request).unwrap();
        assert_eq!(first, second);
    }
}
