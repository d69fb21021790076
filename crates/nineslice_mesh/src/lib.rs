//! Nineslice Mesh
//!
//! Triangle mesh generation for nine-slice sprites: a sprite with a
//! non-stretching border drawn into an arbitrary rect, either stretched,
//! tiled or progressively revealed by a fill.
//!
//! # Features
//!
//! - Simple, sliced and tiled layouts, with tile-scaled center slices
//! - Linear and radial (90/180/360 degree) fills, plus custom fill shapes
//! - Watertight output: vertices on shared cell edges are emitted once
//! - `#[repr(C)]` vertices ready for GPU upload
//! - Software preview rendering
//!
//! # Example
//!
//! ```rust
//! use nineslice_image::Border;
//! use nineslice_mesh::{generate_mesh, MeshRequest, Rect, SliceSpec, SpriteMetrics};
//!
//! let sprite = SpriteMetrics::new(64, 64, Border::uniform(4));
//! let slice = SliceSpec { sliced: true, ..Default::default() };
//! let request = MeshRequest::new(&sprite, Rect::new(0.0, 0.0, 128.0, 128.0)).with_slice(slice);
//!
//! let mesh = generate_mesh(&request).unwrap();
//! assert_eq!(mesh.vertex_count(), 16);
//! assert_eq!(mesh.triangle_count(), 18);
//! ```

pub mod clip;
pub mod error;
pub mod fill;
pub mod generator;
pub mod geometry;
pub mod grid;
pub mod layout;
pub mod mesh;
pub mod raster;
pub mod sprite;
pub mod sprite_mesh;

pub use clip::QuadClipper;
pub use error::{MeshError, Result};
pub use fill::{CustomFill, CutLine, CutLines, FillMethod, FillSpec};
pub use generator::{generate_mesh, MeshRequest, SlicedMeshGenerator, MAX_CUT_LINES, MAX_MESH_VERTICES};
pub use geometry::{Rect, UvRect, Vec2};
pub use grid::{GridVertex, VertexGrid};
pub use layout::{plan_layout, AxisLayout, LayoutOptions, MeshLayout, SliceSpec, TileSpec};
pub use mesh::{Mesh, MeshVertex};
pub use raster::{render_preview, Viewport};
pub use sprite::{
    multiplied_pixels_per_unit, SpriteGeometry, SpriteMetrics, WrapMode, MIN_PIXELS_PER_UNIT_MULTIPLIER,
};
pub use sprite_mesh::map_sprite_geometry;
