//! Sprite-mesh passthrough
//!
//! Maps a sprite's own tight geometry into the target rect instead of
//! drawing the full quad.

use crate::error::{MeshError, Result};
use crate::geometry::{Rect, Vec2};
use crate::mesh::{Mesh, MeshVertex};
use crate::sprite::{SpriteGeometry, SpriteMetrics};

/// Append `geometry` scaled from the sprite rect onto `rect`
pub fn map_sprite_geometry(
    geometry: &SpriteGeometry,
    sprite: &SpriteMetrics,
    rect: Rect,
    color: [u8; 4],
    mesh: &mut Mesh,
) -> Result<()> {
    if geometry.positions.len() != geometry.uvs.len() {
        return Err(MeshError::Configuration(format!(
            "sprite mesh has {} positions but {} uvs",
            geometry.positions.len(),
            geometry.uvs.len()
        )));
    }
    if geometry.triangles.len() % 3 != 0 {
        return Err(MeshError::Configuration(format!(
            "sprite mesh index count {} is not a multiple of 3",
            geometry.triangles.len()
        )));
    }
    if let Some(&index) = geometry
        .triangles
        .iter()
        .find(|&&i| i as usize >= geometry.positions.len())
    {
        return Err(MeshError::Configuration(format!(
            "sprite mesh index {index} out of range"
        )));
    }

    let size = sprite.size();
    let scale = Vec2::new(rect.width / size.x, rect.height / size.y);
    let base = mesh.vertices.len() as u32;

    mesh.vertices.extend(
        geometry
            .positions
            .iter()
            .zip(&geometry.uvs)
            .map(|(&p, &uv)| MeshVertex::new(rect.position() + p.scale(scale), uv, color)),
    );
    mesh.indices
        .extend(geometry.triangles.iter().map(|&i| base + u32::from(i)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nineslice_image::Border;

    fn diamond() -> SpriteGeometry {
        SpriteGeometry {
            positions: vec![
                Vec2::new(5.0, 0.0),
                Vec2::new(0.0, 5.0),
                Vec2::new(5.0, 10.0),
                Vec2::new(10.0, 5.0),
            ],
            uvs: vec![
                Vec2::new(0.5, 0.0),
                Vec2::new(0.0, 0.5),
                Vec2::new(0.5, 1.0),
                Vec2::new(1.0, 0.5),
            ],
            triangles: vec![0, 1, 2, 0, 2, 3],
        }
    }

    #[test]
    fn test_maps_into_rect() {
        let sprite = SpriteMetrics::new(10, 10, Border::ZERO);
        let mut mesh = Mesh::new();
        map_sprite_geometry(&diamond(), &sprite, Rect::new(100.0, 0.0, 20.0, 40.0), [255; 4], &mut mesh).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertices[0].position, [110.0, 0.0]);
        assert_eq!(mesh.vertices[2].position, [110.0, 40.0]);
        assert_eq!(mesh.vertices[3].uv, [1.0, 0.5]);
        assert_eq!(mesh.area(), 400.0);
    }

    #[test]
    fn test_rejects_malformed_geometry() {
        let sprite = SpriteMetrics::new(10, 10, Border::ZERO);
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);

        let mut bad = diamond();
        bad.triangles.push(9);
        bad.triangles.extend([0, 1]);
        let err = map_sprite_geometry(&bad, &sprite, rect, [255; 4], &mut Mesh::new());
        assert!(matches!(err, Err(MeshError::Configuration(_))));

        let mut bad = diamond();
        bad.uvs.pop();
        let err = map_sprite_geometry(&bad, &sprite, rect, [255; 4], &mut Mesh::new());
        assert!(matches!(err, Err(MeshError::Configuration(_))));
    }
}
