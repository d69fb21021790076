//! Output mesh

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;

/// A vertex of the generated mesh.
///
/// `#[repr(C)]` and `Pod`, so vertex arrays can be uploaded as-is.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize)]
pub struct MeshVertex {
    /// Position in the target rect's space
    pub position: [f32; 2],
    pub uv: [f32; 2],
    /// Straight RGBA8 vertex color
    pub color: [u8; 4],
}

impl MeshVertex {
    pub fn new(position: Vec2, uv: Vec2, color: [u8; 4]) -> Self {
        Self {
            position: position.to_array(),
            uv: uv.to_array(),
            color,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::from(self.position)
    }

    pub fn uv(&self) -> Vec2 {
        Vec2::from(self.uv)
    }
}

/// Triangle mesh: vertices plus index triples
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append a vertex, returning its index
    pub fn push_vertex(&mut self, vertex: MeshVertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Iterate triangles as vertex triples
    pub fn triangles(&self) -> impl Iterator<Item = [&MeshVertex; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| {
            [
                &self.vertices[t[0] as usize],
                &self.vertices[t[1] as usize],
                &self.vertices[t[2] as usize],
            ]
        })
    }

    /// Sum of the absolute triangle areas
    pub fn area(&self) -> f32 {
        self.triangles()
            .map(|[a, b, c]| {
                let (a, b, c) = (a.position(), b.position(), c.position());
                let ab = b - a;
                let ac = c - a;
                (ab.x * ac.y - ab.y * ac.x).abs() * 0.5
            })
            .sum()
    }

    /// Vertex buffer contents
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer contents
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 20);
    }

    #[test]
    fn test_counts_and_bytes() {
        let mut mesh = Mesh::new();
        let a = mesh.push_vertex(MeshVertex::new(Vec2::new(0.0, 0.0), Vec2::ZERO, [255; 4]));
        let b = mesh.push_vertex(MeshVertex::new(Vec2::new(0.0, 2.0), Vec2::ZERO, [255; 4]));
        let c = mesh.push_vertex(MeshVertex::new(Vec2::new(2.0, 0.0), Vec2::ZERO, [255; 4]));
        mesh.push_triangle(a, b, c);

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertex_bytes().len(), 60);
        assert_eq!(mesh.index_bytes().len(), 12);
        assert_eq!(mesh.area(), 2.0);

        mesh.clear();
        assert!(mesh.is_empty());
    }
}
