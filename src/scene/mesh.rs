use crate::core::geometry::{FLOATS_PER_VERTEX, Vertex};
use nalgebra::{Point3, Vector2, Vector3};

/// A non-indexed triangle list.
///
/// Every 3 consecutive vertices form one triangle. Shared corners are
/// duplicated, one full vertex record per face corner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterates complete triangles. A trailing group of fewer than 3 vertices is skipped.
    pub fn triangles(&self) -> impl Iterator<Item = &[Vertex]> {
        self.vertices.chunks_exact(3)
    }

    /// Flattens the mesh into the 11-floats-per-vertex buffer the draw call consumes.
    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut buffer = Vec::with_capacity(self.vertices.len() * FLOATS_PER_VERTEX);
        for vertex in &self.vertices {
            vertex.write_interleaved(&mut buffer);
        }
        buffer
    }

    /// Creates a simple triangle mesh for testing purposes.
    ///
    /// Vertices are arranged in Counter-Clockwise (CCW) order, facing Z+.
    pub fn create_test_triangle() -> Self {
        let normal = Vector3::new(0.0, 0.0, 1.0);
        Self::new(vec![
            Vertex::new(Point3::new(0.0, 0.5, 0.0), Vector2::new(0.5, 1.0), normal),
            Vertex::new(Point3::new(-0.5, -0.5, 0.0), Vector2::new(0.0, 0.0), normal),
            Vertex::new(Point3::new(0.5, -0.5, 0.0), Vector2::new(1.0, 0.0), normal),
        ])
    }
}
