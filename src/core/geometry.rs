use nalgebra::{Point3, Vector2, Vector3};

/// Number of scalars one vertex occupies in the interleaved buffer:
/// position(3), color(3), texcoord(2), normal(3).
pub const FLOATS_PER_VERTEX: usize = 11;

/// Base color written into every parsed vertex.
pub const BASE_COLOR: Vector3<f32> = Vector3::new(1.0, 1.0, 1.0);

/// Represents a single vertex in 3D space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in local object space.
    pub position: Point3<f32>,
    /// Per-object base color. Occupies its slot in the buffer but is not shaded with.
    pub color: Vector3<f32>,
    /// Raw texture coordinates (UV) as read from the file, not flipped.
    pub texcoord: Vector2<f32>,
    /// Normal vector, not necessarily unit length.
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, texcoord: Vector2<f32>, normal: Vector3<f32>) -> Self {
        Self {
            position,
            color: BASE_COLOR,
            texcoord,
            normal,
        }
    }

    /// Appends this vertex in interleaved order to `out`.
    pub fn write_interleaved(&self, out: &mut Vec<f32>) {
        out.extend_from_slice(&[
            self.position.x,
            self.position.y,
            self.position.z,
            self.color.x,
            self.color.y,
            self.color.z,
            self.texcoord.x,
            self.texcoord.y,
            self.normal.x,
            self.normal.y,
            self.normal.z,
        ]);
    }

    /// Reads one vertex back out of an 11-float slice.
    pub fn from_interleaved(data: &[f32]) -> Option<Self> {
        if data.len() < FLOATS_PER_VERTEX {
            return None;
        }
        Some(Self {
            position: Point3::new(data[0], data[1], data[2]),
            color: Vector3::new(data[3], data[4], data[5]),
            texcoord: Vector2::new(data[6], data[7]),
            normal: Vector3::new(data[8], data[9], data[10]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleaved_layout_is_pos_color_uv_normal() {
        let v = Vertex::new(
            Point3::new(1.0, 2.0, 3.0),
            Vector2::new(0.25, 0.75),
            Vector3::new(0.0, 0.0, -1.0),
        );
        let mut buf = Vec::new();
        v.write_interleaved(&mut buf);
        assert_eq!(
            buf,
            vec![1.0, 2.0, 3.0, 1.0, 1.0, 1.0, 0.25, 0.75, 0.0, 0.0, -1.0]
        );
        assert_eq!(Vertex::from_interleaved(&buf), Some(v));
    }

    #[test]
    fn short_slice_is_rejected() {
        assert!(Vertex::from_interleaved(&[0.0; 10]).is_none());
    }
}
