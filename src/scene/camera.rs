use crate::core::math::transform::TransformFactory;
use nalgebra::{Matrix4, Point3};

/// Axis-aligned view volume of an orthographic projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoBounds {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrthoBounds {
    fn default() -> Self {
        Self::from([-4.0, 4.0, -4.0, 4.0, -4.0, 4.0])
    }
}

impl From<[f32; 6]> for OrthoBounds {
    fn from(v: [f32; 6]) -> Self {
        Self {
            left: v[0],
            right: v[1],
            bottom: v[2],
            top: v[3],
            near: v[4],
            far: v[5],
        }
    }
}

/// Fixed orthographic camera.
///
/// There is no view transform: geometry goes straight from world space through
/// the projection. `position` only feeds the specular view vector.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub bounds: OrthoBounds,

    projection_matrix: Matrix4<f32>,
}

impl Camera {
    pub fn new_orthographic(position: Point3<f32>, bounds: OrthoBounds) -> Self {
        let projection_matrix = TransformFactory::orthographic(
            bounds.left,
            bounds.right,
            bounds.bottom,
            bounds.top,
            bounds.near,
            bounds.far,
        );
        Self {
            position,
            bounds,
            projection_matrix,
        }
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new_orthographic(Point3::new(0.0, 0.0, -2.0), OrthoBounds::default())
    }
}
