use crate::core::geometry::Vertex;
use nalgebra::{Vector3, Vector4};
use std::ops::{Add, Mul};

/// Trait for types that can be linearly interpolated across a triangle's surface.
///
/// Requirements:
/// - Copy + Clone: cheaply duplicable values for per-vertex storage and interpolation.
/// - Add + Mul<f32>: support linear combination (a + b * t) used by barycentric interpolation.
/// - Send + Sync: safe to use from multiple threads during parallel rasterization.
pub trait Interpolatable:
    Copy + Clone + Add<Output = Self> + Mul<f32, Output = Self> + Send + Sync
{
}

impl<T> Interpolatable for T where
    T: Copy + Clone + Add<Output = T> + Mul<f32, Output = T> + Send + Sync
{
}

/// Shader represents the programmable stages of the pipeline.
///
/// Implementations must be thread-safe (Send + Sync) because shading may be invoked
/// concurrently across fragments.
pub trait Shader: Send + Sync {
    /// Per-vertex varying data to be interpolated and provided to the fragment shader.
    type Varying: Interpolatable;

    /// Vertex shader stage.
    ///
    /// Returns the homogeneous clip-space position and the varying data
    /// associated with that vertex.
    fn vertex(&self, vertex: &Vertex) -> (Vector4<f32>, Self::Varying);

    /// Fragment shader stage.
    ///
    /// Computes the final linear RGB color for the current fragment from the
    /// interpolated varying. The result is not clamped.
    fn fragment(&self, varying: Self::Varying) -> Vector3<f32>;
}
