use crate::core::framebuffer::FrameBuffer;
use crate::core::pipeline::Shader;
use crate::core::rasterizer::{CullMode, Rasterizer};
use crate::scene::mesh::Mesh;
use nalgebra::Vector3;

/// Owns the render target and runs meshes through the pipeline stages.
pub struct Renderer {
    pub rasterizer: Rasterizer,
    pub framebuffer: FrameBuffer,
}

impl Renderer {
    /// sample_count: 1 for no AA, 2 for 2x2 SSAA, etc.
    pub fn new(width: usize, height: usize, sample_count: usize) -> Self {
        Self {
            rasterizer: Rasterizer::default(),
            framebuffer: FrameBuffer::new(width, height, sample_count),
        }
    }

    pub fn with_cull_mode(mut self, cull_mode: CullMode) -> Self {
        self.rasterizer.cull_mode = cull_mode;
        self
    }

    /// Clears color to `color` and depth to the far plane.
    pub fn clear(&mut self, color: Vector3<f32>) {
        self.framebuffer.clear(color, f32::INFINITY);
    }

    /// Draws a non-indexed triangle list. A trailing partial triangle is ignored.
    pub fn draw_mesh<S: Shader>(&mut self, mesh: &Mesh, shader: &S) {
        for triangle in mesh.triangles() {
            let (p0, v0) = shader.vertex(&triangle[0]);
            let (p1, v1) = shader.vertex(&triangle[1]);
            let (p2, v2) = shader.vertex(&triangle[2]);

            self.rasterizer
                .rasterize_triangle(&self.framebuffer, shader, &[p0, p1, p2], &[v0, v1, v2]);
        }
    }
}
