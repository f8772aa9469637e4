use crate::core::framebuffer::FrameBuffer;
use crate::core::math::interpolation::{
    barycentric_coordinates, is_inside_triangle, perspective_correct_barycentric,
};
use crate::core::math::transform::{apply_perspective_division, ndc_to_screen};
use crate::core::pipeline::Shader;
use nalgebra::{Point2, Vector4};
use rayon::prelude::*;
use std::str::FromStr;

/// Draws clip-space triangles into a [`FrameBuffer`].
#[derive(Debug, Clone, Default)]
pub struct Rasterizer {
    pub cull_mode: CullMode,
}

#[derive(PartialEq, Eq, Copy, Clone, Debug, Default)]
pub enum CullMode {
    Back,
    Front,
    /// Both windings are drawn (OpenGL's default with culling disabled).
    #[default]
    None,
}

impl FromStr for CullMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "back" => Ok(CullMode::Back),
            "front" => Ok(CullMode::Front),
            "none" => Ok(CullMode::None),
            other => Err(format!(
                "unknown cull mode '{other}' (expected back, front or none)"
            )),
        }
    }
}

/// A clip-space position paired with its varying.
type ClipVertex<V> = (Vector4<f32>, V);

impl Rasterizer {
    pub fn new(cull_mode: CullMode) -> Self {
        Self { cull_mode }
    }

    /// Rasterize a single triangle given clip-space coordinates and corresponding varyings.
    ///
    /// The triangle is clipped against the canonical view volume in
    /// homogeneous clip space (Sutherland-Hodgman), then fan-triangulated.
    pub fn rasterize_triangle<S: Shader>(
        &self,
        framebuffer: &FrameBuffer,
        shader: &S,
        clip_coords: &[Vector4<f32>; 3],
        varyings: &[S::Varying; 3],
    ) {
        // A triangle clipped by a cube has at most 9 vertices.
        let mut current_poly: Vec<ClipVertex<S::Varying>> = Vec::with_capacity(16);
        let mut clip_buffer: Vec<ClipVertex<S::Varying>> = Vec::with_capacity(16);

        for i in 0..3 {
            current_poly.push((clip_coords[i], varyings[i]));
        }

        // (axis, sign): plane is sign * P[axis] <= P.w
        let planes = [
            (0, 1.0),
            (0, -1.0),
            (1, 1.0),
            (1, -1.0),
            (2, 1.0),
            (2, -1.0),
        ];

        for &(axis, sign) in &planes {
            if current_poly.is_empty() {
                return;
            }
            Self::clip_polygon_against_plane(&current_poly, &mut clip_buffer, axis, sign);
            std::mem::swap(&mut current_poly, &mut clip_buffer);
        }

        if current_poly.len() < 3 {
            return;
        }

        let v0 = current_poly[0];
        for pair in current_poly[1..].windows(2) {
            let (v1, v2) = (pair[0], pair[1]);
            self.rasterize_triangle_clipped(
                framebuffer,
                shader,
                &[v0.0, v1.0, v2.0],
                &[v0.1, v1.1, v2.1],
            );
        }
    }

    /// Clips a polygon against one plane, writing the result to `output`.
    fn clip_polygon_against_plane<V: Copy + std::ops::Add<Output = V> + std::ops::Mul<f32, Output = V>>(
        input: &[ClipVertex<V>],
        output: &mut Vec<ClipVertex<V>>,
        axis: usize,
        sign: f32,
    ) {
        output.clear();

        let Some(&last) = input.last() else {
            return;
        };

        let is_inside = |p: &Vector4<f32>| sign * p[axis] <= p.w + 1e-6;

        let mut prev = last;
        let mut prev_inside = is_inside(&prev.0);

        for curr in input {
            let curr_inside = is_inside(&curr.0);

            if curr_inside != prev_inside
                && let Some(inter) = Self::intersect_edge_plane(prev, *curr, axis, sign)
            {
                output.push(inter);
            }
            if curr_inside {
                output.push(*curr);
            }

            prev = *curr;
            prev_inside = curr_inside;
        }
    }

    /// Intersection of segment a-b with the plane `sign * P[axis] = P.w`.
    /// Position and varying are both interpolated linearly.
    #[inline(always)]
    fn intersect_edge_plane<V: Copy + std::ops::Add<Output = V> + std::ops::Mul<f32, Output = V>>(
        a: ClipVertex<V>,
        b: ClipVertex<V>,
        axis: usize,
        sign: f32,
    ) -> Option<ClipVertex<V>> {
        let ac = a.0[axis];
        let bc = b.0[axis];
        let aw = a.0.w;
        let bw = b.0.w;

        let denom = sign * (bc - ac) - (bw - aw);
        if denom.abs() < 1e-9 {
            return None;
        }

        let t = (aw - sign * ac) / denom;
        if !t.is_finite() {
            return None;
        }

        let pos = a.0 + (b.0 - a.0) * t;
        let vary = a.1 * (1.0 - t) + b.1 * t;
        Some((pos, vary))
    }

    /// Rasterizes a triangle that is fully inside the view volume.
    fn rasterize_triangle_clipped<S: Shader>(
        &self,
        framebuffer: &FrameBuffer,
        shader: &S,
        clip_coords: &[Vector4<f32>; 3],
        varyings: &[S::Varying; 3],
    ) {
        let width = framebuffer.buffer_width as f32;
        let height = framebuffer.buffer_height as f32;

        // 1. Perspective Division & Viewport Transform
        let mut screen_coords = [Point2::origin(); 3];
        let mut w_values = [0.0; 3];

        for i in 0..3 {
            if clip_coords[i].w.abs() < 1e-6 {
                return;
            }
            let ndc = apply_perspective_division(&clip_coords[i]);
            w_values[i] = clip_coords[i].w;
            screen_coords[i] = ndc_to_screen(ndc.x, ndc.y, width, height);
        }

        // 2. Face Culling
        // Screen Y points down, so counter-clockwise in NDC has negative signed area here.
        let v0 = screen_coords[0];
        let v1 = screen_coords[1];
        let v2 = screen_coords[2];
        let edge1 = v1 - v0;
        let edge2 = v2 - v1;
        let signed_area = edge1.x * edge2.y - edge1.y * edge2.x;

        match self.cull_mode {
            CullMode::Back if signed_area >= 0.0 => return,
            CullMode::Front if signed_area <= 0.0 => return,
            _ => {}
        }

        // 3. Bounding Box & Scissor
        let (min_x, min_y, max_x, max_y) = compute_bounding_box(&screen_coords);
        if max_x < 0
            || max_y < 0
            || min_x >= framebuffer.buffer_width as i32
            || min_y >= framebuffer.buffer_height as i32
        {
            return;
        }

        let start_x = min_x.max(0) as usize;
        let end_x = (max_x.min(framebuffer.buffer_width as i32 - 1)) as usize;
        let start_y = min_y.max(0) as usize;
        let end_y = (max_y.min(framebuffer.buffer_height as i32 - 1)) as usize;

        // 4. Pixel Loop, one row per task
        (start_y..=end_y).into_par_iter().for_each(|y| {
            for x in start_x..=end_x {
                let pixel_center = Point2::new(x as f32 + 0.5, y as f32 + 0.5);

                let Some(bary) =
                    barycentric_coordinates(pixel_center, v0, v1, v2).filter(|b| is_inside_triangle(*b))
                else {
                    continue;
                };

                let Some(corrected) =
                    perspective_correct_barycentric(bary, w_values[0], w_values[1], w_values[2])
                else {
                    continue;
                };

                // z/w is affine in screen space, so depth uses the uncorrected weights.
                let z_ndc = bary.x * clip_coords[0].z / w_values[0]
                    + bary.y * clip_coords[1].z / w_values[1]
                    + bary.z * clip_coords[2].z / w_values[2];
                let depth = z_ndc * 0.5 + 0.5;

                if framebuffer.depth_test_and_update(x, y, depth) {
                    let interpolated = varyings[0] * corrected.x
                        + varyings[1] * corrected.y
                        + varyings[2] * corrected.z;
                    framebuffer.set_sample(x, y, shader.fragment(interpolated));
                }
            }
        });
    }
}

fn compute_bounding_box(points: &[Point2<f32>; 3]) -> (i32, i32, i32, i32) {
    let min_x = points[0].x.min(points[1].x).min(points[2].x).floor() as i32;
    let min_y = points[0].y.min(points[1].y).min(points[2].y).floor() as i32;
    let max_x = points[0].x.max(points[1].x).max(points[2].x).ceil() as i32;
    let max_y = points[0].y.max(points[1].y).max(points[2].y).ceil() as i32;
    (min_x, min_y, max_x, max_y)
}
