use crate::core::geometry::Vertex;
use crate::core::pipeline::Shader;
use crate::pipeline::lighting::{FragmentInput, PhongCoefficients, shade};
use crate::pipeline::program::ShaderProgram;
use crate::scene::light::{Light, MAX_LIGHTS};
use crate::scene::texture::{Texture, sample_or_black};
use log::warn;
use nalgebra::{Matrix3, Matrix4, Point3, Vector2, Vector3, Vector4};
use std::ops::{Add, Mul};

/// Data that needs to be interpolated across the triangle surface.
/// Passed from Vertex Shader -> Rasterizer -> Fragment Shader.
#[derive(Clone, Copy, Debug)]
pub struct PhongVarying {
    /// Normal vector in World Space, not normalized.
    pub normal: Vector3<f32>,
    /// Position in World Space (needed for calculating View Vector and Light Vector).
    pub world_pos: Point3<f32>,
    /// Texture coordinates, already flipped vertically.
    pub uv: Vector2<f32>,
}

// nalgebra's Point3 doesn't support addition with Point3 directly,
// so we handle it via coordinates.
impl Add for PhongVarying {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            normal: self.normal + other.normal,
            world_pos: Point3::from(self.world_pos.coords + other.world_pos.coords),
            uv: self.uv + other.uv,
        }
    }
}

impl Mul<f32> for PhongVarying {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            normal: self.normal * scalar,
            world_pos: Point3::from(self.world_pos.coords * scalar),
            uv: self.uv * scalar,
        }
    }
}

/// Multi-light Phong shader.
///
/// A frame-local snapshot of the [`ShaderProgram`] uniform table, so the
/// fragment stage always sees the most recently pushed state.
pub struct PhongShader<'a> {
    pub model_matrix: Matrix4<f32>,
    pub projection_matrix: Matrix4<f32>,
    pub normal_matrix: Matrix3<f32>,
    pub camera_pos: Point3<f32>,
    pub coefficients: PhongCoefficients,
    pub lights: Vec<Light>,
    pub texture: Option<&'a Texture>,
}

impl<'a> PhongShader<'a> {
    pub fn from_program(program: &ShaderProgram, texture: Option<&'a Texture>) -> Self {
        let g = program.globals();
        let model_matrix = program.mat4(g.model);

        // Inverse transpose keeps normals perpendicular under non-uniform scaling.
        let upper = model_matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let normal_matrix = match upper.try_inverse() {
            Some(inverse) => inverse.transpose(),
            None => {
                warn!("Model matrix is singular, normals use its upper 3x3 unchanged");
                upper
            }
        };

        Self {
            model_matrix,
            projection_matrix: program.mat4(g.projection),
            normal_matrix,
            camera_pos: Point3::from(program.vec3(g.cam_pos)),
            coefficients: PhongCoefficients {
                ka: program.float(g.ka),
                kd: program.float(g.kd),
                ks: program.float(g.ks),
                shininess: program.float(g.shininess),
            },
            lights: (0..MAX_LIGHTS)
                .filter_map(|i| program.read_light(i))
                .collect(),
            texture,
        }
    }
}

impl Shader for PhongShader<'_> {
    type Varying = PhongVarying;

    fn vertex(&self, vertex: &Vertex) -> (Vector4<f32>, Self::Varying) {
        let world = self.model_matrix * vertex.position.to_homogeneous();
        let clip_pos = self.projection_matrix * world;

        let varying = PhongVarying {
            normal: self.normal_matrix * vertex.normal,
            world_pos: Point3::from(world.xyz()),
            uv: Vector2::new(vertex.texcoord.x, 1.0 - vertex.texcoord.y),
        };

        (clip_pos, varying)
    }

    fn fragment(&self, varying: Self::Varying) -> Vector3<f32> {
        let fragment = FragmentInput {
            position: varying.world_pos,
            normal: varying.normal,
            texture_color: sample_or_black(self.texture, varying.uv.x, varying.uv.y),
        };
        shade(
            &fragment,
            &self.camera_pos,
            &self.lights,
            &self.coefficients,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::program::ShadingStage;
    use crate::scene::light::LightSet;

    fn program() -> ShaderProgram {
        let mut program = ShaderProgram::link();
        let g = *program.globals();
        program.set_float(g.ka, 0.2);
        program.set_float(g.kd, 0.6);
        program.set_float(g.ks, 0.8);
        program.set_float(g.shininess, 10.0);
        program.set_vec3(g.cam_pos, Vector3::new(0.0, 0.0, -2.0));
        program.upload_lights(&LightSet::demo());
        program
    }

    #[test]
    fn vertex_stage_flips_v_and_keeps_raw_normal() {
        let shader = PhongShader::from_program(&program(), None);
        let vertex = Vertex::new(
            Point3::new(1.0, 2.0, 3.0),
            Vector2::new(0.25, 0.25),
            Vector3::new(0.0, 2.0, 0.0),
        );
        let (clip, varying) = shader.vertex(&vertex);
        assert_eq!(clip, Vector4::new(1.0, 2.0, 3.0, 1.0));
        assert_eq!(varying.uv, Vector2::new(0.25, 0.75));
        assert_eq!(varying.normal, Vector3::new(0.0, 2.0, 0.0));
        assert_eq!(varying.world_pos, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn flattened_model_keeps_upper_matrix_for_normals() {
        let mut program = program();
        let g = *program.globals();
        let flat = Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 1.0, 0.0));
        program.set_mat4(g.model, flat);
        let shader = PhongShader::from_program(&program, None);
        assert_eq!(shader.normal_matrix, Matrix3::new(2.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn scaled_model_uses_inverse_transpose_for_normals() {
        let mut program = program();
        let g = *program.globals();
        program.set_mat4(g.model, Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 4.0, 1.0)));
        let shader = PhongShader::from_program(&program, None);
        assert_eq!(shader.normal_matrix, Matrix3::new(0.5, 0.0, 0.0, 0.0, 0.25, 0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn snapshot_reflects_pushed_toggle() {
        let mut program = program();
        program.push_light_enabled(0, false);
        let shader = PhongShader::from_program(&program, None);
        assert_eq!(shader.lights.len(), 3);
        assert!(!shader.lights[0].enabled);
        assert!(shader.lights[1].enabled);
    }

    #[test]
    fn untextured_fragment_keeps_only_specular() {
        let shader = PhongShader::from_program(&program(), None);
        let varying = PhongVarying {
            normal: Vector3::new(0.0, 0.0, -1.0),
            world_pos: Point3::origin(),
            uv: Vector2::zeros(),
        };
        let color = shader.fragment(varying);
        assert!(color.iter().all(|c| c.is_finite() && *c >= 0.0));
        // Grey lights: with a black texture only the (grey) specular term remains.
        assert!((color.x - color.y).abs() < 1e-6 && (color.y - color.z).abs() < 1e-6);
    }
}
