use crate::core::color::pack_rgb;
use crate::core::framebuffer::FrameBuffer;
use crate::pipeline::program::ShaderProgram;
use crate::pipeline::renderer::Renderer;
use crate::pipeline::shaders::phong::PhongShader;
use crate::scene::context::SceneState;
use nalgebra::Vector3;
use rayon::prelude::*;

/// Links the Phong program and uploads the scene's uniforms.
pub fn setup_program(scene: &SceneState) -> ShaderProgram {
    let mut program = ShaderProgram::link();
    let g = *program.globals();

    program.set_mat4(g.projection, scene.camera.projection_matrix());
    program.set_mat4(g.model, scene.model_matrix);
    program.set_vec3(g.cam_pos, scene.camera.position.coords);

    let (ka, kd, ks) = scene.material.scalar_coefficients();
    program.set_float(g.ka, ka);
    program.set_float(g.kd, kd);
    program.set_float(g.ks, ks);
    program.set_float(g.shininess, scene.shininess);

    program.upload_lights(&scene.lights);
    program
}

/// Clears the target and draws the scene mesh with the current program state.
pub fn render_frame(
    scene: &SceneState,
    program: &ShaderProgram,
    renderer: &mut Renderer,
    clear_color: Vector3<f32>,
) {
    renderer.clear(clear_color);
    let shader = PhongShader::from_program(program, scene.texture.as_ref());
    renderer.draw_mesh(&scene.mesh, &shader);
}

/// Resolves the framebuffer into a 0RGB display buffer, clamping each channel.
pub fn post_process_to_buffer(framebuffer: &FrameBuffer, buffer: &mut [u32]) {
    buffer
        .par_chunks_mut(framebuffer.width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = framebuffer.get_pixel(x, y).map_or(0, pack_rgb);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::material::Material;
    use crate::scene::mesh::Mesh;

    fn material() -> Material {
        Material {
            ambient: Vector3::new(0.2, 0.5, 0.5),
            diffuse: Vector3::new(0.6, 0.1, 0.1),
            specular: Vector3::new(0.8, 0.0, 0.0),
            texture_file: String::new(),
        }
    }

    #[test]
    fn program_carries_scene_uniforms() {
        let scene = SceneState::new(Mesh::default(), material());
        let program = setup_program(&scene);
        let g = program.globals();

        assert_eq!(program.float(g.ka), 0.2);
        assert_eq!(program.float(g.kd), 0.6);
        assert_eq!(program.float(g.ks), 0.8);
        assert_eq!(program.float(g.shininess), 10.0);
        assert_eq!(program.vec3(g.cam_pos), Vector3::new(0.0, 0.0, -2.0));
        assert_eq!(program.mat4(g.projection), scene.camera.projection_matrix());
        for (i, light) in scene.lights.iter().enumerate() {
            assert_eq!(program.read_light(i).as_ref(), Some(light));
        }
    }

    #[test]
    fn empty_mesh_renders_clear_color() {
        let scene = SceneState::new(Mesh::default(), material());
        let program = setup_program(&scene);
        let mut renderer = Renderer::new(4, 3, 1);
        render_frame(&scene, &program, &mut renderer, Vector3::new(0.0, 0.0, 1.0));

        let mut buffer = vec![0xDEAD_BEEF; 12];
        post_process_to_buffer(&renderer.framebuffer, &mut buffer);
        assert!(buffer.iter().all(|&p| p == 0x0000_00FF));
    }
}
