use image::{DynamicImage, Rgb, RgbImage};
use nalgebra::{Point3, Vector2, Vector3};
use phong_viewer::core::geometry::Vertex;
use phong_viewer::io::image::save_buffer_to_image;
use phong_viewer::pipeline::passes::{post_process_to_buffer, render_frame, setup_program};
use phong_viewer::pipeline::program::ShaderProgram;
use phong_viewer::pipeline::renderer::Renderer;
use phong_viewer::scene::context::SceneState;
use phong_viewer::scene::material::Material;
use phong_viewer::scene::mesh::Mesh;
use phong_viewer::scene::texture::Texture;
use phong_viewer::ui::input::InputEvent;
use phong_viewer::ui::light_control::{ControlFlow, handle_event};

const W: usize = 32;
const H: usize = 32;

/// A quad covering the middle of the [-4, 4] ortho box, facing the camera at z = -2.
fn quad() -> Mesh {
    let n = Vector3::new(0.0, 0.0, -1.0);
    let v = |x: f32, y: f32| Vertex::new(Point3::new(x, y, 0.0), Vector2::new(0.5, 0.5), n);
    Mesh::new(vec![
        v(-2.0, -2.0),
        v(2.0, -2.0),
        v(2.0, 2.0),
        v(-2.0, -2.0),
        v(2.0, 2.0),
        v(-2.0, 2.0),
    ])
}

fn grey_material() -> Material {
    Material {
        ambient: Vector3::repeat(0.2),
        diffuse: Vector3::repeat(0.6),
        specular: Vector3::repeat(0.8),
        texture_file: String::new(),
    }
}

fn textured_scene() -> SceneState {
    let mut scene = SceneState::new(quad(), grey_material());
    let white = RgbImage::from_pixel(1, 1, Rgb([255, 255, 255]));
    scene.texture = Some(Texture::from_image(DynamicImage::ImageRgb8(white)));
    scene
}

fn render(scene: &SceneState, program: &ShaderProgram) -> Vec<u32> {
    let mut renderer = Renderer::new(W, H, 1);
    render_frame(scene, program, &mut renderer, Vector3::zeros());
    let mut buffer = vec![0u32; W * H];
    post_process_to_buffer(&renderer.framebuffer, &mut buffer);
    buffer
}

#[test]
fn untextured_quad_shows_only_specular() {
    let scene = SceneState::new(quad(), grey_material());
    let program = setup_program(&scene);
    let buffer = render(&scene, &program);

    let textured = textured_scene();
    let textured_buffer = render(&textured, &setup_program(&textured));
    let centre = (H / 2) * W + W / 2;
    assert!((buffer[centre] & 0xFF) < (textured_buffer[centre] & 0xFF));
}

#[test]
fn quad_is_lit_on_black_background() {
    let scene = textured_scene();
    let program = setup_program(&scene);
    let buffer = render(&scene, &program);

    // corners are outside the quad
    assert_eq!(buffer[0], 0);
    assert_eq!(buffer[W * H - 1], 0);
    // centre is inside: three ambient terms of 0.2 * light color at least
    let blue = buffer[(H / 2) * W + W / 2] & 0xFF;
    assert!(blue >= (0.18 * 255.0) as u32, "blue = {blue}");
}

#[test]
fn toggling_every_light_off_blackens_the_frame() {
    let mut scene = textured_scene();
    let mut program = setup_program(&scene);
    let lit = render(&scene, &program);

    for i in 0..3 {
        let flow = handle_event(InputEvent::ToggleLight(i), &mut scene.lights, &mut program);
        assert_eq!(flow, ControlFlow::Continue);
    }
    let dark = render(&scene, &program);

    assert_ne!(lit, dark);
    assert!(dark.iter().all(|&p| p == 0));
}

#[test]
fn headless_frame_saves_to_png() {
    let scene = textured_scene();
    let program = setup_program(&scene);
    let buffer = render(&scene, &program);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.png");
    save_buffer_to_image(&buffer, W, H, &path).unwrap();

    let img = image::open(&path).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (W as u32, H as u32));
    let centre = buffer[(H / 2) * W + W / 2];
    let px = img.get_pixel(W as u32 / 2, H as u32 / 2);
    assert_eq!(px[0], (centre >> 16) as u8);
}
