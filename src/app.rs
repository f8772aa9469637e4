use crate::io::config::Config;
use crate::io::image::save_buffer_to_image;
use crate::pipeline::passes::{post_process_to_buffer, render_frame, setup_program};
use crate::pipeline::renderer::Renderer;
use crate::scene::loader::init_scene;
use crate::ui::input::InputQueue;
use crate::ui::light_control::{ControlFlow, dispatch};
use log::{debug, info};
use minifb::{Window, WindowOptions};
use nalgebra::Vector3;
use std::path::Path;
use std::time::Instant;

/// Runs the interactive viewer until the window closes or Escape is pressed.
pub fn run_gui(config: &Config) -> Result<(), String> {
    let width = config.window.width;
    let height = config.window.height;

    let mut scene = init_scene(config).map_err(|e| format!("Scene setup failed: {e}"))?;
    let mut program = setup_program(&scene);
    let mut renderer =
        Renderer::new(width, height, config.render.samples).with_cull_mode(config.cull_mode());
    let clear_color = Vector3::from(config.render.clear_color);

    let mut window = Window::new(
        &config.window.title,
        width,
        height,
        WindowOptions {
            resize: false,
            ..WindowOptions::default()
        },
    )
    .map_err(|e| format!("Failed to create window: {e}"))?;
    window.set_target_fps(config.render.target_fps);

    info!("Starting GUI mode ({}x{})...", width, height);
    info!("Controls: 1/2/3 = toggle lights, Escape = quit");

    let mut queue = InputQueue::new();
    let mut buffer = vec![0u32; width * height];
    let mut frame_count = 0;
    let mut last_fps_update = Instant::now();

    while window.is_open() {
        queue.collect_from_window(&window);
        if dispatch(&mut queue, &mut scene.lights, &mut program) == ControlFlow::Exit {
            break;
        }

        render_frame(&scene, &program, &mut renderer, clear_color);
        post_process_to_buffer(&renderer.framebuffer, &mut buffer);
        window
            .update_with_buffer(&buffer, width, height)
            .map_err(|e| format!("Failed to present frame: {e}"))?;

        frame_count += 1;
        if last_fps_update.elapsed().as_secs_f32() >= 2.0 {
            debug!(
                "Average FPS: {:.1}",
                frame_count as f32 / last_fps_update.elapsed().as_secs_f32()
            );
            frame_count = 0;
            last_fps_update = Instant::now();
        }
    }

    info!("Window closed");
    Ok(())
}

/// Renders a single frame without a window and writes it to `output`
/// (or `render.output` from the config).
pub fn run_cli(config: &Config, output: Option<&Path>) -> Result<(), String> {
    info!("Starting headless render...");
    let width = config.window.width;
    let height = config.window.height;

    let scene = init_scene(config).map_err(|e| format!("Scene setup failed: {e}"))?;
    let program = setup_program(&scene);
    let mut renderer =
        Renderer::new(width, height, config.render.samples).with_cull_mode(config.cull_mode());

    let start_time = Instant::now();
    render_frame(
        &scene,
        &program,
        &mut renderer,
        Vector3::from(config.render.clear_color),
    );
    info!("Render completed in {:.2?}", start_time.elapsed());

    let mut buffer = vec![0u32; width * height];
    post_process_to_buffer(&renderer.framebuffer, &mut buffer);

    let output = output.unwrap_or_else(|| Path::new(&config.render.output));
    save_buffer_to_image(&buffer, width, height, output)
        .map_err(|e| format!("Failed to save '{}': {e}", output.display()))
}
