//! Textured OBJ/MTL viewer with per-fragment Phong shading.
//!
//! The crate is split the same way the frame flows:
//! - [`io`] parses OBJ/MTL text and TOML configuration.
//! - [`scene`] holds the mesh, material, lights and camera.
//! - [`pipeline`] owns the shader program (uniform table), the Phong lighting
//!   model and the frame renderer.
//! - [`core`] is the software rasterizer the pipeline draws with.
//! - [`ui`] maps window key presses to light toggles.

pub mod app;
pub mod core;
pub mod io;
pub mod pipeline;
pub mod scene;
pub mod ui;
