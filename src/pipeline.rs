pub mod lighting;
pub mod passes;
pub mod program;
pub mod renderer;
pub mod shaders;
