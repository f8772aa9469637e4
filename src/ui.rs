pub mod input;
pub mod light_control;
