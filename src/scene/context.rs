use crate::scene::camera::Camera;
use crate::scene::light::LightSet;
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use crate::scene::texture::Texture;
use nalgebra::Matrix4;

/// Everything a frame needs, owned by the render loop and passed down by reference.
#[derive(Debug, Clone)]
pub struct SceneState {
    pub mesh: Mesh,
    pub material: Material,
    pub texture: Option<Texture>,
    pub lights: LightSet,
    pub camera: Camera,
    pub shininess: f32,
    pub model_matrix: Matrix4<f32>,
}

impl SceneState {
    /// An untextured scene with the demo lights and camera.
    pub fn new(mesh: Mesh, material: Material) -> Self {
        Self {
            mesh,
            material,
            texture: None,
            lights: LightSet::demo(),
            camera: Camera::default(),
            shininess: 10.0,
            model_matrix: Matrix4::identity(),
        }
    }
}
