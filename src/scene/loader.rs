use crate::core::math::transform::TransformFactory;
use crate::io::config::{Config, LightConfig};
use crate::io::mtl_loader::{load_mtl, resolve_relative};
use crate::io::obj_loader::load_obj;
use crate::scene::camera::{Camera, OrthoBounds};
use crate::scene::context::SceneState;
use crate::scene::light::{Attenuation, Light, LightError, LightSet};
use crate::scene::material::{Material, MaterialError, MaterialLibrary};
use crate::scene::mesh::Mesh;
use crate::scene::texture::Texture;
use log::{error, info, warn};
use nalgebra::{Point3, Vector3};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Material(#[from] MaterialError),
    #[error(transparent)]
    Lights(#[from] LightError),
}

/// Builds the light set from config entries, in order.
pub fn build_lights(configs: &[LightConfig]) -> Result<LightSet, LightError> {
    let lights = configs
        .iter()
        .map(|l| {
            let [constant, linear, quadratic] = l.attenuation;
            Light::new_point(Point3::from(l.position), Vector3::from(l.color))
                .with_attenuation(Attenuation::new(constant, linear, quadratic))
                .with_enabled(l.enabled)
        })
        .collect();
    LightSet::new(lights)
}

/// Picks the configured material, strictly or falling back to a zeroed one.
pub fn select_material(
    library: &MaterialLibrary,
    name: &str,
    strict: bool,
) -> Result<Material, MaterialError> {
    if strict {
        if !library.contains(name) {
            let mut known: Vec<&str> = library.names().collect();
            known.sort_unstable();
            warn!("Material '{}' not found; library has [{}]", name, known.join(", "));
        }
        return library.get(name).cloned();
    }
    if !library.contains(name) {
        warn!("Material '{}' not found, using default material", name);
    }
    Ok(library.get_or_default(name))
}

/// Loads the diffuse texture named by `material`, relative to the OBJ file.
/// Failures are logged and leave the scene untextured.
pub fn load_diffuse_texture(obj_path: &str, material: &Material) -> Option<Texture> {
    if !material.has_texture() {
        warn!("Material has no diffuse texture");
        return None;
    }
    let path = resolve_relative(obj_path, &material.texture_file);
    match Texture::load(&path) {
        Ok(texture) => Some(texture),
        Err(e) => {
            warn!("{}", e);
            None
        }
    }
}

/// Initial resource loading (heavy I/O).
///
/// A missing or broken OBJ file is logged and leaves the mesh empty; only a
/// strict material miss or an oversized light list is an error.
pub fn init_scene(config: &Config) -> Result<SceneState, SceneError> {
    let obj_path = config.scene.obj_path.as_str();

    let (mesh, material_library) = match load_obj(obj_path) {
        Ok(data) => (data.mesh, data.material_library),
        Err(e) => {
            error!("{}", e);
            (Mesh::default(), None)
        }
    };

    let mut library = MaterialLibrary::new();
    if let Some(mtl) = &material_library {
        load_mtl(resolve_relative(obj_path, mtl), &mut library);
    }

    let material_config = &config.scene.material;
    let material = select_material(&library, &material_config.name, material_config.strict)?;
    info!("Using material '{}'", material_config.name);

    let texture = load_diffuse_texture(obj_path, &material);
    let lights = build_lights(&config.lights)?;

    let camera = Camera::new_orthographic(
        Point3::from(config.camera.position),
        OrthoBounds::from(config.camera.ortho),
    );

    let transform = &config.scene.transform;
    let model_matrix = TransformFactory::model(
        &Vector3::from(transform.translation),
        &Vector3::from(transform.rotation_deg),
        &Vector3::from(transform.scale),
    );

    Ok(SceneState {
        mesh,
        material,
        texture,
        lights,
        camera,
        shininess: config.scene.shininess,
        model_matrix,
    })
}
