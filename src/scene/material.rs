use nalgebra::Vector3;
use std::collections::HashMap;
use thiserror::Error;

/// Surface reflectance read from an MTL `newmtl` block.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// `Ka`
    pub ambient: Vector3<f32>,
    /// `Kd`
    pub diffuse: Vector3<f32>,
    /// `Ks`
    pub specular: Vector3<f32>,
    /// `map_Kd`, relative to the OBJ file's directory. Empty when unset.
    pub texture_file: String,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Vector3::zeros(),
            diffuse: Vector3::zeros(),
            specular: Vector3::zeros(),
            texture_file: String::new(),
        }
    }
}

impl Material {
    /// Scalar (ka, kd, ks) coefficients fed to the shader.
    ///
    /// Only the red channel of each RGB coefficient is used.
    pub fn scalar_coefficients(&self) -> (f32, f32, f32) {
        (self.ambient.x, self.diffuse.x, self.specular.x)
    }

    pub fn has_texture(&self) -> bool {
        !self.texture_file.is_empty()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaterialError {
    #[error("material '{0}' not found")]
    NotFound(String),
}

/// Name-keyed materials from one or more MTL files.
#[derive(Debug, Clone, Default)]
pub struct MaterialLibrary {
    materials: HashMap<String, Material>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fresh default entry for `name`, replacing any previous one.
    pub fn reset(&mut self, name: &str) -> &mut Material {
        self.materials.insert(name.to_string(), Material::default());
        self.entry(name)
    }

    /// Returns the entry for `name`, creating a default one if needed.
    pub fn entry(&mut self, name: &str) -> &mut Material {
        self.materials.entry(name.to_string()).or_default()
    }

    /// Strict lookup.
    pub fn get(&self, name: &str) -> Result<&Material, MaterialError> {
        self.materials
            .get(name)
            .ok_or_else(|| MaterialError::NotFound(name.to_string()))
    }

    /// Permissive lookup: unknown names yield an all-zero material with no texture.
    pub fn get_or_default(&self, name: &str) -> Material {
        self.materials.get(name).cloned().unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.materials.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Material names in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.materials.keys().map(String::as_str)
    }
}
