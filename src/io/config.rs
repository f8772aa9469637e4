use crate::core::rasterizer::CullMode;
use crate::scene::light::MAX_LIGHTS;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Viewer settings. Every field defaults to the built-in demo scene, so an
/// empty file (or no file at all) renders Suzanne lit by three point lights.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default = "default_lights")]
    pub lights: Vec<LightConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            render: RenderConfig::default(),
            scene: SceneConfig::default(),
            camera: CameraConfig::default(),
            lights: default_lights(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            title: default_title(),
        }
    }
}

fn default_width() -> usize {
    800
}
fn default_height() -> usize {
    600
}
fn default_title() -> String {
    "Phong Viewer".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_samples")]
    pub samples: usize,
    #[serde(default = "default_cull_mode")]
    pub cull_mode: String, // "back", "front", "none"
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default)]
    pub clear_color: [f32; 3],
    #[serde(default = "default_target_fps")]
    pub target_fps: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            cull_mode: default_cull_mode(),
            output: default_output(),
            clear_color: [0.0; 3],
            target_fps: default_target_fps(),
        }
    }
}

fn default_samples() -> usize {
    1
}
fn default_cull_mode() -> String {
    "none".to_string()
}
fn default_output() -> String {
    "output.png".to_string()
}
fn default_target_fps() -> usize {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "default_obj_path")]
    pub obj_path: String,
    #[serde(default = "default_shininess")]
    pub shininess: f32,
    #[serde(default)]
    pub material: MaterialConfig,
    #[serde(default)]
    pub transform: TransformConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            obj_path: default_obj_path(),
            shininess: default_shininess(),
            material: MaterialConfig::default(),
            transform: TransformConfig::default(),
        }
    }
}

fn default_obj_path() -> String {
    "assets/Modelos3D/SuzanneSubdiv1.obj".to_string()
}
fn default_shininess() -> f32 {
    10.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct MaterialConfig {
    #[serde(default = "default_material_name")]
    pub name: String,
    /// Fail scene setup when `name` isn't in the library instead of using a zeroed material.
    #[serde(default)]
    pub strict: bool,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            name: default_material_name(),
            strict: false,
        }
    }
}

fn default_material_name() -> String {
    "Material.001".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransformConfig {
    #[serde(default)]
    pub translation: [f32; 3],
    #[serde(default)]
    pub rotation_deg: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation_deg: [0.0; 3],
            scale: default_scale(),
        }
    }
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    /// left, right, bottom, top, near, far
    #[serde(default = "default_ortho")]
    pub ortho: [f32; 6],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            ortho: default_ortho(),
        }
    }
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 0.0, -2.0]
}
fn default_ortho() -> [f32; 6] {
    [-4.0, 4.0, -4.0, 4.0, -4.0, 4.0]
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub color: [f32; 3],
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// constant, linear, quadratic
    #[serde(default = "default_attenuation")]
    pub attenuation: [f32; 3],
}

fn default_true() -> bool {
    true
}
fn default_attenuation() -> [f32; 3] {
    [1.0, 0.09, 0.032]
}

fn default_lights() -> Vec<LightConfig> {
    let light = |position, grey: f32| LightConfig {
        position,
        color: [grey; 3],
        enabled: true,
        attenuation: default_attenuation(),
    };
    vec![
        light([2.0, 2.0, -3.0], 0.4),
        light([-1.8, 1.5, 1.5], 0.3),
        light([4.0, -4.0, 4.0], 0.2),
    ]
}

impl Config {
    /// Reads, parses and validates a TOML config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        if self.render.samples == 0 {
            return Err(ConfigError::Invalid("render.samples must be at least 1".into()));
        }
        if self.lights.len() > MAX_LIGHTS {
            return Err(ConfigError::Invalid(format!(
                "{} lights configured, at most {} are supported",
                self.lights.len(),
                MAX_LIGHTS
            )));
        }
        self.render
            .cull_mode
            .parse::<CullMode>()
            .map_err(ConfigError::Invalid)?;
        Ok(())
    }

    /// Parsed cull mode; unrecognized values (rejected by `validate`) fall back to none.
    pub fn cull_mode(&self) -> CullMode {
        self.render.cull_mode.parse().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_demo_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!((config.window.width, config.window.height), (800, 600));
        assert_eq!(config.render.samples, 1);
        assert_eq!(config.cull_mode(), CullMode::None);
        assert_eq!(config.scene.material.name, "Material.001");
        assert!(!config.scene.material.strict);
        assert_eq!(config.scene.shininess, 10.0);
        assert_eq!(config.camera.position, [0.0, 0.0, -2.0]);
        assert_eq!(config.lights, default_lights());
        assert_eq!(config.lights[1].position, [-1.8, 1.5, 1.5]);
        assert_eq!(config.lights[2].color, [0.2, 0.2, 0.2]);
        assert_eq!(Config::default().lights, config.lights);
    }

    #[test]
    fn explicit_lights_replace_defaults() {
        let config = Config::from_toml_str(
            r#"
            [[lights]]
            position = [0.0, 1.0, 0.0]
            color = [1.0, 0.5, 0.25]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.lights.len(), 1);
        assert!(!config.lights[0].enabled);
        assert_eq!(config.lights[0].attenuation, [1.0, 0.09, 0.032]);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            [render]
            samples = 2
            cull_mode = "back"

            [scene.material]
            strict = true
            "#,
        )
        .unwrap();
        assert_eq!(config.render.samples, 2);
        assert_eq!(config.render.output, "output.png");
        assert_eq!(config.cull_mode(), CullMode::Back);
        assert!(config.scene.material.strict);
        assert_eq!(config.scene.material.name, "Material.001");
        assert_eq!(config.scene.transform.scale, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn rejects_invalid_values() {
        let four_lights = "[[lights]]\nposition=[0.0,0.0,0.0]\ncolor=[1.0,1.0,1.0]\n".repeat(4);
        assert!(matches!(
            Config::from_toml_str(&four_lights),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[render]\nsamples = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[window]\nwidth = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[render]\ncull_mode = \"sideways\""),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[render\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        assert!(matches!(
            Config::load("/definitely/not/here.toml"),
            Err(ConfigError::Read { .. })
        ));
    }
}
