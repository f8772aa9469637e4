//! Per-fragment Phong illumination with distance-attenuated point lights.
//!
//! For every enabled light the contribution is
//! `attenuation * (diffuse + specular) + ambient`: ambient is added once per
//! enabled light and never attenuated, and specular is never modulated by the
//! texture color. The sum is returned unclamped.

use crate::scene::light::Light;
use nalgebra::{Point3, Vector3};

/// Scalar material weights shared by all lights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongCoefficients {
    pub ka: f32,
    pub kd: f32,
    pub ks: f32,
    /// Specular exponent.
    pub shininess: f32,
}

impl Default for PhongCoefficients {
    fn default() -> Self {
        Self {
            ka: 0.0,
            kd: 0.0,
            ks: 0.0,
            shininess: 10.0,
        }
    }
}

/// Everything the lighting model needs to know about one fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentInput {
    /// World-space position.
    pub position: Point3<f32>,
    /// Surface normal; any length, renormalised here.
    pub normal: Vector3<f32>,
    /// Sampled diffuse texture color (RGB).
    pub texture_color: Vector3<f32>,
}

/// The individual Phong terms of one light at one fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightTerms {
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub attenuation: f32,
}

impl LightTerms {
    pub fn contribution(&self) -> Vector3<f32> {
        (self.diffuse + self.specular) * self.attenuation + self.ambient
    }
}

/// GLSL `reflect`: mirrors `incident` about the plane with normal `normal`.
#[inline]
pub fn reflect(incident: &Vector3<f32>, normal: &Vector3<f32>) -> Vector3<f32> {
    incident - normal * (2.0 * normal.dot(incident))
}

/// Unit vector or zero; degenerate inputs contribute nothing instead of NaN.
#[inline]
fn normalize_or_zero(v: Vector3<f32>) -> Vector3<f32> {
    v.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros)
}

/// Evaluates the Phong terms of a single light, ignoring its enabled flag.
pub fn light_terms(
    fragment: &FragmentInput,
    camera_pos: &Point3<f32>,
    light: &Light,
    coeffs: &PhongCoefficients,
) -> LightTerms {
    let tex = fragment.texture_color;

    let ambient = (light.color * coeffs.ka).component_mul(&tex);

    let to_light = light.position - fragment.position;
    let n = normalize_or_zero(fragment.normal);
    let l = normalize_or_zero(to_light);
    let diff = n.dot(&l).max(0.0);
    let diffuse = (light.color * (coeffs.kd * diff)).component_mul(&tex);

    let r = normalize_or_zero(reflect(&-l, &n));
    let v = normalize_or_zero(camera_pos - fragment.position);
    let spec = r.dot(&v).max(0.0).powf(coeffs.shininess);
    let specular = light.color * (coeffs.ks * spec);

    let attenuation = light.attenuation.factor(to_light.norm());

    LightTerms {
        ambient,
        diffuse,
        specular,
        attenuation,
    }
}

/// Sums the contributions of all enabled lights. Disabled lights are skipped entirely.
pub fn shade(
    fragment: &FragmentInput,
    camera_pos: &Point3<f32>,
    lights: &[Light],
    coeffs: &PhongCoefficients,
) -> Vector3<f32> {
    lights
        .iter()
        .filter(|light| light.enabled)
        .map(|light| light_terms(fragment, camera_pos, light, coeffs).contribution())
        .sum()
}
