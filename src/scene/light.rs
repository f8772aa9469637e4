use nalgebra::{Point3, Vector3};
use thiserror::Error;

/// Upper bound on simultaneously configured lights; matches the shader's light array.
pub const MAX_LIGHTS: usize = 3;

/// Distance falloff `1 / (constant + linear * d + quadratic * d^2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
        }
    }
}

impl Attenuation {
    pub fn new(constant: f32, linear: f32, quadratic: f32) -> Self {
        Self {
            constant,
            linear,
            quadratic,
        }
    }

    pub fn factor(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

/// A point light in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Point3<f32>,
    /// Linear RGB intensity.
    pub color: Vector3<f32>,
    pub enabled: bool,
    pub attenuation: Attenuation,
}

impl Light {
    /// Creates an enabled point light with the default attenuation.
    pub fn new_point(position: Point3<f32>, color: Vector3<f32>) -> Self {
        Self {
            position,
            color,
            enabled: true,
            attenuation: Attenuation::default(),
        }
    }

    pub fn with_attenuation(mut self, attenuation: Attenuation) -> Self {
        self.attenuation = attenuation;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LightError {
    #[error("{count} lights configured, at most {MAX_LIGHTS} are supported")]
    TooManyLights { count: usize },
    #[error("no light at index {index} ({count} lights configured)")]
    NoSuchLight { index: usize, count: usize },
}

/// Ordered, bounded set of lights addressed by slot index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightSet {
    lights: Vec<Light>,
}

impl LightSet {
    pub fn new(lights: Vec<Light>) -> Result<Self, LightError> {
        if lights.len() > MAX_LIGHTS {
            return Err(LightError::TooManyLights {
                count: lights.len(),
            });
        }
        Ok(Self { lights })
    }

    /// The three lights of the demo scene: key, fill and back light.
    pub fn demo() -> Self {
        Self {
            lights: vec![
                Light::new_point(Point3::new(2.0, 2.0, -3.0), Vector3::new(0.4, 0.4, 0.4)),
                Light::new_point(Point3::new(-1.8, 1.5, 1.5), Vector3::new(0.3, 0.3, 0.3)),
                Light::new_point(Point3::new(4.0, -4.0, 4.0), Vector3::new(0.2, 0.2, 0.2)),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Light, LightError> {
        let count = self.lights.len();
        self.lights
            .get(index)
            .ok_or(LightError::NoSuchLight { index, count })
    }

    /// Flips the enabled flag of one light and returns the new value.
    pub fn toggle(&mut self, index: usize) -> Result<bool, LightError> {
        let count = self.lights.len();
        let light = self
            .lights
            .get_mut(index)
            .ok_or(LightError::NoSuchLight { index, count })?;
        light.enabled = !light.enabled;
        Ok(light.enabled)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Light> {
        self.lights.iter()
    }

    pub fn as_slice(&self) -> &[Light] {
        &self.lights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn more_than_three_lights_are_rejected() {
        let light = Light::new_point(Point3::origin(), Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(
            LightSet::new(vec![light; 4]),
            Err(LightError::TooManyLights { count: 4 })
        );
        assert!(LightSet::new(vec![light; 3]).is_ok());
    }

    #[test]
    fn toggle_flips_only_enabled_flag() {
        let mut set = LightSet::demo();
        let before = *set.get(1).unwrap();

        assert_eq!(set.toggle(1), Ok(false));
        let after = *set.get(1).unwrap();
        assert!(!after.enabled);
        assert_eq!(after.position, before.position);
        assert_eq!(after.color, before.color);
        assert_eq!(after.attenuation, before.attenuation);

        assert_eq!(set.toggle(1), Ok(true));
        assert_eq!(*set.get(1).unwrap(), before);
    }

    #[test]
    fn toggle_out_of_range_is_an_error() {
        let mut set = LightSet::demo();
        assert_eq!(
            set.toggle(3),
            Err(LightError::NoSuchLight { index: 3, count: 3 })
        );
    }

    #[test]
    fn default_attenuation_at_distance_two() {
        let factor = Attenuation::default().factor(2.0);
        assert!((factor - 1.0 / 1.308).abs() < 1e-6);
    }
}
