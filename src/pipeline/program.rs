use crate::scene::light::{Light, LightSet, MAX_LIGHTS};
use log::warn;
use nalgebra::{Matrix4, Point3, Vector3};

/// Index into a program's uniform table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(usize);

/// A typed uniform value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Bool(bool),
    Float(f32),
    Vec3(Vector3<f32>),
    Mat4(Matrix4<f32>),
}

impl UniformValue {
    fn same_kind(&self, other: &UniformValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Locations of one `lights[i]` struct, resolved once at link time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightSlots {
    pub position: UniformLocation,
    pub color: UniformLocation,
    pub enabled: UniformLocation,
    pub constant: UniformLocation,
    pub linear: UniformLocation,
    pub quadratic: UniformLocation,
}

/// Locations of the non-light uniforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalSlots {
    pub projection: UniformLocation,
    pub model: UniformLocation,
    pub cam_pos: UniformLocation,
    pub ka: UniformLocation,
    pub kd: UniformLocation,
    pub ks: UniformLocation,
    pub shininess: UniformLocation,
    pub texture_unit: UniformLocation,
}

/// Receives shading-state updates triggered outside the render loop.
pub trait ShadingStage {
    /// Pushes the enabled flag of light `index` to the active shading stage.
    fn push_light_enabled(&mut self, index: usize, enabled: bool);
}

/// The linked Phong program: a flat uniform table plus precomputed slot indices.
#[derive(Debug, Clone)]
pub struct ShaderProgram {
    names: Vec<String>,
    values: Vec<UniformValue>,
    globals: GlobalSlots,
    lights: [LightSlots; MAX_LIGHTS],
}

impl ShaderProgram {
    /// Declares the fixed uniform layout and resolves every slot.
    pub fn link() -> Self {
        let mut names = Vec::new();
        let mut values = Vec::new();
        let mut declare = |name: String, value: UniformValue| {
            names.push(name);
            values.push(value);
            UniformLocation(values.len() - 1)
        };

        let globals = GlobalSlots {
            projection: declare("projection".into(), UniformValue::Mat4(Matrix4::identity())),
            model: declare("model".into(), UniformValue::Mat4(Matrix4::identity())),
            cam_pos: declare("camPos".into(), UniformValue::Vec3(Vector3::zeros())),
            ka: declare("ka".into(), UniformValue::Float(0.0)),
            kd: declare("kd".into(), UniformValue::Float(0.0)),
            ks: declare("ks".into(), UniformValue::Float(0.0)),
            shininess: declare("q".into(), UniformValue::Float(0.0)),
            texture_unit: declare("texBuff".into(), UniformValue::Int(0)),
        };

        let lights = std::array::from_fn(|i| {
            let mut field = |name: &str, value| declare(format!("lights[{i}].{name}"), value);
            LightSlots {
                position: field("position", UniformValue::Vec3(Vector3::zeros())),
                color: field("color", UniformValue::Vec3(Vector3::zeros())),
                enabled: field("enabled", UniformValue::Bool(false)),
                constant: field("constant", UniformValue::Float(0.0)),
                linear: field("linear", UniformValue::Float(0.0)),
                quadratic: field("quadratic", UniformValue::Float(0.0)),
            }
        });

        Self {
            names,
            values,
            globals,
            lights,
        }
    }

    /// Looks a uniform up by its declared name.
    pub fn location(&self, name: &str) -> Option<UniformLocation> {
        self.names.iter().position(|n| n == name).map(UniformLocation)
    }

    pub fn globals(&self) -> &GlobalSlots {
        &self.globals
    }

    pub fn light_slots(&self, index: usize) -> Option<&LightSlots> {
        self.lights.get(index)
    }

    pub fn get(&self, location: UniformLocation) -> Option<UniformValue> {
        self.values.get(location.0).copied()
    }

    /// Writes a uniform. Unknown locations and type mismatches are logged and ignored.
    pub fn set(&mut self, location: UniformLocation, value: UniformValue) {
        let Some(slot) = self.values.get_mut(location.0) else {
            warn!("Uniform location {} does not exist", location.0);
            return;
        };
        if !slot.same_kind(&value) {
            warn!(
                "Type mismatch writing uniform '{}': expected {:?}, got {:?}",
                self.names[location.0], slot, value
            );
            return;
        }
        *slot = value;
    }

    pub fn set_float(&mut self, location: UniformLocation, v: f32) {
        self.set(location, UniformValue::Float(v));
    }

    pub fn set_vec3(&mut self, location: UniformLocation, v: Vector3<f32>) {
        self.set(location, UniformValue::Vec3(v));
    }

    pub fn set_mat4(&mut self, location: UniformLocation, v: Matrix4<f32>) {
        self.set(location, UniformValue::Mat4(v));
    }

    pub fn set_bool(&mut self, location: UniformLocation, v: bool) {
        self.set(location, UniformValue::Bool(v));
    }

    pub fn float(&self, location: UniformLocation) -> f32 {
        match self.get(location) {
            Some(UniformValue::Float(v)) => v,
            _ => 0.0,
        }
    }

    pub fn vec3(&self, location: UniformLocation) -> Vector3<f32> {
        match self.get(location) {
            Some(UniformValue::Vec3(v)) => v,
            _ => Vector3::zeros(),
        }
    }

    pub fn mat4(&self, location: UniformLocation) -> Matrix4<f32> {
        match self.get(location) {
            Some(UniformValue::Mat4(v)) => v,
            _ => Matrix4::identity(),
        }
    }

    pub fn boolean(&self, location: UniformLocation) -> bool {
        matches!(self.get(location), Some(UniformValue::Bool(true)))
    }

    /// Uploads every field of every light slot. Slots without a light are disabled.
    pub fn upload_lights(&mut self, lights: &LightSet) {
        for i in 0..MAX_LIGHTS {
            let slots = self.lights[i];
            match lights.as_slice().get(i) {
                Some(light) => {
                    self.set_vec3(slots.position, light.position.coords);
                    self.set_vec3(slots.color, light.color);
                    self.set_bool(slots.enabled, light.enabled);
                    self.set_float(slots.constant, light.attenuation.constant);
                    self.set_float(slots.linear, light.attenuation.linear);
                    self.set_float(slots.quadratic, light.attenuation.quadratic);
                }
                None => self.set_bool(slots.enabled, false),
            }
        }
    }

    /// Reads light slot `index` back out of the uniform table.
    pub fn read_light(&self, index: usize) -> Option<Light> {
        let slots = self.light_slots(index)?;
        let mut light = Light::new_point(
            Point3::from(self.vec3(slots.position)),
            self.vec3(slots.color),
        );
        light.enabled = self.boolean(slots.enabled);
        light.attenuation.constant = self.float(slots.constant);
        light.attenuation.linear = self.float(slots.linear);
        light.attenuation.quadratic = self.float(slots.quadratic);
        Some(light)
    }
}

impl ShadingStage for ShaderProgram {
    fn push_light_enabled(&mut self, index: usize, enabled: bool) {
        match self.light_slots(index).copied() {
            Some(slots) => self.set_bool(slots.enabled, enabled),
            None => warn!("Shader has no light slot {}", index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_slots_match_named_locations() {
        let program = ShaderProgram::link();
        for i in 0..MAX_LIGHTS {
            let slots = program.light_slots(i).unwrap();
            assert_eq!(
                program.location(&format!("lights[{i}].enabled")),
                Some(slots.enabled)
            );
            assert_eq!(
                program.location(&format!("lights[{i}].quadratic")),
                Some(slots.quadratic)
            );
        }
        assert!(program.light_slots(MAX_LIGHTS).is_none());
        assert_eq!(program.location("q"), Some(program.globals().shininess));
    }

    #[test]
    fn upload_then_read_back_lights() {
        let mut program = ShaderProgram::link();
        let lights = LightSet::demo();
        program.upload_lights(&lights);
        for (i, light) in lights.iter().enumerate() {
            assert_eq!(program.read_light(i).as_ref(), Some(light));
        }
    }

    #[test]
    fn push_enabled_touches_only_that_slot() {
        let mut program = ShaderProgram::link();
        program.upload_lights(&LightSet::demo());

        program.push_light_enabled(2, false);
        assert!(program.read_light(0).unwrap().enabled);
        assert!(program.read_light(1).unwrap().enabled);
        assert!(!program.read_light(2).unwrap().enabled);
        assert_eq!(
            program.read_light(2).unwrap().position,
            Point3::new(4.0, -4.0, 4.0)
        );
    }

    #[test]
    fn type_mismatch_is_ignored() {
        let mut program = ShaderProgram::link();
        let ka = program.globals().ka;
        program.set_float(ka, 0.5);
        program.set_bool(ka, true);
        assert_eq!(program.get(ka), Some(UniformValue::Float(0.5)));
    }

    #[test]
    fn missing_lights_are_disabled() {
        let mut program = ShaderProgram::link();
        let one = LightSet::new(vec![Light::new_point(Point3::origin(), Vector3::repeat(1.0))])
            .unwrap();
        program.upload_lights(&one);
        assert!(program.read_light(0).unwrap().enabled);
        assert!(!program.read_light(1).unwrap().enabled);
    }
}
