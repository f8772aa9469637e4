use nalgebra::{Matrix4, Point2, Point3, Vector3, Vector4};

/// Builds the right-handed model and projection matrices used by the viewer.
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    pub fn rotation_x(angle_rad: f32) -> Matrix4<f32> {
        let (s, c) = angle_rad.sin_cos();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c,  -s,   0.0,
            0.0, s,   c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn rotation_y(angle_rad: f32) -> Matrix4<f32> {
        let (s, c) = angle_rad.sin_cos();
        Matrix4::new(
            c,   0.0, s,   0.0,
            0.0, 1.0, 0.0, 0.0,
           -s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn rotation_z(angle_rad: f32) -> Matrix4<f32> {
        let (s, c) = angle_rad.sin_cos();
        Matrix4::new(
            c,  -s,   0.0, 0.0,
            s,   c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn translation(offset: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, offset.x,
            0.0, 1.0, 0.0, offset.y,
            0.0, 0.0, 1.0, offset.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn scaling_nonuniform(scale: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            scale.x, 0.0,     0.0,     0.0,
            0.0,     scale.y, 0.0,     0.0,
            0.0,     0.0,     scale.z, 0.0,
            0.0,     0.0,     0.0,     1.0,
        )
    }

    /// Model matrix `T * Rz * Ry * Rx * S`, with rotation given in degrees.
    pub fn model(translation: &Vector3<f32>, rotation_deg: &Vector3<f32>, scale: &Vector3<f32>) -> Matrix4<f32> {
        Self::translation(translation)
            * Self::rotation_z(rotation_deg.z.to_radians())
            * Self::rotation_y(rotation_deg.y.to_radians())
            * Self::rotation_x(rotation_deg.x.to_radians())
            * Self::scaling_nonuniform(scale)
    }

    /// OpenGL-style orthographic projection: the box maps onto NDC [-1, 1]^3,
    /// with `near` landing on z = -1.
    pub fn orthographic(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Matrix4<f32> {
        let rl = 1.0 / (right - left);
        let tb = 1.0 / (top - bottom);
        let nf = 1.0 / (near - far);

        Matrix4::new(
            2.0 * rl, 0.0,      0.0,      -(right + left) * rl,
            0.0,      2.0 * tb, 0.0,      -(top + bottom) * tb,
            0.0,      0.0,      2.0 * nf, (far + near) * nf,
            0.0,      0.0,      0.0,      1.0,
        )
    }
}

/// Clip space to NDC. A zero `w` maps to the origin.
#[inline]
pub fn apply_perspective_division(clip: &Vector4<f32>) -> Point3<f32> {
    let w = clip.w;
    if w.abs() > 1e-6 {
        Point3::new(clip.x / w, clip.y / w, clip.z / w)
    } else {
        Point3::origin()
    }
}

/// Viewport transform. NDC +Y is up, screen +Y is down.
#[inline]
pub fn ndc_to_screen(ndc_x: f32, ndc_y: f32, width: f32, height: f32) -> Point2<f32> {
    Point2::new(
        (ndc_x + 1.0) * 0.5 * width,
        (1.0 - ndc_y) * 0.5 * height,
    )
}
