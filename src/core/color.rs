use nalgebra::Vector3;

/// Clamps a linear color to [0, 1] and packs it as `0x00RRGGBB`.
///
/// Shading results are unbounded; this is the only place they are clamped.
#[inline]
pub fn pack_rgb(color: Vector3<f32>) -> u32 {
    let [r, g, b] = to_rgb8(color);
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Clamps a linear color to [0, 1] and quantizes each channel to a byte.
#[inline]
pub fn to_rgb8(color: Vector3<f32>) -> [u8; 3] {
    let q = |c: f32| {
        if c.is_nan() {
            0
        } else {
            (c.clamp(0.0, 1.0) * 255.0).round() as u8
        }
    };
    [q(color.x), q(color.y), q(color.z)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_channels_in_rgb_order() {
        assert_eq!(pack_rgb(Vector3::new(1.0, 0.0, 0.0)), 0x00FF_0000);
        assert_eq!(pack_rgb(Vector3::new(0.0, 1.0, 0.0)), 0x0000_FF00);
        assert_eq!(pack_rgb(Vector3::new(0.0, 0.0, 1.0)), 0x0000_00FF);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        assert_eq!(to_rgb8(Vector3::new(2.5, -1.0, f32::NAN)), [255, 0, 0]);
        assert_eq!(to_rgb8(Vector3::new(0.5, 0.5, 0.5)), [128, 128, 128]);
    }
}
