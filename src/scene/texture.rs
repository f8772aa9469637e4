use image::{DynamicImage, GenericImageView};
use log::info;
use nalgebra::Vector3;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to load texture '{path}': {source}")]
pub struct TextureError {
    pub path: String,
    #[source]
    pub source: image::ImageError,
}

/// Represents a decoded 2D texture map.
///
/// Sampling follows the usual GPU upload convention: row 0 of the decoded
/// image is at `v = 0`.
#[derive(Debug, Clone)]
pub struct Texture {
    pub image: Arc<DynamicImage>,
    pub width: u32,
    pub height: u32,
    /// Channel count reported by the decoder.
    pub channels: u8,
}

impl Texture {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let path_ref = path.as_ref();
        let img = image::open(path_ref).map_err(|source| TextureError {
            path: path_ref.display().to_string(),
            source,
        })?;
        let texture = Self::from_image(img);

        info!(
            "Loaded texture: {:?} ({}x{}, {} channels)",
            path_ref, texture.width, texture.height, texture.channels
        );
        Ok(texture)
    }

    /// Wraps decoded pixels. Three-channel images stay RGB, anything else becomes RGBA.
    pub fn from_image(img: DynamicImage) -> Self {
        let channels = img.color().channel_count();
        let image = if channels == 3 {
            DynamicImage::ImageRgb8(img.to_rgb8())
        } else {
            DynamicImage::ImageRgba8(img.to_rgba8())
        };

        Self {
            width: image.width(),
            height: image.height(),
            channels,
            image: Arc::new(image),
        }
    }

    /// Samples the texture using Bilinear Interpolation with repeat wrapping.
    pub fn sample(&self, u: f32, v: f32) -> Vector3<f32> {
        if self.width == 0 || self.height == 0 {
            return Vector3::zeros();
        }

        // Map to pixel coordinates; -0.5 because pixel centers are at 0.5
        let x = u.rem_euclid(1.0) * self.width as f32 - 0.5;
        let y = v.rem_euclid(1.0) * self.height as f32 - 0.5;

        let x0 = x.floor() as i32;
        let y0 = y.floor() as i32;
        let wx = x - x.floor();
        let wy = y - y.floor();

        let c00 = self.get_pixel_wrapped(x0, y0);
        let c10 = self.get_pixel_wrapped(x0 + 1, y0);
        let c01 = self.get_pixel_wrapped(x0, y0 + 1);
        let c11 = self.get_pixel_wrapped(x0 + 1, y0 + 1);

        let top = c00 * (1.0 - wx) + c10 * wx;
        let bottom = c01 * (1.0 - wx) + c11 * wx;
        top * (1.0 - wy) + bottom * wy
    }

    fn get_pixel_wrapped(&self, x: i32, y: i32) -> Vector3<f32> {
        let x_wrapped = x.rem_euclid(self.width as i32);
        let y_wrapped = y.rem_euclid(self.height as i32);

        let pixel = self.image.get_pixel(x_wrapped as u32, y_wrapped as u32);

        Vector3::new(
            pixel[0] as f32 / 255.0,
            pixel[1] as f32 / 255.0,
            pixel[2] as f32 / 255.0,
        )
    }
}

/// Samples an optional texture. A texture that failed to load reads as black.
pub fn sample_or_black(texture: Option<&Texture>, u: f32, v: f32) -> Vector3<f32> {
    texture.map_or_else(Vector3::zeros, |t| t.sample(u, v))
}
