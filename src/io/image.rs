use image::{ImageBuffer, ImageError, Rgb};
use log::info;
use std::path::Path;

/// Saves a 0RGB `u32` buffer (as shown in the window) to an image file.
/// The format follows the file extension.
pub fn save_buffer_to_image<P: AsRef<Path>>(
    buffer: &[u32],
    width: usize,
    height: usize,
    path: P,
) -> Result<(), ImageError> {
    let img_buf = ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        let color = buffer
            .get(y as usize * width + x as usize)
            .copied()
            .unwrap_or(0);
        Rgb([(color >> 16) as u8, (color >> 8) as u8, color as u8])
    });

    img_buf.save(path.as_ref())?;
    info!("Saved frame to {}", path.as_ref().display());
    Ok(())
}
