/// Texture acquisition and frame export through the `image` crate
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use canvas3d_core::{PixelBuffer, Rgb};
use log::debug;

/// Exponent of the highlight in the synthesized texture.
const SHININESS: i32 = 24;

/// Decode a PNG, JPEG or BMP file into an RGBA texture.
pub fn load_texture(path: impl AsRef<Path>) -> Result<PixelBuffer> {
    let path = path.as_ref();
    let rgba = image::open(path)
        .with_context(|| format!("failed to decode texture {}", path.display()))?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    debug!("texture {}: {}x{}", path.display(), width, height);

    PixelBuffer::from_rgba(width as usize, height as usize, rgba.into_raw())
        .context("decoded texture has an unexpected size")
}

/// Synthesize a lit-sphere environment texture of `size` x `size` texels.
///
/// Every texel stands for the normal of a unit sphere seen from the front,
/// shaded with a diffuse term in `tint` plus a white highlight. Texels
/// outside the disc keep the ambient color.
pub fn phong_texture(size: usize, tint: Rgb) -> PixelBuffer {
    let mut texture = PixelBuffer::new(size, size);
    let half = size as f32 / 2.0;
    for y in 0..size {
        for x in 0..size {
            let dx = (x as f32 + 0.5 - half) / half;
            let dy = (y as f32 + 0.5 - half) / half;
            let facing = (1.0 - dx * dx - dy * dy).max(0.0).sqrt();

            let diffuse = 0.15 + 0.85 * facing;
            let highlight = facing.powi(SHININESS) * 255.0;
            let channel = |c: u8| (c as f32 * diffuse + highlight).min(255.0) as u8;
            texture.set_pixel(
                x as i32,
                y as i32,
                [channel(tint.r), channel(tint.g), channel(tint.b)],
            );
        }
    }
    texture
}

/// Write a frame to an image file; the format follows the extension.
pub fn save_frame(frame: &PixelBuffer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let image = image::RgbaImage::from_raw(
        frame.width() as u32,
        frame.height() as u32,
        frame.pixels().to_vec(),
    )
    .ok_or_else(|| anyhow!("frame buffer does not match its dimensions"))?;
    image
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    debug!("wrote {}", path.display());
    Ok(())
}
