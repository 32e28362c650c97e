use std::path::Path;

use anyhow::Context;

use crate::bitmap::{Bitmap, extent_of, mem::MemBitmap};
use crate::foundation::core::Pixel;
use crate::foundation::error::{BlitError, BlitResult};

impl MemBitmap {
    /// Copy an `image` RGBA8 buffer into a new bitmap.
    pub fn from_rgba_image(img: &image::RgbaImage) -> BlitResult<Self> {
        let (width, height) = img.dimensions();
        let pixels = img
            .as_raw()
            .chunks_exact(4)
            .map(|px| Pixel::rgba(px[0], px[1], px[2], px[3]))
            .collect();
        Self::from_pixels(width, height, pixels)
    }
}

/// Copy any bitmap into a tightly packed `image` RGBA8 buffer. `None` when unsized.
pub fn to_rgba_image<B: Bitmap + ?Sized>(bm: &B) -> Option<image::RgbaImage> {
    let ext = extent_of(bm)?;
    let pixels = bm.pixels()?;
    let mut raw = Vec::with_capacity(ext.width * ext.height * 4);
    for y in 0..ext.height {
        let row = &pixels[y * ext.stride..y * ext.stride + ext.width];
        for p in row {
            raw.extend_from_slice(&[p.r, p.g, p.b, p.a]);
        }
    }
    image::RgbaImage::from_raw(bm.width(), bm.height(), raw)
}

/// Decode encoded image bytes (any format `image` understands) into a bitmap.
pub fn decode_image(bytes: &[u8]) -> BlitResult<MemBitmap> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    MemBitmap::from_rgba_image(&dyn_img.to_rgba8())
}

/// Load an image file into a bitmap.
pub fn load_png(path: &Path) -> BlitResult<MemBitmap> {
    let bytes = std::fs::read(path)
        .map_err(|e| BlitError::io(format!("read '{}': {e}", path.display())))?;
    decode_image(&bytes)
}

/// Write a bitmap as PNG, creating parent directories as needed.
pub fn save_png<B: Bitmap + ?Sized>(bm: &B, path: &Path) -> BlitResult<()> {
    let img = to_rgba_image(bm)
        .ok_or_else(|| BlitError::validation("cannot save an unsized bitmap"))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| BlitError::io(format!("create dir '{}': {e}", parent.display())))?;
    }
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/bitmap/io.rs"]
mod tests;
