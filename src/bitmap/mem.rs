use crate::bitmap::Bitmap;
use crate::foundation::core::Pixel;
use crate::foundation::error::{BlitError, BlitResult};

/// Heap-backed bitmap with tightly packed rows (`row_stride == width`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemBitmap {
    width: u32,
    height: u32,
    data: Option<Vec<Pixel>>,
}

impl MemBitmap {
    /// An unsized (0x0, no buffer) bitmap.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Allocate a transparent `width x height` bitmap.
    pub fn new(width: u32, height: u32) -> BlitResult<Self> {
        let mut bm = Self::empty();
        bm.try_resize(width, height)?;
        Ok(bm)
    }

    /// Allocate a bitmap filled with `color`.
    pub fn filled(width: u32, height: u32, color: Pixel) -> BlitResult<Self> {
        let mut bm = Self::new(width, height)?;
        if let Some(data) = bm.data.as_mut() {
            data.fill(color);
        }
        Ok(bm)
    }

    /// Wrap existing row-major pixels. `pixels.len()` must equal `width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Pixel>) -> BlitResult<Self> {
        let len = pixel_count(width, height).ok_or_else(|| BlitError::allocation(width, height))?;
        if pixels.len() != len {
            return Err(BlitError::validation(format!(
                "expected {len} pixels for {width}x{height}, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data: (len > 0).then_some(pixels),
        })
    }

    /// Pixel at `(x, y)`, `None` when out of bounds or unsized.
    pub fn get(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize) * (self.width as usize) + x as usize;
        self.data.as_ref()?.get(idx).copied()
    }

    /// Overwrite the pixel at `(x, y)`; out-of-bounds writes are ignored.
    pub fn put(&mut self, x: u32, y: u32, p: Pixel) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize) * (self.width as usize) + x as usize;
        if let Some(slot) = self.data.as_mut().and_then(|d| d.get_mut(idx)) {
            *slot = p;
        }
    }

    /// Consume into the raw pixel vector (empty when unsized).
    pub fn into_pixels(self) -> Vec<Pixel> {
        self.data.unwrap_or_default()
    }

    /// Resize, reporting allocation failure.
    ///
    /// Growth is attempted in place first. If that fails the old buffer is released and a fresh
    /// one is reserved. If that fails too the bitmap is left unsized (0x0, no buffer).
    pub fn try_resize(&mut self, width: u32, height: u32) -> BlitResult<bool> {
        if width == self.width && height == self.height {
            return Ok(false);
        }

        let Some(len) = pixel_count(width, height) else {
            self.release();
            return Err(BlitError::allocation(width, height));
        };
        if len == 0 {
            self.release();
            self.width = width;
            self.height = height;
            return Ok(true);
        }

        let mut data = self.data.take().unwrap_or_default();
        if data.len() < len && data.try_reserve_exact(len - data.len()).is_err() {
            tracing::debug!(width, height, "in-place growth failed, reallocating");
            drop(data);
            data = Vec::new();
            if data.try_reserve_exact(len).is_err() {
                self.release();
                return Err(BlitError::allocation(width, height));
            }
        }
        data.resize(len, Pixel::TRANSPARENT);

        self.width = width;
        self.height = height;
        self.data = Some(data);
        Ok(true)
    }

    fn release(&mut self) {
        self.width = 0;
        self.height = 0;
        self.data = None;
    }
}

impl Bitmap for MemBitmap {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn row_stride(&self) -> usize {
        self.width as usize
    }

    fn pixels(&self) -> Option<&[Pixel]> {
        self.data.as_deref()
    }

    fn pixels_mut(&mut self) -> Option<&mut [Pixel]> {
        self.data.as_deref_mut()
    }

    fn resize(&mut self, width: u32, height: u32) -> bool {
        match self.try_resize(width, height) {
            Ok(changed) => changed,
            Err(err) => {
                tracing::warn!(%err, "bitmap left unsized");
                true
            }
        }
    }
}

fn pixel_count(width: u32, height: u32) -> Option<usize> {
    let len = (width as usize).checked_mul(height as usize)?;
    len.checked_mul(std::mem::size_of::<Pixel>())
        .filter(|&bytes| bytes <= isize::MAX as usize)
        .map(|_| len)
}

#[cfg(test)]
#[path = "../../tests/unit/bitmap/mem.rs"]
mod tests;
