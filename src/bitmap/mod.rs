//! Bitmap capability contract and its two storage flavors.
//!
//! Every blit and fill operation consumes bitmaps through [`Bitmap`] only. It never owns,
//! allocates or frees pixel storage, except that [`crate::copy_bitmap`] resizes its destination.

pub(crate) mod frame;
pub(crate) mod io;
pub(crate) mod mem;

use crate::foundation::core::Pixel;

/// Capability contract for a raster image the engine can read from and draw into.
///
/// Pixels are addressed row-major as `pixels[y * row_stride + x]`. `row_stride` may exceed `width`
/// when rows are padded. A bitmap whose buffer is `None` is "unsized" and every operation treats
/// it as a no-op.
pub trait Bitmap {
    /// Logical width in pixels.
    fn width(&self) -> u32;

    /// Logical height in pixels.
    fn height(&self) -> u32;

    /// Distance in pixels between the starts of consecutive rows.
    fn row_stride(&self) -> usize;

    /// Pixel buffer, or `None` when unsized.
    fn pixels(&self) -> Option<&[Pixel]>;

    /// Mutable pixel buffer, or `None` when unsized.
    fn pixels_mut(&mut self) -> Option<&mut [Pixel]>;

    /// Change the logical extent. Returns `true` when the extent changed.
    ///
    /// Pixel contents after a change are unspecified. On allocation failure the bitmap must end up
    /// unsized rather than half-resized.
    fn resize(&mut self, width: u32, height: u32) -> bool;
}

/// Geometry of a bitmap whose buffer is present and large enough for its extent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Extent {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) stride: usize,
}

/// Validate a bitmap's extent against its buffer.
///
/// Returns `None` for unsized bitmaps, zero extents, strides narrower than the width, or buffers
/// too short to hold the last row.
pub(crate) fn extent_of<B: Bitmap + ?Sized>(bm: &B) -> Option<Extent> {
    let width = bm.width() as usize;
    let height = bm.height() as usize;
    let stride = bm.row_stride();
    if width == 0 || height == 0 || stride < width {
        return None;
    }
    let needed = (height - 1).checked_mul(stride)?.checked_add(width)?;
    let len = bm.pixels()?.len();
    (len >= needed).then_some(Extent {
        width,
        height,
        stride,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/bitmap/mod.rs"]
mod tests;
