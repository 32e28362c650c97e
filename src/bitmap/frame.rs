use crate::bitmap::Bitmap;
use crate::foundation::core::Pixel;
use crate::foundation::error::{BlitError, BlitResult};

/// Bitmap view over an externally owned surface, such as a mapped framebuffer or a platform
/// drawing surface's pixel memory.
///
/// The surface keeps its own row stride (rows may be padded) and its lifetime is managed by the
/// caller. Resizing only reconfigures the view: it succeeds while the new extent fits the mapped
/// memory at the fixed stride and leaves the view unsized otherwise.
#[derive(Debug)]
pub struct FrameBitmap<'a> {
    mem: &'a mut [Pixel],
    stride: usize,
    width: u32,
    height: u32,
    mapped: bool,
}

impl<'a> FrameBitmap<'a> {
    /// Map `mem` as a `width x height` surface with `stride` pixels per row.
    pub fn new(mem: &'a mut [Pixel], width: u32, height: u32, stride: usize) -> BlitResult<Self> {
        if !fits(mem.len(), width, height, stride) {
            return Err(BlitError::validation(format!(
                "surface of {} pixels cannot hold {width}x{height} at stride {stride}",
                mem.len()
            )));
        }
        Ok(Self {
            mem,
            stride,
            width,
            height,
            mapped: true,
        })
    }

    /// Stride rounded up so each row starts on an `align`-pixel boundary.
    pub fn aligned_stride(width: u32, align: usize) -> usize {
        let align = align.max(1);
        (width as usize).div_ceil(align) * align
    }

    /// `true` while the view addresses valid surface memory.
    pub fn is_mapped(&self) -> bool {
        self.mapped
    }
}

impl Bitmap for FrameBitmap<'_> {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn row_stride(&self) -> usize {
        self.stride
    }

    fn pixels(&self) -> Option<&[Pixel]> {
        self.mapped.then_some(&*self.mem)
    }

    fn pixels_mut(&mut self) -> Option<&mut [Pixel]> {
        if self.mapped {
            Some(&mut *self.mem)
        } else {
            None
        }
    }

    fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == self.width && height == self.height && self.mapped {
            return false;
        }
        self.mapped = fits(self.mem.len(), width, height, self.stride);
        if self.mapped {
            self.width = width;
            self.height = height;
        } else {
            tracing::warn!(
                width,
                height,
                stride = self.stride,
                "surface too small for requested extent, view left unsized"
            );
            self.width = 0;
            self.height = 0;
        }
        true
    }
}

fn fits(len: usize, width: u32, height: u32, stride: usize) -> bool {
    if width as usize > stride {
        return false;
    }
    if width == 0 || height == 0 {
        return true;
    }
    (height as usize - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width as usize))
        .is_some_and(|needed| needed <= len)
}

#[cfg(test)]
#[path = "../../tests/unit/bitmap/frame.rs"]
mod tests;
