//! Scanline kernels.
//!
//! All kernels walk destination rows outer and columns inner, receive geometry that has already
//! been clipped to the destination, and do O(1), allocation-free work per pixel. Each destination
//! row is computed independently of the others.

use crate::composite::combine::Combine;
use crate::composite::mode::Filter;
use crate::foundation::core::{Pixel, Rect};
use crate::foundation::math::{ALPHA_ONE, RAMP_LIMIT, from_fix16};
use crate::render::clip::{AffineGeometry, BlitGeometry, FixedGradient, Region};

/// Read-only source pixels with their addressing.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Source<'a> {
    pub(crate) pixels: &'a [Pixel],
    pub(crate) stride: usize,
    pub(crate) width: usize,
    pub(crate) height: usize,
}

/// Destination pixels with their row stride.
#[derive(Debug)]
pub(crate) struct Target<'a> {
    pub(crate) pixels: &'a mut [Pixel],
    pub(crate) stride: usize,
}

impl Target<'_> {
    #[inline]
    fn row_mut(&mut self, region: Region, row: usize) -> &mut [Pixel] {
        let start = (region.y + row) * self.stride + region.x;
        &mut self.pixels[start..start + region.w]
    }
}

impl Source<'_> {
    #[inline]
    fn at(&self, x: usize, y: usize) -> Pixel {
        self.pixels[y * self.stride + x]
    }
}

#[inline]
fn channels(p: Pixel) -> [i32; 4] {
    [
        i32::from(p.r),
        i32::from(p.g),
        i32::from(p.b),
        i32::from(p.a),
    ]
}

/// 2x2 weighted sample of `p00`, its right neighbor `p10`, the pixel below `p01` and the
/// diagonal `p11`. Weighted sums are truncated.
#[inline]
pub(crate) fn bilinear(
    p00: Pixel,
    p10: Pixel,
    p01: Pixel,
    p11: Pixel,
    xfrac: f64,
    yfrac: f64,
) -> [i32; 4] {
    let f1 = (1.0 - xfrac) * (1.0 - yfrac);
    let f2 = xfrac * (1.0 - yfrac);
    let f3 = (1.0 - xfrac) * yfrac;
    let f4 = xfrac * yfrac;
    let (a, b, c, d) = (channels(p00), channels(p10), channels(p01), channels(p11));
    std::array::from_fn(|i| {
        (f64::from(a[i]) * f1 + f64::from(b[i]) * f2 + f64::from(c[i]) * f3 + f64::from(d[i]) * f4)
            as i32
    })
}

#[inline]
fn sample_bilinear(src: &Source<'_>, x: usize, y: usize, xfrac: f64, yfrac: f64) -> [i32; 4] {
    bilinear(
        src.at(x, y),
        src.at(x + 1, y),
        src.at(x, y + 1),
        src.at(x + 1, y + 1),
        xfrac,
        yfrac,
    )
}

#[inline]
fn emit<C: Combine>(c: &C, out: &mut Pixel, v: [i32; 4], alpha: i32) {
    c.combine(out, v[0], v[1], v[2], v[3], alpha);
}

/// Opaque row copy.
pub(crate) fn copy_rows(dst: &mut Target<'_>, src: &Source<'_>, g: &BlitGeometry) {
    for row in 0..g.dst.h {
        let s = (g.src_y + row) * src.stride + g.src_x;
        dst.row_mut(g.dst, row).copy_from_slice(&src.pixels[s..s + g.dst.w]);
    }
}

/// 1:1 blit through a combiner.
pub(crate) fn blit<C: Combine>(
    c: &C,
    dst: &mut Target<'_>,
    src: &Source<'_>,
    g: &BlitGeometry,
    alpha: i32,
) {
    for row in 0..g.dst.h {
        let s = (g.src_y + row) * src.stride + g.src_x;
        let input = &src.pixels[s..s + g.dst.w];
        for (out, p) in dst.row_mut(g.dst, row).iter_mut().zip(input) {
            emit(c, out, channels(*p), alpha);
        }
    }
}

/// Four independent 16.16 linear ramps. The alpha ramp is on the 0..=256 weight scale and doubles
/// as the combine weight of each pixel.
pub(crate) fn gradient<C: Combine>(
    c: &C,
    dst: &mut Target<'_>,
    region: Region,
    grad: &FixedGradient,
) {
    let mut row_start = grad.start;
    for row in 0..region.h {
        let mut acc = row_start;
        for out in dst.row_mut(region, row).iter_mut() {
            let v = acc.map(|f| from_fix16(f).clamp(-RAMP_LIMIT, RAMP_LIMIT));
            emit(c, out, v, v[3].clamp(0, ALPHA_ONE));
            advance(&mut acc, &grad.dx);
        }
        advance(&mut row_start, &grad.dy);
    }
}

#[inline]
fn advance(acc: &mut [i64; 4], step: &[i64; 4]) {
    for (v, d) in acc.iter_mut().zip(step) {
        *v = v.saturating_add(*d);
    }
}

/// Axis-aligned scale. Uses `dsdx` as the per-column and `dtdy` as the per-row source advance.
///
/// Rows and columns whose truncated source coordinate falls outside the source bitmap (or on its
/// last row/column under bilinear filtering) are left untouched.
pub(crate) fn scale<C: Combine>(
    c: &C,
    dst: &mut Target<'_>,
    src: &Source<'_>,
    g: &AffineGeometry,
    filter: Filter,
    alpha: i32,
) {
    let (sw, sh) = (src.width as i64, src.height as i64);
    let (dx, dy) = (g.steps.dsdx, g.steps.dtdy);
    let mut sy = g.src_y;

    match filter {
        Filter::Nearest => {
            for row in 0..g.dst.h {
                let cury = sy as i64;
                sy += dy;
                if cury < 0 || cury >= sh {
                    continue;
                }
                let mut sx = g.src_x;
                for out in dst.row_mut(g.dst, row).iter_mut() {
                    let offs = sx as i64;
                    sx += dx;
                    if offs >= 0 && offs < sw {
                        emit(c, out, channels(src.at(offs as usize, cury as usize)), alpha);
                    }
                }
            }
        }
        Filter::Bilinear => {
            for row in 0..g.dst.h {
                let cury = sy as i64;
                let yfrac = sy - cury as f64;
                sy += dy;
                if cury < 0 || cury >= sh - 1 {
                    continue;
                }
                let mut sx = g.src_x;
                for out in dst.row_mut(g.dst, row).iter_mut() {
                    let offs = sx as i64;
                    let xfrac = sx - offs as f64;
                    sx += dx;
                    if offs >= 0 && offs < sw - 1 {
                        let v = sample_bilinear(src, offs as usize, cury as usize, xfrac, yfrac);
                        emit(c, out, v, alpha);
                    }
                }
            }
        }
    }
}

/// General affine walk. Both source coordinates step by `(dsdx, dtdx)` per destination column and
/// `(dsdy, dtdy)` per destination row; samples outside `bounds` leave the destination untouched.
///
/// `bounds` must lie within the source bitmap.
pub(crate) fn delta<C: Combine>(
    c: &C,
    dst: &mut Target<'_>,
    src: &Source<'_>,
    g: &AffineGeometry,
    bounds: Rect,
    filter: Filter,
    alpha: i32,
) {
    let st = g.steps;
    let (mut sx, mut sy) = (g.src_x, g.src_y);
    // Bilinear reads one pixel right and one below, so its last valid origin is one step in.
    let inset = match filter {
        Filter::Nearest => 0.0,
        Filter::Bilinear => 1.0,
    };
    let (left, top) = (bounds.x0, bounds.y0);
    let (right, bottom) = (bounds.x1 - inset, bounds.y1 - inset);

    for row in 0..g.dst.h {
        let (mut tx, mut ty) = (sx, sy);
        for out in dst.row_mut(g.dst, row).iter_mut() {
            if ty >= top && ty < bottom && tx >= left && tx < right {
                let (curx, cury) = (tx as usize, ty as usize);
                let v = match filter {
                    Filter::Nearest => channels(src.at(curx, cury)),
                    Filter::Bilinear => {
                        sample_bilinear(src, curx, cury, tx - curx as f64, ty - cury as f64)
                    }
                };
                emit(c, out, v, alpha);
            }
            tx += st.dsdx;
            ty += st.dtdx;
        }
        sx += st.dsdy;
        sy += st.dtdy;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/kernels.rs"]
mod tests;
