//! Geometric clipping.
//!
//! Every function here turns caller geometry into parameters the kernels can walk without any
//! per-pixel bounds checks on the destination: the returned [`Region`] always lies inside the
//! destination extent. Source sampling origins are shifted by the same amount the destination was
//! clipped, scaled by the per-axis source steps, so sub-pixel alignment is preserved.

use crate::bitmap::Extent;
use crate::foundation::core::{IRect, Rect, Vec2};
use crate::foundation::math::to_fix16;
use crate::render::ops::{DeltaSteps, Gradient};

/// Destination rectangle a kernel writes, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Region {
    pub(crate) x: usize,
    pub(crate) y: usize,
    pub(crate) w: usize,
    pub(crate) h: usize,
}

/// Clipped parameters of a 1:1 blit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BlitGeometry {
    pub(crate) dst: Region,
    pub(crate) src_x: usize,
    pub(crate) src_y: usize,
}

/// Clipped parameters of a scaled or affine blit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct AffineGeometry {
    pub(crate) dst: Region,
    /// Source coordinate sampled for the region's top-left pixel.
    pub(crate) src_x: f64,
    pub(crate) src_y: f64,
    pub(crate) steps: DeltaSteps,
}

/// Gradient ramps converted to 16.16 fixed point, already shifted to the clipped origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FixedGradient {
    pub(crate) start: [i64; 4],
    pub(crate) dx: [i64; 4],
    pub(crate) dy: [i64; 4],
}

/// Destination placement before clipping; `w`/`h` may be negative (axis flip).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Placement {
    x: i64,
    y: i64,
    w: i64,
    h: i64,
}

impl Placement {
    fn from_rect(r: IRect) -> Self {
        Self {
            x: i64::from(r.left),
            y: i64::from(r.top),
            w: r.width(),
            h: r.height(),
        }
    }
}

/// Source span `x, y, w, h`; `w`/`h` may be negative.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SourceSpan {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl SourceSpan {
    fn from_rect(r: Rect) -> Option<Self> {
        let span = Self {
            x: r.x0,
            y: r.y0,
            w: r.x1 - r.x0,
            h: r.y1 - r.y0,
        };
        [span.x, span.y, span.w, span.h]
            .iter()
            .all(|v| v.is_finite())
            .then_some(span)
    }
}

fn dims(ext: Extent) -> (i64, i64) {
    (ext.width as i64, ext.height as i64)
}

/// Clip a 1:1 blit of `src_rect` (whole source when `None`) placed at `(dst_x, dst_y)`.
pub(crate) fn clip_blit(
    src: Extent,
    dst: Extent,
    dst_x: i32,
    dst_y: i32,
    src_rect: Option<IRect>,
) -> Option<BlitGeometry> {
    let (sw, sh) = dims(src);
    let (dw, dh) = dims(dst);

    let (mut left, mut top, mut right, mut bottom) = match src_rect {
        Some(r) => (
            i64::from(r.left).max(0),
            i64::from(r.top).max(0),
            i64::from(r.right).min(sw),
            i64::from(r.bottom).min(sh),
        ),
        None => (0, 0, sw, sh),
    };
    let mut dx = i64::from(dst_x);
    let mut dy = i64::from(dst_y);

    if dx < 0 {
        left -= dx;
        dx = 0;
    }
    if dy < 0 {
        top -= dy;
        dy = 0;
    }
    if dx + (right - left) > dw {
        right = left + (dw - dx);
    }
    if dy + (bottom - top) > dh {
        bottom = top + (dh - dy);
    }

    if right <= left || bottom <= top {
        return None;
    }

    Some(BlitGeometry {
        dst: Region {
            x: dx as usize,
            y: dy as usize,
            w: (right - left) as usize,
            h: (bottom - top) as usize,
        },
        src_x: left as usize,
        src_y: top as usize,
    })
}

/// Clip a fill rectangle against the destination bounds.
pub(crate) fn clip_fill(dst: Extent, rect: IRect) -> Option<Region> {
    let (dw, dh) = dims(dst);
    let left = i64::from(rect.left).max(0);
    let top = i64::from(rect.top).max(0);
    let right = i64::from(rect.right).min(dw);
    let bottom = i64::from(rect.bottom).min(dh);
    if right <= left || bottom <= top {
        return None;
    }
    Some(Region {
        x: left as usize,
        y: top as usize,
        w: (right - left) as usize,
        h: (bottom - top) as usize,
    })
}

/// Which destination axes were given a negative extent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Flip {
    x: bool,
    y: bool,
}

/// Make the placement's extent positive, remembering which axes were mirrored.
fn normalize_flip(dst: &mut Placement) -> Flip {
    let mut flip = Flip::default();
    if dst.w < 0 {
        dst.w = -dst.w;
        dst.x -= dst.w;
        flip.x = true;
    }
    if dst.h < 0 {
        dst.h = -dst.h;
        dst.y -= dst.h;
        flip.y = true;
    }
    flip
}

/// Walk a mirrored axis from its far end: the origin moves to the last column (or row) of the
/// unflipped mapping and that axis's steps change sign.
fn mirror(
    p: Placement,
    flip: Flip,
    mut src_x: f64,
    mut src_y: f64,
    mut steps: DeltaSteps,
) -> (f64, f64, DeltaSteps) {
    if flip.x {
        let n = (p.w - 1) as f64;
        src_x += n * steps.dsdx;
        src_y += n * steps.dtdx;
        steps.dsdx = -steps.dsdx;
        steps.dtdx = -steps.dtdx;
    }
    if flip.y {
        let n = (p.h - 1) as f64;
        src_x += n * steps.dsdy;
        src_y += n * steps.dtdy;
        steps.dsdy = -steps.dsdy;
        steps.dtdy = -steps.dtdy;
    }
    (src_x, src_y, steps)
}

/// Clip a destination placement whose source coordinate advances by `steps`, moving the sampling
/// origin along with any clipped leading edge.
fn clip_affine(
    dst: Extent,
    mut p: Placement,
    mut src_x: f64,
    mut src_y: f64,
    steps: DeltaSteps,
) -> Option<AffineGeometry> {
    let (dw, dh) = dims(dst);

    if p.x < 0 {
        src_x -= p.x as f64 * steps.dsdx;
        src_y -= p.x as f64 * steps.dtdx;
        p.w += p.x;
        p.x = 0;
    }
    if p.y < 0 {
        src_x -= p.y as f64 * steps.dsdy;
        src_y -= p.y as f64 * steps.dtdy;
        p.h += p.y;
        p.y = 0;
    }
    if p.x + p.w > dw {
        p.w = dw - p.x;
    }
    if p.y + p.h > dh {
        p.h = dh - p.y;
    }

    if p.w < 1 || p.h < 1 || !src_x.is_finite() || !src_y.is_finite() || !steps.is_finite() {
        return None;
    }

    Some(AffineGeometry {
        dst: Region {
            x: p.x as usize,
            y: p.y as usize,
            w: p.w as usize,
            h: p.h as usize,
        },
        src_x,
        src_y,
        steps,
    })
}

/// Clip a scaled blit of `src_rect` into `dst_rect`. Negative destination extents mirror.
pub(crate) fn clip_scaled(dst: Extent, dst_rect: IRect, src_rect: Rect) -> Option<AffineGeometry> {
    let mut p = Placement::from_rect(dst_rect);
    if p.w == 0 || p.h == 0 {
        return None;
    }
    let s = SourceSpan::from_rect(src_rect)?;
    let flip = normalize_flip(&mut p);

    let steps = DeltaSteps {
        dsdx: s.w / p.w as f64,
        dtdx: 0.0,
        dsdy: 0.0,
        dtdy: s.h / p.h as f64,
    };
    let (src_x, src_y, steps) = mirror(p, flip, s.x, s.y, steps);
    clip_affine(dst, p, src_x, src_y, steps)
}

/// Sampling bounds for the affine kernels: the whole source, optionally narrowed to `src_rect`.
fn source_clip(src: Extent, src_rect: Rect, clip_to_source: bool) -> Rect {
    let full = Rect::new(0.0, 0.0, src.width as f64, src.height as f64);
    if clip_to_source {
        full.intersect(src_rect.abs())
    } else {
        full
    }
}

/// Clip a delta (general affine) blit. Returns the geometry and the source sampling bounds.
pub(crate) fn clip_delta(
    dst: Extent,
    src: Extent,
    dst_rect: IRect,
    src_rect: Rect,
    steps: DeltaSteps,
    clip_to_source: bool,
) -> Option<(AffineGeometry, Rect)> {
    let mut p = Placement::from_rect(dst_rect);
    if p.w == 0 || p.h == 0 {
        return None;
    }
    let s = SourceSpan::from_rect(src_rect)?;
    let bounds = source_clip(src, src_rect, clip_to_source);
    let flip = normalize_flip(&mut p);
    let (src_x, src_y, steps) = mirror(p, flip, s.x, s.y, steps);
    let geom = clip_affine(dst, p, src_x, src_y, steps)?;
    Some((geom, bounds))
}

/// Affine steps for a rotation by `angle` radians with per-axis source scale `xsc`, `ysc`.
pub(crate) fn rotation_steps(angle: f64, xsc: f64, ysc: f64) -> DeltaSteps {
    let (sin, cos) = angle.sin_cos();
    DeltaSteps {
        dsdx: xsc * cos,
        dtdx: -ysc * sin,
        dsdy: xsc * sin,
        dtdy: ysc * cos,
    }
}

/// Clip a rotated blit. The rotation pivots about the source rect's center moved by
/// `pivot_offset`; mirroring and clipping then work exactly like a delta blit.
pub(crate) fn clip_rotated(
    dst: Extent,
    src: Extent,
    dst_rect: IRect,
    src_rect: Rect,
    angle: f64,
    pivot_offset: Vec2,
    clip_to_source: bool,
) -> Option<(AffineGeometry, Rect)> {
    let mut p = Placement::from_rect(dst_rect);
    if p.w == 0 || p.h == 0 || !angle.is_finite() {
        return None;
    }
    let s = SourceSpan::from_rect(src_rect)?;
    let bounds = source_clip(src, src_rect, clip_to_source);
    let flip = normalize_flip(&mut p);

    let (w, h) = (p.w as f64, p.h as f64);
    let steps = rotation_steps(angle, s.w / w, s.h / h);

    // Center the rotated span on the (offset) middle of the source rect.
    let src_x = s.x - (0.5 * (w * steps.dsdx + h * steps.dsdy - s.w) - pivot_offset.x);
    let src_y = s.y - (0.5 * (h * steps.dtdy + w * steps.dtdx - s.h) - pivot_offset.y);
    let (src_x, src_y, steps) = mirror(p, flip, src_x, src_y, steps);

    let geom = clip_affine(dst, p, src_x, src_y, steps)?;
    Some((geom, bounds))
}

/// Clip a gradient fill and convert its ramps to 16.16 fixed point.
///
/// Ramps are in unit range (1.0 maps to 255) and are re-based to the clipped origin.
pub(crate) fn clip_gradient(
    dst: Extent,
    rect: IRect,
    gradient: &Gradient,
) -> Option<(Region, FixedGradient)> {
    let ramps = [gradient.r, gradient.g, gradient.b, gradient.a];
    // Color ramps land on 0..=255, alpha on the 0..=256 weight scale.
    const SCALE: [f64; 4] = [255.0, 255.0, 255.0, 256.0];
    let mut start: [f64; 4] = std::array::from_fn(|i| f64::from(ramps[i].start) * SCALE[i]);
    let dx: [f64; 4] = std::array::from_fn(|i| f64::from(ramps[i].dx) * SCALE[i]);
    let dy: [f64; 4] = std::array::from_fn(|i| f64::from(ramps[i].dy) * SCALE[i]);
    if start.iter().chain(&dx).chain(&dy).any(|v| !v.is_finite()) {
        return None;
    }

    let mut p = Placement::from_rect(rect);
    if p.x < 0 {
        for (s, d) in start.iter_mut().zip(&dx) {
            *s -= p.x as f64 * d;
        }
        p.w += p.x;
        p.x = 0;
    }
    if p.y < 0 {
        for (s, d) in start.iter_mut().zip(&dy) {
            *s -= p.y as f64 * d;
        }
        p.h += p.y;
        p.y = 0;
    }
    let (dw, dh) = dims(dst);
    if p.x + p.w > dw {
        p.w = dw - p.x;
    }
    if p.y + p.h > dh {
        p.h = dh - p.y;
    }
    if p.w < 1 || p.h < 1 {
        return None;
    }

    Some((
        Region {
            x: p.x as usize,
            y: p.y as usize,
            w: p.w as usize,
            h: p.h as usize,
        },
        FixedGradient {
            start: start.map(to_fix16),
            dx: dx.map(to_fix16),
            dy: dy.map(to_fix16),
        },
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/clip.rs"]
mod tests;
