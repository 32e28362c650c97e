//! Public blit and fill operations.
//!
//! Every entry point validates its own inputs and silently does nothing when there is nothing to
//! do: unsized bitmaps, zero or negative global alpha, empty or fully clipped rectangles. None of
//! them allocate, except [`copy_bitmap`] which resizes its destination.

use crate::bitmap::{Bitmap, Extent, extent_of};
use crate::composite::combine::with_combiner;
use crate::composite::mode::{Blend, BlitMode};
use crate::foundation::core::{Affine, IRect, Pixel, Rect, Vec2};
use crate::foundation::math::alpha_to_256;
use crate::render::clip;
use crate::render::kernels::{self, Source, Target};

/// Per-destination-pixel source steps of an affine blit.
///
/// Moving one destination pixel right advances the source coordinate by `(dsdx, dtdx)`; moving one
/// row down advances it by `(dsdy, dtdy)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeltaSteps {
    /// Source x step per destination column.
    pub dsdx: f64,
    /// Source y step per destination column.
    pub dtdx: f64,
    /// Source x step per destination row.
    pub dsdy: f64,
    /// Source y step per destination row.
    pub dtdy: f64,
}

impl DeltaSteps {
    /// Unit steps: one source pixel per destination pixel.
    pub const IDENTITY: Self = Self {
        dsdx: 1.0,
        dtdx: 0.0,
        dsdy: 0.0,
        dtdy: 1.0,
    };

    /// Linear part of a destination-to-source affine map. Translation is ignored.
    pub fn from_affine(map: Affine) -> Self {
        let [a, b, c, d, _, _] = map.as_coeffs();
        Self {
            dsdx: a,
            dtdx: b,
            dsdy: c,
            dtdy: d,
        }
    }

    /// Destination-to-source affine map whose translation puts the destination origin at
    /// `origin`.
    pub fn to_affine(self, origin: Vec2) -> Affine {
        Affine::new([self.dsdx, self.dtdx, self.dsdy, self.dtdy, origin.x, origin.y])
    }

    /// `true` when all four steps are finite.
    pub fn is_finite(self) -> bool {
        [self.dsdx, self.dtdx, self.dsdy, self.dtdy]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Geometry of a [`delta_blit`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeltaParams {
    /// Destination rect; a negative width or height mirrors that axis.
    pub dst_rect: IRect,
    /// Source rect; its origin is sampled for the destination's top-left pixel.
    pub src_rect: Rect,
    /// Source steps per destination pixel.
    pub steps: DeltaSteps,
    /// Never sample outside `src_rect` (in addition to the source bitmap bounds).
    pub clip_to_source: bool,
}

/// Geometry of a [`rotated_blit`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotateParams {
    /// Destination rect; a negative width or height mirrors that axis.
    pub dst_rect: IRect,
    /// Source rect mapped (before rotation) onto `dst_rect`.
    pub src_rect: Rect,
    /// Rotation in radians.
    pub angle: f64,
    /// Offset of the pivot from the center of `src_rect`, in source pixels.
    pub pivot_offset: Vec2,
    /// Never sample outside `src_rect` (in addition to the source bitmap bounds).
    pub clip_to_source: bool,
}

/// One linear channel ramp in unit range (1.0 is 255).
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Ramp {
    /// Value at the rect's top-left pixel.
    pub start: f32,
    /// Change per pixel to the right.
    #[serde(default)]
    pub dx: f32,
    /// Change per pixel downwards.
    #[serde(default)]
    pub dy: f32,
}

impl Ramp {
    /// Constant ramp.
    pub fn flat(v: f32) -> Self {
        Self {
            start: v,
            dx: 0.0,
            dy: 0.0,
        }
    }
}

/// Per-channel linear ramps filled by [`gradient_fill_rect`].
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Gradient {
    /// Red ramp.
    pub r: Ramp,
    /// Green ramp.
    pub g: Ramp,
    /// Blue ramp.
    pub b: Ramp,
    /// Alpha ramp. It also weights every pixel of the fill.
    pub a: Ramp,
}

impl Gradient {
    /// Solid color.
    pub fn solid(color: Pixel) -> Self {
        let unit = |c: u8| Ramp::flat(f32::from(c) / 255.0);
        Self {
            r: unit(color.r),
            g: unit(color.g),
            b: unit(color.b),
            a: unit(color.a),
        }
    }

    /// Ramps hitting `top_left`, `top_right` and `bottom_left` at the corners of a
    /// `width x height` rect. The bottom-right corner follows from linearity.
    pub fn from_corners(
        top_left: Pixel,
        top_right: Pixel,
        bottom_left: Pixel,
        width: u32,
        height: u32,
    ) -> Self {
        let span = |n: u32| if n > 1 { (n - 1) as f32 } else { 1.0 };
        let (sx, sy) = (span(width), span(height));
        let ramp = |tl: u8, tr: u8, bl: u8| {
            let tl = f32::from(tl) / 255.0;
            Ramp {
                start: tl,
                dx: if width > 1 {
                    (f32::from(tr) / 255.0 - tl) / sx
                } else {
                    0.0
                },
                dy: if height > 1 {
                    (f32::from(bl) / 255.0 - tl) / sy
                } else {
                    0.0
                },
            }
        };
        Self {
            r: ramp(top_left.r, top_right.r, bottom_left.r),
            g: ramp(top_left.g, top_right.g, bottom_left.g),
            b: ramp(top_left.b, top_right.b, bottom_left.b),
            a: ramp(top_left.a, top_right.a, bottom_left.a),
        }
    }
}

/// `false` for NaN, zero and negative global alpha.
fn visible(alpha: f32) -> bool {
    alpha > 0.0
}

fn skip(op: &'static str, reason: &'static str) {
    tracing::trace!(op, reason, "no-op");
}

/// Extents of both bitmaps, or `None` when either is unsized.
fn extents<D, S>(dst: &D, src: &S) -> Option<(Extent, Extent)>
where
    D: Bitmap + ?Sized,
    S: Bitmap + ?Sized,
{
    Some((extent_of(dst)?, extent_of(src)?))
}

fn split<'a, D, S>(
    dst: &'a mut D,
    src: &'a S,
    de: Extent,
    se: Extent,
) -> Option<(Target<'a>, Source<'a>)>
where
    D: Bitmap + ?Sized,
    S: Bitmap + ?Sized,
{
    let target = Target {
        pixels: dst.pixels_mut()?,
        stride: de.stride,
    };
    let source = Source {
        pixels: src.pixels()?,
        stride: se.stride,
        width: se.width,
        height: se.height,
    };
    Some((target, source))
}

/// Resize `dst` to `src`'s extent and copy `src` into it opaquely.
///
/// Does nothing when `src` is unsized.
pub fn copy_bitmap<D, S>(dst: &mut D, src: &S)
where
    D: Bitmap + ?Sized,
    S: Bitmap + ?Sized,
{
    if extent_of(src).is_none() {
        skip("copy_bitmap", "unsized source");
        return;
    }
    dst.resize(src.width(), src.height());
    blit(dst, src, 0, 0, None, 1.0, BlitMode::COPY);
}

/// Compose `src_rect` of `src` (the whole source when `None`) at `(dst_x, dst_y)` in `dst`, 1:1.
///
/// With [`Blend::Copy`], no source alpha and `alpha >= 1` rows are copied verbatim.
pub fn blit<D, S>(
    dst: &mut D,
    src: &S,
    dst_x: i32,
    dst_y: i32,
    src_rect: Option<IRect>,
    alpha: f32,
    mode: BlitMode,
) where
    D: Bitmap + ?Sized,
    S: Bitmap + ?Sized,
{
    if !visible(alpha) {
        return skip("blit", "zero alpha");
    }
    let Some((de, se)) = extents(dst, src) else {
        return skip("blit", "unsized bitmap");
    };
    let Some(geom) = clip::clip_blit(se, de, dst_x, dst_y, src_rect) else {
        return skip("blit", "clipped away");
    };
    let Some((mut target, source)) = split(dst, src, de, se) else {
        return;
    };

    if mode.blend == Blend::Copy && !mode.use_source_alpha && alpha >= 1.0 {
        kernels::copy_rows(&mut target, &source, &geom);
        return;
    }
    let ia = alpha_to_256(alpha);
    with_combiner!(mode, c => kernels::blit(c, &mut target, &source, &geom, ia));
}

/// Scale `src_rect` of `src` into `dst_rect` of `dst`.
///
/// A negative destination width or height mirrors that axis. `mode.filter` selects nearest or
/// bilinear sampling.
pub fn scaled_blit<D, S>(
    dst: &mut D,
    src: &S,
    dst_rect: IRect,
    src_rect: Rect,
    alpha: f32,
    mode: BlitMode,
) where
    D: Bitmap + ?Sized,
    S: Bitmap + ?Sized,
{
    if dst_rect.width() == 0 || dst_rect.height() == 0 {
        return skip("scaled_blit", "zero size");
    }
    if !visible(alpha) {
        return skip("scaled_blit", "zero alpha");
    }
    let Some((de, se)) = extents(dst, src) else {
        return skip("scaled_blit", "unsized bitmap");
    };
    let Some(geom) = clip::clip_scaled(de, dst_rect, src_rect) else {
        return skip("scaled_blit", "clipped away");
    };
    let Some((mut target, source)) = split(dst, src, de, se) else {
        return;
    };

    let ia = alpha_to_256(alpha);
    with_combiner!(mode, c => kernels::scale(c, &mut target, &source, &geom, mode.filter, ia));
}

/// General affine blit: the source coordinate advances by `params.steps` per destination pixel,
/// starting at `params.src_rect`'s origin.
pub fn delta_blit<D, S>(dst: &mut D, src: &S, params: &DeltaParams, alpha: f32, mode: BlitMode)
where
    D: Bitmap + ?Sized,
    S: Bitmap + ?Sized,
{
    if params.dst_rect.width() == 0 || params.dst_rect.height() == 0 {
        return skip("delta_blit", "zero size");
    }
    if !visible(alpha) {
        return skip("delta_blit", "zero alpha");
    }
    let Some((de, se)) = extents(dst, src) else {
        return skip("delta_blit", "unsized bitmap");
    };
    let Some((geom, bounds)) = clip::clip_delta(
        de,
        se,
        params.dst_rect,
        params.src_rect,
        params.steps,
        params.clip_to_source,
    ) else {
        return skip("delta_blit", "clipped away");
    };
    affine(dst, src, de, se, &geom, bounds, alpha, mode);
}

/// Rotate `params.src_rect` by `params.angle` about its (offset) center while scaling it onto
/// `params.dst_rect`.
pub fn rotated_blit<D, S>(dst: &mut D, src: &S, params: &RotateParams, alpha: f32, mode: BlitMode)
where
    D: Bitmap + ?Sized,
    S: Bitmap + ?Sized,
{
    if params.dst_rect.width() == 0 || params.dst_rect.height() == 0 {
        return skip("rotated_blit", "zero size");
    }
    if !visible(alpha) {
        return skip("rotated_blit", "zero alpha");
    }
    let Some((de, se)) = extents(dst, src) else {
        return skip("rotated_blit", "unsized bitmap");
    };
    let Some((geom, bounds)) = clip::clip_rotated(
        de,
        se,
        params.dst_rect,
        params.src_rect,
        params.angle,
        params.pivot_offset,
        params.clip_to_source,
    ) else {
        return skip("rotated_blit", "clipped away");
    };
    affine(dst, src, de, se, &geom, bounds, alpha, mode);
}

#[allow(clippy::too_many_arguments)]
fn affine<D, S>(
    dst: &mut D,
    src: &S,
    de: Extent,
    se: Extent,
    geom: &clip::AffineGeometry,
    bounds: Rect,
    alpha: f32,
    mode: BlitMode,
) where
    D: Bitmap + ?Sized,
    S: Bitmap + ?Sized,
{
    let Some((mut target, source)) = split(dst, src, de, se) else {
        return;
    };
    let ia = alpha_to_256(alpha);
    with_combiner!(mode, c => {
        kernels::delta(c, &mut target, &source, geom, bounds, mode.filter, ia)
    });
}

/// Fill `rect` with per-channel linear ramps.
///
/// Only [`Blend::Copy`] and [`Blend::Additive`] apply; channel-copy modes do nothing. The alpha
/// ramp weights each pixel, so a half-transparent ramp blends halfway and a zero ramp leaves the
/// destination alone. `mode.use_source_alpha` has no further effect.
pub fn gradient_fill_rect<D>(dst: &mut D, rect: IRect, gradient: &Gradient, mode: BlitMode)
where
    D: Bitmap + ?Sized,
{
    if matches!(mode.blend, Blend::ChannelCopy { .. }) {
        return skip("gradient_fill_rect", "unsupported blend");
    }
    let Some(de) = extent_of(dst) else {
        return skip("gradient_fill_rect", "unsized bitmap");
    };
    let Some((region, fixed)) = clip::clip_gradient(de, rect, gradient) else {
        return skip("gradient_fill_rect", "clipped away");
    };
    let Some(pixels) = dst.pixels_mut() else {
        return;
    };
    let mut target = Target {
        pixels,
        stride: de.stride,
    };
    with_combiner!(mode.with_source_alpha(false), c => {
        kernels::gradient(c, &mut target, region, &fixed)
    });
}

/// Apply `f` to every pixel of `region`.
fn for_each_in<D, F>(dst: &mut D, de: Extent, region: clip::Region, mut f: F)
where
    D: Bitmap + ?Sized,
    F: FnMut(&mut Pixel),
{
    let Some(pixels) = dst.pixels_mut() else {
        return;
    };
    for row in 0..region.h {
        let start = (region.y + row) * de.stride + region.x;
        pixels[start..start + region.w].iter_mut().for_each(&mut f);
    }
}

fn whole(de: Extent) -> clip::Region {
    clip::Region {
        x: 0,
        y: 0,
        w: de.width,
        h: de.height,
    }
}

/// Fill the whole bitmap with `color`.
pub fn clear<D>(dst: &mut D, color: Pixel)
where
    D: Bitmap + ?Sized,
{
    let Some(de) = extent_of(dst) else {
        return skip("clear", "unsized bitmap");
    };
    for_each_in(dst, de, whole(de), |p| *p = color);
}

/// Set every pixel inside `rect` to `(pixel & mask) | or_bits`, on the packed `0xAARRGGBB` form.
pub fn clear_rect<D>(dst: &mut D, rect: IRect, mask: u32, or_bits: u32)
where
    D: Bitmap + ?Sized,
{
    let Some(de) = extent_of(dst) else {
        return skip("clear_rect", "unsized bitmap");
    };
    let Some(region) = clip::clip_fill(de, rect) else {
        return skip("clear_rect", "clipped away");
    };
    for_each_in(dst, de, region, |p| {
        *p = Pixel::from_u32((p.to_u32() & mask) | or_bits);
    });
}

/// Make pixels whose RGB equals `key`'s RGB fully transparent and every other pixel fully opaque.
///
/// The key's alpha and each pixel's existing alpha are ignored; color channels are preserved.
pub fn set_alpha_from_color_key<D>(dst: &mut D, key: Pixel)
where
    D: Bitmap + ?Sized,
{
    let Some(de) = extent_of(dst) else {
        return skip("set_alpha_from_color_key", "unsized bitmap");
    };
    let key = key.to_u32() & 0x00ff_ffff;
    for_each_in(dst, de, whole(de), |p| {
        p.a = if p.to_u32() & 0x00ff_ffff == key { 0 } else { 255 };
    });
}

#[cfg(test)]
#[path = "../../tests/unit/render/ops.rs"]
mod tests;
