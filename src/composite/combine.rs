//! Pixel combiners.
//!
//! A combiner receives the destination pixel, the incoming channel values and a 0..=256 weight,
//! and writes the saturated result in place. Gradient ramps may hand in values outside `0..=255`,
//! bounded by `RAMP_LIMIT`. Kernels are generic over [`Combine`]; [`with_combiner!`] picks the
//! implementation once per call.

use crate::composite::mode::{Blend, BlitMode};
use crate::foundation::core::{Channel, Pixel};
use crate::foundation::math::{ALPHA_ONE, clamp_u8, mul_div255};

/// Per-pixel combination strategy.
pub trait Combine {
    /// Combine `(r, g, b, a)` into `dst` with weight `alpha` (0..=256).
    fn combine(&self, dst: &mut Pixel, r: i32, g: i32, b: i32, a: i32, alpha: i32);
}

/// `dst = lerp(dst, src, alpha / 256)` on all four channels.
#[derive(Clone, Copy, Debug, Default)]
pub struct CopyCombine;

/// Like [`CopyCombine`] with the weight scaled by the source alpha.
#[derive(Clone, Copy, Debug, Default)]
pub struct CopySourceAlpha;

/// `dst = dst + src * alpha / 256` on all four channels, saturating.
///
/// The alpha channel takes part in the sum like any color channel.
#[derive(Clone, Copy, Debug, Default)]
pub struct AddCombine;

/// Like [`AddCombine`] with the weight scaled by the source alpha.
#[derive(Clone, Copy, Debug, Default)]
pub struct AddSourceAlpha;

/// Copy one incoming channel into one destination channel. Ignores the weight.
#[derive(Clone, Copy, Debug)]
pub struct ChannelCopy {
    /// Incoming channel to read.
    pub src: Channel,
    /// Destination channel to overwrite.
    pub dst: Channel,
}

#[inline]
fn lerp(d: u8, s: i32, w: i32) -> u8 {
    clamp_u8((s * w + i32::from(d) * (ALPHA_ONE - w)) >> 8)
}

#[inline]
fn add(d: u8, s: i32, w: i32) -> u8 {
    clamp_u8(i32::from(d) + ((s * w) >> 8))
}

impl Combine for CopyCombine {
    #[inline]
    fn combine(&self, dst: &mut Pixel, r: i32, g: i32, b: i32, a: i32, alpha: i32) {
        dst.r = lerp(dst.r, r, alpha);
        dst.g = lerp(dst.g, g, alpha);
        dst.b = lerp(dst.b, b, alpha);
        dst.a = lerp(dst.a, a, alpha);
    }
}

impl Combine for CopySourceAlpha {
    #[inline]
    fn combine(&self, dst: &mut Pixel, r: i32, g: i32, b: i32, a: i32, alpha: i32) {
        let w = mul_div255(alpha, a);
        if w == 0 {
            return;
        }
        CopyCombine.combine(dst, r, g, b, a, w);
    }
}

impl Combine for AddCombine {
    #[inline]
    fn combine(&self, dst: &mut Pixel, r: i32, g: i32, b: i32, a: i32, alpha: i32) {
        dst.r = add(dst.r, r, alpha);
        dst.g = add(dst.g, g, alpha);
        dst.b = add(dst.b, b, alpha);
        dst.a = add(dst.a, a, alpha);
    }
}

impl Combine for AddSourceAlpha {
    #[inline]
    fn combine(&self, dst: &mut Pixel, r: i32, g: i32, b: i32, a: i32, alpha: i32) {
        let w = mul_div255(alpha, a);
        if w == 0 {
            return;
        }
        AddCombine.combine(dst, r, g, b, a, w);
    }
}

impl Combine for ChannelCopy {
    #[inline]
    fn combine(&self, dst: &mut Pixel, r: i32, g: i32, b: i32, a: i32, _alpha: i32) {
        let v = match self.src {
            Channel::R => r,
            Channel::G => g,
            Channel::B => b,
            Channel::A => a,
        };
        dst.set_channel(self.dst, clamp_u8(v));
    }
}

/// Tagged selection of a combiner, resolved once per operation from a [`BlitMode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combiner {
    /// [`CopyCombine`].
    Copy,
    /// [`CopySourceAlpha`].
    CopySourceAlpha,
    /// [`AddCombine`].
    Add,
    /// [`AddSourceAlpha`].
    AddSourceAlpha,
    /// [`ChannelCopy`].
    ChannelCopy {
        /// Incoming channel to read.
        src: Channel,
        /// Destination channel to overwrite.
        dst: Channel,
    },
}

impl Combiner {
    /// Pick the combiner for a mode. The filter does not participate.
    pub fn select(mode: BlitMode) -> Self {
        match (mode.blend, mode.use_source_alpha) {
            (Blend::Copy, false) => Self::Copy,
            (Blend::Copy, true) => Self::CopySourceAlpha,
            (Blend::Additive, false) => Self::Add,
            (Blend::Additive, true) => Self::AddSourceAlpha,
            (Blend::ChannelCopy { src, dst }, _) => Self::ChannelCopy { src, dst },
        }
    }
}

/// Bind `$c` to the concrete combiner selected by `$mode` and evaluate `$body` with it.
///
/// Each arm monomorphizes `$body`, so the per-pixel loop inside stays free of dispatch.
macro_rules! with_combiner {
    ($mode:expr, $c:ident => $body:expr) => {
        match $crate::composite::combine::Combiner::select($mode) {
            $crate::composite::combine::Combiner::Copy => {
                let $c = &$crate::composite::combine::CopyCombine;
                $body
            }
            $crate::composite::combine::Combiner::CopySourceAlpha => {
                let $c = &$crate::composite::combine::CopySourceAlpha;
                $body
            }
            $crate::composite::combine::Combiner::Add => {
                let $c = &$crate::composite::combine::AddCombine;
                $body
            }
            $crate::composite::combine::Combiner::AddSourceAlpha => {
                let $c = &$crate::composite::combine::AddSourceAlpha;
                $body
            }
            $crate::composite::combine::Combiner::ChannelCopy { src, dst } => {
                let $c = &$crate::composite::combine::ChannelCopy { src, dst };
                $body
            }
        }
    };
}

pub(crate) use with_combiner;

#[cfg(test)]
#[path = "../../tests/unit/composite/combine.rs"]
mod tests;
