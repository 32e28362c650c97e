//! blitline is a software pixel compositing engine for 32-bit RGBA bitmaps.
//!
//! It copies, blends, scales, rotates and shades rectangular regions of one bitmap into another
//! on the CPU, with clipping and sub-pixel sampling.
//!
//! # Pipeline overview
//!
//! Every operation follows the same shape:
//!
//! 1. **Validate**: unsized bitmaps, zero alpha and empty rects turn the call into a no-op.
//! 2. **Clip**: caller geometry is reduced to a destination region that lies inside the
//!    destination, with the source sampling origin shifted to match.
//! 3. **Dispatch**: the [`BlitMode`] picks one [`Combine`] strategy for the whole call.
//! 4. **Walk**: a scanline kernel visits each destination pixel once, samples the source
//!    (nearest or bilinear) and hands the sample to the combiner.
//!
//! # Operations
//!
//! [`copy_bitmap`], [`blit`], [`scaled_blit`], [`delta_blit`], [`rotated_blit`],
//! [`gradient_fill_rect`], [`clear`], [`clear_rect`] and [`set_alpha_from_color_key`] work on any
//! [`Bitmap`]: the heap-backed [`MemBitmap`] or a [`FrameBitmap`] view over externally owned,
//! row-padded surface memory. None of them returns an error.
//!
//! The design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Straight alpha**: pixels are non-premultiplied RGBA8.
//! - **No allocation in the hot path**: only [`copy_bitmap`] resizes, through [`Bitmap::resize`].
//!
//! [`Job`] and [`JobRunner`] describe and execute sequences of operations from JSON, which is what
//! the `blitline` binary drives.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod bitmap;
mod composite;
mod foundation;
mod job;
mod render;

pub use bitmap::Bitmap;
pub use bitmap::frame::FrameBitmap;
pub use bitmap::io::{decode_image, load_png, save_png, to_rgba_image};
pub use bitmap::mem::MemBitmap;
pub use composite::combine::{
    AddCombine, AddSourceAlpha, ChannelCopy, Combine, Combiner, CopyCombine, CopySourceAlpha,
};
pub use composite::mode::{
    Blend, BlitMode, Filter, MODE_ADD, MODE_BLEND_MASK, MODE_CHANNEL_COPY, MODE_COPY,
    MODE_FILTER_BILINEAR, MODE_FILTER_MASK, MODE_FILTER_NEAREST, MODE_USE_SOURCE_ALPHA,
};
pub use foundation::core::{Affine, Channel, IRect, Pixel, Point, Rect, Vec2};
pub use foundation::error::{BlitError, BlitResult};
pub use job::color::{Bits, ColorSpec};
pub use job::model::{Canvas, GradientFill, Job, Op};
pub use job::runner::JobRunner;
pub use render::ops::{
    DeltaParams, DeltaSteps, Gradient, Ramp, RotateParams, blit, clear, clear_rect, copy_bitmap,
    delta_blit, gradient_fill_rect, rotated_blit, scaled_blit, set_alpha_from_color_key,
};
