use crate::foundation::error::{BlitError, BlitResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Straight (non-premultiplied) RGBA8 pixel.
///
/// The packed `u32` form is `0xAARRGGBB`, which is what masked clears and color keys operate on.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Pixel {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (0 = transparent, 255 = opaque).
    pub a: u8,
}

impl Pixel {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);

    /// Build a pixel from its four channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build an opaque pixel.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Unpack from `0xAARRGGBB`.
    pub const fn from_u32(v: u32) -> Self {
        Self {
            r: (v >> 16) as u8,
            g: (v >> 8) as u8,
            b: v as u8,
            a: (v >> 24) as u8,
        }
    }

    /// Pack into `0xAARRGGBB`.
    pub const fn to_u32(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Read one channel.
    pub fn channel(self, ch: Channel) -> u8 {
        match ch {
            Channel::R => self.r,
            Channel::G => self.g,
            Channel::B => self.b,
            Channel::A => self.a,
        }
    }

    /// Overwrite one channel, leaving the others untouched.
    pub fn set_channel(&mut self, ch: Channel, v: u8) {
        match ch {
            Channel::R => self.r = v,
            Channel::G => self.g = v,
            Channel::B => self.b = v,
            Channel::A => self.a = v,
        }
    }
}

impl From<[u8; 4]> for Pixel {
    fn from(v: [u8; 4]) -> Self {
        Self::rgba(v[0], v[1], v[2], v[3])
    }
}

impl From<Pixel> for [u8; 4] {
    fn from(p: Pixel) -> Self {
        [p.r, p.g, p.b, p.a]
    }
}

/// One of the four 8-bit channels of a [`Pixel`], addressed by a 2-bit index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Red (index 0).
    R,
    /// Green (index 1).
    G,
    /// Blue (index 2).
    B,
    /// Alpha (index 3).
    A,
}

impl Channel {
    /// Channel for a 2-bit index; only the low two bits are considered.
    pub fn from_index(idx: u32) -> Self {
        match idx & 3 {
            0 => Self::R,
            1 => Self::G,
            2 => Self::B,
            _ => Self::A,
        }
    }

    /// 2-bit index of this channel.
    pub fn index(self) -> u32 {
        match self {
            Self::R => 0,
            Self::G => 1,
            Self::B => 2,
            Self::A => 3,
        }
    }
}

/// Integer rectangle with edges `[left, right) x [top, bottom)`.
///
/// Width and height are signed: the scaled blit family reads a negative extent as an axis flip,
/// everything else treats it as empty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IRect {
    /// Left edge (inclusive).
    pub left: i32,
    /// Top edge (inclusive).
    pub top: i32,
    /// Right edge (exclusive).
    pub right: i32,
    /// Bottom edge (exclusive).
    pub bottom: i32,
}

impl IRect {
    /// Build from edges.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Build from an origin and a (possibly negative) extent.
    pub fn from_xywh(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self::new(x, y, x.saturating_add(w), y.saturating_add(h))
    }

    /// Rectangle covering a whole `width x height` bitmap.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(
            0,
            0,
            i32::try_from(width).unwrap_or(i32::MAX),
            i32::try_from(height).unwrap_or(i32::MAX),
        )
    }

    /// Signed width.
    pub fn width(self) -> i64 {
        i64::from(self.right) - i64::from(self.left)
    }

    /// Signed height.
    pub fn height(self) -> i64 {
        i64::from(self.bottom) - i64::from(self.top)
    }

    /// `true` when `right <= left` or `bottom <= top`.
    pub fn is_empty(self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    /// Intersection of two rects, `None` when they do not overlap.
    pub fn intersect(self, other: Self) -> Option<Self> {
        let r = Self::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        );
        (!r.is_empty()).then_some(r)
    }

    /// Parse `[x, y, w, h]`, rejecting extents that overflow `i32`.
    pub fn try_from_xywh(v: [i32; 4]) -> BlitResult<Self> {
        let [x, y, w, h] = v;
        match (x.checked_add(w), y.checked_add(h)) {
            (Some(right), Some(bottom)) => Ok(Self::new(x, y, right, bottom)),
            _ => Err(BlitError::validation(format!(
                "rect [{x}, {y}, {w}, {h}] overflows i32"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
