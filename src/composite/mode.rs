use crate::foundation::core::Channel;

/// Mask selecting the blend bits of an encoded mode.
pub const MODE_BLEND_MASK: u32 = 0xff;
/// Encoded [`Blend::Copy`].
pub const MODE_COPY: u32 = 0x00;
/// Encoded [`Blend::Additive`].
pub const MODE_ADD: u32 = 0x01;
/// Base of the channel-copy range; bits 0..=1 carry the source channel, bits 2..=3 the
/// destination channel.
pub const MODE_CHANNEL_COPY: u32 = 0xf0;
/// Mask selecting the filter bits of an encoded mode.
pub const MODE_FILTER_MASK: u32 = 0xff00;
/// Encoded [`Filter::Nearest`].
pub const MODE_FILTER_NEAREST: u32 = 0x0000;
/// Encoded [`Filter::Bilinear`].
pub const MODE_FILTER_BILINEAR: u32 = 0x0100;
/// Encoded "use source alpha" flag.
pub const MODE_USE_SOURCE_ALPHA: u32 = 0x1_0000;

/// How sampled source pixels are combined into the destination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Blend {
    /// Linear interpolation towards the source by the blend weight.
    #[default]
    Copy,
    /// Saturating addition of the weighted source.
    Additive,
    /// Copy one source channel into one destination channel, leaving the rest untouched.
    ChannelCopy {
        /// Channel read from the source.
        src: Channel,
        /// Channel written in the destination.
        dst: Channel,
    },
}

/// Source sampling filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// Nearest sample (coordinate truncation).
    #[default]
    Nearest,
    /// 2x2 weighted neighborhood.
    Bilinear,
}

/// Complete blit mode: blend x source-alpha flag x filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BlitMode {
    /// Pixel combination strategy.
    #[serde(default)]
    pub blend: Blend,
    /// Weight each sample by its own alpha on top of the global alpha.
    #[serde(default)]
    pub use_source_alpha: bool,
    /// Sampling filter for the scaled/affine family.
    #[serde(default)]
    pub filter: Filter,
}

impl BlitMode {
    /// Plain copy, nearest sampling.
    pub const COPY: Self = Self {
        blend: Blend::Copy,
        use_source_alpha: false,
        filter: Filter::Nearest,
    };

    /// Plain additive, nearest sampling.
    pub const ADD: Self = Self {
        blend: Blend::Additive,
        use_source_alpha: false,
        filter: Filter::Nearest,
    };

    /// Mode with the given blend and defaults elsewhere.
    pub fn new(blend: Blend) -> Self {
        Self {
            blend,
            ..Self::COPY
        }
    }

    /// Channel copy from `src` to `dst`.
    pub fn channel_copy(src: Channel, dst: Channel) -> Self {
        Self::new(Blend::ChannelCopy { src, dst })
    }

    /// Set the source-alpha flag.
    pub fn with_source_alpha(mut self, on: bool) -> Self {
        self.use_source_alpha = on;
        self
    }

    /// Set the filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Encode into the bitmask form.
    pub fn to_bits(self) -> u32 {
        let blend = match self.blend {
            Blend::Copy => MODE_COPY,
            Blend::Additive => MODE_ADD,
            Blend::ChannelCopy { src, dst } => MODE_CHANNEL_COPY | src.index() | (dst.index() << 2),
        };
        let filter = match self.filter {
            Filter::Nearest => MODE_FILTER_NEAREST,
            Filter::Bilinear => MODE_FILTER_BILINEAR,
        };
        let alpha = if self.use_source_alpha {
            MODE_USE_SOURCE_ALPHA
        } else {
            0
        };
        blend | filter | alpha
    }

    /// Decode the bitmask form. `None` for unknown blend or filter values.
    pub fn from_bits(bits: u32) -> Option<Self> {
        let blend = match bits & MODE_BLEND_MASK {
            MODE_COPY => Blend::Copy,
            MODE_ADD => Blend::Additive,
            b if b >= MODE_CHANNEL_COPY => Blend::ChannelCopy {
                src: Channel::from_index(b),
                dst: Channel::from_index(b >> 2),
            },
            _ => return None,
        };
        let filter = match bits & MODE_FILTER_MASK {
            MODE_FILTER_NEAREST => Filter::Nearest,
            MODE_FILTER_BILINEAR => Filter::Bilinear,
            _ => return None,
        };
        Some(Self {
            blend,
            use_source_alpha: bits & MODE_USE_SOURCE_ALPHA != 0,
            filter,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/mode.rs"]
mod tests;
