use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::composite::mode::BlitMode;
use crate::foundation::core::{IRect, Rect, Vec2};
use crate::foundation::error::{BlitError, BlitResult};
use crate::job::color::{Bits, ColorSpec};
use crate::render::ops::{DeltaSteps, Gradient};

/// A compositing job: a canvas, named source images and an ordered list of operations.
///
/// Jobs are plain serde data, usually read from JSON with [`Job::from_path`], and executed by
/// [`crate::JobRunner`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Job {
    /// Output canvas extent.
    pub canvas: Canvas,
    /// Initial canvas color. Transparent when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<ColorSpec>,
    /// Source images keyed by name, as paths relative to the job root.
    #[serde(default)]
    pub sources: BTreeMap<String, String>,
    /// Operations applied to the canvas in order.
    #[serde(default)]
    pub ops: Vec<Op>,
}

/// Canvas extent in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Gradient fill description.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientFill {
    /// Explicit per-channel ramps.
    Ramps(Gradient),
    /// Colors at three corners of the filled rect; the fourth follows.
    Corners {
        /// Top-left color.
        top_left: ColorSpec,
        /// Top-right color.
        top_right: ColorSpec,
        /// Bottom-left color.
        bottom_left: ColorSpec,
    },
}

impl GradientFill {
    /// Resolve to ramps for a rect of the given size.
    pub fn resolve(&self, width: u32, height: u32) -> Gradient {
        match *self {
            Self::Ramps(g) => g,
            Self::Corners {
                top_left,
                top_right,
                bottom_left,
            } => Gradient::from_corners(
                top_left.pixel(),
                top_right.pixel(),
                bottom_left.pixel(),
                width,
                height,
            ),
        }
    }
}

fn full_alpha() -> f32 {
    1.0
}

/// One canvas operation. Rects are `[x, y, w, h]`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    /// Fill the whole canvas.
    Clear {
        /// Fill color.
        color: ColorSpec,
    },
    /// `pixel = (pixel & mask) | or` inside `rect`.
    ClearRect {
        /// Affected rect.
        rect: [i32; 4],
        /// Bits kept from each pixel (`0xAARRGGBB`).
        #[serde(default)]
        mask: Bits,
        /// Bits set afterwards.
        #[serde(default)]
        or: Bits,
    },
    /// Linear gradient fill.
    Gradient {
        /// Filled rect.
        rect: [i32; 4],
        /// Ramps or corner colors.
        fill: GradientFill,
        /// Blend mode.
        #[serde(default)]
        mode: BlitMode,
    },
    /// 1:1 blit of a source at an offset.
    Blit {
        /// Source name.
        source: String,
        /// Destination x.
        #[serde(default)]
        x: i32,
        /// Destination y.
        #[serde(default)]
        y: i32,
        /// Part of the source to copy; the whole source when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        src_rect: Option<[i32; 4]>,
        /// Global alpha.
        #[serde(default = "full_alpha")]
        alpha: f32,
        /// Blend mode.
        #[serde(default)]
        mode: BlitMode,
    },
    /// Scaled blit; a negative `w` or `h` in `dst_rect` mirrors.
    ScaledBlit {
        /// Source name.
        source: String,
        /// Destination rect.
        dst_rect: [i32; 4],
        /// Source rect; the whole source when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        src_rect: Option<[f64; 4]>,
        /// Global alpha.
        #[serde(default = "full_alpha")]
        alpha: f32,
        /// Blend mode and filter.
        #[serde(default)]
        mode: BlitMode,
    },
    /// General affine blit.
    DeltaBlit {
        /// Source name.
        source: String,
        /// Destination rect.
        dst_rect: [i32; 4],
        /// Source rect; its origin is the first sample. The whole source when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        src_rect: Option<[f64; 4]>,
        /// Source steps per destination pixel.
        steps: DeltaSteps,
        /// Sample only inside `src_rect`.
        #[serde(default)]
        clip_to_source: bool,
        /// Global alpha.
        #[serde(default = "full_alpha")]
        alpha: f32,
        /// Blend mode and filter.
        #[serde(default)]
        mode: BlitMode,
    },
    /// Rotated, scaled blit about the source rect's center.
    RotatedBlit {
        /// Source name.
        source: String,
        /// Destination rect.
        dst_rect: [i32; 4],
        /// Source rect; the whole source when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        src_rect: Option<[f64; 4]>,
        /// Rotation in degrees.
        degrees: f64,
        /// Pivot offset from the source rect's center, in source pixels.
        #[serde(default)]
        pivot_offset: [f64; 2],
        /// Sample only inside `src_rect`.
        #[serde(default)]
        clip_to_source: bool,
        /// Global alpha.
        #[serde(default = "full_alpha")]
        alpha: f32,
        /// Blend mode and filter.
        #[serde(default)]
        mode: BlitMode,
    },
    /// Alpha from a color key over the whole canvas.
    ColorKey {
        /// Key color; its alpha is ignored.
        color: ColorSpec,
    },
    /// Replace the canvas (extent included) with a copy of a source.
    Copy {
        /// Source name.
        source: String,
    },
}

impl Op {
    /// Tag used in job files.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Clear { .. } => "clear",
            Self::ClearRect { .. } => "clear_rect",
            Self::Gradient { .. } => "gradient",
            Self::Blit { .. } => "blit",
            Self::ScaledBlit { .. } => "scaled_blit",
            Self::DeltaBlit { .. } => "delta_blit",
            Self::RotatedBlit { .. } => "rotated_blit",
            Self::ColorKey { .. } => "color_key",
            Self::Copy { .. } => "copy",
        }
    }

    /// Name of the source this operation reads, if any.
    pub fn source(&self) -> Option<&str> {
        match self {
            Self::Blit { source, .. }
            | Self::ScaledBlit { source, .. }
            | Self::DeltaBlit { source, .. }
            | Self::RotatedBlit { source, .. }
            | Self::Copy { source } => Some(source),
            Self::Clear { .. }
            | Self::ClearRect { .. }
            | Self::Gradient { .. }
            | Self::ColorKey { .. } => None,
        }
    }
}

/// `[x, y, w, h]` as a float rect.
pub(crate) fn span_rect(v: [f64; 4]) -> Rect {
    let [x, y, w, h] = v;
    Rect::new(x, y, x + w, y + h)
}

pub(crate) fn pivot(v: [f64; 2]) -> Vec2 {
    Vec2::new(v[0], v[1])
}

impl Job {
    /// Parse a job from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> BlitResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| BlitError::validation(format!("parse job JSON: {e}")))
    }

    /// Parse a job from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> BlitResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .map_err(|e| BlitError::io(format!("open job JSON '{}': {e}", path.display())))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Validate structural invariants. Every referenced source must be declared in `sources`.
    pub fn validate(&self) -> BlitResult<()> {
        self.validate_with(|_| false)
    }

    /// Like [`Job::validate`], additionally accepting source names for which `registered`
    /// returns `true` without a `sources` entry.
    pub fn validate_with(&self, registered: impl Fn(&str) -> bool) -> BlitResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(BlitError::validation("canvas width/height must be > 0"));
        }

        for (name, path) in &self.sources {
            if name.trim().is_empty() {
                return Err(BlitError::validation("source name must be non-empty"));
            }
            validate_rel_path(path, &format!("source '{name}' path"))?;
        }

        for (i, op) in self.ops.iter().enumerate() {
            if let Some(source) = op.source()
                && !self.sources.contains_key(source)
                && !registered(source)
            {
                return Err(BlitError::validation(format!(
                    "op #{i} ({}) references unknown source '{source}'",
                    op.name()
                )));
            }
            validate_op(op).map_err(|e| match e {
                BlitError::Validation(msg) => {
                    BlitError::validation(format!("op #{i} ({}): {msg}", op.name()))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

fn validate_op(op: &Op) -> BlitResult<()> {
    match op {
        Op::Clear { .. } | Op::ColorKey { .. } | Op::Copy { .. } => Ok(()),
        Op::ClearRect { rect, .. } => IRect::try_from_xywh(*rect).map(|_| ()),
        Op::Gradient { rect, fill, .. } => {
            IRect::try_from_xywh(*rect)?;
            if let GradientFill::Ramps(g) = fill {
                for (ch, r) in [("r", g.r), ("g", g.g), ("b", g.b), ("a", g.a)] {
                    if ![r.start, r.dx, r.dy].iter().all(|v| v.is_finite()) {
                        return Err(BlitError::validation(format!(
                            "ramp {ch} must be finite"
                        )));
                    }
                }
            }
            Ok(())
        }
        Op::Blit {
            src_rect, alpha, ..
        } => {
            if let Some(r) = src_rect {
                IRect::try_from_xywh(*r)?;
            }
            validate_alpha(*alpha)
        }
        Op::ScaledBlit {
            dst_rect,
            src_rect,
            alpha,
            ..
        } => {
            IRect::try_from_xywh(*dst_rect)?;
            validate_span(*src_rect)?;
            validate_alpha(*alpha)
        }
        Op::DeltaBlit {
            dst_rect,
            src_rect,
            steps,
            alpha,
            ..
        } => {
            IRect::try_from_xywh(*dst_rect)?;
            validate_span(*src_rect)?;
            if !steps.is_finite() {
                return Err(BlitError::validation("steps must be finite"));
            }
            validate_alpha(*alpha)
        }
        Op::RotatedBlit {
            dst_rect,
            src_rect,
            degrees,
            pivot_offset,
            alpha,
            ..
        } => {
            IRect::try_from_xywh(*dst_rect)?;
            validate_span(*src_rect)?;
            if !degrees.is_finite() {
                return Err(BlitError::validation("degrees must be finite"));
            }
            if !pivot_offset.iter().all(|v| v.is_finite()) {
                return Err(BlitError::validation("pivot_offset must be finite"));
            }
            validate_alpha(*alpha)
        }
    }
}

fn validate_alpha(alpha: f32) -> BlitResult<()> {
    if !alpha.is_finite() || alpha < 0.0 {
        return Err(BlitError::validation("alpha must be finite and >= 0"));
    }
    Ok(())
}

fn validate_span(span: Option<[f64; 4]>) -> BlitResult<()> {
    if let Some(v) = span
        && !v.iter().all(|c| c.is_finite())
    {
        return Err(BlitError::validation("src_rect must be finite"));
    }
    Ok(())
}

fn validate_rel_path(path: &str, field: &str) -> BlitResult<()> {
    if path.trim().is_empty() {
        return Err(BlitError::validation(format!("{field} must be non-empty")));
    }
    let normalized = path.replace('\\', "/");
    if normalized.starts_with('/') || Path::new(path).is_absolute() {
        return Err(BlitError::validation(format!("{field} must be a relative path")));
    }
    if normalized.split('/').any(|part| part == "..") {
        return Err(BlitError::validation(format!("{field} must not contain '..'")));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/job/model.rs"]
mod tests;
