use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::bitmap::Bitmap;
use crate::bitmap::io::load_png;
use crate::bitmap::mem::MemBitmap;
use crate::foundation::core::{IRect, Pixel, Rect};
use crate::foundation::error::{BlitError, BlitResult};
use crate::job::model::{Job, Op, pivot, span_rect};
use crate::render::ops::{self, DeltaParams, RotateParams};

/// Executes [`Job`]s into a fresh [`MemBitmap`].
///
/// Sources come from bitmaps registered with [`JobRunner::with_source`] first, then from PNG files
/// resolved against the runner's root directory.
#[derive(Debug, Default)]
pub struct JobRunner {
    root: PathBuf,
    registered: BTreeMap<String, MemBitmap>,
}

impl JobRunner {
    /// Runner resolving relative source paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            registered: BTreeMap::new(),
        }
    }

    /// Register an in-memory source. It shadows any `sources` entry of the same name.
    pub fn with_source(mut self, name: impl Into<String>, bitmap: MemBitmap) -> Self {
        self.registered.insert(name.into(), bitmap);
        self
    }

    /// Root directory for relative source paths.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate `job`, load its sources and apply every operation in order.
    #[tracing::instrument(
        skip(self, job),
        fields(width = job.canvas.width, height = job.canvas.height, ops = job.ops.len())
    )]
    pub fn run(&self, job: &Job) -> BlitResult<MemBitmap> {
        job.validate_with(|name| self.registered.contains_key(name))?;

        let loaded = self.load_sources(job)?;

        let background = job.background.map_or(Pixel::TRANSPARENT, |c| c.pixel());
        let mut canvas = MemBitmap::filled(job.canvas.width, job.canvas.height, background)?;

        for (index, op) in job.ops.iter().enumerate() {
            tracing::debug!(index, op = op.name(), "apply");
            let src = op
                .source()
                .map(|name| lookup(&self.registered, &loaded, name))
                .transpose()?;
            apply(&mut canvas, op, src)?;
        }
        Ok(canvas)
    }

    /// Decode every declared source that is referenced by an op and not registered in memory.
    fn load_sources(&self, job: &Job) -> BlitResult<BTreeMap<String, MemBitmap>> {
        let mut out = BTreeMap::new();
        for op in &job.ops {
            let Some(name) = op.source() else { continue };
            if self.registered.contains_key(name) || out.contains_key(name) {
                continue;
            }
            let Some(rel) = job.sources.get(name) else {
                continue;
            };
            let path = self.root.join(rel);
            tracing::debug!(source = name, path = %path.display(), "load source");
            out.insert(name.to_owned(), load_png(&path)?);
        }
        Ok(out)
    }
}

fn lookup<'a>(
    registered: &'a BTreeMap<String, MemBitmap>,
    loaded: &'a BTreeMap<String, MemBitmap>,
    name: &str,
) -> BlitResult<&'a MemBitmap> {
    registered
        .get(name)
        .or_else(|| loaded.get(name))
        .ok_or_else(|| BlitError::validation(format!("unknown source '{name}'")))
}

fn whole(src: &MemBitmap) -> Rect {
    Rect::new(0.0, 0.0, f64::from(src.width()), f64::from(src.height()))
}

fn source_of<'a>(src: Option<&'a MemBitmap>, op: &Op) -> BlitResult<&'a MemBitmap> {
    src.ok_or_else(|| BlitError::validation(format!("{} needs a source", op.name())))
}

fn apply(canvas: &mut MemBitmap, op: &Op, src: Option<&MemBitmap>) -> BlitResult<()> {
    match op {
        Op::Clear { color } => ops::clear(canvas, color.pixel()),
        Op::ClearRect { rect, mask, or } => {
            ops::clear_rect(canvas, IRect::try_from_xywh(*rect)?, mask.0, or.0);
        }
        Op::Gradient { rect, fill, mode } => {
            let r = IRect::try_from_xywh(*rect)?;
            let size = |v: i32| u32::try_from(v).unwrap_or(0);
            let gradient = fill.resolve(size(rect[2]), size(rect[3]));
            ops::gradient_fill_rect(canvas, r, &gradient, *mode);
        }
        Op::Blit {
            x,
            y,
            src_rect,
            alpha,
            mode,
            ..
        } => {
            let src = source_of(src, op)?;
            let src_rect = src_rect.map(IRect::try_from_xywh).transpose()?;
            ops::blit(canvas, src, *x, *y, src_rect, *alpha, *mode);
        }
        Op::ScaledBlit {
            dst_rect,
            src_rect,
            alpha,
            mode,
            ..
        } => {
            let src = source_of(src, op)?;
            let src_rect = src_rect.map_or_else(|| whole(src), span_rect);
            let dst_rect = IRect::try_from_xywh(*dst_rect)?;
            ops::scaled_blit(canvas, src, dst_rect, src_rect, *alpha, *mode);
        }
        Op::DeltaBlit {
            dst_rect,
            src_rect,
            steps,
            clip_to_source,
            alpha,
            mode,
            ..
        } => {
            let src = source_of(src, op)?;
            let params = DeltaParams {
                dst_rect: IRect::try_from_xywh(*dst_rect)?,
                src_rect: src_rect.map_or_else(|| whole(src), span_rect),
                steps: *steps,
                clip_to_source: *clip_to_source,
            };
            ops::delta_blit(canvas, src, &params, *alpha, *mode);
        }
        Op::RotatedBlit {
            dst_rect,
            src_rect,
            degrees,
            pivot_offset,
            clip_to_source,
            alpha,
            mode,
            ..
        } => {
            let src = source_of(src, op)?;
            let params = RotateParams {
                dst_rect: IRect::try_from_xywh(*dst_rect)?,
                src_rect: src_rect.map_or_else(|| whole(src), span_rect),
                angle: degrees.to_radians(),
                pivot_offset: pivot(*pivot_offset),
                clip_to_source: *clip_to_source,
            };
            ops::rotated_blit(canvas, src, &params, *alpha, *mode);
        }
        Op::ColorKey { color } => ops::set_alpha_from_color_key(canvas, color.pixel()),
        Op::Copy { .. } => {
            let src = source_of(src, op)?;
            ops::copy_bitmap(canvas, src);
            if canvas.pixels().is_none() {
                return Err(BlitError::allocation(src.width(), src.height()));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/job/runner.rs"]
mod tests;
