use super::*;
use crate::composite::combine::{AddCombine, ChannelCopy, CopyCombine};
use crate::foundation::core::Channel;
use crate::foundation::math::to_fix16;
use crate::render::ops::DeltaSteps;

const A: Pixel = Pixel::rgba(10, 20, 30, 255);
const B: Pixel = Pixel::rgba(200, 100, 50, 255);
const C: Pixel = Pixel::rgba(1, 2, 3, 4);
const D: Pixel = Pixel::rgba(250, 250, 250, 250);
const Z: Pixel = Pixel::TRANSPARENT;

fn source(pixels: &[Pixel], width: usize, height: usize) -> Source<'_> {
    Source {
        pixels,
        stride: width,
        width,
        height,
    }
}

fn geometry(w: usize, h: usize, steps: DeltaSteps) -> AffineGeometry {
    AffineGeometry {
        dst: Region { x: 0, y: 0, w, h },
        src_x: 0.0,
        src_y: 0.0,
        steps,
    }
}

fn scale_steps(dsdx: f64, dtdy: f64) -> DeltaSteps {
    DeltaSteps {
        dsdx,
        dtdx: 0.0,
        dsdy: 0.0,
        dtdy,
    }
}

#[test]
fn bilinear_weights() {
    assert_eq!(bilinear(A, B, C, D, 0.0, 0.0), [10, 20, 30, 255]);
    assert_eq!(bilinear(A, B, C, D, 1.0, 1.0), [250, 250, 250, 250]);

    let black = Pixel::rgba(0, 0, 0, 0);
    let white = Pixel::rgba(255, 255, 255, 255);
    // 127.5 truncates.
    assert_eq!(bilinear(black, white, black, white, 0.5, 0.0), [127; 4]);
    assert_eq!(bilinear(black, black, white, white, 0.0, 0.25), [63; 4]);
}

#[test]
fn copy_rows_respects_strides() {
    let src_px = [A, B, C, D];
    let src = source(&src_px, 2, 2);
    let mut out = vec![Z; 9];
    let mut dst = Target {
        pixels: &mut out,
        stride: 3,
    };
    let g = BlitGeometry {
        dst: Region {
            x: 1,
            y: 1,
            w: 1,
            h: 2,
        },
        src_x: 1,
        src_y: 0,
    };
    copy_rows(&mut dst, &src, &g);
    assert_eq!(out, vec![Z, Z, Z, Z, B, Z, Z, D, Z]);
}

#[test]
fn blit_through_additive_combiner() {
    let src_px = [Pixel::rgba(10, 10, 10, 10)];
    let src = source(&src_px, 1, 1);
    let mut out = vec![Pixel::rgba(250, 0, 0, 0)];
    let mut dst = Target {
        pixels: &mut out,
        stride: 1,
    };
    let g = BlitGeometry {
        dst: Region {
            x: 0,
            y: 0,
            w: 1,
            h: 1,
        },
        src_x: 0,
        src_y: 0,
    };
    blit(&AddCombine, &mut dst, &src, &g, ALPHA_ONE);
    assert_eq!(out[0], Pixel::rgba(255, 10, 10, 10));
}

#[test]
fn gradient_steps_per_pixel() {
    let half = to_fix16(127.5);
    let grad = FixedGradient {
        start: [0, 0, 0, to_fix16(256.0)],
        dx: [half, 0, 0, 0],
        dy: [half, 0, 0, 0],
    };
    let mut out = vec![Z; 4];
    let mut dst = Target {
        pixels: &mut out,
        stride: 2,
    };
    let region = Region {
        x: 0,
        y: 0,
        w: 2,
        h: 2,
    };
    gradient(&CopyCombine, &mut dst, region, &grad);
    assert_eq!(from_fix16(half), 127);
    assert_eq!(out[0], Pixel::rgba(0, 0, 0, 255));
    assert_eq!(out[1], Pixel::rgba(127, 0, 0, 255));
    assert_eq!(out[2], Pixel::rgba(127, 0, 0, 255));
    assert_eq!(out[3], Pixel::rgba(255, 0, 0, 255));
}

#[test]
fn gradient_clamps_runaway_accumulators() {
    let grad = FixedGradient {
        start: [i64::MAX - 1, i64::MIN + 1, 0, i64::MAX - 1],
        dx: [i64::MAX, i64::MIN, 0, 1],
        dy: [i64::MAX, i64::MIN, 0, 1],
    };
    let mut out = vec![Z; 4];
    let mut dst = Target {
        pixels: &mut out,
        stride: 2,
    };
    let region = Region {
        x: 0,
        y: 0,
        w: 2,
        h: 2,
    };
    gradient(&AddCombine, &mut dst, region, &grad);
    assert!(out.iter().all(|p| *p == Pixel::rgba(255, 0, 0, 255)));
}

#[test]
fn scale_nearest_doubles_columns() {
    let src_px = [A, B];
    let src = source(&src_px, 2, 1);
    let mut out = vec![Z; 4];
    let mut dst = Target {
        pixels: &mut out,
        stride: 4,
    };
    let g = geometry(4, 1, scale_steps(0.5, 1.0));
    scale(&CopyCombine, &mut dst, &src, &g, Filter::Nearest, ALPHA_ONE);
    assert_eq!(out, vec![A, A, B, B]);
}

#[test]
fn scale_skips_samples_outside_source() {
    let src_px = [A, B];
    let src = source(&src_px, 2, 1);
    let mut out = vec![Z; 3];
    let mut dst = Target {
        pixels: &mut out,
        stride: 3,
    };
    // Third column lands on source x = 2.
    let g = geometry(3, 1, scale_steps(1.0, 1.0));
    scale(&CopyCombine, &mut dst, &src, &g, Filter::Nearest, ALPHA_ONE);
    assert_eq!(out, vec![A, B, Z]);
}

#[test]
fn scale_bilinear_needs_right_and_lower_neighbor() {
    let src_px = [A, B, C, D];
    let src = source(&src_px, 2, 2);
    let mut out = vec![Z; 4];
    let mut dst = Target {
        pixels: &mut out,
        stride: 2,
    };
    let g = geometry(2, 2, scale_steps(1.0, 1.0));
    scale(&CopyCombine, &mut dst, &src, &g, Filter::Bilinear, ALPHA_ONE);
    assert_eq!(out, vec![A, Z, Z, Z]);
}

#[test]
fn delta_quarter_turn_transposes() {
    // dst(x, y) samples src(y, 1 - x).
    let src_px = [A, B, C, D];
    let src = source(&src_px, 2, 2);
    let mut out = vec![Z; 4];
    let mut dst = Target {
        pixels: &mut out,
        stride: 2,
    };
    let mut g = geometry(
        2,
        2,
        DeltaSteps {
            dsdx: 0.0,
            dtdx: -1.0,
            dsdy: 1.0,
            dtdy: 0.0,
        },
    );
    g.src_y = 1.0;
    let bounds = Rect::new(0.0, 0.0, 2.0, 2.0);
    delta(&CopyCombine, &mut dst, &src, &g, bounds, Filter::Nearest, ALPHA_ONE);
    assert_eq!(out, vec![C, A, D, B]);
}

#[test]
fn delta_honors_bounds() {
    let src_px = [A, B, C, D];
    let src = source(&src_px, 2, 2);
    let mut out = vec![Z; 4];
    let mut dst = Target {
        pixels: &mut out,
        stride: 2,
    };
    let g = geometry(2, 2, DeltaSteps::IDENTITY);
    let bounds = Rect::new(1.0, 0.0, 2.0, 2.0);
    delta(&CopyCombine, &mut dst, &src, &g, bounds, Filter::Nearest, ALPHA_ONE);
    assert_eq!(out, vec![Z, B, Z, D]);
}

#[test]
fn channel_copy_ignores_weight_in_scale() {
    let cc = ChannelCopy {
        src: Channel::R,
        dst: Channel::B,
    };
    let src_px = [B];
    let src = source(&src_px, 1, 1);
    let mut out = vec![Pixel::rgba(0, 0, 0, 9)];
    let mut dst = Target {
        pixels: &mut out,
        stride: 1,
    };
    let g = geometry(1, 1, DeltaSteps::IDENTITY);
    scale(&cc, &mut dst, &src, &g, Filter::Nearest, 0);
    assert_eq!(out[0], Pixel::rgba(0, 0, 200, 9));
}
