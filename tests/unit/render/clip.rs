use super::*;
use crate::render::ops::Ramp;

fn ext(width: usize, height: usize) -> Extent {
    Extent {
        width,
        height,
        stride: width,
    }
}

fn region(x: usize, y: usize, w: usize, h: usize) -> Region {
    Region { x, y, w, h }
}

#[test]
fn blit_negative_origin_shifts_source() {
    let g = clip_blit(ext(4, 4), ext(4, 4), -2, -1, None).unwrap();
    assert_eq!(g.dst, region(0, 0, 2, 3));
    assert_eq!((g.src_x, g.src_y), (2, 1));
}

#[test]
fn blit_overhang_shrinks_extent() {
    let g = clip_blit(ext(4, 4), ext(3, 3), 1, 2, None).unwrap();
    assert_eq!(g.dst, region(1, 2, 2, 1));
    assert_eq!((g.src_x, g.src_y), (0, 0));
}

#[test]
fn blit_fully_outside_is_none() {
    assert!(clip_blit(ext(4, 4), ext(4, 4), 10, 0, None).is_none());
    assert!(clip_blit(ext(4, 4), ext(4, 4), 0, -4, None).is_none());
    assert!(clip_blit(ext(4, 4), ext(4, 4), i32::MIN, i32::MAX, None).is_none());
}

#[test]
fn blit_source_rect_is_clamped_to_source() {
    let g = clip_blit(ext(4, 4), ext(8, 8), 3, 3, Some(IRect::new(-5, -5, 2, 2))).unwrap();
    assert_eq!(g.dst, region(3, 3, 2, 2));
    assert_eq!((g.src_x, g.src_y), (0, 0));

    assert!(clip_blit(ext(4, 4), ext(8, 8), 0, 0, Some(IRect::new(2, 2, 2, 3))).is_none());
}

#[test]
fn fill_clips_to_destination() {
    assert_eq!(
        clip_fill(ext(4, 4), IRect::new(-1, -1, 2, 10)),
        Some(region(0, 0, 2, 4))
    );
    assert_eq!(clip_fill(ext(4, 4), IRect::new(3, 3, 1, 1)), None);
}

#[test]
fn scaled_steps_are_ratio_of_extents() {
    let g = clip_scaled(ext(8, 8), IRect::new(0, 0, 8, 4), Rect::new(0.0, 0.0, 4.0, 8.0)).unwrap();
    assert_eq!(g.dst, region(0, 0, 8, 4));
    assert_eq!(g.steps.dsdx, 0.5);
    assert_eq!(g.steps.dtdy, 2.0);
    assert_eq!((g.src_x, g.src_y), (0.0, 0.0));
}

#[test]
fn scaled_negative_width_starts_at_far_column() {
    let g = clip_scaled(
        ext(4, 1),
        IRect::from_xywh(4, 0, -4, 1),
        Rect::new(0.0, 0.0, 4.0, 1.0),
    )
    .unwrap();
    assert_eq!(g.dst, region(0, 0, 4, 1));
    assert_eq!(g.src_x, 3.0);
    assert_eq!(g.steps.dsdx, -1.0);
}

#[test]
fn scaled_left_clip_advances_source_by_step() {
    let g = clip_scaled(ext(4, 4), IRect::new(-2, 0, 2, 4), Rect::new(0.0, 0.0, 8.0, 4.0)).unwrap();
    assert_eq!(g.dst, region(0, 0, 2, 4));
    // Two clipped destination columns at two source pixels each.
    assert_eq!(g.src_x, 4.0);
}

#[test]
fn scaled_rejects_non_finite_source() {
    let r = Rect::new(0.0, 0.0, f64::NAN, 1.0);
    assert!(clip_scaled(ext(4, 4), IRect::new(0, 0, 4, 4), r).is_none());
}

#[test]
fn delta_rejects_non_finite_steps() {
    let steps = DeltaSteps {
        dsdx: f64::INFINITY,
        ..DeltaSteps::IDENTITY
    };
    let r = Rect::new(0.0, 0.0, 4.0, 4.0);
    assert!(clip_delta(ext(4, 4), ext(4, 4), IRect::new(0, 0, 4, 4), r, steps, false).is_none());
}

#[test]
fn delta_bounds_follow_clip_to_source() {
    let src_rect = Rect::new(3.0, 3.0, 1.0, 1.0);
    let dst_rect = IRect::new(0, 0, 2, 2);
    let steps = DeltaSteps::IDENTITY;

    let (_, loose) = clip_delta(ext(4, 4), ext(8, 8), dst_rect, src_rect, steps, false).unwrap();
    assert_eq!(loose, Rect::new(0.0, 0.0, 8.0, 8.0));

    // A reversed source rect is normalized before intersecting.
    let (_, tight) = clip_delta(ext(4, 4), ext(8, 8), dst_rect, src_rect, steps, true).unwrap();
    assert_eq!(tight, Rect::new(1.0, 1.0, 3.0, 3.0));
}

#[test]
fn rotation_steps_at_quarter_turn() {
    let st = rotation_steps(std::f64::consts::FRAC_PI_2, 1.0, 1.0);
    assert!(st.dsdx.abs() < 1e-12);
    assert!((st.dtdx + 1.0).abs() < 1e-12);
    assert!((st.dsdy - 1.0).abs() < 1e-12);
    assert!(st.dtdy.abs() < 1e-12);
}

#[test]
fn rotation_at_zero_matches_scaled_origin() {
    let src_rect = Rect::new(0.0, 0.0, 4.0, 4.0);
    let dst_rect = IRect::new(0, 0, 8, 8);
    let (rot, _) = clip_rotated(
        ext(8, 8),
        ext(4, 4),
        dst_rect,
        src_rect,
        0.0,
        Vec2::ZERO,
        false,
    )
    .unwrap();
    let scaled = clip_scaled(ext(8, 8), dst_rect, src_rect).unwrap();
    assert_eq!(rot.dst, scaled.dst);
    assert_eq!((rot.src_x, rot.src_y), (scaled.src_x, scaled.src_y));
    assert_eq!(rot.steps, scaled.steps);
}

#[test]
fn rotation_pivot_offset_shifts_origin() {
    let src_rect = Rect::new(0.0, 0.0, 4.0, 4.0);
    let dst_rect = IRect::new(0, 0, 4, 4);
    let (g, _) = clip_rotated(
        ext(4, 4),
        ext(4, 4),
        dst_rect,
        src_rect,
        0.0,
        Vec2::new(1.0, -2.0),
        false,
    )
    .unwrap();
    assert_eq!((g.src_x, g.src_y), (1.0, -2.0));
}

#[test]
fn rotation_rejects_non_finite_angle() {
    let r = Rect::new(0.0, 0.0, 4.0, 4.0);
    let d = IRect::new(0, 0, 4, 4);
    assert!(clip_rotated(ext(4, 4), ext(4, 4), d, r, f64::NAN, Vec2::ZERO, false).is_none());
}

#[test]
fn gradient_rebases_clipped_origin() {
    let grad = Gradient {
        r: Ramp {
            start: 0.0,
            dx: 0.25,
            dy: 0.0,
        },
        ..Gradient::default()
    };
    let (reg, fixed) = clip_gradient(ext(4, 4), IRect::new(-2, 0, 2, 1), &grad).unwrap();
    assert_eq!(reg, region(0, 0, 2, 1));
    // Two columns clipped at 0.25 * 255 each.
    assert_eq!(fixed.start[0], to_fix16(127.5));
    assert_eq!(fixed.dx[0], to_fix16(63.75));
    assert_eq!(fixed.start[3], 0);
}

#[test]
fn gradient_alpha_lands_on_weight_scale() {
    let grad = Gradient {
        r: Ramp::flat(1.0),
        a: Ramp {
            start: 1.0,
            dx: -0.5,
            dy: 0.0,
        },
        ..Gradient::default()
    };
    let (_, fixed) = clip_gradient(ext(4, 4), IRect::new(0, 0, 2, 1), &grad).unwrap();
    assert_eq!(fixed.start[0], to_fix16(255.0));
    assert_eq!(fixed.start[3], to_fix16(256.0));
    assert_eq!(fixed.dx[3], to_fix16(-128.0));
}

#[test]
fn gradient_rejects_non_finite_ramps() {
    let grad = Gradient {
        a: Ramp::flat(f32::NAN),
        ..Gradient::default()
    };
    assert!(clip_gradient(ext(4, 4), IRect::new(0, 0, 4, 4), &grad).is_none());
}
