/// Fractional bits of the 16.16 fixed-point format used by the gradient kernel.
pub(crate) const FIX16_SHIFT: u32 = 16;

/// Full weight of the 0..=256 integer alpha scale.
pub(crate) const ALPHA_ONE: i32 = 256;

/// Bound on de-fixed gradient channel values handed to combiners, keeping `value * weight` in
/// `i32` range.
pub(crate) const RAMP_LIMIT: i32 = 1 << 16;

/// Convert a global alpha in `[0, 1]` into the 0..=256 integer weight used by combiners.
///
/// NaN and negative values map to 0, values above 1 to 256.
pub(crate) fn alpha_to_256(alpha: f32) -> i32 {
    if alpha.is_nan() {
        return 0;
    }
    ((alpha.clamp(0.0, 1.0) * 256.0) as i32).clamp(0, ALPHA_ONE)
}

/// Saturate an intermediate channel value to `0..=255`.
pub(crate) fn clamp_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Scale an integer weight by a channel value: `w * c / 255`.
pub(crate) fn mul_div255(w: i32, c: i32) -> i32 {
    w * c.clamp(0, 255) / 255
}

/// Convert to 16.16 fixed point, rounding to the nearest 1/65536.
///
/// Unit-range `f32` channel values scaled back by 255 land within half a unit of the integer they
/// came from, so rounding recovers it exactly.
pub(crate) fn to_fix16(v: f64) -> i64 {
    (v * f64::from(1u32 << FIX16_SHIFT)).round() as i64
}

/// Integer part of a 16.16 value (floor).
pub(crate) fn from_fix16(v: i64) -> i32 {
    (v >> FIX16_SHIFT).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
