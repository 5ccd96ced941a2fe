//! Q8 fixed-point math for the frame loop.
//!
//! Formats:
//! - Q8 positions and velocities: multiply pixels (or px/frame) by 256
//! - Angles: plain integer degrees, normalized to [0, 360)
//! - Trig results: Q8, so 256 == 1.0
//!
//! Sine uses the Bhaskara I rational approximation evaluated in `i64` with a
//! single division, so no lookup tables live in ROM.

pub const FP_SHIFT: i32 = 8;
pub const FP_ONE: i32 = 1 << FP_SHIFT;

/// Pi in Q8 (3.14159 * 256 ~ 804).
pub const PI_FP: i64 = 804;

#[inline]
pub const fn from_int(v: i32) -> i32 {
    v << FP_SHIFT
}

/// Arithmetic shift, so negative values round toward negative infinity.
#[inline]
pub const fn to_int(v: i32) -> i32 {
    v >> FP_SHIFT
}

/// Wrap any integer angle into [0, 360).
#[inline]
pub fn normalize_deg(deg: i32) -> i32 {
    let d = deg % 360;
    if d < 0 {
        d + 360
    } else {
        d
    }
}

/// Q8 sine of an integer angle in degrees.
///
/// `sin(x) ~ 16x(pi - x) / (5pi^2 - 4x(pi - x))` on [0, 180]; the upper half
/// of the circle mirrors it with a sign flip.
pub fn sin_fp(deg: i32) -> i32 {
    let mut d = normalize_deg(deg);
    let negate = d > 180;
    if negate {
        d = 360 - d;
    }

    let x = (d as i64 * PI_FP) / 180;
    let x_pi_x = x * (PI_FP - x);
    let num = 16 * x_pi_x;
    let den = 5 * PI_FP * PI_FP - 4 * x_pi_x;
    if den == 0 {
        return 0;
    }

    let s = ((num << FP_SHIFT) / den) as i32;
    if negate {
        -s
    } else {
        s
    }
}

#[inline]
pub fn cos_fp(deg: i32) -> i32 {
    sin_fp(normalize_deg(deg) + 90)
}

/// Rotate an integer offset by `deg`, returning integer pixels.
#[inline]
pub fn rotate(x: i32, y: i32, deg: i32) -> (i32, i32) {
    let c = cos_fp(deg);
    let s = sin_fp(deg);
    ((x * c - y * s) >> FP_SHIFT, (x * s + y * c) >> FP_SHIFT)
}

/// Friction: v * 253/256, truncating toward zero.
#[inline]
pub fn apply_friction(v: i32) -> i32 {
    v * 253 / 256
}

/// Per-axis clamp to +/- `max`.
#[inline]
pub fn clamp_axis(v: i32, max: i32) -> i32 {
    v.clamp(-max, max)
}
