//! Floating point tolerance helpers.
//!
//! Geometry code compares against zero a lot. These helpers snap values
//! that are within [`EPSILON`] of zero to exactly zero so that sign tests
//! stay stable.

/// Values closer to zero than this are treated as zero.
pub const EPSILON: f64 = 1e-10;

/// Returns true if `x` is within [`EPSILON`] of zero.
#[inline]
pub fn is_zero(x: f64) -> bool {
    x.abs() < EPSILON
}

/// Returns 0.0 if `x` is within [`EPSILON`] of zero, otherwise `x` unchanged.
#[inline]
pub fn align_zero(x: f64) -> f64 {
    if is_zero(x) {
        0.0
    } else {
        x
    }
}
