//! Flat-space geometry for Cartesian domains.

use nalgebra::SVector;

use crate::math::domain::wrap_degrees;

/// Euclidean distance between two positions.
#[must_use]
pub fn euclidean<const N: usize>(a: &[f64; N], b: &[f64; N]) -> f64 {
    (SVector::<f64, N>::from(*b) - SVector::<f64, N>::from(*a)).norm()
}

/// Linear blend `a + (b - a) * fraction`, unclamped.
#[must_use]
pub fn lerp<const N: usize>(a: &[f64; N], b: &[f64; N], fraction: f64) -> [f64; N] {
    let va = SVector::<f64, N>::from(*a);
    let vb = SVector::<f64, N>::from(*b);
    (va + (vb - va) * fraction).into()
}

/// Angle of travel from `from` to `to`, measured counter-clockwise from +x,
/// in degrees within `(-180, 180]`.
#[must_use]
pub fn bearing(from: &[f64; 2], to: &[f64; 2]) -> f64 {
    // atan2 yields -180 when the y delta is -0.0.
    wrap_degrees((to[1] - from[1]).atan2(to[0] - from[0]).to_degrees())
}
