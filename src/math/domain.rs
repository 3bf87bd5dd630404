//! Domain tags and the traits that dispatch geometry per domain.
//!
//! Each domain is a zero-sized tag selecting coordinate layout and distance
//! semantics at compile time:
//!
//! | Tag | Coordinates | Distance | Heading |
//! |-----|-------------|----------|---------|
//! | [`Terrestrial`] | `[longitude, latitude]` degrees | great-circle km | yes |
//! | [`Cartesian2D`] | `[x, y]` | Euclidean | yes |
//! | [`Cartesian3D`] | `[x, y, z]` | Euclidean | no |
//!
//! Bearing and turn angle live on the separate [`Heading`] trait, which
//! [`Cartesian3D`] does not implement. Asking for a 3D turn angle is a
//! compile error:
//!
//! ```compile_fail
//! use chrono::DateTime;
//! use trajectory_kit::math::signed_turn_angle;
//! use trajectory_kit::Cartesian3DPoint;
//!
//! let t = DateTime::from_timestamp(0, 0).unwrap();
//! let a = Cartesian3DPoint::new("a", t, [0.0, 0.0, 0.0]);
//! let b = Cartesian3DPoint::new("a", t, [1.0, 0.0, 0.0]);
//! let c = Cartesian3DPoint::new("a", t, [1.0, 1.0, 0.0]);
//! let _ = signed_turn_angle(&a, &b, &c);
//! ```
//!
//! The same call over [`Cartesian2D`] points compiles:
//!
//! ```
//! use chrono::DateTime;
//! use trajectory_kit::math::signed_turn_angle;
//! use trajectory_kit::Cartesian2DPoint;
//!
//! let t = DateTime::from_timestamp(0, 0).unwrap();
//! let a = Cartesian2DPoint::new("a", t, [0.0, 0.0]);
//! let b = Cartesian2DPoint::new("a", t, [1.0, 0.0]);
//! let c = Cartesian2DPoint::new("a", t, [1.0, 1.0]);
//! assert!((signed_turn_angle(&a, &b, &c) - 90.0).abs() < 1e-9);
//! ```

use std::fmt::Debug;

use crate::math::{geodesic, planar};

/// Geometry shared by every domain.
pub trait Domain: Copy + Debug + Default + PartialEq + Send + Sync + 'static {
    /// Fixed-size coordinate storage for a point in this domain.
    type Coords: Copy + Debug + Default + PartialEq + Send + Sync + AsRef<[f64]>;

    /// Human-readable domain name.
    const NAME: &'static str;

    /// Number of coordinates per point.
    const DIMENSION: usize;

    /// Distance between two positions in domain units.
    fn distance(a: &Self::Coords, b: &Self::Coords) -> f64;

    /// Blend two positions with an unconstrained fraction.
    ///
    /// `fraction = 0` yields `a`, `fraction = 1` yields `b`; values outside
    /// `[0, 1]` continue along the same path beyond either end.
    fn extrapolate(a: &Self::Coords, b: &Self::Coords, fraction: f64) -> Self::Coords;

    /// Blend two positions with the fraction clamped to `[0, 1]`.
    fn interpolate(a: &Self::Coords, b: &Self::Coords, fraction: f64) -> Self::Coords {
        Self::extrapolate(a, b, fraction.clamp(0.0, 1.0))
    }
}

/// Direction-of-travel geometry, only available for 2D domains.
pub trait Heading: Domain {
    /// Direction of travel from `from` to `to`, in degrees.
    fn bearing(from: &Self::Coords, to: &Self::Coords) -> f64;

    /// Change of heading at `b` when travelling `a -> b -> c`, in degrees
    /// within `(-180, 180]`.
    ///
    /// Positive values turn towards increasing bearing: clockwise for
    /// [`Terrestrial`] (compass bearings), counter-clockwise for [`Cartesian2D`].
    fn signed_turn_angle(a: &Self::Coords, b: &Self::Coords, c: &Self::Coords) -> f64 {
        wrap_degrees(Self::bearing(b, c) - Self::bearing(a, b))
    }
}

/// Longitude/latitude on a spherical earth. Distances are kilometers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Terrestrial;

/// Flat 2D space. Distances are in the caller's units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Cartesian2D;

/// Flat 3D space. Distances are in the caller's units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Cartesian3D;

impl Domain for Terrestrial {
    type Coords = [f64; 2];
    const NAME: &'static str = "terrestrial";
    const DIMENSION: usize = 2;

    fn distance(a: &[f64; 2], b: &[f64; 2]) -> f64 {
        geodesic::great_circle_distance_km(a, b)
    }

    fn extrapolate(a: &[f64; 2], b: &[f64; 2], fraction: f64) -> [f64; 2] {
        geodesic::slerp(a, b, fraction)
    }
}

impl Heading for Terrestrial {
    fn bearing(from: &[f64; 2], to: &[f64; 2]) -> f64 {
        geodesic::initial_bearing(from, to)
    }
}

impl Domain for Cartesian2D {
    type Coords = [f64; 2];
    const NAME: &'static str = "cartesian2d";
    const DIMENSION: usize = 2;

    fn distance(a: &[f64; 2], b: &[f64; 2]) -> f64 {
        planar::euclidean(a, b)
    }

    fn extrapolate(a: &[f64; 2], b: &[f64; 2], fraction: f64) -> [f64; 2] {
        planar::lerp(a, b, fraction)
    }
}

impl Heading for Cartesian2D {
    fn bearing(from: &[f64; 2], to: &[f64; 2]) -> f64 {
        planar::bearing(from, to)
    }
}

impl Domain for Cartesian3D {
    type Coords = [f64; 3];
    const NAME: &'static str = "cartesian3d";
    const DIMENSION: usize = 3;

    fn distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
        planar::euclidean(a, b)
    }

    fn extrapolate(a: &[f64; 3], b: &[f64; 3], fraction: f64) -> [f64; 3] {
        planar::lerp(a, b, fraction)
    }
}

/// Wrap an angle in degrees into `(-180, 180]`.
#[must_use]
pub fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = angle % 360.0;
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wrap_degrees() {
        assert_relative_eq!(wrap_degrees(190.0), -170.0);
        assert_relative_eq!(wrap_degrees(-190.0), 170.0);
        assert_relative_eq!(wrap_degrees(180.0), 180.0);
        assert_relative_eq!(wrap_degrees(-180.0), 180.0);
        assert_relative_eq!(wrap_degrees(720.0 + 45.0), 45.0);
    }

    #[test]
    fn test_interpolate_clamps() {
        let a = [0.0, 0.0];
        let b = [10.0, 0.0];
        assert_eq!(Cartesian2D::interpolate(&a, &b, 1.5), b);
        assert_eq!(Cartesian2D::interpolate(&a, &b, -0.5), a);
        assert_eq!(Cartesian2D::extrapolate(&a, &b, 1.5), [15.0, 0.0]);
    }

    #[test]
    fn test_planar_turn_angle_counter_clockwise() {
        let turn = Cartesian2D::signed_turn_angle(&[0.0, 0.0], &[1.0, 0.0], &[1.0, 1.0]);
        assert_relative_eq!(turn, 90.0, epsilon = 1e-10);

        let turn = Cartesian2D::signed_turn_angle(&[0.0, 0.0], &[1.0, 0.0], &[1.0, -1.0]);
        assert_relative_eq!(turn, -90.0, epsilon = 1e-10);

        let straight = Cartesian2D::signed_turn_angle(&[0.0, 0.0], &[1.0, 0.0], &[2.0, 0.0]);
        assert_relative_eq!(straight, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_terrestrial_turn_angle_clockwise() {
        // North along the prime meridian, then east along the 1° parallel.
        let turn = Terrestrial::signed_turn_angle(&[0.0, 0.0], &[0.0, 1.0], &[1.0, 1.0]);
        assert!(turn > 85.0 && turn < 95.0, "turn = {turn}");
    }

    #[test]
    fn test_domain_metadata() {
        assert_eq!(Terrestrial::DIMENSION, 2);
        assert_eq!(Cartesian2D::DIMENSION, 2);
        assert_eq!(Cartesian3D::DIMENSION, 3);
        assert_eq!(Cartesian3D::NAME, "cartesian3d");
    }
}
