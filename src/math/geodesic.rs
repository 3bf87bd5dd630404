//! Great-circle geometry on a spherical earth.
//!
//! Positions are `[longitude, latitude]` in degrees. Distances are returned
//! in kilometers using a mean earth radius.

use nalgebra::Vector3;

/// Mean earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Below this central angle (radians) slerp degenerates to a normalized lerp.
const SLERP_EPS: f64 = 1e-12;

/// Convert `[longitude, latitude]` degrees to a unit vector.
#[must_use]
pub fn to_unit_vector(lon_lat: &[f64; 2]) -> Vector3<f64> {
    let lon = lon_lat[0].to_radians();
    let lat = lon_lat[1].to_radians();
    Vector3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
}

/// Convert a (not necessarily unit) vector back to `[longitude, latitude]` degrees.
#[must_use]
pub fn from_unit_vector(v: &Vector3<f64>) -> [f64; 2] {
    let norm = v.norm();
    if norm == 0.0 {
        return [0.0, 0.0];
    }
    let z = (v.z / norm).clamp(-1.0, 1.0);
    [v.y.atan2(v.x).to_degrees(), z.asin().to_degrees()]
}

/// Central angle between two positions in radians (haversine formulation).
#[must_use]
pub fn central_angle(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    let lat1 = a[1].to_radians();
    let lat2 = b[1].to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b[0] - a[0]).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * h.sqrt().min(1.0).asin()
}

/// Great-circle distance in kilometers.
#[must_use]
pub fn great_circle_distance_km(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    central_angle(a, b) * EARTH_RADIUS_KM
}

/// Initial compass bearing from `from` to `to` in degrees, `[0, 360)`.
///
/// 0 is north, 90 is east.
#[must_use]
pub fn initial_bearing(from: &[f64; 2], to: &[f64; 2]) -> f64 {
    let lat1 = from[1].to_radians();
    let lat2 = to[1].to_radians();
    let dlon = (to[0] - from[0]).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    let bearing = y.atan2(x).to_degrees().rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if bearing >= 360.0 {
        0.0
    } else {
        bearing
    }
}

/// Spherical linear interpolation along the great circle through `a` and `b`.
///
/// `fraction` is not clamped: values outside `[0, 1]` keep travelling along
/// the same great circle. Coincident and antipodal endpoints fall back to a
/// normalized linear blend of the unit vectors.
#[must_use]
pub fn slerp(a: &[f64; 2], b: &[f64; 2], fraction: f64) -> [f64; 2] {
    let va = to_unit_vector(a);
    let vb = to_unit_vector(b);

    let omega = va.dot(&vb).clamp(-1.0, 1.0).acos();
    let sin_omega = omega.sin();

    let blended = if omega < SLERP_EPS || sin_omega.abs() < SLERP_EPS {
        va + (vb - va) * fraction
    } else {
        va * (((1.0 - fraction) * omega).sin() / sin_omega)
            + vb * ((fraction * omega).sin() / sin_omega)
    };

    if blended.norm() < SLERP_EPS {
        return *a;
    }
    from_unit_vector(&blended)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_one_degree_of_latitude() {
        let d = great_circle_distance_km(&[0.0, 0.0], &[0.0, 1.0]);
        assert_relative_eq!(d, EARTH_RADIUS_KM * 1f64.to_radians(), epsilon = 1e-9);
        assert!((d - 111.19).abs() < 0.01);
    }

    #[test]
    fn test_distance_symmetric_and_zero() {
        let a = [-106.6, 35.1];
        let b = [-73.9, 40.7];
        assert_relative_eq!(
            great_circle_distance_km(&a, &b),
            great_circle_distance_km(&b, &a),
            epsilon = 1e-9
        );
        assert_relative_eq!(great_circle_distance_km(&a, &a), 0.0);
    }

    #[test]
    fn test_cardinal_bearings() {
        assert_relative_eq!(initial_bearing(&[0.0, 0.0], &[0.0, 1.0]), 0.0, epsilon = 1e-9);
        assert_relative_eq!(initial_bearing(&[0.0, 0.0], &[1.0, 0.0]), 90.0, epsilon = 1e-9);
        assert_relative_eq!(initial_bearing(&[0.0, 1.0], &[0.0, 0.0]), 180.0, epsilon = 1e-9);
        assert_relative_eq!(initial_bearing(&[1.0, 0.0], &[0.0, 0.0]), 270.0, epsilon = 1e-9);
    }

    #[test]
    fn test_slerp_endpoints_and_midpoint() {
        let a = [10.0, 20.0];
        let b = [30.0, 40.0];

        let start = slerp(&a, &b, 0.0);
        let end = slerp(&a, &b, 1.0);
        assert_relative_eq!(start[0], a[0], epsilon = 1e-9);
        assert_relative_eq!(start[1], a[1], epsilon = 1e-9);
        assert_relative_eq!(end[0], b[0], epsilon = 1e-9);
        assert_relative_eq!(end[1], b[1], epsilon = 1e-9);

        let mid = slerp(&a, &b, 0.5);
        let total = great_circle_distance_km(&a, &b);
        assert_relative_eq!(great_circle_distance_km(&a, &mid), total / 2.0, epsilon = 1e-6);
        assert_relative_eq!(great_circle_distance_km(&mid, &b), total / 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_slerp_extrapolates_along_equator() {
        let p = slerp(&[0.0, 0.0], &[10.0, 0.0], 2.0);
        assert_relative_eq!(p[0], 20.0, epsilon = 1e-9);
        assert_relative_eq!(p[1], 0.0, epsilon = 1e-9);

        let q = slerp(&[0.0, 0.0], &[10.0, 0.0], -1.0);
        assert_relative_eq!(q[0], -10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_slerp_coincident_points() {
        let p = slerp(&[5.0, 5.0], &[5.0, 5.0], 0.7);
        assert_relative_eq!(p[0], 5.0, epsilon = 1e-9);
        assert_relative_eq!(p[1], 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unit_vector_round_trip() {
        let p = [-120.5, -33.25];
        let back = from_unit_vector(&to_unit_vector(&p));
        assert_relative_eq!(back[0], p[0], epsilon = 1e-9);
        assert_relative_eq!(back[1], p[1], epsilon = 1e-9);
    }
}
