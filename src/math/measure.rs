//! Point-level measurements: distance, speed, heading, and interpolation.
//!
//! These wrap the per-domain primitives on [`Domain`] and [`Heading`] and add
//! the timestamp and property handling that raw coordinates lack.

use crate::math::domain::{Domain, Heading};
use crate::math::time::{elapsed_seconds, lerp_timestamp};
use crate::point::{PropertyMap, PropertyValue, TrajectoryPoint};

/// Elapsed times with smaller magnitude than this (seconds) give zero speed.
pub const MIN_ELAPSED_SECONDS: f64 = 1e-9;

/// Distance between two points in domain units.
#[must_use]
pub fn distance<D: Domain>(a: &TrajectoryPoint<D>, b: &TrajectoryPoint<D>) -> f64 {
    D::distance(a.coords(), b.coords())
}

/// Speed between two points in distance units per hour.
///
/// Computed as `distance * 3600 / |seconds elapsed|`. When the elapsed time
/// is below [`MIN_ELAPSED_SECONDS`] the speed is reported as `0.0`.
#[must_use]
pub fn speed<D: Domain>(a: &TrajectoryPoint<D>, b: &TrajectoryPoint<D>) -> f64 {
    let seconds = elapsed_seconds(a.timestamp(), b.timestamp()).abs();
    if seconds < MIN_ELAPSED_SECONDS {
        return 0.0;
    }
    distance(a, b) * 3600.0 / seconds
}

/// Direction of travel from `a` to `b` in degrees.
#[must_use]
pub fn bearing<D: Heading>(a: &TrajectoryPoint<D>, b: &TrajectoryPoint<D>) -> f64 {
    D::bearing(a.coords(), b.coords())
}

/// Signed change of heading at `p1` along `p0 -> p1 -> p2`, degrees in `(-180, 180]`.
#[must_use]
pub fn signed_turn_angle<D: Heading>(
    p0: &TrajectoryPoint<D>,
    p1: &TrajectoryPoint<D>,
    p2: &TrajectoryPoint<D>,
) -> f64 {
    D::signed_turn_angle(p0.coords(), p1.coords(), p2.coords())
}

/// Blend two points with `fraction` clamped to `[0, 1]`.
///
/// See [`extrapolate`] for how timestamps and properties are blended.
#[must_use]
pub fn interpolate<D: Domain>(
    a: &TrajectoryPoint<D>,
    b: &TrajectoryPoint<D>,
    fraction: f64,
) -> TrajectoryPoint<D> {
    extrapolate(a, b, fraction.clamp(0.0, 1.0))
}

/// Blend two points with an unconstrained fraction.
///
/// Position follows the domain (great circle or straight line) and the
/// timestamp is blended linearly. Real and timestamp properties present on
/// both points are blended the same way; anything else takes the value from
/// the nearer endpoint, falling back to whichever endpoint has it. The object
/// id is taken from `a`.
#[must_use]
pub fn extrapolate<D: Domain>(
    a: &TrajectoryPoint<D>,
    b: &TrajectoryPoint<D>,
    fraction: f64,
) -> TrajectoryPoint<D> {
    let coords = D::extrapolate(a.coords(), b.coords(), fraction);
    let timestamp = lerp_timestamp(a.timestamp(), b.timestamp(), fraction);
    TrajectoryPoint::new(a.object_id(), timestamp, coords)
        .with_properties(blend_properties(a.properties(), b.properties(), fraction))
}

fn blend_properties(a: &PropertyMap, b: &PropertyMap, fraction: f64) -> PropertyMap {
    let (near, far) = if fraction < 0.5 { (a, b) } else { (b, a) };

    let mut blended = PropertyMap::new();
    for name in a.keys().chain(b.keys()) {
        if blended.contains_key(name) {
            continue;
        }
        let value = match (a.get(name), b.get(name)) {
            (Some(PropertyValue::Real(x)), Some(PropertyValue::Real(y))) => {
                PropertyValue::Real(x + (y - x) * fraction)
            }
            (Some(PropertyValue::Timestamp(x)), Some(PropertyValue::Timestamp(y))) => {
                PropertyValue::Timestamp(lerp_timestamp(*x, *y, fraction))
            }
            _ => match near.get(name).or_else(|| far.get(name)) {
                Some(v) => v.clone(),
                None => continue,
            },
        };
        blended.insert(name.clone(), value);
    }
    blended
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Cartesian2D, Cartesian3D, Terrestrial};
    use approx::assert_relative_eq;
    use chrono::{DateTime, Duration, Utc};

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_speed_terrestrial() {
        let a = TrajectoryPoint::<Terrestrial>::new("A", ts(0), [0.0, 0.0]);
        let b = TrajectoryPoint::<Terrestrial>::new("A", ts(3600), [0.0, 1.0]);
        assert_relative_eq!(speed(&a, &b), distance(&a, &b), epsilon = 1e-9);
    }

    #[test]
    fn test_speed_zero_elapsed_is_zero() {
        let a = TrajectoryPoint::<Cartesian2D>::new("A", ts(5), [0.0, 0.0]);
        let b = TrajectoryPoint::<Cartesian2D>::new("A", ts(5), [100.0, 0.0]);
        assert_eq!(speed(&a, &b), 0.0);

        let c = TrajectoryPoint::<Cartesian2D>::new("A", ts(5) + Duration::nanoseconds(0), [1.0, 0.0]);
        assert_eq!(speed(&a, &c), 0.0);
    }

    #[test]
    fn test_speed_planar_units_per_hour() {
        let a = TrajectoryPoint::<Cartesian3D>::new("A", ts(0), [0.0, 0.0, 0.0]);
        let b = TrajectoryPoint::<Cartesian3D>::new("A", ts(60), [0.0, 3.0, 4.0]);
        assert_relative_eq!(speed(&a, &b), 300.0, epsilon = 1e-9);
        assert_relative_eq!(speed(&b, &a), 300.0, epsilon = 1e-9);
    }

    #[test]
    fn test_interpolate_blends_time_and_properties() {
        let a = TrajectoryPoint::<Cartesian2D>::new("A", ts(0), [0.0, 0.0])
            .with_property("altitude", 100.0)
            .with_property("status", "climb")
            .with_property("only_a", 1.0);
        let b = TrajectoryPoint::<Cartesian2D>::new("A", ts(100), [10.0, 20.0])
            .with_property("altitude", 200.0)
            .with_property("status", "cruise");

        let p = interpolate(&a, &b, 0.25);
        assert_eq!(p.coords(), &[2.5, 5.0]);
        assert_eq!(p.timestamp(), ts(25));
        assert_relative_eq!(p.real_property("altitude").unwrap(), 125.0);
        assert_eq!(p.property("status").and_then(PropertyValue::as_text), Some("climb"));
        assert_eq!(p.real_property("only_a"), Some(1.0));

        let q = interpolate(&a, &b, 0.75);
        assert_eq!(q.property("status").and_then(PropertyValue::as_text), Some("cruise"));
    }

    #[test]
    fn test_interpolate_clamps_but_extrapolate_does_not() {
        let a = TrajectoryPoint::<Cartesian2D>::new("A", ts(0), [0.0, 0.0]);
        let b = TrajectoryPoint::<Cartesian2D>::new("A", ts(10), [1.0, 0.0]);

        assert_eq!(interpolate(&a, &b, 3.0).coords(), &[1.0, 0.0]);
        let ahead = extrapolate(&a, &b, 3.0);
        assert_eq!(ahead.coords(), &[3.0, 0.0]);
        assert_eq!(ahead.timestamp(), ts(30));
    }

    #[test]
    fn test_bearing_and_turn_on_points() {
        let p0 = TrajectoryPoint::<Cartesian2D>::new("A", ts(0), [0.0, 0.0]);
        let p1 = TrajectoryPoint::<Cartesian2D>::new("A", ts(1), [1.0, 0.0]);
        let p2 = TrajectoryPoint::<Cartesian2D>::new("A", ts(2), [1.0, 1.0]);
        assert_relative_eq!(bearing(&p0, &p1), 0.0);
        assert_relative_eq!(signed_turn_angle(&p0, &p1, &p2), 90.0, epsilon = 1e-10);
    }
}
