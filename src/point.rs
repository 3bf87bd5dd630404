//! Timestamped, geolocated points with open property maps.
//!
//! A [`TrajectoryPoint`] is the unit the assembler consumes. It carries its
//! coordinates (layout chosen by the [`Domain`] tag), a UTC timestamp, the
//! identifier of the moving object, and a map of named properties.
//!
//! # Example
//!
//! ```
//! use chrono::DateTime;
//! use trajectory_kit::{PropertyValue, Terrestrial, TrajectoryPoint};
//!
//! let when = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
//! let point = TrajectoryPoint::<Terrestrial>::new("N12345", when, [-106.6, 35.1])
//!     .with_property("altitude", 10_500.0)
//!     .with_property("callsign", "SWA1234");
//!
//! assert_eq!(point.object_id(), "N12345");
//! assert_eq!(point.real_property("altitude"), Some(10_500.0));
//! assert_eq!(
//!     point.property("callsign"),
//!     Some(&PropertyValue::Text("SWA1234".to_string()))
//! );
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::math::{Cartesian2D, Cartesian3D, Domain, Terrestrial};

/// A named property value attached to a point or trajectory.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PropertyValue {
    /// Real-valued measurement.
    Real(f64),
    /// Free text.
    Text(String),
    /// Point in time.
    Timestamp(DateTime<Utc>),
}

impl PropertyValue {
    /// The value as a real number, if it is one.
    #[must_use]
    pub const fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(v) => Some(*v),
            _ => None,
        }
    }

    /// The value as text, if it is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a timestamp, if it is one.
    #[must_use]
    pub const fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(t) => Some(*t),
            _ => None,
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<DateTime<Utc>> for PropertyValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}

/// Ordered map of property name to value.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// A timestamped position belonging to one moving object.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryPoint<D: Domain> {
    object_id: String,
    timestamp: DateTime<Utc>,
    coords: D::Coords,
    properties: PropertyMap,
}

/// Point on the earth's surface, `[longitude, latitude]` in degrees.
pub type TerrestrialPoint = TrajectoryPoint<Terrestrial>;

/// Point in flat 2D space.
pub type Cartesian2DPoint = TrajectoryPoint<Cartesian2D>;

/// Point in flat 3D space.
pub type Cartesian3DPoint = TrajectoryPoint<Cartesian3D>;

impl<D: Domain> TrajectoryPoint<D> {
    /// Create a point with no properties.
    pub fn new(object_id: impl Into<String>, timestamp: DateTime<Utc>, coords: D::Coords) -> Self {
        Self {
            object_id: object_id.into(),
            timestamp,
            coords,
            properties: PropertyMap::new(),
        }
    }

    /// Attach a property, consuming and returning the point.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.set_property(name, value);
        self
    }

    /// Replace the whole property map.
    #[must_use]
    pub fn with_properties(mut self, properties: PropertyMap) -> Self {
        self.properties = properties;
        self
    }

    /// Set a property during construction.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Identifier of the moving object.
    #[must_use]
    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    /// When the position was observed.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Coordinates in the domain's axis order.
    #[must_use]
    pub const fn coords(&self) -> &D::Coords {
        &self.coords
    }

    /// A single coordinate by axis index.
    #[must_use]
    pub fn coord(&self, axis: usize) -> Option<f64> {
        self.coords.as_ref().get(axis).copied()
    }

    /// All properties.
    #[must_use]
    pub const fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    /// A single property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// A real-valued property by name.
    #[must_use]
    pub fn real_property(&self, name: &str) -> Option<f64> {
        self.property(name).and_then(PropertyValue::as_real)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_point_accessors() {
        let p = Cartesian3DPoint::new("obj", ts(10), [1.0, 2.0, 3.0]);
        assert_eq!(p.object_id(), "obj");
        assert_eq!(p.timestamp(), ts(10));
        assert_eq!(p.coords(), &[1.0, 2.0, 3.0]);
        assert_eq!(p.coord(2), Some(3.0));
        assert_eq!(p.coord(3), None);
        assert!(p.properties().is_empty());
    }

    #[test]
    fn test_property_kinds() {
        let p = TerrestrialPoint::new("A", ts(0), [0.0, 0.0])
            .with_property("speed", 12.5)
            .with_property("name", "boat")
            .with_property("eta", ts(3600));

        assert_eq!(p.real_property("speed"), Some(12.5));
        assert_eq!(p.property("name").and_then(PropertyValue::as_text), Some("boat"));
        assert_eq!(p.property("eta").and_then(PropertyValue::as_timestamp), Some(ts(3600)));
        assert_eq!(p.real_property("name"), None);
        assert_eq!(p.property("missing"), None);
    }

    #[test]
    fn test_set_property_overwrites() {
        let mut p = Cartesian2DPoint::new("A", ts(0), [0.0, 0.0]);
        p.set_property("heading", 10.0);
        p.set_property("heading", 20.0);
        assert_eq!(p.real_property("heading"), Some(20.0));
        assert_eq!(p.properties().len(), 1);
    }
}
