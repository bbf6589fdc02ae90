//! Point, identifier and viewport types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    #[inline]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Opaque identifier of a point in the external universe (portal GUID).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointId(pub String);

impl PointId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PointId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PointId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A point of the external universe, held by value.
///
/// The label is display-only; identity is `id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointRef {
    pub id: PointId,
    pub point: Point,
    #[serde(default)]
    pub label: String,
}

impl PointRef {
    pub fn new(id: impl Into<PointId>, point: Point, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            point,
            label: label.into(),
        }
    }

    /// Label for display, `"N/A"` when the universe had no title.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            "N/A"
        } else {
            &self.label
        }
    }
}

/// Axis-aligned viewport in degrees (south-west and north-east corners).
///
/// Invariants:
/// - `south_west.lat <= north_east.lat` and `south_west.lng <= north_east.lng`
///   (enforced by `from_corners`). Antimeridian-crossing viewports are not modeled.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south_west: Point,
    pub north_east: Point,
}

impl Bounds {
    /// Build from any two opposite corners.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            south_west: Point::new(a.lat.min(b.lat), a.lng.min(b.lng)),
            north_east: Point::new(a.lat.max(b.lat), a.lng.max(b.lng)),
        }
    }

    /// The whole globe.
    pub fn world() -> Self {
        Self::from_corners(Point::new(-90.0, -180.0), Point::new(90.0, 180.0))
    }

    /// Inclusive containment.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.lat >= self.south_west.lat
            && p.lat <= self.north_east.lat
            && p.lng >= self.south_west.lng
            && p.lng <= self.north_east.lng
    }
}
