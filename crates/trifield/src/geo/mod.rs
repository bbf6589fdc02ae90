//! Spherical-Earth geometry for portal coordinates.
//!
//! Purpose
//! - Hold the point types shared by both search modes (`Point`, `PointId`,
//!   `PointRef`, `Bounds`).
//! - Provide the great-circle primitives the apex construction needs:
//!   haversine distance, initial bearing, destination point and midpoint.
//!
//! Model
//! - One sphere of mean radius `EARTH_RADIUS_M`. Every distance, bearing and
//!   projection in the crate goes through this module so the model stays
//!   consistent between scoring and construction.
//! - Angles are degrees at the API boundary, radians inside the formulas.
//!
//! Code cross-refs: `crate::score`, `crate::helper::construct_candidates`

pub mod cfg;
pub mod rand;
mod sphere;
mod types;

pub use sphere::{destination, distance_m, initial_bearing_deg, midpoint, normalize_lng};
pub use types::{Bounds, Point, PointId, PointRef};

#[cfg(test)]
mod tests;
