//! Fixed constants for the spherical model and the apex helper.
//!
//! These are not user settings; `SearchSettings` carries those.

/// Mean Earth radius in meters (same value the map layer uses for `distanceTo`).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
/// Base segments shorter than this are treated as coincident points.
pub const MIN_BASE_M: f64 = 1.0;
/// Default deviation tolerance of the pairwise constructor (fraction, not %).
pub const DEFAULT_MAX_DEVIATION: f64 = 0.05;
