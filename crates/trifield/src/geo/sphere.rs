//! Great-circle primitives on the mean-radius sphere.
//!
//! - `distance_m`: haversine distance.
//! - `initial_bearing_deg`: forward azimuth in [0, 360).
//! - `destination`: point reached from a start along a bearing.
//! - `midpoint`: great-circle midpoint via unit vectors.

use nalgebra::Vector3;

use super::cfg::EARTH_RADIUS_M;
use super::types::Point;

/// Haversine distance in meters.
pub fn distance_m(a: Point, b: Point) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lng - a.lng).to_radians();
    let s_phi = (dphi / 2.0).sin();
    let s_lambda = (dlambda / 2.0).sin();
    let h = s_phi * s_phi + phi1.cos() * phi2.cos() * s_lambda * s_lambda;
    // h can leave [0,1] by an ulp for near-antipodal inputs
    2.0 * EARTH_RADIUS_M * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Initial bearing from `from` towards `to`, degrees clockwise from north in [0, 360).
pub fn initial_bearing_deg(from: Point, to: Point) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let dlambda = (to.lng - from.lng).to_radians();
    let y = dlambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlambda.cos();
    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Point at `distance_m` meters from `start` along initial bearing `bearing_deg`.
///
/// The bearing may be any real (e.g. `b + 90` or `b - 90`); longitude is normalized.
pub fn destination(start: Point, bearing_deg: f64, distance_m: f64) -> Point {
    let delta = distance_m / EARTH_RADIUS_M;
    let theta = bearing_deg.to_radians();
    let phi1 = start.lat.to_radians();
    let lambda1 = start.lng.to_radians();
    let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos();
    let phi2 = sin_phi2.clamp(-1.0, 1.0).asin();
    let y = theta.sin() * delta.sin() * phi1.cos();
    let x = delta.cos() - phi1.sin() * sin_phi2;
    let lambda2 = lambda1 + y.atan2(x);
    Point::new(phi2.to_degrees(), normalize_lng(lambda2.to_degrees()))
}

/// Great-circle midpoint of `a` and `b`.
///
/// Exactly equidistant from both ends. For antipodal inputs the midpoint is
/// undefined and `a` is returned.
pub fn midpoint(a: Point, b: Point) -> Point {
    let sum = to_unit(a) + to_unit(b);
    let norm = sum.norm();
    if !(norm.is_finite()) || norm < 1e-12 {
        return a;
    }
    from_unit(sum / norm)
}

/// Wrap a longitude into [-180, 180).
#[inline]
pub fn normalize_lng(lng: f64) -> f64 {
    (lng + 540.0).rem_euclid(360.0) - 180.0
}

#[inline]
fn to_unit(p: Point) -> Vector3<f64> {
    let phi = p.lat.to_radians();
    let lambda = p.lng.to_radians();
    Vector3::new(phi.cos() * lambda.cos(), phi.cos() * lambda.sin(), phi.sin())
}

#[inline]
fn from_unit(v: Vector3<f64>) -> Point {
    let lat = v.z.clamp(-1.0, 1.0).asin().to_degrees();
    let lng = v.y.atan2(v.x).to_degrees();
    Point::new(lat, lng)
}
