use serde::Serialize;
use tracing::debug;

use crate::error::{Result, SearchError};
use crate::geo::cfg::MIN_BASE_M;
use crate::geo::{destination, distance_m, initial_bearing_deg, midpoint, Point, PointRef};

/// A visible point that completes the base within tolerance.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApexMatch {
    pub point: PointRef,
    pub deviation: f64,
    /// Index into `Construction::apexes` of the closer apex.
    pub nearest_apex: usize,
    pub apex_distance_m: f64,
}

/// Everything a renderer needs for one base pair.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Construction {
    pub base: [PointRef; 2],
    pub base_distance_m: f64,
    pub altitude_m: f64,
    pub midpoint: Point,
    pub apexes: [Point; 2],
    pub tolerance: f64,
    pub search_radius_m: f64,
    /// Qualifying points in candidate order.
    pub matches: Vec<ApexMatch>,
}

/// Sum of absolute deviations of the sides from their mean, over the mean.
///
/// Returns 1.0 (invalid) when any side is not a strictly positive finite length.
pub fn deviation(a: f64, b: f64, c: f64) -> f64 {
    if [a, b, c].iter().any(|s| !(s.is_finite() && *s > 0.0)) {
        return 1.0;
    }
    let avg = (a + b + c) / 3.0;
    ((a - avg).abs() + (b - avg).abs() + (c - avg).abs()) / avg
}

/// The two apexes completing an equilateral triangle on `a`–`b`.
///
/// Order: `[β + 90°, β − 90°]` where `β` is the bearing from the midpoint to `b`.
pub fn apexes(a: Point, b: Point) -> [Point; 2] {
    let d = distance_m(a, b);
    let h = d * 3f64.sqrt() / 2.0;
    let mid = midpoint(a, b);
    let bearing = initial_bearing_deg(mid, b);
    [
        destination(mid, bearing + 90.0, h),
        destination(mid, bearing - 90.0, h),
    ]
}

/// Build both apexes for base `a`–`b` and scan `candidates` with the deviation test.
///
/// Candidates sharing an identifier with `a` or `b` are skipped.
pub fn construct_candidates(
    a: &PointRef,
    b: &PointRef,
    tolerance: f64,
    candidates: &[PointRef],
) -> Result<Construction> {
    if !(tolerance.is_finite() && tolerance > 0.0 && tolerance <= 1.0) {
        return Err(SearchError::InvalidSettings(format!(
            "deviation tolerance {tolerance} must be in (0, 1]"
        )));
    }
    let d = distance_m(a.point, b.point);
    if d.is_nan() || d < MIN_BASE_M {
        return Err(SearchError::DegenerateBase { distance_m: d });
    }
    let mid = midpoint(a.point, b.point);
    let tips = apexes(a.point, b.point);

    let matches: Vec<ApexMatch> = candidates
        .iter()
        .filter(|p| p.id != a.id && p.id != b.id)
        .filter_map(|p| {
            let dev = deviation(d, distance_m(p.point, a.point), distance_m(p.point, b.point));
            if dev > tolerance {
                return None;
            }
            let d0 = distance_m(p.point, tips[0]);
            let d1 = distance_m(p.point, tips[1]);
            let (nearest_apex, apex_distance_m) = if d1 < d0 { (1, d1) } else { (0, d0) };
            Some(ApexMatch {
                point: p.clone(),
                deviation: dev,
                nearest_apex,
                apex_distance_m,
            })
        })
        .collect();
    debug!(
        base_m = d,
        candidates = candidates.len(),
        matches = matches.len(),
        "apex scan"
    );
    Ok(Construction {
        base: [a.clone(), b.clone()],
        base_distance_m: d,
        altitude_m: d * 3f64.sqrt() / 2.0,
        midpoint: mid,
        apexes: tips,
        tolerance,
        search_radius_m: d * tolerance * 2.0,
        matches,
    })
}
