//! Equilateral quality scoring.
//!
//! Two conventions share one interface, `ScoreMethod::score_sides`:
//! - `RelativeSpread`: `(max - min) / max * 100`; lower is better; qualifies on
//!   `spread < threshold` (strict).
//! - `AreaRatio`: Heron area over the area of the equilateral triangle built on
//!   the longest side, times 100; higher is better; qualifies on
//!   `quality >= threshold` (inclusive).
//!
//! The strict/inclusive asymmetry is intentional and kept per method.
//! Degenerate triples (longest side zero, non-finite sides) yield `None`.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::geo::{distance_m, Point};

/// Scoring convention selected by `SearchSettings::method`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreMethod {
    RelativeSpread,
    #[default]
    AreaRatio,
}

/// Outcome of scoring one non-degenerate triple.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleScore {
    /// Spread % (`RelativeSpread`) or quality % (`AreaRatio`).
    pub quality: f64,
    pub qualifies: bool,
    /// Arithmetic mean of the three side lengths, meters.
    pub mean_side_m: f64,
}

impl ScoreMethod {
    /// Threshold used when settings do not carry one.
    pub fn default_threshold(self) -> f64 {
        match self {
            ScoreMethod::RelativeSpread => 5.0,
            ScoreMethod::AreaRatio => 90.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreMethod::RelativeSpread => "spread",
            ScoreMethod::AreaRatio => "quality",
        }
    }

    /// Score a triple given its side lengths in meters.
    pub fn score_sides(self, a: f64, b: f64, c: f64, threshold: f64) -> Option<TriangleScore> {
        let quality = match self {
            ScoreMethod::RelativeSpread => relative_spread(a, b, c)?,
            ScoreMethod::AreaRatio => area_ratio(a, b, c)?,
        };
        let qualifies = match self {
            ScoreMethod::RelativeSpread => quality < threshold,
            ScoreMethod::AreaRatio => quality >= threshold,
        };
        Some(TriangleScore {
            quality,
            qualifies,
            mean_side_m: (a + b + c) / 3.0,
        })
    }

    /// Score a triple of coordinates (sides via haversine).
    pub fn score_points(self, p: Point, q: Point, r: Point, threshold: f64) -> Option<TriangleScore> {
        self.score_sides(distance_m(p, q), distance_m(q, r), distance_m(r, p), threshold)
    }

    /// Ordering with the better score first (`Less`).
    #[inline]
    pub fn compare(self, x: f64, y: f64) -> Ordering {
        match self {
            ScoreMethod::RelativeSpread => x.total_cmp(&y),
            ScoreMethod::AreaRatio => y.total_cmp(&x),
        }
    }

    #[inline]
    pub fn is_better(self, x: f64, y: f64) -> bool {
        self.compare(x, y) == Ordering::Less
    }
}

/// Finite and strictly positive: a zero side means two coincident vertices,
/// which is not a triangle under either convention.
#[inline]
fn sides_usable(a: f64, b: f64, c: f64) -> bool {
    [a, b, c].iter().all(|s| s.is_finite() && *s > 0.0)
}

/// `(max - min) / max * 100`, or `None` when a side is zero or unusable.
pub fn relative_spread(a: f64, b: f64, c: f64) -> Option<f64> {
    if !sides_usable(a, b, c) {
        return None;
    }
    let max = a.max(b).max(c);
    let min = a.min(b).min(c);
    Some((max - min) / max * 100.0)
}

/// Heron area as a percentage of `(sqrt(3)/4) * max²`, or `None` when degenerate.
pub fn area_ratio(a: f64, b: f64, c: f64) -> Option<f64> {
    if !sides_usable(a, b, c) {
        return None;
    }
    let max = a.max(b).max(c);
    let max_area = 3f64.sqrt() / 4.0 * max * max;
    if max_area <= 0.0 {
        return None;
    }
    let s = (a + b + c) / 2.0;
    // collinear triples can round to a tiny negative radicand
    let area = (s * (s - a) * (s - b) * (s - c)).max(0.0).sqrt();
    Some(area / max_area * 100.0)
}
