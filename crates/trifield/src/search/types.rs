//! Pivot, result and cancellation types.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::geo::{Point, PointId, PointRef};
use crate::score::ScoreMethod;

/// Maximum number of fixed vertices.
pub const MAX_PIVOTS: usize = 2;

/// Ordered set of 0..=2 fixed vertices.
///
/// Invariants:
/// - `len() <= MAX_PIVOTS`.
/// - Identifiers are unique.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PivotSet(Vec<PointRef>);

impl PivotSet {
    pub fn new(pivots: Vec<PointRef>) -> Result<Self> {
        let mut set = Self::default();
        if pivots.len() > MAX_PIVOTS {
            return Err(SearchError::TooManyPivots(pivots.len()));
        }
        for p in pivots {
            set.push(p)?;
        }
        Ok(set)
    }

    pub fn push(&mut self, pivot: PointRef) -> Result<()> {
        if self.contains(&pivot.id) {
            return Err(SearchError::DuplicatePivot(pivot.id));
        }
        if self.0.len() >= MAX_PIVOTS {
            return Err(SearchError::TooManyPivots(self.0.len() + 1));
        }
        self.0.push(pivot);
        Ok(())
    }

    pub fn remove(&mut self, id: &PointId) -> Option<PointRef> {
        let idx = self.0.iter().position(|p| &p.id == id)?;
        Some(self.0.remove(idx))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[inline]
    pub fn contains(&self, id: &PointId) -> bool {
        self.0.iter().any(|p| &p.id == id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Vertex slots left for candidates.
    #[inline]
    pub fn open_slots(&self) -> usize {
        3 - self.0.len()
    }

    pub fn as_slice(&self) -> &[PointRef] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PointRef> {
        self.0.iter()
    }
}

/// One qualifying triangle. Pivots come first, then candidates in enumeration order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriangleResult {
    pub vertices: [PointRef; 3],
    pub score: f64,
    pub mean_side_m: f64,
}

impl TriangleResult {
    /// Vertex coordinates, e.g. for drawing the polygon.
    pub fn polygon(&self) -> [Point; 3] {
        [
            self.vertices[0].point,
            self.vertices[1].point,
            self.vertices[2].point,
        ]
    }
}

/// Ranked, capped output of one search.
///
/// - `results` is best-first per `method`, `len() <= max_results`.
/// - `evaluated` counts scored triples; `qualified` counts hits before truncation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultList {
    pub method: ScoreMethod,
    pub results: Vec<TriangleResult>,
    pub evaluated: usize,
    pub qualified: usize,
}

impl ResultList {
    #[inline]
    pub fn len(&self) -> usize {
        self.results.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
    pub fn get(&self, index: usize) -> Option<&TriangleResult> {
        self.results.get(index)
    }
    pub fn best(&self) -> Option<&TriangleResult> {
        self.results.first()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, TriangleResult> {
        self.results.iter()
    }
}

/// Result `index` of a list, for an external renderer driven by explicit selection.
pub fn renderable_for(list: &ResultList, index: usize) -> Option<&TriangleResult> {
    list.get(index)
}

/// Shared flag a host sets to stop a running sweep.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
    #[inline]
    pub(crate) fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(SearchError::Cancelled)
        } else {
            Ok(())
        }
    }
}
