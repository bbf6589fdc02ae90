//! Sweep over pivot/candidate combinations with bounded best-first retention.

use std::cmp::Ordering;

use tracing::{debug, info};

use crate::error::{Result, SearchError};
use crate::geo::PointRef;
use crate::score::ScoreMethod;
use crate::settings::SearchSettings;

use super::types::{CancelFlag, PivotSet, ResultList, TriangleResult};

/// Hits buffered before an intermediate sort-and-truncate.
const COMPACT_FLOOR: usize = 4096;

/// True iff the candidate set is larger than `settings.max_portals`.
///
/// The host asks the user before calling `search` in that case.
#[inline]
pub fn requires_confirmation(candidate_count: usize, settings: &SearchSettings) -> bool {
    candidate_count > settings.max_portals
}

/// Run a full sweep and return the ranked list.
pub fn search(
    candidates: &[PointRef],
    pivots: &PivotSet,
    settings: &SearchSettings,
) -> Result<ResultList> {
    search_with_cancel(candidates, pivots, settings, &CancelFlag::default())
}

/// `search` after yielding once to the executor.
pub async fn search_async(
    candidates: &[PointRef],
    pivots: &PivotSet,
    settings: &SearchSettings,
    cancel: Option<&CancelFlag>,
) -> Result<ResultList> {
    tokio::task::yield_now().await;
    match cancel {
        Some(flag) => search_with_cancel(candidates, pivots, settings, flag),
        None => search(candidates, pivots, settings),
    }
}

/// `search` with a cancellation check before each outer-loop iteration.
pub fn search_with_cancel(
    candidates: &[PointRef],
    pivots: &PivotSet,
    settings: &SearchSettings,
    cancel: &CancelFlag,
) -> Result<ResultList> {
    settings.validate()?;
    let pool: Vec<&PointRef> = candidates
        .iter()
        .filter(|c| !pivots.contains(&c.id))
        .collect();
    let required = pivots.open_slots();
    if pool.len() < required {
        return Err(SearchError::InsufficientPoints {
            required,
            available: pool.len(),
        });
    }
    cancel.check()?;

    let n = pool.len();
    debug!(
        method = ?settings.method,
        pivots = pivots.len(),
        candidates = n,
        "triangle sweep start"
    );
    let mut sweep = Sweep::new(settings);
    match pivots.as_slice() {
        [] => {
            for i in 0..n {
                cancel.check()?;
                for j in (i + 1)..n {
                    for k in (j + 1)..n {
                        sweep.eval([pool[i], pool[j], pool[k]]);
                    }
                }
            }
        }
        [p] => {
            for i in 0..n {
                cancel.check()?;
                for j in (i + 1)..n {
                    sweep.eval([p, pool[i], pool[j]]);
                }
            }
        }
        [p, q] => {
            for c in &pool {
                cancel.check()?;
                sweep.eval([p, q, *c]);
            }
        }
        more => return Err(SearchError::TooManyPivots(more.len())),
    }
    let list = sweep.finish();
    info!(
        evaluated = list.evaluated,
        qualified = list.qualified,
        kept = list.len(),
        "triangle sweep done"
    );
    Ok(list)
}

struct Hit<'a> {
    vertices: [&'a PointRef; 3],
    score: f64,
    mean_side_m: f64,
    seq: usize,
}

/// Accumulator for one sweep. Keeps at most a bounded buffer of hits: once the
/// buffer outgrows its cap it is sorted by (score, seq) and cut back to
/// `max_results`, which yields the same top list as a full stable sort.
struct Sweep<'a> {
    method: ScoreMethod,
    threshold: f64,
    max_results: usize,
    cap: usize,
    evaluated: usize,
    qualified: usize,
    hits: Vec<Hit<'a>>,
}

impl<'a> Sweep<'a> {
    fn new(settings: &SearchSettings) -> Self {
        let max_results = settings.max_results;
        Self {
            method: settings.method,
            threshold: settings.threshold,
            max_results,
            cap: max_results.saturating_mul(2).max(COMPACT_FLOOR),
            evaluated: 0,
            qualified: 0,
            hits: Vec::new(),
        }
    }

    #[inline]
    fn eval(&mut self, vertices: [&'a PointRef; 3]) {
        let seq = self.evaluated;
        self.evaluated += 1;
        let [a, b, c] = vertices;
        let Some(s) = self
            .method
            .score_points(a.point, b.point, c.point, self.threshold)
        else {
            return;
        };
        if !s.qualifies {
            return;
        }
        self.qualified += 1;
        self.hits.push(Hit {
            vertices,
            score: s.quality,
            mean_side_m: s.mean_side_m,
            seq,
        });
        if self.hits.len() >= self.cap {
            self.compact();
        }
    }

    fn compact(&mut self) {
        let method = self.method;
        self.hits.sort_by(|x, y| rank(method, x, y));
        self.hits.truncate(self.max_results);
    }

    fn finish(mut self) -> ResultList {
        self.compact();
        let results = self
            .hits
            .into_iter()
            .map(|h| TriangleResult {
                vertices: h.vertices.map(|v| v.clone()),
                score: h.score,
                mean_side_m: h.mean_side_m,
            })
            .collect();
        ResultList {
            method: self.method,
            results,
            evaluated: self.evaluated,
            qualified: self.qualified,
        }
    }
}

#[inline]
fn rank(method: ScoreMethod, x: &Hit<'_>, y: &Hit<'_>) -> Ordering {
    method.compare(x.score, y.score).then(x.seq.cmp(&y.seq))
}
