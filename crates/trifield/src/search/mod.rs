//! Exhaustive and pivoted triangle search.
//!
//! Purpose
//! - Enumerate every triple made of the fixed pivots plus candidates, score
//!   each with the configured `ScoreMethod`, keep qualifying ones, rank them
//!   best-first and cap the list at `max_results`.
//!
//! Enumeration
//! - 0 pivots: unordered triples `i<j<k` (C(n,3)).
//! - 1 pivot: the pivot with unordered pairs `i<j` (C(n,2)).
//! - 2 pivots: both pivots with each candidate (n).
//!
//! Ranking is a stable sort on score; ties keep enumeration order, so equal
//! input always produces equal output.
//!
//! Scheduling
//! - `search_async` yields once to the executor before the sweep so a host can
//!   paint a progress indicator; the sweep then runs to completion.
//! - `search_with_cancel` polls a `CancelFlag` between outer-loop iterations.
//!
//! Code cross-refs: `crate::score::ScoreMethod`, `crate::settings::SearchSettings`

mod engine;
mod types;

pub use engine::{requires_confirmation, search, search_async, search_with_cancel};
pub use types::{renderable_for, CancelFlag, PivotSet, ResultList, TriangleResult};
