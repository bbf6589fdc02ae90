//! Failure values reported to callers of a single search or construction.
//!
//! None of these are fatal: each one is local to the invocation that produced
//! it and leaves previously returned results untouched. Degenerate triangles
//! are not errors; scoring filters them out silently.

use thiserror::Error;

use crate::geo::PointId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    #[error("insufficient points: need {required} candidates, have {available}")]
    InsufficientPoints { required: usize, available: usize },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("at most two pivots may be fixed, got {0}")]
    TooManyPivots(usize),

    #[error("point {0} is already a pivot")]
    DuplicatePivot(PointId),

    #[error("base points are {distance_m:.3} m apart; no triangle can be constructed")]
    DegenerateBase { distance_m: f64 },

    #[error("search cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, SearchError>;
