//! Equilateral portal-triangle search.
//!
//! Two modes share this crate:
//! - Exhaustive/pivoted search (`search`): every triple of candidates plus up
//!   to two fixed pivots is scored for equilateral-ness, then ranked and capped.
//! - Pivot helper (`helper`): for two fixed points, construct both apexes of
//!   the perfect equilateral triangle and scan visible points with a deviation
//!   test.
//!
//! The crate is an in-process library. Map queries, prompting and rendering
//! belong to the host: it supplies candidate sets through `PointUniverse`,
//! persists settings through `SettingsStore`, and renders the plain data
//! returned here.

pub mod error;
pub mod finder;
pub mod geo;
pub mod helper;
pub mod score;
pub mod search;
pub mod settings;
pub mod universe;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{Result, SearchError};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::error::{Result, SearchError};
    pub use crate::finder::FinderSession;
    pub use crate::geo::{distance_m, Bounds, Point, PointId, PointRef};
    pub use crate::helper::{
        construct_candidates, Construction, HelperSession, HelperState, Slot,
    };
    pub use crate::score::{ScoreMethod, TriangleScore};
    pub use crate::search::{
        renderable_for, requires_confirmation, search, search_async, search_with_cancel,
        CancelFlag, PivotSet, ResultList, TriangleResult,
    };
    pub use crate::settings::{
        load_settings, save_settings, MemoryStore, SearchSettings, SettingsStore,
    };
    pub use crate::universe::{PointCatalog, PointUniverse};
}
