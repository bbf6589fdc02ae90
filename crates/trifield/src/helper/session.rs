//! Two-slot selection state for the pivot helper.
//!
//! The map's highlighted point is tracked apart from the two fixed slots.
//! Assigning a slot copies the highlighted point in; every slot change rebuilds
//! the construction when both slots are filled and drops it otherwise.

use tracing::debug;

use crate::error::{Result, SearchError};
use crate::geo::cfg::DEFAULT_MAX_DEVIATION;
use crate::geo::PointRef;

use super::construct::{construct_candidates, Construction};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    #[inline]
    fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }
}

/// Derived from slot occupancy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HelperState {
    NoneSelected,
    OneFixed,
    TwoFixed,
}

#[derive(Clone, Debug)]
pub struct HelperSession {
    highlighted: Option<PointRef>,
    slots: [Option<PointRef>; 2],
    tolerance: f64,
    construction: Option<Construction>,
}

impl Default for HelperSession {
    fn default() -> Self {
        Self {
            highlighted: None,
            slots: [None, None],
            tolerance: DEFAULT_MAX_DEVIATION,
            construction: None,
        }
    }
}

impl HelperSession {
    pub fn new(tolerance: f64) -> Result<Self> {
        if !(tolerance.is_finite() && tolerance > 0.0 && tolerance <= 1.0) {
            return Err(SearchError::InvalidSettings(format!(
                "deviation tolerance {tolerance} must be in (0, 1]"
            )));
        }
        Ok(Self {
            tolerance,
            ..Self::default()
        })
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Record the map's current selection (`None` when deselected).
    pub fn highlight(&mut self, point: Option<PointRef>) {
        self.highlighted = point;
    }

    pub fn highlighted(&self) -> Option<&PointRef> {
        self.highlighted.as_ref()
    }

    /// Copy the highlighted point into `slot`. Returns false if nothing is highlighted.
    pub fn assign(&mut self, slot: Slot, candidates: &[PointRef]) -> bool {
        let Some(p) = self.highlighted.clone() else {
            return false;
        };
        debug!(?slot, id = %p.id, "assign helper slot");
        self.slots[slot.index()] = Some(p);
        self.recompute(candidates);
        true
    }

    /// Empty a single slot.
    pub fn release(&mut self, slot: Slot, candidates: &[PointRef]) {
        self.slots[slot.index()] = None;
        self.recompute(candidates);
    }

    /// Empty both slots and drop the construction.
    pub fn clear(&mut self) {
        self.slots = [None, None];
        self.construction = None;
    }

    /// Rebuild against a new candidate set (e.g. after the viewport moved).
    pub fn refresh(&mut self, candidates: &[PointRef]) {
        self.recompute(candidates);
    }

    pub fn slot(&self, slot: Slot) -> Option<&PointRef> {
        self.slots[slot.index()].as_ref()
    }

    pub fn state(&self) -> HelperState {
        match self.slots.iter().filter(|s| s.is_some()).count() {
            0 => HelperState::NoneSelected,
            1 => HelperState::OneFixed,
            _ => HelperState::TwoFixed,
        }
    }

    pub fn construction(&self) -> Option<&Construction> {
        self.construction.as_ref()
    }

    fn recompute(&mut self, candidates: &[PointRef]) {
        self.construction = match &self.slots {
            [Some(a), Some(b)] => match construct_candidates(a, b, self.tolerance, candidates) {
                Ok(c) => Some(c),
                Err(err) => {
                    debug!(%err, "no construction for current slots");
                    None
                }
            },
            _ => None,
        };
    }
}
