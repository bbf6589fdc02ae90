//! Caller-owned context for the exhaustive finder.
//!
//! Holds the settings, the pivots and the last ranked list between calls so the
//! core itself stays stateless. A failed search leaves the previous list in place.

use tracing::debug;

use crate::error::Result;
use crate::geo::{Bounds, PointId, PointRef};
use crate::search::{
    renderable_for, requires_confirmation, search_async, CancelFlag, PivotSet, ResultList,
    TriangleResult,
};
use crate::settings::{load_settings, save_settings, SearchSettings, SettingsStore};
use crate::universe::PointUniverse;

#[derive(Clone, Debug, Default)]
pub struct FinderSession {
    settings: SearchSettings,
    pivots: PivotSet,
    results: Option<ResultList>,
}

impl FinderSession {
    pub fn new(settings: SearchSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            ..Self::default()
        })
    }

    /// Start from whatever the store holds (defaults if nothing usable).
    pub fn from_store<S: SettingsStore + ?Sized>(store: &S) -> Self {
        Self {
            settings: load_settings(store),
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: SearchSettings) -> Result<()> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    /// Apply dialog input and persist it; on error nothing changes.
    pub fn apply_inputs<S: SettingsStore + ?Sized>(
        &mut self,
        threshold: &str,
        max_results: &str,
        store: &mut S,
    ) -> Result<()> {
        let next = self.settings.with_inputs(threshold, max_results)?;
        save_settings(store, &next);
        self.settings = next;
        Ok(())
    }

    pub fn pivots(&self) -> &PivotSet {
        &self.pivots
    }

    pub fn pin(&mut self, point: PointRef) -> Result<()> {
        self.pivots.push(point)
    }

    /// Pin by identifier. `Ok(false)` when the universe does not know the id.
    pub fn pin_by_id<U: PointUniverse + ?Sized>(&mut self, universe: &U, id: &PointId) -> Result<bool> {
        match universe.lookup(id) {
            Some(p) => self.pin(p).map(|_| true),
            None => {
                debug!(%id, "pivot id not in universe");
                Ok(false)
            }
        }
    }

    pub fn unpin(&mut self, id: &PointId) -> Option<PointRef> {
        self.pivots.remove(id)
    }

    pub fn clear_pivots(&mut self) {
        self.pivots.clear();
    }

    /// Visible points minus the current pivots.
    pub fn visible_candidates<U: PointUniverse + ?Sized>(
        &self,
        universe: &U,
        bounds: &Bounds,
    ) -> Vec<PointRef> {
        universe
            .query_visible(bounds)
            .into_iter()
            .filter(|p| !self.pivots.contains(&p.id))
            .collect()
    }

    pub fn needs_confirmation(&self, candidate_count: usize) -> bool {
        requires_confirmation(candidate_count, &self.settings)
    }

    /// Search and keep the new list.
    pub async fn run(
        &mut self,
        candidates: &[PointRef],
        cancel: Option<&CancelFlag>,
    ) -> Result<&ResultList> {
        let list = search_async(candidates, &self.pivots, &self.settings, cancel).await?;
        Ok(self.results.insert(list))
    }

    pub fn results(&self) -> Option<&ResultList> {
        self.results.as_ref()
    }

    pub fn renderable(&self, index: usize) -> Option<&TriangleResult> {
        self.results.as_ref().and_then(|l| renderable_for(l, index))
    }

    /// Drop the cached list (the results dialog was closed).
    pub fn clear_results(&mut self) {
        self.results = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::geo::rand::{near_equilateral, scatter_points, ReplayToken, ScatterCfg};
    use crate::geo::Point;
    use crate::settings::{MemoryStore, SETTINGS_KEY};
    use crate::universe::PointCatalog;

    fn catalog() -> PointCatalog {
        let center = Point::new(34.69, 135.5);
        let mut cat: PointCatalog = scatter_points(
            center,
            ScatterCfg {
                count: 20,
                radius_m: 1_500.0,
            },
            ReplayToken { seed: 21, index: 0 },
        )
        .into_iter()
        .collect();
        let [a, b, c] = near_equilateral(center, 900.0, 40.0);
        cat.insert(PointRef::new("eq-a", a, "A"));
        cat.insert(PointRef::new("eq-b", b, "B"));
        cat.insert(PointRef::new("eq-c", c, "C"));
        cat
    }

    #[tokio::test(flavor = "current_thread")]
    async fn pinned_search_contains_pivots() {
        let cat = catalog();
        let mut s = FinderSession::default();
        assert!(s.pin_by_id(&cat, &"eq-a".into()).unwrap());
        assert!(s.pin_by_id(&cat, &"eq-b".into()).unwrap());
        assert!(!s.pin_by_id(&cat, &"missing".into()).unwrap());
        assert!(matches!(
            s.pin_by_id(&cat, &"eq-c".into()),
            Err(SearchError::TooManyPivots(3))
        ));
        let cands = s.visible_candidates(&cat, &Bounds::world());
        assert_eq!(cands.len(), cat.len() - 2);
        assert!(!s.needs_confirmation(cands.len()));
        let list = s.run(&cands, None).await.unwrap();
        assert_eq!(list.evaluated, cands.len());
        let best = list.best().unwrap();
        assert_eq!(best.vertices[2].id.as_str(), "eq-c");
        assert_eq!(s.renderable(0).map(|t| t.vertices[0].id.as_str()), Some("eq-a"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn failed_run_keeps_previous_results() {
        let cat = catalog();
        let mut s = FinderSession::default();
        let cands = s.visible_candidates(&cat, &Bounds::world());
        let first = s.run(&cands, None).await.unwrap().clone();
        let err = s.run(&cands[..2], None).await.unwrap_err();
        assert!(matches!(err, SearchError::InsufficientPoints { .. }));
        assert_eq!(s.results(), Some(&first));
        s.clear_results();
        assert!(s.renderable(0).is_none());
    }

    #[test]
    fn apply_inputs_persists_only_valid_values() {
        let mut store = MemoryStore::default();
        let mut s = FinderSession::from_store(&store);
        assert!(s.apply_inputs("abc", "5", &mut store).is_err());
        assert!(store.get(SETTINGS_KEY).is_none());
        s.apply_inputs("95", "5", &mut store).unwrap();
        assert_eq!(s.settings().threshold, 95.0);
        let reloaded = FinderSession::from_store(&store);
        assert_eq!(reloaded.settings(), s.settings());
    }

    #[test]
    fn new_rejects_invalid_settings() {
        let bad = SearchSettings {
            threshold: -1.0,
            ..SearchSettings::default()
        };
        assert!(FinderSession::new(bad.clone()).is_err());
        let mut s = FinderSession::default();
        assert!(s.set_settings(bad).is_err());
        assert_eq!(s.settings(), &SearchSettings::default());
    }

    #[test]
    fn unpin_and_clear() {
        let cat = catalog();
        let mut s = FinderSession::default();
        s.pin_by_id(&cat, &"p0".into()).unwrap();
        s.pin_by_id(&cat, &"p1".into()).unwrap();
        assert!(s.unpin(&"p0".into()).is_some());
        assert_eq!(s.pivots().len(), 1);
        s.clear_pivots();
        assert!(s.pivots().is_empty());
    }
}
