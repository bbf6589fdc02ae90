//! The external point universe as seen by the core.
//!
//! Hosts implement `PointUniverse` over whatever they keep (a map layer's
//! portal cache, a database). `PointCatalog` is the in-memory version.

use std::collections::HashMap;

use crate::geo::{Bounds, PointId, PointRef};

pub trait PointUniverse {
    /// All known points inside `bounds`.
    fn query_visible(&self, bounds: &Bounds) -> Vec<PointRef>;
    /// Resolve an identifier.
    fn lookup(&self, id: &PointId) -> Option<PointRef>;
}

/// Insertion-ordered point store keyed by id.
#[derive(Clone, Debug, Default)]
pub struct PointCatalog {
    points: Vec<PointRef>,
    index: HashMap<PointId, usize>,
}

impl PointCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace by id; returns the replaced entry.
    pub fn insert(&mut self, point: PointRef) -> Option<PointRef> {
        match self.index.get(&point.id) {
            Some(&i) => Some(std::mem::replace(&mut self.points[i], point)),
            None => {
                self.index.insert(point.id.clone(), self.points.len());
                self.points.push(point);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PointRef> {
        self.points.iter()
    }
}

impl FromIterator<PointRef> for PointCatalog {
    fn from_iter<I: IntoIterator<Item = PointRef>>(iter: I) -> Self {
        let mut c = Self::new();
        for p in iter {
            c.insert(p);
        }
        c
    }
}

impl PointUniverse for PointCatalog {
    fn query_visible(&self, bounds: &Bounds) -> Vec<PointRef> {
        self.points
            .iter()
            .filter(|p| bounds.contains(p.point))
            .cloned()
            .collect()
    }

    fn lookup(&self, id: &PointId) -> Option<PointRef> {
        self.index.get(id).map(|&i| self.points[i].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Point;

    #[test]
    fn catalog_query_and_lookup() {
        let mut cat: PointCatalog = [
            PointRef::new("a", Point::new(0.0, 0.0), "A"),
            PointRef::new("b", Point::new(1.0, 1.0), "B"),
            PointRef::new("c", Point::new(5.0, 5.0), "C"),
        ]
        .into_iter()
        .collect();
        let view = Bounds::from_corners(Point::new(-0.5, -0.5), Point::new(2.0, 2.0));
        let ids: Vec<String> = cat.query_visible(&view).into_iter().map(|p| p.id.0).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(cat.lookup(&"c".into()).map(|p| p.label), Some("C".to_string()));
        assert!(cat.lookup(&"zz".into()).is_none());

        let old = cat.insert(PointRef::new("a", Point::new(3.0, 3.0), "A2"));
        assert_eq!(old.map(|p| p.label), Some("A".to_string()));
        assert_eq!(cat.len(), 3);
        let ids: Vec<String> = cat.query_visible(&view).into_iter().map(|p| p.id.0).collect();
        assert_eq!(ids, ["b"]);
    }
}
