use std::fmt;

use rstar::primitives::GeomWithData;
use rstar::RTree;

use crate::math::{Envelope, Point2};
use crate::tin::PointId;

/// 2D index over TIN vertices.
#[derive(Default)]
pub struct TinPointIndex {
    tree: RTree<GeomWithData<[f64; 2], PointId>>,
}

impl fmt::Debug for TinPointIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TinPointIndex")
            .field("len", &self.tree.size())
            .finish()
    }
}

impl TinPointIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a balanced tree over all `points` at once.
    #[must_use]
    pub fn bulk_load(points: Vec<(PointId, Point2)>) -> Self {
        let entries = points
            .into_iter()
            .map(|(id, p)| GeomWithData::new([p.x, p.y], id))
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Points lying inside or on `envelope`.
    #[must_use]
    pub fn query(&self, envelope: &Envelope) -> Vec<PointId> {
        self.tree
            .locate_in_envelope(&envelope.to_aabb())
            .map(|entry| entry.data)
            .collect()
    }

    /// Closest point to `location` in the XY plane.
    #[must_use]
    pub fn nearest(&self, location: Point2) -> Option<PointId> {
        self.tree
            .nearest_neighbor(&[location.x, location.y])
            .map(|entry| entry.data)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn query_and_nearest() {
        let mut ids: SlotMap<PointId, ()> = SlotMap::with_key();
        let a = ids.insert(());
        let b = ids.insert(());
        let c = ids.insert(());

        let index = TinPointIndex::bulk_load(vec![
            (a, Point2::new(0.0, 0.0)),
            (b, Point2::new(5.0, 5.0)),
            (c, Point2::new(10.0, 0.0)),
        ]);
        assert_eq!(index.len(), 3);

        let found = index.query(&Envelope::new(Point2::new(-1.0, -1.0), Point2::new(5.0, 5.0)));
        assert_eq!(found.len(), 2);
        assert!(found.contains(&a) && found.contains(&b));

        assert_eq!(index.nearest(Point2::new(9.0, 1.0)), Some(c));
        assert!(TinPointIndex::new().nearest(Point2::new(0.0, 0.0)).is_none());
    }
}
