use std::fmt;

use rstar::primitives::{GeomWithData, Rectangle};
use rstar::RTree;

use crate::math::Envelope;

type Entry<T> = GeomWithData<Rectangle<[f64; 2]>, T>;

/// A 2D store of payloads keyed by their bounding envelope.
///
/// Queries return every payload whose envelope intersects the query envelope.
/// Nothing finer than envelope overlap is checked.
pub struct EnvelopeIndex<T> {
    tree: RTree<Entry<T>>,
}

impl<T> fmt::Debug for EnvelopeIndex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvelopeIndex")
            .field("len", &self.tree.size())
            .finish()
    }
}

impl<T> Default for EnvelopeIndex<T> {
    fn default() -> Self {
        Self { tree: RTree::new() }
    }
}

impl<T: Copy> EnvelopeIndex<T> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a balanced tree over all `entries` at once.
    #[must_use]
    pub fn bulk_load(entries: Vec<(Envelope, T)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(envelope, payload)| {
                let rect = Rectangle::from_corners(
                    [envelope.min.x, envelope.min.y],
                    [envelope.max.x, envelope.max.y],
                );
                GeomWithData::new(rect, payload)
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Payloads whose envelope intersects `envelope`.
    #[must_use]
    pub fn query(&self, envelope: &Envelope) -> Vec<T> {
        self.tree
            .locate_in_envelope_intersecting(&envelope.to_aabb())
            .map(|entry| entry.data)
            .collect()
    }

    /// Returns `true` if at least one envelope intersects `envelope`.
    #[must_use]
    pub fn any_in(&self, envelope: &Envelope) -> bool {
        self.tree
            .locate_in_envelope_intersecting(&envelope.to_aabb())
            .next()
            .is_some()
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
