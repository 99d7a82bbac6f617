use super::point::TinPoint;

/// An edge between two TIN vertices.
///
/// Edges are compared by their node sets: `(a, b)` and `(b, a)` are the same
/// edge, regardless of the orientation a face walks them in.
#[derive(Debug, Clone, Copy)]
pub struct TinEdge {
    /// First vertex, in the owning face's winding.
    pub start: TinPoint,
    /// Second vertex, in the owning face's winding.
    pub end: TinPoint,
}

impl TinEdge {
    #[must_use]
    pub fn new(start: TinPoint, end: TinPoint) -> Self {
        Self { start, end }
    }

    /// Returns `true` if both edges join the same pair of vertices, in either
    /// orientation.
    #[must_use]
    pub fn same_nodes(&self, other: &TinEdge) -> bool {
        (self.start == other.start && self.end == other.end)
            || (self.start == other.end && self.end == other.start)
    }
}

impl PartialEq for TinEdge {
    fn eq(&self, other: &Self) -> bool {
        self.same_nodes(other)
    }
}
