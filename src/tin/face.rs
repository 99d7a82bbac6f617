use super::edge::TinEdge;
use super::point::TinPoint;
use crate::elevation::{ElevationSpec, HasElevation};
use crate::error::{GeometryError, Result};
use crate::math::triangle_2d::{interpolate_z, is_degenerate_2d, point_in_triangle_2d};
use crate::math::{Envelope, Point2, Point3};

slotmap::new_key_type! {
    /// Unique identifier for a triangle face in a TIN index.
    pub struct FaceId;
}

/// A TIN triangle.
///
/// The 2D envelope and the elevation range are derived once at construction.
#[derive(Debug, Clone)]
pub struct TinFace {
    vertices: [TinPoint; 3],
    envelope: Envelope,
    min_z: f64,
    max_z: f64,
}

impl TinFace {
    /// Creates a face from three vertices.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the vertices are collinear in XY.
    pub fn new(a: TinPoint, b: TinPoint, c: TinPoint) -> Result<Self> {
        let positions = [a.position(), b.position(), c.position()];
        if is_degenerate_2d(&positions) {
            return Err(GeometryError::Degenerate(format!(
                "collinear triangle ({}, {}), ({}, {}), ({}, {})",
                positions[0].x,
                positions[0].y,
                positions[1].x,
                positions[1].y,
                positions[2].x,
                positions[2].y
            ))
            .into());
        }
        let mut envelope = Envelope::new(a.xy(), b.xy());
        envelope.expand_to(c.xy());
        Ok(Self {
            vertices: [a, b, c],
            envelope,
            min_z: a.z().min(b.z()).min(c.z()),
            max_z: a.z().max(b.z()).max(c.z()),
        })
    }

    #[must_use]
    pub fn vertices(&self) -> &[TinPoint; 3] {
        &self.vertices
    }

    #[must_use]
    pub fn positions(&self) -> [Point3; 3] {
        self.vertices.map(|v| v.position())
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        self.envelope
    }

    #[must_use]
    pub fn min_z(&self) -> f64 {
        self.min_z
    }

    #[must_use]
    pub fn max_z(&self) -> f64 {
        self.max_z
    }

    /// The three edges in winding order.
    #[must_use]
    pub fn edges(&self) -> [TinEdge; 3] {
        let [a, b, c] = self.vertices;
        [TinEdge::new(a, b), TinEdge::new(b, c), TinEdge::new(c, a)]
    }

    /// Number of edges this face shares with `other`.
    #[must_use]
    pub fn shared_edges(&self, other: &TinFace) -> usize {
        let theirs = other.edges();
        self.edges()
            .iter()
            .filter(|e| theirs.iter().any(|o| e.same_nodes(o)))
            .count()
    }

    /// Exact test of `p` against the triangle footprint, boundary included.
    #[must_use]
    pub fn contains_2d(&self, p: &Point2) -> bool {
        point_in_triangle_2d(&self.positions(), p)
    }

    /// Elevation of the triangle's plane at `p`, or `None` if `p` is outside.
    #[must_use]
    pub fn elevation_at(&self, p: &Point2) -> Option<f64> {
        if !self.contains_2d(p) {
            return None;
        }
        interpolate_z(&self.positions(), p)
    }

    #[must_use]
    pub fn centroid_2d(&self) -> Point2 {
        let [a, b, c] = self.positions();
        Point2::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0)
    }
}

impl HasElevation for TinFace {
    fn elevation(&self) -> ElevationSpec {
        ElevationSpec::Range {
            low: self.min_z,
            high: self.max_z,
        }
    }
}
