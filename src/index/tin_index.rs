use crate::error::Result;
use crate::math::{Envelope, Point2};
use crate::tin::{BoundaryId, BreaklineId, FaceId, PointId};

/// Spatial queries over a triangulated irregular network.
pub trait TinIndex {
    /// Returns the first face whose triangle contains `location`.
    ///
    /// Candidates are the faces whose envelope meets the square of side
    /// `2 * radius` centred on `location`; each is then tested exactly.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::NotFound` if no face contains `location`, and
    /// `IndexError::InvalidInput` for a negative or non-finite radius.
    fn tin_face_at_location(&self, location: Point2, radius: f64) -> Result<FaceId>;

    /// Returns `true` if some face contains `location`. Never fails.
    fn has_tin_face_at_location(&self, location: Point2, radius: f64) -> bool {
        self.tin_face_at_location(location, radius).is_ok()
    }

    /// Faces whose envelope intersects `envelope`.
    fn tin_faces_in_envelope(&self, envelope: &Envelope) -> Vec<FaceId>;

    fn has_tin_faces_in_envelope(&self, envelope: &Envelope) -> bool {
        !self.tin_faces_in_envelope(envelope).is_empty()
    }

    /// Points lying inside or on `envelope`.
    fn tin_points_in_envelope(&self, envelope: &Envelope) -> Vec<PointId>;

    /// Breaklines whose envelope intersects `envelope`.
    fn tin_breaklines_in_envelope(&self, envelope: &Envelope) -> Vec<BreaklineId>;

    /// Boundaries whose envelope intersects `envelope`.
    fn tin_boundaries_in_envelope(&self, envelope: &Envelope) -> Vec<BoundaryId>;

    /// A new index restricted to the entities meeting `envelope`.
    ///
    /// # Errors
    ///
    /// Returns an error if the restricted entities cannot be re-indexed.
    fn subset(&self, envelope: &Envelope) -> Result<Self>
    where
        Self: Sized;

    /// Faces whose elevation range contains `elevation`.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::NotFound` when nothing matches and the index
    /// reports empty results as errors.
    fn triangles_at_height(&self, elevation: f64) -> Result<Vec<FaceId>>;

    /// Faces whose elevation range overlaps `[low, high]`.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidInput` for an inverted range, and
    /// `IndexError::NotFound` when nothing matches and the index reports
    /// empty results as errors.
    fn triangles_within_range(&self, low: f64, high: f64) -> Result<Vec<FaceId>>;
}

/// Face adjacency over a TIN.
pub trait TinTopology {
    /// Faces sharing exactly one edge with `face`, in either orientation.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::EntityNotFound` if `face` is not part of the TIN.
    fn adjacent_faces(&self, face: FaceId) -> Result<Vec<FaceId>>;
}
