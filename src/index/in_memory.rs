use slotmap::SlotMap;
use tracing::debug;

use super::envelope_index::EnvelopeIndex;
use super::point_index::TinPointIndex;
use super::tin_index::{TinIndex, TinTopology};
use super::IndexParams;
use crate::elevation::{ElevationIndex, EmptyResultPolicy};
use crate::error::{IndexError, Result};
use crate::math::{Envelope, Point2};
use crate::tin::{
    BoundaryId, BreaklineId, FaceId, PointId, TinBoundary, TinBreakline, TinFace, TinPoint,
};

/// A frozen, in-memory TIN index.
///
/// Built through [`InMemoryTinIndexBuilder`]; once built it exposes no
/// mutators and can be shared across threads for concurrent queries.
#[derive(Debug)]
pub struct InMemoryTinIndex {
    params: IndexParams,
    points: SlotMap<PointId, TinPoint>,
    faces: SlotMap<FaceId, TinFace>,
    breaklines: SlotMap<BreaklineId, TinBreakline>,
    boundaries: SlotMap<BoundaryId, TinBoundary>,
    point_index: TinPointIndex,
    face_index: EnvelopeIndex<FaceId>,
    breakline_index: EnvelopeIndex<BreaklineId>,
    boundary_index: EnvelopeIndex<BoundaryId>,
    // Face and point elevation bands; empty results are filtered by `finish`.
    face_elevations: ElevationIndex<FaceId>,
    point_elevations: ElevationIndex<PointId>,
}

/// Populates an [`InMemoryTinIndex`]. Insert-only.
///
/// Spatial trees stay empty until [`build`](Self::build) bulk-loads them.
#[derive(Debug)]
pub struct InMemoryTinIndexBuilder {
    index: InMemoryTinIndex,
}

impl InMemoryTinIndexBuilder {
    /// Creates an empty builder.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidInterval` if `params.elevation_interval`
    /// is not finite and strictly positive.
    pub fn new(params: IndexParams) -> Result<Self> {
        let interval = params.elevation_interval;
        Ok(Self {
            index: InMemoryTinIndex {
                params,
                points: SlotMap::with_key(),
                faces: SlotMap::with_key(),
                breaklines: SlotMap::with_key(),
                boundaries: SlotMap::with_key(),
                point_index: TinPointIndex::new(),
                face_index: EnvelopeIndex::new(),
                breakline_index: EnvelopeIndex::new(),
                boundary_index: EnvelopeIndex::new(),
                face_elevations: ElevationIndex::new(interval, EmptyResultPolicy::Empty)?,
                point_elevations: ElevationIndex::new(interval, EmptyResultPolicy::Empty)?,
            },
        })
    }

    /// Adds a triangle face.
    ///
    /// # Errors
    ///
    /// Returns an error if the face's elevation range cannot be banded.
    pub fn index_tin_face(&mut self, face: TinFace) -> Result<FaceId> {
        let index = &mut self.index;
        let id = index.faces.insert(face);
        if let Err(e) = index.face_elevations.index_element(id, &index.faces[id]) {
            index.faces.remove(id);
            return Err(e);
        }
        Ok(id)
    }

    /// Adds a vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the point's elevation cannot be banded.
    pub fn index_tin_point(&mut self, point: TinPoint) -> Result<PointId> {
        let index = &mut self.index;
        let id = index.points.insert(point);
        if let Err(e) = index.point_elevations.index_element(id, &point) {
            index.points.remove(id);
            return Err(e);
        }
        Ok(id)
    }

    /// Adds a breakline.
    pub fn index_tin_breakline(&mut self, breakline: TinBreakline) -> BreaklineId {
        self.index.breaklines.insert(breakline)
    }

    /// Adds a boundary.
    pub fn index_tin_boundary(&mut self, boundary: TinBoundary) -> BoundaryId {
        self.index.boundaries.insert(boundary)
    }

    /// Freezes the index, bulk-loading the spatial trees.
    #[must_use]
    pub fn build(self) -> InMemoryTinIndex {
        let mut index = self.index;
        index.point_index = TinPointIndex::bulk_load(
            index.points.iter().map(|(id, p)| (id, p.xy())).collect(),
        );
        index.face_index = EnvelopeIndex::bulk_load(
            index.faces.iter().map(|(id, f)| (f.envelope(), id)).collect(),
        );
        index.breakline_index = EnvelopeIndex::bulk_load(
            index.breaklines.iter().map(|(id, b)| (b.envelope(), id)).collect(),
        );
        index.boundary_index = EnvelopeIndex::bulk_load(
            index.boundaries.iter().map(|(id, b)| (b.envelope(), id)).collect(),
        );
        debug!(
            faces = index.faces.len(),
            points = index.points.len(),
            breaklines = index.breaklines.len(),
            boundaries = index.boundaries.len(),
            "built TIN index"
        );
        index
    }
}

impl InMemoryTinIndex {
    /// Shorthand for [`InMemoryTinIndexBuilder::new`].
    ///
    /// # Errors
    ///
    /// See [`InMemoryTinIndexBuilder::new`].
    pub fn builder(params: IndexParams) -> Result<InMemoryTinIndexBuilder> {
        InMemoryTinIndexBuilder::new(params)
    }

    #[must_use]
    pub fn params(&self) -> IndexParams {
        self.params
    }

    /// Returns the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is not part of this index.
    pub fn face(&self, id: FaceId) -> Result<&TinFace> {
        self.faces
            .get(id)
            .ok_or_else(|| IndexError::EntityNotFound("face").into())
    }

    /// Returns the point data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the point is not part of this index.
    pub fn point(&self, id: PointId) -> Result<&TinPoint> {
        self.points
            .get(id)
            .ok_or_else(|| IndexError::EntityNotFound("point").into())
    }

    /// Returns the breakline data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the breakline is not part of this index.
    pub fn breakline(&self, id: BreaklineId) -> Result<&TinBreakline> {
        self.breaklines
            .get(id)
            .ok_or_else(|| IndexError::EntityNotFound("breakline").into())
    }

    /// Returns the boundary data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the boundary is not part of this index.
    pub fn boundary(&self, id: BoundaryId) -> Result<&TinBoundary> {
        self.boundaries
            .get(id)
            .ok_or_else(|| IndexError::EntityNotFound("boundary").into())
    }

    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &TinFace)> {
        self.faces.iter()
    }

    pub fn points(&self) -> impl Iterator<Item = (PointId, &TinPoint)> {
        self.points.iter()
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn breakline_count(&self) -> usize {
        self.breaklines.len()
    }

    #[must_use]
    pub fn boundary_count(&self) -> usize {
        self.boundaries.len()
    }

    /// Like [`TinIndex::tin_face_at_location`], but reports "no face here" as
    /// `Ok(None)` instead of an error.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidInput` for a negative or non-finite radius.
    pub fn find_tin_face_at_location(&self, location: Point2, radius: f64) -> Result<Option<FaceId>> {
        let search = Envelope::around(location, radius)?;
        Ok(self
            .face_index
            .query(&search)
            .into_iter()
            .find(|&id| self.faces.get(id).is_some_and(|f| f.contains_2d(&location))))
    }

    /// Surface elevation at `location`, interpolated on the face containing it.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::NotFound` if no face contains `location`.
    pub fn elevation_at(&self, location: Point2) -> Result<f64> {
        let id = self.tin_face_at_location(location, 0.0)?;
        self.face(id)?.elevation_at(&location).ok_or_else(|| {
            IndexError::NotFound(format!("no elevation at ({}, {})", location.x, location.y))
                .into()
        })
    }

    /// Points in the elevation band of `elevation` whose z satisfies
    /// `z - elevation < tolerance`.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidInput` for non-finite arguments, and
    /// `IndexError::NotFound` for an empty result under
    /// [`EmptyResultPolicy::Error`].
    pub fn tin_points_at_elevation(&self, elevation: f64, tolerance: f64) -> Result<Vec<PointId>> {
        let found = self.point_elevations.elements_at_elevation(elevation, tolerance)?;
        self.finish(found, || format!("no points at elevation {elevation}"))
    }

    /// Closest vertex to `location` in the XY plane.
    #[must_use]
    pub fn nearest_tin_point(&self, location: Point2) -> Option<PointId> {
        self.point_index.nearest(location)
    }

    fn finish<T>(&self, found: Vec<T>, describe: impl FnOnce() -> String) -> Result<Vec<T>> {
        if found.is_empty() && self.params.empty_results == EmptyResultPolicy::Error {
            return Err(IndexError::NotFound(describe()).into());
        }
        Ok(found)
    }
}

impl TinIndex for InMemoryTinIndex {
    fn tin_face_at_location(&self, location: Point2, radius: f64) -> Result<FaceId> {
        self.find_tin_face_at_location(location, radius)?
            .ok_or_else(|| {
                IndexError::NotFound(format!(
                    "no face contains ({}, {})",
                    location.x, location.y
                ))
                .into()
            })
    }

    fn has_tin_face_at_location(&self, location: Point2, radius: f64) -> bool {
        matches!(self.find_tin_face_at_location(location, radius), Ok(Some(_)))
    }

    fn tin_faces_in_envelope(&self, envelope: &Envelope) -> Vec<FaceId> {
        self.face_index.query(envelope)
    }

    fn has_tin_faces_in_envelope(&self, envelope: &Envelope) -> bool {
        self.face_index.any_in(envelope)
    }

    fn tin_points_in_envelope(&self, envelope: &Envelope) -> Vec<PointId> {
        self.point_index.query(envelope)
    }

    fn tin_breaklines_in_envelope(&self, envelope: &Envelope) -> Vec<BreaklineId> {
        self.breakline_index.query(envelope)
    }

    fn tin_boundaries_in_envelope(&self, envelope: &Envelope) -> Vec<BoundaryId> {
        self.boundary_index.query(envelope)
    }

    /// Ids in the subset are freshly assigned and do not match this index.
    fn subset(&self, envelope: &Envelope) -> Result<Self> {
        let mut builder = InMemoryTinIndexBuilder::new(self.params)?;
        for id in self.tin_faces_in_envelope(envelope) {
            builder.index_tin_face(self.face(id)?.clone())?;
        }
        for id in self.tin_points_in_envelope(envelope) {
            builder.index_tin_point(*self.point(id)?)?;
        }
        for id in self.tin_breaklines_in_envelope(envelope) {
            builder.index_tin_breakline(self.breakline(id)?.clone());
        }
        for id in self.tin_boundaries_in_envelope(envelope) {
            builder.index_tin_boundary(self.boundary(id)?.clone());
        }
        Ok(builder.build())
    }

    fn triangles_at_height(&self, elevation: f64) -> Result<Vec<FaceId>> {
        let found = self
            .face_elevations
            .elements_in_elevation_range(elevation, elevation)?
            .into_iter()
            .filter(|&id| {
                self.faces
                    .get(id)
                    .is_some_and(|f| f.min_z() <= elevation && elevation <= f.max_z())
            })
            .collect();
        self.finish(found, || format!("no triangles at height {elevation}"))
    }

    fn triangles_within_range(&self, low: f64, high: f64) -> Result<Vec<FaceId>> {
        let found = self
            .face_elevations
            .elements_in_elevation_range(low, high)?
            .into_iter()
            .filter(|&id| {
                self.faces
                    .get(id)
                    .is_some_and(|f| f.min_z() <= high && low <= f.max_z())
            })
            .collect();
        self.finish(found, || format!("no triangles between {low} and {high}"))
    }
}

impl TinTopology for InMemoryTinIndex {
    fn adjacent_faces(&self, face: FaceId) -> Result<Vec<FaceId>> {
        let target = self.face(face)?;
        Ok(self
            .face_index
            .query(&target.envelope())
            .into_iter()
            .filter(|&id| id != face)
            .filter(|&id| {
                self.faces
                    .get(id)
                    .is_some_and(|other| target.shared_edges(other) == 1)
            })
            .collect())
    }
}
