use spade::handles::FixedVertexHandle;
use spade::{
    ConstrainedDelaunayTriangulation, HasPosition, InsertionError, Point2 as SpadePoint2,
    Triangulation,
};
use tracing::{debug, warn};

use crate::error::{Result, TriangulationError};
use crate::index::{InMemoryTinIndex, InMemoryTinIndexBuilder, IndexParams};
use crate::tin::{TinBoundary, TinBreakline, TinFace, TinPoint};

/// Vertex payload carried through the triangulation.
#[derive(Debug, Clone, Copy)]
struct SurveyVertex {
    position: SpadePoint2<f64>,
    z: f64,
}

impl HasPosition for SurveyVertex {
    type Scalar = f64;

    fn position(&self) -> SpadePoint2<f64> {
        self.position
    }
}

type Cdt = ConstrainedDelaunayTriangulation<SurveyVertex>;

/// Builds a TIN index from scattered points with a constrained Delaunay
/// triangulation.
///
/// Breakline segments and boundary rings become triangulation constraints.
/// When boundaries are given, only triangles whose centroid lies inside an
/// odd number of boundary rings are kept, so nested rings act as holes.
///
/// Coincident input points collapse into a single triangulation vertex
/// carrying the last z inserted; every input point is still indexed as a
/// [`TinPoint`]. A constraint segment that would cross one already added is
/// skipped with a warning, so the earlier breakline or boundary wins.
pub struct TriangulatePoints {
    points: Vec<TinPoint>,
    breaklines: Vec<TinBreakline>,
    boundaries: Vec<TinBoundary>,
    params: IndexParams,
}

impl TriangulatePoints {
    /// Creates a new `TriangulatePoints` operation with default parameters.
    #[must_use]
    pub fn new(points: Vec<TinPoint>) -> Self {
        Self {
            points,
            breaklines: Vec::new(),
            boundaries: Vec::new(),
            params: IndexParams::default(),
        }
    }

    #[must_use]
    pub fn with_breaklines(mut self, breaklines: Vec<TinBreakline>) -> Self {
        self.breaklines = breaklines;
        self
    }

    #[must_use]
    pub fn with_boundaries(mut self, boundaries: Vec<TinBoundary>) -> Self {
        self.boundaries = boundaries;
        self
    }

    #[must_use]
    pub fn with_params(mut self, params: IndexParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the triangulation, returning a frozen index holding the
    /// faces, the input points, breaklines and boundaries.
    ///
    /// # Errors
    ///
    /// Returns `TriangulationError::InsufficientPoints` for fewer than three
    /// distinct vertices, `TriangulationError::Failed` if no triangle can be
    /// formed, and index errors from populating the result.
    pub fn execute(&self) -> Result<InMemoryTinIndex> {
        let mut cdt = Cdt::new();
        for p in &self.points {
            insert_vertex(&mut cdt, *p)?;
        }
        for breakline in &self.breaklines {
            insert_constraint_run(&mut cdt, breakline.points(), false)?;
        }
        for boundary in &self.boundaries {
            insert_constraint_run(&mut cdt, boundary.points(), true)?;
        }

        if cdt.num_vertices() < 3 {
            return Err(TriangulationError::InsufficientPoints(cdt.num_vertices()).into());
        }

        let mut builder = InMemoryTinIndexBuilder::new(self.params)?;
        let mut skipped = 0_usize;
        for tri in cdt.inner_faces() {
            let [a, b, c] = tri.vertices().map(|v| {
                let data = v.data();
                TinPoint::new(data.position.x, data.position.y, data.z)
            });
            let face = match TinFace::new(a?, b?, c?) {
                Ok(face) => face,
                Err(e) => {
                    warn!(error = %e, "skipping degenerate triangle");
                    skipped += 1;
                    continue;
                }
            };
            if !self.inside_boundaries(&face) {
                continue;
            }
            builder.index_tin_face(face)?;
        }
        for p in &self.points {
            builder.index_tin_point(*p)?;
        }
        for breakline in &self.breaklines {
            builder.index_tin_breakline(breakline.clone());
        }
        for boundary in &self.boundaries {
            builder.index_tin_boundary(boundary.clone());
        }

        let index = builder.build();
        if index.face_count() == 0 {
            return Err(TriangulationError::Failed("no triangles formed".into()).into());
        }
        debug!(
            vertices = cdt.num_vertices(),
            constraints = cdt.num_constraints(),
            faces = index.face_count(),
            skipped,
            "triangulated TIN"
        );
        Ok(index)
    }

    fn inside_boundaries(&self, face: &TinFace) -> bool {
        if self.boundaries.is_empty() {
            return true;
        }
        let centroid = face.centroid_2d();
        let rings = self
            .boundaries
            .iter()
            .filter(|b| b.encloses(&centroid))
            .count();
        rings % 2 == 1
    }
}

fn insert_vertex(cdt: &mut Cdt, p: TinPoint) -> Result<FixedVertexHandle> {
    let vertex = SurveyVertex {
        position: SpadePoint2::new(p.xy().x, p.xy().y),
        z: p.z(),
    };
    cdt.insert(vertex)
        .map_err(|e: InsertionError| TriangulationError::Failed(format!("CDT insert: {e}")).into())
}

/// Inserts a vertex run and constrains each consecutive pair. Segments that
/// would cross an existing constraint are skipped.
fn insert_constraint_run(cdt: &mut Cdt, points: &[TinPoint], closed: bool) -> Result<()> {
    let mut handles = Vec::with_capacity(points.len());
    for &p in points {
        handles.push(insert_vertex(cdt, p)?);
    }

    let segments = if closed {
        handles.len()
    } else {
        handles.len().saturating_sub(1)
    };
    for i in 0..segments {
        let from = handles[i];
        let to = handles[(i + 1) % handles.len()];
        if from == to {
            continue;
        }
        if cdt.can_add_constraint(from, to) {
            cdt.add_constraint(from, to);
        } else {
            warn!(segment = i, "constraint crosses an existing constraint; skipped");
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::index::TinIndex;
    use crate::math::Point2;
    use approx::assert_relative_eq;

    fn pt(x: f64, y: f64, z: f64) -> TinPoint {
        TinPoint::new(x, y, z).unwrap()
    }

    /// Vertices on the line `x == y` of the faces left and right of it.
    fn rising_diagonal_vertices(index: &InMemoryTinIndex) -> [usize; 2] {
        [Point2::new(7.0, 3.0), Point2::new(3.0, 7.0)].map(|at| {
            let face = index
                .face(index.tin_face_at_location(at, 0.0).unwrap())
                .unwrap();
            face.vertices()
                .iter()
                .filter(|v| (v.xy().x - v.xy().y).abs() < 1e-12)
                .count()
        })
    }

    fn square() -> Vec<TinPoint> {
        vec![
            pt(0.0, 0.0, 0.0),
            pt(10.0, 0.0, 1.0),
            pt(10.0, 10.0, 2.0),
            pt(0.0, 10.0, 3.0),
        ]
    }

    #[test]
    fn triangulates_square_with_centre() {
        let mut points = square();
        points.push(pt(5.0, 5.0, 10.0));
        let index = TriangulatePoints::new(points).execute().unwrap();
        assert_eq!(index.face_count(), 4);
        assert_eq!(index.point_count(), 5);
        assert_relative_eq!(
            index.elevation_at(Point2::new(5.0, 5.0)).unwrap(),
            10.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn planar_surface_interpolates_exactly() {
        let mut points = Vec::new();
        for i in 0..6_u32 {
            for j in 0..5_u32 {
                let x = f64::from(i) * 2.0 + f64::from(j % 2) * 0.3;
                let y = f64::from(j) * 2.5;
                points.push(pt(x, y, 2.0 * x + y));
            }
        }
        let index = TriangulatePoints::new(points).execute().unwrap();
        for &(x, y) in &[(3.1, 4.2), (5.0, 5.0), (7.7, 1.3)] {
            let z = index.elevation_at(Point2::new(x, y)).unwrap();
            assert_relative_eq!(z, 2.0 * x + y, epsilon = 1e-9);
        }
    }

    #[test]
    fn breakline_forces_diagonal() {
        let breakline = TinBreakline::new(vec![pt(0.0, 0.0, 0.0), pt(10.0, 10.0, 2.0)]).unwrap();
        let index = TriangulatePoints::new(square())
            .with_breaklines(vec![breakline])
            .execute()
            .unwrap();
        assert_eq!(index.face_count(), 2);
        assert_eq!(index.breakline_count(), 1);
        assert_eq!(rising_diagonal_vertices(&index), [2, 2]);
    }

    #[test]
    fn crossing_breakline_is_skipped() {
        let rising = TinBreakline::new(vec![pt(0.0, 0.0, 0.0), pt(10.0, 10.0, 2.0)]).unwrap();
        let falling = TinBreakline::new(vec![pt(10.0, 0.0, 1.0), pt(0.0, 10.0, 3.0)]).unwrap();
        let index = TriangulatePoints::new(square())
            .with_breaklines(vec![rising, falling])
            .execute()
            .unwrap();
        assert_eq!(index.face_count(), 2);
        assert_eq!(index.breakline_count(), 2);
        assert_eq!(rising_diagonal_vertices(&index), [2, 2]);
    }

    #[test]
    fn duplicate_points_share_a_vertex() {
        let mut points = square();
        points.push(pt(10.0, 0.0, 1.0));
        let index = TriangulatePoints::new(points).execute().unwrap();
        assert_eq!(index.face_count(), 2);
        assert_eq!(index.point_count(), 5);
        let corner = index.tin_points_in_envelope(&crate::math::Envelope::new(
            Point2::new(9.5, -0.5),
            Point2::new(10.5, 0.5),
        ));
        assert_eq!(corner.len(), 2);
    }

    #[test]
    fn boundary_clips_triangles() {
        let mut points = square();
        points.push(pt(6.0, 2.0, 5.0));
        let boundary = TinBoundary::new(vec![
            pt(0.0, 0.0, 0.0),
            pt(10.0, 0.0, 1.0),
            pt(10.0, 10.0, 2.0),
        ])
        .unwrap();
        let index = TriangulatePoints::new(points)
            .with_boundaries(vec![boundary])
            .execute()
            .unwrap();
        assert_eq!(index.face_count(), 3);
        assert!(index.has_tin_face_at_location(Point2::new(8.0, 1.0), 0.0));
        assert!(!index.has_tin_face_at_location(Point2::new(1.0, 8.0), 0.0));
    }

    #[test]
    fn too_few_points() {
        let err = TriangulatePoints::new(vec![pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0)])
            .execute()
            .unwrap_err();
        assert!(matches!(
            err,
            crate::TinError::Triangulation(TriangulationError::InsufficientPoints(2))
        ));
    }

    #[test]
    fn collinear_points_fail() {
        let points = vec![pt(0.0, 0.0, 0.0), pt(1.0, 1.0, 0.0), pt(2.0, 2.0, 0.0)];
        assert!(TriangulatePoints::new(points).execute().is_err());
    }
}
