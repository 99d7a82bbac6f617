use super::point::TinPoint;
use crate::elevation::{ElevationSpec, HasElevation};
use crate::error::{GeometryError, Result};
use crate::math::polygon_2d::point_in_ring_2d;
use crate::math::{Envelope, Point2, Point3};

slotmap::new_key_type! {
    /// Unique identifier for a breakline in a TIN index.
    pub struct BreaklineId;
}

slotmap::new_key_type! {
    /// Unique identifier for a boundary in a TIN index.
    pub struct BoundaryId;
}

/// Ordered vertex run shared by breaklines and boundaries.
#[derive(Debug, Clone)]
struct Polyline {
    points: Vec<TinPoint>,
    envelope: Envelope,
    low: f64,
    high: f64,
}

impl Polyline {
    fn new(points: Vec<TinPoint>, min_points: usize, kind: &str) -> Result<Self> {
        let positions: Vec<Point3> = points.iter().map(TinPoint::position).collect();
        let envelope = match Envelope::of_points(&positions) {
            Some(env) if points.len() >= min_points => env,
            _ => {
                return Err(GeometryError::Degenerate(format!(
                    "{kind} needs at least {min_points} points, got {}",
                    points.len()
                ))
                .into())
            }
        };
        let low = points.iter().map(TinPoint::z).fold(f64::INFINITY, f64::min);
        let high = points.iter().map(TinPoint::z).fold(f64::NEG_INFINITY, f64::max);
        Ok(Self {
            points,
            envelope,
            low,
            high,
        })
    }

    fn elevation(&self) -> ElevationSpec {
        ElevationSpec::Range {
            low: self.low,
            high: self.high,
        }
    }
}

/// A constraint polyline that triangle edges must follow.
#[derive(Debug, Clone)]
pub struct TinBreakline {
    line: Polyline,
}

impl TinBreakline {
    /// Creates a breakline from an ordered point run.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for fewer than two points.
    pub fn new(points: Vec<TinPoint>) -> Result<Self> {
        Ok(Self {
            line: Polyline::new(points, 2, "breakline")?,
        })
    }

    #[must_use]
    pub fn points(&self) -> &[TinPoint] {
        &self.line.points
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        self.line.envelope
    }
}

impl HasElevation for TinBreakline {
    fn elevation(&self) -> ElevationSpec {
        self.line.elevation()
    }
}

/// The outer (or inner) limit of a TIN surface, as a ring.
///
/// The ring is implicitly closed; repeating the first point at the end is
/// allowed but not required.
#[derive(Debug, Clone)]
pub struct TinBoundary {
    line: Polyline,
}

impl TinBoundary {
    /// Creates a boundary ring.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for fewer than three points.
    pub fn new(points: Vec<TinPoint>) -> Result<Self> {
        Ok(Self {
            line: Polyline::new(points, 3, "boundary")?,
        })
    }

    #[must_use]
    pub fn points(&self) -> &[TinPoint] {
        &self.line.points
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        self.line.envelope
    }

    /// Even-odd containment of `p` in the ring footprint.
    #[must_use]
    pub fn encloses(&self, p: &Point2) -> bool {
        let ring: Vec<Point3> = self.line.points.iter().map(TinPoint::position).collect();
        point_in_ring_2d(p, &ring)
    }
}

impl HasElevation for TinBoundary {
    fn elevation(&self) -> ElevationSpec {
        self.line.elevation()
    }
}
