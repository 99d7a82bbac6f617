use crate::elevation::{ElevationSpec, HasElevation};
use crate::error::{GeometryError, Result};
use crate::math::{Point2, Point3};

slotmap::new_key_type! {
    /// Unique identifier for a point in a TIN index.
    pub struct PointId;
}

/// A TIN vertex. Identity is positional.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TinPoint {
    position: Point3,
}

impl TinPoint {
    /// Creates a point at `(x, y, z)`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` if any coordinate is NaN or infinite.
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self> {
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            return Err(GeometryError::NonFinite { x, y, z }.into());
        }
        Ok(Self {
            position: Point3::new(x, y, z),
        })
    }

    /// Creates a point from an existing position.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` if any coordinate is NaN or infinite.
    pub fn from_point(p: Point3) -> Result<Self> {
        Self::new(p.x, p.y, p.z)
    }

    #[must_use]
    pub fn position(&self) -> Point3 {
        self.position
    }

    #[must_use]
    pub fn xy(&self) -> Point2 {
        self.position.xy()
    }

    #[must_use]
    pub fn z(&self) -> f64 {
        self.position.z
    }
}

impl HasElevation for TinPoint {
    fn elevation(&self) -> ElevationSpec {
        ElevationSpec::Primary(self.position.z)
    }
}
