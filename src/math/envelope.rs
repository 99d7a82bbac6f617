use rstar::AABB;

use super::{Point2, Point3};
use crate::error::{IndexError, Result};

/// An axis-aligned 2D bounding box.
///
/// Bounds are closed: an envelope that only touches another along an edge or
/// a corner still intersects it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    /// Minimum corner.
    pub min: Point2,
    /// Maximum corner.
    pub max: Point2,
}

impl Envelope {
    /// Creates an envelope from two opposite corners in any order.
    #[must_use]
    pub fn new(a: Point2, b: Point2) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Creates the square envelope of side `2 * radius` centred on `center`.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidInput` if `radius` is negative or not finite.
    pub fn around(center: Point2, radius: f64) -> Result<Self> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(IndexError::InvalidInput(format!("search radius {radius}")).into());
        }
        Ok(Self {
            min: Point2::new(center.x - radius, center.y - radius),
            max: Point2::new(center.x + radius, center.y + radius),
        })
    }

    /// Returns the smallest envelope covering the XY footprint of `points`,
    /// or `None` for an empty slice.
    #[must_use]
    pub fn of_points(points: &[Point3]) -> Option<Self> {
        let first = points.first()?;
        let mut env = Self {
            min: first.xy(),
            max: first.xy(),
        };
        for p in &points[1..] {
            env.expand_to(p.xy());
        }
        Some(env)
    }

    /// Grows the envelope to include `p`.
    pub fn expand_to(&mut self, p: Point2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Returns `true` if the two closed boxes share at least one point.
    #[must_use]
    pub fn intersects(&self, other: &Envelope) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    pub(crate) fn to_aabb(self) -> AABB<[f64; 2]> {
        AABB::from_corners([self.min.x, self.min.y], [self.max.x, self.max.y])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn env(x0: f64, y0: f64, x1: f64, y1: f64) -> Envelope {
        Envelope::new(Point2::new(x0, y0), Point2::new(x1, y1))
    }

    #[test]
    fn new_orders_corners() {
        let e = env(5.0, 1.0, 0.0, 3.0);
        assert_eq!(e.min, Point2::new(0.0, 1.0));
        assert_eq!(e.max, Point2::new(5.0, 3.0));
    }

    #[test]
    fn around_builds_square() {
        let e = Envelope::around(Point2::new(5.0, 3.0), 1.0).unwrap();
        assert_eq!(e, env(4.0, 2.0, 6.0, 4.0));
    }

    #[test]
    fn around_rejects_negative_radius() {
        assert!(Envelope::around(Point2::new(0.0, 0.0), -1.0).is_err());
        assert!(Envelope::around(Point2::new(0.0, 0.0), f64::NAN).is_err());
    }

    #[test]
    fn touching_envelopes_intersect() {
        let a = env(0.0, 0.0, 1.0, 1.0);
        assert!(a.intersects(&env(1.0, 1.0, 2.0, 2.0)));
        assert!(a.intersects(&env(0.5, -1.0, 0.6, 0.0)));
        assert!(!a.intersects(&env(1.01, 0.0, 2.0, 1.0)));
    }

    #[test]
    fn of_points_covers_all() {
        let pts = [
            Point3::new(1.0, 5.0, 0.0),
            Point3::new(-2.0, 3.0, 9.0),
            Point3::new(4.0, -1.0, 2.0),
        ];
        let e = Envelope::of_points(&pts).unwrap();
        assert_eq!(e, env(-2.0, -1.0, 4.0, 5.0));
        assert!(Envelope::of_points(&[]).is_none());
    }
}
