use super::{Point2, Point3, TOLERANCE};

/// Twice the signed area of triangle `(a, b, c)` projected onto the XY plane.
///
/// Positive when `c` lies to the left of `a -> b`.
#[must_use]
pub fn orient_2d(a: &Point3, b: &Point3, c: &Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Returns `true` if the XY footprint of `tri` has no usable area.
///
/// The doubled area is compared against the squared longest edge, so the
/// test does not depend on coordinate scale.
#[must_use]
pub fn is_degenerate_2d(tri: &[Point3; 3]) -> bool {
    let area = orient_2d(&tri[0], &tri[1], &tri[2].xy());
    let longest_sq = [(0, 1), (1, 2), (2, 0)]
        .iter()
        .map(|&(i, j)| (tri[j].xy() - tri[i].xy()).norm_squared())
        .fold(0.0, f64::max);
    longest_sq == 0.0 || area.abs() <= TOLERANCE * longest_sq
}

/// Barycentric weights of `p` with respect to the XY footprint of `tri`.
///
/// Returns `None` for a degenerate (zero-area) triangle.
#[must_use]
pub fn barycentric_2d(tri: &[Point3; 3], p: &Point2) -> Option<[f64; 3]> {
    if is_degenerate_2d(tri) {
        return None;
    }
    let area = orient_2d(&tri[0], &tri[1], &tri[2].xy());
    let w0 = orient_2d(&tri[1], &tri[2], p) / area;
    let w1 = orient_2d(&tri[2], &tri[0], p) / area;
    Some([w0, w1, 1.0 - w0 - w1])
}

/// Returns `true` if `p` lies inside or on the boundary of the XY footprint
/// of triangle `tri`, in either winding.
///
/// Boundary slack is `TOLERANCE` in barycentric units, so it shrinks with
/// the triangle. Degenerate triangles contain nothing.
#[must_use]
pub fn point_in_triangle_2d(tri: &[Point3; 3], p: &Point2) -> bool {
    barycentric_2d(tri, p).is_some_and(|w| w.iter().all(|&wi| wi >= -TOLERANCE))
}

/// Interpolates the z-value of the plane through `tri` at `p`.
#[must_use]
pub fn interpolate_z(tri: &[Point3; 3], p: &Point2) -> Option<f64> {
    let [w0, w1, w2] = barycentric_2d(tri, p)?;
    Some(w0 * tri[0].z + w1 * tri[1].z + w2 * tri[2].z)
}
