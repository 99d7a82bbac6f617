use super::{Point2, Point3};

/// Even-odd test of `p` against the XY footprint of a ring.
///
/// Points exactly on the ring may fall on either side.
#[must_use]
pub fn point_in_ring_2d(p: &Point2, ring: &[Point3]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (&ring[i], &ring[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
