//! Point-in-region membership with longitude wraparound
//!
//! Catalogue longitudes are not guaranteed to be unwrapped across the
//! 0/360 seam, so a position is tested at `lon`, `lon - 360` and `lon + 360`
//! and counts as inside if any of the three lands inside the boundary.

use super::{Point, Polyline};

/// Longitude period in degrees
pub const LONGITUDE_PERIOD: f64 = 360.0;

/// Seam-aware membership test
///
/// Returns false for every point when `boundary` is not closed.
pub fn contains(boundary: &Polyline, point: Point) -> bool {
    if !boundary.is_closed() {
        return false;
    }

    [0.0, -LONGITUDE_PERIOD, LONGITUDE_PERIOD]
        .iter()
        .any(|offset| ray_cast(boundary.vertices(), Point::new(point.x + offset, point.y)))
}

/// Single-candidate even-odd ray casting test
///
/// Casts a horizontal ray from `point` and toggles on every edge crossing.
/// Horizontal edges never satisfy the straddle condition, so the
/// intersection division is never by zero.
pub fn ray_cast(vertices: &[Point], point: Point) -> bool {
    let Some(last) = vertices.last() else {
        return false;
    };

    let mut inside = false;
    let mut previous = last;

    for current in vertices {
        let straddles = (current.y > point.y) != (previous.y > point.y);
        if straddles {
            let crossing_x = (previous.x - current.x) * (point.y - current.y)
                / (previous.y - current.y)
                + current.x;
            if point.x < crossing_x {
                inside = !inside;
            }
        }
        previous = current;
    }

    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rectangle(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Polyline {
        Polyline::from_coords(&[
            (min_x, min_y),
            (min_x, max_y),
            (max_x, max_y),
            (max_x, min_y),
            (min_x, min_y),
        ])
    }

    #[test]
    fn test_contains_simple() {
        let square = rectangle(-5.0, 25.0, -5.0, 15.0);
        assert!(contains(&square, Point::new(0.0, 0.0)));
        assert!(contains(&square, Point::new(20.0, 0.0)));
        assert!(!contains(&square, Point::new(30.0, 0.0)));
        assert!(!contains(&square, Point::new(10.0, 20.0)));
    }

    #[test]
    fn test_contains_concave() {
        // An L shape: the notch at the top right is outside
        let l_shape = Polyline::from_coords(&[
            (0.0, 0.0),
            (0.0, 10.0),
            (5.0, 10.0),
            (5.0, 5.0),
            (10.0, 5.0),
            (10.0, 0.0),
            (0.0, 0.0),
        ]);
        assert!(contains(&l_shape, Point::new(2.0, 8.0)));
        assert!(contains(&l_shape, Point::new(8.0, 2.0)));
        assert!(!contains(&l_shape, Point::new(8.0, 8.0)));
    }

    #[test]
    fn test_contains_across_seam() {
        let region = rectangle(350.0, 370.0, -10.0, 10.0);
        let point = Point::new(5.0, 0.0);

        // A single-longitude test misses it
        assert!(!ray_cast(region.vertices(), point));
        assert!(contains(&region, point));

        assert!(contains(&region, Point::new(355.0, 0.0)));
        assert!(!contains(&region, Point::new(15.0, 0.0)));
        assert!(!contains(&region, Point::new(5.0, 20.0)));
    }

    #[test]
    fn test_contains_negative_longitudes() {
        let region = rectangle(-10.0, 10.0, -10.0, 10.0);
        assert!(contains(&region, Point::new(355.0, 0.0)));
        assert!(contains(&region, Point::new(-355.0, 0.0)));
        assert!(!contains(&region, Point::new(180.0, 0.0)));
    }

    #[test]
    fn test_open_boundary_contains_nothing() {
        let open = Polyline::from_coords(&[(-5.0, -5.0), (-5.0, 15.0), (25.0, 15.0), (25.0, -5.0)]);
        assert!(!open.is_closed());
        assert!(!contains(&open, Point::new(0.0, 0.0)));
        assert!(!contains(&Polyline::default(), Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_ray_cast_empty() {
        assert!(!ray_cast(&[], Point::new(0.0, 0.0)));
    }
}
