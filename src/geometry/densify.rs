use super::Point;
use crate::error::{GeometryError, GeometryResult};

/// Most points a single segment may be split into
pub const MAX_SEGMENT_POINTS: usize = 1 << 20;

/// Number of points wanted along a segment of length `distance`
///
/// Uses `f64::round`, so exact half-integer products round away from zero.
/// Non-positive or NaN products give zero.
///
/// # Errors
/// * `DensityOverflow` if the count exceeds [`MAX_SEGMENT_POINTS`]
pub fn segment_point_count(distance: f64, density: f64) -> GeometryResult<usize> {
    let count = (density * distance).round();
    if count.is_nan() || count <= 0.0 {
        return Ok(0);
    }
    if count > MAX_SEGMENT_POINTS as f64 {
        return Err(GeometryError::DensityOverflow { density, distance });
    }
    Ok(count as usize)
}

/// Insert evenly spaced points along each straight segment
///
/// For each consecutive pair `(a, b)`, `n = round(density * |ab|)`; when
/// `n > 2`, `n - 2` interior points are placed at fractions
/// `1/(n-1) .. (n-2)/(n-1)`. Existing vertices are kept exactly, so corners
/// stay sharp and the first and last vertex never move.
///
/// # Errors
/// * `DensityOverflow` if any segment would need more than
///   [`MAX_SEGMENT_POINTS`] points
pub fn densify(vertices: &[Point], density: f64) -> GeometryResult<Vec<Point>> {
    let Some((last, _)) = vertices.split_last() else {
        return Ok(Vec::new());
    };

    let mut result = Vec::with_capacity(vertices.len());

    for pair in vertices.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        result.push(a);

        let n = segment_point_count(a.distance(&b), density)?;
        if n > 2 {
            let divisions = (n - 1) as f64;
            result.extend((1..n - 1).map(|i| a.lerp(&b, i as f64 / divisions)));
        }
    }

    result.push(*last);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_point_count() {
        assert_eq!(segment_point_count(10.0, 1.0), Ok(10));
        assert_eq!(segment_point_count(2.5, 1.0), Ok(3));
        assert_eq!(segment_point_count(2.4, 1.0), Ok(2));
        assert_eq!(segment_point_count(10.0, 0.0), Ok(0));
        assert_eq!(segment_point_count(10.0, -1.0), Ok(0));
        assert_eq!(segment_point_count(10.0, f64::NAN), Ok(0));
    }

    #[test]
    fn test_densify_inserts_interior_points() {
        let line = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let result = densify(&line, 0.5).unwrap();

        // n = 5 -> 3 interior points at quarters
        assert_eq!(result.len(), 5);
        assert_eq!(result[1], Point::new(2.5, 0.0));
        assert_eq!(result[2], Point::new(5.0, 0.0));
        assert_eq!(result[3], Point::new(7.5, 0.0));
    }

    #[test]
    fn test_densify_short_segment_unchanged() {
        let line = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        assert_eq!(densify(&line, 1.0).unwrap(), line);
    }

    #[test]
    fn test_densify_preserves_corners_and_endpoints() {
        let line = vec![
            Point::new(0.3, 0.7),
            Point::new(10.1, 0.7),
            Point::new(10.1, -20.9),
            Point::new(-4.2, 3.3),
        ];

        for density in [0.1, 0.5, 1.0, 3.7, 10.0] {
            let result = densify(&line, density).unwrap();
            assert_eq!(result.first(), line.first());
            assert_eq!(result.last(), line.last());
            for corner in &line {
                assert!(result.contains(corner));
            }
        }
    }

    #[test]
    fn test_densify_points_lie_on_segment() {
        let line = vec![Point::new(0.0, 0.0), Point::new(6.0, 8.0)];
        let result = densify(&line, 2.0).unwrap();
        assert_eq!(result.len(), 20);
        for p in &result {
            assert!((p.y - p.x * 8.0 / 6.0).abs() < 1e-9);
        }
        for pair in result.windows(2) {
            assert!(pair[1].x > pair[0].x);
        }
    }

    #[test]
    fn test_densify_degenerate() {
        assert!(densify(&[], 1.0).unwrap().is_empty());
        let single = vec![Point::new(1.0, 2.0)];
        assert_eq!(densify(&single, 1.0).unwrap(), single);
    }

    #[test]
    fn test_huge_density_is_rejected() {
        let line = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let err = densify(&line, 1e300).unwrap_err();
        assert_eq!(
            err,
            GeometryError::DensityOverflow {
                density: 1e300,
                distance: 10.0
            }
        );
        assert!(segment_point_count(10.0, f64::INFINITY).is_err());

        // Right at the limit still works
        let limit = MAX_SEGMENT_POINTS as f64 / 10.0;
        assert_eq!(densify(&line, limit).unwrap().len(), MAX_SEGMENT_POINTS);
    }
}
