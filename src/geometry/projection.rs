use super::Point;
use crate::error::{GeometryError, GeometryResult};

/// Denominators below this are treated as the antipodal singularity
pub const SINGULARITY_EPSILON: f64 = 1e-10;

/// Stereographic projection from (lon, lat) degrees to the plane
///
/// The projection centre maps to the origin. For a point at (lon, lat):
/// - k = 2R / (1 + sin(lat_c)·sin(lat) + cos(lat_c)·cos(lat)·cos(lon − lon_c))
/// - x = k·cos(lat)·sin(lon − lon_c)
/// - y = k·(cos(lat_c)·sin(lat) − sin(lat_c)·cos(lat)·cos(lon − lon_c))
///
/// The mapping is conformal and 360° periodic in longitude, so positions
/// that were never unwrapped across the 0/360 seam still land correctly.
#[derive(Debug, Clone)]
pub struct StereographicProjector {
    center: Point,
    radius: f64,
    sin_lat_c: f64,
    cos_lat_c: f64,
}

impl StereographicProjector {
    /// Create a projector
    ///
    /// # Arguments
    /// * `center` - (lon, lat) projection centre in degrees
    /// * `radius` - reference sphere radius; scales the output linearly
    pub fn new(center: Point, radius: f64) -> Self {
        let lat_c = center.lat().to_radians();
        Self {
            center,
            radius,
            sin_lat_c: lat_c.sin(),
            cos_lat_c: lat_c.cos(),
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Project one angular position
    ///
    /// # Errors
    /// * `ProjectionSingularity` for the point antipodal to the centre
    /// * `NonFiniteCoordinate` if the input was not finite
    pub fn project(&self, p: Point) -> GeometryResult<Point> {
        let lat = p.lat().to_radians();
        let dlon = (p.lon() - self.center.lon()).to_radians();
        let (sin_lat, cos_lat) = lat.sin_cos();
        let cos_dlon = dlon.cos();

        let denominator = 1.0 + self.sin_lat_c * sin_lat + self.cos_lat_c * cos_lat * cos_dlon;
        if denominator.abs() < SINGULARITY_EPSILON {
            return Err(GeometryError::ProjectionSingularity {
                lon: p.lon(),
                lat: p.lat(),
            });
        }

        let k = 2.0 * self.radius / denominator;
        let projected = Point::new(
            k * cos_lat * dlon.sin(),
            k * (self.cos_lat_c * sin_lat - self.sin_lat_c * cos_lat * cos_dlon),
        );

        if !projected.is_finite() {
            return Err(GeometryError::NonFiniteCoordinate {
                lon: p.lon(),
                lat: p.lat(),
            });
        }

        Ok(projected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projector_center() {
        let proj = StereographicProjector::new(Point::new(83.6, -5.4), 100.0);
        let p = proj.project(Point::new(83.6, -5.4)).unwrap();
        assert!(p.x.abs() < 1e-9);
        assert!(p.y.abs() < 1e-9);
    }

    #[test]
    fn test_projector_known_values() {
        // On the equator with the centre at the origin, x = 2R·tan(dlon/2)
        let proj = StereographicProjector::new(Point::new(0.0, 0.0), 1.0);
        let p = proj.project(Point::new(90.0, 0.0)).unwrap();
        assert!((p.x - 2.0).abs() < 1e-12);
        assert!(p.y.abs() < 1e-12);

        let p = proj.project(Point::new(0.0, 90.0)).unwrap();
        assert!(p.x.abs() < 1e-12);
        assert!((p.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_projector_orientation() {
        let proj = StereographicProjector::new(Point::new(10.0, 5.0), 100.0);
        let east = proj.project(Point::new(20.0, 5.0)).unwrap();
        let north = proj.project(Point::new(10.0, 15.0)).unwrap();
        assert!(east.x > 0.0);
        assert!(north.y > 0.0);
    }

    #[test]
    fn test_projector_longitude_periodic() {
        let proj = StereographicProjector::new(Point::new(0.0, 20.0), 1.0);
        let a = proj.project(Point::new(5.0, 10.0)).unwrap();
        let b = proj.project(Point::new(365.0, 10.0)).unwrap();
        assert!((a.x - b.x).abs() < 1e-9);
        assert!((a.y - b.y).abs() < 1e-9);
    }

    #[test]
    fn test_projector_antipode_is_singular() {
        let proj = StereographicProjector::new(Point::new(0.0, 0.0), 1.0);
        let err = proj.project(Point::new(180.0, 0.0)).unwrap_err();
        assert_eq!(err, GeometryError::ProjectionSingularity { lon: 180.0, lat: 0.0 });

        let proj = StereographicProjector::new(Point::new(30.0, 40.0), 1.0);
        assert!(proj.project(Point::new(210.0, -40.0)).is_err());
    }
}
