use super::projection::StereographicProjector;
use super::region;
use super::scaling::LinearMap;
use super::{Geometry, Polyline};
use crate::error::GeometryResult;

/// A coordinate pair
///
/// Before projection `x` is longitude (right ascension) and `y` is latitude
/// (declination), both in degrees. After projection they are planar.
/// Coordinates are stored exactly as given; longitudes are never wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Longitude in degrees (only meaningful before projection)
    pub fn lon(&self) -> f64 {
        self.x
    }

    /// Latitude in degrees (only meaningful before projection)
    pub fn lat(&self) -> f64 {
        self.y
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Straight-line distance in the current units
    pub fn distance(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Linear interpolation towards `other`, independently on each axis
    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Replace each coordinate `c` with `map(c - origin.c)`
    ///
    /// The same map is used on both axes, so the aspect ratio is preserved.
    pub fn translate_scale(&self, map: &LinearMap, origin: Point) -> Point {
        Point::new(map.apply(self.x - origin.x), map.apply(self.y - origin.y))
    }

    /// Stereographic projection of this angular position
    pub fn project(&self, projector: &StereographicProjector) -> GeometryResult<Point> {
        projector.project(*self)
    }

    /// Whether this position falls inside `boundary`, seam-aware
    pub fn is_inside(&self, boundary: &Polyline) -> bool {
        region::contains(boundary, *self)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for geo::Coord<f64> {
    fn from(p: Point) -> Self {
        geo::coord! { x: p.x, y: p.y }
    }
}

impl From<geo::Coord<f64>> for Point {
    fn from(c: geo::Coord<f64>) -> Self {
        Self { x: c.x, y: c.y }
    }
}

impl Geometry for Point {
    fn try_map_points<E, F>(&mut self, f: &mut F) -> Result<(), E>
    where
        F: FnMut(Point) -> Result<Point, E>,
    {
        *self = f(*self)?;
        Ok(())
    }

    fn for_each_point<F: FnMut(Point)>(&self, f: &mut F) {
        f(*self)
    }
}
