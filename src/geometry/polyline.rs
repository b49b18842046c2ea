use geo::{BoundingRect, LineString};

use super::densify::densify;
use super::{Extents, Geometry, Point};
use crate::error::GeometryResult;

/// An ordered sequence of vertices forming a line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    vertices: Vec<Point>,
}

impl Polyline {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    pub fn from_coords(coords: &[(f64, f64)]) -> Self {
        Self::new(coords.iter().copied().map(Point::from).collect())
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn into_vertices(self) -> Vec<Point> {
        self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Empty or single-vertex lines carry no extent
    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < 2
    }

    /// At least 3 vertices and the first is exactly equal to the last
    pub fn is_closed(&self) -> bool {
        match (self.vertices.first(), self.vertices.last()) {
            (Some(first), Some(last)) => self.vertices.len() >= 3 && first == last,
            _ => false,
        }
    }

    /// Bounding box, or None for degenerate lines
    pub fn extents(&self) -> Option<Extents> {
        if self.is_degenerate() {
            return None;
        }
        self.to_line_string().bounding_rect().map(Extents::from)
    }

    /// Replace the vertices with a densified sequence, see [`densify`]
    pub fn densify(&mut self, density: f64) -> GeometryResult<()> {
        self.vertices = densify(&self.vertices, density)?;
        Ok(())
    }

    /// Drop every vertex outside `boundary`
    pub fn retain_inside(&mut self, boundary: &Polyline) {
        self.vertices.retain(|v| v.is_inside(boundary));
    }

    /// Consecutive vertex pairs, for renderers drawing straight segments
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.vertices.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn to_line_string(&self) -> LineString<f64> {
        self.vertices.iter().map(|&p| geo::Coord::from(p)).collect()
    }
}

impl From<Vec<Point>> for Polyline {
    fn from(vertices: Vec<Point>) -> Self {
        Self::new(vertices)
    }
}

impl Geometry for Polyline {
    fn try_map_points<E, F>(&mut self, f: &mut F) -> Result<(), E>
    where
        F: FnMut(Point) -> Result<Point, E>,
    {
        for v in &mut self.vertices {
            *v = f(*v)?;
        }
        Ok(())
    }

    fn for_each_point<F: FnMut(Point)>(&self, f: &mut F) {
        self.vertices.iter().copied().for_each(f)
    }

    fn extents(&self) -> Option<Extents> {
        Polyline::extents(self)
    }
}

/// A collection of independent polylines, e.g. a constellation or a grid
///
/// Optionally named. The centroid is the centre of the collection's
/// extents and is refreshed whenever the geometry changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiPolyline {
    name: Option<String>,
    polylines: Vec<Polyline>,
    centroid: Option<Point>,
}

impl MultiPolyline {
    pub fn new(polylines: Vec<Polyline>) -> Self {
        let mut multi = Self {
            name: None,
            polylines,
            centroid: None,
        };
        multi.refresh_centroid();
        multi
    }

    pub fn named(name: impl Into<String>, polylines: Vec<Polyline>) -> Self {
        let mut multi = Self::new(polylines);
        multi.name = Some(name.into());
        multi
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn polylines(&self) -> &[Polyline] {
        &self.polylines
    }

    pub fn centroid(&self) -> Option<Point> {
        self.centroid
    }

    /// True while at least one child line remains
    pub fn is_populated(&self) -> bool {
        !self.polylines.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.polylines.iter().map(Polyline::len).sum()
    }

    /// Union of the children's extents, ignoring degenerate children
    pub fn extents(&self) -> Option<Extents> {
        Extents::merge(self.polylines.iter().map(Polyline::extents))
    }

    pub fn densify(&mut self, density: f64) -> GeometryResult<()> {
        for line in &mut self.polylines {
            line.densify(density)?;
        }
        self.refresh_centroid();
        Ok(())
    }

    /// Drop vertices outside `boundary`, then drop lines left empty
    pub fn retain_inside(&mut self, boundary: &Polyline) {
        for line in &mut self.polylines {
            line.retain_inside(boundary);
        }
        self.polylines.retain(|line| !line.is_empty());
        self.refresh_centroid();
    }

    fn refresh_centroid(&mut self) {
        self.centroid = self.extents().map(|e| e.center());
    }
}

impl Geometry for MultiPolyline {
    fn try_map_points<E, F>(&mut self, f: &mut F) -> Result<(), E>
    where
        F: FnMut(Point) -> Result<Point, E>,
    {
        for line in &mut self.polylines {
            line.try_map_points(f)?;
        }
        self.refresh_centroid();
        Ok(())
    }

    fn for_each_point<F: FnMut(Point)>(&self, f: &mut F) {
        for line in &self.polylines {
            line.for_each_point(f);
        }
    }

    fn extents(&self) -> Option<Extents> {
        MultiPolyline::extents(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polyline {
        Polyline::from_coords(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0), (0.0, 0.0)])
    }

    #[test]
    fn test_is_closed() {
        let mut line = square();
        assert!(line.is_closed());

        line.vertices[4] = Point::new(0.0, 1e-12);
        assert!(!line.is_closed());
    }

    #[test]
    fn test_is_closed_needs_three_vertices() {
        assert!(!Polyline::from_coords(&[(1.0, 1.0), (1.0, 1.0)]).is_closed());
        assert!(Polyline::from_coords(&[(1.0, 1.0), (2.0, 2.0), (1.0, 1.0)]).is_closed());
        assert!(!Polyline::default().is_closed());
    }

    #[test]
    fn test_extents() {
        let extents = square().extents().unwrap();
        assert_eq!(extents.min_x, 0.0);
        assert_eq!(extents.max_x, 1.0);
        assert_eq!(extents.max_y, 1.0);

        assert!(Polyline::from_coords(&[(5.0, 5.0)]).extents().is_none());
    }

    #[test]
    fn test_retain_inside() {
        let boundary = Polyline::from_coords(&[
            (-5.0, -5.0),
            (-5.0, 5.0),
            (5.0, 5.0),
            (5.0, -5.0),
            (-5.0, -5.0),
        ]);
        let mut line = Polyline::from_coords(&[(0.0, 0.0), (10.0, 0.0), (1.0, 1.0)]);
        line.retain_inside(&boundary);
        assert_eq!(line.vertices(), &[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
    }

    #[test]
    fn test_multi_retain_drops_empty_children() {
        let boundary = Polyline::from_coords(&[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0), (0.0, 0.0)]);
        let mut multi = MultiPolyline::named(
            "Ori",
            vec![
                Polyline::from_coords(&[(1.0, 1.0), (1.5, 1.5)]),
                Polyline::from_coords(&[(10.0, 10.0), (11.0, 11.0)]),
            ],
        );
        multi.retain_inside(&boundary);

        assert_eq!(multi.polylines().len(), 1);
        assert!(multi.is_populated());
        assert_eq!(multi.centroid(), Some(Point::new(1.25, 1.25)));

        let mut outside = MultiPolyline::new(vec![Polyline::from_coords(&[(10.0, 10.0)])]);
        outside.retain_inside(&boundary);
        assert!(!outside.is_populated());
        assert_eq!(outside.centroid(), None);
    }

    #[test]
    fn test_multi_extents_ignore_degenerate_children() {
        let multi = MultiPolyline::new(vec![
            Polyline::from_coords(&[(0.0, 0.0), (2.0, 4.0)]),
            Polyline::from_coords(&[(100.0, 100.0)]),
        ]);
        let extents = multi.extents().unwrap();
        assert_eq!(extents.max_x, 2.0);
        assert_eq!(extents.max_y, 4.0);
        assert_eq!(multi.centroid(), Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn test_map_points_refreshes_centroid() {
        let mut multi = MultiPolyline::new(vec![Polyline::from_coords(&[(0.0, 0.0), (2.0, 2.0)])]);
        multi.map_points(|p| Point::new(p.x + 10.0, p.y));
        assert_eq!(multi.centroid(), Some(Point::new(11.0, 1.0)));
    }

    #[test]
    fn test_densify_keeps_endpoints() {
        let mut line = square();
        line.densify(4.0).unwrap();
        assert!(line.len() > 5);
        assert_eq!(line.vertices().first(), Some(&Point::new(0.0, 0.0)));
        assert_eq!(line.vertices().last(), Some(&Point::new(0.0, 0.0)));
        assert!(line.is_closed());
    }
}
