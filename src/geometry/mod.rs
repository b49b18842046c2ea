pub mod densify;
pub mod point;
pub mod polyline;
pub mod projection;
pub mod region;
pub mod scaling;

use std::convert::Infallible;

pub use densify::densify;
pub use point::Point;
pub use polyline::{MultiPolyline, Polyline};
pub use projection::StereographicProjector;
pub use scaling::{Extents, LinearMap, Normalizer};

/// Anything made of coordinates that the pipeline can transform uniformly
pub trait Geometry {
    /// Replace every coordinate with `f(coordinate)`, stopping at the first error
    ///
    /// Coordinates visited before the error keep their new values.
    fn try_map_points<E, F>(&mut self, f: &mut F) -> Result<(), E>
    where
        F: FnMut(Point) -> Result<Point, E>;

    fn for_each_point<F: FnMut(Point)>(&self, f: &mut F);

    fn map_points<F: FnMut(Point) -> Point>(&mut self, mut f: F)
    where
        Self: Sized,
    {
        let result: Result<(), Infallible> = self.try_map_points(&mut |p| Ok(f(p)));
        match result {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    /// Bounding box of every coordinate, None when there are none
    fn extents(&self) -> Option<Extents> {
        let mut extents: Option<Extents> = None;
        self.for_each_point(&mut |p| match extents.as_mut() {
            Some(e) => e.include(p),
            None => extents = Some(Extents::at(p)),
        });
        extents
    }
}

impl<T: Geometry> Geometry for [T] {
    fn try_map_points<E, F>(&mut self, f: &mut F) -> Result<(), E>
    where
        F: FnMut(Point) -> Result<Point, E>,
    {
        for item in self.iter_mut() {
            item.try_map_points(f)?;
        }
        Ok(())
    }

    fn for_each_point<F: FnMut(Point)>(&self, f: &mut F) {
        for item in self {
            item.for_each_point(f);
        }
    }

    fn extents(&self) -> Option<Extents> {
        Extents::merge(self.iter().map(Geometry::extents))
    }
}
