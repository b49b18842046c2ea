use super::Point;
use crate::error::{GeometryError, GeometryResult};

/// One-dimensional affine map from an input interval onto an output interval
///
/// Values outside the input interval map outside the output interval.
/// Giving either interval with `min > max` flips the orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearMap {
    in_min: f64,
    out_min: f64,
    factor: f64,
}

impl LinearMap {
    /// Build a map from `input = (min, max)` onto `output = (min, max)`
    ///
    /// # Errors
    /// * `DegenerateRange` if the input interval has zero width
    pub fn new(input: (f64, f64), output: (f64, f64)) -> GeometryResult<Self> {
        let (in_min, in_max) = input;
        let (out_min, out_max) = output;
        let in_width = in_max - in_min;

        if in_width == 0.0 || !in_width.is_finite() {
            return Err(GeometryError::DegenerateRange {
                min: in_min,
                max: in_max,
            });
        }

        Ok(Self {
            in_min,
            out_min,
            factor: (out_max - out_min) / in_width,
        })
    }

    pub fn apply(&self, value: f64) -> f64 {
        self.out_min + (value - self.in_min) * self.factor
    }

    /// Output units per input unit (negative when the map flips)
    pub fn factor(&self) -> f64 {
        self.factor
    }
}

/// Axis-aligned bounding box of a set of points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extents {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Extents {
    /// Extents covering a single point
    pub fn at(point: Point) -> Self {
        Self {
            min_x: point.x,
            max_x: point.x,
            min_y: point.y,
            max_y: point.y,
        }
    }

    /// Grow to include a point
    pub fn include(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.max_x = self.max_x.max(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_y = self.max_y.max(p.y);
    }

    /// Smallest extents covering both
    pub fn union(&self, other: &Extents) -> Extents {
        Extents {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Union of an arbitrary number of optional extents
    pub fn merge<I>(extents: I) -> Option<Extents>
    where
        I: IntoIterator<Item = Option<Extents>>,
    {
        extents
            .into_iter()
            .flatten()
            .reduce(|acc, e| acc.union(&e))
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Midpoint of both axes
    pub fn center(&self) -> Point {
        Point::new(
            self.min_x + self.width() / 2.0,
            self.min_y + self.height() / 2.0,
        )
    }

    /// Extent of the larger axis
    pub fn dominant_extent(&self) -> f64 {
        self.width().max(self.height())
    }
}

impl From<geo::Rect<f64>> for Extents {
    fn from(rect: geo::Rect<f64>) -> Self {
        let (min, max) = (rect.min(), rect.max());
        Self {
            min_x: min.x,
            max_x: max.x,
            min_y: min.y,
            max_y: max.y,
        }
    }
}

/// Centres and isotropically rescales coordinates into the [-1, 1] frame
///
/// Built once from a reference set of extents. The dominant axis of the
/// reference maps exactly onto [-1, 1]; the other axis gets the same scale
/// so aspect ratio and relative alignment of every group are preserved.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    map: LinearMap,
    centre: Point,
}

impl Normalizer {
    /// # Errors
    /// * `DegenerateRange` if the reference has zero extent on both axes
    pub fn from_extents(extents: &Extents) -> GeometryResult<Self> {
        let half = extents.dominant_extent() / 2.0;
        let map = LinearMap::new((-half, half), (-1.0, 1.0))?;

        Ok(Self {
            map,
            centre: extents.center(),
        })
    }

    pub fn normalize(&self, p: Point) -> Point {
        p.translate_scale(&self.map, self.centre)
    }

    pub fn centre(&self) -> Point {
        self.centre
    }

    /// Output units per input unit
    pub fn scale_factor(&self) -> f64 {
        self.map.factor()
    }
}
