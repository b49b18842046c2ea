use crate::geometry::{Extents, Geometry, Point, Polyline};

/// Catalogue attributes carried alongside a star's position
///
/// The geometry pipeline never reads these except for the optional
/// magnitude and colour-index range checks while filtering. Renderers use
/// them for pad size and labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarAttributes {
    pub id: String,
    /// Apparent magnitude (smaller is brighter)
    pub magnitude: f64,
    /// B-V colour index, roughly -0.4 (blue) to 2.0 (red)
    pub color_index: f64,
    /// Proper designation, empty when the star has none
    pub designation: String,
    /// Parent constellation abbreviation
    pub constellation: String,
}

impl StarAttributes {
    pub fn has_designation(&self) -> bool {
        !self.designation.is_empty()
    }
}

/// A star: a position plus opaque attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub position: Point,
    pub attributes: StarAttributes,
}

impl Star {
    pub fn new(position: Point, attributes: StarAttributes) -> Self {
        Self {
            position,
            attributes,
        }
    }

    /// A star with only an id and magnitude, for tests and synthetic input
    pub fn at(id: impl Into<String>, lon: f64, lat: f64, magnitude: f64) -> Self {
        Self::new(
            Point::new(lon, lat),
            StarAttributes {
                id: id.into(),
                magnitude,
                ..StarAttributes::default()
            },
        )
    }

    /// Inside `boundary` and within the optional inclusive attribute ranges
    pub fn matches(
        &self,
        boundary: &Polyline,
        magnitudes: Option<(f64, f64)>,
        color_indices: Option<(f64, f64)>,
    ) -> bool {
        let in_range = |range: Option<(f64, f64)>, value: f64| {
            range.is_none_or(|(min, max)| min <= value && value <= max)
        };

        in_range(magnitudes, self.attributes.magnitude)
            && in_range(color_indices, self.attributes.color_index)
            && self.position.is_inside(boundary)
    }
}

impl Geometry for Star {
    fn try_map_points<E, F>(&mut self, f: &mut F) -> Result<(), E>
    where
        F: FnMut(Point) -> Result<Point, E>,
    {
        self.position = f(self.position)?;
        Ok(())
    }

    fn for_each_point<F: FnMut(Point)>(&self, f: &mut F) {
        f(self.position)
    }

    fn extents(&self) -> Option<Extents> {
        Some(Extents::at(self.position))
    }
}
