use crate::geometry::Polyline;

/// Conditions a sky is filtered against
///
/// Star attribute ranges are inclusive and only checked when set.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionFilter {
    pub boundary: Polyline,
    pub magnitudes: Option<(f64, f64)>,
    pub color_indices: Option<(f64, f64)>,
}

impl RegionFilter {
    pub fn new(boundary: Polyline) -> Self {
        Self {
            boundary,
            magnitudes: None,
            color_indices: None,
        }
    }

    pub fn with_magnitudes(mut self, min: f64, max: f64) -> Self {
        self.magnitudes = Some((min, max));
        self
    }

    pub fn with_color_indices(mut self, min: f64, max: f64) -> Self {
        self.color_indices = Some((min, max));
        self
    }
}
