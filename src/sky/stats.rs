use std::fmt;

use super::Sky;
use crate::geometry::Geometry;

/// Minimum and maximum of a set of values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    fn of<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(Range { min: v, max: v }),
            Some(r) => Some(Range {
                min: r.min.min(v),
                max: r.max.max(v),
            }),
        })
    }
}

/// Summary of what a sky holds, for progress output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkyStats {
    pub stars: usize,
    pub constellations: usize,
    pub constellation_vertices: usize,
    pub grid_lines: usize,
    pub grid_vertices: usize,
    pub boundary_vertices: usize,
    pub x: Option<Range>,
    pub y: Option<Range>,
    pub magnitude: Option<Range>,
    pub color_index: Option<Range>,
}

impl SkyStats {
    pub fn from_sky(sky: &Sky) -> Self {
        let stars = sky.stars().unwrap_or_default();
        let constellations = sky.constellations().unwrap_or_default();

        Self {
            stars: stars.len(),
            constellations: constellations.len(),
            constellation_vertices: constellations.iter().map(|c| c.vertex_count()).sum(),
            grid_lines: sky.grid().map_or(0, |g| g.polylines().len()),
            grid_vertices: sky.grid().map_or(0, |g| g.vertex_count()),
            boundary_vertices: sky.boundary().map_or(0, |b| b.len()),
            x: stars.extents().map(|e| Range {
                min: e.min_x,
                max: e.max_x,
            }),
            y: stars.extents().map(|e| Range {
                min: e.min_y,
                max: e.max_y,
            }),
            magnitude: Range::of(stars.iter().map(|s| s.attributes.magnitude)),
            color_index: Range::of(stars.iter().map(|s| s.attributes.color_index)),
        }
    }
}

impl fmt::Display for SkyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stars: {}", self.stars)?;
        for (label, range) in [
            ("X/RA", self.x),
            ("Y/Dec", self.y),
            ("Mag", self.magnitude),
            ("B-V", self.color_index),
        ] {
            if let Some(r) = range {
                writeln!(f, "  {:<6} min ~{:.2}  max ~{:.2}", label, r.min, r.max)?;
            }
        }
        writeln!(
            f,
            "Constellations: {} ({} vertices)",
            self.constellations, self.constellation_vertices
        )?;
        writeln!(
            f,
            "Grid: {} lines ({} vertices)",
            self.grid_lines, self.grid_vertices
        )?;
        write!(f, "Boundary: {} vertices", self.boundary_vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Star;
    use crate::geometry::{MultiPolyline, Polyline};

    #[test]
    fn test_stats() {
        let sky = Sky::new()
            .with_stars(vec![
                Star::at("a", 0.0, -10.0, 1.5),
                Star::at("b", 20.0, 10.0, 4.0),
            ])
            .with_constellations(vec![MultiPolyline::named(
                "Ori",
                vec![Polyline::from_coords(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)])],
            )]);

        let stats = SkyStats::from_sky(&sky);
        assert_eq!(stats.stars, 2);
        assert_eq!(stats.constellations, 1);
        assert_eq!(stats.constellation_vertices, 3);
        assert_eq!(stats.grid_lines, 0);
        assert_eq!(stats.x, Some(Range { min: 0.0, max: 20.0 }));
        assert_eq!(stats.magnitude, Some(Range { min: 1.5, max: 4.0 }));

        let text = stats.to_string();
        assert!(text.contains("Stars: 2"));
        assert!(text.contains("Constellations: 1 (3 vertices)"));
    }

    #[test]
    fn test_stats_empty_sky() {
        let stats = SkyStats::from_sky(&Sky::new());
        assert_eq!(stats, SkyStats::default());
        assert!(!stats.to_string().contains("Mag"));
    }
}
