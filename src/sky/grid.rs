//! Synthesised right-ascension / declination grids

use serde::Deserialize;

use crate::error::{GeometryError, GeometryResult};
use crate::geometry::{MultiPolyline, Point, Polyline};

/// Full length of a cross arm in degrees
const CROSS_SIZE: f64 = 1.0;

/// Degrees between consecutive vertices of a meridian or parallel
const LINE_STEP: f64 = 1.0;

/// Grid rendering style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GridStyle {
    /// Full meridians and parallels
    #[default]
    Lines,
    /// Small crosses at every intersection, like old survey plates
    Crosses,
}

/// Build a grid with lines every `spacing` degrees
///
/// # Errors
/// * `DegenerateRange` if `spacing` is not a positive finite number
pub fn build_grid(spacing: f64, style: GridStyle) -> GeometryResult<MultiPolyline> {
    if !(spacing.is_finite() && spacing > 0.0) {
        return Err(GeometryError::DegenerateRange {
            min: 0.0,
            max: spacing,
        });
    }

    let lines = match style {
        GridStyle::Lines => meridians_and_parallels(spacing),
        GridStyle::Crosses => crosses(spacing),
    };

    Ok(MultiPolyline::named("grid", lines))
}

/// Values from `min` to `max` stepping by `step`, inclusive of both ends
/// when the range divides evenly
fn steps(min: f64, max: f64, step: f64) -> impl Iterator<Item = f64> {
    let count = ((max - min) / step + 1e-9).floor() as usize;
    (0..=count).map(move |i| min + i as f64 * step)
}

/// Meridians and parallels with a vertex every [`LINE_STEP`] degrees
///
/// Region filtering works on vertices, so a line needs vertices inside a
/// region to survive it.
fn meridians_and_parallels(spacing: f64) -> Vec<Polyline> {
    let meridians = steps(-180.0, 180.0, spacing).map(|lon| {
        Polyline::new(
            steps(-90.0, 90.0, LINE_STEP)
                .map(|lat| Point::new(lon, lat))
                .collect(),
        )
    });
    let parallels = steps(-90.0, 90.0, spacing).map(|lat| {
        Polyline::new(
            steps(-180.0, 180.0, LINE_STEP)
                .map(|lon| Point::new(lon, lat))
                .collect(),
        )
    });

    meridians.chain(parallels).collect()
}

fn crosses(spacing: f64) -> Vec<Polyline> {
    let mut lines = Vec::new();
    for lon in steps(-360.0, 360.0, spacing) {
        for lat in steps(-90.0, 90.0, spacing) {
            let (horizontal, vertical) = cross_at(Point::new(lon, lat), CROSS_SIZE);
            lines.push(horizontal);
            lines.push(vertical);
        }
    }
    lines
}

/// Two four-vertex arms centred on `at` with total extent `size`
fn cross_at(at: Point, size: f64) -> (Polyline, Polyline) {
    let offsets = [-size / 2.0, -size / 8.0, size / 8.0, size / 2.0];

    let horizontal = offsets.iter().map(|d| Point::new(at.x + d, at.y)).collect();
    let vertical = offsets.iter().map(|d| Point::new(at.x, at.y + d)).collect();

    (Polyline::new(horizontal), Polyline::new(vertical))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_grid_counts() {
        let grid = build_grid(30.0, GridStyle::Lines).unwrap();
        // 13 meridians (-180..=180) + 7 parallels (-90..=90)
        assert_eq!(grid.polylines().len(), 20);
        assert_eq!(grid.name(), Some("grid"));

        let first = &grid.polylines()[0];
        assert_eq!(first.len(), 181);
        assert_eq!(first.vertices().first(), Some(&Point::new(-180.0, -90.0)));
        assert_eq!(first.vertices().last(), Some(&Point::new(-180.0, 90.0)));
        assert_eq!(first.vertices()[90], Point::new(-180.0, 0.0));

        let last = grid.polylines().last().unwrap();
        assert_eq!(last.len(), 361);
        assert_eq!(last.vertices().first(), Some(&Point::new(-180.0, 90.0)));
        assert_eq!(last.vertices().last(), Some(&Point::new(180.0, 90.0)));
    }

    #[test]
    fn test_uneven_spacing_stops_inside_range() {
        let grid = build_grid(100.0, GridStyle::Lines).unwrap();
        // Meridians at -180, -80, 20, 120; parallels at -90, 10
        assert_eq!(grid.polylines().len(), 6);
    }

    #[test]
    fn test_crosses_grid() {
        let grid = build_grid(90.0, GridStyle::Crosses).unwrap();
        // 9 longitudes x 3 latitudes, two arms each
        assert_eq!(grid.polylines().len(), 54);
        assert!(grid.polylines().iter().all(|arm| arm.len() == 4));

        let extents = grid.polylines()[0].extents().unwrap();
        assert_eq!(extents.width(), CROSS_SIZE);
    }

    #[test]
    fn test_invalid_spacing() {
        assert!(build_grid(0.0, GridStyle::Lines).is_err());
        assert!(build_grid(-15.0, GridStyle::Crosses).is_err());
        assert!(build_grid(f64::NAN, GridStyle::Lines).is_err());
    }
}
