use super::records::{LineCatalog, StarCatalog, StarFeature, identifier, number};
use crate::domain::{Star, StarAttributes};
use crate::geometry::{MultiPolyline, Point, Polyline};

/// Constellation assigned to stars whose record names none
pub const NO_CONSTELLATION: &str = "NONE";

/// Parse a star catalogue into domain stars
///
/// # Algorithm
/// 1. Skip records without two finite coordinates
/// 2. Default missing magnitude and colour index to 0.0
/// 3. Default missing ids to their record index
pub fn parse_stars(catalog: &StarCatalog) -> Vec<Star> {
    catalog
        .features
        .iter()
        .enumerate()
        .filter_map(|(index, feature)| parse_star(index, feature))
        .collect()
}

fn parse_star(index: usize, feature: &StarFeature) -> Option<Star> {
    let coords = &feature.geometry.as_ref()?.coordinates;
    let position = match coords.as_slice() {
        [lon, lat, ..] => Point::new(number(lon)?, number(lat)?),
        _ => return None,
    };

    let id = feature
        .id
        .as_ref()
        .and_then(identifier)
        .unwrap_or_else(|| format!("star-{}", index));

    let attributes = match &feature.properties {
        Some(props) => StarAttributes {
            id,
            magnitude: props.mag.as_ref().and_then(number).unwrap_or(0.0),
            color_index: props.bv.as_ref().and_then(number).unwrap_or(0.0),
            designation: props.desig.clone().unwrap_or_default(),
            constellation: props
                .con
                .clone()
                .unwrap_or_else(|| NO_CONSTELLATION.to_string()),
        },
        None => StarAttributes {
            id,
            constellation: NO_CONSTELLATION.to_string(),
            ..StarAttributes::default()
        },
    };

    Some(Star::new(position, attributes))
}

/// Parse constellation line records into named multi-polylines
///
/// Malformed vertices are dropped; lines left with fewer than two vertices
/// and constellations left with no lines are skipped.
pub fn parse_constellations(catalog: &LineCatalog) -> Vec<MultiPolyline> {
    let mut constellations = Vec::new();

    for (index, feature) in catalog.features.iter().enumerate() {
        let Some(geometry) = &feature.geometry else {
            continue;
        };

        let lines: Vec<Polyline> = geometry
            .coordinates
            .iter()
            .map(|line| {
                line.iter()
                    .filter_map(|pair| match pair.as_slice() {
                        [lon, lat, ..] => Some(Point::new(number(lon)?, number(lat)?)),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
            })
            .filter(|vertices| vertices.len() >= 2)
            .map(Polyline::new)
            .collect();

        if lines.is_empty() {
            continue;
        }

        let name = feature
            .id
            .as_ref()
            .and_then(identifier)
            .unwrap_or_else(|| format!("constellation-{}", index));

        constellations.push(MultiPolyline::named(name, lines));
    }

    constellations
}
