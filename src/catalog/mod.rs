//! Catalogue loading: JSON files in, domain geometry out

pub mod parser;
pub mod records;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::domain::Star;
use crate::geometry::MultiPolyline;

pub use parser::{parse_constellations, parse_stars};
pub use records::{LineCatalog, StarCatalog};

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalogue: {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse catalogue JSON: {}", path.display()))
}

/// Load stars from a GeoJSON-style star catalogue
pub fn load_stars(path: &Path) -> Result<Vec<Star>> {
    let catalog: StarCatalog = read_json(path)?;
    Ok(parse_stars(&catalog))
}

/// Load constellation lines from a multi-line catalogue
pub fn load_constellations(path: &Path) -> Result<Vec<MultiPolyline>> {
    let catalog: LineCatalog = read_json(path)?;
    Ok(parse_constellations(&catalog))
}
