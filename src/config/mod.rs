use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::geometry::{Point, Polyline};
use crate::sky::{GridStyle, RegionFilter};

fn default_density() -> f64 {
    1.0
}
fn default_grid_spacing() -> f64 {
    15.0
}
fn default_projection_radius() -> f64 {
    1.0
}
fn default_board_size() -> f64 {
    300.0
}
fn default_verbose() -> bool {
    false
}

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    /// Star catalogue JSON
    #[serde(default)]
    pub stars: Option<PathBuf>,
    /// Constellation line catalogue JSON
    #[serde(default)]
    pub constellations: Option<PathBuf>,
    /// Vertices per degree when densifying lines
    #[serde(default = "default_density")]
    pub density: f64,
    /// Degrees between grid lines
    #[serde(default = "default_grid_spacing")]
    pub grid_spacing: f64,
    #[serde(default)]
    pub grid_style: GridStyle,
    #[serde(default = "default_projection_radius")]
    pub projection_radius: f64,
    /// Board side in mm
    #[serde(default = "default_board_size")]
    pub board_size: f64,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    #[serde(default)]
    pub regions: BTreeMap<String, RegionConfig>,
}

/// A named sky region
///
/// ```toml
/// [regions.orion]
/// boundary = [[70, -15], [70, 25], [100, 25], [100, -15], [70, -15]]
/// magnitudes = [-2, 5]
/// target_constellation = "Ori"
/// ```
#[derive(Debug, Deserialize, Clone)]
pub struct RegionConfig {
    /// Closed list of [lon, lat] pairs
    pub boundary: Vec<[f64; 2]>,
    /// Projection centre, defaults to the centre of the boundary extents
    #[serde(default)]
    pub center: Option<[f64; 2]>,
    #[serde(default)]
    pub magnitudes: Option<[f64; 2]>,
    #[serde(default)]
    pub color_indices: Option<[f64; 2]>,
    #[serde(default)]
    pub target_constellation: Option<String>,
}

impl RegionConfig {
    pub fn boundary(&self) -> Polyline {
        Polyline::new(self.boundary.iter().map(|&[lon, lat]| Point::new(lon, lat)).collect())
    }

    /// Explicit centre, else the middle of the boundary's extents
    pub fn center(&self) -> Option<Point> {
        match self.center {
            Some([lon, lat]) => Some(Point::new(lon, lat)),
            None => self.boundary().extents().map(|e| e.center()),
        }
    }

    pub fn to_filter(&self) -> RegionFilter {
        let mut filter = RegionFilter::new(self.boundary());
        if let Some([min, max]) = self.magnitudes {
            filter = filter.with_magnitudes(min, max);
        }
        if let Some([min, max]) = self.color_indices {
            filter = filter.with_color_indices(min, max);
        }
        filter
    }
}

impl FileConfig {
    /// Read a config from an explicit path
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("Config file not found: {:?}", path);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents).context("Failed to parse config file")
    }

    /// Search the usual locations, returning the first config that parses
    pub fn load() -> Option<Self> {
        for path in get_config_paths() {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        log::warn!("Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    pub fn region(&self, name: &str) -> Result<&RegionConfig> {
        self.regions.get(name).with_context(|| {
            let known: Vec<&str> = self.regions.keys().map(String::as_str).collect();
            format!(
                "Unknown region '{}' (configured: {})",
                name,
                if known.is_empty() {
                    "none".to_string()
                } else {
                    known.join(", ")
                }
            )
        })
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("starwhack.toml"));
    paths.push(PathBuf::from(".starwhack.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("starwhack").join("config.toml"));
        paths.push(config_dir.join("starwhack.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".starwhack.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"
stars = "data/stars.6.json"
density = 2.0
grid_style = "crosses"

[regions.orion]
boundary = [[70, -15], [70, 25], [100, 25], [100, -15], [70, -15]]
magnitudes = [-2, 5]
target_constellation = "Ori"

[regions.seam]
boundary = [[350, -10], [350, 10], [370, 10], [370, -10], [350, -10]]
center = [0, 0]
"#;

    #[test]
    fn test_parse_config_defaults() {
        let config: FileConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.stars, Some(PathBuf::from("data/stars.6.json")));
        assert_eq!(config.density, 2.0);
        assert_eq!(config.grid_spacing, 15.0);
        assert_eq!(config.grid_style, GridStyle::Crosses);
        assert_eq!(config.board_size, 300.0);
        assert!(config.constellations.is_none());
        assert_eq!(config.regions.len(), 2);
    }

    #[test]
    fn test_region_filter_and_center() {
        let config: FileConfig = toml::from_str(SAMPLE).unwrap();
        let orion = config.region("orion").unwrap();

        let filter = orion.to_filter();
        assert!(filter.boundary.is_closed());
        assert_eq!(filter.magnitudes, Some((-2.0, 5.0)));
        assert_eq!(filter.color_indices, None);
        assert_eq!(orion.center(), Some(Point::new(85.0, 5.0)));

        let seam = config.region("seam").unwrap();
        assert_eq!(seam.center(), Some(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_unknown_region() {
        let config: FileConfig = toml::from_str(SAMPLE).unwrap();
        let err = config.region("lyra").unwrap_err();
        assert!(err.to_string().contains("orion, seam"));
    }

    #[test]
    fn test_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("starwhack.toml");
        fs::write(&path, SAMPLE).unwrap();

        let config = FileConfig::from_path(&path).unwrap();
        assert_eq!(config.regions.len(), 2);
        assert!(FileConfig::from_path(&dir.path().join("missing.toml")).is_err());
    }
}
