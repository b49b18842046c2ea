use serde::Deserialize;
use serde_json::Value;

/// Star catalogue as a GeoJSON-style feature collection
#[derive(Debug, Deserialize)]
pub struct StarCatalog {
    pub features: Vec<StarFeature>,
}

/// A single star record
#[derive(Debug, Deserialize)]
pub struct StarFeature {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub geometry: Option<PointGeometry>,
    #[serde(default)]
    pub properties: Option<StarProperties>,
}

#[derive(Debug, Deserialize)]
pub struct PointGeometry {
    #[serde(default)]
    pub coordinates: Vec<Value>,
}

/// Catalogue properties; numbers sometimes arrive as strings
#[derive(Debug, Default, Deserialize)]
pub struct StarProperties {
    #[serde(default)]
    pub mag: Option<Value>,
    #[serde(default)]
    pub bv: Option<Value>,
    #[serde(default)]
    pub desig: Option<String>,
    #[serde(default)]
    pub con: Option<String>,
}

/// Constellation line catalogue
#[derive(Debug, Deserialize)]
pub struct LineCatalog {
    pub features: Vec<LineFeature>,
}

/// One constellation: an id and a multi-line of [lon, lat] pairs
#[derive(Debug, Deserialize)]
pub struct LineFeature {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub geometry: Option<MultiLineGeometry>,
}

#[derive(Debug, Deserialize)]
pub struct MultiLineGeometry {
    #[serde(default)]
    pub coordinates: Vec<Vec<Vec<Value>>>,
}

/// Read a number that may be encoded as a JSON number or string
pub fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Render an id that may be a JSON number or string
pub fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
