//! Error types for the geometry pipeline

use thiserror::Error;

/// Result type for geometry operations
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Errors raised by the transform pipeline.
///
/// Every variant indicates a caller bug (bad parameters or a projection
/// centre badly placed for the data), never a transient condition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("degenerate range: cannot map an interval of zero width [{min}, {max}]")]
    DegenerateRange { min: f64, max: f64 },

    #[error("projection singularity at ({lon}, {lat}): point is antipodal to the projection centre")]
    ProjectionSingularity { lon: f64, lat: f64 },

    #[error("non-finite coordinate produced at ({lon}, {lat})")]
    NonFiniteCoordinate { lon: f64, lat: f64 },

    #[error("density {density} asks for too many points on a segment of length {distance}")]
    DensityOverflow { density: f64, distance: f64 },
}
