//! starwhack - Project star catalogues onto normalized planar geometry for images and PCBs

pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod geometry;
pub mod render;
pub mod sky;

pub use error::{GeometryError, GeometryResult};
pub use geometry::{MultiPolyline, Point, Polyline, StereographicProjector};
pub use sky::{RegionFilter, Sky, Stage};
