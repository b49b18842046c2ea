pub mod star;

pub use star::{Star, StarAttributes};
