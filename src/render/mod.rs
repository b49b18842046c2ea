pub mod kicad;

pub use kicad::{BoardConfig, render_board, write_board};
