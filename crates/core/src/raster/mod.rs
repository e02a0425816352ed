//! Raster data structures

mod grid;
mod neighborhood;

pub use grid::{LabelMap, Mask, Raster};
pub use neighborhood::{Connectivity, Neighborhood};
