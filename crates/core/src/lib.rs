//! # grainseg Core
//!
//! Core types, traits and I/O for the grainseg segmentation pipeline.
//!
//! This crate provides:
//! - `Raster<T>`: 2D grid type, with `Mask` and `LabelMap` aliases
//! - `ImageBuffer`: channel-last 8-bit images and the request that supplies one
//! - `MorphologyRecord`: per-object shape descriptors
//! - Algorithm trait for consistent stage APIs
//! - I/O for images, label maps, morphology tables and the artifact store

pub mod error;
pub mod image;
pub mod io;
pub mod morphology;
pub mod raster;

pub use error::{Error, Result};
pub use image::{ImageBuffer, ImageRequest, ImageSource};
pub use morphology::{BoundingBox, MorphologyAttribute, MorphologyRecord};
pub use raster::{Connectivity, LabelMap, Mask, Neighborhood, Raster};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::image::ImageBuffer;
    pub use crate::morphology::{BoundingBox, MorphologyAttribute, MorphologyRecord};
    pub use crate::raster::{Connectivity, LabelMap, Mask, Raster};
    pub use crate::Algorithm;
}

/// Core trait for every pipeline stage.
///
/// Stages are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the stage
    type Input;
    /// Output type for the stage
    type Output;
    /// Parameters controlling stage behavior
    type Params: Default;
    /// Error type for stage execution
    type Error: std::error::Error;

    /// Returns the stage name
    fn name(&self) -> &'static str;

    /// Returns a description of what the stage does
    fn description(&self) -> &'static str;

    /// Execute the stage
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
