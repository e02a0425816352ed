//! Binary mathematical morphology
//!
//! Operations on foreground masks used to clean up a raw threshold:
//! - **Dilation / erosion** with a symmetric structuring element
//! - **Opening / closing** built from the two
//! - **Hole filling** by flooding background from the border
//! - **Small object removal** by component size
//! - **Gaussian re-binarization** to round off ragged outlines

mod binary;
mod element;
mod fill_holes;
mod small_objects;
mod smooth;

pub use binary::{closing, dilate, dilate_n, erode, opening, BinaryMorphologyParams, Dilate, Erode};
pub use element::StructuringElement;
pub use fill_holes::fill_holes;
pub use small_objects::remove_small_objects;
pub use smooth::gaussian_rebinarize;
