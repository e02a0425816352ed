//! # grainseg Algorithms
//!
//! Segmentation stages for microscopy object analysis.
//!
//! ## Available Stages
//!
//! - **threshold**: HSV range thresholding
//! - **morphology**: Binary dilation, erosion, opening, closing, hole filling
//! - **refine**: The fixed mask clean-up sequence
//! - **segmentation**: Component labeling, distance transform, watershed
//! - **measure**: Per-object shape descriptors
//! - **filter**: Inclusive range filtering with diagnostics
//! - **export**: Per-object crops over white
//! - **pipeline**: `segment`, everything above in one call

pub(crate) mod maybe_rayon;

pub mod export;
pub mod filter;
pub mod measure;
pub mod morphology;
pub mod pipeline;
pub mod refine;
pub mod segmentation;
pub mod threshold;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::export::{export_objects, extract_objects, ObjectImage};
    pub use crate::filter::{
        apply_keep_list, filter_objects, retain_records, FilterCriterion, FilterOptions,
        FilterOutcome, FilterVerdict, RangeFilter,
    };
    pub use crate::measure::{circularity, measure_morphology, Measure};
    pub use crate::morphology::{
        closing, dilate, erode, fill_holes, opening, remove_small_objects, StructuringElement,
    };
    pub use crate::pipeline::{segment, Segment, SegmentParams, Segmentation};
    pub use crate::refine::{refine_mask, Refine, RefineParams};
    pub use crate::segmentation::{
        distance_transform, find_markers, label_components, separate, watershed, Separate,
        SeparationMode,
    };
    pub use crate::threshold::{hsv_threshold, HsvRange, HsvThreshold, HsvThresholdParams};
    pub use grainseg_core::prelude::*;
}
