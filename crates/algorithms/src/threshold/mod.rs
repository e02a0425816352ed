//! Color-space thresholding
//!
//! Converts an 8-bit image into a binary mask by keeping pixels whose
//! hue, saturation and value all fall inside inclusive ranges.

mod hsv;

pub use hsv::{hsv_threshold, rgb_to_hsv, HsvRange, HsvThreshold, HsvThresholdParams};
