//! # grainseg Colormap
//!
//! Label palettes and RGBA overlay rendering for grainseg.
//!
//! The main entry point is [`render_overlay`], which colors every object of
//! a label map from a qualitative palette and stamps each object's number
//! at its centroid. The RGBA buffer can be written with
//! `grainseg_core::io::write_rgba`.
//!
//! ## Usage
//!
//! ```ignore
//! use grainseg_colormap::{render_overlay, OverlayParams};
//!
//! let overlay = render_overlay(&labels, &records, &OverlayParams::default(), None)?;
//! ```

mod font;
mod overlay;
mod scheme;

pub use overlay::{render_overlay, Overlay, OverlayParams};
pub use scheme::{QualitativePalette, Rgb};
