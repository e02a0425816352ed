//! Instance separation
//!
//! Turns a refined foreground mask into a label map, either by plain
//! connected-component labeling or by a distance-transform watershed that
//! splits touching objects.

mod distance;
mod labeling;
mod peaks;
mod watershed;

pub use distance::distance_transform;
pub use labeling::{component_sizes, label_components};
pub use peaks::find_markers;
pub use watershed::watershed;

use serde::{Deserialize, Serialize};
use tracing::debug;

use grainseg_core::{Algorithm, Connectivity, Error, LabelMap, Mask, Result};

/// Default marker spacing for the watershed mode
pub const DEFAULT_MIN_DISTANCE: usize = 45;

/// How foreground pixels are grouped into objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "mode")]
pub enum SeparationMode {
    /// 8-connected components
    Label,
    /// Distance-transform watershed with peak spacing `min_distance`
    Watershed { min_distance: usize },
}

impl Default for SeparationMode {
    fn default() -> Self {
        SeparationMode::Watershed {
            min_distance: DEFAULT_MIN_DISTANCE,
        }
    }
}

/// Instance separation stage
#[derive(Debug, Clone, Default)]
pub struct Separate;

impl Algorithm for Separate {
    type Input = Mask;
    type Output = LabelMap;
    type Params = SeparationMode;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Separate"
    }

    fn description(&self) -> &'static str {
        "Label foreground objects, optionally splitting touching ones by watershed"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        separate(&input, params)
    }
}

/// Label the objects of `mask` according to `mode`
pub fn separate(mask: &Mask, mode: SeparationMode) -> Result<LabelMap> {
    match mode {
        SeparationMode::Label => {
            let (labels, count) = label_components(mask, Connectivity::Eight);
            debug!("labeled {} components", count);
            Ok(labels)
        }
        SeparationMode::Watershed { .. } if !mask.is_empty() && mask.count_true() == mask.len() => {
            // No background to measure from: the whole image is one object
            debug!("mask has no background, single object");
            Ok(mask.like(1))
        }
        SeparationMode::Watershed { min_distance } => {
            let distance = distance_transform(mask)?;
            let peaks = find_markers(&distance, mask, min_distance);
            let (markers, count) = label_components(&peaks, Connectivity::Four);
            debug!("watershed from {} markers (min_distance {})", count, min_distance);
            watershed(&distance, &markers, mask)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_disks() -> Mask {
        let mut mask = Mask::new(100, 140);
        for r in 0..100 {
            for c in 0..140 {
                let d1 = (r as f64 - 50.0).powi(2) + (c as f64 - 50.0).powi(2);
                let d2 = (r as f64 - 50.0).powi(2) + (c as f64 - 85.0).powi(2);
                mask.set(r, c, d1 <= 400.0 || d2 <= 400.0).unwrap();
            }
        }
        mask
    }

    #[test]
    fn test_label_mode_merges_touching() {
        let labels = separate(&two_disks(), SeparationMode::Label).unwrap();
        assert_eq!(labels.labels(), vec![1]);
    }

    #[test]
    fn test_watershed_splits_touching() {
        let labels = separate(&two_disks(), SeparationMode::Watershed { min_distance: 20 }).unwrap();
        assert_eq!(labels.labels(), vec![1, 2]);
        assert_eq!(labels.get(50, 50).unwrap(), 1);
        assert_eq!(labels.get(50, 85).unwrap(), 2);
    }

    #[test]
    fn test_default_mode() {
        assert_eq!(
            SeparationMode::default(),
            SeparationMode::Watershed { min_distance: 45 }
        );
        let json = serde_json::to_string(&SeparationMode::Label).unwrap();
        assert_eq!(json, r#"{"mode":"label"}"#);
        let back: SeparationMode =
            serde_json::from_str(r#"{"mode":"watershed","min_distance":7}"#).unwrap();
        assert_eq!(back, SeparationMode::Watershed { min_distance: 7 });
    }

    #[test]
    fn test_full_mask_is_one_object() {
        let mask = Mask::filled(200, 200, true);
        for mode in [SeparationMode::Label, SeparationMode::default()] {
            let labels = separate(&mask, mode).unwrap();
            assert_eq!(labels.labels(), vec![1]);
            assert_eq!(labels.get(199, 0).unwrap(), 1);
        }
    }

    #[test]
    fn test_empty_mask_both_modes() {
        let mask = Mask::new(10, 10);
        for mode in [SeparationMode::Label, SeparationMode::default()] {
            assert!(separate(&mask, mode).unwrap().labels().is_empty());
        }
    }
}
