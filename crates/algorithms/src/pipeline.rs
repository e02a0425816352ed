//! End-to-end segmentation
//!
//! threshold -> refine -> separate -> measure -> filter, all from one
//! parameter struct.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::filter::{apply_keep_list, filter_objects, retain_records, FilterCriterion, FilterVerdict};
use crate::measure::measure_morphology;
use crate::refine::{refine_mask, RefineParams};
use crate::segmentation::{separate, SeparationMode};
use crate::threshold::{hsv_threshold, HsvThresholdParams};
use grainseg_core::{Algorithm, Error, ImageBuffer, LabelMap, Mask, MorphologyRecord, Result};

/// Parameters for [`segment`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentParams {
    pub threshold: HsvThresholdParams,
    pub refine: RefineParams,
    pub separation: SeparationMode,
    /// `None` skips filtering and keeps every object
    pub filter: Option<Vec<FilterCriterion>>,
}

/// Everything one segmentation run produces
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    /// Label map with rejected objects cleared
    pub filtered_labels: LabelMap,
    /// Label map before filtering
    pub labels: LabelMap,
    /// Refined foreground mask
    pub mask: Mask,
    /// Records of the kept objects, ascending by label
    pub morphology: Vec<MorphologyRecord>,
    /// One verdict per measured object; empty when filtering was skipped
    pub verdicts: Vec<FilterVerdict>,
}

impl Segmentation {
    pub fn object_count(&self) -> usize {
        self.morphology.len()
    }
}

/// Full pipeline stage
#[derive(Debug, Clone, Default)]
pub struct Segment;

impl Algorithm for Segment {
    type Input = ImageBuffer;
    type Output = Segmentation;
    type Params = SegmentParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Segment"
    }

    fn description(&self) -> &'static str {
        "HSV threshold, mask refinement, instance separation, measurement and filtering"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        segment(&input, &params)
    }
}

/// Segment `image` and measure the resulting objects
pub fn segment(image: &ImageBuffer, params: &SegmentParams) -> Result<Segmentation> {
    let raw = hsv_threshold(image, &params.threshold)?;
    debug!("threshold: {} foreground px", raw.count_true());

    let mask = refine_mask(raw, &params.refine)?;
    debug!("refine: {} foreground px", mask.count_true());

    let labels = separate(&mask, params.separation)?;
    let records = measure_morphology(&labels);
    debug!("separate: {} objects", records.len());

    let (filtered_labels, morphology, verdicts) = match &params.filter {
        Some(criteria) => {
            let outcome = filter_objects(&records, criteria);
            (
                apply_keep_list(&labels, &outcome.keep),
                retain_records(&records, &outcome.keep),
                outcome.verdicts,
            )
        }
        None => (labels.clone(), records, Vec::new()),
    };

    info!(
        "segmented {}x{} image: {} objects kept",
        image.rows(),
        image.cols(),
        morphology.len()
    );

    Ok(Segmentation {
        filtered_labels,
        labels,
        mask,
        morphology,
        verdicts,
    })
}
