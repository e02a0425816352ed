//! Range filtering of measured objects
//!
//! Each criterion bounds one morphology attribute with optional inclusive
//! lower and upper limits. An object is kept when it satisfies every
//! criterion; its verdict names the first criterion it violates.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use grainseg_core::{Algorithm, Error, LabelMap, MorphologyAttribute, MorphologyRecord, Result};

/// Inclusive bounds on one attribute
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterCriterion {
    pub attribute: MorphologyAttribute,
    #[serde(default)]
    pub lower: Option<f64>,
    #[serde(default)]
    pub upper: Option<f64>,
}

impl FilterCriterion {
    pub fn new(attribute: MorphologyAttribute, lower: Option<f64>, upper: Option<f64>) -> Self {
        Self { attribute, lower, upper }
    }

    pub fn between(attribute: MorphologyAttribute, lower: f64, upper: f64) -> Self {
        Self::new(attribute, Some(lower), Some(upper))
    }

    pub fn accepts(&self, value: f64) -> bool {
        self.lower.map_or(true, |lo| value >= lo) && self.upper.map_or(true, |hi| value <= hi)
    }

    /// Diagnostic for the violated bound, `None` when `value` passes
    fn violation(&self, value: f64) -> Option<String> {
        if let Some(lo) = self.lower {
            if !(value >= lo) {
                return Some(format!("fail: {}: {:.2} < {}", self.attribute, value, lo));
            }
        }
        if let Some(hi) = self.upper {
            if !(value <= hi) {
                return Some(format!("fail: {}: {:.2} > {}", self.attribute, value, hi));
            }
        }
        None
    }
}

/// Outcome for one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterVerdict {
    pub label: i32,
    pub passed: bool,
    /// `"pass"` or the first failing criterion
    pub status: String,
}

/// Labels to keep, in record order, and one verdict per record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOutcome {
    pub keep: Vec<i32>,
    pub verdicts: Vec<FilterVerdict>,
}

/// Optional bounds on area, circularity and equivalent diameter
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    #[serde(alias = "minArea")]
    pub min_area: Option<f64>,
    #[serde(alias = "maxArea")]
    pub max_area: Option<f64>,
    #[serde(alias = "minCircularity")]
    pub min_circularity: Option<f64>,
    #[serde(alias = "maxCircularity")]
    pub max_circularity: Option<f64>,
    #[serde(alias = "minEqDiameter")]
    pub min_eq_diameter: Option<f64>,
    #[serde(alias = "maxEqDiameter")]
    pub max_eq_diameter: Option<f64>,
}

impl FilterOptions {
    /// Criteria for area, circularity and equivalent diameter, in that order
    pub fn criteria(&self) -> Vec<FilterCriterion> {
        vec![
            FilterCriterion::new(MorphologyAttribute::Area, self.min_area, self.max_area),
            FilterCriterion::new(
                MorphologyAttribute::Circularity,
                self.min_circularity,
                self.max_circularity,
            ),
            FilterCriterion::new(
                MorphologyAttribute::EquivalentDiameter,
                self.min_eq_diameter,
                self.max_eq_diameter,
            ),
        ]
    }
}

/// Range filter stage
#[derive(Debug, Clone, Default)]
pub struct RangeFilter;

impl Algorithm for RangeFilter {
    type Input = Vec<MorphologyRecord>;
    type Output = FilterOutcome;
    type Params = Vec<FilterCriterion>;
    type Error = Error;

    fn name(&self) -> &'static str {
        "RangeFilter"
    }

    fn description(&self) -> &'static str {
        "Keep objects whose attributes fall inside inclusive bounds"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        Ok(filter_objects(&input, &params))
    }
}

/// Evaluate `criteria` against every record
pub fn filter_objects(records: &[MorphologyRecord], criteria: &[FilterCriterion]) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();

    for record in records {
        let passed = criteria
            .iter()
            .all(|c| c.accepts(record.value(c.attribute)));
        let status = criteria
            .iter()
            .find_map(|c| c.violation(record.value(c.attribute)))
            .unwrap_or_else(|| "pass".to_string());

        if passed {
            outcome.keep.push(record.label);
        }
        outcome.verdicts.push(FilterVerdict {
            label: record.label,
            passed,
            status,
        });
    }

    debug!("filter kept {} of {} objects", outcome.keep.len(), records.len());
    outcome
}

/// Fresh label map with every label not in `keep` set to 0
pub fn apply_keep_list(labels: &LabelMap, keep: &[i32]) -> LabelMap {
    let keep: HashSet<i32> = keep.iter().copied().collect();
    labels.map(|&l| if l != 0 && keep.contains(&l) { l } else { 0 })
}

/// Records whose label is in `keep`, in their original order
pub fn retain_records(records: &[MorphologyRecord], keep: &[i32]) -> Vec<MorphologyRecord> {
    let keep: HashSet<i32> = keep.iter().copied().collect();
    records
        .iter()
        .filter(|r| keep.contains(&r.label))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use grainseg_core::{BoundingBox, Raster};

    fn record(label: i32, area: usize, circularity: f64) -> MorphologyRecord {
        MorphologyRecord {
            label,
            area,
            perimeter: 10.0,
            centroid: (0.0, 0.0),
            bbox: BoundingBox { min_row: 0, min_col: 0, max_row: 1, max_col: 1 },
            major_axis_length: 1.0,
            minor_axis_length: 1.0,
            feret_diameter_max: 1.0,
            eccentricity: 0.0,
            equivalent_diameter: (4.0 * area as f64 / std::f64::consts::PI).sqrt(),
            solidity: 1.0,
            circularity,
        }
    }

    #[test]
    fn test_area_window() {
        let records = vec![record(1, 30, 0.9), record(2, 100, 0.9), record(3, 200, 0.9)];
        let criteria = [FilterCriterion::between(MorphologyAttribute::Area, 50.0, 150.0)];
        let outcome = filter_objects(&records, &criteria);

        assert_eq!(outcome.keep, vec![2]);
        assert_eq!(outcome.verdicts[0].status, "fail: area: 30.00 < 50");
        assert_eq!(outcome.verdicts[1].status, "pass");
        assert_eq!(outcome.verdicts[2].status, "fail: area: 200.00 > 150");
        assert!(!outcome.verdicts[2].passed);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let records = vec![record(1, 50, 1.0), record(2, 150, 1.0)];
        let criteria = [FilterCriterion::between(MorphologyAttribute::Area, 50.0, 150.0)];
        assert_eq!(filter_objects(&records, &criteria).keep, vec![1, 2]);
    }

    #[test]
    fn test_first_failure_reported() {
        let records = vec![record(4, 10, 0.2)];
        let criteria = [
            FilterCriterion::new(MorphologyAttribute::Circularity, Some(0.5), None),
            FilterCriterion::new(MorphologyAttribute::Area, Some(20.0), None),
        ];
        let outcome = filter_objects(&records, &criteria);
        assert!(outcome.keep.is_empty());
        assert_eq!(outcome.verdicts[0].status, "fail: circularity: 0.20 < 0.5");
    }

    #[test]
    fn test_no_criteria_keeps_all() {
        let records = vec![record(2, 1, 0.0), record(1, 1, 0.0)];
        let outcome = filter_objects(&records, &[]);
        assert_eq!(outcome.keep, vec![2, 1]);
        assert!(outcome.verdicts.iter().all(|v| v.passed && v.status == "pass"));
    }

    #[test]
    fn test_apply_keep_list_is_fresh() {
        let labels = Raster::from_vec(vec![1, 2, 0, 3], 2, 2).unwrap();
        let filtered = apply_keep_list(&labels, &[3, 1]);
        assert_eq!(filtered.data().iter().copied().collect::<Vec<_>>(), vec![1, 0, 0, 3]);
        assert_eq!(labels.labels(), vec![1, 2, 3]);
    }

    #[test]
    fn test_idempotent() {
        let records = vec![record(1, 30, 0.9), record(2, 100, 0.9), record(3, 120, 0.1)];
        let criteria = FilterOptions {
            min_area: Some(50.0),
            min_circularity: Some(0.5),
            ..Default::default()
        }
        .criteria();
        let first = filter_objects(&records, &criteria);
        let kept = retain_records(&records, &first.keep);
        let second = filter_objects(&kept, &criteria);
        assert_eq!(second.keep, first.keep);
    }

    #[test]
    fn test_options_accept_camel_case() {
        let opts: FilterOptions =
            serde_json::from_str(r#"{"minArea": 5, "max_circularity": 1.2, "minEqDiameter": 3}"#).unwrap();
        assert_eq!(opts.min_area, Some(5.0));
        assert_eq!(opts.max_circularity, Some(1.2));
        assert_eq!(opts.min_eq_diameter, Some(3.0));
        let criteria = opts.criteria();
        assert_eq!(criteria[0].attribute, MorphologyAttribute::Area);
        assert_eq!(criteria[2].attribute, MorphologyAttribute::EquivalentDiameter);
    }
}
