//! Per-object shape measurement
//!
//! Every nonzero label of a label map is measured independently (in
//! parallel with the `parallel` feature) and the records come back sorted
//! by label.

mod hull;
mod moments;
mod perimeter;

use std::collections::BTreeMap;
use std::f64::consts::PI;

use ndarray::Array2;
use tracing::debug;

use crate::maybe_rayon::*;
use grainseg_core::{Algorithm, BoundingBox, Error, LabelMap, MorphologyRecord, Result};

use hull::{convex_area, feret_diameter_max};
use moments::InertiaEllipse;
use perimeter::weighted_perimeter;

/// Morphology measurement stage
#[derive(Debug, Clone, Default)]
pub struct Measure;

impl Algorithm for Measure {
    type Input = LabelMap;
    type Output = Vec<MorphologyRecord>;
    type Params = ();
    type Error = Error;

    fn name(&self) -> &'static str {
        "Measure"
    }

    fn description(&self) -> &'static str {
        "Area, perimeter, axes, Feret diameter, solidity and circularity per label"
    }

    fn execute(&self, input: Self::Input, _params: Self::Params) -> Result<Self::Output> {
        Ok(measure_morphology(&input))
    }
}

/// `4 pi A / P^2`, exactly 0 when the perimeter is 0. Not clamped: small or
/// jagged regions can exceed 1.
pub fn circularity(area: f64, perimeter: f64) -> f64 {
    if perimeter == 0.0 {
        0.0
    } else {
        4.0 * PI * area / (perimeter * perimeter)
    }
}

/// Measure every nonzero label of `labels`, ascending by label
pub fn measure_morphology(labels: &LabelMap) -> Vec<MorphologyRecord> {
    let mut regions: BTreeMap<i32, Vec<(usize, usize)>> = BTreeMap::new();
    for ((r, c), &l) in labels.data().indexed_iter() {
        if l != 0 {
            regions.entry(l).or_default().push((r, c));
        }
    }
    let regions: Vec<(i32, Vec<(usize, usize)>)> = regions.into_iter().collect();

    let records: Vec<MorphologyRecord> = regions
        .par_iter()
        .map(|(label, pixels)| measure_region(*label, pixels))
        .collect();

    debug!("measured {} regions", records.len());
    records
}

fn measure_region(label: i32, pixels: &[(usize, usize)]) -> MorphologyRecord {
    let bbox = bounding_box(pixels);

    // Region cropped to its bbox with one pixel of background padding
    let mut local = Array2::from_elem((bbox.height() + 2, bbox.width() + 2), false);
    for &(r, c) in pixels {
        local[[r - bbox.min_row + 1, c - bbox.min_col + 1]] = true;
    }
    let contains = |r: isize, c: isize| -> bool {
        let lr = r - bbox.min_row as isize + 1;
        let lc = c - bbox.min_col as isize + 1;
        lr >= 0
            && lc >= 0
            && (lr as usize) < local.nrows()
            && (lc as usize) < local.ncols()
            && local[[lr as usize, lc as usize]]
    };

    let area = pixels.len();
    let perimeter = weighted_perimeter(&local);
    let ellipse = InertiaEllipse::from_pixels(pixels);
    let bounds = (bbox.min_row, bbox.min_col, bbox.max_row, bbox.max_col);
    let convex = convex_area(pixels, bounds, contains).max(area);
    let feret = feret_diameter_max(pixels, contains);

    MorphologyRecord {
        label,
        area,
        perimeter,
        centroid: ellipse.centroid,
        bbox,
        major_axis_length: ellipse.major_axis_length(),
        minor_axis_length: ellipse.minor_axis_length(),
        feret_diameter_max: feret,
        eccentricity: ellipse.eccentricity(),
        equivalent_diameter: (4.0 * area as f64 / PI).sqrt(),
        solidity: area as f64 / convex as f64,
        circularity: circularity(area as f64, perimeter),
    }
}

fn bounding_box(pixels: &[(usize, usize)]) -> BoundingBox {
    let mut bbox = BoundingBox {
        min_row: usize::MAX,
        min_col: usize::MAX,
        max_row: 0,
        max_col: 0,
    };
    for &(r, c) in pixels {
        bbox.min_row = bbox.min_row.min(r);
        bbox.min_col = bbox.min_col.min(c);
        bbox.max_row = bbox.max_row.max(r + 1);
        bbox.max_col = bbox.max_col.max(c + 1);
    }
    bbox
}
