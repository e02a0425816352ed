//! Binary dilation, erosion, opening and closing
//!
//! Neighbors that fall outside the mask are ignored: dilation treats them
//! as background and erosion as foreground, so objects touching the image
//! edge are not eaten away by the border.

use crate::maybe_rayon::*;
use grainseg_core::{Algorithm, Error, Mask, Raster, Result};

use super::element::StructuringElement;

/// Parameters shared by the binary morphology stages
#[derive(Debug, Clone, Default)]
pub struct BinaryMorphologyParams {
    pub element: StructuringElement,
    /// Number of times the operation is applied; 0 returns the input
    pub iterations: usize,
}

/// Dilation stage
#[derive(Debug, Clone, Default)]
pub struct Dilate;

impl Algorithm for Dilate {
    type Input = Mask;
    type Output = Mask;
    type Params = BinaryMorphologyParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Dilate"
    }

    fn description(&self) -> &'static str {
        "Binary dilation (any foreground under the structuring element)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        dilate_n(input, &params.element, params.iterations)
    }
}

/// Erosion stage
#[derive(Debug, Clone, Default)]
pub struct Erode;

impl Algorithm for Erode {
    type Input = Mask;
    type Output = Mask;
    type Params = BinaryMorphologyParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Erode"
    }

    fn description(&self) -> &'static str {
        "Binary erosion (all in-bounds cells under the structuring element)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let mut mask = input;
        for _ in 0..params.iterations {
            mask = erode(&mask, &params.element)?;
        }
        Ok(mask)
    }
}

/// Binary dilation: a pixel is set when any in-bounds cell under the
/// element is set.
pub fn dilate(mask: &Mask, element: &StructuringElement) -> Result<Mask> {
    apply(mask, element, false)
}

/// Binary erosion: a pixel stays set only when every in-bounds cell under
/// the element is set.
pub fn erode(mask: &Mask, element: &StructuringElement) -> Result<Mask> {
    apply(mask, element, true)
}

/// Dilate `iterations` times in a row
pub fn dilate_n(mask: Mask, element: &StructuringElement, iterations: usize) -> Result<Mask> {
    let mut mask = mask;
    for _ in 0..iterations {
        mask = dilate(&mask, element)?;
    }
    Ok(mask)
}

/// Erosion followed by dilation. Removes features smaller than the element.
pub fn opening(mask: &Mask, element: &StructuringElement) -> Result<Mask> {
    let eroded = erode(mask, element)?;
    dilate(&eroded, element)
}

/// Dilation followed by erosion. Closes gaps narrower than the element.
pub fn closing(mask: &Mask, element: &StructuringElement) -> Result<Mask> {
    let dilated = dilate(mask, element)?;
    erode(&dilated, element)
}

fn apply(mask: &Mask, element: &StructuringElement, all: bool) -> Result<Mask> {
    element.validate()?;

    let (rows, cols) = mask.shape();
    let offsets = element.offsets();
    let data = mask.data();

    let output: Vec<bool> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut out = vec![false; cols];
            for (col, value) in out.iter_mut().enumerate() {
                let mut neighbors = offsets
                    .iter()
                    .filter_map(|&(dr, dc)| mask.offset(row, col, dr, dc))
                    .map(|(r, c)| data[[r, c]]);
                *value = if all {
                    neighbors.all(|v| v)
                } else {
                    neighbors.any(|v| v)
                };
            }
            out
        })
        .collect();

    Raster::from_vec(output, rows, cols)
}
