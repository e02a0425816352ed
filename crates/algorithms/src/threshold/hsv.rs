//! HSV range thresholding

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::maybe_rayon::*;
use grainseg_core::{Algorithm, Error, ImageBuffer, Mask, Raster, Result};

/// Inclusive range over one normalized HSV component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HsvRange {
    pub min: f64,
    pub max: f64,
}

impl HsvRange {
    /// The whole `[0, 1]` interval
    pub const FULL: HsvRange = HsvRange { min: 0.0, max: 1.0 };

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }

    fn validate(&self, name: &'static str) -> Result<()> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !in_unit(self.min) || !in_unit(self.max) || self.min > self.max {
            return Err(Error::InvalidParameter {
                name,
                value: format!("[{}, {}]", self.min, self.max),
                reason: "range must satisfy 0 <= min <= max <= 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for HsvRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// Parameters for HSV thresholding
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HsvThresholdParams {
    pub hue: HsvRange,
    pub saturation: HsvRange,
    pub value: HsvRange,
}

impl HsvThresholdParams {
    pub fn validate(&self) -> Result<()> {
        self.hue.validate("hue")?;
        self.saturation.validate("saturation")?;
        self.value.validate("value")
    }
}

/// HSV thresholding stage
#[derive(Debug, Clone, Default)]
pub struct HsvThreshold;

impl Algorithm for HsvThreshold {
    type Input = ImageBuffer;
    type Output = Mask;
    type Params = HsvThresholdParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "HsvThreshold"
    }

    fn description(&self) -> &'static str {
        "Binary mask from inclusive hue/saturation/value ranges"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        hsv_threshold(&input, &params)
    }
}

/// Convert an 8-bit RGB triple to normalized (h, s, v), each in `[0, 1]`.
///
/// Hue is taken from the dominant channel; when several channels tie for the
/// maximum, blue wins over green and green over red. Gray pixels have hue 0.
pub fn rgb_to_hsv(rgb: [u8; 3]) -> (f64, f64, f64) {
    let r = rgb[0] as f64 / 255.0;
    let g = rgb[1] as f64 / 255.0;
    let b = rgb[2] as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let v = max;
    let s = if max == 0.0 { 0.0 } else { delta / max };

    if delta == 0.0 {
        return (0.0, s, v);
    }

    let sector = if b == max {
        4.0 + (r - g) / delta
    } else if g == max {
        2.0 + (b - r) / delta
    } else {
        (g - b) / delta
    };
    let h = (sector / 6.0).rem_euclid(1.0);

    (h, s, v)
}

/// Threshold an image in HSV space.
///
/// Grayscale images are replicated across RGB; channels beyond the third
/// are ignored.
///
/// # Errors
/// [`Error::InvalidShape`] for images with neither 1 nor at least 3
/// channels, [`Error::InvalidParameter`] for malformed ranges.
pub fn hsv_threshold(image: &ImageBuffer, params: &HsvThresholdParams) -> Result<Mask> {
    params.validate()?;

    let channels = image.channels();
    if channels != 1 && channels < 3 {
        return Err(Error::InvalidShape { ndim: 3, channels });
    }

    let (rows, cols) = image.shape();
    let data: Vec<bool> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut out = vec![false; cols];
            for (col, keep) in out.iter_mut().enumerate() {
                if let Some(rgb) = image.rgb(row, col) {
                    let (h, s, v) = rgb_to_hsv(rgb);
                    *keep = params.hue.contains(h)
                        && params.saturation.contains(s)
                        && params.value.contains(v);
                }
            }
            out
        })
        .collect();

    let mask = Raster::from_vec(data, rows, cols)?;
    debug!("hsv threshold kept {} of {} pixels", mask.count_true(), mask.len());
    Ok(mask)
}
