//! Gaussian smoothing of a binary mask
//!
//! The mask is blurred as a 0/1 float image with a separable kernel
//! truncated at 4 sigma, edges extended by replicating the nearest pixel,
//! then re-binarized at 0.5.

use ndarray::Array2;

use crate::maybe_rayon::*;
use grainseg_core::{Error, Mask, Raster, Result};

/// Blur a mask and keep pixels whose smoothed value exceeds 0.5.
///
/// A non-positive `sigma` returns the mask unchanged.
pub fn gaussian_rebinarize(mask: &Mask, sigma: f64) -> Result<Mask> {
    if !sigma.is_finite() {
        return Err(Error::InvalidParameter {
            name: "gaussian_sigma",
            value: sigma.to_string(),
            reason: "sigma must be finite".to_string(),
        });
    }
    if sigma <= 0.0 {
        return Ok(mask.clone());
    }

    let (rows, cols) = mask.shape();
    let input = mask.data().mapv(|v| if v { 1.0 } else { 0.0 });
    let smoothed = gaussian_smooth_2d(&input, sigma)?;

    let data = smoothed.iter().map(|&v| v > 0.5).collect();
    Raster::from_vec(data, rows, cols)
}

fn gaussian_smooth_2d(data: &Array2<f64>, sigma: f64) -> Result<Array2<f64>> {
    let (rows, cols) = data.dim();
    let kernel = make_gaussian_kernel(sigma);
    let half = (kernel.len() / 2) as isize;
    let clamp = |i: isize, n: usize| i.clamp(0, n as isize - 1) as usize;

    let row_pass: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut out = vec![0.0; cols];
            for (col, v) in out.iter_mut().enumerate() {
                *v = kernel
                    .iter()
                    .enumerate()
                    .map(|(ki, &kw)| kw * data[[row, clamp(col as isize + ki as isize - half, cols)]])
                    .sum();
            }
            out
        })
        .collect();
    let row_arr = Array2::from_shape_vec((rows, cols), row_pass)
        .map_err(|e| Error::Other(e.to_string()))?;

    let col_pass: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut out = vec![0.0; cols];
            for (col, v) in out.iter_mut().enumerate() {
                *v = kernel
                    .iter()
                    .enumerate()
                    .map(|(ki, &kw)| kw * row_arr[[clamp(row as isize + ki as isize - half, rows), col]])
                    .sum();
            }
            out
        })
        .collect();

    Array2::from_shape_vec((rows, cols), col_pass).map_err(|e| Error::Other(e.to_string()))
}

fn make_gaussian_kernel(sigma: f64) -> Vec<f64> {
    let half = (4.0 * sigma + 0.5) as usize;
    let denom = 2.0 * sigma * sigma;

    let mut kernel: Vec<f64> = (0..=2 * half)
        .map(|i| {
            let x = i as f64 - half as f64;
            (-x * x / denom).exp()
        })
        .collect();

    let sum: f64 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }
    kernel
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kernel_normalized_and_truncated() {
        let k = make_gaussian_kernel(1.0);
        assert_eq!(k.len(), 9);
        assert_relative_eq!(k.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(k[0], k[8], epsilon = 1e-15);
    }

    #[test]
    fn test_zero_sigma_is_identity() {
        let mut mask = Mask::new(5, 5);
        mask.set(2, 2, true).unwrap();
        assert_eq!(gaussian_rebinarize(&mask, 0.0).unwrap(), mask);
    }

    #[test]
    fn test_isolated_pixel_vanishes() {
        let mut mask = Mask::new(9, 9);
        mask.set(4, 4, true).unwrap();
        assert_eq!(gaussian_rebinarize(&mask, 1.0).unwrap().count_true(), 0);
    }

    #[test]
    fn test_large_block_interior_survives() {
        let mut mask = Mask::new(20, 20);
        for r in 5..15 {
            for c in 5..15 {
                mask.set(r, c, true).unwrap();
            }
        }
        let out = gaussian_rebinarize(&mask, 1.0).unwrap();
        assert!(out.get(10, 10).unwrap());
        assert!(!out.get(1, 1).unwrap());
    }

    #[test]
    fn test_full_mask_stays_full() {
        let mask = Mask::filled(6, 6, true);
        assert_eq!(gaussian_rebinarize(&mask, 2.0).unwrap().count_true(), 36);
    }

    #[test]
    fn test_nan_sigma_rejected() {
        assert!(gaussian_rebinarize(&Mask::new(2, 2), f64::NAN).is_err());
    }
}
