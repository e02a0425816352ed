//! Exact Euclidean distance transform
//!
//! Two passes of the lower-envelope-of-parabolas algorithm (Felzenszwalb &
//! Huttenlocher), first down each column then along each row, over squared
//! distances.

use ndarray::Array2;

use crate::maybe_rayon::*;
use grainseg_core::{Error, Mask, Raster, Result};

/// Distance from each foreground pixel to the nearest background pixel.
///
/// Background pixels are 0. When the mask has no background at all, every
/// pixel gets the image diagonal, which exceeds any real distance.
pub fn distance_transform(mask: &Mask) -> Result<Raster<f64>> {
    let (rows, cols) = mask.shape();
    if mask.count_true() == mask.len() {
        let diagonal = (rows as f64).hypot(cols as f64);
        return Ok(mask.like(diagonal));
    }

    let data = mask.data();

    // Column pass, stored column-major
    let columns: Vec<f64> = (0..cols)
        .into_par_iter()
        .flat_map(|col| {
            let f: Vec<f64> = (0..rows)
                .map(|row| if data[[row, col]] { f64::INFINITY } else { 0.0 })
                .collect();
            let mut out = vec![0.0; rows];
            squared_distance_1d(&f, &mut out);
            out
        })
        .collect();

    let squared: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let f: Vec<f64> = (0..cols).map(|col| columns[col * rows + row]).collect();
            let mut out = vec![0.0; cols];
            squared_distance_1d(&f, &mut out);
            out
        })
        .collect();

    let dist = Array2::from_shape_vec((rows, cols), squared)
        .map_err(|e| Error::Other(e.to_string()))?
        .mapv(f64::sqrt);
    Ok(Raster::from_array(dist))
}

/// 1D squared distance transform of the sampled function `f`.
///
/// Infinite samples contribute no parabola; if every sample is infinite the
/// output is infinite too.
fn squared_distance_1d(f: &[f64], out: &mut [f64]) {
    let mut vertices: Vec<usize> = Vec::with_capacity(f.len());
    let mut bounds: Vec<f64> = Vec::with_capacity(f.len());

    for (q, &fq) in f.iter().enumerate() {
        if fq.is_infinite() {
            continue;
        }
        let qf = q as f64;
        while let Some(&p) = vertices.last() {
            let pf = p as f64;
            let s = ((fq + qf * qf) - (f[p] + pf * pf)) / (2.0 * qf - 2.0 * pf);
            if bounds.last().is_some_and(|&z| s <= z) {
                vertices.pop();
                bounds.pop();
            } else {
                vertices.push(q);
                bounds.push(s);
                break;
            }
        }
        if vertices.is_empty() {
            vertices.push(q);
            bounds.push(f64::NEG_INFINITY);
        }
    }

    if vertices.is_empty() {
        out.fill(f64::INFINITY);
        return;
    }

    let mut k = 0;
    for (x, o) in out.iter_mut().enumerate() {
        let xf = x as f64;
        while k + 1 < vertices.len() && bounds[k + 1] < xf {
            k += 1;
        }
        let d = xf - vertices[k] as f64;
        *o = d * d + f[vertices[k]];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn brute_force(mask: &Mask) -> Vec<f64> {
        let (rows, cols) = mask.shape();
        let mut out = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                if !mask.get(r, c).unwrap() {
                    out.push(0.0);
                    continue;
                }
                let mut best = f64::INFINITY;
                for br in 0..rows {
                    for bc in 0..cols {
                        if !mask.get(br, bc).unwrap() {
                            let d = ((br as f64 - r as f64).powi(2) + (bc as f64 - c as f64).powi(2)).sqrt();
                            best = best.min(d);
                        }
                    }
                }
                out.push(best);
            }
        }
        out
    }

    #[test]
    fn test_single_background_pixel() {
        let mut mask = Mask::filled(5, 7, true);
        mask.set(2, 3, false).unwrap();
        let dist = distance_transform(&mask).unwrap();
        assert_eq!(dist.get(2, 3).unwrap(), 0.0);
        assert_relative_eq!(dist.get(0, 0).unwrap(), 13f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(dist.get(2, 6).unwrap(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_matches_brute_force() {
        let pattern = [
            "##########", "###.######", "##########", "######..##", "##########",
            "#####.####", "##########",
        ];
        let data = pattern.iter().flat_map(|s| s.chars().map(|ch| ch == '#')).collect();
        let mask = Raster::from_vec(data, 7, 10).unwrap();
        let dist = distance_transform(&mask).unwrap();
        for (got, want) in dist.data().iter().zip(brute_force(&mask)) {
            assert_relative_eq!(*got, want, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_no_background() {
        let mask = Mask::filled(3, 4, true);
        let dist = distance_transform(&mask).unwrap();
        assert_relative_eq!(dist.get(1, 1).unwrap(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_mask_is_zero() {
        let dist = distance_transform(&Mask::new(3, 3)).unwrap();
        assert!(dist.data().iter().all(|&v| v == 0.0));
    }
}
