//! Marker selection from a distance field

use grainseg_core::{Connectivity, Mask, Raster};

/// Local maxima of `distance` inside `mask`, thinned by spacing.
///
/// A candidate is a foreground pixel with a positive distance that is at
/// least as large as every foreground pixel of its 3x3 window. Candidates are visited from the largest
/// distance down (raster order on ties) and kept unless an already kept
/// marker lies within Chebyshev distance `min_distance - 1`.
pub fn find_markers(distance: &Raster<f64>, mask: &Mask, min_distance: usize) -> Mask {
    let (rows, cols) = mask.shape();
    let dist = distance.data();
    let fg = mask.data();

    let mut candidates: Vec<(usize, usize)> = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            if !fg[[row, col]] {
                continue;
            }
            let v = dist[[row, col]];
            if v <= 0.0 {
                continue;
            }
            let is_peak = Connectivity::Eight
                .offsets()
                .iter()
                .filter_map(|&(dr, dc)| mask.offset(row, col, dr, dc))
                .filter(|&(r, c)| fg[[r, c]])
                .all(|(r, c)| dist[[r, c]] <= v);
            if is_peak {
                candidates.push((row, col));
            }
        }
    }

    // Stable sort keeps raster order among equal distances
    candidates.sort_by(|a, b| dist[[b.0, b.1]].total_cmp(&dist[[a.0, a.1]]));

    let mut markers = Mask::new(rows, cols);
    if min_distance <= 1 {
        for (r, c) in candidates {
            markers.data_mut()[[r, c]] = true;
        }
        return markers;
    }

    let reach = (min_distance - 1) as isize;
    let mut blocked = Mask::new(rows, cols);
    for (r, c) in candidates {
        if blocked.data()[[r, c]] {
            continue;
        }
        markers.data_mut()[[r, c]] = true;
        for dr in -reach..=reach {
            for dc in -reach..=reach {
                if let Some((br, bc)) = mask.offset(r, c, dr, dc) {
                    blocked.data_mut()[[br, bc]] = true;
                }
            }
        }
    }
    markers
}
