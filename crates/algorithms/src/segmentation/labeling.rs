//! Connected-component labeling

use std::collections::VecDeque;

use grainseg_core::{Connectivity, LabelMap, Mask};

/// Label the connected foreground components of `mask`.
///
/// Labels run from 1 in raster order of each component's first pixel;
/// background is 0. Returns the map and the number of components.
pub fn label_components(mask: &Mask, connectivity: Connectivity) -> (LabelMap, usize) {
    let (rows, cols) = mask.shape();
    let mut labels = LabelMap::new(rows, cols);
    let data = mask.data();
    let offsets = connectivity.offsets();

    let mut next: i32 = 0;
    let mut queue = VecDeque::new();

    for row in 0..rows {
        for col in 0..cols {
            if !data[[row, col]] || labels.data()[[row, col]] != 0 {
                continue;
            }
            next += 1;
            labels.data_mut()[[row, col]] = next;
            queue.push_back((row, col));

            while let Some((r, c)) = queue.pop_front() {
                for &(dr, dc) in offsets {
                    if let Some((nr, nc)) = mask.offset(r, c, dr, dc) {
                        if data[[nr, nc]] && labels.data()[[nr, nc]] == 0 {
                            labels.data_mut()[[nr, nc]] = next;
                            queue.push_back((nr, nc));
                        }
                    }
                }
            }
        }
    }

    (labels, next as usize)
}

/// Pixel count per label, indexed by label value (index 0 is background)
pub fn component_sizes(labels: &LabelMap, count: usize) -> Vec<usize> {
    let mut sizes = vec![0usize; count + 1];
    for &v in labels.data().iter() {
        if v > 0 && (v as usize) <= count {
            sizes[v as usize] += 1;
        }
    }
    sizes
}
