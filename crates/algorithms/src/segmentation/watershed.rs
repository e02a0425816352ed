//! Marker-controlled watershed flooding
//!
//! Priority flood over the negated distance field: the deepest points are
//! the centers of the objects, so basins grow outward from each marker and
//! meet along the ridges between touching objects.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use grainseg_core::{Connectivity, Error, LabelMap, Mask, Raster, Result};

/// A pending pixel, ordered by flooding level and then by insertion age
#[derive(Debug, Clone, Copy)]
struct Cell {
    level: f64,
    age: u64,
    row: usize,
    col: usize,
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cell {}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Reversed so the max-heap pops the lowest level, oldest first
impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .level
            .total_cmp(&self.level)
            .then_with(|| other.age.cmp(&self.age))
    }
}

/// Flood `markers` over `-distance` inside `mask`.
///
/// Pixels reached by two or more basins at once become watershed lines
/// (label 0) and stop the flood. Mask pixels no marker reaches stay 0.
pub fn watershed(distance: &Raster<f64>, markers: &LabelMap, mask: &Mask) -> Result<LabelMap> {
    mask.ensure_same_shape(distance)?;
    mask.ensure_same_shape(markers)?;

    let (rows, cols) = mask.shape();
    let fg = mask.data();
    let dist = distance.data();

    let mut labels = LabelMap::new(rows, cols);
    let mut queued = Mask::new(rows, cols);
    let mut heap = BinaryHeap::new();
    let mut age: u64 = 0;

    for ((row, col), &m) in markers.data().indexed_iter() {
        if m > 0 && fg[[row, col]] {
            labels.data_mut()[[row, col]] = m;
            queued.data_mut()[[row, col]] = true;
            heap.push(Cell { level: -dist[[row, col]], age, row, col });
            age += 1;
        } else if m < 0 {
            return Err(Error::Algorithm(format!("negative marker {} at ({}, {})", m, row, col)));
        }
    }

    let offsets = Connectivity::Four.offsets();
    while let Some(cell) = heap.pop() {
        let (row, col) = (cell.row, cell.col);

        if labels.data()[[row, col]] == 0 {
            let mut found = 0;
            let mut conflict = false;
            for &(dr, dc) in offsets {
                if let Some((nr, nc)) = mask.offset(row, col, dr, dc) {
                    let l = labels.data()[[nr, nc]];
                    if l > 0 {
                        if found == 0 {
                            found = l;
                        } else if l != found {
                            conflict = true;
                        }
                    }
                }
            }
            if conflict || found == 0 {
                continue;
            }
            labels.data_mut()[[row, col]] = found;
        }

        for &(dr, dc) in offsets {
            if let Some((nr, nc)) = mask.offset(row, col, dr, dc) {
                if fg[[nr, nc]] && !queued.data()[[nr, nc]] {
                    queued.data_mut()[[nr, nc]] = true;
                    heap.push(Cell { level: -dist[[nr, nc]], age, row: nr, col: nc });
                    age += 1;
                }
            }
        }
    }

    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heap_order() {
        let mut heap = BinaryHeap::new();
        heap.push(Cell { level: -1.0, age: 0, row: 0, col: 0 });
        heap.push(Cell { level: -3.0, age: 1, row: 0, col: 1 });
        heap.push(Cell { level: -3.0, age: 2, row: 0, col: 2 });
        assert_eq!(heap.pop().map(|c| c.col), Some(1));
        assert_eq!(heap.pop().map(|c| c.col), Some(2));
        assert_eq!(heap.pop().map(|c| c.col), Some(0));
    }

    #[test]
    fn test_two_markers_split_strip() {
        // A 1x9 strip with a valley in the middle of the distance field
        let mask = Mask::filled(1, 9, true);
        let dist = Raster::from_vec(vec![1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 3.0, 2.0, 1.0], 1, 9).unwrap();
        let mut markers = LabelMap::new(1, 9);
        markers.set(0, 2, 1).unwrap();
        markers.set(0, 6, 2).unwrap();

        let labels = watershed(&dist, &markers, &mask).unwrap();
        let row: Vec<i32> = labels.data().iter().copied().collect();
        assert_eq!(row, vec![1, 1, 1, 1, 0, 2, 2, 2, 2]);
    }

    #[test]
    fn test_unmarked_component_stays_zero() {
        let mask = Raster::from_vec(vec![true, true, false, true, true], 1, 5).unwrap();
        let dist = Raster::from_vec(vec![1.0, 1.0, 0.0, 1.0, 1.0], 1, 5).unwrap();
        let mut markers = LabelMap::new(1, 5);
        markers.set(0, 0, 4).unwrap();

        let labels = watershed(&dist, &markers, &mask).unwrap();
        let row: Vec<i32> = labels.data().iter().copied().collect();
        assert_eq!(row, vec![4, 4, 0, 0, 0]);
    }

    #[test]
    fn test_shape_mismatch() {
        let mask = Mask::new(2, 2);
        let dist = Raster::filled(2, 3, 0.0);
        let markers = LabelMap::new(2, 2);
        assert!(matches!(
            watershed(&dist, &markers, &mask),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
