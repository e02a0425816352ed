//! Main Raster type

use crate::error::{Error, Result};
use ndarray::Array2;

/// A 2D grid of cells stored in row-major order.
///
/// `Raster<T>` is the common carrier for every per-pixel product of the
/// pipeline: boolean masks, integer label maps and floating point fields
/// such as distance transforms.
///
/// # Example
///
/// ```ignore
/// use grainseg_core::Raster;
///
/// let mut mask: Raster<bool> = Raster::new(100, 100);
/// mask.set(10, 20, true)?;
/// assert!(mask.get(10, 20)?);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Raster<T> {
    /// Raster data stored in row-major order (row, col)
    data: Array2<T>,
}

/// Binary foreground/background image
pub type Mask = Raster<bool>;

/// Integer image where each positive value identifies one object
pub type LabelMap = Raster<i32>;

impl<T: Copy + Default> Raster<T> {
    /// Create a new raster filled with `T::default()`
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: Array2::from_elem((rows, cols), T::default()),
        }
    }

    /// Create a new raster filled with a specific value
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: Array2::from_elem((rows, cols), value),
        }
    }

    /// Create a raster from existing row-major data
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::DimensionMismatch {
                er: rows,
                ec: cols,
                ar: data.len(),
                ac: 1,
            });
        }

        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self { data: array })
    }

    /// Create a raster from an ndarray
    pub fn from_array(data: Array2<T>) -> Self {
        Self { data }
    }

    /// Create a raster with the same dimensions, filled with a value
    pub fn like<U: Copy + Default>(&self, fill_value: U) -> Raster<U> {
        Raster {
            data: Array2::from_elem(self.data.dim(), fill_value),
        }
    }

    /// Apply `f` to every cell, producing a new raster
    pub fn map<U, F>(&self, f: F) -> Raster<U>
    where
        U: Copy + Default,
        F: FnMut(&T) -> U,
    {
        Raster {
            data: self.data.map(f),
        }
    }

    // Dimensions

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the raster is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check that `other` has the same extent as `self`
    pub fn ensure_same_shape<U>(&self, other: &Raster<U>) -> Result<()> {
        let (er, ec) = self.shape();
        let (ar, ac) = other.data.dim();
        if er != ar || ec != ac {
            return Err(Error::DimensionMismatch { er, ec, ar, ac });
        }
        Ok(())
    }

    /// Whether (row, col) offset by (dr, dc) stays inside the raster
    pub fn offset(&self, row: usize, col: usize, dr: isize, dc: isize) -> Option<(usize, usize)> {
        let r = row as isize + dr;
        let c = col as isize + dc;
        if r < 0 || c < 0 || r >= self.rows() as isize || c >= self.cols() as isize {
            None
        } else {
            Some((r as usize, c as usize))
        }
    }

    // Data access

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        self.data[(row, col)] = value;
        Ok(())
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    /// Get a mutable reference to the underlying array
    pub fn data_mut(&mut self) -> &mut Array2<T> {
        &mut self.data
    }

}

impl Raster<bool> {
    /// Number of foreground cells
    pub fn count_true(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }
}

impl Raster<i32> {
    /// Sorted distinct nonzero labels
    pub fn labels(&self) -> Vec<i32> {
        let mut labels: Vec<i32> = self.data.iter().copied().filter(|&v| v != 0).collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }

    /// Number of cells carrying `label`
    pub fn footprint(&self, label: i32) -> usize {
        self.data.iter().filter(|&&v| v == label).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_creation() {
        let raster: Raster<f32> = Raster::new(100, 200);
        assert_eq!(raster.rows(), 100);
        assert_eq!(raster.cols(), 200);
        assert_eq!(raster.shape(), (100, 200));
    }

    #[test]
    fn test_raster_access() {
        let mut raster: Raster<i32> = Raster::new(10, 10);
        raster.set(5, 5, 42).unwrap();
        assert_eq!(raster.get(5, 5).unwrap(), 42);
        assert!(raster.get(10, 0).is_err());
        assert!(raster.set(0, 10, 1).is_err());
    }

    #[test]
    fn test_from_vec_wrong_length() {
        assert!(Raster::from_vec(vec![0i32; 5], 2, 3).is_err());
    }

    #[test]
    fn test_labels_sorted_unique() {
        let r = Raster::from_vec(vec![0, 3, 3, 1, 0, 7, 1, 0, 3], 3, 3).unwrap();
        assert_eq!(r.labels(), vec![1, 3, 7]);
        assert_eq!(r.footprint(3), 3);
        assert_eq!(r.footprint(9), 0);
    }

    #[test]
    fn test_count_true_and_shape_check() {
        let mut m: Mask = Raster::new(4, 4);
        m.set(1, 1, true).unwrap();
        m.set(2, 3, true).unwrap();
        assert_eq!(m.count_true(), 2);

        let other: LabelMap = Raster::new(4, 5);
        assert!(m.ensure_same_shape(&other).is_err());
        assert!(m.ensure_same_shape(&m.like(0i32)).is_ok());
    }

    #[test]
    fn test_offset_bounds() {
        let r: Raster<u8> = Raster::new(3, 3);
        assert_eq!(r.offset(0, 0, -1, 0), None);
        assert_eq!(r.offset(1, 1, 1, 1), Some((2, 2)));
        assert_eq!(r.offset(2, 2, 0, 1), None);
    }
}
