//! Weighted border perimeter estimate
//!
//! Border pixels are those removed by a 4-connected erosion (outside the
//! region counts as background). Each border pixel is scored by the
//! configuration of border pixels around it: straight runs count 1,
//! diagonal runs sqrt(2) and corners (1 + sqrt(2)) / 2.

use std::f64::consts::SQRT_2;

use ndarray::Array2;

const EDGE_WEIGHT: i32 = 2;
const CORNER_WEIGHT: i32 = 10;

fn configuration_weight(code: i32) -> f64 {
    match code {
        5 | 7 | 15 | 17 | 25 | 27 => 1.0,
        21 | 33 => SQRT_2,
        13 | 23 => (1.0 + SQRT_2) / 2.0,
        _ => 0.0,
    }
}

/// Perimeter of the foreground of `region`, a mask padded by at least one
/// background pixel on every side. A lone pixel has perimeter 0.
pub(crate) fn weighted_perimeter(region: &Array2<bool>) -> f64 {
    let (rows, cols) = region.dim();
    let at = |r: isize, c: isize| -> bool {
        r >= 0 && c >= 0 && (r as usize) < rows && (c as usize) < cols && region[[r as usize, c as usize]]
    };

    let mut border = Array2::from_elem((rows, cols), false);
    for ((r, c), &v) in region.indexed_iter() {
        if !v {
            continue;
        }
        let (r, c) = (r as isize, c as isize);
        let interior = at(r - 1, c) && at(r + 1, c) && at(r, c - 1) && at(r, c + 1);
        border[[r as usize, c as usize]] = !interior;
    }

    let is_border = |r: isize, c: isize| -> i32 {
        let inside = r >= 0 && c >= 0 && (r as usize) < rows && (c as usize) < cols;
        i32::from(inside && border[[r as usize, c as usize]])
    };

    let mut total = 0.0;
    for ((r, c), &b) in border.indexed_iter() {
        if !b {
            continue;
        }
        let (r, c) = (r as isize, c as isize);
        let edges = is_border(r - 1, c) + is_border(r + 1, c) + is_border(r, c - 1) + is_border(r, c + 1);
        let corners = is_border(r - 1, c - 1)
            + is_border(r - 1, c + 1)
            + is_border(r + 1, c - 1)
            + is_border(r + 1, c + 1);
        total += configuration_weight(1 + EDGE_WEIGHT * edges + CORNER_WEIGHT * corners);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn padded(rows: &[&str]) -> Array2<bool> {
        let h = rows.len() + 2;
        let w = rows[0].len() + 2;
        let mut out = Array2::from_elem((h, w), false);
        for (r, line) in rows.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                out[[r + 1, c + 1]] = ch == '#';
            }
        }
        out
    }

    #[test]
    fn test_single_pixel_zero() {
        assert_eq!(weighted_perimeter(&padded(&["#"])), 0.0);
    }

    #[test]
    fn test_square_block() {
        // Every ring pixel of a 3x3 block sits on a straight run
        let p = weighted_perimeter(&padded(&["###", "###", "###"]));
        assert_relative_eq!(p, 8.0, epsilon = 1e-12);
        assert_relative_eq!(weighted_perimeter(&padded(&["##", "##"])), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_horizontal_line() {
        // Interior run pixels score 1 each, the two end pixels score 0
        let p = weighted_perimeter(&padded(&["#####"]));
        assert_relative_eq!(p, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_diagonal_line() {
        let p = weighted_perimeter(&padded(&["#..", ".#.", "..#"]));
        assert_relative_eq!(p, SQRT_2, epsilon = 1e-12);
    }
}
