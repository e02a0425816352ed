//! Hole filling for binary masks

use std::collections::VecDeque;

use grainseg_core::{Connectivity, Mask};

/// Fill background regions that cannot be reached from the image border.
///
/// Background is flooded 4-connected from every border pixel; whatever the
/// flood misses is enclosed and becomes foreground.
pub fn fill_holes(mask: &Mask) -> Mask {
    let (rows, cols) = mask.shape();
    let mut outside = Mask::new(rows, cols);
    let mut queue = VecDeque::new();

    let data = mask.data();
    let seed = |r: usize, c: usize, outside: &mut Mask, queue: &mut VecDeque<(usize, usize)>| {
        if !data[[r, c]] && !outside.data()[[r, c]] {
            outside.data_mut()[[r, c]] = true;
            queue.push_back((r, c));
        }
    };

    for c in 0..cols {
        seed(0, c, &mut outside, &mut queue);
        if rows > 1 {
            seed(rows - 1, c, &mut outside, &mut queue);
        }
    }
    for r in 0..rows {
        seed(r, 0, &mut outside, &mut queue);
        if cols > 1 {
            seed(r, cols - 1, &mut outside, &mut queue);
        }
    }

    while let Some((r, c)) = queue.pop_front() {
        for &(dr, dc) in Connectivity::Four.offsets() {
            if let Some((nr, nc)) = mask.offset(r, c, dr, dc) {
                seed(nr, nc, &mut outside, &mut queue);
            }
        }
    }

    outside.map(|&o| !o)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grainseg_core::Raster;

    fn mask_from(rows: &[&str]) -> Mask {
        let data = rows.iter().flat_map(|s| s.chars().map(|ch| ch == '#')).collect();
        Raster::from_vec(data, rows.len(), rows[0].len()).unwrap()
    }

    #[test]
    fn test_fills_enclosed_hole() {
        let mask = mask_from(&[".....", ".###.", ".#.#.", ".###.", "....."]);
        let out = fill_holes(&mask);
        assert!(out.get(2, 2).unwrap());
        assert_eq!(out.count_true(), 9);
    }

    #[test]
    fn test_diagonal_leak_is_not_a_hole() {
        // The gap at (2,2) touches the outside only diagonally: with a
        // 4-connected flood it stays enclosed.
        let mask = mask_from(&[".....", ".##..", ".#.#.", "..##.", "....."]);
        let out = fill_holes(&mask);
        assert!(out.get(2, 2).unwrap());
    }

    #[test]
    fn test_border_background_survives() {
        let mask = mask_from(&["#.#", "#.#", "###"]);
        let out = fill_holes(&mask);
        assert_eq!(out, mask);
    }

    #[test]
    fn test_empty_and_full() {
        let empty = Mask::new(4, 4);
        assert_eq!(fill_holes(&empty).count_true(), 0);
        let full = Mask::filled(4, 4, true);
        assert_eq!(fill_holes(&full).count_true(), 16);
    }
}
