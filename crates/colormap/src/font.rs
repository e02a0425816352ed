//! 5x7 bitmap digits for label numbers.

pub(crate) const GLYPH_WIDTH: usize = 5;
pub(crate) const GLYPH_HEIGHT: usize = 7;
/// Blank columns between glyphs, before scaling
pub(crate) const GLYPH_SPACING: usize = 1;

/// Rows of each digit, most significant bit = leftmost column.
const DIGITS: [[u8; GLYPH_HEIGHT]; 10] = [
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110], // 0
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110], // 1
    [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111], // 2
    [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110], // 3
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010], // 4
    [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110], // 5
    [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110], // 6
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000], // 7
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110], // 8
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100], // 9
];

/// Size in pixels of `text` rendered at `scale`
pub(crate) fn text_extent(text: &str, scale: usize) -> (usize, usize) {
    let n = text.chars().filter(char::is_ascii_digit).count();
    if n == 0 {
        return (0, 0);
    }
    let width = n * GLYPH_WIDTH + (n - 1) * GLYPH_SPACING;
    (GLYPH_HEIGHT * scale, width * scale)
}

/// Call `plot(dr, dc)` for every lit pixel of `text`, relative to its
/// top-left corner. Characters other than digits are skipped.
pub(crate) fn rasterize(text: &str, scale: usize, mut plot: impl FnMut(usize, usize)) {
    let digits = text.chars().filter_map(|ch| ch.to_digit(10));
    for (pos, d) in digits.enumerate() {
        let left = pos * (GLYPH_WIDTH + GLYPH_SPACING) * scale;
        for (gr, bits) in DIGITS[d as usize].iter().enumerate() {
            for gc in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - gc)) == 0 {
                    continue;
                }
                for sr in 0..scale {
                    for sc in 0..scale {
                        plot(gr * scale + sr, left + gc * scale + sc);
                    }
                }
            }
        }
    }
}
