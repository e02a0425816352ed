//! Qualitative palettes for label coloring.
//!
//! Colors match matplotlib's `tab10` and `tab20` listed colormaps.

use serde::{Deserialize, Serialize};

/// RGB color as (r, g, b) with values in 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn with_alpha(self, a: u8) -> [u8; 4] {
        [self.r, self.g, self.b, a]
    }
}

const TAB20: [Rgb; 20] = [
    Rgb::new(31, 119, 180),
    Rgb::new(174, 199, 232),
    Rgb::new(255, 127, 14),
    Rgb::new(255, 187, 120),
    Rgb::new(44, 160, 44),
    Rgb::new(152, 223, 138),
    Rgb::new(214, 39, 40),
    Rgb::new(255, 152, 150),
    Rgb::new(148, 103, 189),
    Rgb::new(197, 176, 213),
    Rgb::new(140, 86, 75),
    Rgb::new(196, 156, 148),
    Rgb::new(227, 119, 194),
    Rgb::new(247, 182, 210),
    Rgb::new(127, 127, 127),
    Rgb::new(199, 199, 199),
    Rgb::new(188, 189, 34),
    Rgb::new(219, 219, 141),
    Rgb::new(23, 190, 207),
    Rgb::new(158, 218, 229),
];

const TAB10: [Rgb; 10] = [
    Rgb::new(31, 119, 180),
    Rgb::new(255, 127, 14),
    Rgb::new(44, 160, 44),
    Rgb::new(214, 39, 40),
    Rgb::new(148, 103, 189),
    Rgb::new(140, 86, 75),
    Rgb::new(227, 119, 194),
    Rgb::new(127, 127, 127),
    Rgb::new(188, 189, 34),
    Rgb::new(23, 190, 207),
];

/// Available label palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualitativePalette {
    /// 20 colors in light/dark pairs
    #[default]
    Tab20,
    /// 10 saturated colors
    Tab10,
}

impl QualitativePalette {
    pub const ALL: &[QualitativePalette] = &[Self::Tab20, Self::Tab10];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Tab20 => "tab20",
            Self::Tab10 => "tab10",
        }
    }

    pub fn colors(&self) -> &'static [Rgb] {
        match self {
            Self::Tab20 => &TAB20,
            Self::Tab10 => &TAB10,
        }
    }

    /// Color of item `i` out of `k`, spread evenly over the palette.
    ///
    /// Index is `min(floor(i / (k - 1) * n), n - 1)` for `k > 1`, so the
    /// first and last items always get the first and last colors. A single
    /// item gets the first color.
    pub fn sample(&self, i: usize, k: usize) -> Rgb {
        let colors = self.colors();
        let n = colors.len();
        if k <= 1 {
            return colors[0];
        }
        let idx = ((i as f64 / (k - 1) as f64) * n as f64).floor() as usize;
        colors[idx.min(n - 1)]
    }
}
