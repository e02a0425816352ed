//! Label map to RGBA overlay rendering.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::font::{rasterize, text_extent};
use crate::scheme::QualitativePalette;
use grainseg_core::{LabelMap, Mask, MorphologyRecord, Result};

/// Parameters for overlay rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayParams {
    /// Alpha of colored object pixels.
    pub alpha: u8,
    pub palette: QualitativePalette,
    /// Draw each record's label at its centroid.
    pub draw_numbers: bool,
    /// RGBA of the numbers.
    pub number_color: [u8; 4],
    /// Pixel size of one font cell.
    pub text_scale: usize,
}

impl Default for OverlayParams {
    fn default() -> Self {
        Self {
            alpha: 200,
            palette: QualitativePalette::Tab20,
            draw_numbers: true,
            number_color: [0, 0, 0, 255],
            text_scale: 3,
        }
    }
}

/// Row-major RGBA image with the extent of the label map it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub rows: usize,
    pub cols: usize,
    /// `rows * cols * 4` bytes
    pub rgba: Vec<u8>,
}

impl Overlay {
    pub fn pixel(&self, row: usize, col: usize) -> Option<[u8; 4]> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let o = (row * self.cols + col) * 4;
        Some([self.rgba[o], self.rgba[o + 1], self.rgba[o + 2], self.rgba[o + 3]])
    }

    pub fn is_fully_transparent(&self) -> bool {
        self.rgba.chunks_exact(4).all(|p| p[3] == 0)
    }

    fn put(&mut self, row: usize, col: usize, color: [u8; 4]) {
        let o = (row * self.cols + col) * 4;
        self.rgba[o..o + 4].copy_from_slice(&color);
    }
}

/// Color every nonzero label and optionally number the records.
///
/// The K distinct labels, ascending, take palette colors spread evenly
/// across the palette. Background and pixels where `suppress` is false
/// stay `(0, 0, 0, 0)`; numbers are drawn after suppression and clipped at
/// the image edge. A `suppress` mask must match the label map's shape.
pub fn render_overlay(
    labels: &LabelMap,
    records: &[MorphologyRecord],
    params: &OverlayParams,
    suppress: Option<&Mask>,
) -> Result<Overlay> {
    if let Some(mask) = suppress {
        labels.ensure_same_shape(mask)?;
    }
    let (rows, cols) = labels.shape();
    let mut overlay = Overlay {
        rows,
        cols,
        rgba: vec![0u8; rows * cols * 4],
    };

    let objects = labels.labels();
    let k = objects.len();
    if k == 0 {
        debug!("overlay: no objects");
        return Ok(overlay);
    }

    for ((r, c), &l) in labels.data().indexed_iter() {
        if l == 0 {
            continue;
        }
        if let Some(mask) = suppress {
            if !mask.data()[[r, c]] {
                continue;
            }
        }
        if let Ok(i) = objects.binary_search(&l) {
            let color = params.palette.sample(i, k);
            overlay.put(r, c, color.with_alpha(params.alpha));
        }
    }

    if params.draw_numbers && params.text_scale > 0 {
        for record in records.iter().filter(|r| r.label != 0) {
            draw_number(&mut overlay, record, params);
        }
    }

    debug!("overlay: {} objects on {}x{}", k, cols, rows);
    Ok(overlay)
}

fn draw_number(overlay: &mut Overlay, record: &MorphologyRecord, params: &OverlayParams) {
    let text = record.label.to_string();
    let (h, w) = text_extent(&text, params.text_scale);
    let top = (record.centroid.0 - h as f64 / 2.0).round() as isize;
    let left = (record.centroid.1 - w as f64 / 2.0).round() as isize;
    let (rows, cols) = (overlay.rows as isize, overlay.cols as isize);

    rasterize(&text, params.text_scale, |dr, dc| {
        let r = top + dr as isize;
        let c = left + dc as isize;
        if r >= 0 && c >= 0 && r < rows && c < cols {
            overlay.put(r as usize, c as usize, params.number_color);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use grainseg_core::{BoundingBox, Error, Raster};

    fn record(label: i32, centroid: (f64, f64)) -> MorphologyRecord {
        MorphologyRecord {
            label,
            area: 1,
            perimeter: 0.0,
            centroid,
            bbox: BoundingBox { min_row: 0, min_col: 0, max_row: 1, max_col: 1 },
            major_axis_length: 0.0,
            minor_axis_length: 0.0,
            feret_diameter_max: 1.0,
            eccentricity: 0.0,
            equivalent_diameter: 1.0,
            solidity: 1.0,
            circularity: 0.0,
        }
    }

    fn no_numbers() -> OverlayParams {
        OverlayParams {
            draw_numbers: false,
            ..Default::default()
        }
    }

    #[test]
    fn empty_labels_fully_transparent() {
        let labels = LabelMap::new(10, 10);
        let overlay = render_overlay(&labels, &[], &OverlayParams::default(), None).unwrap();
        assert_eq!(overlay.rgba.len(), 400);
        assert!(overlay.is_fully_transparent());
    }

    #[test]
    fn colors_spread_over_palette() {
        let labels = Raster::from_vec(vec![0, 4, 9, 0, 2, 9], 2, 3).unwrap();
        let overlay = render_overlay(&labels, &[], &no_numbers(), None).unwrap();
        let tab = QualitativePalette::Tab20;
        // Labels 2, 4, 9 -> items 0, 1, 2 of 3
        assert_eq!(overlay.pixel(1, 1), Some(tab.sample(0, 3).with_alpha(200)));
        assert_eq!(overlay.pixel(0, 1), Some(tab.sample(1, 3).with_alpha(200)));
        assert_eq!(overlay.pixel(0, 2), Some(tab.sample(2, 3).with_alpha(200)));
        assert_eq!(overlay.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn suppression_clears_pixels() {
        let labels = Raster::filled(2, 2, 1);
        let mut keep = Mask::filled(2, 2, true);
        keep.set(0, 0, false).unwrap();
        let overlay = render_overlay(&labels, &[], &no_numbers(), Some(&keep)).unwrap();
        assert_eq!(overlay.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(overlay.pixel(1, 1).map(|p| p[3]), Some(200));
    }

    #[test]
    fn suppression_mask_must_match_shape() {
        let labels = Raster::filled(2, 2, 1);
        let keep = Mask::filled(2, 3, true);
        let err = render_overlay(&labels, &[], &no_numbers(), Some(&keep)).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { er: 2, ec: 2, ar: 2, ac: 3 }));
    }

    #[test]
    fn numbers_drawn_at_centroid() {
        let labels = Raster::filled(40, 40, 1);
        let overlay = render_overlay(&labels, &[record(1, (20.0, 20.0))], &OverlayParams::default(), None).unwrap();
        // Glyph "1" is 21x15 at scale 3; its stem covers the centroid
        assert_eq!(overlay.pixel(20, 20), Some([0, 0, 0, 255]));
        assert_eq!(overlay.pixel(0, 0).map(|p| p[3]), Some(200));
    }

    #[test]
    fn numbers_clip_at_edge() {
        let labels = Raster::filled(5, 5, 3);
        let overlay = render_overlay(&labels, &[record(3, (0.0, 0.0)), record(0, (2.0, 2.0))], &OverlayParams::default(), None).unwrap();
        assert_eq!(overlay.rgba.len(), 100);
        assert!(!overlay.is_fully_transparent());
    }
}
