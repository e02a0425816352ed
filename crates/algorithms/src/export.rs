//! Per-object image extraction
//!
//! Each object is cut out of the source image along its bounding box and
//! pasted over a white background, so neighbouring objects that fall
//! inside the box do not show.

use std::path::Path;

use grainseg_core::io::write_object_images;
use grainseg_core::{Error, ImageBuffer, LabelMap, MorphologyRecord, Result};

/// One cropped object
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectImage {
    pub label: i32,
    pub image: ImageBuffer,
}

/// Crop every record's object out of `image` over white
pub fn extract_objects(
    image: &ImageBuffer,
    labels: &LabelMap,
    records: &[MorphologyRecord],
) -> Result<Vec<ObjectImage>> {
    let (rows, cols) = labels.shape();
    let (ir, ic) = image.shape();
    if (ir, ic) != (rows, cols) {
        return Err(Error::DimensionMismatch { er: rows, ec: cols, ar: ir, ac: ic });
    }

    let channels = image.channels();
    let src = image.data();
    let lab = labels.data();

    records
        .iter()
        .map(|record| {
            let b = record.bbox;
            if b.max_row > rows || b.max_col > cols || b.min_row > b.max_row || b.min_col > b.max_col {
                return Err(Error::IndexOutOfBounds {
                    row: b.max_row,
                    col: b.max_col,
                    rows,
                    cols,
                });
            }

            let mut crop = ImageBuffer::filled(b.height(), b.width(), channels, 255);
            let out = crop.data_mut();
            for r in b.min_row..b.max_row {
                for c in b.min_col..b.max_col {
                    if lab[[r, c]] == record.label {
                        for ch in 0..channels {
                            out[[r - b.min_row, c - b.min_col, ch]] = src[[r, c, ch]];
                        }
                    }
                }
            }
            Ok(ObjectImage { label: record.label, image: crop })
        })
        .collect()
}

/// Write `<prefix>_<label>.png` for every record into `dest`.
///
/// Returns the number of images written.
pub fn export_objects<P: AsRef<Path>>(
    image: &ImageBuffer,
    labels: &LabelMap,
    records: &[MorphologyRecord],
    dest: P,
    prefix: &str,
) -> Result<usize> {
    let objects = extract_objects(image, labels, records)?;
    write_object_images(objects.iter().map(|o| (o.label, &o.image)), dest, prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::measure_morphology;
    use grainseg_core::Raster;

    fn scene() -> (ImageBuffer, LabelMap) {
        let mut image = ImageBuffer::filled(4, 5, 3, 0);
        for r in 0..4 {
            for c in 0..5 {
                image.data_mut()[[r, c, 0]] = (10 * r + c) as u8;
            }
        }
        let labels = Raster::from_vec(
            vec![
                1, 1, 0, 0, 0, //
                1, 2, 2, 0, 0, //
                0, 2, 2, 0, 3, //
                0, 0, 0, 0, 3,
            ],
            4,
            5,
        )
        .unwrap();
        (image, labels)
    }

    #[test]
    fn test_crop_over_white() {
        let (image, labels) = scene();
        let records = measure_morphology(&labels);
        let objects = extract_objects(&image, &labels, &records).unwrap();
        assert_eq!(objects.len(), 3);

        let first = &objects[0];
        assert_eq!(first.label, 1);
        assert_eq!(first.image.shape(), (2, 2));
        assert_eq!(first.image.data()[[0, 0, 0]], 0);
        assert_eq!(first.image.data()[[1, 0, 0]], 10);
        // (1,1) belongs to label 2, so it is white in label 1's crop
        assert_eq!(first.image.pixel(1, 1).to_vec(), vec![255, 255, 255]);

        let third = &objects[2];
        assert_eq!(third.image.shape(), (2, 1));
        assert_eq!(third.image.data()[[1, 0, 0]], 34);
    }

    #[test]
    fn test_export_writes_files() {
        let (image, labels) = scene();
        let records = measure_morphology(&labels);
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("objects");

        let n = export_objects(&image, &labels, &records, &dest, "pollen").unwrap();
        assert_eq!(n, 3);
        for label in [1, 2, 3] {
            assert!(dest.join(format!("pollen_{label}.png")).is_file());
        }
    }

    #[test]
    fn test_size_mismatch() {
        let (_, labels) = scene();
        let image = ImageBuffer::filled(3, 3, 3, 0);
        assert!(matches!(
            extract_objects(&image, &labels, &[]),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
