//! Channel-last 8-bit image buffers and the two ways of supplying one

use std::path::PathBuf;

use ndarray::{Array2, Array3, ArrayD, ArrayView1, Axis, Ix2, Ix3};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An 8-bit image stored as a (rows, cols, channels) array.
///
/// Grayscale images carry a single channel; RGB and RGBA carry 3 and 4.
/// Pipeline stages only ever borrow an `ImageBuffer`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    data: Array3<u8>,
}

impl ImageBuffer {
    /// Wrap an existing (rows, cols, channels) array
    pub fn from_array(data: Array3<u8>) -> Self {
        Self { data }
    }

    /// Wrap a 2D grayscale array as a single-channel image
    pub fn from_gray(data: Array2<u8>) -> Self {
        Self {
            data: data.insert_axis(Axis(2)),
        }
    }

    /// Build from an array of arbitrary dimensionality.
    ///
    /// 2D arrays are grayscale, 3D arrays are channel-last. Anything else
    /// fails with [`Error::InvalidShape`].
    pub fn from_dyn(data: ArrayD<u8>) -> Result<Self> {
        let ndim = data.ndim();
        match ndim {
            2 => {
                let gray = data
                    .into_dimensionality::<Ix2>()
                    .map_err(|e| Error::Other(e.to_string()))?;
                Ok(Self::from_gray(gray))
            }
            3 => {
                let data = data
                    .into_dimensionality::<Ix3>()
                    .map_err(|e| Error::Other(e.to_string()))?;
                Ok(Self { data })
            }
            _ => Err(Error::InvalidShape { ndim, channels: 0 }),
        }
    }

    /// Rebuild an RGBA image from a flattened row-major byte buffer
    pub fn from_rgba_raw(data: Vec<u8>, width: usize, height: usize) -> Result<Self> {
        let expected = rgba_len(width, height, data.len())?;
        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        let data = Array3::from_shape_vec((height, width, 4), data)
            .map_err(|e| Error::Other(e.to_string()))?;
        Ok(Self { data })
    }

    /// Create an image with every sample set to `value`
    pub fn filled(rows: usize, cols: usize, channels: usize, value: u8) -> Self {
        Self {
            data: Array3::from_elem((rows, cols, channels), value),
        }
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.shape()[0]
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.shape()[1]
    }

    /// Number of channels per pixel
    pub fn channels(&self) -> usize {
        self.data.shape()[2]
    }

    /// Spatial dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &Array3<u8> {
        &self.data
    }

    /// Get a mutable reference to the underlying array
    pub fn data_mut(&mut self) -> &mut Array3<u8> {
        &mut self.data
    }

    /// All channel samples of one pixel
    pub fn pixel(&self, row: usize, col: usize) -> ArrayView1<'_, u8> {
        self.data.slice(ndarray::s![row, col, ..])
    }

    /// RGB triple of one pixel, replicating grayscale and ignoring extra
    /// channels. Returns `None` for layouts with neither 1 nor >= 3 channels.
    pub fn rgb(&self, row: usize, col: usize) -> Option<[u8; 3]> {
        match self.channels() {
            1 => {
                let v = self.data[(row, col, 0)];
                Some([v, v, v])
            }
            c if c >= 3 => Some([
                self.data[(row, col, 0)],
                self.data[(row, col, 1)],
                self.data[(row, col, 2)],
            ]),
            _ => None,
        }
    }
}

/// The caller-facing description of where an image comes from.
///
/// Exactly one supply mode must be present: a flattened RGBA buffer with
/// its width and height, or a path to an encoded image file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageRequest {
    pub data: Option<Vec<u8>>,
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub image_path: Option<PathBuf>,
}

/// A validated image supply mode
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Flattened RGBA samples
    Raw {
        data: Vec<u8>,
        width: usize,
        height: usize,
    },
    /// Encoded image file on disk
    Path(PathBuf),
}

impl ImageRequest {
    /// Resolve to a single [`ImageSource`].
    ///
    /// Fails with [`Error::InputAmbiguity`] when both or neither mode is
    /// given, or when raw data is missing its width or height, and with
    /// [`Error::SizeMismatch`] when the raw length is not `width*height*4`.
    pub fn into_source(self) -> Result<ImageSource> {
        match (self.data, self.image_path) {
            (Some(_), Some(_)) | (None, None) => Err(Error::InputAmbiguity(
                "provide exactly one of: (data + width + height) or image_path".into(),
            )),
            (None, Some(path)) => Ok(ImageSource::Path(path)),
            (Some(data), None) => {
                let (width, height) = match (self.width, self.height) {
                    (Some(w), Some(h)) => (w, h),
                    _ => {
                        return Err(Error::InputAmbiguity(
                            "width and height are required with raw data".into(),
                        ))
                    }
                };
                let expected = rgba_len(width, height, data.len())?;
                if data.len() != expected {
                    return Err(Error::SizeMismatch {
                        expected,
                        actual: data.len(),
                    });
                }
                Ok(ImageSource::Raw {
                    data,
                    width,
                    height,
                })
            }
        }
    }
}

/// Byte length of a `width` x `height` RGBA buffer; an extent too large to
/// address is reported as a mismatch against `actual`.
pub(crate) fn rgba_len(width: usize, height: usize, actual: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(4))
        .ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    #[test]
    fn test_raw_extent_overflow_is_size_mismatch() {
        let err = ImageBuffer::from_rgba_raw(vec![0; 8], usize::MAX, 2).unwrap_err();
        assert!(matches!(err, Error::SizeMismatch { expected: usize::MAX, actual: 8 }));

        let request = ImageRequest {
            data: Some(vec![0; 8]),
            width: Some(usize::MAX / 2),
            height: Some(3),
            image_path: None,
        };
        assert!(matches!(request.into_source(), Err(Error::SizeMismatch { .. })));
    }

    #[test]
    fn test_from_rgba_raw() {
        let data: Vec<u8> = (0..24).collect();
        let img = ImageBuffer::from_rgba_raw(data, 3, 2).unwrap();
        assert_eq!(img.shape(), (2, 3));
        assert_eq!(img.channels(), 4);
        // Row 1, col 0 starts at byte (1*3 + 0) * 4 = 12
        assert_eq!(img.rgb(1, 0), Some([12, 13, 14]));
    }

    #[test]
    fn test_from_rgba_raw_size_mismatch() {
        let err = ImageBuffer::from_rgba_raw(vec![0; 10], 2, 2).unwrap_err();
        assert!(matches!(err, Error::SizeMismatch { expected: 16, actual: 10 }));
    }

    #[test]
    fn test_from_dyn_dimensionality() {
        let gray = ArrayD::<u8>::zeros(IxDyn(&[4, 5]));
        let img = ImageBuffer::from_dyn(gray).unwrap();
        assert_eq!(img.channels(), 1);

        let flat = ArrayD::<u8>::zeros(IxDyn(&[20]));
        assert!(matches!(
            ImageBuffer::from_dyn(flat),
            Err(Error::InvalidShape { ndim: 1, .. })
        ));
    }

    #[test]
    fn test_rgb_replicates_gray_and_rejects_two_channels() {
        let img = ImageBuffer::filled(2, 2, 1, 77);
        assert_eq!(img.rgb(0, 1), Some([77, 77, 77]));

        let two = ImageBuffer::filled(2, 2, 2, 5);
        assert_eq!(two.rgb(0, 0), None);
    }

    #[test]
    fn test_request_requires_exactly_one_mode() {
        let neither = ImageRequest::default();
        assert!(matches!(neither.into_source(), Err(Error::InputAmbiguity(_))));

        let both = ImageRequest {
            data: Some(vec![0; 4]),
            width: Some(1),
            height: Some(1),
            image_path: Some("roi.png".into()),
        };
        assert!(matches!(both.into_source(), Err(Error::InputAmbiguity(_))));

        let raw = ImageRequest {
            data: Some(vec![0; 8]),
            width: Some(2),
            height: Some(1),
            image_path: None,
        };
        assert!(matches!(
            raw.into_source().unwrap(),
            ImageSource::Raw { width: 2, height: 1, .. }
        ));
    }

    #[test]
    fn test_request_raw_length_checked() {
        let raw = ImageRequest {
            data: Some(vec![0; 7]),
            width: Some(2),
            height: Some(1),
            image_path: None,
        };
        assert!(matches!(raw.into_source(), Err(Error::SizeMismatch { .. })));
    }
}
