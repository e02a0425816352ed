//! Raster image decoding and encoding
//!
//! Uses the `image` crate for PNG, TIFF and JPEG. Decoding takes an explicit
//! [`ReadOptions`] so the maximum-size guard is a per-call value.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, GrayImage, ImageReader, RgbImage, RgbaImage};
use ndarray::Array3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::image::{ImageBuffer, ImageSource};

/// Default pixel-count ceiling for decoded images
pub const DEFAULT_MAX_PIXELS: u64 = 500_000_000;

/// Options for decoding images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadOptions {
    /// Reject images with more pixels than this. `None` disables the check.
    pub max_pixels: Option<u64>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            max_pixels: Some(DEFAULT_MAX_PIXELS),
        }
    }
}

impl ReadOptions {
    fn check(&self, width: u64, height: u64) -> Result<()> {
        let pixels = width.saturating_mul(height);
        match self.max_pixels {
            Some(limit) if pixels > limit => Err(Error::ImageTooLarge { pixels, limit }),
            _ => Ok(()),
        }
    }
}

fn codec(e: image::ImageError) -> Error {
    Error::Codec(e.to_string())
}

/// Read an image file into an [`ImageBuffer`]
///
/// 8-bit gray, RGB and RGBA images keep their channel layout; every other
/// pixel format is converted to RGBA8.
pub fn read_image<P: AsRef<Path>>(path: P, options: &ReadOptions) -> Result<ImageBuffer> {
    let path = path.as_ref();
    let (width, height) = ImageReader::open(path)?
        .with_guessed_format()?
        .into_dimensions()
        .map_err(codec)?;
    options.check(width.into(), height.into())?;

    let decoded = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(codec)?;
    debug!("decoded {} ({}x{})", path.display(), width, height);
    from_dynamic(decoded)
}

/// Decode an in-memory encoded image
pub fn read_image_from_buffer(data: &[u8], options: &ReadOptions) -> Result<ImageBuffer> {
    let (width, height) = ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .into_dimensions()
        .map_err(codec)?;
    options.check(width.into(), height.into())?;

    let decoded = ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .decode()
        .map_err(codec)?;
    from_dynamic(decoded)
}

/// Materialize an [`ImageSource`] as an [`ImageBuffer`]
pub fn load_source(source: ImageSource, options: &ReadOptions) -> Result<ImageBuffer> {
    match source {
        ImageSource::Raw {
            data,
            width,
            height,
        } => {
            options.check(width as u64, height as u64)?;
            ImageBuffer::from_rgba_raw(data, width, height)
        }
        ImageSource::Path(path) => read_image(path, options),
    }
}

fn from_dynamic(img: DynamicImage) -> Result<ImageBuffer> {
    let (cols, rows) = (img.width() as usize, img.height() as usize);
    let (channels, raw) = match img {
        DynamicImage::ImageLuma8(buf) => (1, buf.into_raw()),
        DynamicImage::ImageRgb8(buf) => (3, buf.into_raw()),
        DynamicImage::ImageRgba8(buf) => (4, buf.into_raw()),
        other => (4, other.to_rgba8().into_raw()),
    };
    let data = Array3::from_shape_vec((rows, cols, channels), raw)
        .map_err(|e| Error::Other(e.to_string()))?;
    Ok(ImageBuffer::from_array(data))
}

/// Write an [`ImageBuffer`] to disk; the format follows the file extension
pub fn write_image<P: AsRef<Path>>(image: &ImageBuffer, path: P) -> Result<()> {
    let (rows, cols) = image.shape();
    let (w, h) = (cols as u32, rows as u32);
    let raw: Vec<u8> = image.data().iter().copied().collect();
    let too_short = || Error::Other("pixel buffer shorter than image extent".into());

    let result = match image.channels() {
        1 => GrayImage::from_raw(w, h, raw).ok_or_else(too_short)?.save(path.as_ref()),
        3 => RgbImage::from_raw(w, h, raw).ok_or_else(too_short)?.save(path.as_ref()),
        4 => RgbaImage::from_raw(w, h, raw).ok_or_else(too_short)?.save(path.as_ref()),
        channels => return Err(Error::InvalidShape { ndim: 3, channels }),
    };
    result.map_err(codec)
}

/// Write a row-major RGBA byte buffer as an image file
pub fn write_rgba<P: AsRef<Path>>(rgba: &[u8], rows: usize, cols: usize, path: P) -> Result<()> {
    let expected = crate::image::rgba_len(cols, rows, rgba.len())?;
    if rgba.len() != expected {
        return Err(Error::SizeMismatch {
            expected,
            actual: rgba.len(),
        });
    }
    RgbaImage::from_raw(cols as u32, rows as u32, rgba.to_vec())
        .ok_or_else(|| Error::Other("pixel buffer shorter than image extent".into()))?
        .save(path.as_ref())
        .map_err(codec)
}

/// Write one PNG per `(label, image)` pair as `<prefix>_<label>.png`.
///
/// `dest` is created if missing. Returns the number of files written.
pub fn write_object_images<'a, I, P>(objects: I, dest: P, prefix: &str) -> Result<usize>
where
    I: IntoIterator<Item = (i32, &'a ImageBuffer)>,
    P: AsRef<Path>,
{
    let dest = dest.as_ref();
    fs::create_dir_all(dest)?;
    let mut count = 0;
    for (label, image) in objects {
        write_image(image, dest.join(format!("{prefix}_{label}.png")))?;
        count += 1;
    }
    debug!("wrote {} object images to {}", count, dest.display());
    Ok(count)
}
