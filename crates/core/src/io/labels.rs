//! Label map persistence as single-band 32-bit integer TIFF

use std::fs::File;
use std::io::Cursor;
use std::path::Path;

use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::GrayI32;
use tiff::encoder::TiffEncoder;

use crate::error::{Error, Result};
use crate::raster::{LabelMap, Raster};

/// Write a label map to a TIFF file
pub fn write_label_map<P: AsRef<Path>>(labels: &LabelMap, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    encode_label_map(labels, file)
}

/// Write a label map to an in-memory TIFF buffer
pub fn write_label_map_to_buffer(labels: &LabelMap) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_label_map(labels, Cursor::new(&mut buf))?;
    Ok(buf)
}

/// Read a label map from a TIFF file
pub fn read_label_map<P: AsRef<Path>>(path: P) -> Result<LabelMap> {
    let file = File::open(path.as_ref())?;
    decode_label_map(file)
}

/// Read a label map from an in-memory TIFF buffer
pub fn read_label_map_from_buffer(data: &[u8]) -> Result<LabelMap> {
    decode_label_map(Cursor::new(data))
}

fn encode_label_map<W>(labels: &LabelMap, writer: W) -> Result<()>
where
    W: std::io::Write + std::io::Seek,
{
    let mut encoder = TiffEncoder::new(writer)
        .map_err(|e| Error::Codec(format!("TIFF encoder error: {}", e)))?;

    let (rows, cols) = labels.shape();
    let data: Vec<i32> = labels.data().iter().copied().collect();

    encoder
        .write_image::<GrayI32>(cols as u32, rows as u32, &data)
        .map_err(|e| Error::Codec(format!("Cannot write label data: {}", e)))?;

    Ok(())
}

fn decode_label_map<R>(reader: R) -> Result<LabelMap>
where
    R: std::io::Read + std::io::Seek,
{
    let mut decoder =
        Decoder::new(reader).map_err(|e| Error::Codec(format!("TIFF decode error: {}", e)))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| Error::Codec(format!("Cannot read dimensions: {}", e)))?;
    let rows = height as usize;
    let cols = width as usize;

    let result = decoder
        .read_image()
        .map_err(|e| Error::Codec(format!("Cannot read label data: {}", e)))?;

    let data: Vec<i32> = match result {
        DecodingResult::I32(buf) => buf,
        DecodingResult::U8(buf) => buf.into_iter().map(i32::from).collect(),
        DecodingResult::U16(buf) => buf.into_iter().map(i32::from).collect(),
        DecodingResult::I16(buf) => buf.into_iter().map(i32::from).collect(),
        DecodingResult::U32(buf) => buf
            .into_iter()
            .map(|v| i32::try_from(v).map_err(|_| Error::Codec(format!("label {v} overflows i32"))))
            .collect::<Result<_>>()?,
        _ => return Err(Error::Codec("Unsupported label map pixel format".to_string())),
    };

    Raster::from_vec(data, rows, cols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_map_buffer_roundtrip() {
        let labels = Raster::from_vec(vec![0, 1, 1, 0, 70000, 2], 2, 3).unwrap();
        let buf = write_label_map_to_buffer(&labels).unwrap();
        let back = read_label_map_from_buffer(&buf).unwrap();
        assert_eq!(back, labels);
    }

    #[test]
    fn test_label_map_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.tif");
        let labels = Raster::from_vec(vec![3; 12], 3, 4).unwrap();
        write_label_map(&labels, &path).unwrap();
        assert_eq!(read_label_map(&path).unwrap(), labels);
    }
}
