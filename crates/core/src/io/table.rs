//! Morphology table as comma-separated text
//!
//! One row per object, label ascending. Tuple fields (`centroid`, `bbox`)
//! are written as parenthesized text, e.g. `"(12.5, 40)"`.

use std::io;

use crate::error::{Error, Result};
use crate::morphology::{BoundingBox, MorphologyRecord};

/// Write records as CSV with a header row
pub fn write_morphology_csv<W: io::Write>(records: &[MorphologyRecord], writer: W) -> Result<()> {
    let mut sorted: Vec<&MorphologyRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.label);

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(MorphologyRecord::COLUMNS)?;
    for r in sorted {
        let b = &r.bbox;
        wtr.write_record(&[
            r.label.to_string(),
            r.area.to_string(),
            r.perimeter.to_string(),
            format!("({}, {})", r.centroid.0, r.centroid.1),
            format!("({}, {}, {}, {})", b.min_row, b.min_col, b.max_row, b.max_col),
            r.major_axis_length.to_string(),
            r.minor_axis_length.to_string(),
            r.feret_diameter_max.to_string(),
            r.eccentricity.to_string(),
            r.equivalent_diameter.to_string(),
            r.solidity.to_string(),
            r.circularity.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render records as a CSV string
pub fn morphology_csv_string(records: &[MorphologyRecord]) -> Result<String> {
    let mut buf = Vec::new();
    write_morphology_csv(records, &mut buf)?;
    String::from_utf8(buf).map_err(|e| Error::Other(e.to_string()))
}

/// Parse records previously written by [`write_morphology_csv`]
pub fn read_morphology_csv<R: io::Read>(reader: R) -> Result<Vec<MorphologyRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);

    let headers = rdr.headers()?.clone();
    if !headers.iter().eq(MorphologyRecord::COLUMNS.iter().copied()) {
        return Err(Error::Other(format!(
            "unexpected morphology columns: {}",
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let field = |i: usize| row.get(i).unwrap_or_default();

        let centroid = parse_tuple(field(3), 2)?;
        let bbox = parse_tuple(field(4), 4)?;
        records.push(MorphologyRecord {
            label: parse(field(0), "label")?,
            area: parse(field(1), "area")?,
            perimeter: parse(field(2), "perimeter")?,
            centroid: (centroid[0], centroid[1]),
            bbox: BoundingBox {
                min_row: bbox[0] as usize,
                min_col: bbox[1] as usize,
                max_row: bbox[2] as usize,
                max_col: bbox[3] as usize,
            },
            major_axis_length: parse(field(5), "major_axis_length")?,
            minor_axis_length: parse(field(6), "minor_axis_length")?,
            feret_diameter_max: parse(field(7), "feret_diameter_max")?,
            eccentricity: parse(field(8), "eccentricity")?,
            equivalent_diameter: parse(field(9), "equivalent_diameter")?,
            solidity: parse(field(10), "solidity")?,
            circularity: parse(field(11), "circularity")?,
        });
    }
    Ok(records)
}

fn parse<T: std::str::FromStr>(s: &str, column: &str) -> Result<T> {
    s.trim()
        .parse()
        .map_err(|_| Error::Other(format!("invalid value '{}' in column {}", s, column)))
}

fn parse_tuple(s: &str, len: usize) -> Result<Vec<f64>> {
    let inner = s.trim().trim_start_matches('(').trim_end_matches(')');
    let values = inner
        .split(',')
        .map(|v| parse::<f64>(v, "tuple"))
        .collect::<Result<Vec<f64>>>()?;
    if values.len() != len {
        return Err(Error::Other(format!("expected {len} values in '{s}'")));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(label: i32) -> MorphologyRecord {
        MorphologyRecord {
            label,
            area: 100,
            perimeter: 35.5,
            centroid: (10.5, 20.25),
            bbox: BoundingBox { min_row: 5, min_col: 15, max_row: 16, max_col: 26 },
            major_axis_length: 11.0,
            minor_axis_length: 10.0,
            feret_diameter_max: 12.0,
            eccentricity: 0.4,
            equivalent_diameter: 11.28,
            solidity: 0.97,
            circularity: 0.99,
        }
    }

    #[test]
    fn test_header_and_label_order() {
        let csv = morphology_csv_string(&[record(7), record(2)]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "label,area,perimeter,centroid,bbox,major_axis_length,minor_axis_length,\
             feret_diameter_max,eccentricity,equivalent_diameter,solidity,circularity"
        );
        assert!(lines.next().unwrap().starts_with("2,100,35.5,\"(10.5, 20.25)\",\"(5, 15, 16, 26)\""));
        assert!(lines.next().unwrap().starts_with("7,"));
    }

    #[test]
    fn test_read_back() {
        let csv = morphology_csv_string(&[record(1), record(3)]).unwrap();
        let back = read_morphology_csv(csv.as_bytes()).unwrap();
        assert_eq!(back, vec![record(1), record(3)]);
    }

    #[test]
    fn test_empty_table_has_header_only() {
        let csv = morphology_csv_string(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
        assert!(read_morphology_csv(csv.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_foreign_columns() {
        let csv = "label,size\n1,4\n";
        assert!(read_morphology_csv(csv.as_bytes()).is_err());
    }
}
