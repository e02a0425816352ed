//! Per-object shape descriptors produced by the measurement stage

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Tight half-open pixel rectangle: rows `min_row..max_row`, cols `min_col..max_col`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_row: usize,
    pub min_col: usize,
    pub max_row: usize,
    pub max_col: usize,
}

impl BoundingBox {
    pub fn height(&self) -> usize {
        self.max_row - self.min_row
    }

    pub fn width(&self) -> usize {
        self.max_col - self.min_col
    }
}

/// Shape measurements for one labeled object.
///
/// Field names are the column names of the tabular export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MorphologyRecord {
    pub label: i32,
    pub area: usize,
    pub perimeter: f64,
    /// (row, col)
    pub centroid: (f64, f64),
    pub bbox: BoundingBox,
    pub major_axis_length: f64,
    pub minor_axis_length: f64,
    pub feret_diameter_max: f64,
    pub eccentricity: f64,
    pub equivalent_diameter: f64,
    pub solidity: f64,
    pub circularity: f64,
}

impl MorphologyRecord {
    /// Column names in export order
    pub const COLUMNS: [&'static str; 12] = [
        "label",
        "area",
        "perimeter",
        "centroid",
        "bbox",
        "major_axis_length",
        "minor_axis_length",
        "feret_diameter_max",
        "eccentricity",
        "equivalent_diameter",
        "solidity",
        "circularity",
    ];

    /// Scalar value of a filterable attribute
    pub fn value(&self, attribute: MorphologyAttribute) -> f64 {
        match attribute {
            MorphologyAttribute::Area => self.area as f64,
            MorphologyAttribute::Perimeter => self.perimeter,
            MorphologyAttribute::MajorAxisLength => self.major_axis_length,
            MorphologyAttribute::MinorAxisLength => self.minor_axis_length,
            MorphologyAttribute::FeretDiameterMax => self.feret_diameter_max,
            MorphologyAttribute::Eccentricity => self.eccentricity,
            MorphologyAttribute::EquivalentDiameter => self.equivalent_diameter,
            MorphologyAttribute::Solidity => self.solidity,
            MorphologyAttribute::Circularity => self.circularity,
        }
    }
}

/// Scalar fields of [`MorphologyRecord`] that range criteria can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MorphologyAttribute {
    Area,
    Perimeter,
    MajorAxisLength,
    MinorAxisLength,
    FeretDiameterMax,
    Eccentricity,
    EquivalentDiameter,
    Solidity,
    Circularity,
}

impl MorphologyAttribute {
    pub const ALL: &[MorphologyAttribute] = &[
        Self::Area,
        Self::Perimeter,
        Self::MajorAxisLength,
        Self::MinorAxisLength,
        Self::FeretDiameterMax,
        Self::Eccentricity,
        Self::EquivalentDiameter,
        Self::Solidity,
        Self::Circularity,
    ];

    /// Record field name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Area => "area",
            Self::Perimeter => "perimeter",
            Self::MajorAxisLength => "major_axis_length",
            Self::MinorAxisLength => "minor_axis_length",
            Self::FeretDiameterMax => "feret_diameter_max",
            Self::Eccentricity => "eccentricity",
            Self::EquivalentDiameter => "equivalent_diameter",
            Self::Solidity => "solidity",
            Self::Circularity => "circularity",
        }
    }
}

impl fmt::Display for MorphologyAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MorphologyAttribute {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.name() == key)
            .ok_or_else(|| Error::UnknownAttribute(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_names_roundtrip() {
        for &attr in MorphologyAttribute::ALL {
            assert_eq!(attr.name().parse::<MorphologyAttribute>().unwrap(), attr);
            assert!(MorphologyRecord::COLUMNS.contains(&attr.name()));
        }
        assert!("roundness".parse::<MorphologyAttribute>().is_err());
    }

    #[test]
    fn test_bbox_extent_is_half_open() {
        let bbox = BoundingBox { min_row: 2, min_col: 5, max_row: 4, max_col: 6 };
        assert_eq!(bbox.height(), 2);
        assert_eq!(bbox.width(), 1);
    }
}
