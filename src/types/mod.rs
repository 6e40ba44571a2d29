//! Core value types shared by tables, objects and entities

mod color;
mod handle;
mod line_weight;
mod transparency;
mod units;
mod vector;

pub use color::Color;
pub use handle::Handle;
pub use line_weight::LineWeight;
pub use transparency::Transparency;
pub use units::{unit_name, unit_to_meters, UNIT_TO_METERS};
pub use vector::{Vector2, Vector3};

use std::fmt;

/// DXF file version as declared by `$ACADVER`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum DxfVersion {
    /// Version string missing or not recognised
    #[default]
    Unknown,
    /// R12
    AC1009,
    /// R13
    AC1012,
    /// R14
    AC1014,
    /// AutoCAD 2000
    AC1015,
    /// AutoCAD 2004
    AC1018,
    /// AutoCAD 2007
    AC1021,
    /// AutoCAD 2010
    AC1024,
    /// AutoCAD 2013
    AC1027,
    /// AutoCAD 2018
    AC1032,
}

impl DxfVersion {
    /// Parse the `$ACADVER` string (case-insensitive)
    pub fn from_version_string(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "AC1009" => DxfVersion::AC1009,
            "AC1012" => DxfVersion::AC1012,
            "AC1014" => DxfVersion::AC1014,
            "AC1015" => DxfVersion::AC1015,
            "AC1018" => DxfVersion::AC1018,
            "AC1021" => DxfVersion::AC1021,
            "AC1024" => DxfVersion::AC1024,
            "AC1027" => DxfVersion::AC1027,
            "AC1032" => DxfVersion::AC1032,
            _ => DxfVersion::Unknown,
        }
    }

    /// Release name used by AutoCAD for this version
    pub fn release_name(&self) -> &'static str {
        match self {
            DxfVersion::Unknown => "unknown",
            DxfVersion::AC1009 => "R12",
            DxfVersion::AC1012 => "R13",
            DxfVersion::AC1014 => "R14",
            DxfVersion::AC1015 => "2000",
            DxfVersion::AC1018 => "2004",
            DxfVersion::AC1021 => "2007",
            DxfVersion::AC1024 => "2010",
            DxfVersion::AC1027 => "2013",
            DxfVersion::AC1032 => "2018",
        }
    }

    /// Files from AutoCAD 2007 on are always UTF-8
    pub fn is_unicode(&self) -> bool {
        *self >= DxfVersion::AC1021
    }
}

impl fmt::Display for DxfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parsing() {
        assert_eq!(DxfVersion::from_version_string("AC1015"), DxfVersion::AC1015);
        assert_eq!(DxfVersion::from_version_string(" ac1032 "), DxfVersion::AC1032);
        assert_eq!(DxfVersion::from_version_string("AC9999"), DxfVersion::Unknown);
    }

    #[test]
    fn test_version_ordering() {
        assert!(DxfVersion::AC1021.is_unicode());
        assert!(!DxfVersion::AC1018.is_unicode());
        assert_eq!(DxfVersion::AC1027.release_name(), "2013");
    }
}
