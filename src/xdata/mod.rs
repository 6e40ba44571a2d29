//! Extended Data (XDATA) support
//!
//! Extended data is application-specific data appended to a record. Each
//! application block starts with a 1001 tag naming a registered
//! application and runs until the next 1001 or the end of the record.
//! Values use group codes 1000-1071.

use crate::io::{Tag, TagValue};
use crate::types::{Handle, Vector3};

/// Extended data value types
#[derive(Debug, Clone, PartialEq)]
pub enum XDataValue {
    /// String value (group code 1000)
    String(String),
    /// Control string (group code 1002) - "{" or "}"
    ControlString(String),
    /// Layer name (group code 1003)
    LayerName(String),
    /// Hex-encoded binary chunk (group code 1004)
    BinaryData(String),
    /// Database handle (group code 1005)
    Handle(Handle),
    /// 3D point (group codes 1010, 1020, 1030)
    Point3D(Vector3),
    /// 3D position (group codes 1011, 1021, 1031)
    Position3D(Vector3),
    /// 3D displacement (group codes 1012, 1022, 1032)
    Displacement3D(Vector3),
    /// 3D direction (group codes 1013, 1023, 1033)
    Direction3D(Vector3),
    /// Real value (group code 1040)
    Real(f64),
    /// Distance (group code 1041)
    Distance(f64),
    /// Scale factor (group code 1042)
    ScaleFactor(f64),
    /// 16-bit integer (group code 1070)
    Integer16(i16),
    /// 32-bit integer (group code 1071)
    Integer32(i32),
}

impl XDataValue {
    /// Scalar value as a tag value (points have none)
    pub fn to_tag_value(&self) -> Option<TagValue> {
        match self {
            XDataValue::String(s)
            | XDataValue::ControlString(s)
            | XDataValue::LayerName(s)
            | XDataValue::BinaryData(s) => Some(TagValue::Str(s.clone())),
            XDataValue::Handle(h) => Some(TagValue::Str(h.to_hex())),
            XDataValue::Real(v) | XDataValue::Distance(v) | XDataValue::ScaleFactor(v) => {
                Some(TagValue::Num(*v))
            }
            XDataValue::Integer16(v) => Some(TagValue::Int(i64::from(*v))),
            XDataValue::Integer32(v) => Some(TagValue::Int(i64::from(*v))),
            _ => None,
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            XDataValue::Integer16(v) => Some(i64::from(*v)),
            XDataValue::Integer32(v) => Some(i64::from(*v)),
            _ => None,
        }
    }
}

/// Extended data record for a single application
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedDataRecord {
    /// Application name (from group code 1001)
    pub application_name: String,
    /// Extended data values
    pub values: Vec<XDataValue>,
}

impl ExtendedDataRecord {
    /// Create a new extended data record
    pub fn new(application_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
            values: Vec::new(),
        }
    }

    /// Add a value to the extended data
    pub fn add_value(&mut self, value: XDataValue) {
        self.values.push(value);
    }

    /// Get the number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the record is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Code/value pairs of a `1000 <name>` `1002 {` ... `1002 }` list.
    ///
    /// Inside the braces every 1070 names a group code and the value that
    /// follows it is that code's value. Used by the ACAD `DSTYLE` overrides.
    pub fn keyed_list(&self, name: &str) -> Vec<(i32, TagValue)> {
        let mut pairs = Vec::new();
        let start = self.values.iter().position(
            |v| matches!(v, XDataValue::String(s) if s.eq_ignore_ascii_case(name)),
        );
        let Some(start) = start else {
            return pairs;
        };

        let mut depth = 0usize;
        let mut key: Option<i32> = None;
        for value in &self.values[start + 1..] {
            match value {
                XDataValue::ControlString(s) if s.trim() == "{" => depth += 1,
                XDataValue::ControlString(s) if s.trim() == "}" => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        break;
                    }
                }
                _ if depth == 0 => break,
                XDataValue::Integer16(_) if key.is_none() => {
                    key = value.as_i64().and_then(|k| i32::try_from(k).ok());
                }
                other => {
                    if let (Some(code), Some(v)) = (key.take(), other.to_tag_value()) {
                        pairs.push((code, v));
                    }
                }
            }
        }
        pairs
    }
}

/// Extended data collection for a record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtendedData {
    records: Vec<ExtendedDataRecord>,
}

impl ExtendedData {
    /// Create a new extended data collection
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Collect every 1001 application block of a record body.
    ///
    /// Points are assembled from their X/Y/Z codes; tags before the first
    /// 1001 are ignored.
    pub fn from_tags(tags: &[Tag]) -> Self {
        let mut data = ExtendedData::new();
        let Some(first) = tags.iter().position(|t| t.code == 1001) else {
            return data;
        };

        let mut current: Option<ExtendedDataRecord> = None;
        let mut iter = tags[first..].iter().peekable();
        while let Some(tag) = iter.next() {
            if tag.code == 1001 {
                if let Some(record) = current.take() {
                    data.records.push(record);
                }
                current = Some(ExtendedDataRecord::new(tag.text().trim()));
                continue;
            }
            let Some(record) = current.as_mut() else {
                continue;
            };
            let value = match tag.code {
                1000 => XDataValue::String(tag.text().into_owned()),
                1002 => XDataValue::ControlString(tag.text().into_owned()),
                1003 => XDataValue::LayerName(tag.text().into_owned()),
                1004 => XDataValue::BinaryData(tag.text().into_owned()),
                1005 => match tag.as_handle() {
                    Some(h) => XDataValue::Handle(h),
                    None => continue,
                },
                1010..=1013 => {
                    let x = tag.as_f64().unwrap_or(0.0);
                    let mut y = 0.0;
                    let mut z = 0.0;
                    if let Some(next) = iter.next_if(|t| t.code == tag.code + 10) {
                        y = next.as_f64().unwrap_or(0.0);
                    }
                    if let Some(next) = iter.next_if(|t| t.code == tag.code + 20) {
                        z = next.as_f64().unwrap_or(0.0);
                    }
                    let p = Vector3::new(x, y, z);
                    match tag.code {
                        1010 => XDataValue::Point3D(p),
                        1011 => XDataValue::Position3D(p),
                        1012 => XDataValue::Displacement3D(p),
                        _ => XDataValue::Direction3D(p),
                    }
                }
                1040 => XDataValue::Real(tag.as_f64().unwrap_or(0.0)),
                1041 => XDataValue::Distance(tag.as_f64().unwrap_or(0.0)),
                1042 => XDataValue::ScaleFactor(tag.as_f64().unwrap_or(0.0)),
                1070 => XDataValue::Integer16(tag.as_i16().unwrap_or(0)),
                1071 => XDataValue::Integer32(tag.as_i32().unwrap_or(0)),
                _ => continue,
            };
            record.add_value(value);
        }
        if let Some(record) = current {
            data.records.push(record);
        }
        data
    }

    /// Add a record to the collection
    pub fn add_record(&mut self, record: ExtendedDataRecord) {
        self.records.push(record);
    }

    /// Get all records
    pub fn records(&self) -> &[ExtendedDataRecord] {
        &self.records
    }

    /// Get a record by application name (case-insensitive)
    pub fn get_record(&self, application_name: &str) -> Option<&ExtendedDataRecord> {
        self.records
            .iter()
            .find(|r| r.application_name.eq_ignore_ascii_case(application_name))
    }

    /// Dimension style overrides from the `ACAD` application
    pub fn dimension_style_overrides(&self) -> Vec<(i32, TagValue)> {
        self.get_record("ACAD")
            .map(|r| r.keyed_list("DSTYLE"))
            .unwrap_or_default()
    }

    /// Raw `AcCmTransparency` value (1071)
    pub fn transparency(&self) -> Option<i64> {
        self.get_record("AcCmTransparency")?
            .values
            .iter()
            .find_map(|v| match v {
                XDataValue::Integer32(v) => Some(i64::from(*v)),
                _ => None,
            })
    }

    /// Get the number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(i32, &str)]) -> Vec<Tag> {
        pairs.iter().map(|(c, v)| Tag::from_raw(*c, v, 0)).collect()
    }

    #[test]
    fn test_xdata_record_creation() {
        let mut record = ExtendedDataRecord::new("MYAPP");
        assert_eq!(record.application_name, "MYAPP");
        assert!(record.is_empty());

        record.add_value(XDataValue::String("test".to_string()));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_groups_split_on_1001() {
        let t = tags(&[
            (8, "0"),
            (1001, "APP1"),
            (1040, "3.5"),
            (1010, "1"),
            (1020, "2"),
            (1030, "3"),
            (1001, "APP2"),
            (1005, "2F"),
        ]);
        let xdata = ExtendedData::from_tags(&t);
        assert_eq!(xdata.len(), 2);
        let app1 = xdata.get_record("app1").expect("APP1");
        assert_eq!(
            app1.values,
            vec![
                XDataValue::Real(3.5),
                XDataValue::Point3D(Vector3::new(1.0, 2.0, 3.0))
            ]
        );
        assert_eq!(
            xdata.get_record("APP2").map(|r| r.values.clone()),
            Some(vec![XDataValue::Handle(Handle::new(0x2F))])
        );
    }

    #[test]
    fn test_dimension_style_overrides() {
        let t = tags(&[
            (1001, "ACAD"),
            (1000, "DSTYLE"),
            (1002, "{"),
            (1070, "140"),
            (1040, "0.25"),
            (1070, "77"),
            (1070, "1"),
            (1070, "3"),
            (1000, "mm"),
            (1002, "}"),
        ]);
        let overrides = ExtendedData::from_tags(&t).dimension_style_overrides();
        assert_eq!(
            overrides,
            vec![
                (140, TagValue::Num(0.25)),
                (77, TagValue::Int(1)),
                (3, TagValue::Str("mm".into())),
            ]
        );
    }

    #[test]
    fn test_transparency_value() {
        let t = tags(&[(1001, "AcCmTransparency"), (1071, "33554559")]);
        assert_eq!(ExtendedData::from_tags(&t).transparency(), Some(33554559));
    }
}
