//! DXF tag (group code / value / line triple)

use std::borrow::Cow;
use std::fmt;

use super::group_code::GroupCodeValueType;
use crate::error::{DxfError, Result};
use crate::types::Handle;

/// Scalar carried by a tag
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// Text value
    Str(String),
    /// Integer value
    Int(i64),
    /// Floating point value
    Num(f64),
}

impl TagValue {
    /// Borrow the value if it is text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Text form of any value
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            TagValue::Str(s) => Cow::Borrowed(s.as_str()),
            TagValue::Int(v) => Cow::Owned(v.to_string()),
            TagValue::Num(v) => Cow::Owned(v.to_string()),
        }
    }

    /// Value as f64; text is parsed leniently
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TagValue::Num(v) => Some(*v),
            TagValue::Int(v) => Some(*v as f64),
            TagValue::Str(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }

    /// Value as i64; integral floats are accepted
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TagValue::Int(v) => Some(*v),
            TagValue::Num(v) => integral(*v),
            TagValue::Str(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<i64>()
                    .ok()
                    .or_else(|| trimmed.parse::<f64>().ok().and_then(integral))
            }
        }
    }
}

fn integral(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

impl From<&str> for TagValue {
    fn from(s: &str) -> Self {
        TagValue::Str(s.to_string())
    }
}

impl From<String> for TagValue {
    fn from(s: String) -> Self {
        TagValue::Str(s)
    }
}

impl From<i64> for TagValue {
    fn from(v: i64) -> Self {
        TagValue::Int(v)
    }
}

impl From<i32> for TagValue {
    fn from(v: i32) -> Self {
        TagValue::Int(v as i64)
    }
}

impl From<f64> for TagValue {
    fn from(v: f64) -> Self {
        TagValue::Num(v)
    }
}

/// A single DXF tag as produced by the tokenizer
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    /// The DXF group code
    pub code: i32,
    /// The typed value
    pub value: TagValue,
    /// Tokenizer line number of the code line
    pub line: u32,
}

impl Tag {
    /// Create a new tag.
    ///
    /// Values for always-text group codes are normalised to `TagValue::Str`
    /// so a tokenizer that eagerly parsed `"0"` as a number (layer names,
    /// handles) still yields text.
    pub fn new(code: i32, value: impl Into<TagValue>, line: u32) -> Self {
        let value = value.into();
        let value = match value {
            TagValue::Str(_) => value,
            other if GroupCodeValueType::from_code(code).is_textual() => {
                TagValue::Str(other.text().into_owned())
            }
            other => other,
        };
        Self { code, value, line }
    }

    /// Create a tag from raw value text, coercing by the group code's type.
    ///
    /// Numeric text that does not parse is kept as the literal string.
    pub fn from_raw(code: i32, raw: &str, line: u32) -> Self {
        let value_type = GroupCodeValueType::from_code(code);
        let trimmed = raw.trim();
        let value = if value_type.is_textual() {
            TagValue::Str(raw.to_string())
        } else if value_type.is_integer() {
            match TagValue::Str(trimmed.to_string()).as_i64() {
                Some(v) => TagValue::Int(v),
                None => TagValue::Str(raw.to_string()),
            }
        } else if value_type == GroupCodeValueType::Double {
            match trimmed.parse::<f64>() {
                Ok(v) if v.is_finite() => TagValue::Num(v),
                _ => TagValue::Str(raw.to_string()),
            }
        } else if let Ok(v) = trimmed.parse::<i64>() {
            TagValue::Int(v)
        } else if let Ok(v) = trimmed.parse::<f64>() {
            TagValue::Num(v)
        } else {
            TagValue::Str(raw.to_string())
        };
        Self { code, value, line }
    }

    /// Parse a tag from the two text lines of a DXF pair
    pub fn parse(code_text: &str, raw: &str, line: u32) -> Result<Self> {
        let code = code_text
            .trim()
            .parse::<i32>()
            .map_err(|_| DxfError::InvalidGroupCode(code_text.to_string()))?;
        Ok(Self::from_raw(code, raw, line))
    }

    /// Like [`Tag::parse`], but numeric group codes must carry numeric text
    pub fn parse_strict(code_text: &str, raw: &str, line: u32) -> Result<Self> {
        let tag = Self::parse(code_text, raw, line)?;
        let value_type = GroupCodeValueType::from_code(tag.code);
        let numeric = value_type.is_integer() || value_type == GroupCodeValueType::Double;
        if numeric && matches!(tag.value, TagValue::Str(_)) && !raw.trim().is_empty() {
            return Err(DxfError::InvalidTagValue {
                code: tag.code,
                value: raw.to_string(),
            });
        }
        Ok(tag)
    }

    /// Check whether this is a `0` marker with the given record name
    pub fn is_marker(&self, name: &str) -> bool {
        self.code == 0 && self.value.as_str().is_some_and(|s| s.trim() == name)
    }

    /// Borrow the value as text (text values only)
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }

    /// Text form of the value
    pub fn text(&self) -> Cow<'_, str> {
        self.value.text()
    }

    /// Get value as f64
    pub fn as_f64(&self) -> Option<f64> {
        self.value.as_f64()
    }

    /// Get value as i64
    pub fn as_i64(&self) -> Option<i64> {
        self.value.as_i64()
    }

    /// Get value as i32
    pub fn as_i32(&self) -> Option<i32> {
        self.as_i64().and_then(|v| i32::try_from(v).ok())
    }

    /// Get value as i16
    pub fn as_i16(&self) -> Option<i16> {
        self.as_i64().and_then(|v| i16::try_from(v).ok())
    }

    /// Get value as boolean (non-zero is true)
    pub fn as_bool(&self) -> Option<bool> {
        self.as_i64().map(|v| v != 0)
    }

    /// Get value as handle (hex text)
    pub fn as_handle(&self) -> Option<Handle> {
        Handle::parse(&self.text())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>3} {}", self.code, self.value)
    }
}
