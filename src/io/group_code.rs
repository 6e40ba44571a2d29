//! Group code value types
//!
//! Each DXF group code range carries one value type. The table below is the
//! single place that decides how raw tag text is coerced.

/// Value type carried by a group code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupCodeValueType {
    /// Text (names, descriptions, subclass markers)
    String,
    /// Hexadecimal object handle kept as text
    Handle,
    /// Hex-encoded binary chunk kept as text
    Binary,
    /// 64-bit floating point
    Double,
    /// 16-bit integer
    Int16,
    /// 32-bit integer
    Int32,
    /// 64-bit integer
    Int64,
    /// 8-bit integer
    Byte,
    /// Boolean stored as an integer
    Bool,
    /// Code outside every documented range
    Unknown,
}

impl GroupCodeValueType {
    /// Determine the value type from a group code
    pub fn from_code(code: i32) -> Self {
        match code {
            5 | 105 => Self::Handle,
            0..=9 | 100..=102 | 300..=309 | 410..=419 | 430..=439 | 470..=479 | 999 => {
                Self::String
            }
            1000..=1003 | 1006..=1009 => Self::String,
            1004 | 310..=319 => Self::Binary,
            1005 | 320..=369 | 390..=399 | 480..=481 => Self::Handle,
            10..=59 | 110..=149 | 210..=239 | 460..=469 | 1010..=1059 => Self::Double,
            60..=79 | 170..=179 | 270..=279 | 370..=389 | 400..=409 | 1060..=1070 => Self::Int16,
            280..=289 => Self::Byte,
            290..=299 => Self::Bool,
            90..=99 | 420..=429 | 440..=459 | 1071 => Self::Int32,
            160..=169 => Self::Int64,
            _ => Self::Unknown,
        }
    }

    /// Whether values of this type are always kept as text
    pub fn is_textual(&self) -> bool {
        matches!(self, Self::String | Self::Handle | Self::Binary)
    }

    /// Whether values of this type are integers
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::Int16 | Self::Int32 | Self::Int64 | Self::Byte | Self::Bool
        )
    }
}
