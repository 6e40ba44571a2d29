//! Error types for dxf-document

use thiserror::Error;

/// Main error type for dxf-document operations
///
/// Malformed drawing content never produces an error; it degrades into
/// empty or `None` fields plus a notification. Errors are reserved for
/// misuse of the API surface.
#[derive(Debug, Error)]
pub enum DxfError {
    /// A group code could not be parsed from its textual form
    #[error("Invalid group code: {0:?}")]
    InvalidGroupCode(String),

    /// A tag value could not be coerced to the type its group code requires
    #[error("Invalid value for group code {code}: {value:?}")]
    InvalidTagValue { code: i32, value: String },

    /// Builder configuration rejected during validation
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

/// Result type alias for dxf-document operations
pub type Result<T> = std::result::Result<T, DxfError>;

impl From<String> for DxfError {
    fn from(s: String) -> Self {
        DxfError::Custom(s)
    }
}

impl From<&str> for DxfError {
    fn from(s: &str) -> Self {
        DxfError::Custom(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DxfError::InvalidGroupCode("abc".to_string());
        assert_eq!(err.to_string(), "Invalid group code: \"abc\"");
    }

    #[test]
    fn test_tag_value_error() {
        let err = DxfError::InvalidTagValue {
            code: 40,
            value: "x1".to_string(),
        };
        assert!(err.to_string().contains("40"));
        assert!(err.to_string().contains("x1"));
    }

    #[test]
    fn test_string_conversion() {
        let err: DxfError = "boom".into();
        assert!(matches!(err, DxfError::Custom(_)));
    }
}
