//! Handle type for DXF objects
//!
//! Handles are hexadecimal identifiers used for indirection between records.
//! They are parsed case-insensitively and compared as integers, so `"1a"`
//! and `"1A"` name the same object.

use std::fmt;

/// A unique identifier for DXF objects
///
/// Handle 0 is reserved and means "no object".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u64);

impl Handle {
    /// The null/invalid handle (0)
    pub const NULL: Handle = Handle(0);

    /// Create a new handle from a u64 value
    #[inline]
    pub const fn new(value: u64) -> Self {
        Handle(value)
    }

    /// Parse a handle from its hexadecimal text form.
    ///
    /// Surrounding whitespace is ignored. Empty, non-hex and zero values
    /// yield `None`.
    pub fn parse(text: &str) -> Option<Handle> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        u64::from_str_radix(trimmed, 16)
            .ok()
            .map(Handle)
            .filter(Handle::is_valid)
    }

    /// Get the raw u64 value
    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Check if this is a null/invalid handle
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Check if this is a valid handle
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.0 != 0
    }

    /// Normalised text form (upper-case hex, no prefix)
    pub fn to_hex(&self) -> String {
        format!("{:X}", self.0)
    }
}

impl Default for Handle {
    fn default() -> Self {
        Handle::NULL
    }
}

impl From<u64> for Handle {
    fn from(value: u64) -> Self {
        Handle(value)
    }
}

impl From<Handle> for u64 {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}", self.0)
    }
}

impl fmt::UpperHex for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_parse_is_case_insensitive() {
        assert_eq!(Handle::parse("1a"), Handle::parse("1A"));
        assert_eq!(Handle::parse("1A"), Some(Handle::new(0x1A)));
    }

    #[test]
    fn test_handle_parse_rejects_garbage() {
        assert_eq!(Handle::parse(""), None);
        assert_eq!(Handle::parse("   "), None);
        assert_eq!(Handle::parse("xyz"), None);
        assert_eq!(Handle::parse("0"), None);
    }

    #[test]
    fn test_null_handle() {
        let null = Handle::NULL;
        assert!(null.is_null());
        assert!(!null.is_valid());
        assert_eq!(Handle::default(), Handle::NULL);
    }

    #[test]
    fn test_handle_display() {
        let handle = Handle::new(0xABCD);
        assert_eq!(handle.to_string(), "ABCD");
        assert_eq!(handle.to_hex(), "ABCD");
    }

    #[test]
    fn test_handle_ordering() {
        assert!(Handle::new(100) < Handle::new(200));
    }
}
