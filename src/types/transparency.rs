//! Transparency representation for DXF entities

use std::fmt;

/// Transparency as stored in group code 440
///
/// The high byte of the 32-bit value selects the mode:
/// - 0x00 = BYLAYER
/// - 0x01 = BYBLOCK
/// - 0x02 = explicit alpha in the low byte (255 = opaque)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transparency {
    /// Use the layer's transparency
    #[default]
    ByLayer,
    /// Use the block's transparency
    ByBlock,
    /// Explicit alpha, 0 = fully transparent, 255 = fully opaque
    Alpha(u8),
}

impl Transparency {
    /// Decode a raw code-440 value
    pub fn from_raw(value: i64) -> Self {
        let v = value as u32;
        match v >> 24 {
            0 => Transparency::ByLayer,
            1 => Transparency::ByBlock,
            _ => Transparency::Alpha((v & 0xFF) as u8),
        }
    }

    /// Fraction of transparency (0.0 = opaque, 1.0 = invisible), if explicit
    pub fn as_fraction(&self) -> Option<f64> {
        match self {
            Transparency::Alpha(a) => Some(1.0 - (*a as f64 / 255.0)),
            _ => None,
        }
    }
}

impl fmt::Display for Transparency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transparency::ByLayer => write!(f, "ByLayer"),
            Transparency::ByBlock => write!(f, "ByBlock"),
            Transparency::Alpha(_) => {
                write!(f, "{:.1}%", self.as_fraction().unwrap_or(0.0) * 100.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transparency_modes() {
        assert_eq!(Transparency::from_raw(0), Transparency::ByLayer);
        assert_eq!(Transparency::from_raw(0x0100_0000), Transparency::ByBlock);
        assert_eq!(Transparency::from_raw(0x0200_00FF), Transparency::Alpha(255));
    }

    #[test]
    fn test_transparency_fraction() {
        assert_eq!(Transparency::Alpha(255).as_fraction(), Some(0.0));
        assert_eq!(Transparency::Alpha(0).as_fraction(), Some(1.0));
        assert_eq!(Transparency::ByLayer.as_fraction(), None);
        assert_eq!(Transparency::Alpha(255).to_string(), "0.0%");
    }
}
