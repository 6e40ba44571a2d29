//! Color representation for DXF entities and table records

use std::fmt;

/// Represents a color in AutoCAD
///
/// Colors arrive through three group codes:
/// - 62: AutoCAD Color Index (0 = ByBlock, 256 = ByLayer, negative = layer off)
/// - 420: 24-bit true color, which overrides the index when present
/// - 430: color-book name, kept alongside on the owning record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// Color by layer (index 256)
    #[default]
    ByLayer,
    /// Color by block (index 0)
    ByBlock,
    /// AutoCAD Color Index (1-255)
    Index(u8),
    /// True color with RGB values
    Rgb { r: u8, g: u8, b: u8 },
}

impl Color {
    /// Create a color from an AutoCAD Color Index
    ///
    /// Negative indices (used by layers that are turned off) map to their
    /// absolute value.
    pub fn from_index(index: i16) -> Self {
        match index {
            0 => Color::ByBlock,
            256 => Color::ByLayer,
            1..=255 => Color::Index(index as u8),
            i if i < 0 && i > -256 => Color::Index((-i) as u8),
            _ => Color::ByLayer,
        }
    }

    /// Create a true color from the packed 0x00RRGGBB value of code 420
    pub fn from_true_color(value: i64) -> Self {
        let v = (value & 0x00FF_FFFF) as u32;
        Color::Rgb {
            r: ((v >> 16) & 0xFF) as u8,
            g: ((v >> 8) & 0xFF) as u8,
            b: (v & 0xFF) as u8,
        }
    }

    /// Create a true color from RGB values
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    /// Resolve a color from its index and optional true-color override
    pub fn resolve(index: Option<i16>, true_color: Option<i64>) -> Self {
        match (true_color, index) {
            (Some(tc), _) => Color::from_true_color(tc),
            (None, Some(i)) => Color::from_index(i),
            (None, None) => Color::ByLayer,
        }
    }

    /// Get the color index (if applicable)
    pub fn index(&self) -> Option<u16> {
        match self {
            Color::ByBlock => Some(0),
            Color::Index(i) => Some(*i as u16),
            Color::ByLayer => Some(256),
            Color::Rgb { .. } => None,
        }
    }

    /// Get RGB values (if applicable)
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        match self {
            Color::Rgb { r, g, b } => Some((*r, *g, *b)),
            _ => None,
        }
    }

    /// Whether the color defers to the layer or block
    pub fn is_inherited(&self) -> bool {
        matches!(self, Color::ByLayer | Color::ByBlock)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::ByLayer => write!(f, "ByLayer"),
            Color::ByBlock => write!(f, "ByBlock"),
            Color::Index(i) => write!(f, "Index({})", i),
            Color::Rgb { r, g, b } => write!(f, "RGB({}, {}, {})", r, g, b),
        }
    }
}
