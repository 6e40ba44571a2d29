//! TEXT, ATTDEF and ATTRIB

use crate::document::ResolvedRef;
use crate::types::Vector3;

/// Single-line text
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    /// Text value (1)
    pub value: String,
    /// First alignment point (10)
    pub insertion: Vector3,
    /// Second alignment point (11), used when justified
    pub alignment_point: Option<Vector3>,
    pub height: f64,
    /// Rotation in degrees (50)
    pub rotation: f64,
    /// Relative X scale (41)
    pub width_factor: f64,
    /// Oblique angle in degrees (51)
    pub oblique_angle: f64,
    /// Text style (7), resolved against the STYLE table
    pub style: ResolvedRef,
    /// Generation flags (71): 2 mirrored in X, 4 mirrored in Y
    pub generation_flags: i16,
    /// Horizontal justification (72)
    pub horizontal_alignment: i16,
    /// Vertical justification (73 for TEXT, 74 for attributes)
    pub vertical_alignment: i16,
}

impl Default for Text {
    fn default() -> Self {
        Text {
            value: String::new(),
            insertion: Vector3::ZERO,
            alignment_point: None,
            height: 1.0,
            rotation: 0.0,
            width_factor: 1.0,
            oblique_angle: 0.0,
            style: ResolvedRef::default(),
            generation_flags: 0,
            horizontal_alignment: 0,
            vertical_alignment: 0,
        }
    }
}

impl Text {
    /// Whether the second alignment point governs placement
    pub fn is_justified(&self) -> bool {
        self.horizontal_alignment != 0 || self.vertical_alignment != 0
    }
}

/// ATTDEF (with prompt) or ATTRIB
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attribute {
    pub text: Text,
    /// Attribute tag (2)
    pub tag: String,
    /// Prompt (3); ATTDEF only
    pub prompt: Option<String>,
    /// Flags (70): 1 invisible, 2 constant, 4 verify, 8 preset
    pub flags: i16,
    /// Field length (73)
    pub field_length: i16,
    /// Lock position (280)
    pub lock_position: bool,
    /// Multi-line attribute text (AcDbMText region)
    pub multiline_text: Option<String>,
}

impl Attribute {
    pub fn is_invisible(&self) -> bool {
        self.flags & 1 != 0
    }

    pub fn is_constant(&self) -> bool {
        self.flags & 2 != 0
    }

    /// Display value: multi-line text when present, else the single line
    pub fn value(&self) -> &str {
        self.multiline_text.as_deref().unwrap_or(&self.text.value)
    }
}
