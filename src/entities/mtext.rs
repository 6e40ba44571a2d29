//! MTEXT

use crate::document::ResolvedRef;
use crate::types::Vector3;

/// Multi-line text
///
/// `text` is the concatenation of every 3 and 1 fragment in stream order.
/// Inline formatting codes (`\P`, `{\fArial;...}`) are left untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct MText {
    pub text: String,
    pub insertion: Vector3,
    /// Nominal character height (40)
    pub height: f64,
    /// Reference rectangle width (41)
    pub reference_width: f64,
    /// Attachment point (71): 1 top-left ... 9 bottom-right
    pub attachment: i16,
    /// Drawing direction (72)
    pub drawing_direction: i16,
    /// X axis direction (11); overrides `rotation` when present
    pub direction: Option<Vector3>,
    /// Rotation in degrees (50)
    pub rotation: f64,
    pub style: ResolvedRef,
    /// Line spacing factor (44)
    pub line_spacing: f64,
    /// Background fill flags (90)
    pub background_fill: i32,
}

impl Default for MText {
    fn default() -> Self {
        MText {
            text: String::new(),
            insertion: Vector3::ZERO,
            height: 1.0,
            reference_width: 0.0,
            attachment: 1,
            drawing_direction: 1,
            direction: None,
            rotation: 0.0,
            style: ResolvedRef::default(),
            line_spacing: 1.0,
            background_fill: 0,
        }
    }
}

impl MText {
    /// Paragraphs split at `\P` breaks
    pub fn paragraphs(&self) -> Vec<&str> {
        self.text.split("\\P").collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs() {
        let mtext = MText {
            text: "first\\Psecond".to_string(),
            ..Default::default()
        };
        assert_eq!(mtext.paragraphs(), vec!["first", "second"]);
    }
}
