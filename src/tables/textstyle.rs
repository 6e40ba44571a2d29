//! Text style table entry

use super::{RecordIdentity, NAME_CODES};
use crate::io::CodeLookup;
use crate::types::Handle;

/// A text style table entry
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextStyle {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub name: String,
    pub line: u32,
    /// Standard flags (70); bit 1 marks a shape file
    pub flags: i16,
    /// Fixed text height (40), 0 when not fixed
    pub fixed_height: f64,
    /// Width factor (41)
    pub width_factor: f64,
    /// Oblique angle in degrees (50)
    pub oblique_angle: f64,
    /// Generation flags (71): 2 = backwards, 4 = upside down
    pub generation_flags: i16,
    /// Last height used (42)
    pub last_height: f64,
    /// Primary font file (3)
    pub font_file: Option<String>,
    /// Big font file (4)
    pub big_font_file: Option<String>,
    /// TrueType family name from the `ACAD` xdata (1000)
    pub font_family: Option<String>,
}

impl TextStyle {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Option<Self> {
        // Code 3 is the font file here; unnamed shape-file styles are still
        // addressed by their font.
        let id = RecordIdentity::read(lookup, NAME_CODES)?;
        Some(TextStyle {
            handle: id.handle,
            owner: id.owner,
            name: id.name,
            line,
            flags: lookup.i16_or(70, 0),
            fixed_height: lookup.f64_or(40, 0.0),
            width_factor: lookup.f64_or(41, 1.0),
            oblique_angle: lookup.f64_or(50, 0.0),
            generation_flags: lookup.i16_or(71, 0),
            last_height: lookup.f64_or(42, 0.0),
            font_file: lookup.string(3),
            big_font_file: lookup.string(4),
            font_family: lookup.string(1000),
        })
    }

    pub fn is_shape_file(&self) -> bool {
        self.flags & 1 != 0
    }

    pub fn is_backwards(&self) -> bool {
        self.generation_flags & 2 != 0
    }

    pub fn is_upside_down(&self) -> bool {
        self.generation_flags & 4 != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Tag;

    #[test]
    fn test_decode_style() {
        let t: Vec<Tag> = [
            (2, "Annotative"),
            (70, "0"),
            (40, "0"),
            (41, "0.8"),
            (71, "2"),
            (3, "arial.ttf"),
            (1001, "ACAD"),
            (1000, "Arial"),
        ]
        .iter()
        .map(|(c, v)| Tag::from_raw(*c, v, 0))
        .collect();
        let style = TextStyle::decode(&CodeLookup::new(&t), 1).expect("named");
        assert_eq!(style.width_factor, 0.8);
        assert!(style.is_backwards());
        assert_eq!(style.font_file.as_deref(), Some("arial.ttf"));
        assert_eq!(style.font_family.as_deref(), Some("Arial"));
    }
}
