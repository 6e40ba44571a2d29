//! Multiline style entry

use super::{RecordIdentity, NAME_CODES};
use crate::io::CodeLookup;
use crate::types::{Color, Handle};

/// One parallel line of a multiline style
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MLineStyleElement {
    /// Offset from the centre line (49)
    pub offset: f64,
    pub color: Color,
    /// Linetype name (6)
    pub linetype: Option<String>,
}

/// A multiline style
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MLineStyle {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub name: String,
    pub line: u32,
    pub flags: i16,
    pub description: Option<String>,
    pub fill_color: Color,
    /// Start angle in degrees (51)
    pub start_angle: f64,
    /// End angle in degrees (52)
    pub end_angle: f64,
    pub elements: Vec<MLineStyleElement>,
}

impl MLineStyle {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Option<Self> {
        let id = RecordIdentity::read(lookup, NAME_CODES)?;
        let mut style = MLineStyle {
            handle: id.handle,
            owner: id.owner,
            name: id.name,
            line,
            flags: lookup.i16_or(70, 0),
            description: lookup.string(3),
            fill_color: Color::ByLayer,
            start_angle: lookup.f64_or(51, 90.0),
            end_angle: lookup.f64_or(52, 90.0),
            elements: Vec::new(),
        };

        // 62 before the first 49 is the fill color, afterwards it belongs to
        // the current element.
        for tag in lookup.tags() {
            match tag.code {
                49 => style.elements.push(MLineStyleElement {
                    offset: tag.as_f64().unwrap_or(0.0),
                    ..Default::default()
                }),
                62 | 420 => {
                    let color = match tag.code {
                        62 => tag.as_i16().map(Color::from_index),
                        _ => tag.as_i64().map(Color::from_true_color),
                    };
                    let Some(color) = color else { continue };
                    match style.elements.last_mut() {
                        Some(element) => element.color = color,
                        None => style.fill_color = color,
                    }
                }
                6 => {
                    if let Some(element) = style.elements.last_mut() {
                        element.linetype = Some(tag.text().into_owned());
                    }
                }
                _ => {}
            }
        }
        Some(style)
    }

    /// Whether the fill between the outer lines is on (flag 1)
    pub fn fill_on(&self) -> bool {
        self.flags & 1 != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Tag;

    #[test]
    fn test_elements() {
        let t: Vec<Tag> = [
            (2, "WALL"),
            (70, "1"),
            (62, "256"),
            (71, "2"),
            (49, "0.5"),
            (62, "1"),
            (6, "BYLAYER"),
            (49, "-0.5"),
            (62, "5"),
            (6, "DASHED"),
        ]
        .iter()
        .map(|(c, v)| Tag::from_raw(*c, v, 0))
        .collect();
        let style = MLineStyle::decode(&CodeLookup::new(&t), 1).expect("named");
        assert!(style.fill_on());
        assert_eq!(style.fill_color, Color::ByLayer);
        assert_eq!(style.elements.len(), 2);
        assert_eq!(style.elements[1].color, Color::Index(5));
        assert_eq!(style.elements[1].linetype.as_deref(), Some("DASHED"));
    }
}
