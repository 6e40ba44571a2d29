//! Line type table entry

use super::{RecordIdentity, NAME_CODES};
use crate::io::CodeLookup;
use crate::types::{Handle, Vector2};

/// One dash-pattern element (opened by code 49)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineTypeElement {
    /// Dash length: positive = dash, negative = gap, 0 = dot
    pub length: f64,
    /// Complex element flags (74)
    pub shape_flags: i16,
    /// Shape number or text index (75)
    pub shape_number: Option<i16>,
    /// Text style handle for embedded shapes/text (340)
    pub style: Option<Handle>,
    /// Shape/text scale (46)
    pub scale: Option<f64>,
    /// Shape/text rotation (50)
    pub rotation: Option<f64>,
    /// Shape/text offset (44, 45)
    pub offset: Option<Vector2>,
    /// Embedded text (9)
    pub text: Option<String>,
    /// Shape name (6)
    pub shape_name: Option<String>,
    /// Element alignment (79)
    pub alignment: Option<i16>,
}

impl LineTypeElement {
    pub fn is_dash(&self) -> bool {
        self.length > 0.0
    }

    pub fn is_gap(&self) -> bool {
        self.length < 0.0
    }

    pub fn is_dot(&self) -> bool {
        self.length == 0.0
    }

    /// Whether the element embeds text (bit 2 of code 74)
    pub fn has_text(&self) -> bool {
        self.shape_flags & 2 != 0
    }

    /// Whether the element embeds a shape (bit 4 of code 74)
    pub fn has_shape(&self) -> bool {
        self.shape_flags & 4 != 0
    }
}

/// A line type table entry
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineType {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub name: String,
    pub line: u32,
    pub flags: i16,
    /// Description (3)
    pub description: Option<String>,
    /// Alignment code (72), always 'A' in practice
    pub alignment: Option<i16>,
    /// Declared element count (73)
    pub element_count: i16,
    /// Total pattern length (40)
    pub pattern_length: f64,
    pub elements: Vec<LineTypeElement>,
}

impl LineType {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Option<Self> {
        let id = RecordIdentity::read(lookup, NAME_CODES)?;
        let mut linetype = LineType {
            handle: id.handle,
            owner: id.owner,
            name: id.name,
            line,
            flags: lookup.i16_or(70, 0),
            description: None,
            alignment: lookup.i16(72),
            element_count: lookup.i16_or(73, 0),
            pattern_length: lookup.f64_or(40, 0.0),
            elements: Vec::new(),
        };

        // Codes after the first 49 belong to the current element; the
        // description (3) and shape name (6) are only record-level before it.
        let mut current: Option<usize> = None;
        for tag in lookup.tags() {
            if tag.code == 49 {
                linetype.elements.push(LineTypeElement {
                    length: tag.as_f64().unwrap_or(0.0),
                    ..Default::default()
                });
                current = Some(linetype.elements.len() - 1);
                continue;
            }
            let Some(element) = current.and_then(|i| linetype.elements.get_mut(i)) else {
                if tag.code == 3 && linetype.description.is_none() {
                    linetype.description = Some(tag.text().into_owned());
                }
                continue;
            };
            match tag.code {
                74 => element.shape_flags = tag.as_i16().unwrap_or(0),
                75 => element.shape_number = tag.as_i16(),
                340 => element.style = tag.as_handle(),
                46 => element.scale = tag.as_f64(),
                50 => element.rotation = tag.as_f64(),
                44 => {
                    let offset = element.offset.get_or_insert(Vector2::ZERO);
                    offset.x = tag.as_f64().unwrap_or(0.0);
                }
                45 => {
                    let offset = element.offset.get_or_insert(Vector2::ZERO);
                    offset.y = tag.as_f64().unwrap_or(0.0);
                }
                9 => element.text = Some(tag.text().into_owned()),
                6 => element.shape_name = Some(tag.text().into_owned()),
                79 => element.alignment = tag.as_i16(),
                _ => {}
            }
        }
        Some(linetype)
    }

    /// Whether the pattern is a solid line
    pub fn is_continuous(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Tag;

    fn tags(pairs: &[(i32, &str)]) -> Vec<Tag> {
        pairs.iter().map(|(c, v)| Tag::from_raw(*c, v, 0)).collect()
    }

    #[test]
    fn test_dash_elements() {
        let t = tags(&[
            (2, "GAS_LINE"),
            (3, "Gas line ----GAS----"),
            (72, "65"),
            (73, "3"),
            (40, "0.95"),
            (49, "0.5"),
            (74, "0"),
            (49, "-0.2"),
            (74, "2"),
            (75, "0"),
            (340, "11"),
            (46, "0.1"),
            (50, "0"),
            (44, "-0.1"),
            (45, "-0.05"),
            (9, "GAS"),
            (49, "-0.25"),
            (74, "0"),
        ]);
        let lt = LineType::decode(&CodeLookup::new(&t), 1).expect("named");
        assert_eq!(lt.description.as_deref(), Some("Gas line ----GAS----"));
        assert_eq!(lt.elements.len(), 3);
        assert!(lt.elements[0].is_dash());
        let text = &lt.elements[1];
        assert!(text.has_text());
        assert_eq!(text.text.as_deref(), Some("GAS"));
        assert_eq!(text.style, Some(Handle::new(0x11)));
        assert_eq!(text.offset, Some(Vector2::new(-0.1, -0.05)));
        assert_eq!(lt.elements[2].text, None);
    }

    #[test]
    fn test_continuous() {
        let t = tags(&[(2, "Continuous"), (73, "0"), (40, "0")]);
        let lt = LineType::decode(&CodeLookup::new(&t), 1).expect("named");
        assert!(lt.is_continuous());
    }
}
