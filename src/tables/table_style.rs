//! Table style entry

use super::{RecordIdentity, NAME_CODES};
use crate::io::CodeLookup;
use crate::types::{Color, Handle};

/// Per-row cell formatting (data, header, title), opened by code 7
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableCellStyle {
    /// Text style name (7)
    pub text_style: String,
    pub text_height: Option<f64>,
    /// Cell alignment (170)
    pub alignment: Option<i16>,
    pub text_color: Option<Color>,
    pub fill_color: Option<Color>,
    /// Background fill enabled (283)
    pub fill_enabled: bool,
    /// Cell data type (90)
    pub data_type: Option<i32>,
    /// Cell unit type (91)
    pub unit_type: Option<i32>,
}

/// A table style
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableStyle {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub name: String,
    pub line: u32,
    pub description: Option<String>,
    /// Flow direction (70): 0 = down, 1 = up
    pub flow_direction: i16,
    pub flags: i16,
    pub horizontal_margin: f64,
    pub vertical_margin: f64,
    pub title_suppressed: bool,
    pub header_suppressed: bool,
    pub cell_styles: Vec<TableCellStyle>,
}

impl TableStyle {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Option<Self> {
        let id = RecordIdentity::read(lookup, NAME_CODES)?;
        let mut style = TableStyle {
            handle: id.handle,
            owner: id.owner,
            name: id.name,
            line,
            description: lookup.string(3),
            flow_direction: lookup.i16_or(70, 0),
            flags: lookup.i16_or(71, 0),
            horizontal_margin: lookup.f64_or(40, 0.06),
            vertical_margin: lookup.f64_or(41, 0.06),
            title_suppressed: lookup.bool(280).unwrap_or(false),
            header_suppressed: lookup.bool(281).unwrap_or(false),
            cell_styles: Vec::new(),
        };

        for tag in lookup.tags() {
            if tag.code == 7 {
                style.cell_styles.push(TableCellStyle {
                    text_style: tag.text().into_owned(),
                    ..Default::default()
                });
                continue;
            }
            let Some(cell) = style.cell_styles.last_mut() else {
                continue;
            };
            match tag.code {
                140 => cell.text_height = tag.as_f64(),
                170 => cell.alignment = tag.as_i16(),
                62 => cell.text_color = tag.as_i16().map(Color::from_index),
                63 => cell.fill_color = tag.as_i16().map(Color::from_index),
                283 => cell.fill_enabled = tag.as_bool().unwrap_or(false),
                90 => cell.data_type = tag.as_i32(),
                91 => cell.unit_type = tag.as_i32(),
                _ => {}
            }
        }
        Some(style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Tag;

    #[test]
    fn test_cell_styles() {
        let t: Vec<Tag> = [
            (3, "Standard"),
            (70, "0"),
            (7, "Standard"),
            (140, "0.18"),
            (62, "1"),
            (7, "Title"),
            (140, "0.25"),
            (283, "1"),
            (63, "8"),
        ]
        .iter()
        .map(|(c, v)| Tag::from_raw(*c, v, 0))
        .collect();
        let style = TableStyle::decode(&CodeLookup::new(&t), 1).expect("named");
        assert_eq!(style.cell_styles.len(), 2);
        assert_eq!(style.cell_styles[0].text_color, Some(Color::Index(1)));
        assert_eq!(style.cell_styles[1].text_height, Some(0.25));
        assert!(style.cell_styles[1].fill_enabled);
    }
}
