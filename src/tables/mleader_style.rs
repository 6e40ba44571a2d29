//! Multileader style entry

use super::{RecordIdentity, NAME_CODES};
use crate::io::CodeLookup;
use crate::types::{Color, Handle, LineWeight};

/// A multileader style
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MLeaderStyle {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub name: String,
    pub line: u32,
    /// Content type (170): 1 = block, 2 = mtext, 3 = tolerance
    pub content_type: i16,
    pub max_leader_points: i32,
    pub first_segment_angle: f64,
    pub second_segment_angle: f64,
    /// Leader line type (173): 0 = invisible, 1 = straight, 2 = spline
    pub leader_type: i16,
    pub leader_color: Color,
    pub leader_linetype: Option<Handle>,
    pub leader_lineweight: LineWeight,
    pub landing_enabled: bool,
    pub landing_gap: f64,
    pub dogleg_enabled: bool,
    pub dogleg_length: f64,
    pub arrow_head: Option<Handle>,
    pub arrow_size: f64,
    pub default_text: Option<String>,
    pub text_style: Option<Handle>,
    pub text_left_attachment: i16,
    pub text_right_attachment: i16,
    pub text_angle_type: i16,
    pub text_alignment: i16,
    pub text_color: Color,
    pub text_height: f64,
    pub text_frame: bool,
    pub block_content: Option<Handle>,
    pub block_color: Color,
    pub scale: f64,
    pub annotative: bool,
    pub break_gap: f64,
}

/// Packed true color as written by multileader records (upper byte = method)
fn packed_color(lookup: &CodeLookup<'_>, code: i32) -> Color {
    match lookup.i64(code) {
        Some(raw) if (raw >> 24) & 0xFF == 0xC3 => Color::from_index((raw & 0xFF) as i16),
        Some(raw) if (raw >> 24) & 0xFF == 0xC1 => Color::ByBlock,
        Some(raw) if (raw >> 24) & 0xFF == 0xC2 => Color::from_true_color(raw),
        _ => Color::ByLayer,
    }
}

impl MLeaderStyle {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Option<Self> {
        let id = RecordIdentity::read(lookup, NAME_CODES)?;
        Some(MLeaderStyle {
            handle: id.handle,
            owner: id.owner,
            name: id.name,
            line,
            content_type: lookup.i16_or(170, 2),
            max_leader_points: lookup.i32(90).unwrap_or(2),
            first_segment_angle: lookup.f64_or(40, 0.0),
            second_segment_angle: lookup.f64_or(41, 0.0),
            leader_type: lookup.i16_or(173, 1),
            leader_color: packed_color(lookup, 91),
            leader_linetype: lookup.handle(340),
            leader_lineweight: lookup.i16(92).map(LineWeight::from_value).unwrap_or_default(),
            landing_enabled: lookup.bool(290).unwrap_or(true),
            landing_gap: lookup.f64_or(42, 2.0),
            dogleg_enabled: lookup.bool(291).unwrap_or(true),
            dogleg_length: lookup.f64_or(43, 8.0),
            arrow_head: lookup.handle(341),
            arrow_size: lookup.f64_or(44, 4.0),
            default_text: lookup.string(300),
            text_style: lookup.handle(342),
            text_left_attachment: lookup.i16_or(174, 1),
            text_right_attachment: lookup.i16_or(178, 1),
            text_angle_type: lookup.i16_or(175, 1),
            text_alignment: lookup.i16_or(176, 0),
            text_color: packed_color(lookup, 93),
            text_height: lookup.f64_or(45, 4.0),
            text_frame: lookup.bool(292).unwrap_or(false),
            block_content: lookup.handle(343),
            block_color: packed_color(lookup, 94),
            scale: lookup.f64_or(142, 1.0),
            annotative: lookup.bool(296).unwrap_or(false),
            break_gap: lookup.f64_or(143, 3.75),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Tag;

    #[test]
    fn test_packed_colors() {
        let t: Vec<Tag> = [(3, "Standard"), (91, "-1056964608"), (93, "-1023410174")]
            .iter()
            .map(|(c, v)| Tag::from_raw(*c, v, 0))
            .collect();
        let style = MLeaderStyle::decode(&CodeLookup::new(&t), 1).expect("named");
        assert_eq!(style.name, "Standard");
        assert_eq!(style.leader_color, Color::ByBlock);
        assert_eq!(style.text_color, Color::Index(2));
    }
}
