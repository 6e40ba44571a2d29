//! Text-bearing entities: TEXT, MTEXT, attributes, leaders, tables and shapes

use super::body;
use crate::builder::{resolved_reference, ResolutionContext};
use crate::document::ResolvedRef;
use crate::entities::{
    AcadTable, Attribute, Leader, MText, MultiLeader, MultiLeaderLine, Shape, Text, Tolerance,
};
use crate::io::{collect_points, subclass, CodeLookup, Tag};
use crate::tables::TableEntry;
use crate::types::Vector3;

const DEFAULT_TEXT_STYLE: &str = "Standard";

fn text_style(ctx: &ResolutionContext<'_>, lookup: &CodeLookup<'_>) -> ResolvedRef {
    let name = lookup.string(7);
    resolved_reference(
        &ctx.tables.text_styles,
        Some(name.as_deref().unwrap_or(DEFAULT_TEXT_STYLE)),
        None,
    )
}

/// Single-line text fields; vertical alignment lives under 73 for TEXT and
/// 74 for attributes, so callers pass it in
fn text_fields(
    ctx: &ResolutionContext<'_>,
    lookup: &CodeLookup<'_>,
    vertical_alignment: i16,
) -> Text {
    Text {
        value: lookup.first(1).map(|t| t.text().into_owned()).unwrap_or_default(),
        insertion: lookup.point3(10).unwrap_or_default(),
        alignment_point: lookup.point3(11),
        height: lookup.f64_or(40, 1.0),
        rotation: lookup.f64_or(50, 0.0),
        width_factor: lookup.f64_or(41, 1.0),
        oblique_angle: lookup.f64_or(51, 0.0),
        style: text_style(ctx, lookup),
        generation_flags: lookup.i16_or(71, 0),
        horizontal_alignment: lookup.i16_or(72, 0),
        vertical_alignment,
    }
}

pub(super) fn text(ctx: &ResolutionContext<'_>, tags: &[Tag]) -> Text {
    let lookup = CodeLookup::new(body(tags));
    text_fields(ctx, &lookup, lookup.i16_or(73, 0))
}

/// Concatenate 3 and 1 fragments in stream order
fn fragments<'t>(tags: impl IntoIterator<Item = &'t Tag>) -> String {
    tags.into_iter()
        .filter(|t| matches!(t.code, 1 | 3))
        .map(|t| t.text())
        .collect()
}

pub(super) fn mtext(ctx: &ResolutionContext<'_>, tags: &[Tag], lookup: &CodeLookup<'_>) -> MText {
    let defaults = MText::default();
    MText {
        text: fragments(body(tags)),
        insertion: lookup.point3(10).unwrap_or_default(),
        height: lookup.f64_or(40, defaults.height),
        reference_width: lookup.f64_or(41, 0.0),
        attachment: lookup.i16_or(71, defaults.attachment),
        drawing_direction: lookup.i16_or(72, defaults.drawing_direction),
        direction: lookup.point3(11),
        rotation: lookup.f64_or(50, 0.0),
        style: text_style(ctx, lookup),
        line_spacing: lookup.f64_or(44, defaults.line_spacing),
        background_fill: lookup.i32(90).unwrap_or(0),
    }
}

/// ATTDEF and ATTRIB.
///
/// Text fields come from AcDbText, attribute fields from AcDbAttribute or
/// AcDbAttributeDefinition; R12 records without markers use the whole body.
/// Multi-line attributes carry an embedded MTEXT after code 101.
pub(super) fn attribute(ctx: &ResolutionContext<'_>, tags: &[Tag]) -> Attribute {
    let tags = body(tags);
    let text_region = subclass(tags, "AcDbText").unwrap_or(tags);
    let attribute_region = subclass(tags, "AcDbAttribute")
        .or_else(|| subclass(tags, "AcDbAttributeDefinition"))
        .unwrap_or(tags);
    let text = CodeLookup::new(text_region);
    let attr = CodeLookup::new(attribute_region);

    let vertical = attr.i16(74).or_else(|| text.i16(73)).unwrap_or(0);
    let multiline_text = tags
        .iter()
        .position(|t| t.code == 101)
        .map(|start| fragments(&tags[start + 1..]))
        .filter(|s| !s.is_empty());

    Attribute {
        text: text_fields(ctx, &text, vertical),
        tag: attr.string(2).map(|t| t.trim().to_string()).unwrap_or_default(),
        prompt: attr.string(3),
        flags: attr.i16_or(70, 0),
        field_length: attr.i16_or(73, 0),
        lock_position: attr.last(280).and_then(Tag::as_bool).unwrap_or(false),
        multiline_text,
    }
}

pub(super) fn leader(ctx: &ResolutionContext<'_>, tags: &[Tag], lookup: &CodeLookup<'_>) -> Leader {
    Leader {
        style: resolved_reference(&ctx.tables.dim_styles, lookup.str(3), None),
        arrowhead: lookup.bool(71).unwrap_or(true),
        spline_path: lookup.bool(72).unwrap_or(false),
        creation: lookup.i16_or(73, 3),
        hookline_flipped: lookup.bool(74).unwrap_or(false),
        has_hookline: lookup.bool(75).unwrap_or(false),
        text_height: lookup.f64(40),
        text_width: lookup.f64(41),
        vertices: collect_points(body(tags), 10),
        annotation: lookup.handle(340),
        horizontal_direction: lookup.point3(211),
    }
}

const LEADER_LINE_OPEN: &str = "LEADER_LINE{";

/// MULTILEADER; each `304 LEADER_LINE{` ... `305 }` run is one leader line
pub(super) fn multileader(
    ctx: &ResolutionContext<'_>,
    tags: &[Tag],
    lookup: &CodeLookup<'_>,
) -> MultiLeader {
    let mut lines: Vec<MultiLeaderLine> = Vec::new();
    let mut in_line = false;
    for tag in body(tags) {
        match tag.code {
            304 if tag.text().trim() == LEADER_LINE_OPEN => {
                lines.push(MultiLeaderLine::default());
                in_line = true;
            }
            305 => in_line = false,
            10 | 20 | 30 if in_line => {
                let Some(line) = lines.last_mut() else {
                    continue;
                };
                let value = tag.as_f64().unwrap_or(0.0);
                match tag.code {
                    10 => line.vertices.push(Vector3::new(value, 0.0, 0.0)),
                    20 => {
                        if let Some(v) = line.vertices.last_mut() {
                            v.y = value;
                        }
                    }
                    _ => {
                        if let Some(v) = line.vertices.last_mut() {
                            v.z = value;
                        }
                    }
                }
            }
            _ => {}
        }
    }

    let text = lookup
        .all(304)
        .map(|t| t.text().into_owned())
        .find(|t| t.trim() != LEADER_LINE_OPEN && !t.trim().is_empty());

    MultiLeader {
        style: resolved_reference(&ctx.tables.mleader_styles, None, lookup.handle(340)),
        content_type: lookup.i16_or(172, 2),
        text,
        block: lookup.handle(344),
        leader_type: lookup.i16_or(170, 1),
        arrow_size: lookup.f64(42),
        dogleg_length: lookup.f64(41),
        scale: lookup.f64_or(45, 1.0),
        text_location: lookup.point3(12),
        lines,
    }
}

pub(super) fn tolerance(ctx: &ResolutionContext<'_>, lookup: &CodeLookup<'_>) -> Tolerance {
    Tolerance {
        style: resolved_reference(&ctx.tables.dim_styles, lookup.str(3), None),
        insertion: lookup.point3(10).unwrap_or_default(),
        text: lookup.string(1).unwrap_or_default(),
        direction: lookup.point3_or(11, Vector3::UNIT_X),
    }
}

/// ACAD_TABLE; cell text is read from the AcDbTable region
pub(super) fn table(ctx: &ResolutionContext<'_>, tags: &[Tag], lookup: &CodeLookup<'_>) -> AcadTable {
    let cells_region = subclass(tags, "AcDbTable").unwrap_or(&[]);
    let cells = CodeLookup::new(cells_region);

    let mut cell_text: Vec<String> = Vec::new();
    for tag in body(cells_region) {
        match tag.code {
            1 => cell_text.push(tag.text().into_owned()),
            2 | 3 => {
                if let Some(cell) = cell_text.last_mut() {
                    cell.push_str(&tag.text());
                }
            }
            _ => {}
        }
    }

    AcadTable {
        block_name: lookup.string(2),
        style: resolved_reference(&ctx.tables.table_styles, None, cells.handle(342)),
        block_record: cells.handle(343),
        insertion: lookup.point3(10).unwrap_or_default(),
        direction: cells.point3_or(11, Vector3::UNIT_X),
        rows: cells.i32(91).unwrap_or(0),
        columns: cells.i32(92).unwrap_or(0),
        row_heights: cells.f64s(141),
        column_widths: cells.f64s(142),
        cell_text,
    }
}

/// SHAPE; the shape file is the first STYLE record flagged as one
pub(super) fn shape(ctx: &ResolutionContext<'_>, lookup: &CodeLookup<'_>) -> Shape {
    let style = ctx
        .tables
        .text_styles
        .iter()
        .find(|s| s.is_shape_file())
        .map(|s| ResolvedRef {
            name: Some(s.name().to_string()),
            handle: s.handle(),
            resolved: true,
        })
        .unwrap_or_default();

    Shape {
        name: lookup.string(2).unwrap_or_default(),
        insertion: lookup.point3(10).unwrap_or_default(),
        size: lookup.f64_or(40, 1.0),
        rotation: lookup.f64_or(50, 0.0),
        width_factor: lookup.f64_or(41, 1.0),
        oblique_angle: lookup.f64_or(51, 0.0),
        style,
    }
}
