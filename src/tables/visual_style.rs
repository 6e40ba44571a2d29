//! Visual style entry

use super::{RecordIdentity, NAME_CODES};
use crate::io::CodeLookup;
use crate::types::Handle;

/// A visual style
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisualStyle {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub name: String,
    pub line: u32,
    /// Style type (70)
    pub style_type: i16,
    pub face_lighting_model: i16,
    pub face_lighting_quality: i16,
    pub face_color_mode: i16,
    pub face_modifiers: i32,
    pub face_opacity: f64,
    pub face_specular: f64,
    /// Edge model (74)
    pub edge_model: i16,
    pub edge_style: i32,
    pub crease_angle: f64,
    pub edge_width: i16,
    pub edge_overhang: i16,
    pub edge_jitter: i16,
    pub silhouette_width: i16,
    pub isoline_count: i16,
    /// Internal-only flag (291)
    pub internal: bool,
}

impl VisualStyle {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Option<Self> {
        let id = RecordIdentity::read(lookup, NAME_CODES)?;
        Some(VisualStyle {
            handle: id.handle,
            owner: id.owner,
            name: id.name,
            line,
            style_type: lookup.i16_or(70, 0),
            face_lighting_model: lookup.i16_or(71, 0),
            face_lighting_quality: lookup.i16_or(72, 0),
            face_color_mode: lookup.i16_or(73, 0),
            face_modifiers: lookup.i32(90).unwrap_or(0),
            face_opacity: lookup.f64_or(40, 0.0),
            face_specular: lookup.f64_or(41, 0.0),
            edge_model: lookup.i16_or(74, 0),
            edge_style: lookup.i32(91).unwrap_or(0),
            crease_angle: lookup.f64_or(42, 0.0),
            edge_width: lookup.i16_or(76, 1),
            edge_overhang: lookup.i16_or(77, 0),
            edge_jitter: lookup.i16_or(78, 0),
            silhouette_width: lookup.i16_or(79, 0),
            isoline_count: lookup.i16_or(171, 0),
            internal: lookup.bool(291).unwrap_or(false),
        })
    }
}
