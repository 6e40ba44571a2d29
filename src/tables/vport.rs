//! Viewport configuration table entry

use super::{RecordIdentity, NAME_CODES};
use crate::io::CodeLookup;
use crate::types::{Color, Handle, Vector2, Vector3};

/// A viewport configuration (`*Active` is the current one)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VPort {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub name: String,
    pub line: u32,
    pub flags: i16,
    pub lower_left: Vector2,
    pub upper_right: Vector2,
    /// View center (12, 22)
    pub center: Vector2,
    pub snap_base: Vector2,
    pub snap_spacing: Vector2,
    pub grid_spacing: Vector2,
    /// View direction (16, 26, 36)
    pub direction: Vector3,
    /// View target (17, 27, 37)
    pub target: Vector3,
    /// View height (40)
    pub height: f64,
    /// Aspect ratio (41)
    pub aspect_ratio: f64,
    pub lens_length: f64,
    pub front_clip: f64,
    pub back_clip: f64,
    pub snap_rotation: f64,
    pub twist: f64,
    pub view_mode: i16,
    pub circle_zoom: i16,
    pub ucs_icon: i16,
    pub snap_on: bool,
    pub grid_on: bool,
    pub render_mode: i16,
    pub ucs_origin: Option<Vector3>,
    pub ucs_x_axis: Option<Vector3>,
    pub ucs_y_axis: Option<Vector3>,
    pub elevation: f64,
    pub background: Option<Handle>,
    pub visual_style: Option<Handle>,
    /// Default lighting on (292)
    pub default_lighting: bool,
    /// Ambient color (63 / 421)
    pub ambient_color: Option<Color>,
}

impl VPort {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Option<Self> {
        let id = RecordIdentity::read(lookup, NAME_CODES)?;
        let ambient_color = match (lookup.i16(63), lookup.i64(421)) {
            (None, None) => None,
            (index, true_color) => Some(Color::resolve(index, true_color)),
        };
        Some(VPort {
            handle: id.handle,
            owner: id.owner,
            name: id.name,
            line,
            flags: lookup.i16_or(70, 0),
            lower_left: lookup.point2(10).unwrap_or_default(),
            upper_right: lookup.point2(11).unwrap_or(Vector2::new(1.0, 1.0)),
            center: lookup.point2(12).unwrap_or_default(),
            snap_base: lookup.point2(13).unwrap_or_default(),
            snap_spacing: lookup.point2(14).unwrap_or_default(),
            grid_spacing: lookup.point2(15).unwrap_or_default(),
            direction: lookup.point3_or(16, Vector3::UNIT_Z),
            target: lookup.point3_or(17, Vector3::ZERO),
            height: lookup.f64_or(40, 0.0),
            aspect_ratio: lookup.f64_or(41, 1.0),
            lens_length: lookup.f64_or(42, 50.0),
            front_clip: lookup.f64_or(43, 0.0),
            back_clip: lookup.f64_or(44, 0.0),
            snap_rotation: lookup.f64_or(50, 0.0),
            twist: lookup.f64_or(51, 0.0),
            view_mode: lookup.i16_or(71, 0),
            circle_zoom: lookup.i16_or(72, 1000),
            ucs_icon: lookup.i16_or(74, 0),
            snap_on: lookup.bool(75).unwrap_or(false),
            grid_on: lookup.bool(76).unwrap_or(false),
            render_mode: lookup.i16_or(281, 0),
            ucs_origin: lookup.point3(110),
            ucs_x_axis: lookup.point3(111).map(|v| v.normalize_or(Vector3::UNIT_X)),
            ucs_y_axis: lookup.point3(112).map(|v| v.normalize_or(Vector3::UNIT_Y)),
            elevation: lookup.f64_or(146, 0.0),
            background: lookup.handle(332),
            visual_style: lookup.handle(348),
            default_lighting: lookup.bool(292).unwrap_or(false),
            ambient_color,
        })
    }

    /// Whether this is the active viewport configuration
    pub fn is_active(&self) -> bool {
        self.name.eq_ignore_ascii_case("*Active")
    }
}
