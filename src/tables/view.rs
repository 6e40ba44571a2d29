//! Named view table entry

use super::{RecordIdentity, NAME_CODES};
use crate::io::CodeLookup;
use crate::types::{Handle, Vector2, Vector3};

/// A named view
#[derive(Debug, Clone, PartialEq, Default)]
pub struct View {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub name: String,
    pub line: u32,
    pub flags: i16,
    /// View center in DCS (10, 20)
    pub center: Vector2,
    /// View height (40)
    pub height: f64,
    /// View width (41)
    pub width: f64,
    /// View direction from target (11, 21, 31)
    pub direction: Vector3,
    /// Target point (12, 22, 32)
    pub target: Vector3,
    /// Lens length (42)
    pub lens_length: f64,
    /// Front clipping plane offset (43)
    pub front_clip: f64,
    /// Back clipping plane offset (44)
    pub back_clip: f64,
    /// Twist angle (50)
    pub twist: f64,
    /// View mode (71)
    pub view_mode: i16,
    /// Render mode (281)
    pub render_mode: i16,
    /// Whether a UCS is stored with the view (72)
    pub has_ucs: bool,
    pub ucs_origin: Option<Vector3>,
    pub ucs_x_axis: Option<Vector3>,
    pub ucs_y_axis: Option<Vector3>,
    /// Background handle (332)
    pub background: Option<Handle>,
    /// Visual style handle (348)
    pub visual_style: Option<Handle>,
}

impl View {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Option<Self> {
        let id = RecordIdentity::read(lookup, NAME_CODES)?;
        Some(View {
            handle: id.handle,
            owner: id.owner,
            name: id.name,
            line,
            flags: lookup.i16_or(70, 0),
            center: lookup.point2(10).unwrap_or_default(),
            height: lookup.f64_or(40, 0.0),
            width: lookup.f64_or(41, 0.0),
            direction: lookup.point3_or(11, Vector3::UNIT_Z),
            target: lookup.point3_or(12, Vector3::ZERO),
            lens_length: lookup.f64_or(42, 50.0),
            front_clip: lookup.f64_or(43, 0.0),
            back_clip: lookup.f64_or(44, 0.0),
            twist: lookup.f64_or(50, 0.0),
            view_mode: lookup.i16_or(71, 0),
            render_mode: lookup.i16_or(281, 0),
            has_ucs: lookup.bool(72).unwrap_or(false),
            ucs_origin: lookup.point3(110),
            ucs_x_axis: lookup.point3(111).map(|v| v.normalize_or(Vector3::UNIT_X)),
            ucs_y_axis: lookup.point3(112).map(|v| v.normalize_or(Vector3::UNIT_Y)),
            background: lookup.handle(332),
            visual_style: lookup.handle(348),
        })
    }
}
