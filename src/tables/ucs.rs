//! User coordinate system table entry

use super::{RecordIdentity, NAME_CODES};
use crate::io::CodeLookup;
use crate::types::{Handle, Vector3};

/// A named UCS; axes are normalised on decode
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ucs {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub name: String,
    pub line: u32,
    pub origin: Vector3,
    pub x_axis: Vector3,
    pub y_axis: Vector3,
    /// Orthographic type (79)
    pub ortho_type: i16,
    /// Elevation (146)
    pub elevation: f64,
    /// Base UCS handle (346)
    pub base_ucs: Option<Handle>,
}

impl Ucs {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Option<Self> {
        let id = RecordIdentity::read(lookup, NAME_CODES)?;
        Some(Ucs {
            handle: id.handle,
            owner: id.owner,
            name: id.name,
            line,
            origin: lookup.point3_or(10, Vector3::ZERO),
            x_axis: lookup
                .point3_or(11, Vector3::UNIT_X)
                .normalize_or(Vector3::UNIT_X),
            y_axis: lookup
                .point3_or(12, Vector3::UNIT_Y)
                .normalize_or(Vector3::UNIT_Y),
            ortho_type: lookup.i16_or(79, 0),
            elevation: lookup.f64_or(146, 0.0),
            base_ucs: lookup.handle(346),
        })
    }

    /// Normal of the UCS plane
    pub fn z_axis(&self) -> Vector3 {
        self.x_axis.cross(&self.y_axis).normalize_or(Vector3::UNIT_Z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Tag;

    #[test]
    fn test_axes_normalised() {
        let t: Vec<Tag> = [(2, "Front"), (10, "1"), (20, "2"), (30, "3"), (11, "2"), (21, "0"), (31, "0"), (12, "0"), (22, "0"), (32, "5")]
            .iter()
            .map(|(c, v)| Tag::from_raw(*c, v, 0))
            .collect();
        let ucs = Ucs::decode(&CodeLookup::new(&t), 1).expect("named");
        assert_eq!(ucs.origin, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(ucs.x_axis, Vector3::UNIT_X);
        assert_eq!(ucs.y_axis, Vector3::UNIT_Z);
        assert_eq!(ucs.z_axis(), Vector3::new(0.0, -1.0, 0.0));
    }
}
