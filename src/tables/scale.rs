//! Annotation scale entry

use super::RecordIdentity;
use crate::io::CodeLookup;
use crate::types::Handle;

/// Name codes of SCALE records, which store their name under 300
pub(crate) const SCALE_NAME_CODES: &[i32] = &[2, 3, 300];

/// An annotation scale
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scale {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub name: String,
    pub line: u32,
    /// Paper units (140)
    pub paper_units: f64,
    /// Drawing units (141)
    pub drawing_units: f64,
    /// Unit scale flag (290)
    pub is_unit_scale: bool,
}

impl Scale {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Option<Self> {
        let id = RecordIdentity::read(lookup, SCALE_NAME_CODES)?;
        Some(Scale {
            handle: id.handle,
            owner: id.owner,
            name: id.name,
            line,
            paper_units: lookup.f64_or(140, 1.0),
            drawing_units: lookup.f64_or(141, 1.0),
            is_unit_scale: lookup.bool(290).unwrap_or(false),
        })
    }

    /// Drawing units per paper unit; `None` when paper units are zero
    pub fn factor(&self) -> Option<f64> {
        (self.paper_units != 0.0).then(|| self.drawing_units / self.paper_units)
    }
}
