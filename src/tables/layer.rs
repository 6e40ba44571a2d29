//! Layer table entry

use bitflags::bitflags;

use super::{RecordIdentity, NAME_CODES};
use crate::io::CodeLookup;
use crate::types::{Color, Handle, LineWeight, Transparency};
use crate::xdata::ExtendedData;

bitflags! {
    /// Standard flags of a LAYER record (code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LayerFlags: i16 {
        const FROZEN = 1;
        const FROZEN_IN_NEW_VIEWPORTS = 2;
        const LOCKED = 4;
        const XREF_DEPENDENT = 16;
        const XREF_RESOLVED = 32;
        const REFERENCED = 64;
    }
}

/// A layer table entry
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layer {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub name: String,
    pub line: u32,
    pub flags: LayerFlags,
    /// Resolved color; true color (420) wins over the index (62)
    pub color: Color,
    /// Raw color index; negative means the layer is off
    pub color_index: Option<i16>,
    /// Color-book color name (430)
    pub color_book: Option<String>,
    /// Linetype name (6)
    pub linetype: Option<String>,
    pub lineweight: LineWeight,
    /// Plotting flag (290), defaults to true
    pub plottable: bool,
    /// Plot style name handle (390)
    pub plot_style: Option<Handle>,
    /// Material handle (347)
    pub material: Option<Handle>,
    /// Transparency from code 440 or the `AcCmTransparency` xdata
    pub transparency: Option<Transparency>,
}

impl Layer {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Option<Self> {
        let id = RecordIdentity::read(lookup, NAME_CODES)?;
        let color_index = lookup.i16(62);
        let transparency = lookup
            .i64(440)
            .or_else(|| ExtendedData::from_tags(lookup.tags()).transparency())
            .map(Transparency::from_raw);

        Some(Layer {
            handle: id.handle,
            owner: id.owner,
            name: id.name,
            line,
            flags: LayerFlags::from_bits_truncate(lookup.i16_or(70, 0)),
            color: Color::resolve(color_index, lookup.i64(420)),
            color_index,
            color_book: lookup.string(430),
            linetype: lookup.string(6),
            lineweight: lookup.i16(370).map(LineWeight::from_value).unwrap_or_default(),
            plottable: lookup.bool(290).unwrap_or(true),
            plot_style: lookup.handle(390),
            material: lookup.handle(347),
            transparency,
        })
    }

    /// A negative color index turns the layer off
    pub fn is_off(&self) -> bool {
        self.color_index.is_some_and(|c| c < 0)
    }

    pub fn is_frozen(&self) -> bool {
        self.flags.contains(LayerFlags::FROZEN)
    }

    pub fn is_locked(&self) -> bool {
        self.flags.contains(LayerFlags::LOCKED)
    }
}
