//! PDFDEFINITION, DWFDEFINITION and DGNDEFINITION objects

use crate::io::{owner_handle, CodeLookup};
use crate::types::Handle;

/// Underlay file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnderlayKind {
    #[default]
    Pdf,
    Dwf,
    Dgn,
}

impl UnderlayKind {
    /// Kind from an object or entity type name (`PDFDEFINITION`, `DGNUNDERLAY`, ...)
    pub fn from_type_name(name: &str) -> Option<Self> {
        let upper = name.to_ascii_uppercase();
        if upper.starts_with("PDF") {
            Some(UnderlayKind::Pdf)
        } else if upper.starts_with("DWF") {
            Some(UnderlayKind::Dwf)
        } else if upper.starts_with("DGN") {
            Some(UnderlayKind::Dgn)
        } else {
            None
        }
    }
}

/// External file shown by underlay entities
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnderlayDefinition {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub line: u32,
    pub kind: UnderlayKind,
    /// File path (1)
    pub file_path: String,
    /// Page, sheet or model name (2)
    pub item_name: Option<String>,
}

impl UnderlayDefinition {
    pub(crate) fn decode(kind: UnderlayKind, lookup: &CodeLookup<'_>, line: u32) -> Self {
        UnderlayDefinition {
            handle: lookup.handle(5),
            owner: owner_handle(lookup.tags()),
            line,
            kind,
            file_path: lookup.string(1).unwrap_or_default(),
            item_name: lookup.string(2),
        }
    }
}
