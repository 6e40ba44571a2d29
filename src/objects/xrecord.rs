//! XRECORD objects

use crate::io::{owner_handle, subclass, CodeLookup, Tag};
use crate::types::Handle;

/// Arbitrary application data attached to a dictionary
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XRecord {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub line: u32,
    /// Duplicate record cloning flag (280)
    pub cloning: i16,
    /// Data tags after the `AcDbXrecord` marker
    pub data: Vec<Tag>,
}

impl XRecord {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Self {
        let data = subclass(lookup.tags(), "AcDbXrecord").unwrap_or(&[]);
        let (cloning, data) = match data.first() {
            Some(first) if first.code == 280 => (first.as_i16().unwrap_or(1), &data[1..]),
            _ => (1, data),
        };
        XRecord {
            handle: lookup.handle(5),
            owner: owner_handle(lookup.tags()),
            line,
            cloning,
            data: data.to_vec(),
        }
    }

    /// Handles stored under pointer codes 330-369, in order
    pub fn referenced_handles(&self) -> Vec<Handle> {
        self.data
            .iter()
            .filter(|t| (330..=369).contains(&t.code))
            .filter_map(Tag::as_handle)
            .collect()
    }
}
