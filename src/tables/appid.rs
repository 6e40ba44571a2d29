//! Application id table entry (APPID and REGAPP records)

use super::{RecordIdentity, NAME_CODES};
use crate::io::CodeLookup;
use crate::types::Handle;

/// A registered application
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppId {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub name: String,
    pub line: u32,
    pub flags: i16,
}

impl AppId {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Option<Self> {
        let id = RecordIdentity::read(lookup, NAME_CODES)?;
        Some(AppId {
            handle: id.handle,
            owner: id.owner,
            name: id.name,
            line,
            flags: lookup.i16_or(70, 0),
        })
    }
}
