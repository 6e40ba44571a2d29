//! DICTIONARYVAR objects

use crate::io::{owner_handle, CodeLookup};
use crate::types::Handle;

/// A named drawing variable stored in the `AcDbVariableDictionary`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DictionaryVariable {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub line: u32,
    /// Variable name, taken from the owning dictionary entry
    pub name: Option<String>,
    /// Object schema number (280)
    pub schema: i16,
    /// Value text (1)
    pub value: String,
}

impl DictionaryVariable {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Self {
        DictionaryVariable {
            handle: lookup.handle(5),
            owner: owner_handle(lookup.tags()),
            line,
            name: None,
            schema: lookup.i16_or(280, 0),
            value: lookup
                .first(1)
                .map(|t| t.text().into_owned())
                .unwrap_or_default(),
        }
    }
}
