//! DICTIONARY and ACDBDICTIONARYWDFLT objects

use crate::io::{owner_handle, CodeLookup};
use crate::types::Handle;

/// One named entry of a dictionary
#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryEntry {
    pub name: String,
    pub handle: Handle,
}

/// A dictionary: ordered name → handle entries
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dictionary {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub line: u32,
    pub entries: Vec<DictionaryEntry>,
    /// Default entry of an ACDBDICTIONARYWDFLT (340)
    pub default_entry: Option<Handle>,
    /// Hard-owner flag (280)
    pub hard_owner: bool,
    /// Duplicate record cloning flag (281)
    pub cloning: i16,
}

impl Dictionary {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Self {
        let mut entries = Vec::new();
        let mut pending: Option<String> = None;
        // 350/360 inside `102 {...}` groups (the extension dictionary) are not entries
        let mut in_group = false;
        for tag in lookup.tags() {
            if tag.code == 102 {
                in_group = tag.text().trim_start().starts_with('{');
                continue;
            }
            if in_group {
                continue;
            }
            match tag.code {
                3 => pending = Some(tag.text().into_owned()),
                350 | 360 => {
                    if let Some(handle) = tag.as_handle() {
                        entries.push(DictionaryEntry {
                            name: pending.take().unwrap_or_default(),
                            handle,
                        });
                    }
                }
                _ => {}
            }
        }

        Dictionary {
            handle: lookup.handle(5),
            owner: owner_handle(lookup.tags()),
            line,
            entries,
            default_entry: lookup.handle(340),
            hard_owner: lookup.bool(280).unwrap_or(false),
            cloning: lookup.i16_or(281, 1),
        }
    }

    /// Handle of the entry with the given name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<Handle> {
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
            .map(|e| e.handle)
    }

    /// Name of the entry pointing at the handle
    pub fn name_of(&self, handle: Handle) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.handle == handle)
            .map(|e| e.name.as_str())
    }
}
