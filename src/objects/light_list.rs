//! LIGHTLIST objects

use crate::io::{owner_handle, CodeLookup};
use crate::types::Handle;

/// Registry of the drawing's lights
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LightList {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub line: u32,
    /// Class version (first 90)
    pub version: i32,
    /// Declared light count (second 90)
    pub declared_count: i32,
    /// `(handle, name)` per light (5 / 1 pairs after the subclass)
    pub lights: Vec<(Handle, String)>,
}

impl LightList {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Self {
        let mut nineties = lookup.all(90).filter_map(|t| t.as_i32());
        let version = nineties.next().unwrap_or(1);
        let declared_count = nineties.next().unwrap_or(0);

        let mut lights = Vec::new();
        let mut pending: Option<Handle> = None;
        let mut past_subclass = false;
        for tag in lookup.tags() {
            match tag.code {
                100 if tag.text().eq_ignore_ascii_case("AcDbLightList") => past_subclass = true,
                5 if past_subclass => pending = tag.as_handle(),
                1 if past_subclass => {
                    if let Some(h) = pending.take() {
                        lights.push((h, tag.text().into_owned()));
                    }
                }
                _ => {}
            }
        }

        LightList {
            handle: lookup.handle(5),
            owner: owner_handle(lookup.tags()),
            line,
            version,
            declared_count,
            lights,
        }
    }
}
