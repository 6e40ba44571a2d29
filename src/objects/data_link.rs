//! DATALINK objects

use crate::io::{owner_handle, CodeLookup};
use crate::types::Handle;

/// Link between a table and an external data source
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataLink {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub line: u32,
    /// Data adapter id (1)
    pub adapter: Option<String>,
    /// Connection string (300)
    pub connection: Option<String>,
    /// Description (301)
    pub description: Option<String>,
    /// Tooltip (302)
    pub tooltip: Option<String>,
    /// Option flags (90)
    pub options: i32,
    /// Update option (91)
    pub update_option: i32,
    /// Linked table (330 after the subclass marker)
    pub table: Option<Handle>,
}

impl DataLink {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Self {
        let owner = owner_handle(lookup.tags());
        // second 330 names the table
        let table = lookup
            .all(330)
            .filter_map(|t| t.as_handle())
            .find(|h| Some(*h) != owner);
        DataLink {
            handle: lookup.handle(5),
            owner,
            line,
            adapter: lookup.string(1),
            connection: lookup.string(300),
            description: lookup.string(301),
            tooltip: lookup.string(302),
            options: lookup.i32(90).unwrap_or(0),
            update_option: lookup.i32(91).unwrap_or(0),
            table,
        }
    }
}
