//! Symbol tables and their records

use ahash::AHashMap;
use indexmap::IndexMap;

use crate::io::{owner_handle, CodeLookup};
use crate::types::Handle;

pub mod appid;
pub mod block_record;
pub mod dimstyle;
pub mod layer;
pub mod linetype;
pub mod mleader_style;
pub mod mline_style;
pub mod scale;
pub mod table_style;
pub mod textstyle;
pub mod ucs;
pub mod view;
pub mod visual_style;
pub mod vport;

pub use appid::AppId;
pub use block_record::{BlockRecord, BlockUnitsBehavior};
pub use dimstyle::{
    DimAlternateUnits, DimColors, DimLineweights, DimMeasurement, DimParameters, DimReferences,
    DimStyle, DimToggles,
};
pub use layer::{Layer, LayerFlags};
pub use linetype::{LineType, LineTypeElement};
pub use mleader_style::MLeaderStyle;
pub use mline_style::{MLineStyle, MLineStyleElement};
pub use scale::Scale;
pub use table_style::{TableCellStyle, TableStyle};
pub use textstyle::TextStyle;
pub use ucs::Ucs;
pub use view::View;
pub use visual_style::VisualStyle;
pub use vport::VPort;

/// Shared identity of every table record
pub trait TableEntry {
    /// The record's own handle
    fn handle(&self) -> Option<Handle>;

    /// The record's name
    fn name(&self) -> &str;

    /// Tokenizer line of the record's `0` tag
    fn line(&self) -> u32;
}

macro_rules! impl_table_entry {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::tables::TableEntry for $ty {
                fn handle(&self) -> Option<$crate::types::Handle> { self.handle }
                fn name(&self) -> &str { &self.name }
                fn line(&self) -> u32 { self.line }
            }
        )*
    };
}

impl_table_entry!(
    AppId, BlockRecord, DimStyle, Layer, LineType, MLeaderStyle, MLineStyle, Scale, TableStyle,
    TextStyle, Ucs, View, VisualStyle, VPort,
);

/// Handle, owner and name read from a record body.
///
/// `None` when no name code carries a non-blank value.
pub(crate) struct RecordIdentity {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub name: String,
}

impl RecordIdentity {
    pub(crate) fn read(lookup: &CodeLookup<'_>, name_codes: &[i32]) -> Option<Self> {
        let name = name_codes.iter().find_map(|&code| lookup.string(code))?;
        Some(Self {
            handle: lookup.handle(5).or_else(|| lookup.handle(105)),
            owner: owner_handle(lookup.tags()),
            name: name.trim().to_string(),
        })
    }
}

/// Default name codes for table records
pub(crate) const NAME_CODES: &[i32] = &[2, 3];

/// Name-keyed table with a secondary handle index
///
/// Names are matched case-insensitively. Inserting an existing name or
/// handle overwrites the previous entry.
#[derive(Debug, Clone)]
pub struct Table<T: TableEntry> {
    entries: IndexMap<String, T>,
    by_handle: AHashMap<Handle, String>,
    handle: Option<Handle>,
}

impl<T: TableEntry> Table<T> {
    /// Create a new empty table
    pub fn new() -> Self {
        Table {
            entries: IndexMap::new(),
            by_handle: AHashMap::new(),
            handle: None,
        }
    }

    /// Handle of the `TABLE` header record
    pub fn handle(&self) -> Option<Handle> {
        self.handle
    }

    pub(crate) fn set_handle(&mut self, handle: Option<Handle>) {
        self.handle = handle;
    }

    /// Insert an entry, replacing any entry with the same name
    pub fn insert(&mut self, entry: T) -> Option<T> {
        let key = entry.name().to_uppercase();
        if let Some(handle) = entry.handle() {
            self.by_handle.insert(handle, key.clone());
        }
        self.entries.insert(key, entry)
    }

    /// Insert only when no entry has the same name; returns whether it was added
    pub fn insert_if_absent(&mut self, entry: T) -> bool {
        if self.contains(entry.name()) {
            return false;
        }
        self.insert(entry);
        true
    }

    /// Get an entry by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(&name.trim().to_uppercase())
    }

    /// Get the entry whose own handle matches
    pub fn get_by_handle(&self, handle: Handle) -> Option<&T> {
        self.by_handle
            .get(&handle)
            .and_then(|key| self.entries.get(key))
            .filter(|e| e.handle() == Some(handle))
    }

    /// Check if an entry exists (case-insensitive)
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Check if an entry with the handle exists
    pub fn contains_handle(&self, handle: Handle) -> bool {
        self.get_by_handle(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    /// Entry names as written in the drawing
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|e| e.name())
    }
}

impl<T: TableEntry> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TableEntry + PartialEq> PartialEq for Table<T> {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle && self.entries == other.entries
    }
}

/// Every symbol table of a drawing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTables {
    pub layers: Table<Layer>,
    pub linetypes: Table<LineType>,
    pub text_styles: Table<TextStyle>,
    pub block_records: Table<BlockRecord>,
    pub visual_styles: Table<VisualStyle>,
    pub mleader_styles: Table<MLeaderStyle>,
    pub ucs: Table<Ucs>,
    pub vports: Table<VPort>,
    pub dim_styles: Table<DimStyle>,
    pub table_styles: Table<TableStyle>,
    pub mline_styles: Table<MLineStyle>,
    pub scales: Table<Scale>,
    pub app_ids: Table<AppId>,
    pub reg_apps: Table<AppId>,
    pub views: Table<View>,
}

impl SymbolTables {
    /// Upper-case names of every non-empty table
    pub fn table_names(&self) -> Vec<&'static str> {
        let sizes = [
            ("LAYER", self.layers.len()),
            ("LTYPE", self.linetypes.len()),
            ("STYLE", self.text_styles.len()),
            ("BLOCK_RECORD", self.block_records.len()),
            ("VISUALSTYLE", self.visual_styles.len()),
            ("MULTILEADERSTYLE", self.mleader_styles.len()),
            ("UCS", self.ucs.len()),
            ("VPORT", self.vports.len()),
            ("DIMSTYLE", self.dim_styles.len()),
            ("TABLESTYLE", self.table_styles.len()),
            ("MLINESTYLE", self.mline_styles.len()),
            ("SCALE", self.scales.len()),
            ("APPID", self.app_ids.len()),
            ("REGAPP", self.reg_apps.len()),
            ("VIEW", self.views.len()),
        ];
        sizes
            .into_iter()
            .filter(|(_, n)| *n > 0)
            .map(|(name, _)| name)
            .collect()
    }

    /// Total number of records across all tables
    pub fn record_count(&self) -> usize {
        self.layers.len()
            + self.linetypes.len()
            + self.text_styles.len()
            + self.block_records.len()
            + self.visual_styles.len()
            + self.mleader_styles.len()
            + self.ucs.len()
            + self.vports.len()
            + self.dim_styles.len()
            + self.table_styles.len()
            + self.mline_styles.len()
            + self.scales.len()
            + self.app_ids.len()
            + self.reg_apps.len()
            + self.views.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(name: &str, handle: u64) -> Layer {
        Layer {
            handle: Some(Handle::new(handle)),
            name: name.to_string(),
            ..Layer::default()
        }
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let mut table = Table::new();
        table.insert(layer("Walls", 0x10));
        assert!(table.contains("WALLS"));
        assert!(table.contains("walls"));
        assert_eq!(table.get_by_handle(Handle::new(0x10)).map(|l| l.name.as_str()), Some("Walls"));
    }

    #[test]
    fn test_insert_overwrites_and_stale_handle() {
        let mut table = Table::new();
        table.insert(layer("A", 1));
        let replaced = table.insert(layer("a", 2));
        assert!(replaced.is_some());
        assert_eq!(table.len(), 1);
        assert!(table.get_by_handle(Handle::new(1)).is_none());
        assert!(table.get_by_handle(Handle::new(2)).is_some());
    }

    #[test]
    fn test_insert_if_absent() {
        let mut table = Table::new();
        assert!(table.insert_if_absent(layer("A", 1)));
        assert!(!table.insert_if_absent(layer("A", 2)));
        assert_eq!(table.get("A").and_then(|l| l.handle), Some(Handle::new(1)));
    }

    #[test]
    fn test_table_names() {
        let mut tables = SymbolTables::default();
        assert!(tables.table_names().is_empty());
        tables.layers.insert(layer("0", 1));
        assert_eq!(tables.table_names(), vec!["LAYER"]);
        assert_eq!(tables.record_count(), 1);
    }
}
