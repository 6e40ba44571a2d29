//! OBJECTS section passes
//!
//! Plot infrastructure, materials, backgrounds, suns, color books, the
//! auxiliary catalogs and geographic data are each collected by their own
//! pass over the same record list. Names that objects do not store
//! themselves come from the dictionary entry pointing at them.

use ahash::AHashMap;
use indexmap::IndexMap;
use tracing::{trace, warn};

use super::tables::{insert_record, RecordOutcome};
use crate::io::{CodeLookup, Record, Tag};
use crate::notification::{NotificationCollection, NotificationType};
use crate::objects::{
    AuxiliaryObjects, Background, BookColor, Catalog, ColorBook, DataLink, DetailViewObject,
    Dictionary, DictionaryVariable, GeoData, ImageDefinition, ImageDefinitionReactor, Layout,
    LightList, Material, ObjectRecord, PlotInfrastructure, PlotSettings, PointCloudDefinition,
    PointCloudReactor, ProxyObject, RasterVariables, SectionGeometry, SectionObject,
    SpatialFilter, Sun, UnderlayDefinition, UnderlayKind, ViewStyle, ViewStyleKind, XRecord,
};
use crate::tables::SymbolTables;
use crate::types::Handle;

/// Dictionaries of the OBJECTS section, indexed for naming and lookup
#[derive(Debug, Default)]
pub(crate) struct ObjectIndex {
    dictionaries: AHashMap<Handle, Dictionary>,
    /// Entry handle → entry name; the first dictionary naming a handle wins
    entry_names: AHashMap<Handle, String>,
}

impl ObjectIndex {
    pub(crate) fn new(records: &[Record<'_>]) -> Self {
        let mut index = ObjectIndex::default();
        for record in records.iter().filter(|r| is_dictionary(r.kind)) {
            let dictionary = Dictionary::decode(&CodeLookup::new(record.tags), record.line);
            for entry in &dictionary.entries {
                index
                    .entry_names
                    .entry(entry.handle)
                    .or_insert_with(|| entry.name.clone());
            }
            if let Some(handle) = dictionary.handle {
                index.dictionaries.insert(handle, dictionary);
            }
        }
        index
    }

    /// Name of the dictionary entry pointing at `handle`
    pub(crate) fn name_of(&self, handle: Option<Handle>) -> Option<&str> {
        handle
            .and_then(|h| self.entry_names.get(&h))
            .map(String::as_str)
            .filter(|n| !n.trim().is_empty())
    }

    /// A dictionary reachable under the entry name, with its handle
    pub(crate) fn named_dictionary(&self, name: &str) -> Option<(Handle, &Dictionary)> {
        self.dictionaries
            .values()
            .filter_map(|d| d.get(name))
            .find_map(|h| self.dictionaries.get(&h).map(|d| (h, d)))
    }
}

fn is_dictionary(kind: &str) -> bool {
    matches!(kind, "DICTIONARY" | "ACDBDICTIONARYWDFLT")
}

/// Insert into a catalog, reporting handle reuse
fn catalog_insert<T: ObjectRecord>(
    catalog: &mut Catalog<T>,
    record: T,
    kind: &str,
    line: u32,
    notifications: &mut NotificationCollection,
) {
    if catalog.insert(record) {
        warn!(kind, line, "duplicate object handle");
        notifications.notify_at(
            NotificationType::Warning,
            line,
            format!("{kind} reuses an existing handle; the later object wins"),
        );
    }
}

/// LAYOUT, PLOTSETTINGS and the plot-style name dictionary
pub(crate) fn extract_plot(
    records: &[Record<'_>],
    index: &ObjectIndex,
    notifications: &mut NotificationCollection,
) -> PlotInfrastructure {
    let mut plot = PlotInfrastructure::default();
    for record in records {
        let lookup = CodeLookup::new(record.tags);
        match record.kind {
            "LAYOUT" => catalog_insert(
                &mut plot.layouts,
                Layout::decode(&lookup, record.line),
                record.kind,
                record.line,
                notifications,
            ),
            "PLOTSETTINGS" => catalog_insert(
                &mut plot.plot_settings,
                PlotSettings::decode(&lookup, record.line),
                record.kind,
                record.line,
                notifications,
            ),
            _ => {}
        }
    }
    if let Some((handle, dictionary)) = index.named_dictionary("ACAD_PLOTSTYLENAME") {
        plot.plot_style_dictionary = Some(handle);
        plot.plot_style_names = dictionary.entries.clone();
    }
    plot
}

pub(crate) fn extract_materials(
    records: &[Record<'_>],
    notifications: &mut NotificationCollection,
) -> Catalog<Material> {
    let mut materials = Catalog::new();
    for record in records.iter().filter(|r| r.kind == "MATERIAL") {
        let material = Material::decode(&CodeLookup::new(record.tags), record.line);
        catalog_insert(&mut materials, material, record.kind, record.line, notifications);
    }
    materials
}

/// Every `*BACKGROUND` object, named from the `ACAD_BACKGROUND` dictionary
pub(crate) fn extract_backgrounds(
    records: &[Record<'_>],
    index: &ObjectIndex,
    notifications: &mut NotificationCollection,
) -> Catalog<Background> {
    let mut backgrounds = Catalog::new();
    for record in records.iter().filter(|r| r.kind.ends_with("BACKGROUND")) {
        let mut background = Background::decode(&CodeLookup::new(record.tags), record.line);
        background.name = index.name_of(background.handle).map(str::to_string);
        catalog_insert(&mut backgrounds, background, record.kind, record.line, notifications);
    }
    backgrounds
}

pub(crate) fn extract_suns(
    records: &[Record<'_>],
    notifications: &mut NotificationCollection,
) -> Catalog<Sun> {
    let mut suns = Catalog::new();
    for record in records.iter().filter(|r| r.kind == "SUN") {
        let sun = Sun::decode(&CodeLookup::new(record.tags), record.line);
        catalog_insert(&mut suns, sun, record.kind, record.line, notifications);
    }
    suns
}

/// DBCOLOR objects grouped by book name, books in first-seen order
pub(crate) fn extract_color_books(records: &[Record<'_>]) -> IndexMap<String, ColorBook> {
    let mut books: IndexMap<String, ColorBook> = IndexMap::new();
    for record in records.iter().filter(|r| r.kind == "DBCOLOR") {
        let color = BookColor::decode(&CodeLookup::new(record.tags), record.line);
        books
            .entry(color.book.clone())
            .or_insert_with(|| ColorBook::new(color.book.clone()))
            .colors
            .push(color);
    }
    books
}

pub(crate) fn extract_geodata(
    records: &[Record<'_>],
    notifications: &mut NotificationCollection,
) -> Catalog<GeoData> {
    let mut geo = Catalog::new();
    for record in records
        .iter()
        .filter(|r| matches!(r.kind, "GEODATA" | "GEOGRAPHICLOCATION"))
    {
        let data = GeoData::decode(&CodeLookup::new(record.tags), record.line);
        catalog_insert(&mut geo, data, record.kind, record.line, notifications);
    }
    geo
}

/// One pass over OBJECTS filling the handle-indexed auxiliary catalogs
pub(crate) fn extract_auxiliary(
    records: &[Record<'_>],
    index: &ObjectIndex,
    notifications: &mut NotificationCollection,
) -> AuxiliaryObjects {
    let mut objects = AuxiliaryObjects::default();

    for record in records {
        let lookup = CodeLookup::new(record.tags);
        let (kind, line) = (record.kind, record.line);
        match kind {
            "DICTIONARY" | "ACDBDICTIONARYWDFLT" => {
                let dictionary = Dictionary::decode(&lookup, line);
                catalog_insert(&mut objects.dictionaries, dictionary, kind, line, notifications);
            }
            "XRECORD" => {
                let xrecord = XRecord::decode(&lookup, line);
                catalog_insert(&mut objects.xrecords, xrecord, kind, line, notifications);
            }
            "SPATIAL_FILTER" => {
                let filter = SpatialFilter::decode(&lookup, line);
                catalog_insert(&mut objects.spatial_filters, filter, kind, line, notifications);
            }
            "IMAGEDEF" => {
                let definition = ImageDefinition::decode(&lookup, line);
                catalog_insert(&mut objects.image_definitions, definition, kind, line, notifications);
            }
            "IMAGEDEF_REACTOR" => {
                let reactor = ImageDefinitionReactor::decode(&lookup, line);
                catalog_insert(&mut objects.image_reactors, reactor, kind, line, notifications);
            }
            "RASTERVARIABLES" => {
                let variables = RasterVariables::decode(&lookup, line);
                catalog_insert(&mut objects.raster_variables, variables, kind, line, notifications);
            }
            "PDFDEFINITION" | "DWFDEFINITION" | "DGNDEFINITION" => {
                let underlay_kind = UnderlayKind::from_type_name(kind).unwrap_or_default();
                let definition = UnderlayDefinition::decode(underlay_kind, &lookup, line);
                catalog_insert(
                    &mut objects.underlay_definitions,
                    definition,
                    kind,
                    line,
                    notifications,
                );
            }
            "ACDBPOINTCLOUDDEF" | "ACDBPOINTCLOUDDEFEX" => {
                let definition = PointCloudDefinition::decode(kind.ends_with("EX"), &lookup, line);
                catalog_insert(
                    &mut objects.point_cloud_definitions,
                    definition,
                    kind,
                    line,
                    notifications,
                );
            }
            "ACDBPOINTCLOUDDEF_REACTOR" | "ACDBPOINTCLOUDDEF_REACTOR_EX" => {
                let reactor = PointCloudReactor::decode(kind.ends_with("_EX"), &lookup, line);
                catalog_insert(&mut objects.point_cloud_reactors, reactor, kind, line, notifications);
            }
            "ACDBSECTIONVIEWSTYLE" | "ACDBDETAILVIEWSTYLE" => {
                let style_kind = if kind == "ACDBDETAILVIEWSTYLE" {
                    ViewStyleKind::Detail
                } else {
                    ViewStyleKind::Section
                };
                let mut style = ViewStyle::decode(style_kind, &lookup, line);
                style.name = index.name_of(style.handle).map(str::to_string);
                catalog_insert(&mut objects.view_styles, style, kind, line, notifications);
            }
            "SECTIONOBJECT" => {
                let section = SectionObject::decode(&lookup, line);
                catalog_insert(&mut objects.section_objects, section, kind, line, notifications);
            }
            "SECTIONGEOMETRY" | "ACDBSECTIONGEOMETRY" => {
                let geometry = SectionGeometry::decode(&lookup, line);
                catalog_insert(&mut objects.section_geometries, geometry, kind, line, notifications);
            }
            "ACDBDETAILVIEWOBJECT" => {
                let detail = DetailViewObject::decode(&lookup, line);
                catalog_insert(&mut objects.detail_view_objects, detail, kind, line, notifications);
            }
            "ACAD_PROXY_OBJECT" => {
                let proxy = ProxyObject::decode(&lookup, line);
                if !proxy.payload.is_consistent() {
                    trace!(line, "proxy payload shorter than declared");
                }
                catalog_insert(&mut objects.proxy_objects, proxy, kind, line, notifications);
            }
            "DATALINK" => {
                let link = DataLink::decode(&lookup, line);
                catalog_insert(&mut objects.data_links, link, kind, line, notifications);
            }
            "DICTIONARYVAR" => {
                let mut variable = DictionaryVariable::decode(&lookup, line);
                variable.name = index.name_of(variable.handle).map(str::to_string);
                catalog_insert(
                    &mut objects.dictionary_variables,
                    variable,
                    kind,
                    line,
                    notifications,
                );
            }
            "LIGHTLIST" => {
                let list = LightList::decode(&lookup, line);
                catalog_insert(&mut objects.light_lists, list, kind, line, notifications);
            }
            _ => {}
        }
    }
    objects
}

/// Merge style objects stored in OBJECTS into the symbol tables.
///
/// An object without a name code takes the name of the dictionary entry that
/// points at it. Records already present from TABLES are never replaced.
/// Returns the number of records added.
pub(crate) fn merge_style_objects(
    records: &[Record<'_>],
    index: &ObjectIndex,
    tables: &mut SymbolTables,
    notifications: &mut NotificationCollection,
) -> usize {
    let mut merged = 0;
    for record in records {
        if !matches!(
            record.kind,
            "MLINESTYLE" | "MLEADERSTYLE" | "MULTILEADERSTYLE" | "TABLESTYLE" | "VISUALSTYLE" | "SCALE"
        ) {
            continue;
        }

        let lookup = CodeLookup::new(record.tags);
        let named: Vec<Tag>;
        let lookup = match (lookup.string(2), index.name_of(lookup.handle(5))) {
            (None, Some(name)) => {
                named = std::iter::once(Tag::new(2, name, record.line))
                    .chain(record.tags.iter().cloned())
                    .collect();
                CodeLookup::new(&named)
            }
            _ => lookup,
        };

        let name = [2, 3, 300].into_iter().find_map(|code| lookup.string(code));
        let exists = name.as_deref().is_some_and(|n| table_contains(tables, record.kind, n));
        if exists {
            trace!(kind = record.kind, name = ?name, "style object shadowed by table record");
            continue;
        }

        match insert_record(tables, record.kind, &lookup, record.line) {
            RecordOutcome::Inserted => merged += 1,
            RecordOutcome::DuplicateHandle => {
                merged += 1;
                notifications.notify_at(
                    NotificationType::Warning,
                    record.line,
                    format!("{} object reuses an existing handle", record.kind),
                );
            }
            RecordOutcome::Unnamed => trace!(kind = record.kind, "unnamed style object"),
            RecordOutcome::Ignored => {}
        }
    }
    merged
}

fn table_contains(tables: &SymbolTables, kind: &str, name: &str) -> bool {
    match kind {
        "MLINESTYLE" => tables.mline_styles.contains(name),
        "MLEADERSTYLE" | "MULTILEADERSTYLE" => tables.mleader_styles.contains(name),
        "TABLESTYLE" => tables.table_styles.contains(name),
        "VISUALSTYLE" => tables.visual_styles.contains(name),
        "SCALE" => tables.scales.contains(name),
        _ => false,
    }
}
