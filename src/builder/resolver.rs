//! Cross-reference resolution shared by every pass
//!
//! Lookups never invent records: a reference resolves when its name is in
//! the table, or failing that when its handle is some record's own handle.

use ahash::AHashSet;
use tracing::trace;

use super::BuilderConfiguration;
use crate::document::{DrawingProperties, ResolvedRef, Severity, UnitDiagnostic, UnitSettings};
use crate::objects::{AuxiliaryObjects, Catalog, Material, PlotInfrastructure, SpatialFilter};
use crate::tables::{SymbolTables, Table, TableEntry};
use crate::types::{unit_name, unit_to_meters, Handle};

/// Everything the entity decoder and block pass may look up
///
/// Built once after the table and object passes; read-only afterwards.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResolutionContext<'a> {
    pub tables: &'a SymbolTables,
    pub properties: &'a DrawingProperties,
    pub objects: &'a AuxiliaryObjects,
    pub plot: &'a PlotInfrastructure,
    pub materials: &'a Catalog<Material>,
    pub config: &'a BuilderConfiguration,
}

/// Find a record by name, then by its own handle.
///
/// The name match is case-insensitive, as DXF symbol names are, and it wins
/// over the handle even when the handle points at a different record.
pub fn resolve_record<'t, T: TableEntry>(
    table: &'t Table<T>,
    name: Option<&str>,
    handle: Option<Handle>,
) -> Option<&'t T> {
    name.filter(|n| !n.trim().is_empty())
        .and_then(|n| table.get(n))
        .or_else(|| handle.and_then(|h| table.get_by_handle(h)))
}

/// Resolve a name/handle pair into a [`ResolvedRef`].
///
/// A match fills in both the record's name and handle. Without a match the
/// inputs are kept as written and `resolved` stays false.
pub fn resolved_reference<T: TableEntry>(
    table: &Table<T>,
    name: Option<&str>,
    handle: Option<Handle>,
) -> ResolvedRef {
    match resolve_record(table, name, handle) {
        Some(record) => ResolvedRef {
            name: Some(record.name().to_string()),
            handle: record.handle().or(handle),
            resolved: true,
        },
        None => ResolvedRef {
            name: name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            handle,
            resolved: false,
        },
    }
}

/// Resolve header text that may hold either a record name or a handle
pub(crate) fn resolve_text<T: TableEntry>(table: &Table<T>, text: &str) -> ResolvedRef {
    let text = text.trim();
    if text.is_empty() {
        return ResolvedRef::default();
    }
    if table.contains(text) {
        return resolved_reference(table, Some(text), None);
    }
    match Handle::parse(text).and_then(|h| table.get_by_handle(h)) {
        Some(record) => ResolvedRef {
            name: Some(record.name().to_string()),
            handle: record.handle(),
            resolved: true,
        },
        None => ResolvedRef::named(text),
    }
}

/// Walk dictionaries from `start` and collect every spatial filter reached.
///
/// Depth first; a DICTIONARY recurses into its entries and default entry, an
/// XRECORD offers every handle under codes 330-369, a SPATIAL_FILTER is a
/// leaf. Containers and filters are visited at most once, so cycles end
/// quietly. Filters come back in discovery order.
pub fn collect_spatial_filters(objects: &AuxiliaryObjects, start: Handle) -> Vec<&SpatialFilter> {
    let mut found = Vec::new();
    // xrecords are tracked here too
    let mut visited_dictionaries: AHashSet<Handle> = AHashSet::new();
    let mut visited_filters: AHashSet<Handle> = AHashSet::new();
    let mut stack = vec![start];

    while let Some(handle) = stack.pop() {
        if let Some(filter) = objects.spatial_filters.get(handle) {
            if visited_filters.insert(handle) {
                found.push(filter);
            }
            continue;
        }

        let children: Vec<Handle> = if let Some(dictionary) = objects.dictionaries.get(handle) {
            if !visited_dictionaries.insert(handle) {
                trace!(%handle, "dictionary revisited");
                continue;
            }
            dictionary
                .entries
                .iter()
                .map(|e| e.handle)
                .chain(dictionary.default_entry)
                .collect()
        } else if let Some(xrecord) = objects.xrecords.get(handle) {
            if !visited_dictionaries.insert(handle) {
                continue;
            }
            xrecord.referenced_handles()
        } else {
            continue;
        };

        // reversed so the first child is walked first
        stack.extend(children.into_iter().rev());
    }
    found
}

/// Unit conversion between a block's units and the drawing's units.
///
/// A unitless block falls back to `$INSUNITSDEFSOURCE` (scaled by
/// `$INSUNITSFACTOR`); the drawing side uses `$INSUNITS`, or
/// `$INSUNITSDEFTARGET` when that is unitless. When either side is still
/// unitless the factor is 1.
pub fn create_unit_diagnostics(
    units: &UnitSettings,
    block_units: i16,
    geometry_scale: Option<f64>,
    tolerance: f64,
) -> UnitDiagnostic {
    let mut used_fallback = false;

    let mut source = block_units;
    let mut multiplier = 1.0;
    if source == 0 {
        if let Some(default_source) = units.default_source.filter(|&u| u != 0) {
            source = default_source;
            used_fallback = true;
            multiplier = units
                .scale_factor
                .filter(|f| f.is_finite() && *f != 0.0)
                .unwrap_or(1.0);
        }
    }

    let mut target = units.insertion_units;
    if target == 0 {
        if let Some(default_target) = units.default_target.filter(|&u| u != 0) {
            target = default_target;
            used_fallback = true;
        }
    }

    let factor = match (unit_to_meters(source), unit_to_meters(target)) {
        (Some(s), Some(t)) if source != 0 && target != 0 => s / t * multiplier,
        _ => 1.0,
    };

    let differs = source != 0 && target != 0 && source != target;
    let scale_mismatch = geometry_scale.is_some_and(|scale| {
        let reference = factor.abs().max(f64::MIN_POSITIVE);
        (scale - factor).abs() > tolerance * reference
    });

    let severity = if differs || used_fallback || scale_mismatch {
        Severity::Warning
    } else {
        Severity::Info
    };

    let mut message = format!(
        "{} -> {}: factor {}",
        unit_name(source),
        unit_name(target),
        factor
    );
    if used_fallback {
        message.push_str(" (drawing defaults used)");
    }
    if let (true, Some(scale)) = (scale_mismatch, geometry_scale) {
        message.push_str(&format!(", geometry scale {scale} disagrees"));
    }

    UnitDiagnostic {
        source_units: source,
        target_units: target,
        source_name: unit_name(source),
        target_name: unit_name(target),
        factor,
        used_fallback,
        geometry_scale,
        severity,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Tag;
    use crate::objects::{Dictionary, DictionaryEntry, XRecord};
    use crate::tables::Layer;

    fn dictionary(handle: u64, entries: &[u64]) -> Dictionary {
        Dictionary {
            handle: Some(Handle::new(handle)),
            entries: entries
                .iter()
                .enumerate()
                .map(|(i, &h)| DictionaryEntry {
                    name: format!("E{i}"),
                    handle: Handle::new(h),
                })
                .collect(),
            ..Default::default()
        }
    }

    fn filter(handle: u64) -> SpatialFilter {
        SpatialFilter {
            handle: Some(Handle::new(handle)),
            ..Default::default()
        }
    }

    #[test]
    fn test_name_then_handle() {
        let mut layers = Table::new();
        layers.insert(Layer {
            handle: Some(Handle::new(0x10)),
            name: "Walls".to_string(),
            ..Default::default()
        });
        let by_name = resolve_record(&layers, Some("WALLS"), None);
        let by_handle = resolve_record(&layers, Some("Missing"), Some(Handle::new(0x10)));
        assert_eq!(by_name.map(|l| l.name.as_str()), Some("Walls"));
        assert_eq!(by_handle.map(|l| l.name.as_str()), Some("Walls"));
        assert!(resolve_record(&layers, Some("Missing"), Some(Handle::new(0x11))).is_none());

        let unresolved = resolved_reference(&layers, Some("Missing"), None);
        assert!(!unresolved.resolved);
        assert_eq!(unresolved.name.as_deref(), Some("Missing"));
    }

    #[test]
    fn test_case_only_name_match_beats_handle() {
        let mut layers = Table::new();
        layers.insert(Layer {
            handle: Some(Handle::new(0x10)),
            name: "Walls".to_string(),
            ..Default::default()
        });
        layers.insert(Layer {
            handle: Some(Handle::new(0x11)),
            name: "Doors".to_string(),
            ..Default::default()
        });
        let found = resolve_record(&layers, Some("wALLS"), Some(Handle::new(0x11)));
        assert_eq!(found.map(|l| l.name.as_str()), Some("Walls"));

        let reference = resolved_reference(&layers, Some("wALLS"), Some(Handle::new(0x11)));
        assert!(reference.resolved);
        assert_eq!(reference.name.as_deref(), Some("Walls"));
        assert_eq!(reference.handle, Some(Handle::new(0x10)));
    }

    #[test]
    fn test_resolve_text_handle_form() {
        let mut layers = Table::new();
        layers.insert(Layer {
            handle: Some(Handle::new(0x2F)),
            name: "Doors".to_string(),
            ..Default::default()
        });
        let r = resolve_text(&layers, "2f");
        assert!(r.resolved);
        assert_eq!(r.name.as_deref(), Some("Doors"));
        let raw = resolve_text(&layers, "Unknown");
        assert!(!raw.resolved);
        assert_eq!(raw.name.as_deref(), Some("Unknown"));
    }

    #[test]
    fn test_filters_in_discovery_order() {
        let mut objects = AuxiliaryObjects::default();
        objects.dictionaries.insert(dictionary(0xA, &[0xB, 0xF1]));
        objects.dictionaries.insert(dictionary(0xB, &[0xF2]));
        objects.spatial_filters.insert(filter(0xF1));
        objects.spatial_filters.insert(filter(0xF2));
        let found: Vec<_> = collect_spatial_filters(&objects, Handle::new(0xA))
            .into_iter()
            .filter_map(|f| f.handle)
            .collect();
        assert_eq!(found, vec![Handle::new(0xF2), Handle::new(0xF1)]);
    }

    #[test]
    fn test_cycle_terminates_empty() {
        let mut objects = AuxiliaryObjects::default();
        objects.dictionaries.insert(dictionary(0xA, &[0xB]));
        objects.dictionaries.insert(dictionary(0xB, &[0xA]));
        assert!(collect_spatial_filters(&objects, Handle::new(0xA)).is_empty());
    }

    #[test]
    fn test_xrecord_handles_are_followed() {
        let mut objects = AuxiliaryObjects::default();
        objects.dictionaries.insert(dictionary(0xA, &[0xC, 0xF1]));
        objects.xrecords.insert(XRecord {
            handle: Some(Handle::new(0xC)),
            data: vec![Tag::from_raw(340, "F1", 0), Tag::from_raw(360, "F3", 0)],
            ..Default::default()
        });
        objects.spatial_filters.insert(filter(0xF1));
        objects.spatial_filters.insert(filter(0xF3));
        let found = collect_spatial_filters(&objects, Handle::new(0xA));
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_millimeters_to_meters() {
        let units = UnitSettings {
            insertion_units: 6,
            ..Default::default()
        };
        let diagnostic = create_unit_diagnostics(&units, 4, None, 1e-6);
        assert!((diagnostic.factor - 0.001).abs() < 1e-12);
        assert_eq!(diagnostic.severity, Severity::Warning);
        assert_eq!(diagnostic.source_name, "millimeters");
    }

    #[test]
    fn test_unitless_without_defaults() {
        let diagnostic = create_unit_diagnostics(&UnitSettings::default(), 0, None, 1e-6);
        assert_eq!(diagnostic.factor, 1.0);
        assert!(!diagnostic.used_fallback);
        assert_eq!(diagnostic.severity, Severity::Info);
    }

    #[test]
    fn test_default_source_fallback() {
        let units = UnitSettings {
            insertion_units: 6,
            default_source: Some(5),
            scale_factor: Some(2.0),
            ..Default::default()
        };
        let diagnostic = create_unit_diagnostics(&units, 0, None, 1e-6);
        assert!(diagnostic.used_fallback);
        assert!((diagnostic.factor - 0.02).abs() < 1e-12);
        assert_eq!(diagnostic.severity, Severity::Warning);
    }

    #[test]
    fn test_geometry_scale_mismatch() {
        let units = UnitSettings {
            insertion_units: 4,
            ..Default::default()
        };
        let matching = create_unit_diagnostics(&units, 4, Some(1.0), 1e-6);
        assert_eq!(matching.severity, Severity::Info);
        let off = create_unit_diagnostics(&units, 4, Some(2.0), 1e-6);
        assert_eq!(off.severity, Severity::Warning);
    }
}
