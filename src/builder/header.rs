//! HEADER section → [`DrawingProperties`]
//!
//! Each `9 $NAME` tag opens a variable; the tags up to the next code 9 are
//! its value. Recognised variables are applied through a static registry,
//! every `$GEO*` variable is captured verbatim and the rest are ignored.

use ahash::AHashMap;
use once_cell::sync::Lazy;

use super::resolver::resolve_text;
use crate::document::{
    DrawingProperties, Extents, GeoSource, GeographicSummary, ResolvedRef, UcsFrame,
};
use crate::io::{encoding_for_code_page, CodeLookup, Tag, TagStream};
use crate::objects::{Catalog, GeoData};
use crate::tables::SymbolTables;
use crate::types::{Color, DxfVersion, LineWeight, Vector3};

type Apply = fn(&mut DrawingProperties, &CodeLookup<'_>);

/// Julian day number of 1970-01-01T00:00:00Z
const UNIX_EPOCH_JULIAN: f64 = 2_440_587.5;
const SECONDS_PER_DAY: f64 = 86_400.0;

static HEADER_VARIABLES: Lazy<AHashMap<&'static str, Apply>> = Lazy::new(|| {
    let mut map: AHashMap<&'static str, Apply> = AHashMap::new();

    map.insert("$ACADVER", |p, l| {
        if let Some(version) = l.string(1) {
            p.metadata.version = DxfVersion::from_version_string(&version);
            p.metadata.version_string = Some(version);
        }
    });
    map.insert("$ACADMAINTVER", |p, l| {
        p.metadata.maintenance_version = l.i64(70).or_else(|| l.i64(90));
    });
    map.insert("$DWGCODEPAGE", |p, l| {
        if let Some(code_page) = l.string(3) {
            p.metadata.encoding = encoding_for_code_page(&code_page).map(|e| e.name());
            p.metadata.code_page = Some(code_page);
        }
    });

    map.insert("$INSUNITS", |p, l| p.units.insertion_units = l.i16_or(70, 0));
    map.insert("$INSUNITSDEFSOURCE", |p, l| p.units.default_source = l.i16(70));
    map.insert("$INSUNITSDEFTARGET", |p, l| p.units.default_target = l.i16(70));
    map.insert("$INSUNITSFACTOR", |p, l| p.units.scale_factor = l.f64(40));
    map.insert("$MEASUREMENT", |p, l| p.units.measurement = l.i16(70));
    map.insert("$LUNITS", |p, l| p.units.linear_format = l.i16(70));
    map.insert("$LUPREC", |p, l| p.units.linear_precision = l.i16(70));
    map.insert("$AUNITS", |p, l| p.units.angular_format = l.i16(70));
    map.insert("$AUPREC", |p, l| p.units.angular_precision = l.i16(70));

    map.insert("$UCSORG", |p, l| {
        p.coordinates.model_ucs.origin = l.point3_or(10, Vector3::ZERO)
    });
    map.insert("$UCSXDIR", |p, l| set_axis(&mut p.coordinates.model_ucs, l, true));
    map.insert("$UCSYDIR", |p, l| set_axis(&mut p.coordinates.model_ucs, l, false));
    map.insert("$UCSNAME", |p, l| p.coordinates.model_ucs.name = l.string(2));
    map.insert("$PUCSORG", |p, l| {
        p.coordinates.paper_ucs.origin = l.point3_or(10, Vector3::ZERO)
    });
    map.insert("$PUCSXDIR", |p, l| set_axis(&mut p.coordinates.paper_ucs, l, true));
    map.insert("$PUCSYDIR", |p, l| set_axis(&mut p.coordinates.paper_ucs, l, false));
    map.insert("$PUCSNAME", |p, l| p.coordinates.paper_ucs.name = l.string(2));

    map.insert("$EXTMIN", |p, l| set_corner(&mut p.coordinates.extents, l, true));
    map.insert("$EXTMAX", |p, l| set_corner(&mut p.coordinates.extents, l, false));
    map.insert("$LIMMIN", |p, l| set_corner(&mut p.coordinates.limits, l, true));
    map.insert("$LIMMAX", |p, l| set_corner(&mut p.coordinates.limits, l, false));
    map.insert("$PEXTMIN", |p, l| {
        set_corner(&mut p.coordinates.paper_extents, l, true)
    });
    map.insert("$PEXTMAX", |p, l| {
        set_corner(&mut p.coordinates.paper_extents, l, false)
    });
    map.insert("$PLIMMIN", |p, l| {
        set_corner(&mut p.coordinates.paper_limits, l, true)
    });
    map.insert("$PLIMMAX", |p, l| {
        set_corner(&mut p.coordinates.paper_limits, l, false)
    });

    map.insert("$VIEWDIR", |p, l| {
        if let Some(direction) = l.point3(10) {
            p.coordinates.view_direction = direction;
        }
    });
    map.insert("$TARGET", |p, l| {
        p.coordinates.view_target = l.point3_or(10, Vector3::ZERO)
    });
    map.insert("$VIEWTWIST", |p, l| p.coordinates.view_twist = l.f64_or(40, 0.0));
    map.insert("$VIEWCTR", |p, l| p.coordinates.view_center = l.point2(10));
    map.insert("$VIEWSIZE", |p, l| p.coordinates.view_size = l.f64(40));

    map.insert("$PDMODE", |p, l| p.display.point_mode = l.i16_or(70, 0));
    map.insert("$PDSIZE", |p, l| p.display.point_size = l.f64_or(40, 0.0));
    map.insert("$FILLMODE", |p, l| p.display.fill_mode = l.bool(70).unwrap_or(true));
    map.insert("$MIRRTEXT", |p, l| p.display.mirror_text = l.bool(70).unwrap_or(false));
    map.insert("$TRACEWID", |p, l| p.display.trace_width = l.f64_or(40, 0.05));
    map.insert("$LTSCALE", |p, l| p.display.linetype_scale = l.f64_or(40, 1.0));

    map.insert("$CELTYPE", |p, l| p.entity_defaults.linetype = raw_name(l, 6));
    map.insert("$CELTSCALE", |p, l| {
        p.entity_defaults.linetype_scale = l.f64_or(40, 1.0)
    });
    map.insert("$CELWEIGHT", |p, l| {
        p.entity_defaults.lineweight = l
            .i16(370)
            .map(LineWeight::from_value)
            .unwrap_or(LineWeight::ByLayer)
    });
    map.insert("$CECOLOR", |p, l| {
        p.entity_defaults.color = Color::resolve(l.i16(62), l.i64(420))
    });
    map.insert("$CLAYER", |p, l| p.entity_defaults.layer = raw_name(l, 8));
    map.insert("$TEXTSTYLE", |p, l| p.entity_defaults.text_style = raw_name(l, 7));
    map.insert("$DIMSTYLE", |p, l| p.entity_defaults.dim_style = raw_name(l, 2));
    map.insert("$DIMTXSTY", |p, l| {
        p.entity_defaults.dim_text_style = raw_name(l, 7)
    });
    map.insert("$CMLSTYLE", |p, l| {
        p.entity_defaults.multiline_style = raw_name(l, 2)
    });

    map.insert("$TDCREATE", |p, l| p.metadata.created = l.f64(40).map(julian_to_unix));
    map.insert("$TDUPDATE", |p, l| p.metadata.updated = l.f64(40).map(julian_to_unix));
    map.insert("$TDINDWG", |p, l| p.metadata.editing_time_days = l.f64(40));
    map.insert("$HANDSEED", |p, l| p.metadata.handle_seed = l.handle(5));
    map.insert("$FINGERPRINTGUID", |p, l| p.metadata.fingerprint_guid = l.string(2));
    map.insert("$VERSIONGUID", |p, l| p.metadata.version_guid = l.string(2));
    map.insert("$LASTSAVEDBY", |p, l| p.metadata.last_saved_by = l.string(1));
    map.insert("$PROJECTNAME", |p, l| p.metadata.project_name = l.string(1));

    map.insert("$LATITUDE", |p, l| p.geographic.latitude = l.f64(40));
    map.insert("$LONGITUDE", |p, l| p.geographic.longitude = l.f64(40));
    map.insert("$NORTHDIRECTION", |p, l| p.geographic.north_direction = l.f64(40));

    map
});

/// Convert a Julian date to seconds since the Unix epoch
pub(crate) fn julian_to_unix(julian: f64) -> f64 {
    (julian - UNIX_EPOCH_JULIAN) * SECONDS_PER_DAY
}

fn set_axis(frame: &mut UcsFrame, lookup: &CodeLookup<'_>, x_axis: bool) {
    let Some(axis) = lookup.point3(10) else {
        return;
    };
    if x_axis {
        frame.x_axis = axis.normalize_or(Vector3::UNIT_X);
    } else {
        frame.y_axis = axis.normalize_or(Vector3::UNIT_Y);
    }
}

fn set_corner(extents: &mut Option<Extents>, lookup: &CodeLookup<'_>, min: bool) {
    let Some(point) = lookup.point3(10) else {
        return;
    };
    let extents = extents.get_or_insert_with(Extents::default);
    if min {
        extents.min = point;
    } else {
        extents.max = point;
    }
}

fn raw_name(lookup: &CodeLookup<'_>, code: i32) -> ResolvedRef {
    lookup
        .string(code)
        .map(|s| ResolvedRef::named(s.trim()))
        .unwrap_or_default()
}

/// Split HEADER tags into `(variable, value tags)` runs
fn variables(tags: &[Tag]) -> Vec<(&str, &[Tag])> {
    let mut runs = Vec::new();
    let mut open: Option<(usize, &str)> = None;
    for (i, tag) in tags.iter().enumerate() {
        if tag.code != 9 && tag.code != 0 {
            continue;
        }
        if let Some((start, name)) = open.take() {
            runs.push((name, &tags[start + 1..i]));
        }
        if tag.code == 9 {
            open = Some((i, tag.as_str().map(str::trim).unwrap_or("")));
        }
    }
    if let Some((start, name)) = open {
        runs.push((name, &tags[start + 1..]));
    }
    runs
}

/// Read every HEADER section into drawing properties.
///
/// Entity defaults are resolved against `tables` once all variables are in.
pub(crate) fn extract_properties(stream: &TagStream<'_>, tables: &SymbolTables) -> DrawingProperties {
    let mut properties = DrawingProperties::default();

    for section in stream.sections_named("HEADER") {
        for (name, value) in variables(section.tags) {
            let upper = name.to_uppercase();
            if upper.starts_with("$GEO") {
                for tag in value {
                    properties
                        .geographic
                        .header_values
                        .push(name, tag.code, tag.value.clone());
                }
                continue;
            }
            if let Some(apply) = HEADER_VARIABLES.get(upper.as_str()) {
                apply(&mut properties, &CodeLookup::new(value));
            }
        }
    }

    let geographic = &mut properties.geographic;
    if geographic.latitude.is_some() || geographic.longitude.is_some() {
        geographic.source = GeoSource::Header;
    }

    resolve_entity_defaults(&mut properties, tables);
    properties
}

fn resolve_entity_defaults(properties: &mut DrawingProperties, tables: &SymbolTables) {
    let defaults = &mut properties.entity_defaults;
    let text = |r: &ResolvedRef| r.name.clone().unwrap_or_default();

    defaults.linetype = resolve_text(&tables.linetypes, &text(&defaults.linetype));
    defaults.layer = resolve_text(&tables.layers, &text(&defaults.layer));
    defaults.text_style = resolve_text(&tables.text_styles, &text(&defaults.text_style));
    defaults.dim_style = resolve_text(&tables.dim_styles, &text(&defaults.dim_style));
    defaults.dim_text_style = resolve_text(&tables.text_styles, &text(&defaults.dim_text_style));
    defaults.multiline_style =
        resolve_text(&tables.mline_styles, &text(&defaults.multiline_style));
}

/// Let a GEODATA object override the header's location heuristics.
///
/// The first object carrying a design or reference point wins; without one
/// the first object is used.
pub(crate) fn apply_geodata(geographic: &mut GeographicSummary, geo_data: &Catalog<GeoData>) {
    let Some(geo) = geo_data
        .iter()
        .find(|g| g.design_point.is_some() || g.reference_point.is_some())
        .or_else(|| geo_data.iter().next())
    else {
        return;
    };

    let location = geo.location();
    geographic.source = GeoSource::GeoData;
    geographic.latitude = location.latitude;
    geographic.longitude = location.longitude;
    geographic.elevation = location.elevation;
    geographic.horizontal_unit_scale = location.horizontal_unit_scale;
    geographic.vertical_unit_scale = location.vertical_unit_scale;
    geographic.design_point = geo.design_point;
    geographic.reference_point = geo.reference_point;
    geographic.north_vector = geo.north_direction;
    geographic.coordinate_type = geo.coordinate_type;
    geographic.coordinate_system = geo.coordinate_system.clone();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{Layer, Table};
    use crate::types::Handle;

    fn header(pairs: &[(i32, &str)]) -> Vec<Tag> {
        let mut tags = vec![Tag::from_raw(0, "SECTION", 1), Tag::from_raw(2, "HEADER", 2)];
        tags.extend(
            pairs
                .iter()
                .enumerate()
                .map(|(i, (c, v))| Tag::from_raw(*c, v, i as u32 + 3)),
        );
        tags.push(Tag::from_raw(0, "ENDSEC", 1000));
        tags
    }

    fn properties(pairs: &[(i32, &str)]) -> DrawingProperties {
        let tags = header(pairs);
        extract_properties(&TagStream::new(&tags), &SymbolTables::default())
    }

    #[test]
    fn test_units_and_version() {
        let p = properties(&[
            (9, "$ACADVER"),
            (1, "AC1027"),
            (9, "$INSUNITS"),
            (70, "4"),
            (9, "$INSUNITSFACTOR"),
            (40, "2.5"),
            (9, "$UNKNOWNVAR"),
            (70, "9"),
            (9, "$DWGCODEPAGE"),
            (3, "ANSI_1252"),
        ]);
        assert_eq!(p.metadata.version, DxfVersion::from_version_string("AC1027"));
        assert_eq!(p.metadata.version_string.as_deref(), Some("AC1027"));
        assert_eq!(p.units.insertion_units, 4);
        assert_eq!(p.units.scale_factor, Some(2.5));
        assert_eq!(p.metadata.encoding, Some("windows-1252"));
    }

    #[test]
    fn test_ucs_axes_normalised() {
        let p = properties(&[(9, "$UCSXDIR"), (10, "2"), (20, "0"), (30, "0")]);
        assert_eq!(p.coordinates.model_ucs.x_axis, Vector3::UNIT_X);
        assert_eq!(p.coordinates.model_ucs.y_axis, Vector3::UNIT_Y);
    }

    #[test]
    fn test_extents_pair() {
        let p = properties(&[
            (9, "$EXTMIN"),
            (10, "-1"),
            (20, "-2"),
            (9, "$EXTMAX"),
            (10, "5"),
            (20, "6"),
        ]);
        let extents = p.coordinates.extents.expect("extents");
        assert_eq!(extents.min, Vector3::new(-1.0, -2.0, 0.0));
        assert_eq!(extents.max, Vector3::new(5.0, 6.0, 0.0));
        assert!(extents.is_valid());
    }

    #[test]
    fn test_julian_dates() {
        assert_eq!(julian_to_unix(2_440_587.5), 0.0);
        let p = properties(&[(9, "$TDCREATE"), (40, "2440588.5")]);
        assert_eq!(p.metadata.created, Some(86_400.0));
    }

    #[test]
    fn test_geo_variables_bagged() {
        let p = properties(&[
            (9, "$GEOLATLONFORMAT"),
            (70, "1"),
            (9, "$GEOMARKERVISIBILITY"),
            (290, "1"),
            (9, "$LATITUDE"),
            (40, "37.5"),
            (9, "$LONGITUDE"),
            (40, "-122.1"),
        ]);
        let bag = &p.geographic.header_values;
        assert_eq!(bag.values.len(), 2);
        assert_eq!(bag.by_code.get(&70).map(Vec::len), Some(1));
        assert!(bag.get("$geomarkervisibility").is_some());
        assert_eq!(p.geographic.source, GeoSource::Header);
        assert!(p.geographic.has_location());
    }

    #[test]
    fn test_entity_defaults_resolve_name_or_handle() {
        let mut tables = SymbolTables::default();
        let mut layers = Table::new();
        layers.insert(Layer {
            handle: Some(Handle::new(0x10)),
            name: "Walls".to_string(),
            ..Default::default()
        });
        tables.layers = layers;
        let tags = header(&[(9, "$CLAYER"), (8, "walls"), (9, "$CELTYPE"), (6, "Hidden")]);
        let p = extract_properties(&TagStream::new(&tags), &tables);
        assert!(p.entity_defaults.layer.resolved);
        assert_eq!(p.entity_defaults.layer.name.as_deref(), Some("Walls"));
        assert_eq!(p.entity_defaults.layer.handle, Some(Handle::new(0x10)));
        assert!(!p.entity_defaults.linetype.resolved);
        assert_eq!(p.entity_defaults.linetype.name.as_deref(), Some("Hidden"));
    }

    #[test]
    fn test_geodata_overrides_header() {
        let mut geographic = GeographicSummary {
            latitude: Some(1.0),
            longitude: Some(2.0),
            source: GeoSource::Header,
            ..Default::default()
        };
        let mut catalog = Catalog::new();
        catalog.insert(GeoData {
            handle: Some(Handle::new(0x40)),
            coordinate_type: Some(3),
            reference_point: Some(Vector3::new(-122.0, 37.0, 10.0)),
            ..Default::default()
        });
        apply_geodata(&mut geographic, &catalog);
        assert_eq!(geographic.source, GeoSource::GeoData);
        assert_eq!(geographic.latitude, Some(37.0));
        assert_eq!(geographic.longitude, Some(-122.0));
        assert_eq!(geographic.elevation, Some(10.0));
    }
}
