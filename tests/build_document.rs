//! End-to-end builds over small hand-written streams

mod common;

use common::{tags, StreamBuilder};
use dxf_document::document::{DiagnosticKind, Severity};
use dxf_document::entities::PolylineKind;
use dxf_document::{
    build_all, BuilderConfiguration, DocumentBuilder, DxfError, Handle, NotificationType, Space,
    TableEntry,
};

fn layer_table() -> Vec<(i32, &'static str)> {
    vec![
        (0, "LAYER"),
        (5, "10"),
        (100, "AcDbSymbolTableRecord"),
        (100, "AcDbLayerTableRecord"),
        (2, "0"),
        (70, "0"),
        (62, "7"),
        (0, "LAYER"),
        (5, "11"),
        (100, "AcDbSymbolTableRecord"),
        (100, "AcDbLayerTableRecord"),
        (2, "Walls"),
        (70, "0"),
        (62, "1"),
    ]
}

fn sample_stream() -> StreamBuilder {
    let layers = layer_table();
    StreamBuilder::new()
        .header(&[("$ACADVER", 1, "AC1027"), ("$INSUNITS", 70, "4")])
        .tables(&[("LAYER", layers.as_slice())])
        .section(
            "ENTITIES",
            &[
                (0, "LINE"),
                (5, "20"),
                (100, "AcDbEntity"),
                (8, "Walls"),
                (100, "AcDbLine"),
                (10, "0"),
                (20, "0"),
                (11, "10"),
                (21, "0"),
                (0, "CIRCLE"),
                (8, "0"),
                (10, "5"),
                (20, "5"),
                (40, "2.5"),
                (0, "CIRCLE"),
                (8, "0"),
                (10, "1"),
                (20, "1"),
                (40, "1"),
            ],
        )
}

#[test]
fn test_build_is_idempotent() {
    let stream = sample_stream().finish();
    let mut builder = DocumentBuilder::new(stream.clone());
    let first = builder.build();
    let second = builder.build();
    assert_eq!(first, second);

    let fresh = DocumentBuilder::new(stream).build();
    assert_eq!(first, fresh);

    let ids: Vec<&str> = first.entities().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["20", "entity-1", "entity-2"]);
}

#[test]
fn test_table_lookup_by_name_and_handle_agree() {
    let document = sample_stream().build();
    let layers = &document.tables().layers;
    assert_eq!(layers.len(), 2);

    for name in layers.names() {
        let by_name = layers.get(name).unwrap();
        let handle = by_name.handle().unwrap();
        let by_handle = layers.get_by_handle(handle).unwrap();
        assert_eq!(by_name.name(), by_handle.name());
    }
    assert!(layers.get("walls").is_some());
    assert!(layers.get_by_handle(Handle::new(0x99)).is_none());
}

#[test]
fn test_entity_layer_reference_resolves() {
    let document = sample_stream().build();
    let line = document.entity_by_handle(Handle::new(0x20)).unwrap();
    assert_eq!(line.layer(), "Walls");
    assert!(line.common.references.layer.resolved);
    assert_eq!(line.common.references.layer.handle, Some(Handle::new(0x11)));
    assert_eq!(line.space(), Space::Model);
}

#[test]
fn test_unnamed_table_record_skipped_siblings_kept() {
    let document = StreamBuilder::new()
        .tables(&[(
            "LAYER",
            &[
                (0, "LAYER"),
                (5, "10"),
                (2, "First"),
                (0, "LAYER"),
                (5, "11"),
                (70, "0"),
                (0, "LAYER"),
                (5, "12"),
                (2, "Third"),
            ],
        )])
        .build();

    let layers = &document.tables().layers;
    assert_eq!(layers.len(), 2);
    assert!(layers.contains("First"));
    assert!(layers.contains("Third"));
    assert!(!layers.contains_handle(Handle::new(0x11)));
    assert!(document
        .notifications()
        .of_type(NotificationType::Warning)
        .iter()
        .any(|n| n.message.contains("without a name")));
}

#[test]
fn test_forward_reference_to_material_resolves() {
    // OBJECTS comes after ENTITIES in the stream
    let document = StreamBuilder::new()
        .section(
            "ENTITIES",
            &[
                (0, "LINE"),
                (5, "30"),
                (100, "AcDbEntity"),
                (8, "0"),
                (347, "4A"),
                (100, "AcDbLine"),
                (10, "0"),
                (20, "0"),
                (11, "1"),
                (21, "1"),
            ],
        )
        .section(
            "OBJECTS",
            &[
                (0, "MATERIAL"),
                (5, "4A"),
                (100, "AcDbMaterial"),
                (1, "Brick"),
            ],
        )
        .build();

    assert_eq!(document.materials().len(), 1);
    let line = &document.entities()[0];
    assert_eq!(line.common.material, Some(Handle::new(0x4A)));
    let material = &line.common.references.material;
    assert!(material.resolved);
    assert_eq!(material.name.as_deref(), Some("Brick"));
}

#[test]
fn test_dangling_material_stays_unresolved() {
    let document = StreamBuilder::new()
        .section(
            "ENTITIES",
            &[(0, "POINT"), (8, "0"), (347, "BEEF"), (10, "1"), (20, "2")],
        )
        .build();
    let material = &document.entities()[0].common.references.material;
    assert!(!material.resolved);
    assert_eq!(material.handle, Some(Handle::new(0xBEEF)));
    assert!(material.name.is_none());
}

fn block_with_units(insunits: &str, block_units: &str) -> dxf_document::RenderingDocument {
    StreamBuilder::new()
        .header(&[("$INSUNITS", 70, insunits)])
        .tables(&[(
            "BLOCK_RECORD",
            &[
                (0, "BLOCK_RECORD"),
                (5, "1A"),
                (100, "AcDbSymbolTableRecord"),
                (100, "AcDbBlockTableRecord"),
                (2, "Bolt"),
                (70, block_units),
            ],
        )])
        .section(
            "BLOCKS",
            &[
                (0, "BLOCK"),
                (5, "1B"),
                (8, "0"),
                (2, "Bolt"),
                (70, "0"),
                (10, "0"),
                (20, "0"),
                (0, "CIRCLE"),
                (8, "0"),
                (10, "0"),
                (20, "0"),
                (40, "5"),
                (0, "ENDBLK"),
                (5, "1C"),
            ],
        )
        .section(
            "ENTITIES",
            &[
                (0, "INSERT"),
                (5, "40"),
                (8, "0"),
                (2, "Bolt"),
                (10, "100"),
                (20, "200"),
            ],
        )
        .build()
}

#[test]
fn test_millimetre_block_in_metre_drawing() {
    let document = block_with_units("6", "4");
    let metadata = &document.block_metadata()["Bolt"];
    let units = metadata.units.as_ref().unwrap();
    assert!((units.factor - 0.001).abs() < 1e-12);
    assert_eq!(units.severity, Severity::Warning);
    assert!(metadata.has_diagnostic(DiagnosticKind::UnitConversion));
    assert_eq!(metadata.instance_count(), 1);
    assert_eq!(metadata.block_record, Some(Handle::new(0x1A)));

    let block = document.block("BOLT").unwrap();
    assert_eq!(block.units, 4);
    assert!(block.terminated);
}

#[test]
fn test_unitless_block_without_defaults() {
    let document = block_with_units("0", "0");
    let units = document.block_metadata()["Bolt"].units.as_ref().unwrap();
    assert_eq!(units.factor, 1.0);
    assert_eq!(units.severity, Severity::Info);
    assert!(!units.used_fallback);
}

#[test]
fn test_scaled_insert_in_matching_units() {
    let document = StreamBuilder::new()
        .header(&[("$INSUNITS", 70, "4")])
        .tables(&[(
            "BLOCK_RECORD",
            &[
                (0, "BLOCK_RECORD"),
                (5, "1A"),
                (100, "AcDbSymbolTableRecord"),
                (100, "AcDbBlockTableRecord"),
                (2, "Bolt"),
                (70, "4"),
            ],
        )])
        .section(
            "BLOCKS",
            &[
                (0, "BLOCK"),
                (5, "1B"),
                (8, "0"),
                (2, "Bolt"),
                (70, "0"),
                (10, "0"),
                (20, "0"),
                (0, "ENDBLK"),
                (5, "1C"),
            ],
        )
        .section(
            "ENTITIES",
            &[
                (0, "INSERT"),
                (5, "30"),
                (8, "0"),
                (2, "Bolt"),
                (10, "0"),
                (20, "0"),
                (41, "1000"),
                (42, "1000"),
                (43, "1000"),
            ],
        )
        .build();

    let metadata = &document.block_metadata()["Bolt"];
    // same units on both sides, so only the instance is flagged
    assert_eq!(metadata.units.as_ref().unwrap().severity, Severity::Info);
    let diagnostic = metadata
        .diagnostics
        .iter()
        .find(|d| d.kind == DiagnosticKind::UnitConversion)
        .expect("unit diagnostic for the scaled insert");
    assert_eq!(diagnostic.instance_id.as_deref(), Some("30"));
    assert_eq!(diagnostic.severity, Severity::Warning);

    let units = metadata.instances[0].units.as_ref().unwrap();
    assert_eq!(units.factor, 1.0);
    assert_eq!(units.geometry_scale, Some(1000.0));
    assert_eq!(units.severity, Severity::Warning);
}

#[test]
fn test_hatch_polyline_loop() {
    let document = StreamBuilder::new()
        .section(
            "ENTITIES",
            &[
                (0, "HATCH"),
                (5, "50"),
                (100, "AcDbEntity"),
                (8, "0"),
                (100, "AcDbHatch"),
                (10, "0"),
                (20, "0"),
                (30, "0"),
                (210, "0"),
                (220, "0"),
                (230, "1"),
                (2, "SOLID"),
                (70, "1"),
                (71, "0"),
                (91, "1"),
                (92, "2"),
                (72, "0"),
                (73, "1"),
                (93, "4"),
                (10, "0"),
                (20, "0"),
                (10, "4"),
                (20, "0"),
                (10, "4"),
                (20, "3"),
                (10, "0"),
                (20, "3"),
                (97, "0"),
                (75, "0"),
                (76, "1"),
                (98, "0"),
            ],
        )
        .build();

    let hatch = document.entities()[0].as_hatch().unwrap();
    assert!(hatch.solid);
    assert_eq!(hatch.pattern_name, "SOLID");
    assert_eq!(hatch.loops.len(), 1);
    let boundary = &hatch.loops[0];
    assert!(boundary.is_polyline());
    assert_eq!(boundary.vertex_count(), 4);
    assert!(boundary.edges.is_empty());
    assert_eq!(hatch.edge_count(), 0);
    assert!(boundary.polyline.as_ref().unwrap().closed);
}

#[test]
fn test_polyline_vertices_inside_block() {
    let document = StreamBuilder::new()
        .section(
            "BLOCKS",
            &[
                (0, "BLOCK"),
                (8, "0"),
                (2, "Outline"),
                (70, "0"),
                (10, "0"),
                (20, "0"),
                (0, "POLYLINE"),
                (8, "0"),
                (66, "1"),
                (70, "1"),
                (0, "VERTEX"),
                (8, "0"),
                (10, "0"),
                (20, "0"),
                (0, "VERTEX"),
                (8, "0"),
                (10, "1"),
                (20, "0"),
                (0, "VERTEX"),
                (8, "0"),
                (10, "1"),
                (20, "1"),
                (0, "SEQEND"),
                (8, "0"),
                (0, "ENDBLK"),
            ],
        )
        .build();

    let block = document.block("Outline").unwrap();
    assert_eq!(block.entities.len(), 1);
    let entity = &block.entities[0];
    assert_eq!(entity.space(), Space::Block);
    let polyline = entity.as_polyline().unwrap();
    assert_eq!(polyline.vertex_count(), 3);
    assert_eq!(polyline.kind, PolylineKind::Polyline2D);
    assert!(polyline.terminated);
    assert!(polyline.is_closed());
    assert!(document.notifications().is_empty());
}

#[test]
fn test_unmatched_closers_are_dropped() {
    let document = StreamBuilder::new()
        .section(
            "ENTITIES",
            &[
                (0, "SEQEND"),
                (0, "VERTEX"),
                (10, "1"),
                (20, "1"),
                (0, "POINT"),
                (8, "0"),
                (10, "1"),
                (20, "2"),
            ],
        )
        .build();
    assert_eq!(document.entities().len(), 1);
    assert_eq!(
        document
            .notifications()
            .of_type(NotificationType::StructureMismatch)
            .len(),
        2
    );
}

#[test]
fn test_dictionary_cycle_yields_no_clip_filters() {
    let document = StreamBuilder::new()
        .section(
            "ENTITIES",
            &[
                (0, "INSERT"),
                (5, "60"),
                (102, "{ACAD_XDICTIONARY"),
                (360, "A1"),
                (102, "}"),
                (100, "AcDbEntity"),
                (8, "0"),
                (100, "AcDbBlockReference"),
                (2, "Missing"),
                (10, "0"),
                (20, "0"),
            ],
        )
        .section(
            "OBJECTS",
            &[
                (0, "DICTIONARY"),
                (5, "A1"),
                (100, "AcDbDictionary"),
                (3, "ACAD_FILTER"),
                (360, "B1"),
                (0, "DICTIONARY"),
                (5, "B1"),
                (100, "AcDbDictionary"),
                (3, "LOOP"),
                (360, "A1"),
            ],
        )
        .build();

    let insert = document.entities()[0].as_insert().unwrap();
    assert!(insert.clip_filters.is_empty());
    assert!(!insert.is_clipped());
    assert!(!insert.block.resolved);
    assert!(document.block_metadata()["Missing"].has_diagnostic(DiagnosticKind::MissingDefinition));
}

#[test]
fn test_insert_clip_filter_through_dictionary() {
    let document = StreamBuilder::new()
        .section(
            "ENTITIES",
            &[
                (0, "INSERT"),
                (5, "61"),
                (102, "{ACAD_XDICTIONARY"),
                (360, "A1"),
                (102, "}"),
                (100, "AcDbEntity"),
                (8, "0"),
                (100, "AcDbBlockReference"),
                (2, "Part"),
                (10, "0"),
                (20, "0"),
            ],
        )
        .section(
            "OBJECTS",
            &[
                (0, "DICTIONARY"),
                (5, "A1"),
                (100, "AcDbDictionary"),
                (3, "ACAD_FILTER"),
                (360, "B1"),
                (0, "DICTIONARY"),
                (5, "B1"),
                (100, "AcDbDictionary"),
                (3, "SPATIAL"),
                (360, "C1"),
                (0, "SPATIAL_FILTER"),
                (5, "C1"),
                (100, "AcDbFilter"),
                (100, "AcDbSpatialFilter"),
                (70, "2"),
                (10, "0"),
                (20, "0"),
                (10, "5"),
                (20, "5"),
                (210, "0"),
                (220, "0"),
                (230, "1"),
                (11, "0"),
                (21, "0"),
                (31, "0"),
                (71, "1"),
                (72, "0"),
                (73, "0"),
            ],
        )
        .build();

    let insert = document.entities()[0].as_insert().unwrap();
    assert_eq!(insert.clip_filters.len(), 1);
    let filter = &insert.clip_filters[0];
    assert_eq!(filter.handle, Some(Handle::new(0xC1)));
    assert_eq!(filter.boundary.len(), 2);
    assert!(filter.display_boundary);
}

#[test]
fn test_dimension_cascade_through_header_default() {
    let document = StreamBuilder::new()
        .header(&[("$DIMSTYLE", 2, "Arch")])
        .tables(&[(
            "DIMSTYLE",
            &[
                (0, "DIMSTYLE"),
                (105, "27"),
                (100, "AcDbSymbolTableRecord"),
                (100, "AcDbDimStyleTableRecord"),
                (2, "Standard"),
                (70, "0"),
                (0, "DIMSTYLE"),
                (105, "28"),
                (100, "AcDbSymbolTableRecord"),
                (100, "AcDbDimStyleTableRecord"),
                (2, "Arch"),
                (70, "0"),
                (40, "48"),
                (41, "0.125"),
            ],
        )])
        .section(
            "ENTITIES",
            &[
                (0, "DIMENSION"),
                (5, "70"),
                (100, "AcDbEntity"),
                (8, "0"),
                (100, "AcDbDimension"),
                (2, "*D1"),
                (3, "NoSuchStyle"),
                (10, "10"),
                (20, "0"),
                (11, "5"),
                (21, "1"),
                (70, "33"),
            ],
        )
        .build();

    let dimension = document.entities()[0].as_dimension().unwrap();
    let style = &dimension.style;
    assert_eq!(style.source.name.as_deref(), Some("Arch"));
    assert_eq!(style.source.handle, Some(Handle::new(0x28)));
    assert_eq!(style.overall_scale, 48.0);
    let arrow = style.scaled_parameters.as_ref().unwrap().arrow_size.unwrap();
    assert!((arrow - 6.0).abs() < 1e-9);
}

#[test]
fn test_top_level_paper_space_flag() {
    let document = StreamBuilder::new()
        .section(
            "ENTITIES",
            &[
                (0, "POINT"),
                (100, "AcDbEntity"),
                (67, "1"),
                (8, "0"),
                (10, "0"),
                (20, "0"),
                (0, "POINT"),
                (100, "AcDbEntity"),
                (8, "0"),
                (10, "0"),
                (20, "0"),
            ],
        )
        .build();
    assert_eq!(document.paper_space().count(), 1);
    assert_eq!(document.model_space().count(), 1);
}

#[test]
fn test_unknown_entity_kept_raw() {
    let document = StreamBuilder::new()
        .section(
            "ENTITIES",
            &[
                (0, "ACME_WIDGET"),
                (8, "0"),
                (1, "opaque"),
                (0, "ACME_WIDGET"),
                (8, "0"),
            ],
        )
        .build();
    assert_eq!(document.raw_entity_count(), 2);
    assert_eq!(
        document
            .notifications()
            .of_type(NotificationType::NotImplemented)
            .len(),
        1
    );
}

#[test]
fn test_build_all_keeps_stream_order() {
    let streams: Vec<_> = (1..=4)
        .map(|n| {
            let body: Vec<(i32, &str)> = std::iter::repeat([(0, "POINT"), (8, "0")])
                .take(n)
                .flatten()
                .collect();
            StreamBuilder::new().section("ENTITIES", &body).finish()
        })
        .collect();

    let documents = build_all(streams, &BuilderConfiguration::default()).unwrap();
    let counts: Vec<usize> = documents.iter().map(|d| d.entities().len()).collect();
    assert_eq!(counts, vec![1, 2, 3, 4]);
    // every build numbers its own entities from one
    for document in &documents {
        assert_eq!(document.entities()[0].id, "entity-1");
    }
}

#[test]
fn test_invalid_configuration_rejected() {
    let config = BuilderConfiguration {
        unit_scale_tolerance: f64::NAN,
        ..Default::default()
    };
    assert!(matches!(
        build_all(vec![tags(&[(0, "EOF")])], &config),
        Err(DxfError::InvalidConfiguration(_))
    ));
    assert!(DocumentBuilder::new(Vec::new())
        .with_configuration(config)
        .is_err());
}
