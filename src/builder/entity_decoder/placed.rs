//! Entities placed by reference: block inserts, viewports, images, underlays,
//! point clouds, OLE frames and lights

use super::body;
use crate::builder::{collect_spatial_filters, resolved_reference, ResolutionContext};
use crate::entities::{
    ClipBoundary, Insert, InsertArray, Light, Ole2Frame, PointCloud, RasterImage, Underlay,
    Viewport,
};
use crate::io::{collect_points, CodeLookup, Tag};
use crate::objects::UnderlayKind;
use crate::types::{Color, Handle, Vector2, Vector3};

fn scale(lookup: &CodeLookup<'_>) -> Vector3 {
    Vector3::new(
        lookup.f64_or(41, 1.0),
        lookup.f64_or(42, 1.0),
        lookup.f64_or(43, 1.0),
    )
}

fn points_2d(tags: &[Tag], x_code: i32) -> Vec<Vector2> {
    collect_points(tags, x_code).iter().map(Vector3::xy).collect()
}

/// INSERT / MINSERT.
///
/// Clip filters are reached through the extension dictionary; block flags
/// are filled in once every block definition is known.
pub(super) fn insert(
    ctx: &ResolutionContext<'_>,
    lookup: &CodeLookup<'_>,
    extension_dictionary: Option<Handle>,
) -> Insert {
    let block_name = lookup.string(2).unwrap_or_default();
    let record = ctx.tables.block_records.get(&block_name);

    let columns = lookup.i16_or(70, 1);
    let rows = lookup.i16_or(71, 1);
    let array = (columns > 1 || rows > 1).then(|| InsertArray {
        columns,
        rows,
        column_spacing: lookup.f64_or(44, 0.0),
        row_spacing: lookup.f64_or(45, 0.0),
    });

    let clip_filters = extension_dictionary
        .map(|xdict| {
            collect_spatial_filters(ctx.objects, xdict)
                .into_iter()
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    Insert {
        block: resolved_reference(&ctx.tables.block_records, Some(&block_name), None),
        block_name,
        insertion: lookup.point3(10).unwrap_or_default(),
        scale: scale(lookup),
        rotation: lookup.f64_or(50, 0.0),
        array,
        has_attributes: lookup.bool(66).unwrap_or(false),
        attributes: Vec::new(),
        clip_filters,
        block_units: record.map(|r| r.units),
        uniform_scaling: record.is_some_and(|r| r.requires_uniform_scaling()),
        block_flags: None,
    }
}

pub(super) fn viewport(lookup: &CodeLookup<'_>) -> Viewport {
    Viewport {
        center: lookup.point3(10).unwrap_or_default(),
        width: lookup.f64_or(40, 0.0),
        height: lookup.f64_or(41, 0.0),
        id: lookup.i16_or(69, 0),
        status: lookup.i16_or(68, 0),
        view_center: lookup.point2(12).unwrap_or_default(),
        view_direction: lookup.point3_or(16, Vector3::UNIT_Z),
        view_target: lookup.point3(17).unwrap_or_default(),
        view_height: lookup.f64_or(45, 0.0),
        twist_angle: lookup.f64_or(51, 0.0),
        flags: lookup.i32(90).unwrap_or(0),
        clip_boundary: lookup.handle(340),
        frozen_layers: lookup.handles(&[331]),
        visual_style: lookup.handle(348),
        background: lookup.handle(332),
        sun: lookup.handle(361),
    }
}

/// IMAGE and WIPEOUT; the file path comes from the referenced IMAGEDEF
pub(super) fn image(ctx: &ResolutionContext<'_>, tags: &[Tag], lookup: &CodeLookup<'_>) -> RasterImage {
    let definition = lookup.handle(340);
    let file_path = definition
        .and_then(|h| ctx.objects.image_definitions.get(h))
        .map(|d| d.file_path.clone())
        .filter(|p| !p.is_empty());

    let clip_vertices = points_2d(body(tags), 14);
    let clip = (lookup.has(71) || !clip_vertices.is_empty()).then(|| ClipBoundary {
        boundary_type: lookup.i16_or(71, 1),
        vertices: clip_vertices,
        inverted: lookup.bool(290).unwrap_or(false),
    });

    RasterImage {
        insertion: lookup.point3(10).unwrap_or_default(),
        u_vector: lookup.point3(11).unwrap_or_default(),
        v_vector: lookup.point3(12).unwrap_or_default(),
        size: lookup.point2(13).unwrap_or_default(),
        definition,
        file_path,
        reactor: lookup.handle(360),
        display_flags: lookup.i16_or(70, 0),
        clipping: lookup.bool(280).unwrap_or(false),
        brightness: lookup.i16_or(281, 50),
        contrast: lookup.i16_or(282, 50),
        fade: lookup.i16_or(283, 0),
        clip,
    }
}

/// PDF, DWF and DGN underlays
pub(super) fn underlay(
    ctx: &ResolutionContext<'_>,
    dxf_name: &str,
    tags: &[Tag],
    lookup: &CodeLookup<'_>,
) -> Underlay {
    let kind = UnderlayKind::from_type_name(dxf_name).unwrap_or_default();
    let definition = lookup.handle(340);
    let resolved = definition.and_then(|h| ctx.objects.underlay_definitions.get(h));

    Underlay {
        format: format!("{kind:?}").to_uppercase(),
        definition,
        file_path: resolved
            .map(|d| d.file_path.clone())
            .filter(|p| !p.is_empty()),
        item_name: resolved.and_then(|d| d.item_name.clone()),
        insertion: lookup.point3(10).unwrap_or_default(),
        scale: scale(lookup),
        rotation: lookup.f64_or(50, 0.0),
        normal: lookup.extrusion(),
        flags: lookup.i16_or(280, 0),
        contrast: lookup.i16_or(281, 100),
        fade: lookup.i16_or(282, 0),
        clip: points_2d(body(tags), 11),
    }
}

pub(super) fn point_cloud(ctx: &ResolutionContext<'_>, lookup: &CodeLookup<'_>) -> PointCloud {
    let definition = lookup.handle(340).or_else(|| lookup.handle(360));
    PointCloud {
        definition,
        source_file: definition
            .and_then(|h| ctx.objects.point_cloud_definitions.get(h))
            .and_then(|d| d.source_file.clone()),
        origin: lookup.point3(10).unwrap_or_default(),
        scale: scale(lookup),
        rotation: lookup.f64_or(50, 0.0),
        locked: lookup.bool(290).unwrap_or(false),
    }
}

pub(super) fn ole2frame(lookup: &CodeLookup<'_>) -> Ole2Frame {
    Ole2Frame {
        object_type: lookup.i16_or(71, 0),
        paper_space: lookup.bool(72).unwrap_or(false),
        upper_left: lookup.point3(10).unwrap_or_default(),
        lower_right: lookup.point3(11).unwrap_or_default(),
        data_length: lookup.i32(90).unwrap_or(0),
        chunk_count: lookup.count(310),
        application: lookup.string(3),
    }
}

pub(super) fn light(lookup: &CodeLookup<'_>) -> Light {
    Light {
        name: lookup.string(1).unwrap_or_default(),
        light_type: lookup.i16_or(70, 2),
        enabled: lookup.bool(290).unwrap_or(true),
        color: Color::resolve(lookup.i16(63), lookup.i64(421)),
        intensity: lookup.f64_or(40, 1.0),
        position: lookup.point3(10).unwrap_or_default(),
        target: lookup.point3(11).unwrap_or_default(),
        attenuation: lookup.i16_or(72, 0),
        hotspot_angle: lookup.f64_or(50, 0.0),
        falloff_angle: lookup.f64_or(51, 0.0),
        cast_shadows: lookup.bool(293).unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BuilderConfiguration;
    use crate::document::DrawingProperties;
    use crate::objects::{
        AuxiliaryObjects, Catalog, Dictionary, DictionaryEntry, ImageDefinition,
        PlotInfrastructure, SpatialFilter,
    };
    use crate::tables::{BlockRecord, BlockUnitsBehavior, SymbolTables};

    fn tags(pairs: &[(i32, &str)]) -> Vec<Tag> {
        pairs.iter().map(|(c, v)| Tag::from_raw(*c, v, 0)).collect()
    }

    fn with_context<R>(
        tables: SymbolTables,
        objects: AuxiliaryObjects,
        f: impl FnOnce(&ResolutionContext<'_>) -> R,
    ) -> R {
        let properties = DrawingProperties::default();
        let plot = PlotInfrastructure::default();
        let materials = Catalog::new();
        let config = BuilderConfiguration::default();
        let ctx = ResolutionContext {
            tables: &tables,
            properties: &properties,
            objects: &objects,
            plot: &plot,
            materials: &materials,
            config: &config,
        };
        f(&ctx)
    }

    #[test]
    fn test_insert_reads_block_record_and_clip() {
        let mut tables = SymbolTables::default();
        tables.block_records.insert(BlockRecord {
            handle: Some(Handle::new(0x1F)),
            name: "Door".to_string(),
            units: 4,
            explodable: true,
            scaling: BlockUnitsBehavior::Uniform,
            ..Default::default()
        });

        let mut objects = AuxiliaryObjects::default();
        objects.dictionaries.insert(Dictionary {
            handle: Some(Handle::new(0x90)),
            entries: vec![DictionaryEntry {
                name: "ACAD_FILTER".to_string(),
                handle: Handle::new(0x91),
            }],
            ..Default::default()
        });
        objects.dictionaries.insert(Dictionary {
            handle: Some(Handle::new(0x91)),
            entries: vec![DictionaryEntry {
                name: "SPATIAL".to_string(),
                handle: Handle::new(0x92),
            }],
            ..Default::default()
        });
        objects.spatial_filters.insert(SpatialFilter {
            handle: Some(Handle::new(0x92)),
            boundary: vec![Vector2::new(0.0, 0.0), Vector2::new(2.0, 2.0)],
            ..Default::default()
        });

        let t = tags(&[(2, "door"), (10, "5"), (20, "6"), (41, "2"), (70, "3")]);
        let insert = with_context(tables, objects, |ctx| {
            insert(ctx, &CodeLookup::new(&t), Some(Handle::new(0x90)))
        });

        assert!(insert.block.resolved);
        assert_eq!(insert.block.name.as_deref(), Some("Door"));
        assert_eq!(insert.block_units, Some(4));
        assert!(insert.uniform_scaling);
        assert_eq!(insert.scale, Vector3::new(2.0, 1.0, 1.0));
        assert_eq!(insert.array.map(|a| a.instance_count()), Some(3));
        assert_eq!(insert.clip_filters.len(), 1);
        assert!(insert.is_clipped());
    }

    #[test]
    fn test_image_resolves_definition_path() {
        let mut objects = AuxiliaryObjects::default();
        objects.image_definitions.insert(ImageDefinition {
            handle: Some(Handle::new(0xA0)),
            file_path: "C:/scans/site.png".to_string(),
            ..Default::default()
        });
        let t = tags(&[
            (10, "0"),
            (20, "0"),
            (13, "640"),
            (23, "480"),
            (340, "A0"),
            (71, "2"),
            (14, "-0.5"),
            (24, "-0.5"),
            (14, "100"),
            (24, "-0.5"),
            (14, "100"),
            (24, "80"),
        ]);
        let image = with_context(SymbolTables::default(), objects, |ctx| {
            image(ctx, &t, &CodeLookup::new(&t))
        });
        assert_eq!(image.file_path.as_deref(), Some("C:/scans/site.png"));
        assert_eq!(image.size, Vector2::new(640.0, 480.0));
        let clip = image.clip.unwrap();
        assert_eq!(clip.boundary_type, 2);
        assert_eq!(clip.vertices.len(), 3);
    }

    #[test]
    fn test_dangling_image_definition_keeps_handle() {
        let t = tags(&[(10, "0"), (20, "0"), (340, "BEEF")]);
        let image = with_context(SymbolTables::default(), AuxiliaryObjects::default(), |ctx| {
            image(ctx, &t, &CodeLookup::new(&t))
        });
        assert_eq!(image.definition, Some(Handle::new(0xBEEF)));
        assert!(image.file_path.is_none());
        assert!(image.clip.is_none());
    }

    #[test]
    fn test_underlay_format_from_name() {
        let t = tags(&[(340, "B1"), (10, "1"), (20, "1"), (11, "0"), (21, "0"), (11, "3"), (21, "4")]);
        let underlay = with_context(SymbolTables::default(), AuxiliaryObjects::default(), |ctx| {
            underlay(ctx, "DGNUNDERLAY", &t, &CodeLookup::new(&t))
        });
        assert_eq!(underlay.format, "DGN");
        assert_eq!(underlay.clip.len(), 2);
        assert_eq!(underlay.scale, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_ole2frame_counts_chunks() {
        let t = tags(&[(71, "2"), (90, "64"), (310, "AB"), (310, "CD"), (3, "Excel")]);
        let frame = ole2frame(&CodeLookup::new(&t));
        assert_eq!(frame.chunk_count, 2);
        assert_eq!(frame.data_length, 64);
        assert_eq!(frame.application.as_deref(), Some("Excel"));
    }
}
