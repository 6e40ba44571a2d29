//! Dimensions and their effective style

use tracing::trace;

use crate::builder::{resolve_record, resolved_reference, ResolutionContext};
use crate::document::ResolvedRef;
use crate::entities::{Dimension, DimensionKind, ResolvedDimensionStyle};
use crate::io::CodeLookup;
use crate::tables::{DimStyle, SymbolTables, TableEntry};
use crate::types::Handle;
use crate::xdata::ExtendedData;

const STANDARD_STYLE: &str = "Standard";
const ASSOCIATION_CODES: [i32; 6] = [331, 332, 361, 362, 363, 364];

pub(super) fn decode(
    ctx: &ResolutionContext<'_>,
    dxf_name: &str,
    lookup: &CodeLookup<'_>,
    xdata: &ExtendedData,
) -> Dimension {
    let type_flags = lookup.i16_or(70, 0);
    let kind = match dxf_name {
        "ARC_DIMENSION" => DimensionKind::Arc,
        "LARGE_RADIAL_DIMENSION" => DimensionKind::LargeRadial,
        _ => DimensionKind::from_type(type_flags),
    };

    let style_name = lookup.string(3);
    let style = effective_style(ctx, style_name.as_deref(), xdata);

    let mut associated: Vec<Handle> = Vec::new();
    for handle in lookup.handles(&ASSOCIATION_CODES) {
        if !associated.contains(&handle) {
            associated.push(handle);
        }
    }

    Dimension {
        kind,
        type_flags,
        block_name: lookup.string(2),
        style_name,
        definition_point: lookup.point3(10).unwrap_or_default(),
        text_midpoint: lookup.point3(11).unwrap_or_default(),
        insertion: lookup.point3(12),
        point13: lookup.point3(13),
        point14: lookup.point3(14),
        point15: lookup.point3(15),
        point16: lookup.point3(16),
        leader_length: lookup.f64(40),
        rotation: lookup.f64_or(50, 0.0),
        oblique_angle: lookup.f64_or(52, 0.0),
        text_rotation: lookup.f64_or(53, 0.0),
        measurement: lookup.f64(42),
        text_override: lookup.first(1).map(|t| t.text().into_owned()),
        attachment: lookup.i16_or(71, 5),
        style,
        associated,
    }
}

/// Walk entity style, header `$DIMSTYLE`, then `Standard`; the first one
/// found in the table wins
fn cascade<'t>(
    ctx: &ResolutionContext<'t>,
    entity_style: Option<&str>,
) -> (ResolvedRef, Option<&'t DimStyle>) {
    let tables: &'t SymbolTables = ctx.tables;
    let table = &tables.dim_styles;
    let header = &ctx.properties.entity_defaults.dim_style;
    let candidates = [
        (entity_style, None),
        (header.name.as_deref(), header.handle),
        (Some(STANDARD_STYLE), None),
    ];
    for (name, handle) in candidates {
        if let Some(record) = resolve_record(table, name, handle) {
            return (resolved_reference(table, Some(record.name()), None), Some(record));
        }
    }
    let fallback = entity_style
        .filter(|n| !n.trim().is_empty())
        .or(header.name.as_deref())
        .unwrap_or(STANDARD_STYLE);
    trace!(style = fallback, "dimension style not found");
    (ResolvedRef::named(fallback), None)
}

fn effective_style(
    ctx: &ResolutionContext<'_>,
    entity_style: Option<&str>,
    xdata: &ExtendedData,
) -> ResolvedDimensionStyle {
    let (source, record) = cascade(ctx, entity_style);
    let mut style = record.cloned().unwrap_or_default();

    let overrides = xdata.dimension_style_overrides();
    for (code, value) in &overrides {
        if !style.apply_code(*code, value) {
            trace!(code, "dimension override ignored");
        }
    }

    let overall_scale = style.overall_scale();
    let scaled_parameters = style.parameters.as_ref().map(|p| p.scaled(overall_scale));
    let toggles = style.toggles.clone().unwrap_or_default();
    let refs = style.references.clone().unwrap_or_default();

    let tables = ctx.tables;
    let block = |h: Option<Handle>| resolved_reference(&tables.block_records, None, h);
    let linetype = |h: Option<Handle>| resolved_reference(&tables.linetypes, None, h);

    let text_style = match refs.text_style {
        Some(handle) => resolved_reference(&tables.text_styles, None, Some(handle)),
        None => {
            let header = &ctx.properties.entity_defaults.dim_text_style;
            resolved_reference(&tables.text_styles, header.name.as_deref(), header.handle)
        }
    };

    ResolvedDimensionStyle {
        source,
        overall_scale,
        scaled_parameters,
        overrides,
        suppress_ext_line1: toggles.suppress_ext_line1.unwrap_or(false),
        suppress_ext_line2: toggles.suppress_ext_line2.unwrap_or(false),
        suppress_dim_line1: toggles.suppress_dim_line1.unwrap_or(false),
        suppress_dim_line2: toggles.suppress_dim_line2.unwrap_or(false),
        arrow_block: block(refs.arrow_block),
        arrow_block1: block(refs.arrow_block1),
        arrow_block2: block(refs.arrow_block2),
        leader_arrow: block(refs.leader_arrow),
        dim_linetype: linetype(refs.dim_linetype),
        ext_line1_linetype: linetype(refs.ext_line1_linetype),
        ext_line2_linetype: linetype(refs.ext_line2_linetype),
        text_style,
        style,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BuilderConfiguration;
    use crate::document::DrawingProperties;
    use crate::io::{Tag, TagValue};
    use crate::objects::{AuxiliaryObjects, Catalog, PlotInfrastructure};
    use crate::tables::{BlockRecord, DimParameters};

    fn tags(pairs: &[(i32, &str)]) -> Vec<Tag> {
        pairs.iter().map(|(c, v)| Tag::from_raw(*c, v, 0)).collect()
    }

    fn dim_style(name: &str, handle: u64, scale: f64) -> DimStyle {
        DimStyle {
            handle: Some(Handle::new(handle)),
            name: name.to_string(),
            parameters: Some(DimParameters {
                scale: Some(scale),
                arrow_size: Some(0.18),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn decode_with(
        tables: SymbolTables,
        properties: DrawingProperties,
        dxf_name: &str,
        record: &[(i32, &str)],
    ) -> Dimension {
        let t = tags(record);
        let xdata = ExtendedData::from_tags(&t);
        let objects = AuxiliaryObjects::default();
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
        decode(&ctx, dxf_name, &CodeLookup::new(&t), &xdata)
    }

    #[test]
    fn test_cascade_falls_back_to_header_then_standard() {
        let mut tables = SymbolTables::default();
        tables.dim_styles.insert(dim_style("Standard", 0x27, 1.0));
        tables.dim_styles.insert(dim_style("Arch", 0x28, 48.0));

        let mut properties = DrawingProperties::default();
        properties.entity_defaults.dim_style = ResolvedRef::named("Arch");

        let dim = decode_with(
            tables.clone(),
            properties,
            "DIMENSION",
            &[(3, "Missing"), (70, "33")],
        );
        assert_eq!(dim.style.source.name.as_deref(), Some("Arch"));
        assert_eq!(dim.style.overall_scale, 48.0);
        assert_eq!(dim.kind, DimensionKind::Aligned);

        let dim = decode_with(
            tables,
            DrawingProperties::default(),
            "DIMENSION",
            &[(3, "Missing")],
        );
        assert_eq!(dim.style.source.name.as_deref(), Some("Standard"));
        assert!(dim.style.source.resolved);
    }

    #[test]
    fn test_xdata_overrides_and_scaling() {
        let mut tables = SymbolTables::default();
        tables.dim_styles.insert(dim_style("Standard", 0x27, 1.0));
        let dim = decode_with(
            tables,
            DrawingProperties::default(),
            "DIMENSION",
            &[
                (3, "Standard"),
                (1001, "ACAD"),
                (1000, "DSTYLE"),
                (1002, "{"),
                (1070, "40"),
                (1040, "10"),
                (1070, "75"),
                (1070, "1"),
                (1002, "}"),
            ],
        );
        assert_eq!(dim.style.overrides.len(), 2);
        assert_eq!(dim.style.overrides[0], (40, TagValue::Num(10.0)));
        assert_eq!(dim.style.overall_scale, 10.0);
        assert!(dim.style.suppress_ext_line1);
        assert!(!dim.style.suppress_ext_line2);
        let scaled = dim.style.scaled_parameters.unwrap();
        assert!((scaled.arrow_size.unwrap() - 1.8).abs() < 1e-9);
    }

    #[test]
    fn test_arrow_block_and_associations() {
        let mut tables = SymbolTables::default();
        let mut standard = dim_style("Standard", 0x27, 1.0);
        standard.apply_code(342, &TagValue::Str("3A".into()));
        tables.dim_styles.insert(standard);
        tables.block_records.insert(BlockRecord {
            handle: Some(Handle::new(0x3A)),
            name: "_ArchTick".to_string(),
            ..Default::default()
        });
        let dim = decode_with(
            tables,
            DrawingProperties::default(),
            "ARC_DIMENSION",
            &[(331, "A1"), (332, "A2"), (331, "A1"), (42, "12.5"), (1, "<> TYP")],
        );
        assert_eq!(dim.kind, DimensionKind::Arc);
        assert!(dim.style.arrow_block.resolved);
        assert_eq!(dim.style.arrow_block.name.as_deref(), Some("_ArchTick"));
        assert_eq!(dim.associated, vec![Handle::new(0xA1), Handle::new(0xA2)]);
        assert_eq!(dim.measurement, Some(12.5));
        assert_eq!(dim.display_text("12.50"), "12.50 TYP");
    }
}
