//! Block usage metadata, derived from the decoded entities
//!
//! Walks top-level entities and every block's entities, nested inserts
//! included, and groups the INSERTs by the block they name. Nothing decoded
//! is changed; the result is a separate map keyed by block name.

use std::hash::{Hash, Hasher};

use ahash::{AHashMap, AHashSet, AHasher};
use indexmap::IndexMap;
use tracing::trace;

use super::{create_unit_diagnostics, ResolutionContext};
use crate::document::{
    AttributeDefinitionSummary, BlockDiagnostic, BlockInstance, BlockMetadata, DiagnosticKind,
    Severity,
};
use crate::entities::{BlockDefinition, Entity, Geometry, Insert};
use crate::types::Handle;

/// Folds every INSERT into its block's metadata
struct Aggregator<'a, 'c> {
    ctx: &'a ResolutionContext<'c>,
    blocks: &'a IndexMap<String, BlockDefinition>,
    metadata: IndexMap<String, BlockMetadata>,
    /// Upper-case block name → key in `metadata`
    keys: AHashMap<String, String>,
    /// Fingerprints of instances seen so far
    seen: AHashSet<u64>,
}

pub(crate) fn aggregate(
    ctx: &ResolutionContext<'_>,
    entities: &[Entity],
    blocks: &IndexMap<String, BlockDefinition>,
) -> IndexMap<String, BlockMetadata> {
    let mut aggregator = Aggregator {
        ctx,
        blocks,
        metadata: IndexMap::new(),
        keys: AHashMap::new(),
        seen: AHashSet::new(),
    };

    for block in blocks.values().filter(|b| !b.is_layout()) {
        aggregator.define(block);
    }

    aggregator.walk(entities, None);
    for block in blocks.values() {
        let parent = (!block.is_layout()).then_some(block.name.as_str());
        aggregator.walk(&block.entities, parent);
    }
    aggregator.metadata
}

impl Aggregator<'_, '_> {
    fn define(&mut self, block: &BlockDefinition) {
        let ctx = self.ctx;
        let mut meta = BlockMetadata::new(block.name.clone());
        meta.block_id = Some(block.id.clone());
        meta.block_record = block.block_record;

        meta.attribute_definitions = block
            .entities
            .iter()
            .filter_map(|e| match &e.geometry {
                Geometry::AttributeDefinition(attdef) => Some(AttributeDefinitionSummary {
                    tag: attdef.tag.clone(),
                    prompt: attdef.prompt.clone(),
                    default_value: attdef.value().to_string(),
                    flags: attdef.flags,
                }),
                _ => None,
            })
            .collect();

        let units = create_unit_diagnostics(
            &ctx.properties.units,
            block.units,
            None,
            ctx.config.unit_scale_tolerance,
        );
        if units.severity == Severity::Warning {
            meta.diagnostics.push(BlockDiagnostic {
                kind: DiagnosticKind::UnitConversion,
                severity: Severity::Warning,
                message: units.message.clone(),
                instance_id: None,
            });
        }
        meta.units = Some(units);

        self.keys.insert(block.name.to_uppercase(), block.name.clone());
        self.metadata.insert(block.name.clone(), meta);
    }

    fn walk(&mut self, entities: &[Entity], parent: Option<&str>) {
        for entity in entities {
            if let Some(insert) = entity.as_insert() {
                self.instance(entity, insert, parent);
            }
        }
    }

    fn instance(&mut self, entity: &Entity, insert: &Insert, parent: Option<&str>) {
        let ctx = self.ctx;
        let upper = insert.block_name.trim().to_uppercase();
        let definition = self
            .keys
            .get(&upper)
            .and_then(|key| self.blocks.get(key.as_str()));
        let overlay = definition.is_some_and(|b| b.is_overlay());
        let missing = definition.is_none();
        let block_units = definition
            .map(|b| b.units)
            .or(insert.block_units)
            .unwrap_or(0);

        let key = match self.keys.get(&upper) {
            Some(key) => key.clone(),
            None => {
                let key = insert.block_name.trim().to_string();
                self.keys.insert(upper, key.clone());
                self.metadata.insert(key.clone(), BlockMetadata::new(key.clone()));
                key
            }
        };

        // the instance scale is compared against the unit factor
        let units = create_unit_diagnostics(
            &ctx.properties.units,
            block_units,
            Some(effective_scale(insert, ctx.config.uniform_scale_tolerance)),
            ctx.config.unit_scale_tolerance,
        );

        let owner = entity.common.owner;
        let instance = BlockInstance {
            entity_id: entity.id.clone(),
            handle: entity.handle(),
            space: entity.space(),
            owner,
            layout: parent.is_none().then(|| layout_name(ctx, owner)).flatten(),
            parent_block: parent.map(str::to_string),
            insertion: insert.insertion,
            scale: insert.scale,
            rotation: insert.rotation,
            units: Some(units.clone()),
            line: entity.line,
        };

        let mut diagnostics = Vec::new();
        let warn = |kind, message: String| BlockDiagnostic {
            kind,
            severity: Severity::Warning,
            message,
            instance_id: Some(entity.id.clone()),
        };

        if missing {
            diagnostics.push(warn(
                DiagnosticKind::MissingDefinition,
                format!("INSERT {} names undefined block {}", entity.id, key),
            ));
        }
        if insert.uniform_scaling && !insert.is_uniformly_scaled(ctx.config.uniform_scale_tolerance) {
            let s = insert.scale;
            diagnostics.push(warn(
                DiagnosticKind::NonUniformScale,
                format!(
                    "INSERT {} scales {} by ({}, {}, {}) but the block requires uniform scaling",
                    entity.id, key, s.x, s.y, s.z
                ),
            ));
        }
        if units.severity == Severity::Warning {
            diagnostics.push(warn(DiagnosticKind::UnitConversion, units.message.clone()));
        }
        if let (true, Some(parent)) = (overlay, parent) {
            diagnostics.push(warn(
                DiagnosticKind::OverlayNesting,
                format!("overlay {key} is inserted inside block {parent}"),
            ));
        }
        if ctx.config.duplicate_instance_check && !self.seen.insert(fingerprint(owner, &key, insert)) {
            trace!(id = %entity.id, block = %key, "duplicate instance");
            diagnostics.push(warn(
                DiagnosticKind::DuplicateInstance,
                format!("INSERT {} repeats another instance of {}", entity.id, key),
            ));
        }

        let preview_limit = ctx.config.attribute_preview_limit;
        let Some(meta) = self.metadata.get_mut(&key) else {
            return;
        };
        meta.counts.add(instance.space);
        if let Some(layout) = &instance.layout {
            *meta.layouts.entry(layout.clone()).or_insert(0) += 1;
        }
        if let Some(owner) = owner {
            *meta.owners.entry(owner.to_hex()).or_insert(0) += 1;
        }
        for attribute in &insert.attributes {
            if let Geometry::Attribute(attrib) = &attribute.geometry {
                let values = meta.attribute_previews.entry(attrib.tag.clone()).or_default();
                if values.len() < preview_limit {
                    values.push(attrib.value().to_string());
                }
            }
        }
        meta.diagnostics.extend(diagnostics);
        meta.instances.push(instance);
    }
}

/// Layout of a top-level instance: the layout whose block record owns it
fn layout_name(ctx: &ResolutionContext<'_>, owner: Option<Handle>) -> Option<String> {
    let owner = owner?;
    let plot = ctx.plot;
    plot.layout_for_block(owner)
        .or_else(|| {
            let record = ctx.tables.block_records.get_by_handle(owner)?;
            plot.layouts.get(record.layout?)
        })
        .map(|layout| layout.name.clone())
}

/// Scale the instance applies to its block: X when uniform, else the largest axis
fn effective_scale(insert: &Insert, tolerance: f64) -> f64 {
    let s = insert.scale;
    if insert.is_uniformly_scaled(tolerance) {
        s.x.abs()
    } else {
        s.x.abs().max(s.y.abs()).max(s.z.abs())
    }
}

/// Owner, block, position, scale and rotation folded into one hash
fn fingerprint(owner: Option<Handle>, block: &str, insert: &Insert) -> u64 {
    let mut hasher = AHasher::default();
    owner.map(|h| h.value()).hash(&mut hasher);
    block.to_uppercase().hash(&mut hasher);
    for v in [
        insert.insertion.x,
        insert.insertion.y,
        insert.insertion.z,
        insert.scale.x,
        insert.scale.y,
        insert.scale.z,
        insert.rotation,
    ] {
        v.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BuilderConfiguration;
    use crate::document::DrawingProperties;
    use crate::entities::{Attribute, BlockFlags, EntityCommon, Space, Text};
    use crate::objects::{AuxiliaryObjects, Catalog, Layout, PlotInfrastructure};
    use crate::tables::SymbolTables;
    use crate::types::Vector3;

    struct Fixture {
        tables: SymbolTables,
        properties: DrawingProperties,
        objects: AuxiliaryObjects,
        plot: PlotInfrastructure,
        materials: Catalog<crate::objects::Material>,
        config: BuilderConfiguration,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                tables: SymbolTables::default(),
                properties: DrawingProperties::default(),
                objects: AuxiliaryObjects::default(),
                plot: PlotInfrastructure::default(),
                materials: Catalog::new(),
                config: BuilderConfiguration::default(),
            }
        }

        fn run(
            &self,
            entities: &[Entity],
            blocks: &IndexMap<String, BlockDefinition>,
        ) -> IndexMap<String, BlockMetadata> {
            let ctx = ResolutionContext {
                tables: &self.tables,
                properties: &self.properties,
                objects: &self.objects,
                plot: &self.plot,
                materials: &self.materials,
                config: &self.config,
            };
            aggregate(&ctx, entities, blocks)
        }
    }

    fn insert_entity(id: &str, block: &str, owner: u64, x: f64, space: Space) -> Entity {
        Entity {
            id: id.to_string(),
            dxf_name: "INSERT".to_string(),
            line: 1,
            common: EntityCommon {
                owner: Some(Handle::new(owner)),
                space,
                ..Default::default()
            },
            geometry: Geometry::Insert(Box::new(Insert {
                block_name: block.to_string(),
                insertion: Vector3::new(x, 0.0, 0.0),
                ..Default::default()
            })),
        }
    }

    fn block(name: &str, flags: BlockFlags, entities: Vec<Entity>) -> BlockDefinition {
        BlockDefinition {
            id: format!("id-{name}"),
            name: name.to_string(),
            flags,
            entities,
            terminated: true,
            ..Default::default()
        }
    }

    fn attribute(dxf_name: &str, tag: &str, value: &str) -> Entity {
        let attribute = Attribute {
            text: Text {
                value: value.to_string(),
                ..Default::default()
            },
            tag: tag.to_string(),
            ..Default::default()
        };
        Entity {
            id: format!("{dxf_name}-{tag}"),
            dxf_name: dxf_name.to_string(),
            line: 1,
            common: EntityCommon::default(),
            geometry: if dxf_name == "ATTDEF" {
                Geometry::AttributeDefinition(attribute)
            } else {
                Geometry::Attribute(attribute)
            },
        }
    }

    fn blocks(list: Vec<BlockDefinition>) -> IndexMap<String, BlockDefinition> {
        list.into_iter().map(|b| (b.name.clone(), b)).collect()
    }

    #[test]
    fn test_counts_layouts_and_owners() {
        let mut fixture = Fixture::new();
        fixture.plot.layouts.insert(Layout {
            handle: Some(Handle::new(0x22)),
            name: "Model".to_string(),
            block_record: Some(Handle::new(0x1F)),
            ..Default::default()
        });
        let defs = blocks(vec![block(
            "Door",
            BlockFlags::empty(),
            vec![attribute("ATTDEF", "NUMBER", "000")],
        )]);
        let entities = vec![
            insert_entity("A", "door", 0x1F, 0.0, Space::Model),
            insert_entity("B", "Door", 0x1F, 5.0, Space::Model),
            insert_entity("C", "Door", 0x3C, 0.0, Space::Paper),
        ];

        let meta = fixture.run(&entities, &defs);
        let door = &meta["Door"];
        assert_eq!(door.instance_count(), 3);
        assert_eq!(door.counts.model, 2);
        assert_eq!(door.counts.paper, 1);
        assert_eq!(door.layouts.get("Model"), Some(&2));
        assert_eq!(door.owners.get("1F"), Some(&2));
        assert_eq!(door.owners.get("3C"), Some(&1));
        assert_eq!(door.attribute_definitions[0].tag, "NUMBER");
        assert_eq!(door.attribute_definitions[0].default_value, "000");
        assert!(door.diagnostics.is_empty());
        assert_eq!(door.units.as_ref().map(|u| u.factor), Some(1.0));
    }

    #[test]
    fn test_attribute_previews_are_capped() {
        let mut fixture = Fixture::new();
        fixture.config.attribute_preview_limit = 2;
        let defs = blocks(vec![block("Tag", BlockFlags::empty(), Vec::new())]);
        let entities: Vec<Entity> = (0..3)
            .map(|i| {
                let mut e = insert_entity(&format!("I{i}"), "Tag", 0x1F, i as f64, Space::Model);
                if let Geometry::Insert(insert) = &mut e.geometry {
                    insert.attributes.push(attribute("ATTRIB", "ROOM", &format!("R{i}")));
                }
                e
            })
            .collect();
        let meta = fixture.run(&entities, &defs);
        assert_eq!(meta["Tag"].attribute_previews["ROOM"], vec!["R0", "R1"]);
    }

    #[test]
    fn test_diagnostics() {
        let fixture = Fixture::new();
        let mut scaled = insert_entity("S", "Bolt", 0x1F, 0.0, Space::Model);
        if let Geometry::Insert(insert) = &mut scaled.geometry {
            insert.uniform_scaling = true;
            insert.scale = Vector3::new(1.0, 2.0, 1.0);
        }
        let nested_overlay = insert_entity("N", "Site", 0x50, 0.0, Space::Block);
        let defs = blocks(vec![
            block("Bolt", BlockFlags::empty(), Vec::new()),
            block("Site", BlockFlags::XREF | BlockFlags::XREF_OVERLAY, Vec::new()),
            block("Frame", BlockFlags::empty(), vec![nested_overlay]),
        ]);
        let entities = vec![
            scaled,
            insert_entity("D1", "Bolt", 0x1F, 9.0, Space::Model),
            insert_entity("D2", "Bolt", 0x1F, 9.0, Space::Model),
            insert_entity("M", "Ghost", 0x1F, 0.0, Space::Model),
        ];

        let meta = fixture.run(&entities, &defs);
        let bolt = &meta["Bolt"];
        assert!(bolt.has_diagnostic(DiagnosticKind::NonUniformScale));
        assert!(bolt.has_diagnostic(DiagnosticKind::DuplicateInstance));
        assert_eq!(bolt.severity(), Severity::Warning);

        let site = &meta["Site"];
        assert!(site.has_diagnostic(DiagnosticKind::OverlayNesting));
        assert_eq!(site.instances[0].parent_block.as_deref(), Some("Frame"));
        assert_eq!(site.counts.block, 1);

        let ghost = &meta["Ghost"];
        assert!(ghost.block_id.is_none());
        assert!(ghost.has_diagnostic(DiagnosticKind::MissingDefinition));
    }

    #[test]
    fn test_duplicate_check_can_be_disabled() {
        let mut fixture = Fixture::new();
        fixture.config.duplicate_instance_check = false;
        let defs = blocks(vec![block("Bolt", BlockFlags::empty(), Vec::new())]);
        let entities = vec![
            insert_entity("D1", "Bolt", 0x1F, 9.0, Space::Model),
            insert_entity("D2", "Bolt", 0x1F, 9.0, Space::Model),
        ];
        let meta = fixture.run(&entities, &defs);
        assert!(meta["Bolt"].diagnostics.is_empty());
    }

    #[test]
    fn test_unit_conversion_warning() {
        let mut fixture = Fixture::new();
        fixture.properties.units.insertion_units = 6;
        let mut def = block("Detail", BlockFlags::empty(), Vec::new());
        def.units = 4;
        let meta = fixture.run(&[], &blocks(vec![def]));
        let detail = &meta["Detail"];
        let units = detail.units.as_ref().expect("units");
        assert!((units.factor - 0.001).abs() < 1e-12);
        assert!(detail.has_diagnostic(DiagnosticKind::UnitConversion));
    }

    #[test]
    fn test_instance_scale_checked_against_units() {
        let mut fixture = Fixture::new();
        fixture.properties.units.insertion_units = 4;
        let mut def = block("Bolt", BlockFlags::empty(), Vec::new());
        def.units = 4;
        let mut scaled = insert_entity("S", "Bolt", 0x1F, 0.0, Space::Model);
        if let Geometry::Insert(insert) = &mut scaled.geometry {
            insert.scale = Vector3::new(1000.0, 1000.0, 1000.0);
        }
        let entities = vec![scaled, insert_entity("P", "Bolt", 0x1F, 5.0, Space::Model)];

        let meta = fixture.run(&entities, &blocks(vec![def]));
        let bolt = &meta["Bolt"];
        assert_eq!(bolt.units.as_ref().map(|u| u.severity), Some(Severity::Info));

        let flagged: Vec<_> = bolt
            .diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::UnitConversion)
            .collect();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].instance_id.as_deref(), Some("S"));

        let scaled_units = bolt.instances[0].units.as_ref().unwrap();
        assert_eq!(scaled_units.geometry_scale, Some(1000.0));
        assert_eq!(scaled_units.severity, Severity::Warning);
        let plain_units = bolt.instances[1].units.as_ref().unwrap();
        assert_eq!(plain_units.severity, Severity::Info);
    }
}
