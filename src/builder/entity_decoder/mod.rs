//! ENTITIES and BLOCKS records → [`Entity`] and [`BlockDefinition`]
//!
//! Each record is decoded on its own; the decoder only keeps the container
//! that is currently open (a POLYLINE collecting VERTEX records, an INSERT
//! collecting ATTRIB records, a BLOCK collecting entities) until its closer
//! arrives.

use ahash::{AHashMap, AHashSet};
use indexmap::IndexMap;
use tracing::{trace, warn};

use super::{resolve_record, resolved_reference, IdGenerator, ResolutionContext};
use crate::document::ResolvedRef;
use crate::entities::{
    BlockDefinition, BlockFlags, Entity, EntityCommon, EntityReferences, Geometry, RawEntity,
    Space,
};
use crate::io::{group_handles, owner_handle, subclass, CodeLookup, Record, Tag};
use crate::notification::{NotificationCollection, NotificationType};
use crate::types::{Color, Handle, LineWeight, Transparency};
use crate::xdata::ExtendedData;

mod curves;
mod dimension;
mod hatch;
mod placed;
mod text;

/// A container waiting for its children
#[derive(Debug)]
enum OpenContainer {
    /// POLYLINE collecting VERTEX records until SEQEND
    Polyline(Entity),
    /// INSERT with 66=1 collecting ATTRIB records until SEQEND
    Attributes(Entity),
}

impl OpenContainer {
    fn kind(&self) -> &'static str {
        match self {
            OpenContainer::Polyline(_) => "POLYLINE",
            OpenContainer::Attributes(_) => "INSERT",
        }
    }

    fn line(&self) -> u32 {
        match self {
            OpenContainer::Polyline(e) | OpenContainer::Attributes(e) => e.line,
        }
    }

    fn into_entity(self) -> Entity {
        match self {
            OpenContainer::Polyline(e) | OpenContainer::Attributes(e) => e,
        }
    }
}

/// Where a record sits, which decides its [`Space`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// ENTITIES section: paper when 67 is 1, model otherwise
    TopLevel,
    /// Inside a block definition
    InBlock(Space),
}

pub(crate) struct EntityDecoder<'a, 'c> {
    ctx: &'a ResolutionContext<'c>,
    ids: &'a mut IdGenerator,
    notifications: &'a mut NotificationCollection,
    reported_kinds: AHashSet<String>,
    /// BLOCK flags (70) by upper-case block name, read ahead of decoding
    block_flags: AHashMap<String, i16>,
}

impl<'a, 'c> EntityDecoder<'a, 'c> {
    pub(crate) fn new(
        ctx: &'a ResolutionContext<'c>,
        ids: &'a mut IdGenerator,
        notifications: &'a mut NotificationCollection,
    ) -> Self {
        Self {
            ctx,
            ids,
            notifications,
            reported_kinds: AHashSet::new(),
            block_flags: AHashMap::new(),
        }
    }

    /// Decode the BLOCKS section into definitions keyed by block name.
    ///
    /// A later definition with the same name replaces the earlier one.
    pub(crate) fn decode_blocks(
        &mut self,
        records: &[Record<'_>],
    ) -> IndexMap<String, BlockDefinition> {
        // inserts may name blocks defined further down
        for record in records.iter().filter(|r| r.kind == "BLOCK") {
            let lookup = CodeLookup::new(record.tags);
            if let Some(name) = lookup.string(2).or_else(|| lookup.string(3)) {
                self.block_flags
                    .insert(name.trim().to_uppercase(), lookup.i16_or(70, 0));
            }
        }

        let mut blocks: IndexMap<String, BlockDefinition> = IndexMap::new();
        let mut current: Option<BlockDefinition> = None;
        let mut open: Option<OpenContainer> = None;

        for record in records {
            match record.kind {
                "BLOCK" => {
                    if let Some(mut block) = current.take() {
                        self.flush(&mut open, &mut block.entities);
                        self.notifications.notify_at(
                            NotificationType::StructureMismatch,
                            block.line,
                            format!("BLOCK {} not closed by ENDBLK", block.name),
                        );
                        self.store_block(&mut blocks, block);
                    }
                    current = Some(self.block_header(record));
                }
                "ENDBLK" => match current.take() {
                    Some(mut block) => {
                        self.flush(&mut open, &mut block.entities);
                        block.terminated = true;
                        self.store_block(&mut blocks, block);
                    }
                    None => {
                        trace!(line = record.line, "ENDBLK without BLOCK dropped");
                        self.notifications.notify_at(
                            NotificationType::StructureMismatch,
                            record.line,
                            "ENDBLK without open BLOCK",
                        );
                    }
                },
                _ => match current.as_mut() {
                    Some(block) => {
                        let placement = Placement::InBlock(block_space(&block.name));
                        self.feed(&mut open, record, placement, &mut block.entities);
                    }
                    None => {
                        trace!(kind = record.kind, line = record.line, "record outside BLOCK dropped");
                        self.notifications.notify_at(
                            NotificationType::StructureMismatch,
                            record.line,
                            format!("{} outside any BLOCK", record.kind),
                        );
                    }
                },
            }
        }

        if let Some(mut block) = current {
            self.flush(&mut open, &mut block.entities);
            self.notifications.notify_at(
                NotificationType::StructureMismatch,
                block.line,
                format!("BLOCK {} not closed by ENDBLK", block.name),
            );
            self.store_block(&mut blocks, block);
        }
        blocks
    }

    /// Decode the ENTITIES section in stream order
    pub(crate) fn decode_entities(&mut self, records: &[Record<'_>]) -> Vec<Entity> {
        let mut entities = Vec::with_capacity(records.len());
        let mut open: Option<OpenContainer> = None;
        for record in records {
            self.feed(&mut open, record, Placement::TopLevel, &mut entities);
        }
        self.flush(&mut open, &mut entities);
        entities
    }

    fn store_block(&mut self, blocks: &mut IndexMap<String, BlockDefinition>, block: BlockDefinition) {
        let line = block.line;
        if let Some(previous) = blocks.insert(block.name.clone(), block) {
            warn!(name = %previous.name, line, "block defined twice");
            self.notifications.notify_at(
                NotificationType::Warning,
                line,
                format!("BLOCK {} defined again; the later definition wins", previous.name),
            );
        }
    }

    fn block_header(&mut self, record: &Record<'_>) -> BlockDefinition {
        let lookup = CodeLookup::new(record.tags);
        let name = lookup
            .string(2)
            .or_else(|| lookup.string(3))
            .map(|n| n.trim().to_string())
            .unwrap_or_default();
        let handle = lookup.handle(5);
        let block_record = self.ctx.tables.block_records.get(&name);

        BlockDefinition {
            id: self.ids.block_id(handle),
            handle,
            owner: owner_handle(record.tags),
            line: record.line,
            layer: lookup.string(8).unwrap_or_else(|| "0".to_string()),
            base_point: lookup.point3(10).unwrap_or_default(),
            flags: BlockFlags::from_bits_truncate(lookup.i16_or(70, 0)),
            description: lookup.string(4),
            xref_path: lookup.string(1),
            units: block_record.map_or(0, |r| r.units),
            block_record: block_record.and_then(|r| r.handle),
            entities: Vec::new(),
            terminated: false,
            name,
        }
    }

    /// Route one record through the open container, if any
    fn feed(
        &mut self,
        open: &mut Option<OpenContainer>,
        record: &Record<'_>,
        placement: Placement,
        out: &mut Vec<Entity>,
    ) {
        match record.kind {
            "VERTEX" => match open {
                Some(OpenContainer::Polyline(entity)) => {
                    if let Geometry::Polyline(polyline) = &mut entity.geometry {
                        curves::push_vertex(polyline, &CodeLookup::new(record.tags), record.line);
                    }
                }
                _ => self.orphan(record, "VERTEX outside POLYLINE"),
            },
            "SEQEND" => match open.take() {
                Some(mut container) => {
                    if let OpenContainer::Polyline(entity) = &mut container {
                        if let Geometry::Polyline(polyline) = &mut entity.geometry {
                            polyline.terminated = true;
                        }
                    }
                    out.push(container.into_entity());
                }
                None => self.orphan(record, "SEQEND without open POLYLINE or INSERT"),
            },
            "ATTRIB" if matches!(open, Some(OpenContainer::Attributes(_))) => {
                let attribute = self.decode_record(record, placement);
                if let Some(OpenContainer::Attributes(entity)) = open {
                    if let Geometry::Insert(insert) = &mut entity.geometry {
                        insert.attributes.push(attribute);
                    }
                }
            }
            _ => {
                self.flush(open, out);
                let entity = self.decode_record(record, placement);
                match &entity.geometry {
                    Geometry::Polyline(_) => *open = Some(OpenContainer::Polyline(entity)),
                    Geometry::Insert(insert) if insert.has_attributes => {
                        *open = Some(OpenContainer::Attributes(entity))
                    }
                    _ => out.push(entity),
                }
            }
        }
    }

    /// Close an open container that never saw its SEQEND
    fn flush(&mut self, open: &mut Option<OpenContainer>, out: &mut Vec<Entity>) {
        if let Some(container) = open.take() {
            self.notifications.notify_at(
                NotificationType::StructureMismatch,
                container.line(),
                format!("{} not closed by SEQEND", container.kind()),
            );
            out.push(container.into_entity());
        }
    }

    fn orphan(&mut self, record: &Record<'_>, message: &str) {
        trace!(kind = record.kind, line = record.line, "orphan record dropped");
        self.notifications
            .notify_at(NotificationType::StructureMismatch, record.line, message);
    }

    fn decode_record(&mut self, record: &Record<'_>, placement: Placement) -> Entity {
        self.decode(record.kind, record.tags, record.line, placement)
    }

    /// Decode one entity record
    fn decode(&mut self, dxf_name: &str, tags: &[Tag], line: u32, placement: Placement) -> Entity {
        let lookup = CodeLookup::new(tags);
        let common = self.common(tags, &lookup, placement);
        let geometry = self.geometry(dxf_name, tags, &lookup, &common);
        Entity {
            id: self.ids.entity_id(common.handle),
            dxf_name: dxf_name.to_string(),
            line,
            common,
            geometry,
        }
    }

    /// AcDbEntity metadata; R12 records without subclass markers use the
    /// whole record
    fn common(&self, tags: &[Tag], lookup: &CodeLookup<'_>, placement: Placement) -> EntityCommon {
        let region = CodeLookup::new(subclass(tags, "AcDbEntity").unwrap_or(tags));
        let xdata = ExtendedData::from_tags(tags);

        let layer = region
            .string(8)
            .map(|l| l.trim().to_string())
            .unwrap_or_else(|| "0".to_string());
        let linetype = region.string(6).map(|l| l.trim().to_string());
        let space = match placement {
            Placement::TopLevel if region.i16(67) == Some(1) => Space::Paper,
            Placement::TopLevel => Space::Model,
            Placement::InBlock(space) => space,
        };
        let material = region.handle(347);
        let plot_style = region.handle(390);
        let visual_style = region.handle(348);

        let tables = self.ctx.tables;
        let references = EntityReferences {
            layer: resolved_reference(&tables.layers, Some(&layer), None),
            linetype: match &linetype {
                Some(name) => resolved_reference(&tables.linetypes, Some(name), None),
                None => ResolvedRef::default(),
            },
            material: catalog_reference(
                material,
                material.and_then(|h| self.ctx.materials.get(h)).map(|m| m.name.as_str()),
            ),
            plot_style: catalog_reference(
                plot_style,
                plot_style.and_then(|h| self.ctx.plot.plot_style_name(h)),
            ),
            visual_style: catalog_reference(
                visual_style,
                resolve_record(&tables.visual_styles, None, visual_style).map(|v| v.name.as_str()),
            ),
        };

        EntityCommon {
            handle: lookup.handle(5),
            owner: owner_handle(tags),
            layer,
            linetype,
            linetype_scale: region.f64_or(48, 1.0),
            lineweight: region
                .i16(370)
                .map(LineWeight::from_value)
                .unwrap_or(LineWeight::ByLayer),
            color: Color::resolve(region.i16(62), region.i64(420)),
            color_book: region.string(430),
            transparency: region
                .i64(440)
                .or_else(|| xdata.transparency())
                .map(Transparency::from_raw),
            material,
            plot_style,
            visual_style,
            thickness: lookup.f64_or(39, 0.0),
            space,
            extrusion: lookup.extrusion(),
            extension_dictionary: group_handles(tags, "ACAD_XDICTIONARY").first().copied(),
            reactors: group_handles(tags, "ACAD_REACTORS"),
            invisible: region.bool(60).unwrap_or(false),
            xdata,
            references,
        }
    }

    fn geometry(
        &mut self,
        dxf_name: &str,
        tags: &[Tag],
        lookup: &CodeLookup<'_>,
        common: &EntityCommon,
    ) -> Geometry {
        let ctx = self.ctx;
        let upper = dxf_name.trim().to_ascii_uppercase();
        match upper.as_str() {
            "POINT" => Geometry::Point(curves::point(lookup)),
            "LINE" => Geometry::Line(curves::line(lookup)),
            "RAY" => Geometry::Ray(curves::ray(lookup)),
            "XLINE" => Geometry::XLine(curves::ray(lookup)),
            "CIRCLE" => Geometry::Circle(curves::circle(lookup)),
            "ARC" => Geometry::Arc(curves::arc(lookup)),
            "ELLIPSE" => Geometry::Ellipse(curves::ellipse(lookup)),
            "LWPOLYLINE" => Geometry::LwPolyline(curves::lwpolyline(tags, lookup)),
            "POLYLINE" => Geometry::Polyline(curves::polyline(lookup)),
            "SPLINE" => Geometry::Spline(curves::spline(tags)),
            "HELIX" => Geometry::Helix(curves::helix(tags)),
            "SOLID" => Geometry::Solid(curves::quad(lookup)),
            "TRACE" => Geometry::Trace(curves::quad(lookup)),
            "3DFACE" => Geometry::Face3D(curves::face3d(lookup)),
            "MESH" => Geometry::Mesh(curves::mesh(tags)),
            "MLINE" => Geometry::MLine(curves::mline(ctx, tags, lookup)),
            "3DSOLID" | "REGION" | "BODY" => Geometry::Modeler(curves::modeler(tags, lookup)),
            name if name.ends_with("SURFACE") => Geometry::Modeler(curves::modeler(tags, lookup)),
            "TEXT" => Geometry::Text(text::text(ctx, tags)),
            "MTEXT" => Geometry::MText(text::mtext(ctx, tags, lookup)),
            "ATTDEF" => Geometry::AttributeDefinition(text::attribute(ctx, tags)),
            "ATTRIB" => Geometry::Attribute(text::attribute(ctx, tags)),
            "LEADER" => Geometry::Leader(text::leader(ctx, tags, lookup)),
            "MULTILEADER" | "MLEADER" => Geometry::MultiLeader(text::multileader(ctx, tags, lookup)),
            "TOLERANCE" => Geometry::Tolerance(text::tolerance(ctx, lookup)),
            "ACAD_TABLE" | "TABLE" => Geometry::Table(text::table(ctx, tags, lookup)),
            "SHAPE" => Geometry::Shape(text::shape(ctx, lookup)),
            "DIMENSION" | "ARC_DIMENSION" | "LARGE_RADIAL_DIMENSION" => Geometry::Dimension(
                Box::new(dimension::decode(ctx, &upper, lookup, &common.xdata)),
            ),
            "HATCH" => Geometry::Hatch(Box::new(hatch::decode(tags))),
            "INSERT" | "MINSERT" => {
                let mut insert = placed::insert(ctx, lookup, common.extension_dictionary);
                insert.block_flags = self
                    .block_flags
                    .get(&insert.block_name.trim().to_uppercase())
                    .copied();
                Geometry::Insert(Box::new(insert))
            }
            "VIEWPORT" => Geometry::Viewport(placed::viewport(lookup)),
            "IMAGE" => Geometry::Image(placed::image(ctx, tags, lookup)),
            "WIPEOUT" => Geometry::Wipeout(placed::image(ctx, tags, lookup)),
            "PDFUNDERLAY" | "DWFUNDERLAY" | "DGNUNDERLAY" => {
                Geometry::Underlay(placed::underlay(ctx, &upper, tags, lookup))
            }
            "POINTCLOUD" | "ACDBPOINTCLOUDEX" => Geometry::PointCloud(placed::point_cloud(ctx, lookup)),
            "OLE2FRAME" => Geometry::Ole2Frame(placed::ole2frame(lookup)),
            "LIGHT" => Geometry::Light(placed::light(lookup)),
            _ => {
                if self.reported_kinds.insert(upper.clone()) {
                    trace!(kind = %upper, "entity kind kept raw");
                    self.notifications.notify(
                        NotificationType::NotImplemented,
                        format!("entity type {upper} kept as raw tags"),
                    );
                }
                Geometry::Raw(RawEntity {
                    tags: tags.to_vec(),
                })
            }
        }
    }
}

/// Space of the entities inside a block definition
fn block_space(name: &str) -> Space {
    let upper = name.to_ascii_uppercase();
    if upper == "*MODEL_SPACE" {
        Space::Model
    } else if upper.starts_with("*PAPER_SPACE") {
        Space::Paper
    } else {
        Space::Block
    }
}

/// Reference into a handle-indexed catalog
fn catalog_reference(handle: Option<Handle>, name: Option<&str>) -> ResolvedRef {
    match (handle, name) {
        (None, _) => ResolvedRef::default(),
        (Some(h), Some(name)) => ResolvedRef {
            name: Some(name.to_string()),
            handle: Some(h),
            resolved: true,
        },
        (Some(h), None) => ResolvedRef {
            name: None,
            handle: Some(h),
            resolved: false,
        },
    }
}

/// Tags before the first xdata group
pub(super) fn body(tags: &[Tag]) -> &[Tag] {
    let end = tags.iter().position(|t| t.code == 1001).unwrap_or(tags.len());
    &tags[..end]
}
