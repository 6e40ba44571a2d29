//! The resolved drawing
//!
//! A [`RenderingDocument`] is produced once by
//! [`DocumentBuilder::build`](crate::DocumentBuilder::build) and is read-only
//! afterwards.

use indexmap::IndexMap;

use crate::entities::{BlockDefinition, Entity, Space};
use crate::notification::NotificationCollection;
use crate::objects::{
    AuxiliaryObjects, Background, Catalog, ColorBook, GeoData, Material, PlotInfrastructure, Sun,
};
use crate::tables::SymbolTables;
use crate::types::Handle;

mod metadata;
mod properties;

pub use metadata::{
    AttributeDefinitionSummary, BlockDiagnostic, BlockInstance, BlockMetadata, DiagnosticKind,
    Severity, SpaceCounts, UnitDiagnostic,
};
pub use properties::{
    CoordinateDefaults, DisplayDefaults, DrawingMetadata, DrawingProperties, EntityDefaults,
    Extents, GeoSource, GeoVariableBag, GeographicSummary, ResolvedRef, UcsFrame, UnitSettings,
};

/// A fully resolved drawing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderingDocument {
    pub(crate) tables: SymbolTables,
    pub(crate) properties: DrawingProperties,
    pub(crate) objects: AuxiliaryObjects,
    pub(crate) plot: PlotInfrastructure,
    pub(crate) materials: Catalog<Material>,
    pub(crate) backgrounds: Catalog<Background>,
    pub(crate) suns: Catalog<Sun>,
    pub(crate) color_books: IndexMap<String, ColorBook>,
    pub(crate) geo_data: Catalog<GeoData>,
    pub(crate) entities: Vec<Entity>,
    pub(crate) blocks: IndexMap<String, BlockDefinition>,
    pub(crate) block_metadata: IndexMap<String, BlockMetadata>,
    pub(crate) notifications: NotificationCollection,
}

impl RenderingDocument {
    pub fn tables(&self) -> &SymbolTables {
        &self.tables
    }

    pub fn properties(&self) -> &DrawingProperties {
        &self.properties
    }

    /// Catalogs of the auxiliary-object pass
    pub fn objects(&self) -> &AuxiliaryObjects {
        &self.objects
    }

    pub fn plot(&self) -> &PlotInfrastructure {
        &self.plot
    }

    pub fn materials(&self) -> &Catalog<Material> {
        &self.materials
    }

    pub fn backgrounds(&self) -> &Catalog<Background> {
        &self.backgrounds
    }

    pub fn suns(&self) -> &Catalog<Sun> {
        &self.suns
    }

    /// DBCOLOR objects grouped by book name
    pub fn color_books(&self) -> &IndexMap<String, ColorBook> {
        &self.color_books
    }

    pub fn geo_data(&self) -> &Catalog<GeoData> {
        &self.geo_data
    }

    /// Entities of the ENTITIES section in stream order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn model_space(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.space() == Space::Model)
    }

    pub fn paper_space(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.space() == Space::Paper)
    }

    /// Block definitions keyed by name, in stream order
    pub fn blocks(&self) -> &IndexMap<String, BlockDefinition> {
        &self.blocks
    }

    /// Block definition by name (case-insensitive)
    pub fn block(&self, name: &str) -> Option<&BlockDefinition> {
        self.blocks.get(name).or_else(|| {
            self.blocks
                .values()
                .find(|b| b.name.eq_ignore_ascii_case(name))
        })
    }

    pub fn block_metadata(&self) -> &IndexMap<String, BlockMetadata> {
        &self.block_metadata
    }

    pub fn notifications(&self) -> &NotificationCollection {
        &self.notifications
    }

    /// Entity with the given handle, searching blocks too
    pub fn entity_by_handle(&self, handle: Handle) -> Option<&Entity> {
        self.entities
            .iter()
            .chain(self.blocks.values().flat_map(|b| b.entities.iter()))
            .find(|e| e.handle() == Some(handle))
    }

    /// Entities whose geometry fell back to raw tags
    pub fn raw_entity_count(&self) -> usize {
        self.entities.iter().filter(|e| e.is_raw()).count()
            + self
                .blocks
                .values()
                .flat_map(|b| b.entities.iter())
                .filter(|e| e.is_raw())
                .count()
    }
}
