//! Turns a tag stream into a [`RenderingDocument`]
//!
//! The builder scans the stream once per facet, leaves first: symbol tables,
//! header, plot infrastructure, materials, backgrounds, suns, color books,
//! auxiliary objects and geographic data. Entities are decoded last (BLOCKS
//! before ENTITIES) so every lookup they make sees a populated table or
//! catalog, and the block metadata pass runs over the decoded entities.
//!
//! ```rust,ignore
//! use dxf_document::{DocumentBuilder, Tag};
//!
//! let tags: Vec<Tag> = tokenizer_output();
//! let document = DocumentBuilder::new(tags).build();
//! for entity in document.entities() {
//!     println!("{} {}", entity.dxf_name, entity.id);
//! }
//! ```

use rayon::prelude::*;
use tracing::debug;

use crate::document::RenderingDocument;
use crate::error::{DxfError, Result};
use crate::io::{Tag, TagStream};
use crate::types::Handle;

mod blocks;
mod entity_decoder;
mod header;
mod objects;
mod resolver;
mod tables;

pub use resolver::{
    collect_spatial_filters, create_unit_diagnostics, resolve_record, resolved_reference,
};

pub(crate) use resolver::ResolutionContext;

/// Configuration for the document builder.
#[derive(Debug, Clone, PartialEq)]
pub struct BuilderConfiguration {
    /// Relative tolerance when comparing the X/Y/Z scale of an INSERT.
    ///
    /// Default: `1e-6`.
    pub uniform_scale_tolerance: f64,
    /// Relative tolerance between a supplied geometry scale and the unit
    /// conversion factor before the unit diagnostic becomes a warning.
    ///
    /// Default: `1e-6`.
    pub unit_scale_tolerance: f64,
    /// Attribute values kept per tag in block metadata previews.
    ///
    /// Default: `8`.
    pub attribute_preview_limit: usize,
    /// Report INSERTs that repeat owner, block, position, scale and rotation.
    ///
    /// Default: `true`.
    pub duplicate_instance_check: bool,
    /// Merge style objects from the OBJECTS section into the symbol tables.
    ///
    /// Default: `true`.
    pub merge_style_objects: bool,
}

impl Default for BuilderConfiguration {
    fn default() -> Self {
        Self {
            uniform_scale_tolerance: 1e-6,
            unit_scale_tolerance: 1e-6,
            attribute_preview_limit: 8,
            duplicate_instance_check: true,
            merge_style_objects: true,
        }
    }
}

impl BuilderConfiguration {
    /// Reject tolerances that are negative or not finite
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("uniform_scale_tolerance", self.uniform_scale_tolerance),
            ("unit_scale_tolerance", self.unit_scale_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DxfError::InvalidConfiguration(format!(
                    "{name} must be a finite, non-negative number (got {value})"
                )));
            }
        }
        Ok(())
    }
}

/// Assigns ids to records without a handle
///
/// Counters belong to one builder and restart with every build, so the
/// same stream always yields the same ids.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    entity_counter: usize,
    block_counter: usize,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The handle in hex, or the next `entity-<n>`
    pub fn entity_id(&mut self, handle: Option<Handle>) -> String {
        match handle {
            Some(h) => h.to_hex(),
            None => {
                self.entity_counter += 1;
                format!("entity-{}", self.entity_counter)
            }
        }
    }

    /// The handle in hex, or the next `block-<n>`
    pub fn block_id(&mut self, handle: Option<Handle>) -> String {
        match handle {
            Some(h) => h.to_hex(),
            None => {
                self.block_counter += 1;
                format!("block-{}", self.block_counter)
            }
        }
    }
}

/// Builds one [`RenderingDocument`] from one tag stream
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    tags: Vec<Tag>,
    config: BuilderConfiguration,
    ids: IdGenerator,
}

impl DocumentBuilder {
    /// Create a builder over a tokenized stream
    pub fn new(tags: Vec<Tag>) -> Self {
        Self {
            tags,
            config: BuilderConfiguration::default(),
            ids: IdGenerator::new(),
        }
    }

    /// Replace the configuration after validating it
    pub fn with_configuration(mut self, config: BuilderConfiguration) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn configuration(&self) -> &BuilderConfiguration {
        &self.config
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Run every pass and assemble the document.
    ///
    /// Never fails: malformed structure is absorbed and reported through
    /// [`RenderingDocument::notifications`].
    pub fn build(&mut self) -> RenderingDocument {
        self.ids = IdGenerator::new();
        let config = &self.config;
        let stream = TagStream::new(&self.tags);
        let mut notifications = stream.structure_notifications();

        let table_records = stream.records_in("TABLES");
        let mut symbol_tables = tables::extract_tables(&table_records, &mut notifications);
        debug!(
            records = symbol_tables.record_count(),
            tables = symbol_tables.table_names().len(),
            "tables pass"
        );

        let mut properties = header::extract_properties(&stream, &symbol_tables);
        debug!(
            version = %properties.metadata.version,
            insunits = properties.units.insertion_units,
            geo_variables = properties.geographic.header_values.values.len(),
            "header pass"
        );

        let object_records = stream.records_in("OBJECTS");
        let index = objects::ObjectIndex::new(&object_records);

        let plot = objects::extract_plot(&object_records, &index, &mut notifications);
        debug!(
            layouts = plot.layouts.len(),
            plot_settings = plot.plot_settings.len(),
            plot_styles = plot.plot_style_names.len(),
            "plot pass"
        );

        let materials = objects::extract_materials(&object_records, &mut notifications);
        debug!(count = materials.len(), "materials pass");

        let backgrounds = objects::extract_backgrounds(&object_records, &index, &mut notifications);
        debug!(count = backgrounds.len(), "backgrounds pass");

        let suns = objects::extract_suns(&object_records, &mut notifications);
        debug!(count = suns.len(), "suns pass");

        let color_books = objects::extract_color_books(&object_records);
        debug!(books = color_books.len(), "color books pass");

        let auxiliary = objects::extract_auxiliary(&object_records, &index, &mut notifications);
        debug!(count = auxiliary.len(), "auxiliary objects pass");

        if config.merge_style_objects {
            let merged = objects::merge_style_objects(
                &object_records,
                &index,
                &mut symbol_tables,
                &mut notifications,
            );
            debug!(merged, "style objects merged into tables");
        }

        let geo_data = objects::extract_geodata(&object_records, &mut notifications);
        header::apply_geodata(&mut properties.geographic, &geo_data);
        debug!(
            count = geo_data.len(),
            source = ?properties.geographic.source,
            "geographic pass"
        );

        let context = ResolutionContext {
            tables: &symbol_tables,
            properties: &properties,
            objects: &auxiliary,
            plot: &plot,
            materials: &materials,
            config,
        };

        let block_records = stream.records_in("BLOCKS");
        let entity_records = stream.records_in("ENTITIES");
        let decoded = {
            let mut decoder =
                entity_decoder::EntityDecoder::new(&context, &mut self.ids, &mut notifications);
            let blocks = decoder.decode_blocks(&block_records);
            let entities = decoder.decode_entities(&entity_records);
            (blocks, entities)
        };
        let (blocks, entities) = decoded;
        debug!(
            blocks = blocks.len(),
            entities = entities.len(),
            "entities pass"
        );

        let block_metadata = blocks::aggregate(&context, &entities, &blocks);
        debug!(blocks = block_metadata.len(), "block metadata pass");

        RenderingDocument {
            tables: symbol_tables,
            properties,
            objects: auxiliary,
            plot,
            materials,
            backgrounds,
            suns,
            color_books,
            geo_data,
            entities,
            blocks,
            block_metadata,
            notifications,
        }
    }
}

/// Build independent streams in parallel, one builder per stream.
///
/// Results keep the order of `streams`.
pub fn build_all(
    streams: Vec<Vec<Tag>>,
    config: &BuilderConfiguration,
) -> Result<Vec<RenderingDocument>> {
    config.validate()?;
    Ok(streams
        .into_par_iter()
        .map(|tags| {
            let mut builder = DocumentBuilder {
                tags,
                config: config.clone(),
                ids: IdGenerator::new(),
            };
            builder.build()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration_is_valid() {
        assert!(BuilderConfiguration::default().validate().is_ok());
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let config = BuilderConfiguration {
            uniform_scale_tolerance: -1.0,
            ..Default::default()
        };
        let result = DocumentBuilder::new(Vec::new()).with_configuration(config);
        assert!(matches!(result, Err(DxfError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_ids_fall_back_to_counters() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.entity_id(Some(Handle::new(0x2A))), "2A");
        assert_eq!(ids.entity_id(None), "entity-1");
        assert_eq!(ids.entity_id(None), "entity-2");
        assert_eq!(ids.block_id(None), "block-1");
    }

    #[test]
    fn test_empty_stream_builds_empty_document() {
        let document = DocumentBuilder::new(Vec::new()).build();
        assert!(document.entities().is_empty());
        assert!(document.blocks().is_empty());
        assert!(document.notifications().is_empty());
    }
}
