//! Per-block usage metadata derived after decoding

use indexmap::IndexMap;

use crate::entities::Space;
use crate::types::{Handle, Vector3};

/// Severity of a derived diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    #[default]
    Info,
    Warning,
}

/// Unit conversion between a block's units and the drawing's units
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnitDiagnostic {
    /// Units the block contents are drawn in (after fallback)
    pub source_units: i16,
    /// Units of the drawing it is inserted into
    pub target_units: i16,
    pub source_name: &'static str,
    pub target_name: &'static str,
    /// Multiplier from source to target units (1 when either is unitless)
    pub factor: f64,
    /// Whether `$INSUNITSDEFSOURCE` / `$INSUNITSDEFTARGET` stood in
    pub used_fallback: bool,
    /// Geometry scale supplied by the caller, if any
    pub geometry_scale: Option<f64>,
    pub severity: Severity,
    pub message: String,
}

/// What a block diagnostic is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Block record requires uniform scaling but X/Y/Z differ
    NonUniformScale,
    /// Overlay xref inserted inside another block
    OverlayNesting,
    /// Units of the block and the drawing differ
    UnitConversion,
    /// INSERT names a block that has no definition
    MissingDefinition,
    /// Same owner, block, position, scale and rotation as another instance
    DuplicateInstance,
}

/// One diagnostic attached to a block
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDiagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    /// Entity id of the offending INSERT
    pub instance_id: Option<String>,
}

/// One INSERT of the block
#[derive(Debug, Clone, PartialEq)]
pub struct BlockInstance {
    pub entity_id: String,
    pub handle: Option<Handle>,
    pub space: Space,
    pub owner: Option<Handle>,
    /// Layout name owning the instance, when known
    pub layout: Option<String>,
    /// Block the instance sits in, for nested inserts
    pub parent_block: Option<String>,
    pub insertion: Vector3,
    pub scale: Vector3,
    pub rotation: f64,
    /// Unit conversion checked against this instance's scale
    pub units: Option<UnitDiagnostic>,
    pub line: u32,
}

/// Instance counts per space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpaceCounts {
    pub model: usize,
    pub paper: usize,
    pub block: usize,
}

impl SpaceCounts {
    pub fn add(&mut self, space: Space) {
        match space {
            Space::Model => self.model += 1,
            Space::Paper => self.paper += 1,
            Space::Block => self.block += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.model + self.paper + self.block
    }
}

/// An ATTDEF found in the block definition
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeDefinitionSummary {
    pub tag: String,
    pub prompt: Option<String>,
    pub default_value: String,
    pub flags: i16,
}

/// Everything known about how one block is used
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockMetadata {
    pub name: String,
    /// Id of the block definition, when the drawing defines it
    pub block_id: Option<String>,
    /// BLOCK_RECORD handle
    pub block_record: Option<Handle>,
    pub instances: Vec<BlockInstance>,
    pub counts: SpaceCounts,
    pub attribute_definitions: Vec<AttributeDefinitionSummary>,
    /// Attribute values seen on instances, by tag, capped per tag
    pub attribute_previews: IndexMap<String, Vec<String>>,
    /// Instances per layout name
    pub layouts: IndexMap<String, usize>,
    /// Instances per owner handle (hex)
    pub owners: IndexMap<String, usize>,
    pub diagnostics: Vec<BlockDiagnostic>,
    /// Unit conversion for the block, when it has a definition
    pub units: Option<UnitDiagnostic>,
}

impl BlockMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        BlockMetadata {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn has_diagnostic(&self, kind: DiagnosticKind) -> bool {
        self.diagnostics.iter().any(|d| d.kind == kind)
    }

    /// Highest severity among the diagnostics
    pub fn severity(&self) -> Severity {
        self.diagnostics
            .iter()
            .map(|d| d.severity)
            .max()
            .unwrap_or_default()
    }
}
