//! Block definitions (BLOCK ... ENDBLK)

use bitflags::bitflags;

use crate::entities::Entity;
use crate::types::{Handle, Vector3};

bitflags! {
    /// BLOCK type flags (70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BlockFlags: i16 {
        const ANONYMOUS = 1;
        const HAS_ATTRIBUTES = 2;
        const XREF = 4;
        const XREF_OVERLAY = 8;
        const EXTERNALLY_DEPENDENT = 16;
        const RESOLVED_XREF = 32;
        const REFERENCED_XREF = 64;
    }
}

/// A block definition and its owned entities
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockDefinition {
    /// Stable id: the BLOCK handle in hex, or `block-<n>`
    pub id: String,
    pub name: String,
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub line: u32,
    pub layer: String,
    pub base_point: Vector3,
    pub flags: BlockFlags,
    /// Description (4)
    pub description: Option<String>,
    /// Xref path (1)
    pub xref_path: Option<String>,
    /// Insertion units from the block record
    pub units: i16,
    /// Matching BLOCK_RECORD handle
    pub block_record: Option<Handle>,
    pub entities: Vec<Entity>,
    /// Whether ENDBLK closed the definition
    pub terminated: bool,
}

impl BlockDefinition {
    pub fn is_xref(&self) -> bool {
        self.flags.contains(BlockFlags::XREF)
    }

    pub fn is_overlay(&self) -> bool {
        self.flags.contains(BlockFlags::XREF_OVERLAY)
    }

    pub fn is_anonymous(&self) -> bool {
        self.flags.contains(BlockFlags::ANONYMOUS) || self.name.starts_with('*')
    }

    /// `*Model_Space` or `*Paper_Space*`
    pub fn is_layout(&self) -> bool {
        let upper = self.name.to_uppercase();
        upper.starts_with("*MODEL_SPACE") || upper.starts_with("*PAPER_SPACE")
    }
}
