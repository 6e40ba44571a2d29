//! Block record table entry

use super::{RecordIdentity, NAME_CODES};
use crate::io::CodeLookup;
use crate::types::Handle;

/// Scaling behaviour declared by a block record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockUnitsBehavior {
    /// Instances may scale each axis independently
    #[default]
    Any,
    /// Instances must use the same scale on every axis
    Uniform,
}

/// A block record table entry
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockRecord {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub name: String,
    pub line: u32,
    /// Layout handle (340)
    pub layout: Option<Handle>,
    /// Insertion units (70)
    pub units: i16,
    /// Explodability (280), defaults to true
    pub explodable: bool,
    /// Scaling behaviour (281)
    pub scaling: BlockUnitsBehavior,
    /// Whether a preview bitmap is stored (310 chunks)
    pub has_preview: bool,
}

impl BlockRecord {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Option<Self> {
        let id = RecordIdentity::read(lookup, NAME_CODES)?;
        Some(BlockRecord {
            handle: id.handle,
            owner: id.owner,
            name: id.name,
            line,
            layout: lookup.handle(340),
            units: lookup.i16_or(70, 0),
            explodable: lookup.bool(280).unwrap_or(true),
            scaling: match lookup.bool(281) {
                Some(true) => BlockUnitsBehavior::Uniform,
                _ => BlockUnitsBehavior::Any,
            },
            has_preview: lookup.has(310),
        })
    }

    pub fn requires_uniform_scaling(&self) -> bool {
        self.scaling == BlockUnitsBehavior::Uniform
    }

    /// Model or paper space record (`*Model_Space`, `*Paper_Space*`)
    pub fn is_layout_block(&self) -> bool {
        let upper = self.name.to_uppercase();
        upper.starts_with("*MODEL_SPACE") || upper.starts_with("*PAPER_SPACE")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Tag;

    #[test]
    fn test_decode_block_record() {
        let t: Vec<Tag> = [(5, "1F"), (2, "*Paper_Space0"), (340, "22"), (70, "4"), (281, "1")]
            .iter()
            .map(|(c, v)| Tag::from_raw(*c, v, 0))
            .collect();
        let record = BlockRecord::decode(&CodeLookup::new(&t), 1).expect("named");
        assert_eq!(record.layout, Some(Handle::new(0x22)));
        assert_eq!(record.units, 4);
        assert!(record.requires_uniform_scaling());
        assert!(record.explodable);
        assert!(record.is_layout_block());
    }
}
