//! INSERT and MINSERT

use crate::document::ResolvedRef;
use crate::entities::Entity;
use crate::objects::SpatialFilter;
use crate::types::Vector3;

/// MINSERT array layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsertArray {
    /// Column and row counts (70, 71)
    pub columns: i16,
    pub rows: i16,
    /// Column and row spacing (44, 45)
    pub column_spacing: f64,
    pub row_spacing: f64,
}

impl InsertArray {
    pub fn instance_count(&self) -> usize {
        self.columns.max(1) as usize * self.rows.max(1) as usize
    }
}

/// A block reference
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    /// Block name (2)
    pub block_name: String,
    /// Block record matched by name
    pub block: ResolvedRef,
    pub insertion: Vector3,
    /// Scale factors (41, 42, 43)
    pub scale: Vector3,
    /// Rotation in degrees (50)
    pub rotation: f64,
    /// Array layout when rows or columns exceed one
    pub array: Option<InsertArray>,
    /// Attributes-follow flag (66)
    pub has_attributes: bool,
    /// ATTRIB children collected until SEQEND
    pub attributes: Vec<Entity>,
    /// Clip filters found through the extension dictionary
    pub clip_filters: Vec<SpatialFilter>,
    /// Insertion units of the referenced block record
    pub block_units: Option<i16>,
    /// Whether the block record requires uniform scaling
    pub uniform_scaling: bool,
    /// Block definition flags (70 of BLOCK)
    pub block_flags: Option<i16>,
}

impl Default for Insert {
    fn default() -> Self {
        Insert {
            block_name: String::new(),
            block: ResolvedRef::default(),
            insertion: Vector3::ZERO,
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation: 0.0,
            array: None,
            has_attributes: false,
            attributes: Vec::new(),
            clip_filters: Vec::new(),
            block_units: None,
            uniform_scaling: false,
            block_flags: None,
        }
    }
}

impl Insert {
    /// Whether X, Y and Z scale agree within a relative tolerance
    pub fn is_uniformly_scaled(&self, tolerance: f64) -> bool {
        let s = self.scale;
        let reference = s.x.abs().max(s.y.abs()).max(s.z.abs()).max(f64::MIN_POSITIVE);
        let close = |a: f64, b: f64| (a - b).abs() <= tolerance * reference;
        close(s.x, s.y) && close(s.y, s.z) && close(s.x, s.z)
    }

    pub fn is_clipped(&self) -> bool {
        !self.clip_filters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_scale_tolerance() {
        let mut insert = Insert::default();
        assert!(insert.is_uniformly_scaled(1e-6));
        insert.scale = Vector3::new(2.0, 2.0000001, 2.0);
        assert!(insert.is_uniformly_scaled(1e-6));
        insert.scale = Vector3::new(2.0, 1.0, 2.0);
        assert!(!insert.is_uniformly_scaled(1e-6));
    }

    #[test]
    fn test_array_count() {
        let array = InsertArray {
            columns: 3,
            rows: 0,
            column_spacing: 1.0,
            row_spacing: 1.0,
        };
        assert_eq!(array.instance_count(), 3);
    }
}
