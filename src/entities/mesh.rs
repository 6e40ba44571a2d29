//! MESH and MLINE

use crate::document::ResolvedRef;
use crate::types::Vector3;

/// MESH (subdivision surface)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    /// Version (71)
    pub version: i16,
    /// Blend crease (72)
    pub blend_crease: bool,
    /// Subdivision level (91)
    pub subdivision_level: i32,
    pub vertices: Vec<Vector3>,
    /// Faces as vertex index lists
    pub faces: Vec<Vec<usize>>,
    /// Edges as vertex index pairs
    pub edges: Vec<(usize, usize)>,
    /// Crease value per edge (140)
    pub creases: Vec<f64>,
}

/// One MLINE vertex with its segment parameters
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MLineVertex {
    pub location: Vector3,
    /// Segment direction (12)
    pub direction: Vector3,
    /// Miter direction (13)
    pub miter: Vector3,
    /// Per-element parameter lists (41, grouped by 74)
    pub parameters: Vec<Vec<f64>>,
}

/// MLINE
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MLine {
    /// Style (2 by name, 340 by handle)
    pub style: ResolvedRef,
    pub scale: f64,
    /// Justification (70): 0 top, 1 zero, 2 bottom
    pub justification: i16,
    /// Flags (71): 2 closed
    pub flags: i16,
    /// Number of style elements (73)
    pub element_count: i16,
    pub start_point: Vector3,
    pub vertices: Vec<MLineVertex>,
}

impl MLine {
    pub fn is_closed(&self) -> bool {
        self.flags & 2 != 0
    }
}
