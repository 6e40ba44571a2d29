//! SOLID, TRACE, 3DFACE and ACIS-backed bodies

use crate::types::{Handle, Vector3};

/// SOLID and TRACE: four corners in entity order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Quad {
    pub corners: [Vector3; 4],
}

impl Quad {
    /// A quad whose fourth corner repeats the third is a triangle
    pub fn is_triangle(&self) -> bool {
        self.corners[2] == self.corners[3]
    }

    /// Corners in drawing order (entity order swaps the last two)
    pub fn outline(&self) -> [Vector3; 4] {
        let c = self.corners;
        [c[0], c[1], c[3], c[2]]
    }
}

/// 3DFACE
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Face3D {
    pub corners: [Vector3; 4],
    /// Invisible edge flags (70), bit n hides edge n+1
    pub invisible_edges: i16,
}

impl Face3D {
    pub fn is_edge_visible(&self, edge: usize) -> bool {
        edge < 4 && self.invisible_edges & (1 << edge) == 0
    }
}

/// 3DSOLID, REGION, BODY and surfaces
///
/// The modeler data is kept as opaque text; nothing evaluates it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelerGeometry {
    /// Modeler format version (70)
    pub version: i16,
    /// Proprietary data lines (1 and 3), joined by newlines
    pub acis_data: String,
    /// History object (350)
    pub history: Option<Handle>,
    /// U and V isolines for surfaces (71, 72)
    pub isolines: Option<(i16, i16)>,
}

impl ModelerGeometry {
    pub fn has_data(&self) -> bool {
        !self.acis_data.is_empty()
    }
}
