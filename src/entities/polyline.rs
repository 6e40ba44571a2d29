//! LWPOLYLINE and the POLYLINE / VERTEX / SEQEND container

use bitflags::bitflags;

use crate::types::{Handle, Vector2, Vector3};

/// One LWPOLYLINE vertex
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LwVertex {
    pub location: Vector2,
    pub start_width: f64,
    pub end_width: f64,
    /// Arc bulge to the next vertex (42)
    pub bulge: f64,
}

/// LWPOLYLINE
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LwPolyline {
    pub vertices: Vec<LwVertex>,
    /// Flags (70); bit 1 closes the polyline
    pub flags: i16,
    /// Constant width (43)
    pub constant_width: Option<f64>,
    /// Elevation (38)
    pub elevation: f64,
}

impl LwPolyline {
    pub fn is_closed(&self) -> bool {
        self.flags & 1 != 0
    }
}

bitflags! {
    /// POLYLINE flags (70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PolylineFlags: i16 {
        const CLOSED = 1;
        const CURVE_FIT = 2;
        const SPLINE_FIT = 4;
        const POLYLINE_3D = 8;
        const POLYGON_MESH = 16;
        const MESH_CLOSED_N = 32;
        const POLYFACE_MESH = 64;
        const CONTINUOUS_LINETYPE = 128;
    }
}

bitflags! {
    /// VERTEX flags (70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct VertexFlags: i16 {
        const EXTRA_VERTEX = 1;
        const CURVE_FIT_TANGENT = 2;
        const SPLINE_VERTEX = 8;
        const SPLINE_FRAME = 16;
        const POLYLINE_3D = 32;
        const POLYGON_MESH = 64;
        const POLYFACE_MESH = 128;
    }
}

impl VertexFlags {
    /// A polyface face record: flag 128 without 64
    pub fn is_face_record(&self) -> bool {
        self.contains(VertexFlags::POLYFACE_MESH) && !self.contains(VertexFlags::POLYGON_MESH)
    }
}

/// What a POLYLINE's flags make of it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolylineKind {
    #[default]
    Polyline2D,
    Polyline3D,
    PolyfaceMesh,
    PolygonMesh,
}

impl PolylineKind {
    pub fn from_flags(flags: PolylineFlags) -> Self {
        if flags.contains(PolylineFlags::POLYFACE_MESH) {
            PolylineKind::PolyfaceMesh
        } else if flags.contains(PolylineFlags::POLYGON_MESH) {
            PolylineKind::PolygonMesh
        } else if flags.contains(PolylineFlags::POLYLINE_3D) {
            PolylineKind::Polyline3D
        } else {
            PolylineKind::Polyline2D
        }
    }
}

/// A positional VERTEX
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vertex {
    pub handle: Option<Handle>,
    pub line: u32,
    pub location: Vector3,
    pub start_width: f64,
    pub end_width: f64,
    pub bulge: f64,
    pub flags: VertexFlags,
    /// Curve-fit tangent direction (50)
    pub tangent: Option<f64>,
}

/// Orientation of a face seen from +Z
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Winding {
    CounterClockwise,
    Clockwise,
    /// Collinear or coincident corners
    Degenerate,
    /// A corner refers to a vertex that does not exist (yet)
    #[default]
    Unknown,
}

/// A polyface face record
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolylineFace {
    pub handle: Option<Handle>,
    pub line: u32,
    /// 0-based vertex indices (71-74); zero entries are dropped
    pub indices: Vec<usize>,
    /// Per-edge visibility; an edge is hidden when its start index is negative
    pub edge_visible: Vec<bool>,
    pub winding: Winding,
}

impl PolylineFace {
    /// Build a face from the raw 1-based, signed 71-74 values
    pub fn from_raw_indices(raw: &[i32]) -> Self {
        let mut indices = Vec::with_capacity(raw.len());
        let mut edge_visible = Vec::with_capacity(raw.len());
        for &value in raw {
            if value == 0 {
                continue;
            }
            indices.push(value.unsigned_abs() as usize - 1);
            edge_visible.push(value > 0);
        }
        PolylineFace {
            indices,
            edge_visible,
            ..Default::default()
        }
    }

    /// Orientation from the Newell normal of the referenced vertices
    pub fn compute_winding(&self, vertices: &[Vertex]) -> Winding {
        let mut corners = Vec::with_capacity(self.indices.len());
        for &i in &self.indices {
            match vertices.get(i) {
                Some(v) => corners.push(v.location),
                None => return Winding::Unknown,
            }
        }
        if corners.len() < 3 {
            return Winding::Degenerate;
        }
        let mut normal_z = 0.0;
        for (i, a) in corners.iter().enumerate() {
            let b = corners[(i + 1) % corners.len()];
            normal_z += (a.x - b.x) * (a.y + b.y);
        }
        if normal_z.abs() < 1e-12 {
            Winding::Degenerate
        } else if normal_z > 0.0 {
            Winding::CounterClockwise
        } else {
            Winding::Clockwise
        }
    }
}

/// POLYLINE with its VERTEX children
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline {
    pub kind: PolylineKind,
    pub flags: PolylineFlags,
    /// Elevation (z of 10/20/30)
    pub elevation: f64,
    pub default_start_width: f64,
    pub default_end_width: f64,
    /// Mesh M / N vertex counts (71, 72)
    pub mesh_m: i16,
    pub mesh_n: i16,
    /// Smooth surface type (75)
    pub smooth_surface: i16,
    pub vertices: Vec<Vertex>,
    pub faces: Vec<PolylineFace>,
    /// Whether a SEQEND closed the container
    pub terminated: bool,
}

impl Polyline {
    pub fn is_closed(&self) -> bool {
        self.flags.contains(PolylineFlags::CLOSED)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Append a face, computing its winding against the vertices so far
    pub fn push_face(&mut self, mut face: PolylineFace) {
        face.winding = face.compute_winding(&self.vertices);
        self.faces.push(face);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f64, y: f64) -> Vertex {
        Vertex {
            location: Vector3::new(x, y, 0.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_face_indices_are_zero_based() {
        let face = PolylineFace::from_raw_indices(&[1, -2, 3, 0]);
        assert_eq!(face.indices, vec![0, 1, 2]);
        assert_eq!(face.edge_visible, vec![true, false, true]);
    }

    #[test]
    fn test_winding() {
        let mut polyline = Polyline::default();
        polyline.vertices = vec![vertex(0.0, 0.0), vertex(1.0, 0.0), vertex(0.0, 1.0)];
        polyline.push_face(PolylineFace::from_raw_indices(&[1, 2, 3]));
        polyline.push_face(PolylineFace::from_raw_indices(&[1, 3, 2]));
        polyline.push_face(PolylineFace::from_raw_indices(&[1, 2, 9]));
        assert_eq!(polyline.faces[0].winding, Winding::CounterClockwise);
        assert_eq!(polyline.faces[1].winding, Winding::Clockwise);
        assert_eq!(polyline.faces[2].winding, Winding::Unknown);
    }

    #[test]
    fn test_kind_from_flags() {
        assert_eq!(
            PolylineKind::from_flags(PolylineFlags::POLYFACE_MESH),
            PolylineKind::PolyfaceMesh
        );
        assert_eq!(
            PolylineKind::from_flags(PolylineFlags::POLYLINE_3D | PolylineFlags::CLOSED),
            PolylineKind::Polyline3D
        );
        assert!(VertexFlags::POLYFACE_MESH.is_face_record());
        assert!(!(VertexFlags::POLYFACE_MESH | VertexFlags::POLYGON_MESH).is_face_record());
    }
}
