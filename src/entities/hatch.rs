//! Hatch entity and boundary path types

use bitflags::bitflags;

use crate::types::{Color, Handle, Vector2, Vector3};

bitflags! {
    /// Boundary path type flags (92)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LoopFlags: i32 {
        const EXTERNAL = 1;
        const POLYLINE = 2;
        const DERIVED = 4;
        const TEXTBOX = 8;
        const OUTERMOST = 16;
        const NOT_CLOSED = 32;
        const SELF_INTERSECTING = 64;
        const TEXT_ISLAND = 128;
        const DUPLICATE = 256;
    }
}

/// Polyline boundary: vertices with optional bulges
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolylineBoundary {
    /// Has-bulge flag (72)
    pub has_bulge: bool,
    /// Closed flag (73)
    pub closed: bool,
    /// Vertex locations (10, 20)
    pub vertices: Vec<Vector2>,
    /// Bulges (42), one per vertex when `has_bulge`
    pub bulges: Vec<f64>,
}

/// One edge of an edge-defined boundary loop
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryEdge {
    Line {
        start: Vector2,
        end: Vector2,
    },
    CircularArc {
        center: Vector2,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        counter_clockwise: bool,
    },
    EllipticArc {
        center: Vector2,
        major_axis: Vector2,
        minor_ratio: f64,
        start_angle: f64,
        end_angle: f64,
        counter_clockwise: bool,
    },
    Spline {
        degree: i32,
        rational: bool,
        periodic: bool,
        knots: Vec<f64>,
        control_points: Vec<Vector2>,
        weights: Vec<f64>,
        fit_points: Vec<Vector2>,
        start_tangent: Option<Vector2>,
        end_tangent: Option<Vector2>,
    },
}

impl BoundaryEdge {
    pub fn type_name(&self) -> &'static str {
        match self {
            BoundaryEdge::Line { .. } => "line",
            BoundaryEdge::CircularArc { .. } => "arc",
            BoundaryEdge::EllipticArc { .. } => "ellipse",
            BoundaryEdge::Spline { .. } => "spline",
        }
    }
}

/// A boundary loop: either a polyline or a list of edges
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundaryLoop {
    pub flags: LoopFlags,
    /// Set when bit 2 of the flags is on
    pub polyline: Option<PolylineBoundary>,
    pub edges: Vec<BoundaryEdge>,
    /// Source boundary objects (330)
    pub source_objects: Vec<Handle>,
}

impl BoundaryLoop {
    pub fn is_polyline(&self) -> bool {
        self.flags.contains(LoopFlags::POLYLINE)
    }

    pub fn vertex_count(&self) -> usize {
        self.polyline.as_ref().map_or(0, |p| p.vertices.len())
    }
}

/// One pattern definition line (53 opens, 49 appends dashes)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HatchPatternLine {
    pub angle: f64,
    pub base_point: Vector2,
    pub offset: Vector2,
    pub dashes: Vec<f64>,
}

/// A gradient color stop (463 opens, 63/421/420/419 fill)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GradientStop {
    pub position: f64,
    pub color: Option<Color>,
    /// Raw tint value (419)
    pub tint: Option<i64>,
}

/// Gradient fill settings
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GradientFill {
    /// Gradient name (470)
    pub name: String,
    /// Reserved/enabled flag (450)
    pub enabled: bool,
    /// One-color gradient (452)
    pub single_color: bool,
    /// Angle in radians (460)
    pub angle: f64,
    /// Shift (461)
    pub shift: f64,
    /// Tint (462)
    pub tint: f64,
    pub stops: Vec<GradientStop>,
}

/// HATCH
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Hatch {
    /// Elevation point (10, 20, 30)
    pub elevation: Vector3,
    /// Pattern name (2)
    pub pattern_name: String,
    /// Solid fill (70)
    pub solid: bool,
    /// Associative (71)
    pub associative: bool,
    pub loops: Vec<BoundaryLoop>,
    /// Style (75): 0 odd parity, 1 outermost, 2 entire area
    pub style: i16,
    /// Pattern type (76): 0 user, 1 predefined, 2 custom
    pub pattern_type: i16,
    pub pattern_angle: f64,
    pub pattern_scale: f64,
    /// Double flag (77)
    pub pattern_double: bool,
    pub pattern_lines: Vec<HatchPatternLine>,
    /// Pixel size (47)
    pub pixel_size: Option<f64>,
    /// Seed points (10, 20 after 98)
    pub seeds: Vec<Vector2>,
    pub gradient: Option<GradientFill>,
}

impl Hatch {
    pub fn edge_count(&self) -> usize {
        self.loops.iter().map(|l| l.edges.len()).sum()
    }
}
