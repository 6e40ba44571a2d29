//! LEADER, MULTILEADER and TOLERANCE

use crate::document::ResolvedRef;
use crate::types::{Handle, Vector3};

/// LEADER
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Leader {
    /// Dimension style name (3)
    pub style: ResolvedRef,
    /// Arrowhead flag (71)
    pub arrowhead: bool,
    /// Path type (72): 0 straight, 1 spline
    pub spline_path: bool,
    /// Creation flag (73): 0 text, 1 tolerance, 2 block, 3 none
    pub creation: i16,
    /// Hookline direction flag (74)
    pub hookline_flipped: bool,
    /// Hookline present (75)
    pub has_hookline: bool,
    pub text_height: Option<f64>,
    pub text_width: Option<f64>,
    /// Vertices (10, 20, 30)
    pub vertices: Vec<Vector3>,
    /// Annotation entity (340)
    pub annotation: Option<Handle>,
    /// Horizontal direction (211)
    pub horizontal_direction: Option<Vector3>,
}

/// One leader line of a MULTILEADER
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiLeaderLine {
    pub vertices: Vec<Vector3>,
}

/// MULTILEADER / MLEADER
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiLeader {
    /// Multileader style (340)
    pub style: ResolvedRef,
    /// Content type (172): 1 block, 2 mtext, 3 tolerance
    pub content_type: i16,
    /// Text content (304)
    pub text: Option<String>,
    /// Content block (344)
    pub block: Option<Handle>,
    /// Leader line type (170)
    pub leader_type: i16,
    /// Arrowhead size (42)
    pub arrow_size: Option<f64>,
    /// Landing gap / dogleg length (41)
    pub dogleg_length: Option<f64>,
    /// Overall scale (45)
    pub scale: f64,
    /// Text location (12)
    pub text_location: Option<Vector3>,
    /// Leader lines opened by `LEADER_LINE{`
    pub lines: Vec<MultiLeaderLine>,
}

impl MultiLeader {
    pub fn vertex_count(&self) -> usize {
        self.lines.iter().map(|l| l.vertices.len()).sum()
    }
}

/// TOLERANCE (feature control frame)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tolerance {
    /// Dimension style (3)
    pub style: ResolvedRef,
    pub insertion: Vector3,
    /// Frame text with GDT control codes (1)
    pub text: String,
    /// X axis direction (11)
    pub direction: Vector3,
}
