//! SPLINE and HELIX

use crate::types::Vector3;

/// SPLINE (NURBS curve)
#[derive(Debug, Clone, PartialEq)]
pub struct Spline {
    /// Flags (70): 1 closed, 2 periodic, 4 rational, 8 planar, 16 linear
    pub flags: i16,
    pub degree: i16,
    pub knots: Vec<f64>,
    /// Weights (41); empty for non-rational splines
    pub weights: Vec<f64>,
    pub control_points: Vec<Vector3>,
    pub fit_points: Vec<Vector3>,
    pub start_tangent: Option<Vector3>,
    pub end_tangent: Option<Vector3>,
    pub knot_tolerance: f64,
    pub control_point_tolerance: f64,
    pub fit_tolerance: f64,
    pub normal: Option<Vector3>,
}

impl Default for Spline {
    fn default() -> Self {
        Spline {
            flags: 0,
            degree: 3,
            knots: Vec::new(),
            weights: Vec::new(),
            control_points: Vec::new(),
            fit_points: Vec::new(),
            start_tangent: None,
            end_tangent: None,
            knot_tolerance: 1e-10,
            control_point_tolerance: 1e-10,
            fit_tolerance: 1e-10,
            normal: None,
        }
    }
}

impl Spline {
    pub fn is_closed(&self) -> bool {
        self.flags & 1 != 0
    }

    pub fn is_rational(&self) -> bool {
        self.flags & 4 != 0
    }

    /// Knot count matches control points + degree + 1
    pub fn is_consistent(&self) -> bool {
        self.control_points.is_empty()
            || self.knots.len() == self.control_points.len() + self.degree.max(0) as usize + 1
    }
}

/// HELIX: a spline plus its axis parameters (AcDbHelix)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Helix {
    pub spline: Spline,
    pub axis_base: Vector3,
    pub start_point: Vector3,
    pub axis_vector: Vector3,
    pub radius: f64,
    pub turns: f64,
    pub turn_height: f64,
    /// Handedness (290): true for right-handed
    pub right_handed: bool,
    /// Constraint type (280): 0 turn height, 1 turns, 2 height
    pub constraint: i16,
}
