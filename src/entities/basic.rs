//! Points, lines and conic curves

use crate::types::Vector3;

/// POINT
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Point {
    pub location: Vector3,
    /// X axis angle for PDMODE display (50)
    pub angle: f64,
}

/// LINE
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Line {
    pub start: Vector3,
    pub end: Vector3,
}

impl Line {
    pub fn length(&self) -> f64 {
        (self.end - self.start).length()
    }
}

/// RAY and XLINE: a base point and a unit direction
#[derive(Debug, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vector3,
    pub direction: Vector3,
}

impl Default for Ray {
    fn default() -> Self {
        Ray {
            origin: Vector3::ZERO,
            direction: Vector3::UNIT_X,
        }
    }
}

/// CIRCLE
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Circle {
    pub center: Vector3,
    pub radius: f64,
}

/// ARC; angles in degrees, counter-clockwise around the extrusion
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Arc {
    pub center: Vector3,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Arc {
    /// Included angle in degrees, always in (0, 360]
    pub fn sweep(&self) -> f64 {
        let sweep = (self.end_angle - self.start_angle).rem_euclid(360.0);
        if sweep == 0.0 {
            360.0
        } else {
            sweep
        }
    }
}

/// ELLIPSE; the major axis endpoint is relative to the center
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    pub center: Vector3,
    pub major_axis: Vector3,
    /// Minor to major axis ratio (40)
    pub ratio: f64,
    /// Start and end parameters in radians (41, 42)
    pub start_parameter: f64,
    pub end_parameter: f64,
}

impl Default for Ellipse {
    fn default() -> Self {
        Ellipse {
            center: Vector3::ZERO,
            major_axis: Vector3::UNIT_X,
            ratio: 1.0,
            start_parameter: 0.0,
            end_parameter: std::f64::consts::TAU,
        }
    }
}

impl Ellipse {
    pub fn is_full(&self) -> bool {
        ((self.end_parameter - self.start_parameter).abs() - std::f64::consts::TAU).abs() < 1e-9
    }
}
