//! SHAPE, OLE2FRAME and LIGHT

use crate::document::ResolvedRef;
use crate::types::{Color, Vector3};

/// SHAPE
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shape {
    /// Shape name (2)
    pub name: String,
    pub insertion: Vector3,
    pub size: f64,
    pub rotation: f64,
    pub width_factor: f64,
    pub oblique_angle: f64,
    /// Shape file style resolved through the STYLE table
    pub style: ResolvedRef,
}

/// OLE2FRAME; the binary payload stays opaque
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ole2Frame {
    /// OLE object type (71): 1 link, 2 embedded, 3 static
    pub object_type: i16,
    /// Tile mode (72): 0 model space, 1 paper space
    pub paper_space: bool,
    pub upper_left: Vector3,
    pub lower_right: Vector3,
    /// Declared payload length (90)
    pub data_length: i32,
    /// Number of 310 chunks received
    pub chunk_count: usize,
    /// Application name (3)
    pub application: Option<String>,
}

/// LIGHT
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Light {
    /// Light name (1)
    pub name: String,
    /// Light type (70): 1 distant, 2 point, 3 spot
    pub light_type: i16,
    pub enabled: bool,
    pub color: Color,
    pub intensity: f64,
    pub position: Vector3,
    pub target: Vector3,
    /// Attenuation type (72)
    pub attenuation: i16,
    pub hotspot_angle: f64,
    pub falloff_angle: f64,
    pub cast_shadows: bool,
}
