//! VIEWPORT

use crate::types::{Handle, Vector2, Vector3};

/// A paper-space viewport
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Viewport {
    /// Center in paper space (10, 20, 30)
    pub center: Vector3,
    pub width: f64,
    pub height: f64,
    /// Viewport id (69); 1 is the paper space itself
    pub id: i16,
    /// Status (68): 0 off, negative off-screen
    pub status: i16,
    /// View center in model space (12, 22)
    pub view_center: Vector2,
    pub view_direction: Vector3,
    pub view_target: Vector3,
    /// View height in model units (45)
    pub view_height: f64,
    pub twist_angle: f64,
    /// Status flags (90)
    pub flags: i32,
    /// Non-rectangular clip boundary (340)
    pub clip_boundary: Option<Handle>,
    /// Frozen layers (331)
    pub frozen_layers: Vec<Handle>,
    /// Visual style (348)
    pub visual_style: Option<Handle>,
    /// Background (332)
    pub background: Option<Handle>,
    /// Sun (361)
    pub sun: Option<Handle>,
}

impl Viewport {
    /// Model units per paper unit
    pub fn scale(&self) -> Option<f64> {
        (self.height != 0.0 && self.view_height != 0.0).then(|| self.view_height / self.height)
    }

    pub fn is_paper_space_viewport(&self) -> bool {
        self.id == 1
    }
}
