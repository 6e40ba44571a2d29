//! IMAGE, WIPEOUT, underlays and point clouds

use crate::types::{Handle, Vector2, Vector3};

/// Clip boundary of an image or underlay
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClipBoundary {
    /// Boundary type (71): 1 rectangle, 2 polygon
    pub boundary_type: i16,
    /// Vertices in pixel or underlay space (14, 24)
    pub vertices: Vec<Vector2>,
    /// Clip mode (290): true inverts the clip
    pub inverted: bool,
}

/// IMAGE or WIPEOUT
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RasterImage {
    pub insertion: Vector3,
    /// One pixel along U and V (11, 12)
    pub u_vector: Vector3,
    pub v_vector: Vector3,
    /// Image size in pixels (13, 23)
    pub size: Vector2,
    /// IMAGEDEF handle (340)
    pub definition: Option<Handle>,
    /// File path of the resolved definition
    pub file_path: Option<String>,
    /// IMAGEDEF_REACTOR handle (360)
    pub reactor: Option<Handle>,
    /// Display flags (70)
    pub display_flags: i16,
    /// Clipping on (280)
    pub clipping: bool,
    pub brightness: i16,
    pub contrast: i16,
    pub fade: i16,
    pub clip: Option<ClipBoundary>,
}

/// PDF/DWF/DGN UNDERLAY
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Underlay {
    /// PDF, DWF or DGN
    pub format: String,
    /// Underlay definition handle (340)
    pub definition: Option<Handle>,
    /// File path of the resolved definition
    pub file_path: Option<String>,
    /// Sheet or item name of the resolved definition
    pub item_name: Option<String>,
    pub insertion: Vector3,
    /// Scale (41, 42, 43)
    pub scale: Vector3,
    pub rotation: f64,
    pub normal: Vector3,
    /// Flags (280)
    pub flags: i16,
    pub contrast: i16,
    pub fade: i16,
    pub clip: Vec<Vector2>,
}

/// POINTCLOUD / ACDBPOINTCLOUDEX
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointCloud {
    /// Point cloud definition (340 or 360)
    pub definition: Option<Handle>,
    /// Source file of the resolved definition
    pub source_file: Option<String>,
    pub origin: Vector3,
    pub scale: Vector3,
    pub rotation: f64,
    /// Locked (290)
    pub locked: bool,
}
