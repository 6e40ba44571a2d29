//! Point cloud definition objects

use crate::io::{owner_handle, CodeLookup};
use crate::types::{Handle, Vector3};

/// ACDBPOINTCLOUDDEF / ACDBPOINTCLOUDDEFEX
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointCloudDefinition {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub line: u32,
    /// Whether this is the extended (`_EX`) form
    pub extended: bool,
    /// Source file (1 or 300)
    pub source_file: Option<String>,
    /// Saved file path (301)
    pub saved_path: Option<String>,
    /// Point count (90 or 160)
    pub point_count: Option<i64>,
    /// Extents (10 / 11)
    pub extents_min: Option<Vector3>,
    pub extents_max: Option<Vector3>,
}

impl PointCloudDefinition {
    pub(crate) fn decode(extended: bool, lookup: &CodeLookup<'_>, line: u32) -> Self {
        PointCloudDefinition {
            handle: lookup.handle(5),
            owner: owner_handle(lookup.tags()),
            line,
            extended,
            source_file: lookup.string(1).or_else(|| lookup.string(300)),
            saved_path: lookup.string(301),
            point_count: lookup.i64(160).or_else(|| lookup.i64(90)),
            extents_min: lookup.point3(10),
            extents_max: lookup.point3(11),
        }
    }
}

/// ACDBPOINTCLOUDDEF_REACTOR / ACDBPOINTCLOUDDEF_REACTOR_EX
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointCloudReactor {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub line: u32,
    pub extended: bool,
    /// Class version (90)
    pub version: i32,
}

impl PointCloudReactor {
    pub(crate) fn decode(extended: bool, lookup: &CodeLookup<'_>, line: u32) -> Self {
        PointCloudReactor {
            handle: lookup.handle(5),
            owner: owner_handle(lookup.tags()),
            line,
            extended,
            version: lookup.i32(90).unwrap_or(1),
        }
    }
}
