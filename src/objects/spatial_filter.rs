//! SPATIAL_FILTER objects (xclip boundaries)

use nalgebra::{Matrix3x4, Matrix4, Vector4};

use crate::io::{owner_handle, subclass, CodeLookup};
use crate::types::{Handle, Vector2, Vector3};

/// Clip boundary attached to an INSERT through its extension dictionary
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialFilter {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub line: u32,
    /// Boundary in the filter's local plane (10, 20)
    pub boundary: Vec<Vector2>,
    /// Plane normal (210)
    pub extrusion: Vector3,
    /// Plane origin (11)
    pub origin: Vector3,
    /// Display the boundary (71)
    pub display_boundary: bool,
    /// Front clip distance when front clipping is on (72, 40)
    pub front_clip: Option<f64>,
    /// Back clip distance when back clipping is on (73, 41)
    pub back_clip: Option<f64>,
    /// Inverse of the block transform at filter creation
    pub inverse_insert: Matrix3x4<f64>,
    /// Transform applied to the clip boundary
    pub clip_boundary: Matrix3x4<f64>,
}

impl Default for SpatialFilter {
    fn default() -> Self {
        SpatialFilter {
            handle: None,
            owner: None,
            line: 0,
            boundary: Vec::new(),
            extrusion: Vector3::UNIT_Z,
            origin: Vector3::ZERO,
            display_boundary: false,
            front_clip: None,
            back_clip: None,
            inverse_insert: Matrix3x4::identity(),
            clip_boundary: Matrix3x4::identity(),
        }
    }
}

/// Scan position inside the filter body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterScan {
    /// Boundary, normal, origin and flags
    Boundary,
    /// Front clipping is on; the next 40 is its distance
    FrontDistance,
    /// Every further 40 feeds the two 12-value matrices
    Matrices,
}

impl SpatialFilter {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Self {
        let body = subclass(lookup.tags(), "AcDbSpatialFilter").unwrap_or(lookup.tags());
        let mut filter = SpatialFilter {
            handle: lookup.handle(5),
            owner: owner_handle(lookup.tags()),
            line,
            ..Default::default()
        };

        let mut state = FilterScan::Boundary;
        let mut matrix_values: Vec<f64> = Vec::with_capacity(24);
        let mut back_on = false;

        for tag in body {
            let value = tag.as_f64();
            match (state, tag.code) {
                (_, 10) => filter.boundary.push(Vector2::new(value.unwrap_or(0.0), 0.0)),
                (_, 20) => {
                    if let Some(p) = filter.boundary.last_mut() {
                        p.y = value.unwrap_or(0.0);
                    }
                }
                (_, 210) => filter.extrusion.x = value.unwrap_or(0.0),
                (_, 220) => filter.extrusion.y = value.unwrap_or(0.0),
                (_, 230) => filter.extrusion.z = value.unwrap_or(1.0),
                (_, 11) => filter.origin.x = value.unwrap_or(0.0),
                (_, 21) => filter.origin.y = value.unwrap_or(0.0),
                (_, 31) => filter.origin.z = value.unwrap_or(0.0),
                (_, 71) => filter.display_boundary = tag.as_bool().unwrap_or(false),
                (FilterScan::Boundary, 72) => {
                    state = if tag.as_bool() == Some(true) {
                        FilterScan::FrontDistance
                    } else {
                        FilterScan::Matrices
                    };
                }
                (FilterScan::FrontDistance, 40) => {
                    filter.front_clip = value;
                    state = FilterScan::Matrices;
                }
                (_, 73) => {
                    back_on = tag.as_bool() == Some(true);
                    if state == FilterScan::Boundary {
                        state = FilterScan::Matrices;
                    }
                }
                (_, 41) if back_on => filter.back_clip = value,
                (FilterScan::Matrices, 40) | (FilterScan::Boundary, 40) => {
                    matrix_values.push(value.unwrap_or(0.0));
                }
                _ => {}
            }
        }

        filter.extrusion = filter.extrusion.normalize_or(Vector3::UNIT_Z);
        if matrix_values.len() >= 12 {
            filter.inverse_insert = Matrix3x4::from_row_slice(&matrix_values[..12]);
        }
        if matrix_values.len() >= 24 {
            filter.clip_boundary = Matrix3x4::from_row_slice(&matrix_values[12..24]);
        }
        filter
    }

    /// 4×4 homogeneous form of `inverse_insert`
    pub fn inverse_insert_matrix(&self) -> Matrix4<f64> {
        homogeneous(&self.inverse_insert)
    }

    /// 4×4 homogeneous form of `clip_boundary`
    pub fn clip_boundary_matrix(&self) -> Matrix4<f64> {
        homogeneous(&self.clip_boundary)
    }

    /// Map a block-space point into the boundary's frame
    pub fn to_boundary_space(&self, point: Vector3) -> Vector3 {
        let m = self.clip_boundary_matrix() * self.inverse_insert_matrix();
        let p = m * Vector4::new(point.x, point.y, point.z, 1.0);
        Vector3::new(p.x, p.y, p.z)
    }

    /// A rectangular clip stores two corners instead of a polygon
    pub fn is_rectangular(&self) -> bool {
        self.boundary.len() == 2
    }
}

fn homogeneous(m: &Matrix3x4<f64>) -> Matrix4<f64> {
    Matrix4::from_fn(|r, c| match r {
        0..=2 => m[(r, c)],
        _ if c == 3 => 1.0,
        _ => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Tag;

    fn filter_tags(front: bool) -> Vec<Tag> {
        let mut pairs: Vec<(i32, String)> = vec![
            (5, "50".into()),
            (330, "4F".into()),
            (100, "AcDbFilter".into()),
            (100, "AcDbSpatialFilter".into()),
            (70, "2".into()),
            (10, "0".into()),
            (20, "0".into()),
            (10, "10".into()),
            (20, "5".into()),
            (210, "0".into()),
            (220, "0".into()),
            (230, "1".into()),
            (11, "0".into()),
            (21, "0".into()),
            (31, "0".into()),
            (71, "1".into()),
        ];
        if front {
            pairs.push((72, "1".into()));
            pairs.push((40, "2.5".into()));
        } else {
            pairs.push((72, "0".into()));
        }
        pairs.push((73, "0".into()));
        // inverse insert: translation by (-1, -2, -3)
        for v in ["1", "0", "0", "-1", "0", "1", "0", "-2", "0", "0", "1", "-3"] {
            pairs.push((40, v.into()));
        }
        for v in ["2", "0", "0", "0", "0", "2", "0", "0", "0", "0", "2", "0"] {
            pairs.push((40, v.into()));
        }
        pairs
            .iter()
            .map(|(c, v)| Tag::from_raw(*c, v, 0))
            .collect()
    }

    #[test]
    fn test_decode_matrices() {
        let t = filter_tags(false);
        let filter = SpatialFilter::decode(&CodeLookup::new(&t), 1);
        assert_eq!(filter.boundary.len(), 2);
        assert!(filter.is_rectangular());
        assert!(filter.display_boundary);
        assert_eq!(filter.front_clip, None);
        assert_eq!(filter.inverse_insert[(0, 3)], -1.0);
        assert_eq!(filter.inverse_insert[(2, 3)], -3.0);
        assert_eq!(filter.clip_boundary[(1, 1)], 2.0);
        let p = filter.to_boundary_space(Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(p, Vector3::ZERO);
    }

    #[test]
    fn test_front_clip_consumes_first_40() {
        let t = filter_tags(true);
        let filter = SpatialFilter::decode(&CodeLookup::new(&t), 1);
        assert_eq!(filter.front_clip, Some(2.5));
        assert_eq!(filter.inverse_insert[(0, 0)], 1.0);
        assert_eq!(filter.inverse_insert[(1, 3)], -2.0);
    }

    #[test]
    fn test_homogeneous_row() {
        let filter = SpatialFilter::default();
        let m = filter.inverse_insert_matrix();
        assert_eq!(m, Matrix4::identity());
    }
}
