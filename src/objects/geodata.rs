//! GEODATA / GEOGRAPHICLOCATION objects

use crate::io::{owner_handle, CodeLookup};
use crate::types::{Handle, Vector2, Vector3};

/// Geolocation attached to model space
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeoData {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub line: u32,
    /// Object version (90)
    pub version: i32,
    /// Host block record (330 after the subclass marker)
    pub host_block: Option<Handle>,
    /// Design coordinate type (70): 0 = unknown, 1 = local grid,
    /// 2 = projected grid, 3 = geographic
    pub coordinate_type: Option<i16>,
    /// Design point (10, 20, 30)
    pub design_point: Option<Vector3>,
    /// Reference point (11, 21, 31)
    pub reference_point: Option<Vector3>,
    /// Raw 40 value
    pub value_40: Option<f64>,
    /// Raw 41 value
    pub value_41: Option<f64>,
    /// Horizontal units (91)
    pub horizontal_units: Option<i32>,
    /// Vertical units (92)
    pub vertical_units: Option<i32>,
    /// Up direction (210)
    pub up_direction: Vector3,
    /// North direction (12, 22)
    pub north_direction: Option<Vector2>,
    /// Scale estimation method (95)
    pub scale_estimation: Option<i32>,
    /// User specified scale factor (141)
    pub user_scale: Option<f64>,
    /// Sea level correction (294)
    pub sea_level_correction: bool,
    /// Sea level elevation (142)
    pub sea_level_elevation: Option<f64>,
    /// Coordinate system definition (301 followed by 303 chunks)
    pub coordinate_system: Option<String>,
    /// GeoRSS tag (302)
    pub geo_rss_tag: Option<String>,
    /// Number of geo mesh points (93)
    pub mesh_point_count: i32,
}

/// Location derived from a GEODATA object
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoLocation {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
    pub horizontal_unit_scale: Option<f64>,
    pub vertical_unit_scale: Option<f64>,
}

impl GeoData {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Self {
        let owner = owner_handle(lookup.tags());
        let host_block = lookup
            .all(330)
            .filter_map(|t| t.as_handle())
            .find(|h| Some(*h) != owner);

        let mut coordinate_system: Option<String> = lookup.first(301).map(|t| t.text().into_owned());
        for chunk in lookup.all(303) {
            coordinate_system
                .get_or_insert_with(String::new)
                .push_str(&chunk.text());
        }

        GeoData {
            handle: lookup.handle(5),
            owner,
            line,
            version: lookup.i32(90).unwrap_or(1),
            host_block,
            coordinate_type: lookup.i16(70),
            design_point: lookup.point3(10),
            reference_point: lookup.point3(11),
            value_40: lookup.f64(40),
            value_41: lookup.f64(41),
            horizontal_units: lookup.i32(91),
            vertical_units: lookup.i32(92),
            up_direction: lookup.point3_or(210, Vector3::UNIT_Z),
            north_direction: lookup.point2(12),
            scale_estimation: lookup.i32(95),
            user_scale: lookup.f64(141),
            sea_level_correction: lookup.bool(294).unwrap_or(false),
            sea_level_elevation: lookup.f64(142),
            coordinate_system: coordinate_system.filter(|s| !s.trim().is_empty()),
            geo_rss_tag: lookup.string(302),
            mesh_point_count: lookup.i32(93).unwrap_or(0),
        }
    }

    /// Latitude/longitude and unit scales.
    ///
    /// A geographic coordinate type stores longitude in the reference
    /// point X and latitude in Y. Otherwise 40 is read as a latitude only
    /// inside [-90, 90] (with 41 as longitude inside [-180, 180]), and as
    /// the horizontal unit scale when outside.
    pub fn location(&self) -> GeoLocation {
        let mut loc = GeoLocation::default();
        if self.coordinate_type == Some(3) {
            if let Some(p) = self.reference_point {
                loc.longitude = Some(p.x);
                loc.latitude = Some(p.y);
                loc.elevation = Some(p.z);
            }
            loc.horizontal_unit_scale = self.value_40;
            loc.vertical_unit_scale = self.value_41;
            return loc;
        }

        match self.value_40 {
            Some(v) if (-90.0..=90.0).contains(&v) => {
                loc.latitude = Some(v);
                match self.value_41 {
                    Some(lon) if (-180.0..=180.0).contains(&lon) => loc.longitude = Some(lon),
                    other => loc.vertical_unit_scale = other,
                }
            }
            other => {
                loc.horizontal_unit_scale = other;
                loc.vertical_unit_scale = self.value_41;
            }
        }
        loc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Tag;

    fn decode(pairs: &[(i32, &str)]) -> GeoData {
        let t: Vec<Tag> = pairs.iter().map(|(c, v)| Tag::from_raw(*c, v, 0)).collect();
        GeoData::decode(&CodeLookup::new(&t), 1)
    }

    #[test]
    fn test_geographic_reference_point() {
        let geo = decode(&[
            (5, "70"),
            (100, "AcDbGeoData"),
            (90, "2"),
            (70, "3"),
            (11, "13.4"),
            (21, "52.5"),
            (31, "34"),
            (40, "1"),
        ]);
        let loc = geo.location();
        assert_eq!(loc.latitude, Some(52.5));
        assert_eq!(loc.longitude, Some(13.4));
        assert_eq!(loc.elevation, Some(34.0));
        assert_eq!(loc.horizontal_unit_scale, Some(1.0));
    }

    #[test]
    fn test_code_40_out_of_latitude_range_is_scale() {
        let geo = decode(&[(70, "2"), (40, "1000"), (41, "1")]);
        let loc = geo.location();
        assert_eq!(loc.latitude, None);
        assert_eq!(loc.horizontal_unit_scale, Some(1000.0));
    }

    #[test]
    fn test_coordinate_system_chunks() {
        let geo = decode(&[(301, "<Geo"), (303, "Ref/>")]);
        assert_eq!(geo.coordinate_system.as_deref(), Some("<GeoRef/>"));
    }
}
