//! Drawing-wide properties read from the HEADER section

use indexmap::IndexMap;

use crate::io::TagValue;
use crate::types::{Color, DxfVersion, Handle, LineWeight, Vector2, Vector3};

/// Insertion-unit configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnitSettings {
    /// `$INSUNITS`, 0 when unitless or absent
    pub insertion_units: i16,
    /// `$INSUNITSFACTOR`
    pub scale_factor: Option<f64>,
    /// `$INSUNITSDEFSOURCE`
    pub default_source: Option<i16>,
    /// `$INSUNITSDEFTARGET`
    pub default_target: Option<i16>,
    /// `$MEASUREMENT`: 0 = imperial, 1 = metric
    pub measurement: Option<i16>,
    /// `$LUNITS`
    pub linear_format: Option<i16>,
    /// `$LUPREC`
    pub linear_precision: Option<i16>,
    /// `$AUNITS`
    pub angular_format: Option<i16>,
    /// `$AUPREC`
    pub angular_precision: Option<i16>,
}

/// An origin and orthonormal axis pair
#[derive(Debug, Clone, PartialEq)]
pub struct UcsFrame {
    pub name: Option<String>,
    pub origin: Vector3,
    pub x_axis: Vector3,
    pub y_axis: Vector3,
}

impl Default for UcsFrame {
    fn default() -> Self {
        UcsFrame {
            name: None,
            origin: Vector3::ZERO,
            x_axis: Vector3::UNIT_X,
            y_axis: Vector3::UNIT_Y,
        }
    }
}

/// Axis-aligned min/max pair
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extents {
    pub min: Vector3,
    pub max: Vector3,
}

impl Extents {
    /// AutoCAD writes ±1e20 for an empty drawing
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.max.x.abs() < 1e19
    }
}

/// Coordinate and view defaults
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateDefaults {
    pub model_ucs: UcsFrame,
    pub paper_ucs: UcsFrame,
    /// `$EXTMIN` / `$EXTMAX`
    pub extents: Option<Extents>,
    /// `$LIMMIN` / `$LIMMAX`
    pub limits: Option<Extents>,
    /// `$PEXTMIN` / `$PEXTMAX`
    pub paper_extents: Option<Extents>,
    /// `$PLIMMIN` / `$PLIMMAX`
    pub paper_limits: Option<Extents>,
    pub view_direction: Vector3,
    pub view_target: Vector3,
    pub view_twist: f64,
    pub view_center: Option<Vector2>,
    pub view_size: Option<f64>,
}

impl Default for CoordinateDefaults {
    fn default() -> Self {
        CoordinateDefaults {
            model_ucs: UcsFrame::default(),
            paper_ucs: UcsFrame::default(),
            extents: None,
            limits: None,
            paper_extents: None,
            paper_limits: None,
            view_direction: Vector3::UNIT_Z,
            view_target: Vector3::ZERO,
            view_twist: 0.0,
            view_center: None,
            view_size: None,
        }
    }
}

/// Display toggles and sizes
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayDefaults {
    /// `$PDMODE`
    pub point_mode: i16,
    /// `$PDSIZE`
    pub point_size: f64,
    /// `$FILLMODE`
    pub fill_mode: bool,
    /// `$MIRRTEXT`
    pub mirror_text: bool,
    /// `$TRACEWID`
    pub trace_width: f64,
    /// `$LTSCALE`
    pub linetype_scale: f64,
}

impl Default for DisplayDefaults {
    fn default() -> Self {
        DisplayDefaults {
            point_mode: 0,
            point_size: 0.0,
            fill_mode: true,
            mirror_text: false,
            trace_width: 0.05,
            linetype_scale: 1.0,
        }
    }
}

/// A header default that names a table record by name and/or handle
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedRef {
    pub name: Option<String>,
    pub handle: Option<Handle>,
    /// Whether the reference matched a table record
    pub resolved: bool,
}

impl ResolvedRef {
    pub fn named(name: impl Into<String>) -> Self {
        ResolvedRef {
            name: Some(name.into()),
            handle: None,
            resolved: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.handle.is_none()
    }
}

/// Defaults applied to newly created entities
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDefaults {
    /// `$CELTYPE`
    pub linetype: ResolvedRef,
    /// `$CELTSCALE`
    pub linetype_scale: f64,
    /// `$CELWEIGHT`
    pub lineweight: LineWeight,
    /// `$CECOLOR`
    pub color: Color,
    /// `$CLAYER`
    pub layer: ResolvedRef,
    /// `$TEXTSTYLE`
    pub text_style: ResolvedRef,
    /// `$DIMSTYLE`
    pub dim_style: ResolvedRef,
    /// `$DIMTXSTY`
    pub dim_text_style: ResolvedRef,
    /// `$CMLSTYLE`
    pub multiline_style: ResolvedRef,
}

impl Default for EntityDefaults {
    fn default() -> Self {
        EntityDefaults {
            linetype: ResolvedRef::default(),
            linetype_scale: 1.0,
            lineweight: LineWeight::ByLayer,
            color: Color::ByLayer,
            layer: ResolvedRef::default(),
            text_style: ResolvedRef::default(),
            dim_style: ResolvedRef::default(),
            dim_text_style: ResolvedRef::default(),
            multiline_style: ResolvedRef::default(),
        }
    }
}

/// Version, timestamps and authoring information
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrawingMetadata {
    pub version: DxfVersion,
    /// Raw `$ACADVER`
    pub version_string: Option<String>,
    /// `$ACADMAINTVER`
    pub maintenance_version: Option<i64>,
    /// Raw `$DWGCODEPAGE`
    pub code_page: Option<String>,
    /// `encoding_rs` name of the code page
    pub encoding: Option<&'static str>,
    /// `$TDCREATE` as Unix seconds
    pub created: Option<f64>,
    /// `$TDUPDATE` as Unix seconds
    pub updated: Option<f64>,
    /// `$TDINDWG` in days
    pub editing_time_days: Option<f64>,
    /// `$HANDSEED`
    pub handle_seed: Option<Handle>,
    pub fingerprint_guid: Option<String>,
    pub version_guid: Option<String>,
    pub last_saved_by: Option<String>,
    pub project_name: Option<String>,
}

/// Where the geographic summary came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeoSource {
    #[default]
    None,
    /// `$LATITUDE` / `$LONGITUDE` / `$GEO*` header variables
    Header,
    /// A GEODATA or GEOGRAPHICLOCATION object
    GeoData,
}

/// Every `$GEO*` header variable in stream order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeoVariableBag {
    /// `(variable, code, value)` triples
    pub values: Vec<(String, i32, TagValue)>,
    /// Values grouped by group code
    pub by_code: IndexMap<i32, Vec<TagValue>>,
}

impl GeoVariableBag {
    pub(crate) fn push(&mut self, variable: &str, code: i32, value: TagValue) {
        self.by_code.entry(code).or_default().push(value.clone());
        self.values.push((variable.to_string(), code, value));
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// First value of a named variable
    pub fn get(&self, variable: &str) -> Option<&TagValue> {
        self.values
            .iter()
            .find(|(name, _, _)| name.eq_ignore_ascii_case(variable))
            .map(|(_, _, v)| v)
    }
}

/// Geographic location of the drawing
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeographicSummary {
    pub source: GeoSource,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
    /// `$NORTHDIRECTION` angle
    pub north_direction: Option<f64>,
    /// North vector of a GEODATA object (12, 22)
    pub north_vector: Option<Vector2>,
    pub design_point: Option<Vector3>,
    pub reference_point: Option<Vector3>,
    pub horizontal_unit_scale: Option<f64>,
    pub vertical_unit_scale: Option<f64>,
    /// GEODATA coordinate type (70): 3 = geographic
    pub coordinate_type: Option<i16>,
    pub coordinate_system: Option<String>,
    pub header_values: GeoVariableBag,
}

impl GeographicSummary {
    pub fn has_location(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// Everything the HEADER section (plus GEODATA) says about the drawing
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrawingProperties {
    pub units: UnitSettings,
    pub coordinates: CoordinateDefaults,
    pub display: DisplayDefaults,
    pub entity_defaults: EntityDefaults,
    pub metadata: DrawingMetadata,
    pub geographic: GeographicSummary,
}
