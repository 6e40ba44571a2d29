//! DIMENSION, ARC_DIMENSION and LARGE_RADIAL_DIMENSION

use crate::document::ResolvedRef;
use crate::io::TagValue;
use crate::tables::{DimParameters, DimStyle};
use crate::types::{Handle, Vector3};

/// Dimension type from the low bits of code 70, or the record name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DimensionKind {
    #[default]
    Linear,
    Aligned,
    Angular,
    Diameter,
    Radius,
    Angular3Point,
    Ordinate,
    Arc,
    LargeRadial,
    Unknown(i16),
}

impl DimensionKind {
    pub fn from_type(value: i16) -> Self {
        match value & 0x0F {
            0 => DimensionKind::Linear,
            1 => DimensionKind::Aligned,
            2 => DimensionKind::Angular,
            3 => DimensionKind::Diameter,
            4 => DimensionKind::Radius,
            5 => DimensionKind::Angular3Point,
            6 => DimensionKind::Ordinate,
            other => DimensionKind::Unknown(other),
        }
    }
}

/// The effective dimension style of one dimension
///
/// Built from the style cascade (entity style, header default, then
/// `Standard`) with the entity's `DSTYLE` xdata overrides applied on top.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedDimensionStyle {
    /// Style the cascade settled on
    pub source: ResolvedRef,
    /// Style values after overrides
    pub style: DimStyle,
    /// DIMSCALE, with 0 read as 1
    pub overall_scale: f64,
    /// Parameters multiplied by `overall_scale`
    pub scaled_parameters: Option<DimParameters>,
    /// Overrides read from xdata, in stream order
    pub overrides: Vec<(i32, TagValue)>,
    pub suppress_ext_line1: bool,
    pub suppress_ext_line2: bool,
    pub suppress_dim_line1: bool,
    pub suppress_dim_line2: bool,
    /// Arrow blocks resolved against BLOCK_RECORD
    pub arrow_block: ResolvedRef,
    pub arrow_block1: ResolvedRef,
    pub arrow_block2: ResolvedRef,
    pub leader_arrow: ResolvedRef,
    /// Linetypes resolved against LTYPE
    pub dim_linetype: ResolvedRef,
    pub ext_line1_linetype: ResolvedRef,
    pub ext_line2_linetype: ResolvedRef,
    /// Text style resolved against STYLE
    pub text_style: ResolvedRef,
}

/// A dimension entity
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dimension {
    pub kind: DimensionKind,
    /// Raw type flags (70)
    pub type_flags: i16,
    /// Anonymous geometry block (2)
    pub block_name: Option<String>,
    /// Style name as written (3)
    pub style_name: Option<String>,
    /// Definition point (10)
    pub definition_point: Vector3,
    /// Text middle point (11)
    pub text_midpoint: Vector3,
    /// Clone insertion point (12)
    pub insertion: Option<Vector3>,
    /// Extension / definition points (13, 14, 15, 16)
    pub point13: Option<Vector3>,
    pub point14: Option<Vector3>,
    pub point15: Option<Vector3>,
    pub point16: Option<Vector3>,
    /// Leader length (40)
    pub leader_length: Option<f64>,
    /// Rotation for linear dimensions (50)
    pub rotation: f64,
    /// Oblique angle of extension lines (52)
    pub oblique_angle: f64,
    /// Text rotation (53)
    pub text_rotation: f64,
    /// Actual measurement (42)
    pub measurement: Option<f64>,
    /// Text override (1); `<>` stands for the measurement
    pub text_override: Option<String>,
    /// Attachment point (71)
    pub attachment: i16,
    pub style: ResolvedDimensionStyle,
    /// Associated geometry handles (331, 332, 361-364), distinct
    pub associated: Vec<Handle>,
}

impl Dimension {
    /// Text a renderer shows: override with `<>` replaced, or the measurement
    pub fn display_text(&self, formatted_measurement: &str) -> String {
        match self.text_override.as_deref() {
            Some(text) if !text.is_empty() => text.replace("<>", formatted_measurement),
            _ => formatted_measurement.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_type_masks_flags() {
        assert_eq!(DimensionKind::from_type(32 | 1), DimensionKind::Aligned);
        assert_eq!(DimensionKind::from_type(128 | 6), DimensionKind::Ordinate);
        assert_eq!(DimensionKind::from_type(9), DimensionKind::Unknown(9));
    }

    #[test]
    fn test_display_text() {
        let mut dim = Dimension::default();
        assert_eq!(dim.display_text("12.5"), "12.5");
        dim.text_override = Some("<> TYP".to_string());
        assert_eq!(dim.display_text("12.5"), "12.5 TYP");
    }
}
