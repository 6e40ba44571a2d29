//! Dimension style entry
//!
//! The ~60 DIM* variables are grouped into buckets. A bucket that received
//! no value stays `None`, so a sparse style (or a sparse override set)
//! carries only what the drawing actually wrote.

use super::{RecordIdentity, NAME_CODES};
use crate::io::{CodeLookup, TagValue};
use crate::types::{Color, Handle, LineWeight};

/// Length and factor parameters
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DimParameters {
    /// DIMSCALE (40)
    pub scale: Option<f64>,
    /// DIMASZ (41)
    pub arrow_size: Option<f64>,
    /// DIMEXO (42)
    pub ext_line_offset: Option<f64>,
    /// DIMDLI (43)
    pub dim_line_increment: Option<f64>,
    /// DIMEXE (44)
    pub ext_line_extension: Option<f64>,
    /// DIMRND (45)
    pub rounding: Option<f64>,
    /// DIMDLE (46)
    pub dim_line_extension: Option<f64>,
    /// DIMTP (47)
    pub tolerance_plus: Option<f64>,
    /// DIMTM (48)
    pub tolerance_minus: Option<f64>,
    /// DIMFXL (49)
    pub fixed_ext_line_length: Option<f64>,
    /// DIMJOGANG (50)
    pub jog_angle: Option<f64>,
    /// DIMTXT (140)
    pub text_height: Option<f64>,
    /// DIMCEN (141)
    pub center_mark: Option<f64>,
    /// DIMTSZ (142)
    pub tick_size: Option<f64>,
    /// DIMLFAC (144)
    pub linear_factor: Option<f64>,
    /// DIMTVP (145)
    pub text_vertical_position: Option<f64>,
    /// DIMTFAC (146)
    pub tolerance_scale: Option<f64>,
    /// DIMGAP (147)
    pub text_gap: Option<f64>,
}

impl DimParameters {
    /// Multiply every drawing-unit length by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        let mul = |v: Option<f64>| v.map(|v| v * factor);
        DimParameters {
            arrow_size: mul(self.arrow_size),
            ext_line_offset: mul(self.ext_line_offset),
            dim_line_increment: mul(self.dim_line_increment),
            ext_line_extension: mul(self.ext_line_extension),
            dim_line_extension: mul(self.dim_line_extension),
            fixed_ext_line_length: mul(self.fixed_ext_line_length),
            text_height: mul(self.text_height),
            center_mark: mul(self.center_mark),
            tick_size: mul(self.tick_size),
            text_gap: mul(self.text_gap),
            ..self.clone()
        }
    }
}

/// On/off switches
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DimToggles {
    /// DIMTOL (71)
    pub tolerance: Option<bool>,
    /// DIMLIM (72)
    pub limits: Option<bool>,
    /// DIMTIH (73)
    pub text_inside_horizontal: Option<bool>,
    /// DIMTOH (74)
    pub text_outside_horizontal: Option<bool>,
    /// DIMSE1 (75)
    pub suppress_ext_line1: Option<bool>,
    /// DIMSE2 (76)
    pub suppress_ext_line2: Option<bool>,
    /// DIMALT (170)
    pub alternate_units: Option<bool>,
    /// DIMTOFL (172)
    pub force_dim_line: Option<bool>,
    /// DIMSAH (173)
    pub separate_arrows: Option<bool>,
    /// DIMTIX (174)
    pub text_inside: Option<bool>,
    /// DIMSOXD (175)
    pub suppress_outside_dim_lines: Option<bool>,
    /// DIMSD1 (281)
    pub suppress_dim_line1: Option<bool>,
    /// DIMSD2 (282)
    pub suppress_dim_line2: Option<bool>,
    /// DIMUPT (288)
    pub user_positioned_text: Option<bool>,
    /// DIMFXLON (290)
    pub fixed_ext_line: Option<bool>,
    /// DIMTXTDIRECTION (295)
    pub text_direction: Option<bool>,
}

/// Unit formatting and text placement
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DimMeasurement {
    /// DIMPOST (3)
    pub postfix: Option<String>,
    /// DIMTFILL (69)
    pub text_fill: Option<i16>,
    /// DIMTAD (77)
    pub text_vertical: Option<i16>,
    /// DIMZIN (78)
    pub zero_suppression: Option<i16>,
    /// DIMAZIN (79)
    pub angular_zero_suppression: Option<i16>,
    /// DIMARCSYM (90)
    pub arc_symbol: Option<i16>,
    /// DIMADEC (179)
    pub angular_decimals: Option<i16>,
    /// DIMDEC (271)
    pub decimals: Option<i16>,
    /// DIMTDEC (272)
    pub tolerance_decimals: Option<i16>,
    /// DIMAUNIT (275)
    pub angular_units: Option<i16>,
    /// DIMFRAC (276)
    pub fraction_format: Option<i16>,
    /// DIMLUNIT (277)
    pub linear_units: Option<i16>,
    /// DIMDSEP (278)
    pub decimal_separator: Option<i16>,
    /// DIMTMOVE (279)
    pub text_movement: Option<i16>,
    /// DIMJUST (280)
    pub text_justification: Option<i16>,
    /// DIMTOLJ (283)
    pub tolerance_justification: Option<i16>,
    /// DIMTZIN (284)
    pub tolerance_zero_suppression: Option<i16>,
    /// DIMATFIT (289)
    pub fit: Option<i16>,
}

/// Alternate unit settings
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DimAlternateUnits {
    /// DIMAPOST (4)
    pub suffix: Option<String>,
    /// DIMALTF (143)
    pub factor: Option<f64>,
    /// DIMALTRND (148)
    pub rounding: Option<f64>,
    /// DIMALTD (171)
    pub decimals: Option<i16>,
    /// DIMALTU (273)
    pub units: Option<i16>,
    /// DIMALTTD (274)
    pub tolerance_decimals: Option<i16>,
    /// DIMALTZ (285)
    pub zero_suppression: Option<i16>,
    /// DIMALTTZ (286)
    pub tolerance_zero_suppression: Option<i16>,
}

/// Handle references to text styles, arrow blocks and linetypes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DimReferences {
    /// DIMTXSTY (340)
    pub text_style: Option<Handle>,
    /// DIMLDRBLK (341)
    pub leader_arrow: Option<Handle>,
    /// DIMBLK (342)
    pub arrow_block: Option<Handle>,
    /// DIMBLK1 (343)
    pub arrow_block1: Option<Handle>,
    /// DIMBLK2 (344)
    pub arrow_block2: Option<Handle>,
    /// DIMLTYPE (345)
    pub dim_linetype: Option<Handle>,
    /// DIMLTEX1 (346)
    pub ext_line1_linetype: Option<Handle>,
    /// DIMLTEX2 (347)
    pub ext_line2_linetype: Option<Handle>,
}

/// DIMCLRD / DIMCLRE / DIMCLRT
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DimColors {
    pub dim_line: Option<Color>,
    pub ext_line: Option<Color>,
    pub text: Option<Color>,
}

/// DIMLWD / DIMLWE
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DimLineweights {
    pub dim_line: Option<LineWeight>,
    pub ext_line: Option<LineWeight>,
}

/// A dimension style
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DimStyle {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub name: String,
    pub line: u32,
    pub flags: i16,
    pub parameters: Option<DimParameters>,
    pub toggles: Option<DimToggles>,
    pub measurement: Option<DimMeasurement>,
    pub alternate_units: Option<DimAlternateUnits>,
    pub references: Option<DimReferences>,
    pub colors: Option<DimColors>,
    pub lineweights: Option<DimLineweights>,
}

impl DimStyle {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Option<Self> {
        let id = RecordIdentity::read(lookup, NAME_CODES)?;
        let mut style = DimStyle {
            handle: id.handle,
            owner: id.owner,
            name: id.name,
            line,
            flags: lookup.i16_or(70, 0),
            ..Default::default()
        };
        for tag in lookup.tags() {
            if tag.code == 3 && style.name == tag.text().trim() {
                continue;
            }
            style.apply_code(tag.code, &tag.value);
        }
        Some(style)
    }

    /// Overall scale (DIMSCALE); zero or missing means 1
    pub fn overall_scale(&self) -> f64 {
        match self.parameters.as_ref().and_then(|p| p.scale) {
            Some(s) if s != 0.0 && s.is_finite() => s,
            _ => 1.0,
        }
    }

    /// Set one DIM* variable by its group code. Unknown codes are ignored.
    ///
    /// Shared by record decoding and `DSTYLE` xdata overrides, which use the
    /// same codes.
    pub fn apply_code(&mut self, code: i32, value: &TagValue) -> bool {
        let f = || value.as_f64();
        let i = || value.as_i64().and_then(|v| i16::try_from(v).ok());
        let b = || value.as_i64().map(|v| v != 0);
        let h = || Handle::parse(&value.text());
        let s = || Some(value.text().into_owned());

        macro_rules! set {
            ($bucket:ident . $field:ident = $v:expr) => {{
                let v = $v;
                if v.is_none() {
                    return false;
                }
                self.$bucket.get_or_insert_with(Default::default).$field = v;
                true
            }};
        }

        match code {
            40 => set!(parameters.scale = f()),
            41 => set!(parameters.arrow_size = f()),
            42 => set!(parameters.ext_line_offset = f()),
            43 => set!(parameters.dim_line_increment = f()),
            44 => set!(parameters.ext_line_extension = f()),
            45 => set!(parameters.rounding = f()),
            46 => set!(parameters.dim_line_extension = f()),
            47 => set!(parameters.tolerance_plus = f()),
            48 => set!(parameters.tolerance_minus = f()),
            49 => set!(parameters.fixed_ext_line_length = f()),
            50 => set!(parameters.jog_angle = f()),
            140 => set!(parameters.text_height = f()),
            141 => set!(parameters.center_mark = f()),
            142 => set!(parameters.tick_size = f()),
            144 => set!(parameters.linear_factor = f()),
            145 => set!(parameters.text_vertical_position = f()),
            146 => set!(parameters.tolerance_scale = f()),
            147 => set!(parameters.text_gap = f()),

            71 => set!(toggles.tolerance = b()),
            72 => set!(toggles.limits = b()),
            73 => set!(toggles.text_inside_horizontal = b()),
            74 => set!(toggles.text_outside_horizontal = b()),
            75 => set!(toggles.suppress_ext_line1 = b()),
            76 => set!(toggles.suppress_ext_line2 = b()),
            170 => set!(toggles.alternate_units = b()),
            172 => set!(toggles.force_dim_line = b()),
            173 => set!(toggles.separate_arrows = b()),
            174 => set!(toggles.text_inside = b()),
            175 => set!(toggles.suppress_outside_dim_lines = b()),
            281 => set!(toggles.suppress_dim_line1 = b()),
            282 => set!(toggles.suppress_dim_line2 = b()),
            288 => set!(toggles.user_positioned_text = b()),
            290 => set!(toggles.fixed_ext_line = b()),
            295 => set!(toggles.text_direction = b()),

            3 => set!(measurement.postfix = s()),
            69 => set!(measurement.text_fill = i()),
            77 => set!(measurement.text_vertical = i()),
            78 => set!(measurement.zero_suppression = i()),
            79 => set!(measurement.angular_zero_suppression = i()),
            90 => set!(measurement.arc_symbol = i()),
            179 => set!(measurement.angular_decimals = i()),
            271 => set!(measurement.decimals = i()),
            272 => set!(measurement.tolerance_decimals = i()),
            275 => set!(measurement.angular_units = i()),
            276 => set!(measurement.fraction_format = i()),
            277 => set!(measurement.linear_units = i()),
            278 => set!(measurement.decimal_separator = i()),
            279 => set!(measurement.text_movement = i()),
            280 => set!(measurement.text_justification = i()),
            283 => set!(measurement.tolerance_justification = i()),
            284 => set!(measurement.tolerance_zero_suppression = i()),
            289 => set!(measurement.fit = i()),

            4 => set!(alternate_units.suffix = s()),
            143 => set!(alternate_units.factor = f()),
            148 => set!(alternate_units.rounding = f()),
            171 => set!(alternate_units.decimals = i()),
            273 => set!(alternate_units.units = i()),
            274 => set!(alternate_units.tolerance_decimals = i()),
            285 => set!(alternate_units.zero_suppression = i()),
            286 => set!(alternate_units.tolerance_zero_suppression = i()),

            340 => set!(references.text_style = h()),
            341 => set!(references.leader_arrow = h()),
            342 => set!(references.arrow_block = h()),
            343 => set!(references.arrow_block1 = h()),
            344 => set!(references.arrow_block2 = h()),
            345 => set!(references.dim_linetype = h()),
            346 => set!(references.ext_line1_linetype = h()),
            347 => set!(references.ext_line2_linetype = h()),

            176 => set!(colors.dim_line = i().map(Color::from_index)),
            177 => set!(colors.ext_line = i().map(Color::from_index)),
            178 => set!(colors.text = i().map(Color::from_index)),

            371 => set!(lineweights.dim_line = i().map(LineWeight::from_value)),
            372 => set!(lineweights.ext_line = i().map(LineWeight::from_value)),

            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Tag;

    fn decode(pairs: &[(i32, &str)]) -> DimStyle {
        let t: Vec<Tag> = pairs.iter().map(|(c, v)| Tag::from_raw(*c, v, 0)).collect();
        DimStyle::decode(&CodeLookup::new(&t), 1).expect("named")
    }

    #[test]
    fn test_empty_buckets_are_none() {
        let style = decode(&[(105, "27"), (2, "Standard"), (70, "0")]);
        assert_eq!(style.handle, Some(Handle::new(0x27)));
        assert!(style.parameters.is_none());
        assert!(style.toggles.is_none());
        assert!(style.measurement.is_none());
        assert!(style.alternate_units.is_none());
        assert!(style.references.is_none());
        assert!(style.colors.is_none());
        assert!(style.lineweights.is_none());
        assert_eq!(style.overall_scale(), 1.0);
    }

    #[test]
    fn test_buckets() {
        let style = decode(&[
            (2, "ISO-25"),
            (40, "0"),
            (41, "2.5"),
            (140, "2.5"),
            (75, "1"),
            (271, "2"),
            (342, "1A"),
            (176, "3"),
            (371, "-2"),
        ]);
        let params = style.parameters.as_ref().expect("parameters");
        assert_eq!(params.arrow_size, Some(2.5));
        assert_eq!(style.overall_scale(), 1.0);
        assert_eq!(style.toggles.as_ref().and_then(|t| t.suppress_ext_line1), Some(true));
        assert_eq!(style.measurement.as_ref().and_then(|m| m.decimals), Some(2));
        assert_eq!(
            style.references.as_ref().and_then(|r| r.arrow_block),
            Some(Handle::new(0x1A))
        );
        assert_eq!(style.colors.as_ref().and_then(|c| c.dim_line), Some(Color::Index(3)));
        assert_eq!(
            style.lineweights.as_ref().and_then(|l| l.dim_line),
            Some(LineWeight::ByBlock)
        );
    }

    #[test]
    fn test_scaled_parameters() {
        let style = decode(&[(2, "S"), (40, "10"), (41, "0.18"), (45, "0.5")]);
        let scaled = style
            .parameters
            .as_ref()
            .map(|p| p.scaled(style.overall_scale()))
            .expect("parameters");
        assert!((scaled.arrow_size.unwrap_or(0.0) - 1.8).abs() < 1e-12);
        assert_eq!(scaled.rounding, Some(0.5));
        assert_eq!(scaled.scale, Some(10.0));
    }
}
