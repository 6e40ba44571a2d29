//! PLOTSETTINGS and LAYOUT objects plus plot-style names

use crate::io::{owner_handle, subclass, CodeLookup};
use crate::types::{Handle, Vector2, Vector3};

use super::{Catalog, DictionaryEntry};

/// Page setup (also embedded at the head of every LAYOUT)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlotSettings {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub line: u32,
    /// Page setup name (1)
    pub page_setup_name: Option<String>,
    /// Printer/plotter configuration (2)
    pub printer: Option<String>,
    /// Paper size name (4)
    pub paper_size: Option<String>,
    /// Plot view name (6)
    pub plot_view: Option<String>,
    /// Current plot style table (7)
    pub style_sheet: Option<String>,
    /// Unprintable margins left/bottom/right/top in mm (40-43)
    pub margins: [f64; 4],
    /// Paper width/height in mm (44, 45)
    pub paper_dimensions: Vector2,
    /// Plot origin (46, 47)
    pub plot_origin: Vector2,
    /// Plot window corners (48, 49 / 140, 141)
    pub window_lower_left: Vector2,
    pub window_upper_right: Vector2,
    /// Custom print scale numerator/denominator (142, 143)
    pub scale_numerator: f64,
    pub scale_denominator: f64,
    /// Plot layout flags (70)
    pub flags: i16,
    /// Plot paper units (72): 0 = inches, 1 = mm, 2 = pixels
    pub paper_units: i16,
    /// Plot rotation (73) in quarter turns
    pub rotation: i16,
    /// Plot type (74)
    pub plot_type: i16,
    /// Standard scale type (75)
    pub standard_scale: i16,
}

impl PlotSettings {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Self {
        let region = subclass(lookup.tags(), "AcDbPlotSettings");
        let local = region.map(CodeLookup::new);
        let ps = local.as_ref().unwrap_or(lookup);
        PlotSettings {
            handle: lookup.handle(5),
            owner: owner_handle(lookup.tags()),
            line,
            page_setup_name: ps.string(1),
            printer: ps.string(2),
            paper_size: ps.string(4),
            plot_view: ps.string(6),
            style_sheet: ps.string(7),
            margins: [
                ps.f64_or(40, 0.0),
                ps.f64_or(41, 0.0),
                ps.f64_or(42, 0.0),
                ps.f64_or(43, 0.0),
            ],
            paper_dimensions: Vector2::new(ps.f64_or(44, 0.0), ps.f64_or(45, 0.0)),
            plot_origin: Vector2::new(ps.f64_or(46, 0.0), ps.f64_or(47, 0.0)),
            window_lower_left: Vector2::new(ps.f64_or(48, 0.0), ps.f64_or(49, 0.0)),
            window_upper_right: Vector2::new(ps.f64_or(140, 0.0), ps.f64_or(141, 0.0)),
            scale_numerator: ps.f64_or(142, 1.0),
            scale_denominator: ps.f64_or(143, 1.0),
            flags: ps.i16_or(70, 0),
            paper_units: ps.i16_or(72, 0),
            rotation: ps.i16_or(73, 0),
            plot_type: ps.i16_or(74, 0),
            standard_scale: ps.i16_or(75, 0),
        }
    }

    /// Drawing units per paper unit
    pub fn scale(&self) -> Option<f64> {
        (self.scale_numerator != 0.0).then(|| self.scale_denominator / self.scale_numerator)
    }
}

/// A model or paper space layout
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub line: u32,
    /// Layout name (1 in AcDbLayout)
    pub name: String,
    pub plot_settings: PlotSettings,
    /// Layout flags (70)
    pub flags: i16,
    /// Tab order (71); 0 is model space
    pub tab_order: i16,
    pub limits_min: Vector2,
    pub limits_max: Vector2,
    pub insertion_base: Vector3,
    pub extents_min: Vector3,
    pub extents_max: Vector3,
    pub elevation: f64,
    pub ucs_origin: Vector3,
    pub ucs_x_axis: Vector3,
    pub ucs_y_axis: Vector3,
    /// Owning block record (330 in AcDbLayout)
    pub block_record: Option<Handle>,
    /// Last active viewport (331)
    pub last_viewport: Option<Handle>,
}

impl Layout {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Self {
        let region = subclass(lookup.tags(), "AcDbLayout").unwrap_or(&[]);
        let lay = CodeLookup::new(region);
        Layout {
            handle: lookup.handle(5),
            owner: owner_handle(lookup.tags()),
            line,
            name: lay.string(1).unwrap_or_default(),
            plot_settings: PlotSettings::decode(lookup, line),
            flags: lay.i16_or(70, 0),
            tab_order: lay.i16_or(71, 0),
            limits_min: lay.point2(10).unwrap_or_default(),
            limits_max: lay.point2(11).unwrap_or_default(),
            insertion_base: lay.point3_or(12, Vector3::ZERO),
            extents_min: lay.point3_or(14, Vector3::ZERO),
            extents_max: lay.point3_or(15, Vector3::ZERO),
            elevation: lay.f64_or(146, 0.0),
            ucs_origin: lay.point3_or(13, Vector3::ZERO),
            ucs_x_axis: lay.point3_or(16, Vector3::UNIT_X),
            ucs_y_axis: lay.point3_or(17, Vector3::UNIT_Y),
            block_record: lay.handle(330),
            last_viewport: lay.handle(331),
        }
    }

    pub fn is_model(&self) -> bool {
        self.name.eq_ignore_ascii_case("Model")
    }
}

/// Layouts, page setups and plot-style names
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotInfrastructure {
    pub layouts: Catalog<Layout>,
    pub plot_settings: Catalog<PlotSettings>,
    /// Handle of the `ACAD_PLOTSTYLENAME` dictionary
    pub plot_style_dictionary: Option<Handle>,
    /// Entries of that dictionary (plot style name → placeholder handle)
    pub plot_style_names: Vec<DictionaryEntry>,
}

impl PlotInfrastructure {
    /// Layout owning the given block record
    pub fn layout_for_block(&self, block_record: Handle) -> Option<&Layout> {
        self.layouts
            .iter()
            .find(|l| l.block_record == Some(block_record))
    }

    /// Plot style name stored under the handle
    pub fn plot_style_name(&self, handle: Handle) -> Option<&str> {
        self.plot_style_names
            .iter()
            .find(|e| e.handle == handle)
            .map(|e| e.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Tag;

    #[test]
    fn test_layout_regions() {
        let t: Vec<Tag> = [
            (5, "1E"),
            (330, "1A"),
            (100, "AcDbPlotSettings"),
            (1, "Setup A"),
            (2, "DWG To PDF.pc3"),
            (142, "1"),
            (143, "50"),
            (100, "AcDbLayout"),
            (1, "Layout1"),
            (71, "1"),
            (330, "1F"),
        ]
        .iter()
        .map(|(c, v)| Tag::from_raw(*c, v, 0))
        .collect();
        let layout = Layout::decode(&CodeLookup::new(&t), 1);
        assert_eq!(layout.name, "Layout1");
        assert_eq!(layout.owner, Some(Handle::new(0x1A)));
        assert_eq!(layout.block_record, Some(Handle::new(0x1F)));
        assert_eq!(layout.plot_settings.page_setup_name.as_deref(), Some("Setup A"));
        assert_eq!(layout.plot_settings.scale(), Some(50.0));
        assert!(!layout.is_model());
    }
}
