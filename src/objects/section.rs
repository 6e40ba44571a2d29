//! Section and detail view objects

use crate::io::{collect_points, owner_handle, subclass, CodeLookup};
use crate::types::{Color, Handle, Vector3};

/// Which drafting view a view style drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewStyleKind {
    #[default]
    Section,
    Detail,
}

/// ACDBSECTIONVIEWSTYLE / ACDBDETAILVIEWSTYLE
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewStyle {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub line: u32,
    pub kind: ViewStyleKind,
    /// Name from the owning dictionary entry, filled in by the builder
    pub name: Option<String>,
    /// Description (3 in AcDbModelDocViewStyle)
    pub description: Option<String>,
    /// Class version (70)
    pub version: i16,
    /// Style flags (90)
    pub flags: i32,
    /// Identifier text style (first 340)
    pub identifier_style: Option<Handle>,
    /// Identifier color (62 / 420)
    pub identifier_color: Color,
    /// Identifier height (first 40)
    pub identifier_height: Option<f64>,
    /// Every style/linetype/block handle the style references
    pub references: Vec<Handle>,
}

impl ViewStyle {
    pub(crate) fn decode(kind: ViewStyleKind, lookup: &CodeLookup<'_>, line: u32) -> Self {
        let marker = match kind {
            ViewStyleKind::Section => "AcDbSectionViewStyle",
            ViewStyleKind::Detail => "AcDbDetailViewStyle",
        };
        let base = subclass(lookup.tags(), "AcDbModelDocViewStyle").map(CodeLookup::new);
        let own = subclass(lookup.tags(), marker).map(CodeLookup::new);
        let own = own.as_ref().unwrap_or(lookup);

        ViewStyle {
            handle: lookup.handle(5),
            owner: owner_handle(lookup.tags()),
            line,
            kind,
            name: None,
            description: base.as_ref().and_then(|b| b.string(3)),
            version: own.i16_or(70, 0),
            flags: own.i32(90).unwrap_or(0),
            identifier_style: own.handle(340),
            identifier_color: Color::resolve(own.i16(62), own.i64(420)),
            identifier_height: own.f64(40),
            references: own.handles(&[340]),
        }
    }
}

/// SECTIONOBJECT: a section plane with its boundary
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SectionObject {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub line: u32,
    /// Section name (1)
    pub name: Option<String>,
    /// Section state (90): 1 = plane, 2 = boundary, 4 = volume
    pub state: i32,
    /// Flags (91)
    pub flags: i32,
    /// Vertical direction (10, 20, 30)
    pub vertical_direction: Vector3,
    /// Top and bottom heights (40, 41)
    pub top_height: f64,
    pub bottom_height: f64,
    /// Indicator transparency (70)
    pub indicator_transparency: i16,
    /// Section line vertices (11, 21, 31)
    pub vertices: Vec<Vector3>,
    /// Back line vertices (12, 22, 32)
    pub back_vertices: Vec<Vector3>,
    /// Geometry settings (360)
    pub settings: Option<Handle>,
}

impl SectionObject {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Self {
        SectionObject {
            handle: lookup.handle(5),
            owner: owner_handle(lookup.tags()),
            line,
            name: lookup.string(1),
            state: lookup.i32(90).unwrap_or(1),
            flags: lookup.i32(91).unwrap_or(0),
            vertical_direction: lookup.point3_or(10, Vector3::UNIT_Z),
            top_height: lookup.f64_or(40, 0.0),
            bottom_height: lookup.f64_or(41, 0.0),
            indicator_transparency: lookup.i16_or(70, 0),
            vertices: collect_points(lookup.tags(), 11),
            back_vertices: collect_points(lookup.tags(), 12),
            settings: lookup.handle(360),
        }
    }
}

/// SECTIONGEOMETRY: display settings for one section geometry class
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SectionGeometry {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub line: u32,
    /// Section type (90)
    pub section_type: i32,
    /// Geometry count (91)
    pub geometry_count: i32,
    /// Bit flags (92)
    pub flags: i32,
    pub color: Color,
    /// Layer name (8)
    pub layer: Option<String>,
    /// Linetype name (6)
    pub linetype: Option<String>,
    pub linetype_scale: f64,
    /// Plot style name (1)
    pub plot_style: Option<String>,
    /// Line weight (370)
    pub lineweight: Option<i16>,
    /// Hatch pattern name (2)
    pub hatch_pattern: Option<String>,
    pub hatch_angle: f64,
    pub hatch_scale: f64,
}

impl SectionGeometry {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Self {
        SectionGeometry {
            handle: lookup.handle(5),
            owner: owner_handle(lookup.tags()),
            line,
            section_type: lookup.i32(90).unwrap_or(0),
            geometry_count: lookup.i32(91).unwrap_or(0),
            flags: lookup.i32(92).unwrap_or(0),
            color: Color::resolve(lookup.i16(62), lookup.i64(420)),
            layer: lookup.string(8),
            linetype: lookup.string(6),
            linetype_scale: lookup.f64_or(40, 1.0),
            plot_style: lookup.string(1),
            lineweight: lookup.i16(370),
            hatch_pattern: lookup.string(2),
            hatch_angle: lookup.f64_or(41, 0.0),
            hatch_scale: lookup.f64_or(42, 1.0),
        }
    }
}

/// ACDBDETAILVIEWOBJECT
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetailViewObject {
    pub handle: Option<Handle>,
    pub owner: Option<Handle>,
    pub line: u32,
    /// View style (340)
    pub view_style: Option<Handle>,
    /// Origin (10, 20, 30)
    pub origin: Vector3,
    /// Boundary corner points (11, 21, 31)
    pub boundary: Vec<Vector3>,
    /// Detail scale (40)
    pub scale: f64,
    /// Boundary shape (90)
    pub boundary_shape: i32,
    /// Label (1)
    pub label: Option<String>,
}

impl DetailViewObject {
    pub(crate) fn decode(lookup: &CodeLookup<'_>, line: u32) -> Self {
        DetailViewObject {
            handle: lookup.handle(5),
            owner: owner_handle(lookup.tags()),
            line,
            view_style: lookup.handle(340),
            origin: lookup.point3_or(10, Vector3::ZERO),
            boundary: collect_points(lookup.tags(), 11),
            scale: lookup.f64_or(40, 1.0),
            boundary_shape: lookup.i32(90).unwrap_or(0),
            label: lookup.string(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Tag;

    fn tags(pairs: &[(i32, &str)]) -> Vec<Tag> {
        pairs.iter().map(|(c, v)| Tag::from_raw(*c, v, 0)).collect()
    }

    #[test]
    fn test_section_object_vertices() {
        let t = tags(&[
            (5, "90"),
            (100, "AcDbSection"),
            (90, "2"),
            (1, "Section A"),
            (10, "0"),
            (20, "0"),
            (30, "1"),
            (11, "0"),
            (21, "0"),
            (31, "0"),
            (11, "10"),
            (21, "5"),
            (31, "0"),
            (360, "91"),
        ]);
        let s = SectionObject::decode(&CodeLookup::new(&t), 1);
        assert_eq!(s.name.as_deref(), Some("Section A"));
        assert_eq!(s.state, 2);
        assert_eq!(s.vertices.len(), 2);
        assert_eq!(s.vertices[1], Vector3::new(10.0, 5.0, 0.0));
        assert_eq!(s.settings, Some(Handle::new(0x91)));
    }

    #[test]
    fn test_view_style_regions() {
        let t = tags(&[
            (5, "A0"),
            (100, "AcDbModelDocViewStyle"),
            (70, "0"),
            (3, "Metric50"),
            (100, "AcDbDetailViewStyle"),
            (70, "1"),
            (90, "3"),
            (340, "11"),
            (40, "5"),
            (340, "14"),
        ]);
        let s = ViewStyle::decode(ViewStyleKind::Detail, &CodeLookup::new(&t), 1);
        assert_eq!(s.description.as_deref(), Some("Metric50"));
        assert_eq!(s.version, 1);
        assert_eq!(s.identifier_style, Some(Handle::new(0x11)));
        assert_eq!(s.references.len(), 2);
    }
}
