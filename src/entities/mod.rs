//! Decoded drawing entities
//!
//! Every graphical record of the ENTITIES and BLOCKS sections becomes an
//! [`Entity`]: shared metadata in [`EntityCommon`] plus a kind-specific
//! [`Geometry`] payload. Unknown record types keep their tags in
//! [`Geometry::Raw`].

use crate::document::ResolvedRef;
use crate::io::Tag;
use crate::types::{Color, Handle, LineWeight, Transparency, Vector3};
use crate::xdata::ExtendedData;

mod basic;
mod block;
mod dimension;
mod hatch;
mod insert;
mod leader;
mod mesh;
mod mtext;
mod polyline;
mod raster;
mod shape;
mod solid;
mod spline;
mod table;
mod text;
mod viewport;

pub use basic::{Arc, Circle, Ellipse, Line, Point, Ray};
pub use block::{BlockDefinition, BlockFlags};
pub use dimension::{Dimension, DimensionKind, ResolvedDimensionStyle};
pub use hatch::{
    BoundaryEdge, BoundaryLoop, GradientFill, GradientStop, Hatch, HatchPatternLine,
    LoopFlags, PolylineBoundary,
};
pub use insert::{Insert, InsertArray};
pub use leader::{Leader, MultiLeader, MultiLeaderLine, Tolerance};
pub use mesh::{MLine, MLineVertex, Mesh};
pub use mtext::MText;
pub use polyline::{
    LwPolyline, LwVertex, Polyline, PolylineFace, PolylineFlags, PolylineKind, Vertex,
    VertexFlags, Winding,
};
pub use raster::{ClipBoundary, PointCloud, RasterImage, Underlay};
pub use shape::{Light, Ole2Frame, Shape};
pub use solid::{Face3D, ModelerGeometry, Quad};
pub use spline::{Helix, Spline};
pub use table::AcadTable;
pub use text::{Attribute, Text};
pub use viewport::Viewport;

/// Which space an entity lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Space {
    #[default]
    Model,
    Paper,
    /// Inside a block definition that is not a layout block
    Block,
}

impl Space {
    pub fn as_str(&self) -> &'static str {
        match self {
            Space::Model => "model",
            Space::Paper => "paper",
            Space::Block => "block",
        }
    }
}

/// Table and object references of an entity, resolved name and handle
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntityReferences {
    pub layer: ResolvedRef,
    pub linetype: ResolvedRef,
    pub material: ResolvedRef,
    pub plot_style: ResolvedRef,
    pub visual_style: ResolvedRef,
}

/// Metadata shared by every entity (AcDbEntity)
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCommon {
    pub handle: Option<Handle>,
    /// Owning block record (330)
    pub owner: Option<Handle>,
    /// Layer name (8)
    pub layer: String,
    /// Linetype name (6); `None` means BYLAYER
    pub linetype: Option<String>,
    /// Linetype scale (48)
    pub linetype_scale: f64,
    pub lineweight: LineWeight,
    pub color: Color,
    /// Color-book color name (430)
    pub color_book: Option<String>,
    /// Transparency (440)
    pub transparency: Option<Transparency>,
    /// Material handle (347)
    pub material: Option<Handle>,
    /// Plot style handle (390)
    pub plot_style: Option<Handle>,
    /// Visual style handle (348)
    pub visual_style: Option<Handle>,
    /// Thickness (39)
    pub thickness: f64,
    pub space: Space,
    /// Extrusion direction (210), normalised
    pub extrusion: Vector3,
    /// `{ACAD_XDICTIONARY` handle
    pub extension_dictionary: Option<Handle>,
    /// `{ACAD_REACTORS` handles
    pub reactors: Vec<Handle>,
    /// Visibility (60)
    pub invisible: bool,
    pub xdata: ExtendedData,
    pub references: EntityReferences,
}

impl Default for EntityCommon {
    fn default() -> Self {
        EntityCommon {
            handle: None,
            owner: None,
            layer: "0".to_string(),
            linetype: None,
            linetype_scale: 1.0,
            lineweight: LineWeight::ByLayer,
            color: Color::ByLayer,
            color_book: None,
            transparency: None,
            material: None,
            plot_style: None,
            visual_style: None,
            thickness: 0.0,
            space: Space::Model,
            extrusion: Vector3::UNIT_Z,
            extension_dictionary: None,
            reactors: Vec::new(),
            invisible: false,
            xdata: ExtendedData::new(),
            references: EntityReferences::default(),
        }
    }
}

/// An entity kind the decoder does not interpret
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawEntity {
    pub tags: Vec<Tag>,
}

/// Kind-specific payload
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    Line(Line),
    Ray(Ray),
    XLine(Ray),
    Circle(Circle),
    Arc(Arc),
    Ellipse(Ellipse),
    LwPolyline(LwPolyline),
    Polyline(Polyline),
    Spline(Spline),
    Helix(Helix),
    Text(Text),
    MText(MText),
    AttributeDefinition(Attribute),
    Attribute(Attribute),
    Dimension(Box<Dimension>),
    Leader(Leader),
    MultiLeader(MultiLeader),
    Tolerance(Tolerance),
    Hatch(Box<Hatch>),
    Solid(Quad),
    Trace(Quad),
    Face3D(Face3D),
    Insert(Box<Insert>),
    Viewport(Viewport),
    Image(RasterImage),
    Wipeout(RasterImage),
    Underlay(Underlay),
    PointCloud(PointCloud),
    Mesh(Mesh),
    MLine(MLine),
    Shape(Shape),
    /// 3DSOLID, REGION, BODY and the SURFACE family
    Modeler(ModelerGeometry),
    Table(AcadTable),
    Ole2Frame(Ole2Frame),
    Light(Light),
    Raw(RawEntity),
}

impl Geometry {
    /// Variant name for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::Line(_) => "Line",
            Geometry::Ray(_) => "Ray",
            Geometry::XLine(_) => "XLine",
            Geometry::Circle(_) => "Circle",
            Geometry::Arc(_) => "Arc",
            Geometry::Ellipse(_) => "Ellipse",
            Geometry::LwPolyline(_) => "LwPolyline",
            Geometry::Polyline(_) => "Polyline",
            Geometry::Spline(_) => "Spline",
            Geometry::Helix(_) => "Helix",
            Geometry::Text(_) => "Text",
            Geometry::MText(_) => "MText",
            Geometry::AttributeDefinition(_) => "AttributeDefinition",
            Geometry::Attribute(_) => "Attribute",
            Geometry::Dimension(_) => "Dimension",
            Geometry::Leader(_) => "Leader",
            Geometry::MultiLeader(_) => "MultiLeader",
            Geometry::Tolerance(_) => "Tolerance",
            Geometry::Hatch(_) => "Hatch",
            Geometry::Solid(_) => "Solid",
            Geometry::Trace(_) => "Trace",
            Geometry::Face3D(_) => "Face3D",
            Geometry::Insert(_) => "Insert",
            Geometry::Viewport(_) => "Viewport",
            Geometry::Image(_) => "Image",
            Geometry::Wipeout(_) => "Wipeout",
            Geometry::Underlay(_) => "Underlay",
            Geometry::PointCloud(_) => "PointCloud",
            Geometry::Mesh(_) => "Mesh",
            Geometry::MLine(_) => "MLine",
            Geometry::Shape(_) => "Shape",
            Geometry::Modeler(_) => "Modeler",
            Geometry::Table(_) => "Table",
            Geometry::Ole2Frame(_) => "Ole2Frame",
            Geometry::Light(_) => "Light",
            Geometry::Raw(_) => "Raw",
        }
    }
}

/// A decoded entity
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Stable id: the handle in hex, or a builder-assigned `entity-<n>`
    pub id: String,
    /// Record type as written (`LINE`, `INSERT`, ...)
    pub dxf_name: String,
    /// Line of the `0 <type>` tag
    pub line: u32,
    pub common: EntityCommon,
    pub geometry: Geometry,
}

impl Entity {
    pub fn handle(&self) -> Option<Handle> {
        self.common.handle
    }

    pub fn layer(&self) -> &str {
        &self.common.layer
    }

    pub fn space(&self) -> Space {
        self.common.space
    }

    pub fn as_insert(&self) -> Option<&Insert> {
        match &self.geometry {
            Geometry::Insert(insert) => Some(insert),
            _ => None,
        }
    }

    pub fn as_polyline(&self) -> Option<&Polyline> {
        match &self.geometry {
            Geometry::Polyline(polyline) => Some(polyline),
            _ => None,
        }
    }

    pub fn as_hatch(&self) -> Option<&Hatch> {
        match &self.geometry {
            Geometry::Hatch(hatch) => Some(hatch),
            _ => None,
        }
    }

    pub fn as_dimension(&self) -> Option<&Dimension> {
        match &self.geometry {
            Geometry::Dimension(dimension) => Some(dimension),
            _ => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self.geometry, Geometry::Raw(_))
    }
}
