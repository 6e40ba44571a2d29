//! Curves, polylines, faces and bodies

use std::f64::consts::TAU;

use super::body;
use crate::builder::{resolved_reference, ResolutionContext};
use crate::entities::{
    Arc, Circle, Ellipse, Face3D, Helix, Line, LwPolyline, LwVertex, MLine, MLineVertex, Mesh,
    ModelerGeometry, Point, Polyline, PolylineFace, PolylineFlags, PolylineKind, Quad, Ray,
    Spline, Vertex, VertexFlags,
};
use crate::io::{collect_points, subclass, CodeLookup, Tag};
use crate::types::{Vector2, Vector3};

pub(super) fn point(lookup: &CodeLookup<'_>) -> Point {
    Point {
        location: lookup.point3(10).unwrap_or_default(),
        angle: lookup.f64_or(50, 0.0),
    }
}

pub(super) fn line(lookup: &CodeLookup<'_>) -> Line {
    Line {
        start: lookup.point3(10).unwrap_or_default(),
        end: lookup.point3(11).unwrap_or_default(),
    }
}

pub(super) fn ray(lookup: &CodeLookup<'_>) -> Ray {
    Ray {
        origin: lookup.point3(10).unwrap_or_default(),
        direction: lookup
            .point3(11)
            .map(|d| d.normalize_or(Vector3::UNIT_X))
            .unwrap_or(Vector3::UNIT_X),
    }
}

pub(super) fn circle(lookup: &CodeLookup<'_>) -> Circle {
    Circle {
        center: lookup.point3(10).unwrap_or_default(),
        radius: lookup.f64_or(40, 0.0),
    }
}

pub(super) fn arc(lookup: &CodeLookup<'_>) -> Arc {
    Arc {
        center: lookup.point3(10).unwrap_or_default(),
        radius: lookup.f64_or(40, 0.0),
        start_angle: lookup.f64_or(50, 0.0),
        end_angle: lookup.f64_or(51, 360.0),
    }
}

pub(super) fn ellipse(lookup: &CodeLookup<'_>) -> Ellipse {
    Ellipse {
        center: lookup.point3(10).unwrap_or_default(),
        major_axis: lookup.point3_or(11, Vector3::UNIT_X),
        ratio: lookup.f64_or(40, 1.0),
        start_parameter: lookup.f64_or(41, 0.0),
        end_parameter: lookup.f64_or(42, TAU),
    }
}

/// LWPOLYLINE: every 10 opens a vertex, later codes fill it
pub(super) fn lwpolyline(tags: &[Tag], lookup: &CodeLookup<'_>) -> LwPolyline {
    let mut vertices: Vec<LwVertex> = Vec::new();
    for tag in body(tags) {
        match tag.code {
            10 => vertices.push(LwVertex {
                location: Vector2::new(tag.as_f64().unwrap_or(0.0), 0.0),
                ..Default::default()
            }),
            20 | 40 | 41 | 42 => {
                let Some(vertex) = vertices.last_mut() else {
                    continue;
                };
                let value = tag.as_f64().unwrap_or(0.0);
                match tag.code {
                    20 => vertex.location.y = value,
                    40 => vertex.start_width = value,
                    41 => vertex.end_width = value,
                    _ => vertex.bulge = value,
                }
            }
            _ => {}
        }
    }

    LwPolyline {
        vertices,
        flags: lookup.i16_or(70, 0),
        constant_width: lookup.f64(43),
        elevation: lookup.f64_or(38, 0.0),
    }
}

/// The POLYLINE header; vertices arrive through [`push_vertex`]
pub(super) fn polyline(lookup: &CodeLookup<'_>) -> Polyline {
    let flags = PolylineFlags::from_bits_truncate(lookup.i16_or(70, 0));
    Polyline {
        kind: PolylineKind::from_flags(flags),
        flags,
        elevation: lookup
            .point3(10)
            .map(|p| p.z)
            .unwrap_or_else(|| lookup.f64_or(30, 0.0)),
        default_start_width: lookup.f64_or(40, 0.0),
        default_end_width: lookup.f64_or(41, 0.0),
        mesh_m: lookup.i16_or(71, 0),
        mesh_n: lookup.i16_or(72, 0),
        smooth_surface: lookup.i16_or(75, 0),
        ..Default::default()
    }
}

/// Append one VERTEX record: a face record becomes a face, anything else a
/// positional vertex
pub(super) fn push_vertex(polyline: &mut Polyline, lookup: &CodeLookup<'_>, line: u32) {
    let flags = VertexFlags::from_bits_truncate(lookup.i16_or(70, 0));
    if flags.is_face_record() {
        let raw: Vec<i32> = [71, 72, 73, 74]
            .into_iter()
            .filter_map(|code| lookup.i32(code))
            .collect();
        let mut face = PolylineFace::from_raw_indices(&raw);
        face.handle = lookup.handle(5);
        face.line = line;
        polyline.push_face(face);
        return;
    }

    polyline.vertices.push(Vertex {
        handle: lookup.handle(5),
        line,
        location: lookup.point3(10).unwrap_or_default(),
        start_width: lookup.f64_or(40, polyline.default_start_width),
        end_width: lookup.f64_or(41, polyline.default_end_width),
        bulge: lookup.f64_or(42, 0.0),
        flags,
        tangent: lookup.f64(50),
    });
}

fn spline_from(region: &[Tag]) -> Spline {
    let lookup = CodeLookup::new(region);
    let defaults = Spline::default();
    Spline {
        flags: lookup.i16_or(70, 0),
        degree: lookup.i16_or(71, defaults.degree),
        knots: lookup.f64s(40),
        weights: lookup.f64s(41),
        control_points: collect_points(region, 10),
        fit_points: collect_points(region, 11),
        start_tangent: lookup.point3(12),
        end_tangent: lookup.point3(13),
        knot_tolerance: lookup.f64_or(42, defaults.knot_tolerance),
        control_point_tolerance: lookup.f64_or(43, defaults.control_point_tolerance),
        fit_tolerance: lookup.f64_or(44, defaults.fit_tolerance),
        normal: lookup.point3(210),
    }
}

pub(super) fn spline(tags: &[Tag]) -> Spline {
    spline_from(subclass(tags, "AcDbSpline").unwrap_or_else(|| body(tags)))
}

/// HELIX: the AcDbSpline region carries the curve, AcDbHelix the axis
pub(super) fn helix(tags: &[Tag]) -> Helix {
    let spline = spline_from(subclass(tags, "AcDbSpline").unwrap_or(&[]));
    let axis = CodeLookup::new(subclass(tags, "AcDbHelix").unwrap_or(&[]));
    Helix {
        spline,
        axis_base: axis.point3(10).unwrap_or_default(),
        start_point: axis.point3(11).unwrap_or_default(),
        axis_vector: axis.point3_or(12, Vector3::UNIT_Z),
        radius: axis.f64_or(40, 0.0),
        turns: axis.f64_or(41, 0.0),
        turn_height: axis.f64_or(42, 0.0),
        right_handed: axis.bool(290).unwrap_or(true),
        constraint: axis.i16_or(280, 0),
    }
}

fn corners(lookup: &CodeLookup<'_>) -> [Vector3; 4] {
    let first = lookup.point3(10).unwrap_or_default();
    let second = lookup.point3(11).unwrap_or_default();
    let third = lookup.point3(12).unwrap_or_default();
    let fourth = lookup.point3(13).unwrap_or(third);
    [first, second, third, fourth]
}

/// SOLID and TRACE; a missing fourth corner repeats the third
pub(super) fn quad(lookup: &CodeLookup<'_>) -> Quad {
    Quad {
        corners: corners(lookup),
    }
}

pub(super) fn face3d(lookup: &CodeLookup<'_>) -> Face3D {
    Face3D {
        corners: corners(lookup),
        invisible_edges: lookup.i16_or(70, 0),
    }
}

/// Which list a MESH 90 value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MeshList {
    Header,
    Faces,
    Edges,
    Creases,
}

/// MESH: vertices after 92, face lists after 93, edge pairs after 94,
/// creases after 95
pub(super) fn mesh(tags: &[Tag]) -> Mesh {
    let region = subclass(tags, "AcDbSubDMesh").unwrap_or_else(|| body(tags));
    let lookup = CodeLookup::new(region);

    let mut list = MeshList::Header;
    let mut face_values: Vec<i64> = Vec::new();
    let mut edge_values: Vec<i64> = Vec::new();
    let mut creases = Vec::new();
    for tag in region {
        match (tag.code, list) {
            (93, _) => list = MeshList::Faces,
            (94, _) => list = MeshList::Edges,
            (95, _) => list = MeshList::Creases,
            (90, MeshList::Faces) => face_values.extend(tag.as_i64()),
            (90, MeshList::Edges) => edge_values.extend(tag.as_i64()),
            (140, MeshList::Creases) => creases.extend(tag.as_f64()),
            _ => {}
        }
    }

    // face list: a count followed by that many vertex indices
    let mut faces = Vec::new();
    let mut values = face_values.into_iter();
    while let Some(count) = values.next() {
        let face: Vec<usize> = values
            .by_ref()
            .take(count.max(0) as usize)
            .filter_map(|i| usize::try_from(i).ok())
            .collect();
        faces.push(face);
    }

    let edges = edge_values
        .chunks_exact(2)
        .filter_map(|pair| Some((usize::try_from(pair[0]).ok()?, usize::try_from(pair[1]).ok()?)))
        .collect();

    Mesh {
        version: lookup.i16_or(71, 2),
        blend_crease: lookup.bool(72).unwrap_or(false),
        subdivision_level: lookup.i32(91).unwrap_or(0),
        vertices: collect_points(region, 10),
        faces,
        edges,
        creases,
    }
}

fn set_axis(point: &mut Vector3, code: i32, value: f64) {
    match code / 10 {
        1 => point.x = value,
        2 => point.y = value,
        _ => point.z = value,
    }
}

/// MLINE: 11 opens a vertex; 74 opens a parameter list filled by 41
pub(super) fn mline(ctx: &ResolutionContext<'_>, tags: &[Tag], lookup: &CodeLookup<'_>) -> MLine {
    let mut vertices: Vec<MLineVertex> = Vec::new();
    for tag in body(tags) {
        let value = tag.as_f64().unwrap_or(0.0);
        match tag.code {
            11 => vertices.push(MLineVertex {
                location: Vector3::new(value, 0.0, 0.0),
                ..Default::default()
            }),
            21 | 31 | 12 | 22 | 32 | 13 | 23 | 33 | 74 | 41 => {
                let Some(vertex) = vertices.last_mut() else {
                    continue;
                };
                match tag.code {
                    21 | 31 => set_axis(&mut vertex.location, tag.code - 1, value),
                    12 | 22 | 32 => set_axis(&mut vertex.direction, tag.code - 2, value),
                    13 | 23 | 33 => set_axis(&mut vertex.miter, tag.code - 3, value),
                    74 => vertex.parameters.push(Vec::new()),
                    _ => {
                        if let Some(parameters) = vertex.parameters.last_mut() {
                            parameters.push(value);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    MLine {
        style: resolved_reference(&ctx.tables.mline_styles, lookup.str(2), lookup.handle(340)),
        scale: lookup.f64_or(40, 1.0),
        justification: lookup.i16_or(70, 0),
        flags: lookup.i16_or(71, 0),
        element_count: lookup.i16_or(73, 0),
        start_point: lookup.point3(10).unwrap_or_default(),
        vertices,
    }
}

/// 3DSOLID, REGION, BODY and surfaces; modeler data stays opaque
pub(super) fn modeler(tags: &[Tag], lookup: &CodeLookup<'_>) -> ModelerGeometry {
    let acis_data = body(tags)
        .iter()
        .filter(|t| matches!(t.code, 1 | 3))
        .map(|t| t.text().into_owned())
        .collect::<Vec<_>>()
        .join("\n");
    let isolines = match (lookup.i16(71), lookup.i16(72)) {
        (Some(u), Some(v)) => Some((u, v)),
        _ => None,
    };
    ModelerGeometry {
        version: lookup.i16_or(70, 1),
        acis_data,
        history: lookup.handle(350),
        isolines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Winding;

    fn tags(pairs: &[(i32, &str)]) -> Vec<Tag> {
        pairs
            .iter()
            .map(|(c, v)| Tag::from_raw(*c, v, 0))
            .collect()
    }

    #[test]
    fn test_lwpolyline_vertices() {
        let t = tags(&[
            (90, "3"),
            (70, "1"),
            (43, "0.5"),
            (10, "0"),
            (20, "0"),
            (10, "2"),
            (20, "0"),
            (42, "1"),
            (10, "2"),
            (20, "2"),
        ]);
        let lw = lwpolyline(&t, &CodeLookup::new(&t));
        assert_eq!(lw.vertices.len(), 3);
        assert!(lw.is_closed());
        assert_eq!(lw.vertices[1].bulge, 1.0);
        assert_eq!(lw.vertices[2].location, Vector2::new(2.0, 2.0));
        assert_eq!(lw.constant_width, Some(0.5));
    }

    #[test]
    fn test_polyface_records() {
        let header = tags(&[(70, "64"), (71, "3"), (72, "1")]);
        let mut poly = polyline(&CodeLookup::new(&header));
        assert_eq!(poly.kind, PolylineKind::PolyfaceMesh);
        for (x, y) in [("0", "0"), ("1", "0"), ("0", "1")] {
            let v = tags(&[(10, x), (20, y), (70, "192")]);
            push_vertex(&mut poly, &CodeLookup::new(&v), 1);
        }
        let face = tags(&[(10, "0"), (20, "0"), (70, "128"), (71, "1"), (72, "-2"), (73, "3")]);
        push_vertex(&mut poly, &CodeLookup::new(&face), 9);
        assert_eq!(poly.vertex_count(), 3);
        assert_eq!(poly.faces.len(), 1);
        assert_eq!(poly.faces[0].indices, vec![0, 1, 2]);
        assert_eq!(poly.faces[0].edge_visible, vec![true, false, true]);
        assert_eq!(poly.faces[0].winding, Winding::CounterClockwise);
        assert_eq!(poly.faces[0].line, 9);
    }

    #[test]
    fn test_helix_regions() {
        let t = tags(&[
            (100, "AcDbEntity"),
            (100, "AcDbSpline"),
            (71, "3"),
            (10, "1"),
            (20, "0"),
            (30, "0"),
            (100, "AcDbHelix"),
            (10, "0"),
            (20, "0"),
            (30, "0"),
            (40, "1"),
            (41, "3"),
            (290, "0"),
        ]);
        let h = helix(&t);
        assert_eq!(h.spline.control_points, vec![Vector3::new(1.0, 0.0, 0.0)]);
        assert_eq!(h.turns, 3.0);
        assert!(!h.right_handed);
        assert_eq!(h.axis_vector, Vector3::UNIT_Z);
    }

    #[test]
    fn test_mesh_lists() {
        let t = tags(&[
            (100, "AcDbSubDMesh"),
            (71, "2"),
            (91, "0"),
            (92, "3"),
            (10, "0"),
            (20, "0"),
            (30, "0"),
            (10, "1"),
            (20, "0"),
            (30, "0"),
            (10, "0"),
            (20, "1"),
            (30, "0"),
            (93, "4"),
            (90, "3"),
            (90, "0"),
            (90, "1"),
            (90, "2"),
            (94, "1"),
            (90, "0"),
            (90, "1"),
            (95, "1"),
            (140, "0.5"),
        ]);
        let m = mesh(&t);
        assert_eq!(m.vertices.len(), 3);
        assert_eq!(m.faces, vec![vec![0, 1, 2]]);
        assert_eq!(m.edges, vec![(0, 1)]);
        assert_eq!(m.creases, vec![0.5]);
    }

    #[test]
    fn test_quad_fourth_corner_defaults() {
        let t = tags(&[(10, "0"), (20, "0"), (11, "1"), (21, "0"), (12, "0"), (22, "1")]);
        let q = quad(&CodeLookup::new(&t));
        assert!(q.is_triangle());
    }
}
