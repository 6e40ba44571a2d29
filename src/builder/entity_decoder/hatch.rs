//! HATCH decoding
//!
//! The AcDbHatch body is one flat run of codes whose meaning depends on
//! where the scan is: code 10 is the elevation point in the header, an edge
//! point inside a boundary loop and a seed point after 98. The scanner keeps
//! an explicit position and lets any code the current position does not
//! own fall back to the header.

use tracing::trace;

use super::body;
use crate::entities::{
    BoundaryEdge, BoundaryLoop, GradientFill, GradientStop, Hatch, HatchPatternLine, LoopFlags,
    PolylineBoundary,
};
use crate::io::{subclass, Tag};
use crate::types::{Color, Vector2};

/// Scan position inside the hatch body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    Header,
    PolylineLoop,
    EdgeLoop,
    /// After 97: source boundary handles of the current loop
    SourceObjects,
    PatternLines,
    Seeds,
    Gradient,
}

struct HatchScanner {
    hatch: Hatch,
    scan: Scan,
    /// Whether the open spline edge has already seen its fit point count
    fit_declared: bool,
}

fn f(tag: &Tag) -> f64 {
    tag.as_f64().unwrap_or(0.0)
}

fn flag(tag: &Tag) -> bool {
    tag.as_i64().is_some_and(|v| v != 0)
}

impl HatchScanner {
    fn new() -> Self {
        Self {
            hatch: Hatch {
                pattern_scale: 1.0,
                ..Default::default()
            },
            scan: Scan::Header,
            fit_declared: false,
        }
    }

    fn current_loop(&mut self) -> Option<&mut BoundaryLoop> {
        self.hatch.loops.last_mut()
    }

    fn feed(&mut self, tag: &Tag) {
        if tag.code == 92 {
            self.open_loop(tag);
            return;
        }
        let consumed = match self.scan {
            Scan::Header => false,
            Scan::PolylineLoop => self.polyline_loop(tag),
            Scan::EdgeLoop => self.edge_loop(tag),
            Scan::SourceObjects => self.source_object(tag),
            Scan::PatternLines => self.pattern_line(tag),
            Scan::Seeds => self.seed(tag),
            Scan::Gradient => self.gradient(tag),
        };
        if !consumed {
            self.header(tag);
        }
    }

    fn open_loop(&mut self, tag: &Tag) {
        let flags = LoopFlags::from_bits_retain(tag.as_i32().unwrap_or(0));
        let polyline = flags.contains(LoopFlags::POLYLINE);
        self.hatch.loops.push(BoundaryLoop {
            flags,
            polyline: polyline.then(PolylineBoundary::default),
            ..Default::default()
        });
        self.scan = if polyline {
            Scan::PolylineLoop
        } else {
            Scan::EdgeLoop
        };
    }

    fn polyline_loop(&mut self, tag: &Tag) -> bool {
        if matches!(tag.code, 97 | 330) {
            return self.source_object(tag);
        }
        let Some(polyline) = self.current_loop().and_then(|l| l.polyline.as_mut()) else {
            return false;
        };
        match tag.code {
            72 => polyline.has_bulge = flag(tag),
            73 => polyline.closed = flag(tag),
            93 => {}
            10 => polyline.vertices.push(Vector2::new(f(tag), 0.0)),
            20 => {
                if let Some(v) = polyline.vertices.last_mut() {
                    v.y = f(tag);
                }
            }
            42 => {
                // bulges pair with the last vertex; missing ones are zero
                let index = polyline.vertices.len().saturating_sub(1);
                polyline.bulges.resize(index, 0.0);
                polyline.bulges.push(f(tag));
            }
            _ => return false,
        }
        true
    }

    fn edge_loop(&mut self, tag: &Tag) -> bool {
        match tag.code {
            93 => return true,
            72 => {
                let Some(edge) = new_edge(tag.as_i16().unwrap_or(0)) else {
                    trace!(edge_type = ?tag.as_i16(), line = tag.line, "unknown hatch edge type");
                    return true;
                };
                self.fit_declared = false;
                if let Some(current) = self.current_loop() {
                    current.edges.push(edge);
                }
                return true;
            }
            97 => {
                let spline_open = matches!(
                    self.current_loop().and_then(|l| l.edges.last()),
                    Some(BoundaryEdge::Spline { .. })
                );
                if spline_open && !self.fit_declared {
                    self.fit_declared = true;
                    return true;
                }
                return self.source_object(tag);
            }
            330 => return self.source_object(tag),
            _ => {}
        }
        match self.current_loop().and_then(|l| l.edges.last_mut()) {
            Some(edge) => edge_value(edge, tag),
            None => false,
        }
    }

    fn source_object(&mut self, tag: &Tag) -> bool {
        match tag.code {
            97 => {
                self.scan = Scan::SourceObjects;
                true
            }
            330 => {
                if let (Some(handle), Some(current)) = (tag.as_handle(), self.hatch.loops.last_mut())
                {
                    current.source_objects.push(handle);
                }
                true
            }
            _ => false,
        }
    }

    fn pattern_line(&mut self, tag: &Tag) -> bool {
        let Some(line) = self.hatch.pattern_lines.last_mut() else {
            return false;
        };
        match tag.code {
            43 => line.base_point.x = f(tag),
            44 => line.base_point.y = f(tag),
            45 => line.offset.x = f(tag),
            46 => line.offset.y = f(tag),
            79 => {}
            49 => line.dashes.push(f(tag)),
            _ => return false,
        }
        true
    }

    fn seed(&mut self, tag: &Tag) -> bool {
        match tag.code {
            10 => self.hatch.seeds.push(Vector2::new(f(tag), 0.0)),
            20 => {
                if let Some(seed) = self.hatch.seeds.last_mut() {
                    seed.y = f(tag);
                }
            }
            _ => return false,
        }
        true
    }

    fn gradient(&mut self, tag: &Tag) -> bool {
        let gradient = self.hatch.gradient.get_or_insert_with(GradientFill::default);
        match tag.code {
            450 => gradient.enabled = flag(tag),
            451 | 453 => {}
            452 => gradient.single_color = flag(tag),
            460 => gradient.angle = f(tag),
            461 => gradient.shift = f(tag),
            462 => gradient.tint = f(tag),
            463 => gradient.stops.push(GradientStop {
                position: f(tag),
                ..Default::default()
            }),
            63 | 421 | 420 | 419 => {
                let Some(stop) = gradient.stops.last_mut() else {
                    return true;
                };
                match tag.code {
                    63 => {
                        if stop.color.is_none() {
                            stop.color = tag.as_i16().map(Color::from_index);
                        }
                    }
                    419 => stop.tint = tag.as_i64(),
                    _ => stop.color = tag.as_i64().map(Color::from_true_color),
                }
            }
            470 => gradient.name = tag.text().trim().to_string(),
            _ => return false,
        }
        true
    }

    fn header(&mut self, tag: &Tag) {
        let hatch = &mut self.hatch;
        match tag.code {
            10 if hatch.loops.is_empty() => hatch.elevation.x = f(tag),
            20 if hatch.loops.is_empty() => hatch.elevation.y = f(tag),
            30 if hatch.loops.is_empty() => hatch.elevation.z = f(tag),
            2 => hatch.pattern_name = tag.text().trim().to_string(),
            70 => hatch.solid = flag(tag),
            71 => hatch.associative = flag(tag),
            91 => {}
            75 => hatch.style = tag.as_i16().unwrap_or(0),
            76 => hatch.pattern_type = tag.as_i16().unwrap_or(0),
            52 => hatch.pattern_angle = f(tag),
            41 => hatch.pattern_scale = f(tag),
            77 => hatch.pattern_double = flag(tag),
            78 => self.scan = Scan::PatternLines,
            53 => {
                hatch.pattern_lines.push(HatchPatternLine {
                    angle: f(tag),
                    ..Default::default()
                });
                self.scan = Scan::PatternLines;
            }
            47 => hatch.pixel_size = tag.as_f64(),
            98 => self.scan = Scan::Seeds,
            450..=470 => {
                self.scan = Scan::Gradient;
                self.gradient(tag);
            }
            _ => return,
        }
        if !matches!(tag.code, 78 | 53 | 98 | 450..=470) {
            self.scan = Scan::Header;
        }
    }
}

fn new_edge(edge_type: i16) -> Option<BoundaryEdge> {
    let edge = match edge_type {
        1 => BoundaryEdge::Line {
            start: Vector2::default(),
            end: Vector2::default(),
        },
        2 => BoundaryEdge::CircularArc {
            center: Vector2::default(),
            radius: 0.0,
            start_angle: 0.0,
            end_angle: 360.0,
            counter_clockwise: true,
        },
        3 => BoundaryEdge::EllipticArc {
            center: Vector2::default(),
            major_axis: Vector2::new(1.0, 0.0),
            minor_ratio: 1.0,
            start_angle: 0.0,
            end_angle: 360.0,
            counter_clockwise: true,
        },
        4 => BoundaryEdge::Spline {
            degree: 3,
            rational: false,
            periodic: false,
            knots: Vec::new(),
            control_points: Vec::new(),
            weights: Vec::new(),
            fit_points: Vec::new(),
            start_tangent: None,
            end_tangent: None,
        },
        _ => return None,
    };
    Some(edge)
}

fn set_y(points: &mut [Vector2], y: f64) {
    if let Some(p) = points.last_mut() {
        p.y = y;
    }
}

/// Fill one code of the open edge; returns whether the code belongs to it
fn edge_value(edge: &mut BoundaryEdge, tag: &Tag) -> bool {
    let value = f(tag);
    match edge {
        BoundaryEdge::Line { start, end } => match tag.code {
            10 => start.x = value,
            20 => start.y = value,
            11 => end.x = value,
            21 => end.y = value,
            _ => return false,
        },
        BoundaryEdge::CircularArc {
            center,
            radius,
            start_angle,
            end_angle,
            counter_clockwise,
        } => match tag.code {
            10 => center.x = value,
            20 => center.y = value,
            40 => *radius = value,
            50 => *start_angle = value,
            51 => *end_angle = value,
            73 => *counter_clockwise = flag(tag),
            _ => return false,
        },
        BoundaryEdge::EllipticArc {
            center,
            major_axis,
            minor_ratio,
            start_angle,
            end_angle,
            counter_clockwise,
        } => match tag.code {
            10 => center.x = value,
            20 => center.y = value,
            11 => major_axis.x = value,
            21 => major_axis.y = value,
            40 => *minor_ratio = value,
            50 => *start_angle = value,
            51 => *end_angle = value,
            73 => *counter_clockwise = flag(tag),
            _ => return false,
        },
        BoundaryEdge::Spline {
            degree,
            rational,
            periodic,
            knots,
            control_points,
            weights,
            fit_points,
            start_tangent,
            end_tangent,
        } => match tag.code {
            94 => *degree = tag.as_i32().unwrap_or(3),
            73 => *rational = flag(tag),
            74 => *periodic = flag(tag),
            95 | 96 => {}
            40 => knots.push(value),
            10 => control_points.push(Vector2::new(value, 0.0)),
            20 => set_y(control_points, value),
            42 => weights.push(value),
            11 => fit_points.push(Vector2::new(value, 0.0)),
            21 => set_y(fit_points, value),
            12 => *start_tangent = Some(Vector2::new(value, 0.0)),
            22 => {
                if let Some(t) = start_tangent {
                    t.y = value;
                }
            }
            13 => *end_tangent = Some(Vector2::new(value, 0.0)),
            23 => {
                if let Some(t) = end_tangent {
                    t.y = value;
                }
            }
            _ => return false,
        },
    }
    true
}

/// Decode a HATCH record; XDATA and application groups are skipped
pub(super) fn decode(tags: &[Tag]) -> Hatch {
    let region = subclass(tags, "AcDbHatch").unwrap_or_else(|| body(tags));
    let mut scanner = HatchScanner::new();
    let mut in_group = false;
    for tag in body(region) {
        if tag.code == 102 {
            in_group = tag.text().trim_start().starts_with('{');
            continue;
        }
        if in_group {
            continue;
        }
        scanner.feed(tag);
    }
    scanner.hatch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Handle;

    fn tags(pairs: &[(i32, &str)]) -> Vec<Tag> {
        pairs.iter().map(|(c, v)| Tag::from_raw(*c, v, 0)).collect()
    }

    #[test]
    fn test_polyline_loop_has_no_edges() {
        let t = tags(&[
            (100, "AcDbEntity"),
            (8, "Fill"),
            (100, "AcDbHatch"),
            (10, "0"),
            (20, "0"),
            (30, "2.5"),
            (2, "SOLID"),
            (70, "1"),
            (71, "0"),
            (91, "1"),
            (92, "7"),
            (72, "0"),
            (73, "1"),
            (93, "4"),
            (10, "0"),
            (20, "0"),
            (10, "10"),
            (20, "0"),
            (10, "10"),
            (20, "5"),
            (10, "0"),
            (20, "5"),
            (97, "1"),
            (330, "2B"),
            (75, "1"),
            (76, "1"),
            (98, "1"),
            (10, "5"),
            (20, "2.5"),
        ]);
        let hatch = decode(&t);
        assert!(hatch.solid);
        assert_eq!(hatch.elevation.z, 2.5);
        assert_eq!(hatch.loops.len(), 1);
        let boundary = &hatch.loops[0];
        assert!(boundary.is_polyline());
        assert_eq!(boundary.vertex_count(), 4);
        assert_eq!(hatch.edge_count(), 0);
        assert_eq!(boundary.source_objects, vec![Handle::new(0x2B)]);
        assert_eq!(hatch.style, 1);
        assert_eq!(hatch.seeds, vec![Vector2::new(5.0, 2.5)]);
    }

    #[test]
    fn test_edge_loop_with_spline_fit_data() {
        let t = tags(&[
            (100, "AcDbHatch"),
            (2, "ANSI31"),
            (70, "0"),
            (91, "1"),
            (92, "1"),
            (93, "3"),
            (72, "1"),
            (10, "0"),
            (20, "0"),
            (11, "10"),
            (21, "0"),
            (72, "2"),
            (10, "10"),
            (20, "5"),
            (40, "5"),
            (50, "270"),
            (51, "90"),
            (73, "1"),
            (72, "4"),
            (94, "3"),
            (73, "0"),
            (74, "0"),
            (95, "8"),
            (96, "4"),
            (40, "0"),
            (40, "0"),
            (40, "0"),
            (40, "0"),
            (40, "1"),
            (40, "1"),
            (40, "1"),
            (40, "1"),
            (10, "10"),
            (20, "10"),
            (10, "6"),
            (20, "12"),
            (10, "3"),
            (20, "8"),
            (10, "0"),
            (20, "0"),
            (97, "2"),
            (11, "10"),
            (21, "10"),
            (11, "0"),
            (21, "0"),
            (12, "1"),
            (22, "0"),
            (13, "0"),
            (23, "-1"),
            (97, "0"),
            (75, "0"),
            (76, "1"),
            (52, "45"),
            (41, "2"),
            (77, "0"),
            (78, "1"),
            (53, "45"),
            (43, "0"),
            (44, "0"),
            (45, "-0.088"),
            (46, "0.088"),
            (79, "0"),
        ]);
        let hatch = decode(&t);
        assert!(!hatch.solid);
        assert_eq!(hatch.edge_count(), 3);
        let edges = &hatch.loops[0].edges;
        assert_eq!(
            edges.iter().map(BoundaryEdge::type_name).collect::<Vec<_>>(),
            vec!["line", "arc", "spline"]
        );
        match &edges[2] {
            BoundaryEdge::Spline {
                knots,
                control_points,
                fit_points,
                end_tangent,
                ..
            } => {
                assert_eq!(knots.len(), 8);
                assert_eq!(control_points.len(), 4);
                assert_eq!(fit_points.len(), 2);
                assert_eq!(*end_tangent, Some(Vector2::new(0.0, -1.0)));
            }
            other => panic!("expected spline, got {other:?}"),
        }
        assert!(hatch.loops[0].source_objects.is_empty());
        assert_eq!(hatch.pattern_scale, 2.0);
        assert_eq!(hatch.pattern_lines.len(), 1);
        assert_eq!(hatch.pattern_lines[0].offset, Vector2::new(-0.088, 0.088));
    }

    #[test]
    fn test_gradient_stops() {
        let t = tags(&[
            (100, "AcDbHatch"),
            (2, "SOLID"),
            (70, "1"),
            (91, "0"),
            (75, "0"),
            (76, "1"),
            (450, "1"),
            (451, "0"),
            (460, "0.5"),
            (461, "0"),
            (452, "0"),
            (462, "1"),
            (453, "2"),
            (463, "0"),
            (63, "5"),
            (421, "255"),
            (463, "1"),
            (63, "2"),
            (470, "LINEAR"),
        ]);
        let hatch = decode(&t);
        let gradient = hatch.gradient.unwrap();
        assert!(gradient.enabled);
        assert_eq!(gradient.name, "LINEAR");
        assert_eq!(gradient.stops.len(), 2);
        assert_eq!(gradient.stops[0].color, Some(Color::from_rgb(0, 0, 255)));
        assert_eq!(gradient.stops[1].color, Some(Color::Index(2)));
    }
}
