//! Assembles a laid-out sofa into colored, labeled polygons.
//!
//! Everything is in centimeters with y up. [`compose`] shifts the result
//! so the content starts at [`MARGIN`] and reserves a band on top for the
//! title.

use serde::Serialize;

use crate::config::fmt_cm;
use crate::geometry::{Bounds, Point, bounds_of, translate_geom, union_bounds};
use crate::layout::Layout;
use crate::palette::{ColorRole, Palette};
use crate::topology::{Run, Topology};
use crate::trim;

/// Blank space around the drawing.
pub const MARGIN: f64 = 15.0;

/// Height reserved above the drawing for the title.
pub const TITLE_BAND: f64 = 20.0;

/// Distance between an outline edge and its dimension line.
pub const DIMENSION_OFFSET: f64 = 12.0;

// Labels sit this far beyond their dimension line.
const LABEL_GAP: f64 = 5.0;

/// Drawing layer of a part, in paint order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PartKind {
    Frame,
    CornerJoint,
    Backrest,
    Armrest,
    Meridienne,
    Cushion,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Part {
    pub kind: PartKind,
    pub role: ColorRole,
    pub fill: String,
    pub run: Option<Run>,
    pub points: Vec<Point>,
    pub caption: Option<String>,
}

/// A dimension call-out: a line between two points with a centered label.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dimension {
    pub start: Point,
    pub end: Point,
    pub label: String,
    pub label_at: Point,
    pub vertical: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scene {
    pub parts: Vec<Part>,
    pub dimensions: Vec<Dimension>,
    /// Overall size in centimeters, title band included.
    pub width: f64,
    pub height: f64,
}

impl Scene {
    pub fn parts_of(&self, kind: PartKind) -> impl Iterator<Item = &Part> {
        self.parts.iter().filter(move |p| p.kind == kind)
    }

    /// Where the title is centered.
    pub fn title_anchor(&self) -> Point {
        Point::new(self.width / 2.0, self.height - TITLE_BAND / 2.0)
    }
}

/// Outer outline of the whole sofa as one simple polygon.
pub fn outline(topology: &Topology) -> Vec<Point> {
    let d = topology.depth;
    let tx = topology.tx;
    let len = |run| topology.segment(run).map_or(0.0, |s| s.length);
    let pts: Vec<(f64, f64)> = match (topology.segment(Run::Left), topology.segment(Run::Right)) {
        (Some(_), Some(_)) => {
            let (ty, tz) = (len(Run::Left), len(Run::Right));
            vec![
                (0.0, 0.0),
                (tx, 0.0),
                (tx, tz),
                (tx - d, tz),
                (tx - d, d),
                (d, d),
                (d, ty),
                (0.0, ty),
            ]
        }
        (Some(_), None) => {
            let ty = len(Run::Left);
            vec![(0.0, 0.0), (tx, 0.0), (tx, d), (d, d), (d, ty), (0.0, ty)]
        }
        _ => vec![(0.0, 0.0), (tx, 0.0), (tx, d), (0.0, d)],
    };
    pts.into_iter().map(Point::from).collect()
}

fn dimensions(topology: &Topology) -> Vec<Dimension> {
    let off = DIMENSION_OFFSET;
    let d = topology.depth;
    let tx = topology.tx;
    let label = |v: f64| format!("{} cm", fmt_cm(v));
    let mut out = vec![Dimension {
        start: Point::new(0.0, -off),
        end: Point::new(tx, -off),
        label: label(tx),
        label_at: Point::new(tx / 2.0, -off - LABEL_GAP),
        vertical: false,
    }];
    if let Some(left) = topology.segment(Run::Left) {
        let ty = left.length;
        out.push(Dimension {
            start: Point::new(-off, 0.0),
            end: Point::new(-off, ty),
            label: label(ty),
            label_at: Point::new(-off - LABEL_GAP, ty / 2.0),
            vertical: true,
        });
        out.push(Dimension {
            start: Point::new(0.0, ty + off),
            end: Point::new(d, ty + off),
            label: label(d),
            label_at: Point::new(d / 2.0, ty + off + LABEL_GAP),
            vertical: false,
        });
    } else {
        out.push(Dimension {
            start: Point::new(-off, 0.0),
            end: Point::new(-off, d),
            label: label(d),
            label_at: Point::new(-off - LABEL_GAP, d / 2.0),
            vertical: true,
        });
    }
    if let Some(right) = topology.segment(Run::Right) {
        let tz = right.length;
        out.push(Dimension {
            start: Point::new(tx + off, 0.0),
            end: Point::new(tx + off, tz),
            label: label(tz),
            label_at: Point::new(tx + off + LABEL_GAP, tz / 2.0),
            vertical: true,
        });
    }
    out
}

fn part(
    kind: PartKind,
    role: ColorRole,
    palette: &Palette,
    run: Option<Run>,
    points: Vec<Point>,
) -> Part {
    Part {
        kind,
        role,
        fill: palette.color(role).to_string(),
        run,
        points,
        caption: None,
    }
}

/// Builds the scene for `layout`, painting each part with `palette`.
pub fn compose(layout: &Layout, palette: &Palette) -> Scene {
    let topo = &layout.topology;
    let d = topo.depth;
    let mut parts = vec![part(PartKind::Frame, ColorRole::Seat, palette, None, outline(topo))];

    for joint in &layout.joints {
        for piece in &joint.pieces {
            parts.push(part(
                PartKind::CornerJoint,
                ColorRole::Seat,
                palette,
                Some(joint.at),
                piece.clone(),
            ));
        }
    }
    for (seg, planned) in topo.segments.iter().zip(&layout.segments) {
        for poly in trim::backrest_polygons(topo, seg, &planned.backrest_spans) {
            parts.push(part(PartKind::Backrest, ColorRole::Backrest, palette, Some(seg.run), poly));
        }
    }
    for seg in &topo.segments {
        for poly in trim::armrest_polygons(topo, seg) {
            parts.push(part(PartKind::Armrest, ColorRole::Armrest, palette, Some(seg.run), poly));
        }
    }
    for (seg, planned) in topo.segments.iter().zip(&layout.segments) {
        if let Some(block) = planned.meridienne {
            let (s0, s1) = block.span();
            let mut p = part(
                PartKind::Meridienne,
                ColorRole::Seat,
                palette,
                Some(seg.run),
                seg.frame(topo.tx).rect(s0, s1, 0.0, d),
            );
            p.caption = Some("meridienne".to_string());
            parts.push(p);
        }
    }
    for (seg, planned) in topo.segments.iter().zip(&layout.segments) {
        let frame = seg.frame(topo.tx);
        for m in &planned.cushions {
            let mut p = part(
                PartKind::Cushion,
                ColorRole::Cushion,
                palette,
                Some(seg.run),
                frame.rect(m.offset, m.offset + m.width, planned.seat_offset, d),
            );
            p.caption = Some(fmt_cm(m.width));
            parts.push(p);
        }
    }

    normalize(parts, dimensions(topo))
}

fn normalize(mut parts: Vec<Part>, mut dims: Vec<Dimension>) -> Scene {
    let mut bounds: Option<Bounds> = None;
    let mut grow = |b: Bounds| bounds = Some(bounds.map_or(b, |a| union_bounds(a, b)));
    for p in &parts {
        grow(bounds_of(&p.points));
    }
    for dim in &dims {
        grow(bounds_of(&[dim.start, dim.end, dim.label_at]));
    }
    let (minx, miny, maxx, maxy) = bounds.unwrap_or((0.0, 0.0, 0.0, 0.0));
    let (dx, dy) = (MARGIN - minx, MARGIN - miny);
    for p in &mut parts {
        p.points = translate_geom(&p.points, dx, dy);
    }
    let shift = |q: Point| Point::new(q.x + dx, q.y + dy);
    for dim in &mut dims {
        dim.start = shift(dim.start);
        dim.end = shift(dim.end);
        dim.label_at = shift(dim.label_at);
    }
    Scene {
        parts,
        dimensions: dims,
        width: maxx - minx + 2.0 * MARGIN,
        height: maxy - miny + 2.0 * MARGIN + TITLE_BAND,
    }
}
