use serde::{Deserialize, Serialize};

/// A point in centimeters, y pointing up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from(v: (f64, f64)) -> Self {
        Point { x: v.0, y: v.1 }
    }
}

/// Axis-aligned bounds as (min x, min y, max x, max y).
pub type Bounds = (f64, f64, f64, f64);

pub fn translate_geom(pts: &[Point], dx: f64, dy: f64) -> Vec<Point> {
    pts.iter()
        .map(|p| Point {
            x: p.x + dx,
            y: p.y + dy,
        })
        .collect()
}

pub fn bounds_of(pts: &[Point]) -> Bounds {
    let mut minx = f64::INFINITY;
    let mut miny = f64::INFINITY;
    let mut maxx = f64::NEG_INFINITY;
    let mut maxy = f64::NEG_INFINITY;
    for p in pts {
        minx = minx.min(p.x);
        miny = miny.min(p.y);
        maxx = maxx.max(p.x);
        maxy = maxy.max(p.y);
    }
    (minx, miny, maxx, maxy)
}

pub fn union_bounds(a: Bounds, b: Bounds) -> Bounds {
    (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3))
}

/// Signed shoelace area; positive for counter-clockwise polygons.
pub fn signed_area(pts: &[Point]) -> f64 {
    let n = pts.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += pts[i].x * pts[j].y - pts[j].x * pts[i].y;
    }
    sum * 0.5
}

pub fn centroid(pts: &[Point]) -> Point {
    let n = pts.len().max(1) as f64;
    let sum = pts.iter().fold(Point::default(), |acc, q| Point {
        x: acc.x + q.x,
        y: acc.y + q.y,
    });
    Point {
        x: sum.x / n,
        y: sum.y / n,
    }
}

/// Local frame of a straight run.
///
/// `s` is measured along the run from its start, `t` inward from the
/// outer (backrest) edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub origin: Point,
    pub along: Point,
    pub inward: Point,
}

impl Frame {
    pub const IDENTITY: Frame = Frame {
        origin: Point::new(0.0, 0.0),
        along: Point::new(1.0, 0.0),
        inward: Point::new(0.0, 1.0),
    };

    pub fn point(&self, s: f64, t: f64) -> Point {
        Point {
            x: self.origin.x + self.along.x * s + self.inward.x * t,
            y: self.origin.y + self.along.y * s + self.inward.y * t,
        }
    }

    /// Quad covering `s0..s1` by `t0..t1`, counter-clockwise in world space.
    pub fn rect(&self, s0: f64, s1: f64, t0: f64, t1: f64) -> Vec<Point> {
        self.polygon(&[(s0, t0), (s1, t0), (s1, t1), (s0, t1)])
    }

    pub fn polygon(&self, local: &[(f64, f64)]) -> Vec<Point> {
        let mut pts: Vec<Point> = local.iter().map(|&(s, t)| self.point(s, t)).collect();
        if signed_area(&pts) < 0.0 {
            pts.reverse();
        }
        pts
    }
}
