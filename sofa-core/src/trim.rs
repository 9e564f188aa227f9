//! End allowances, backrest strips, armrests and corner joints.

use crate::cushions::EPSILON;
use crate::error::LayoutError;
use crate::geometry::{Frame, Point};
use crate::topology::{Boundary, Corner, CornerStyle, End, Run, Segment, Topology};

/// Length of run taken by one armrest.
pub const ARMREST_WIDTH: f64 = 15.0;

/// Thickness of a backrest strip, measured across the run.
pub const BACKREST_THICKNESS: f64 = 10.0;

/// Length consumed at each end of a run before any cushion may sit.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Trim {
    pub start: f64,
    pub end: f64,
}

impl Trim {
    pub fn total(&self) -> f64 {
        self.start + self.end
    }
}

fn backrest_of(topology: &Topology, run: Run) -> f64 {
    if topology.has_backrest(run) {
        BACKREST_THICKNESS
    } else {
        0.0
    }
}

fn corner_of(topology: &Topology, boundary: Boundary) -> Option<&Corner> {
    match boundary {
        Boundary::Corner(at) => topology.corner(at),
        _ => None,
    }
}

/// Offset of the seat from the outer edge of a run.
pub fn seat_offset(segment: &Segment) -> f64 {
    if segment.backrest {
        BACKREST_THICKNESS
    } else {
        0.0
    }
}

/// Allowance at one end of `segment`.
///
/// A mitred corner takes the whole corner square. At a square corner the
/// run passing through loses only the other run's backrest, while the
/// butting run loses the full depth.
pub fn end_allowance(topology: &Topology, segment: &Segment, end: End) -> f64 {
    match segment.boundary(end) {
        Boundary::Armrest => ARMREST_WIDTH,
        Boundary::Open => 0.0,
        Boundary::Corner(at) => match topology.corner(at) {
            Some(corner) => match corner.style {
                CornerStyle::Mitred => topology.depth,
                CornerStyle::Square if corner.through == Some(segment.run) => {
                    backrest_of(topology, corner.other(segment.run))
                }
                CornerStyle::Square => topology.depth,
            },
            None => 0.0,
        },
    }
}

pub fn trim(topology: &Topology, segment: &Segment) -> Trim {
    Trim {
        start: end_allowance(topology, segment, End::Start),
        end: end_allowance(topology, segment, End::End),
    }
}

/// `raw − allowances − meridienne`, refusing to go negative.
pub fn usable_length(segment: &Segment, trim: &Trim, meridienne: f64) -> Result<f64, LayoutError> {
    let usable = segment.length - trim.total() - meridienne;
    if usable < -EPSILON {
        return Err(LayoutError::NegativeUsable {
            raw: segment.length,
            allowances: trim.total() + meridienne,
            usable,
        });
    }
    Ok(usable.max(0.0))
}

/// Checks that the depth leaves a seat and that the corner squares fit
/// inside the runs they belong to.
pub fn check_footprint(topology: &Topology) -> Result<(), LayoutError> {
    let depth = topology.depth;
    if topology.segments.iter().any(|s| s.backrest) && depth <= BACKREST_THICKNESS {
        return Err(LayoutError::DepthTooShallow {
            depth,
            backrest: BACKREST_THICKNESS,
        });
    }
    for seg in &topology.segments {
        let corners = [seg.start, seg.end]
            .into_iter()
            .filter(|b| matches!(b, Boundary::Corner(_)))
            .count();
        let needed = depth * corners as f64;
        if seg.length + EPSILON < needed {
            return Err(LayoutError::CornerFootprint {
                length: seg.length,
                needed,
            }
            .in_run(seg.run));
        }
    }
    Ok(())
}

/// Span of the backrest strip along `segment` before any meridienne is cut out.
pub fn backrest_span(topology: &Topology, segment: &Segment) -> Option<(f64, f64)> {
    if !segment.backrest {
        return None;
    }
    let inset = |end: End| match segment.boundary(end) {
        Boundary::Armrest => ARMREST_WIDTH,
        Boundary::Open => 0.0,
        Boundary::Corner(at) => match topology.corner(at) {
            Some(c) if c.style == CornerStyle::Square && c.through != Some(segment.run) => {
                backrest_of(topology, c.other(segment.run))
            }
            _ => 0.0,
        },
    };
    Some((inset(End::Start), segment.length - inset(End::End)))
}

// Both backrests present at a mitred corner: cut the strip on the diagonal.
fn mitred_at(topology: &Topology, segment: &Segment, end: End) -> bool {
    corner_of(topology, segment.boundary(end)).is_some_and(|c| {
        c.style == CornerStyle::Mitred
            && segment.backrest
            && topology.has_backrest(c.other(segment.run))
    })
}

/// Backrest polygons for the given spans, mitred where a span reaches a
/// mitred corner.
pub fn backrest_polygons(
    topology: &Topology,
    segment: &Segment,
    spans: &[(f64, f64)],
) -> Vec<Vec<Point>> {
    let frame = segment.frame(topology.tx);
    let b = BACKREST_THICKNESS;
    let start_mitre = mitred_at(topology, segment, End::Start);
    let end_mitre = mitred_at(topology, segment, End::End);
    spans
        .iter()
        .filter(|(s0, s1)| s1 - s0 > EPSILON)
        .map(|&(s0, s1)| {
            let inner0 = if start_mitre && s0.abs() <= EPSILON { s0 + b } else { s0 };
            let inner1 = if end_mitre && (segment.length - s1).abs() <= EPSILON {
                s1 - b
            } else {
                s1
            };
            frame.polygon(&[(s0, 0.0), (s1, 0.0), (inner1, b), (inner0, b)])
        })
        .collect()
}

pub fn armrest_polygons(topology: &Topology, segment: &Segment) -> Vec<Vec<Point>> {
    let frame = segment.frame(topology.tx);
    let d = topology.depth;
    let mut out = Vec::new();
    if segment.start == Boundary::Armrest {
        out.push(frame.rect(0.0, ARMREST_WIDTH, 0.0, d));
    }
    if segment.end == Boundary::Armrest {
        out.push(frame.rect(segment.length - ARMREST_WIDTH, segment.length, 0.0, d));
    }
    out
}

/// Seat geometry of one corner.
#[derive(Clone, Debug, PartialEq)]
pub struct CornerJoint {
    pub at: Run,
    pub style: CornerStyle,
    /// One square for a butt join, two triangles split on the diagonal
    /// for a mitre (bottom side first).
    pub pieces: Vec<Vec<Point>>,
}

/// Computes the corner square between the two backrests, in the bottom
/// run's frame, and splits it when the corner is mitred.
pub fn corner_joint(topology: &Topology, corner: &Corner) -> CornerJoint {
    let d = topology.depth;
    let tx = topology.tx;
    let b_bottom = backrest_of(topology, Run::Bottom);
    let b_return = backrest_of(topology, corner.at);
    let (s_out, s_in) = match corner.at {
        Run::Right => (tx - b_return, tx - d),
        _ => (b_return, d),
    };
    // The bottom run's frame is the world frame.
    let frame = Frame::IDENTITY;
    let pieces = match corner.style {
        CornerStyle::Square => vec![frame.polygon(&[
            (s_out, b_bottom),
            (s_in, b_bottom),
            (s_in, d),
            (s_out, d),
        ])],
        CornerStyle::Mitred => vec![
            frame.polygon(&[(s_out, b_bottom), (s_in, b_bottom), (s_in, d)]),
            frame.polygon(&[(s_out, b_bottom), (s_in, d), (s_out, d)]),
        ],
    };
    CornerJoint {
        at: corner.at,
        style: corner.style,
        pieces,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Lengths, OneCornerVariant, ShapeKind, SideFlags, SofaConfiguration};
    use crate::geometry::signed_area;
    use crate::topology::resolve;
    use approx::assert_relative_eq;

    fn topo(shape: ShapeKind, lengths: Lengths) -> Topology {
        let config = SofaConfiguration::new(shape, lengths, 70.0).unwrap();
        resolve(&config).unwrap()
    }

    #[test]
    fn armrests_take_fixed_allowance() {
        let t = topo(ShapeKind::Simple, Lengths::straight(280.0));
        let seg = t.segment(Run::Bottom).unwrap();
        let tr = trim(&t, seg);
        assert_eq!(tr, Trim { start: 15.0, end: 15.0 });
        assert_relative_eq!(usable_length(seg, &tr, 0.0).unwrap(), 250.0);
    }

    #[test]
    fn mitred_corner_takes_full_depth_on_both_runs() {
        let t = topo(ShapeKind::LCorner, Lengths::l(350.0, 250.0));
        let bottom = trim(&t, t.segment(Run::Bottom).unwrap());
        let left = trim(&t, t.segment(Run::Left).unwrap());
        assert_eq!(bottom, Trim { start: 70.0, end: 15.0 });
        assert_eq!(left, Trim { start: 70.0, end: 15.0 });
    }

    #[test]
    fn square_corner_favours_the_run_passing_through() {
        let t = topo(ShapeKind::LNoCorner, Lengths::l(350.0, 250.0));
        assert_eq!(trim(&t, t.segment(Run::Bottom).unwrap()).start, BACKREST_THICKNESS);
        assert_eq!(trim(&t, t.segment(Run::Left).unwrap()).start, 70.0);
    }

    #[test]
    fn square_corner_lets_a_return_pass_through() {
        let lengths = Lengths::u(350.0, 300.0, 280.0);
        let t = topo(ShapeKind::UOneCorner(OneCornerVariant::V2), lengths);
        let bottom = t.segment(Run::Bottom).unwrap();
        let right = t.segment(Run::Right).unwrap();
        assert_eq!(trim(&t, bottom), Trim { start: 70.0, end: 70.0 });
        assert_eq!(trim(&t, right), Trim { start: 10.0, end: 15.0 });
        assert_eq!(backrest_span(&t, bottom), Some((0.0, 340.0)));
        assert_eq!(backrest_span(&t, right), Some((0.0, 265.0)));
        let square = t.corner(Run::Right).unwrap();
        let joint = corner_joint(&t, square);
        assert_eq!(joint.style, CornerStyle::Square);
        assert_eq!(joint.pieces.len(), 1);
        assert_relative_eq!(signed_area(&joint.pieces[0]), 60.0 * 60.0);
        for p in [Point::new(280.0, 10.0), Point::new(340.0, 70.0)] {
            assert!(joint.pieces[0].contains(&p), "{p:?}");
        }

        let t = topo(ShapeKind::UOneCorner(OneCornerVariant::V4), lengths);
        let bottom = t.segment(Run::Bottom).unwrap();
        let left = t.segment(Run::Left).unwrap();
        assert_eq!(trim(&t, left), Trim { start: 10.0, end: 15.0 });
        assert_eq!(trim(&t, bottom).start, 70.0);
        assert_eq!(backrest_span(&t, left), Some((0.0, 285.0)));
        assert_eq!(backrest_span(&t, bottom).map(|(s, _)| s), Some(10.0));
        let joint = corner_joint(&t, t.corner(Run::Left).unwrap());
        assert_relative_eq!(signed_area(&joint.pieces[0]), 60.0 * 60.0);
    }

    #[test]
    fn negative_usable_is_infeasible() {
        let t = topo(ShapeKind::Simple, Lengths::straight(20.0));
        let seg = t.segment(Run::Bottom).unwrap();
        let err = usable_length(seg, &trim(&t, seg), 0.0).unwrap_err();
        assert!(matches!(err, LayoutError::NegativeUsable { .. }));
    }

    #[test]
    fn u_bottom_must_hold_both_corner_squares() {
        let t = topo(ShapeKind::UTwoCorner, Lengths::u(120.0, 300.0, 300.0));
        let err = check_footprint(&t).unwrap_err();
        assert_eq!(
            err.root(),
            &LayoutError::CornerFootprint {
                length: 120.0,
                needed: 140.0
            }
        );
    }

    #[test]
    fn mitred_backrests_share_the_diagonal() {
        let t = topo(ShapeKind::LCorner, Lengths::l(350.0, 250.0));
        let bottom = t.segment(Run::Bottom).unwrap();
        let left = t.segment(Run::Left).unwrap();
        let bp = backrest_polygons(&t, bottom, &[backrest_span(&t, bottom).unwrap()]);
        let lp = backrest_polygons(&t, left, &[backrest_span(&t, left).unwrap()]);
        let diagonal = [Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        for poly in [&bp[0], &lp[0]] {
            for p in &diagonal {
                assert!(poly.contains(p), "{poly:?} misses {p:?}");
            }
        }
    }

    #[test]
    fn square_corner_backrests_butt_without_overlap() {
        let t = topo(ShapeKind::LNoCorner, Lengths::l(350.0, 250.0));
        let bottom = t.segment(Run::Bottom).unwrap();
        let left = t.segment(Run::Left).unwrap();
        assert_eq!(backrest_span(&t, bottom), Some((0.0, 335.0)));
        assert_eq!(backrest_span(&t, left), Some((10.0, 235.0)));
    }

    #[test]
    fn mitred_joint_splits_the_corner_square() {
        let t = topo(ShapeKind::UTwoCorner, Lengths::u(350.0, 300.0, 280.0));
        for corner in &t.corners {
            let joint = corner_joint(&t, corner);
            assert_eq!(joint.pieces.len(), 2);
            let area: f64 = joint.pieces.iter().map(|p| signed_area(p)).sum();
            assert_relative_eq!(area, 60.0 * 60.0);
        }
    }

    #[test]
    fn joint_follows_missing_backrests() {
        let config = SofaConfiguration::new(ShapeKind::LNoCorner, Lengths::l(350.0, 250.0), 70.0)
            .unwrap()
            .with_backrests(SideFlags::none());
        let t = resolve(&config).unwrap();
        let joint = corner_joint(&t, &t.corners[0]);
        assert_eq!(joint.pieces.len(), 1);
        assert_relative_eq!(signed_area(&joint.pieces[0]), 70.0 * 70.0);
        assert_eq!(trim(&t, t.segment(Run::Bottom).unwrap()).start, 0.0);
    }
}
