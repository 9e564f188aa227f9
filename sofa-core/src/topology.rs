//! Shape topology: which straight runs a sofa has and how they meet.
//!
//! Every shape kind maps onto a fixed table of runs and corners. Shape
//! specific behavior lives in that table, never in the drawing code.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::config::{Lengths, ShapeKind, SofaConfiguration};
use crate::error::ConfigurationError;
use crate::geometry::{Frame, Point};

/// Identity of a straight run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Run {
    Left,
    Bottom,
    Right,
}

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Run::Left => "left",
            Run::Bottom => "bottom",
            Run::Right => "right",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthName {
    Tx,
    Ty,
    Tz,
}

impl fmt::Display for LengthName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LengthName::Tx => "tx",
            LengthName::Ty => "ty",
            LengthName::Tz => "tz",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum End {
    Start,
    End,
}

/// What occupies one end of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
    Armrest,
    Open,
    /// The corner shared with the return on this side.
    Corner(Run),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CornerStyle {
    /// No corner module: one run passes through, the other butts against it.
    Square,
    /// Dedicated corner module cut on the diagonal.
    Mitred,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Corner {
    /// The return run meeting the bottom run here (`Left` or `Right`).
    pub at: Run,
    pub style: CornerStyle,
    /// Run whose seat and backrest continue through a square corner.
    pub through: Option<Run>,
}

impl Corner {
    const fn square(at: Run, through: Run) -> Self {
        Corner {
            at,
            style: CornerStyle::Square,
            through: Some(through),
        }
    }

    const fn mitred(at: Run) -> Self {
        Corner {
            at,
            style: CornerStyle::Mitred,
            through: None,
        }
    }

    /// The other run meeting `run` at this corner.
    pub fn other(&self, run: Run) -> Run {
        if run == Run::Bottom { self.at } else { Run::Bottom }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub run: Run,
    pub length_name: LengthName,
    pub length: f64,
    pub start: Boundary,
    pub end: Boundary,
    pub backrest: bool,
}

impl Segment {
    pub fn boundary(&self, end: End) -> Boundary {
        match end {
            End::Start => self.start,
            End::End => self.end,
        }
    }

    /// Local frame: the bottom run goes left to right along y = 0, the
    /// returns go up from their corner with the backrest on the outside.
    pub fn frame(&self, tx: f64) -> Frame {
        match self.run {
            Run::Bottom => Frame::IDENTITY,
            Run::Left => Frame {
                origin: Point::new(0.0, 0.0),
                along: Point::new(0.0, 1.0),
                inward: Point::new(1.0, 0.0),
            },
            Run::Right => Frame {
                origin: Point::new(tx, 0.0),
                along: Point::new(0.0, 1.0),
                inward: Point::new(-1.0, 0.0),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Topology {
    pub shape: ShapeKind,
    pub tx: f64,
    pub depth: f64,
    pub segments: Vec<Segment>,
    pub corners: Vec<Corner>,
}

impl Topology {
    pub fn segment(&self, run: Run) -> Option<&Segment> {
        self.segments.iter().find(|s| s.run == run)
    }

    pub fn corner(&self, at: Run) -> Option<&Corner> {
        self.corners.iter().find(|c| c.at == at)
    }

    pub fn has_backrest(&self, run: Run) -> bool {
        self.segment(run).is_some_and(|s| s.backrest)
    }
}

struct ShapeTable {
    runs: &'static [Run],
    left: Option<Corner>,
    right: Option<Corner>,
}

const STRAIGHT: &[Run] = &[Run::Bottom];
const L_RUNS: &[Run] = &[Run::Left, Run::Bottom];
const U_RUNS: &[Run] = &[Run::Left, Run::Bottom, Run::Right];

fn table(shape: ShapeKind) -> ShapeTable {
    use crate::config::OneCornerVariant::*;
    let (runs, left, right) = match shape {
        ShapeKind::Simple => (STRAIGHT, None, None),
        ShapeKind::LNoCorner => (L_RUNS, Some(Corner::square(Run::Left, Run::Bottom)), None),
        ShapeKind::LCorner => (L_RUNS, Some(Corner::mitred(Run::Left)), None),
        ShapeKind::UNoCorner => (
            U_RUNS,
            Some(Corner::square(Run::Left, Run::Bottom)),
            Some(Corner::square(Run::Right, Run::Bottom)),
        ),
        ShapeKind::UOneCorner(V1) => (
            U_RUNS,
            Some(Corner::mitred(Run::Left)),
            Some(Corner::square(Run::Right, Run::Bottom)),
        ),
        ShapeKind::UOneCorner(V2) => (
            U_RUNS,
            Some(Corner::mitred(Run::Left)),
            Some(Corner::square(Run::Right, Run::Right)),
        ),
        ShapeKind::UOneCorner(V3) => (
            U_RUNS,
            Some(Corner::square(Run::Left, Run::Bottom)),
            Some(Corner::mitred(Run::Right)),
        ),
        ShapeKind::UOneCorner(V4) => (
            U_RUNS,
            Some(Corner::square(Run::Left, Run::Left)),
            Some(Corner::mitred(Run::Right)),
        ),
        ShapeKind::UTwoCorner => (
            U_RUNS,
            Some(Corner::mitred(Run::Left)),
            Some(Corner::mitred(Run::Right)),
        ),
    };
    ShapeTable { runs, left, right }
}

fn length_name(run: Run) -> LengthName {
    match run {
        Run::Bottom => LengthName::Tx,
        Run::Left => LengthName::Ty,
        Run::Right => LengthName::Tz,
    }
}

/// Longest length accepted anywhere in a configuration, in centimeters.
pub const MAX_LENGTH: f64 = 100_000.0;

pub(crate) fn check_length(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(ConfigurationError::NonPositive { name, value });
    }
    if value > MAX_LENGTH {
        return Err(ConfigurationError::TooLong {
            name,
            value,
            max: MAX_LENGTH,
        });
    }
    Ok(())
}

/// Checks that exactly the lengths `shape` needs are supplied, and that
/// they are positive and below [`MAX_LENGTH`].
pub fn check_lengths(shape: ShapeKind, lengths: &Lengths) -> Result<(), ConfigurationError> {
    let wanted = [
        (LengthName::Tx, true, "tx"),
        (LengthName::Ty, shape.has_left_return(), "ty"),
        (LengthName::Tz, shape.has_right_return(), "tz"),
    ];
    for (name, required, label) in wanted {
        match (lengths.get(name), required) {
            (Some(v), true) => check_length(label, v)?,
            (None, true) => {
                return Err(ConfigurationError::MissingLength {
                    shape: shape.id(),
                    length: name,
                });
            }
            (Some(_), false) => {
                return Err(ConfigurationError::UnexpectedLength {
                    shape: shape.id(),
                    length: name,
                });
            }
            (None, false) => {}
        }
    }
    Ok(())
}

/// Builds the bare topology of a shape: every run with a backrest and no
/// armrests at its free ends.
pub fn resolve_shape(
    shape: ShapeKind,
    lengths: &Lengths,
    depth: f64,
) -> Result<Topology, ConfigurationError> {
    check_lengths(shape, lengths)?;
    check_length("depth", depth)?;
    let t = table(shape);
    let mut segments = Vec::with_capacity(t.runs.len());
    for &run in t.runs {
        let name = length_name(run);
        let length = lengths.get(name).ok_or(ConfigurationError::MissingLength {
            shape: shape.id(),
            length: name,
        })?;
        let (start, end) = match run {
            Run::Bottom => (
                t.left.map_or(Boundary::Open, |c| Boundary::Corner(c.at)),
                t.right.map_or(Boundary::Open, |c| Boundary::Corner(c.at)),
            ),
            Run::Left | Run::Right => (Boundary::Corner(run), Boundary::Open),
        };
        segments.push(Segment {
            run,
            length_name: name,
            length,
            start,
            end,
            backrest: true,
        });
    }
    let corners = t.left.into_iter().chain(t.right).collect();
    Ok(Topology {
        shape,
        tx: lengths.tx,
        depth,
        segments,
        corners,
    })
}

/// Resolves a configuration into runs and corners, applying its armrest
/// and backrest flags. Flags for sides the shape does not have are ignored.
pub fn resolve(config: &SofaConfiguration) -> Result<Topology, ConfigurationError> {
    let shape = config.shape();
    let mut topo = resolve_shape(shape, config.lengths(), config.depth())?;
    let arms = config.armrests();
    let backs = config.backrests();
    let armrest = |present: bool| {
        if present {
            Boundary::Armrest
        } else {
            Boundary::Open
        }
    };
    for seg in &mut topo.segments {
        match seg.run {
            Run::Left => {
                seg.end = armrest(arms.left);
                seg.backrest = backs.left;
            }
            Run::Right => {
                seg.end = armrest(arms.right);
                seg.backrest = backs.right;
            }
            Run::Bottom => {
                seg.backrest = backs.bottom;
                if seg.start == Boundary::Open {
                    seg.start = armrest(arms.left);
                }
                if seg.end == Boundary::Open {
                    // An L closes its bottom run with the "bottom" armrest.
                    let present = if shape.has_left_return() {
                        arms.bottom
                    } else {
                        arms.right
                    };
                    seg.end = armrest(present);
                }
            }
        }
    }
    debug!(
        shape = %shape,
        segments = topo.segments.len(),
        corners = topo.corners.len(),
        "resolved topology"
    );
    Ok(topo)
}
