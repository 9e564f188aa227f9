//! Open, backless seating cut out of one free end of a run.

use serde::Serialize;

use crate::config::{ShapeKind, Side};
use crate::cushions::EPSILON;
use crate::error::{ConfigurationError, LayoutError};
use crate::topology::{End, Run, Segment};
use crate::trim::Trim;

/// The run end a meridienne on `side` occupies for `shape`.
pub fn placement(shape: ShapeKind, side: Side) -> Result<(Run, End), ConfigurationError> {
    let left = shape.has_left_return();
    let right = shape.has_right_return();
    match (side, left, right) {
        (Side::Left, false, _) => Ok((Run::Bottom, End::Start)),
        (Side::Right | Side::Bottom, false, _) => Ok((Run::Bottom, End::End)),
        (Side::Left, true, _) => Ok((Run::Left, End::End)),
        (Side::Bottom, true, false) => Ok((Run::Bottom, End::End)),
        (Side::Right, true, true) => Ok((Run::Right, End::End)),
        (side, _, _) => Err(ConfigurationError::MeridienneSide {
            side: side.to_string(),
            shape: shape.id(),
        }),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MeridienneBlock {
    pub run: Run,
    #[serde(skip)]
    pub end: End,
    /// Distance from the run start to the near edge of the block.
    pub offset: f64,
    pub length: f64,
}

impl MeridienneBlock {
    /// Sub-run `(from, to)` along the segment.
    pub fn span(&self) -> (f64, f64) {
        (self.offset, self.offset + self.length)
    }
}

/// Excises `length` at `end` of `segment`, inside the end allowance.
///
/// Returns the length left for cushions and the placed block.
pub fn apply(
    segment: &Segment,
    trim: &Trim,
    end: End,
    length: f64,
) -> Result<(f64, MeridienneBlock), LayoutError> {
    let available = segment.length - trim.total();
    if length > available + EPSILON {
        return Err(LayoutError::MeridienneTooLong {
            length,
            available: available.max(0.0),
        });
    }
    let offset = match end {
        End::Start => trim.start,
        End::End => segment.length - trim.end - length,
    };
    let block = MeridienneBlock {
        run: segment.run,
        end,
        offset,
        length,
    };
    Ok(((available - length).max(0.0), block))
}

/// Removes `cut` from every span, dropping pieces that vanish.
pub fn excise(spans: &[(f64, f64)], cut: (f64, f64)) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(spans.len() + 1);
    for &(a, b) in spans {
        if cut.1 <= a || cut.0 >= b {
            out.push((a, b));
            continue;
        }
        if cut.0 - a > EPSILON {
            out.push((a, cut.0));
        }
        if b - cut.1 > EPSILON {
            out.push((cut.1, b));
        }
    }
    out
}
