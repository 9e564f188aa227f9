//! Per-run layout: allowances, meridienne, cushions and backrest spans.

use tracing::debug;

use crate::config::SofaConfiguration;
use crate::cushions::{self, CushionModule};
use crate::error::{LayoutError, Result};
use crate::meridienne::{self, MeridienneBlock};
use crate::topology::{self, End, Run, Topology};
use crate::trim::{self, CornerJoint, Trim};

#[derive(Clone, Debug, PartialEq)]
pub struct SegmentLayout {
    pub run: Run,
    pub raw_length: f64,
    pub trim: Trim,
    /// Length tiled with cushions.
    pub usable: f64,
    /// Seat depth offset from the outer edge (the backrest thickness or 0).
    pub seat_offset: f64,
    pub cushions: Vec<CushionModule>,
    pub meridienne: Option<MeridienneBlock>,
    pub backrest_spans: Vec<(f64, f64)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub topology: Topology,
    pub segments: Vec<SegmentLayout>,
    pub joints: Vec<CornerJoint>,
}

impl Layout {
    pub fn segment(&self, run: Run) -> Option<&SegmentLayout> {
        self.segments.iter().find(|s| s.run == run)
    }
}

/// Lays out every run of `config`.
pub fn plan(config: &SofaConfiguration) -> Result<Layout> {
    let topo = topology::resolve(config)?;
    trim::check_footprint(&topo)?;
    let placed = config
        .meridienne()
        .map(|m| meridienne::placement(config.shape(), m.side).map(|at| (at, m.length)))
        .transpose()?;

    let mut segments = Vec::with_capacity(topo.segments.len());
    for seg in &topo.segments {
        let in_run = |e: LayoutError| e.in_run(seg.run);
        let trim = trim::trim(&topo, seg);
        let mut usable = trim::usable_length(seg, &trim, 0.0).map_err(in_run)?;
        let mut block = None;
        if let Some(((_, end), length)) = placed.filter(|((run, _), _)| *run == seg.run) {
            let (rest, b) = meridienne::apply(seg, &trim, end, length).map_err(in_run)?;
            usable = rest;
            block = Some(b);
        }
        let widths = cushions::tile(usable, config.cushions()).map_err(in_run)?;
        // Cushions start after the start allowance, or after a meridienne placed there.
        let start = match block {
            Some(b) if b.end == End::Start => b.offset + b.length,
            _ => trim.start,
        };
        let mut backrest_spans: Vec<(f64, f64)> =
            trim::backrest_span(&topo, seg).into_iter().collect();
        if let Some(b) = block {
            backrest_spans = meridienne::excise(&backrest_spans, b.span());
        }
        debug!(
            run = %seg.run,
            raw = seg.length,
            start = trim.start,
            end = trim.end,
            usable,
            cushions = ?widths,
            "laid out run"
        );
        segments.push(SegmentLayout {
            run: seg.run,
            raw_length: seg.length,
            trim,
            usable,
            seat_offset: trim::seat_offset(seg),
            cushions: cushions::place(start, &widths),
            meridienne: block,
            backrest_spans,
        });
    }
    let joints = topo
        .corners
        .iter()
        .map(|c| trim::corner_joint(&topo, c))
        .collect();
    Ok(Layout {
        topology: topo,
        segments,
        joints,
    })
}
