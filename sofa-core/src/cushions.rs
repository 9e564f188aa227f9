//! Seat cushion tiling along one run.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{ConfigurationError, LayoutError};
use crate::topology::MAX_LENGTH;

/// A module may shrink to this fraction of its nominal width, no further.
pub const MIN_WIDTH_RATIO: f64 = 0.75;

/// Gap left between neighbouring modules.
pub const CLEARANCE: f64 = 0.0;

/// Below this a usable length counts as zero.
pub const EPSILON: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum CushionSize {
    W65,
    W80,
    W90,
    Valise,
    Petit,
    Grand,
}

/// Standard widths searched by the automatic policy, widest first.
pub const CATALOG: [CushionSize; 3] = [CushionSize::W90, CushionSize::W80, CushionSize::W65];

impl CushionSize {
    pub fn nominal(self) -> f64 {
        match self {
            CushionSize::W65 => 65.0,
            CushionSize::W80 => 80.0,
            CushionSize::W90 => 90.0,
            CushionSize::Valise => 70.0,
            CushionSize::Petit => 60.0,
            CushionSize::Grand => 100.0,
        }
    }

    pub fn minimum(self) -> f64 {
        self.nominal() * MIN_WIDTH_RATIO
    }

    pub fn id(self) -> &'static str {
        match self {
            CushionSize::W65 => "65",
            CushionSize::W80 => "80",
            CushionSize::W90 => "90",
            CushionSize::Valise => "valise",
            CushionSize::Petit => "p",
            CushionSize::Grand => "g",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum CushionPolicy {
    Auto,
    Fixed(CushionSize),
}

impl CushionPolicy {
    /// Narrowest module this policy may produce.
    pub fn minimum(self) -> f64 {
        match self {
            CushionPolicy::Auto => CushionSize::W65.minimum(),
            CushionPolicy::Fixed(size) => size.minimum(),
        }
    }
}

impl fmt::Display for CushionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CushionPolicy::Auto => f.write_str("auto"),
            CushionPolicy::Fixed(size) => f.write_str(size.id()),
        }
    }
}

impl From<CushionPolicy> for String {
    fn from(policy: CushionPolicy) -> Self {
        policy.to_string()
    }
}

impl FromStr for CushionPolicy {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let size = match s.trim().to_ascii_lowercase().as_str() {
            "auto" => return Ok(CushionPolicy::Auto),
            "65" => CushionSize::W65,
            "80" => CushionSize::W80,
            "90" => CushionSize::W90,
            "valise" => CushionSize::Valise,
            "p" => CushionSize::Petit,
            "g" => CushionSize::Grand,
            _ => return Err(ConfigurationError::UnknownCushionPolicy(s.to_string())),
        };
        Ok(CushionPolicy::Fixed(size))
    }
}

/// One placed seat cushion. `offset` is measured along the run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CushionModule {
    pub offset: f64,
    pub width: f64,
}

/// Tiles `usable` centimeters with modules drawn from `policy`.
///
/// The widths plus the clearances between them add up to `usable`.
pub fn tile(usable: f64, policy: CushionPolicy) -> Result<Vec<f64>, LayoutError> {
    if usable.abs() <= EPSILON {
        return Ok(Vec::new());
    }
    if usable > MAX_LENGTH {
        return Err(LayoutError::RunTooLong {
            usable,
            max: MAX_LENGTH,
        });
    }
    let minimum = policy.minimum();
    if usable < minimum {
        return Err(LayoutError::BelowMinimumModule { usable, minimum });
    }
    match policy {
        CushionPolicy::Fixed(size) => Ok(fixed(usable, size)),
        CushionPolicy::Auto => auto(usable),
    }
}

/// Lays widths end to end starting at `start`.
pub fn place(start: f64, widths: &[f64]) -> Vec<CushionModule> {
    let mut offset = start;
    widths
        .iter()
        .map(|&width| {
            let m = CushionModule { offset, width };
            offset += width + CLEARANCE;
            m
        })
        .collect()
}

fn share(usable: f64, n: usize) -> f64 {
    (usable - (n as f64 - 1.0) * CLEARANCE) / n as f64
}

// Floor count or one more, whichever keeps modules closest to nominal.
fn fixed(usable: f64, size: CushionSize) -> Vec<f64> {
    let w = size.nominal();
    let floor = (((usable + CLEARANCE) / (w + CLEARANCE)).floor() as usize).max(1);
    let mut best = (floor, (share(usable, floor) - w).abs());
    let n = floor + 1;
    let width = share(usable, n);
    if width >= size.minimum() && (width - w).abs() < best.1 {
        best = (n, (width - w).abs());
    }
    vec![share(usable, best.0); best.0]
}

/// Module counts per catalog width, widest first.
type Counts = [usize; 3];

type AutoKey = (i64, u32, usize, Reverse<u32>, Reverse<(usize, usize)>);

// Ranks one multiset, or `None` when the remainder would squeeze a module
// under its minimum width.
fn auto_key(usable: f64, counts: Counts) -> Option<AutoKey> {
    let n: usize = counts.iter().sum();
    let present = || {
        CATALOG
            .iter()
            .zip(counts)
            .filter(|(_, c)| *c > 0)
            .map(|(s, _)| *s)
    };
    let sum: f64 = CATALOG
        .iter()
        .zip(counts)
        .map(|(s, c)| s.nominal() * c as f64)
        .sum();
    let remainder = usable - sum - (n as f64 - 1.0) * CLEARANCE;
    let extra = remainder / n as f64;
    if present().any(|s| s.nominal() + extra < s.minimum()) {
        return None;
    }
    let max = present().map(|s| s.nominal() as u32).max()?;
    let min = present().map(|s| s.nominal() as u32).min()?;
    // With equal counts, more wide then more mid modules sorts the widths
    // higher in descending order.
    Some((
        (remainder.abs() * 100.0).round() as i64,
        max - min,
        n,
        Reverse(min),
        Reverse((counts[0], counts[1])),
    ))
}

fn auto(usable: f64) -> Result<Vec<f64>, LayoutError> {
    let [wide, mid, narrow] = CATALOG;
    let step = mid.nominal() - narrow.nominal();
    let max_n = (usable / narrow.nominal()).floor() as usize + 1;
    let mut best: Option<(AutoKey, Counts)> = None;
    for n in 1..=max_n {
        for w in 0..=n {
            // Each mid module in place of a narrow one lowers the remainder by
            // `step`; only the counts on either side of zero can rank first.
            let base = usable
                - w as f64 * wide.nominal()
                - (n - w) as f64 * narrow.nominal()
                - (n as f64 - 1.0) * CLEARANCE;
            let ideal = (base / step).clamp(0.0, (n - w) as f64);
            for m in [ideal.floor() as usize, ideal.ceil() as usize] {
                let counts = [w, m, n - w - m];
                let Some(key) = auto_key(usable, counts) else {
                    continue;
                };
                if best.as_ref().is_none_or(|(k, _)| key < *k) {
                    best = Some((key, counts));
                }
            }
        }
    }
    let (_, counts) = best.ok_or(LayoutError::BelowMinimumModule {
        usable,
        minimum: narrow.minimum(),
    })?;
    let n = counts.iter().sum::<usize>() as f64;
    let sum: f64 = CATALOG
        .iter()
        .zip(counts)
        .map(|(s, c)| s.nominal() * c as f64)
        .sum();
    let extra = (usable - sum - (n - 1.0) * CLEARANCE) / n;
    Ok(CATALOG
        .iter()
        .zip(counts)
        .flat_map(|(s, c)| std::iter::repeat_n(s.nominal() + extra, c))
        .collect())
}
