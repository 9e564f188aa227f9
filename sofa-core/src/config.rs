use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cushions::CushionPolicy;
use crate::error::ConfigurationError;
use crate::meridienne;
use crate::palette::Palette;
use crate::topology::{self, LengthName};

pub const DEFAULT_DEPTH: f64 = 70.0;

/// Mitring arrangement of a U sofa with a single corner module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OneCornerVariant {
    V1,
    V2,
    V3,
    V4,
}

impl OneCornerVariant {
    pub fn number(self) -> u8 {
        match self {
            OneCornerVariant::V1 => 1,
            OneCornerVariant::V2 => 2,
            OneCornerVariant::V3 => 3,
            OneCornerVariant::V4 => 4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ShapeKind {
    Simple,
    LNoCorner,
    LCorner,
    UNoCorner,
    UOneCorner(OneCornerVariant),
    UTwoCorner,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 9] = [
        ShapeKind::Simple,
        ShapeKind::LNoCorner,
        ShapeKind::LCorner,
        ShapeKind::UNoCorner,
        ShapeKind::UOneCorner(OneCornerVariant::V1),
        ShapeKind::UOneCorner(OneCornerVariant::V2),
        ShapeKind::UOneCorner(OneCornerVariant::V3),
        ShapeKind::UOneCorner(OneCornerVariant::V4),
        ShapeKind::UTwoCorner,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ShapeKind::Simple => "simple",
            ShapeKind::LNoCorner => "l-no-corner",
            ShapeKind::LCorner => "l-corner",
            ShapeKind::UNoCorner => "u-no-corner",
            ShapeKind::UOneCorner(OneCornerVariant::V1) => "u-one-corner-v1",
            ShapeKind::UOneCorner(OneCornerVariant::V2) => "u-one-corner-v2",
            ShapeKind::UOneCorner(OneCornerVariant::V3) => "u-one-corner-v3",
            ShapeKind::UOneCorner(OneCornerVariant::V4) => "u-one-corner-v4",
            ShapeKind::UTwoCorner => "u-two-corner",
        }
    }

    pub fn display_name(self) -> String {
        match self {
            ShapeKind::Simple => "Simple sofa".to_string(),
            ShapeKind::LNoCorner => "L sofa, no corner".to_string(),
            ShapeKind::LCorner => "L sofa with corner".to_string(),
            ShapeKind::UNoCorner => "U sofa, no corner".to_string(),
            ShapeKind::UOneCorner(v) => format!("U sofa, one corner (v{})", v.number()),
            ShapeKind::UTwoCorner => "U sofa, two corners".to_string(),
        }
    }

    pub fn has_left_return(self) -> bool {
        !matches!(self, ShapeKind::Simple)
    }

    pub fn has_right_return(self) -> bool {
        matches!(
            self,
            ShapeKind::UNoCorner | ShapeKind::UOneCorner(_) | ShapeKind::UTwoCorner
        )
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ShapeKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        let kind = match key.as_str() {
            "simple" | "s" => ShapeKind::Simple,
            "l-no-corner" | "lnf" => ShapeKind::LNoCorner,
            "l-corner" | "lf" => ShapeKind::LCorner,
            "u-no-corner" | "u" => ShapeKind::UNoCorner,
            "u-one-corner-v1" | "u1f-v1" => ShapeKind::UOneCorner(OneCornerVariant::V1),
            "u-one-corner-v2" | "u1f-v2" => ShapeKind::UOneCorner(OneCornerVariant::V2),
            "u-one-corner-v3" | "u1f-v3" => ShapeKind::UOneCorner(OneCornerVariant::V3),
            "u-one-corner-v4" | "u1f-v4" => ShapeKind::UOneCorner(OneCornerVariant::V4),
            "u-two-corner" | "u2f" => ShapeKind::UTwoCorner,
            _ => return Err(ConfigurationError::UnknownShape(s.to_string())),
        };
        Ok(kind)
    }
}

impl TryFrom<String> for ShapeKind {
    type Error = ConfigurationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ShapeKind> for String {
    fn from(kind: ShapeKind) -> Self {
        kind.id().to_string()
    }
}

/// Physical side of the sofa, as seen from the front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    Bottom,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Left => "left",
            Side::Right => "right",
            Side::Bottom => "bottom",
        })
    }
}

impl FromStr for Side {
    type Err = ConfigurationError;

    // Single letters follow the French initials used by the order form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "g" | "gauche" => Ok(Side::Left),
            "right" | "d" | "droite" => Ok(Side::Right),
            "bottom" | "b" | "bas" => Ok(Side::Bottom),
            _ => Err(ConfigurationError::UnknownSide(s.to_string())),
        }
    }
}

/// Presence flags for the left, right and bottom sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default = "SideFlags::all")]
pub struct SideFlags {
    pub left: bool,
    pub right: bool,
    pub bottom: bool,
}

impl SideFlags {
    pub const fn all() -> Self {
        SideFlags {
            left: true,
            right: true,
            bottom: true,
        }
    }

    pub const fn none() -> Self {
        SideFlags {
            left: false,
            right: false,
            bottom: false,
        }
    }
}

/// Raw run lengths in centimeters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lengths {
    pub tx: f64,
    pub ty: Option<f64>,
    pub tz: Option<f64>,
}

impl Lengths {
    pub const fn straight(tx: f64) -> Self {
        Lengths {
            tx,
            ty: None,
            tz: None,
        }
    }

    pub const fn l(tx: f64, ty: f64) -> Self {
        Lengths {
            tx,
            ty: Some(ty),
            tz: None,
        }
    }

    pub const fn u(tx: f64, ty: f64, tz: f64) -> Self {
        Lengths {
            tx,
            ty: Some(ty),
            tz: Some(tz),
        }
    }

    pub fn get(&self, name: LengthName) -> Option<f64> {
        match name {
            LengthName::Tx => Some(self.tx),
            LengthName::Ty => self.ty,
            LengthName::Tz => self.tz,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Meridienne {
    pub side: Side,
    pub length: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeridienneSpec {
    pub side: String,
    pub length: f64,
}

/// Configuration as it arrives from the order form, before validation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SofaSpec {
    pub shape: String,
    pub tx: f64,
    pub ty: Option<f64>,
    pub tz: Option<f64>,
    pub depth: Option<f64>,
    pub armrests: Option<SideFlags>,
    pub backrests: Option<SideFlags>,
    pub meridienne: Option<MeridienneSpec>,
    pub cushions: Option<String>,
    pub palette: Option<BTreeMap<String, String>>,
    pub title: Option<String>,
}

/// A validated sofa description. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct SofaConfiguration {
    shape: ShapeKind,
    lengths: Lengths,
    depth: f64,
    armrests: SideFlags,
    backrests: SideFlags,
    meridienne: Option<Meridienne>,
    cushions: CushionPolicy,
    palette: Palette,
    title: Option<String>,
}

impl SofaConfiguration {
    /// Starts a configuration with every armrest and backrest present,
    /// automatic cushions and the default palette.
    pub fn new(
        shape: ShapeKind,
        lengths: Lengths,
        depth: f64,
    ) -> Result<Self, ConfigurationError> {
        topology::check_lengths(shape, &lengths)?;
        topology::check_length("depth", depth)?;
        Ok(SofaConfiguration {
            shape,
            lengths,
            depth,
            armrests: SideFlags::all(),
            backrests: SideFlags::all(),
            meridienne: None,
            cushions: CushionPolicy::Auto,
            palette: Palette::default(),
            title: None,
        })
    }

    pub fn with_armrests(mut self, armrests: SideFlags) -> Self {
        self.armrests = armrests;
        self
    }

    pub fn with_backrests(mut self, backrests: SideFlags) -> Self {
        self.backrests = backrests;
        self
    }

    pub fn with_cushions(mut self, cushions: CushionPolicy) -> Self {
        self.cushions = cushions;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_meridienne(mut self, side: Side, length: f64) -> Result<Self, ConfigurationError> {
        meridienne::placement(self.shape, side)?;
        topology::check_length("meridienne length", length)?;
        self.meridienne = Some(Meridienne { side, length });
        Ok(self)
    }

    pub fn shape(&self) -> ShapeKind {
        self.shape
    }

    pub fn lengths(&self) -> &Lengths {
        &self.lengths
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    pub fn armrests(&self) -> SideFlags {
        self.armrests
    }

    pub fn backrests(&self) -> SideFlags {
        self.backrests
    }

    pub fn meridienne(&self) -> Option<Meridienne> {
        self.meridienne
    }

    pub fn cushions(&self) -> CushionPolicy {
        self.cushions
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Dimension label as printed on quotes: `tx`, `ty x tx`, or `ty x tx x tz`.
    pub fn dimension_label(&self) -> String {
        let l = &self.lengths;
        match (l.ty, l.tz) {
            (Some(ty), Some(tz)) => format!("{}x{}x{}cm", fmt_cm(ty), fmt_cm(l.tx), fmt_cm(tz)),
            (Some(ty), None) => format!("{}x{}cm", fmt_cm(ty), fmt_cm(l.tx)),
            _ => format!("{}cm", fmt_cm(l.tx)),
        }
    }

    /// Caller-supplied title, or the shape name with its dimensions.
    pub fn title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("{}, {}", self.shape.display_name(), self.dimension_label()))
    }
}

impl TryFrom<SofaSpec> for SofaConfiguration {
    type Error = ConfigurationError;

    fn try_from(spec: SofaSpec) -> Result<Self, Self::Error> {
        let shape: ShapeKind = spec.shape.parse()?;
        let lengths = Lengths {
            tx: spec.tx,
            ty: spec.ty,
            tz: spec.tz,
        };
        let mut config =
            SofaConfiguration::new(shape, lengths, spec.depth.unwrap_or(DEFAULT_DEPTH))?
                .with_armrests(spec.armrests.unwrap_or(SideFlags::all()))
                .with_backrests(spec.backrests.unwrap_or(SideFlags::all()));
        if let Some(policy) = &spec.cushions {
            config = config.with_cushions(policy.parse()?);
        }
        if let Some(map) = &spec.palette {
            config = config.with_palette(Palette::from_map(map)?);
        }
        if let Some(m) = &spec.meridienne {
            config = config.with_meridienne(m.side.parse()?, m.length)?;
        }
        if let Some(title) = spec.title {
            config = config.with_title(title);
        }
        Ok(config)
    }
}

/// Format centimeters: near-integers without decimals, otherwise up to
/// two decimals with trailing zeros trimmed.
pub fn fmt_cm(v: f64) -> String {
    if (v - v.round()).abs() < 1e-6 {
        format!("{:.0}", v)
    } else {
        format!("{:.2}", v)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}
