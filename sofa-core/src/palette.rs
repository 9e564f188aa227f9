use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::error::ConfigurationError;

/// Fill used for anything without a recognized role.
pub const NEUTRAL: &str = "#c8c8c8";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorRole {
    Seat,
    Backrest,
    Armrest,
    Cushion,
}

impl ColorRole {
    pub const ALL: [ColorRole; 4] = [
        ColorRole::Seat,
        ColorRole::Backrest,
        ColorRole::Armrest,
        ColorRole::Cushion,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColorRole::Seat => "seat",
            ColorRole::Backrest => "backrest",
            ColorRole::Armrest => "armrest",
            ColorRole::Cushion => "cushion",
        }
    }
}

impl FromStr for ColorRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorRole::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

/// Role to color mapping, every role always filled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub seat: String,
    pub backrest: String,
    pub armrest: String,
    pub cushion: String,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            seat: "#e8dcc4".into(),
            backrest: "#8b6f47".into(),
            armrest: "#a0826d".into(),
            cushion: "#f5efe0".into(),
        }
    }
}

fn is_hex_color(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(hex) => {
            (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

impl Palette {
    /// Overrides the defaults with `map`. Unknown roles are skipped; a
    /// recognized role with a malformed color is an error.
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Palette, ConfigurationError> {
        let mut palette = Palette::default();
        for (key, value) in map {
            let Ok(role) = key.parse::<ColorRole>() else {
                debug!(role = %key, "ignoring unknown palette role");
                continue;
            };
            let value = value.trim();
            if !is_hex_color(value) {
                return Err(ConfigurationError::InvalidColor {
                    role: key.clone(),
                    value: value.to_string(),
                });
            }
            *palette.slot(role) = value.to_ascii_lowercase();
        }
        Ok(palette)
    }

    fn slot(&mut self, role: ColorRole) -> &mut String {
        match role {
            ColorRole::Seat => &mut self.seat,
            ColorRole::Backrest => &mut self.backrest,
            ColorRole::Armrest => &mut self.armrest,
            ColorRole::Cushion => &mut self.cushion,
        }
    }

    pub fn color(&self, role: ColorRole) -> &str {
        match role {
            ColorRole::Seat => &self.seat,
            ColorRole::Backrest => &self.backrest,
            ColorRole::Armrest => &self.armrest,
            ColorRole::Cushion => &self.cushion,
        }
    }

    /// Color for a role given by name, neutral when the name is unknown.
    pub fn lookup(&self, name: &str) -> &str {
        name.parse().map_or(NEUTRAL, |role| self.color(role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn overrides_only_named_roles() {
        let p = Palette::from_map(&map(&[("cushion", "#ABC"), ("legs", "#000000")])).unwrap();
        assert_eq!(p.cushion, "#abc");
        assert_eq!(p.seat, Palette::default().seat);
    }

    #[test]
    fn rejects_malformed_colors() {
        assert_eq!(
            Palette::from_map(&map(&[("seat", "beige")])),
            Err(ConfigurationError::InvalidColor {
                role: "seat".into(),
                value: "beige".into()
            })
        );
        assert!(Palette::from_map(&map(&[("seat", "#12345")])).is_err());
    }

    #[test]
    fn unknown_lookup_is_neutral() {
        let p = Palette::default();
        assert_eq!(p.lookup("frame"), NEUTRAL);
        assert_eq!(p.lookup("Backrest"), "#8b6f47");
    }
}
