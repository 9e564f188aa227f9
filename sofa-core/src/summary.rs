use serde::Serialize;

use crate::config::{Lengths, Meridienne, ShapeKind, SideFlags, SofaConfiguration};
use crate::cushions::CushionPolicy;

/// What pricing and document export need to know about a configuration.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConfigurationSummary {
    pub shape: ShapeKind,
    pub name: String,
    pub title: String,
    pub lengths: Lengths,
    pub depth: f64,
    pub dimension_label: String,
    /// Armrests actually fitted; flags for sides the shape lacks do not count.
    pub armrest_count: usize,
    pub backrests: SideFlags,
    pub meridienne: Option<Meridienne>,
    pub cushions: CushionPolicy,
}

impl From<&SofaConfiguration> for ConfigurationSummary {
    fn from(config: &SofaConfiguration) -> Self {
        let shape = config.shape();
        let arms = config.armrests();
        let closing = if shape.has_left_return() && !shape.has_right_return() {
            arms.bottom
        } else {
            arms.right
        };
        ConfigurationSummary {
            shape,
            name: shape.display_name(),
            title: config.title(),
            lengths: *config.lengths(),
            depth: config.depth(),
            dimension_label: config.dimension_label(),
            armrest_count: usize::from(arms.left) + usize::from(closing),
            backrests: config.backrests(),
            meridienne: config.meridienne(),
            cushions: config.cushions(),
        }
    }
}
