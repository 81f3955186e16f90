use serde::{Deserialize, Serialize};
use std::fmt;

use crate::util::helpers::steps_to_reach;

/// Decides how many cells are placed along an axis, in particular at the upper edge of the bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgePolicy {
    /// Enumerate the origins `min, min + size, ..` up to and including the first one that is `>= max`
    /// and drop that last origin.
    /// A box of zero width or height yields no cells.
    #[default]
    Legacy,
    /// Place as many cells as necessary to cover `[min, max]`, but at least one.
    /// Cells are not clipped, so the last one may reach beyond `max`.
    Cover,
}

impl EdgePolicy {
    /// The number of cells along one axis.
    ///
    /// The result is a float so that it can be checked against a limit before allocating anything.
    /// `size` must be positive and finite.
    pub fn cells_along_axis(self, min: f64, max: f64, size: f64) -> f64 {
        match self {
            EdgePolicy::Legacy => steps_to_reach(min, max, size),
            EdgePolicy::Cover => steps_to_reach(min, max, size).max(1.),
        }
    }
}

impl fmt::Display for EdgePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgePolicy::Legacy => write!(f, "legacy"),
            EdgePolicy::Cover => write!(f, "cover"),
        }
    }
}
