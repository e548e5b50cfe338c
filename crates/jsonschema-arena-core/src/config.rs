//! Configuration for arena normalization.

use serde::{Deserialize, Serialize};

use crate::transforms::{Transform, DEFAULT_TRANSFORMS};

/// Options for [`crate::normalize`].
///
/// ## Serialization Format
///
/// Fields are serialized in `kebab-case` (e.g. `max-iterations`), and
/// transforms by their kebab-case names (e.g. `flip-all-of-one-of`). Missing
/// fields take their default, so a config file only names what it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct NormalizeOptions {
    /// Maximum number of full passes before giving up. Each pass visits every
    /// node that existed when it started. Default: 100.
    pub max_iterations: usize,
    /// Transforms to run on every node, in order. Default: the full
    /// [`DEFAULT_TRANSFORMS`] list.
    pub transforms: Vec<Transform>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            transforms: DEFAULT_TRANSFORMS.to_vec(),
        }
    }
}
