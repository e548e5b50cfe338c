//! Pipeline driver.
//!
//! [`SchemaArena::apply_transform`] runs one pass: every transform, in
//! order, on every key that existed when the pass started. Nodes appended
//! during the pass wait for the next one, which bounds the work per pass and
//! makes runaway rewriting visible as a change count that never reaches zero.
//! [`SchemaArena::normalize`] repeats passes until that count is zero or the
//! iteration budget is spent.

use serde::{Deserialize, Serialize};

use crate::arena::SchemaArena;
use crate::config::NormalizeOptions;
use crate::error::NormalizeError;
use crate::transforms::Transform;

/// Summary of a completed normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NormalizeReport {
    /// Passes run, including the final zero-change pass.
    pub iterations: usize,
    /// Node replacements across all passes.
    pub changes: usize,
    /// Arena size after convergence.
    pub size: usize,
}

impl SchemaArena {
    /// Run one pass of `transforms` and return the number of nodes replaced.
    ///
    /// A transform result only counts when it differs from the stored node.
    pub fn apply_transform(&mut self, transforms: &[Transform]) -> Result<usize, NormalizeError> {
        let snapshot = self.len();
        let mut changes = 0;
        for key in 0..snapshot {
            for transform in transforms {
                let Some(replacement) = transform.apply(self, key)? else {
                    continue;
                };
                if *self.get_item(key)? == replacement {
                    continue;
                }
                tracing::trace!(key, transform = transform.name(), "node rewritten");
                self.set_item(key, replacement)?;
                changes += 1;
            }
        }
        Ok(changes)
    }

    /// Validate links, then run passes until a fixed point.
    ///
    /// The converged arena is checked once more: every key must resolve, so
    /// an alias loop present in the input is reported rather than returned.
    ///
    /// Fails with [`NormalizeError::IterationBudgetExhausted`] if
    /// `options.max_iterations` passes all changed something.
    pub fn normalize(&mut self, options: &NormalizeOptions) -> Result<NormalizeReport, NormalizeError> {
        self.validate_references()?;

        let mut total = 0;
        let mut last = 0;
        for iteration in 1..=options.max_iterations {
            let changes = self.apply_transform(&options.transforms)?;
            tracing::debug!(iteration, changes, size = self.len(), "normalization pass");
            if changes == 0 {
                self.validate_aliases()?;
                return Ok(NormalizeReport {
                    iterations: iteration,
                    changes: total,
                    size: self.len(),
                });
            }
            total += changes;
            last = changes;
        }

        tracing::warn!(
            max_iterations = options.max_iterations,
            changes = last,
            size = self.len(),
            "normalization did not converge"
        );
        Err(NormalizeError::IterationBudgetExhausted {
            iterations: options.max_iterations,
            changes: last,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::test_support::arena;
    use serde_json::json;

    #[test]
    fn test_new_nodes_wait_for_next_pass() {
        // Key 0 splits into 1 and 2; those children are not merged in the
        // same pass even though mergeParent is in the list.
        let mut a = arena(json!([{ "types": ["string", "null"] }]));
        let transforms = [Transform::SingleType, Transform::MergeParent];

        assert_eq!(a.apply_transform(&transforms).unwrap(), 1);
        assert_eq!(a.get_item(1).unwrap().parent, Some(0));

        assert_eq!(a.apply_transform(&transforms).unwrap(), 2);
        assert_eq!(a.get_item(1).unwrap().parent, None);
        assert_eq!(a.apply_transform(&transforms).unwrap(), 0);
    }

    #[test]
    fn test_normalize_reports_iterations() {
        let mut a = arena(json!([{}, {}, { "allOf": [0, 1, 1] }]));
        let report = a.normalize(&NormalizeOptions::default()).unwrap();
        assert_eq!(report.iterations, 2);
        assert_eq!(report.changes, 1);
        assert_eq!(report.size, 3);
    }

    #[test]
    fn test_normalize_validates_links() {
        let mut a = arena(json!([{ "allOf": [100] }]));
        let err = a.normalize(&NormalizeOptions::default()).unwrap_err();
        assert!(matches!(err, NormalizeError::KeyOutOfRange { key: 100, .. }));
    }

    #[test]
    fn test_budget_exhaustion_is_reported() {
        // Converges in three passes; a budget of one pass is not enough.
        let mut a = arena(json!([{ "types": ["string", "null"] }]));
        let tight = NormalizeOptions {
            max_iterations: 1,
            ..NormalizeOptions::default()
        };
        let err = a.normalize(&tight).unwrap_err();
        assert!(matches!(
            err,
            NormalizeError::IterationBudgetExhausted { iterations: 1, changes: 1 }
        ));

        let mut a = arena(json!([{ "types": ["string", "null"] }]));
        let report = a.normalize(&NormalizeOptions::default()).unwrap();
        assert_eq!(report.iterations, 3);
        assert_eq!(report.changes, 3);
    }

    #[test]
    fn test_input_alias_loop_is_reported() {
        // No transform touches alias nodes, so the pass count is zero; the
        // loop must still surface.
        let mut a = arena(json!([{ "alias": 1 }, { "alias": 0 }]));
        let err = a.normalize(&NormalizeOptions::default()).unwrap_err();
        assert!(matches!(err, NormalizeError::AliasCycle { key: 0, .. }));
    }

    #[test]
    fn test_zero_budget_fails_immediately() {
        let mut a = arena(json!([{}]));
        let options = NormalizeOptions {
            max_iterations: 0,
            ..NormalizeOptions::default()
        };
        assert!(matches!(
            a.normalize(&options),
            Err(NormalizeError::IterationBudgetExhausted { iterations: 0, changes: 0 })
        ));
    }
}
