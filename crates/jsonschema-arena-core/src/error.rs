//! Error types for arena normalization.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::node::{NodeKey, TypeTag};

/// Stable, machine-readable error codes.
///
/// Variant names and their serialized `snake_case` strings are part of the
/// public contract: tooling that consumes `to_json()` output matches on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ErrorCode {
    /// JSON (de)serialization error while loading a node document.
    JsonParseError,
    /// Node document has an unusable top-level shape.
    InvalidDocument,
    /// A node key does not address an arena slot.
    KeyOutOfRange,
    /// An alias chain did not terminate within the arena size.
    AliasCycle,
    /// The pipeline did not reach a fixed point within its iteration budget.
    IterationBudgetExhausted,
    /// A type merge was attempted on a multi-type node.
    TypeMergePrecondition,
}

/// Fatal errors surfaced by the arena, resolver, transforms, and driver.
///
/// None of these are recovered locally: they indicate a malformed input arena
/// or a broken transform ordering, and abort normalization of the document.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid node document: {0}")]
    InvalidDocument(String),

    #[error("Node key {key} out of range (arena size: {size})")]
    KeyOutOfRange { key: NodeKey, size: usize },

    #[error("Alias cycle detected starting at node {key} (no terminal node after {hops} hops)")]
    AliasCycle { key: NodeKey, hops: usize },

    #[error("No fixed point after {iterations} iterations (last pass changed {changes} nodes)")]
    IterationBudgetExhausted { iterations: usize, changes: usize },

    #[error("Type merge precondition violated: cannot merge {left:?} with {right:?}")]
    TypeMergePrecondition {
        left: Vec<TypeTag>,
        right: Vec<TypeTag>,
    },
}

impl NormalizeError {
    /// Returns the stable error code for this error variant.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            NormalizeError::JsonError(_) => ErrorCode::JsonParseError,
            NormalizeError::InvalidDocument(_) => ErrorCode::InvalidDocument,
            NormalizeError::KeyOutOfRange { .. } => ErrorCode::KeyOutOfRange,
            NormalizeError::AliasCycle { .. } => ErrorCode::AliasCycle,
            NormalizeError::IterationBudgetExhausted { .. } => {
                ErrorCode::IterationBudgetExhausted
            }
            NormalizeError::TypeMergePrecondition { .. } => ErrorCode::TypeMergePrecondition,
        }
    }

    /// Returns the node key the error is anchored at, if any.
    pub fn key(&self) -> Option<NodeKey> {
        match self {
            NormalizeError::KeyOutOfRange { key, .. } => Some(*key),
            NormalizeError::AliasCycle { key, .. } => Some(*key),
            _ => None,
        }
    }

    /// Produces a structured JSON error.
    ///
    /// Format: `{"code": "...", "message": "...", "key": <n> | null}`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string(),
            "key": self.key(),
        })
    }
}
