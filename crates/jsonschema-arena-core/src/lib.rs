//! # jsonschema-arena-core
//!
//! Normalizes JSON-Schema-like node graphs into a canonical, single-concern
//! form that code generators can emit directly.
//!
//! Schemas are held in a [`SchemaArena`]: a flat, append-only list of
//! [`SchemaNode`]s linked by integer keys. A fixed list of rewrite rules
//! ([`Transform`]) is applied to every node, pass after pass, until a pass
//! changes nothing. The converged arena has:
//!
//! - no node mixing `reference`, conditionals, and combinators;
//! - no implicit multi-type unions;
//! - no nested same-kind combinators or single-element combinators;
//! - `oneOf` hoisted above `allOf`/`anyOf`.
//!
//! ## Quick Start
//!
//! ```
//! use jsonschema_arena_core::{normalize_document, NormalizeOptions};
//! use serde_json::json;
//!
//! let document = json!([{ "types": ["string", "null"] }]);
//! let result = normalize_document(&document, &NormalizeOptions::default()).unwrap();
//!
//! let root = result.arena.get_item(0).unwrap();
//! assert_eq!(root.one_of, Some(vec![1, 2]));
//! ```

pub mod arena;
pub mod combinatorics;
pub mod config;
pub mod error;
pub mod merge;
pub mod node;
pub mod pipeline;
pub mod resolver;
pub mod transforms;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

pub use arena::{Arena, SchemaArena};
pub use combinatorics::{choose, product};
pub use config::NormalizeOptions;
pub use error::{ErrorCode, NormalizeError};
pub use node::{Combinator, KeyMap, NodeKey, SchemaNode, TypeTag};
pub use pipeline::NormalizeReport;
pub use transforms::{Transform, DEFAULT_TRANSFORMS};

/// Result of normalizing a node document.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizeResult {
    /// The converged arena.
    pub arena: SchemaArena,
    /// Source location → key for every node in the input document.
    pub locations: IndexMap<String, NodeKey>,
    /// Pass statistics.
    pub report: NormalizeReport,
}

/// Normalize an arena in place.
///
/// Equivalent to [`SchemaArena::normalize`].
pub fn normalize(
    arena: &mut SchemaArena,
    options: &NormalizeOptions,
) -> Result<NormalizeReport, NormalizeError> {
    arena.normalize(options)
}

/// Load a node document and normalize it.
///
/// The document is either an array of nodes or an object mapping source
/// locations to nodes; see [`SchemaArena::load_document`].
pub fn normalize_document(
    document: &Value,
    options: &NormalizeOptions,
) -> Result<NormalizeResult, NormalizeError> {
    let (mut arena, locations) = SchemaArena::load_document(document)?;
    let report = arena.normalize(options)?;
    tracing::debug!(
        iterations = report.iterations,
        changes = report.changes,
        size = report.size,
        "document normalized"
    );
    Ok(NormalizeResult {
        arena,
        locations,
        report,
    })
}
