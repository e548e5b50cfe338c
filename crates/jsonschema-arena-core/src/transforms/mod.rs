//! Rewrite rules.
//!
//! Every transform is a function of `(arena, key)`. It reads the node at
//! `key`, may append new nodes, and returns either a replacement for the node
//! at `key` or `None` when it does not apply. Transforms never write to the
//! arena slot at `key` themselves: the driver in [`crate::pipeline`] does,
//! and counts the change.
//!
//! Transforms are independent, but their order is not: several rely on
//! earlier ones having run (`mergeParent` needs `singleType` to have split
//! multi-type parents first). [`DEFAULT_TRANSFORMS`] is the order the
//! pipeline is validated against.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::arena::SchemaArena;
use crate::error::NormalizeError;
use crate::node::{NodeKey, SchemaNode};

pub mod alias;
pub mod any_of_choose;
pub mod explode;
pub mod flatten;
pub mod flip;
pub mod if_then_else;
pub mod merge_parent;
pub mod not;
pub mod resolve_single;
pub mod single_type;
pub mod unique;

/// Outcome of a transform: `Some(node)` replaces the node at the key.
pub type TransformResult = Result<Option<SchemaNode>, NormalizeError>;

/// A named rewrite rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transform {
    Explode,
    SingleType,
    FlattenAllOf,
    FlattenAnyOf,
    FlattenOneOf,
    UniqueAllOf,
    UniqueAnyOf,
    UniqueOneOf,
    Alias,
    ResolveSingleAllOf,
    ResolveSingleAnyOf,
    ResolveSingleOneOf,
    FlipAllOfOneOf,
    FlipAnyOfOneOf,
    ResolveAnyOfChoose,
    ResolveIfThenElse,
    ResolveNot,
    MergeParent,
}

/// The full pass list, in the order the pipeline runs it.
pub const DEFAULT_TRANSFORMS: &[Transform] = &[
    Transform::Explode,
    Transform::SingleType,
    Transform::FlattenAllOf,
    Transform::FlattenAnyOf,
    Transform::FlattenOneOf,
    Transform::UniqueAllOf,
    Transform::UniqueAnyOf,
    Transform::UniqueOneOf,
    Transform::Alias,
    Transform::ResolveSingleAllOf,
    Transform::ResolveSingleAnyOf,
    Transform::ResolveSingleOneOf,
    Transform::FlipAllOfOneOf,
    Transform::FlipAnyOfOneOf,
    Transform::ResolveAnyOfChoose,
    Transform::ResolveIfThenElse,
    Transform::ResolveNot,
    Transform::MergeParent,
];

impl Transform {
    /// Stable kebab-case name, as used in configuration and on the CLI.
    pub fn name(self) -> &'static str {
        match self {
            Transform::Explode => "explode",
            Transform::SingleType => "single-type",
            Transform::FlattenAllOf => "flatten-all-of",
            Transform::FlattenAnyOf => "flatten-any-of",
            Transform::FlattenOneOf => "flatten-one-of",
            Transform::UniqueAllOf => "unique-all-of",
            Transform::UniqueAnyOf => "unique-any-of",
            Transform::UniqueOneOf => "unique-one-of",
            Transform::Alias => "alias",
            Transform::ResolveSingleAllOf => "resolve-single-all-of",
            Transform::ResolveSingleAnyOf => "resolve-single-any-of",
            Transform::ResolveSingleOneOf => "resolve-single-one-of",
            Transform::FlipAllOfOneOf => "flip-all-of-one-of",
            Transform::FlipAnyOfOneOf => "flip-any-of-one-of",
            Transform::ResolveAnyOfChoose => "resolve-any-of-choose",
            Transform::ResolveIfThenElse => "resolve-if-then-else",
            Transform::ResolveNot => "resolve-not",
            Transform::MergeParent => "merge-parent",
        }
    }

    /// Run this transform on the node at `key`.
    pub fn apply(self, arena: &mut SchemaArena, key: NodeKey) -> TransformResult {
        match self {
            Transform::Explode => explode::explode(arena, key),
            Transform::SingleType => single_type::single_type(arena, key),
            Transform::FlattenAllOf => flatten::flatten_all_of(arena, key),
            Transform::FlattenAnyOf => flatten::flatten_any_of(arena, key),
            Transform::FlattenOneOf => flatten::flatten_one_of(arena, key),
            Transform::UniqueAllOf => unique::unique_all_of(arena, key),
            Transform::UniqueAnyOf => unique::unique_any_of(arena, key),
            Transform::UniqueOneOf => unique::unique_one_of(arena, key),
            Transform::Alias => alias::alias(arena, key),
            Transform::ResolveSingleAllOf => resolve_single::resolve_single_all_of(arena, key),
            Transform::ResolveSingleAnyOf => resolve_single::resolve_single_any_of(arena, key),
            Transform::ResolveSingleOneOf => resolve_single::resolve_single_one_of(arena, key),
            Transform::FlipAllOfOneOf => flip::flip_all_of_one_of(arena, key),
            Transform::FlipAnyOfOneOf => flip::flip_any_of_one_of(arena, key),
            Transform::ResolveAnyOfChoose => any_of_choose::resolve_any_of_choose(arena, key),
            Transform::ResolveIfThenElse => if_then_else::resolve_if_then_else(arena, key),
            Transform::ResolveNot => not::resolve_not(arena, key),
            Transform::MergeParent => merge_parent::merge_parent(arena, key),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Transform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DEFAULT_TRANSFORMS
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| format!("unknown transform '{}'", s))
    }
}

/// Attach `branches` as the node's `oneOf`.
///
/// A node that already has a `oneOf` gets a fresh `{oneOf: branches}` node
/// appended to its `allOf` instead, so the two alternatives are conjoined
/// rather than overwritten; `explode` separates them on a later pass.
pub(crate) fn attach_one_of(arena: &mut SchemaArena, node: &mut SchemaNode, branches: Vec<NodeKey>) {
    if node.one_of.is_none() {
        node.one_of = Some(branches);
        return;
    }
    let wrapper = arena.add_item(SchemaNode {
        one_of: Some(branches),
        ..SchemaNode::default()
    });
    node.all_of.get_or_insert_with(Vec::new).push(wrapper);
}

#[cfg(test)]
pub(crate) mod test_support {
    use serde_json::Value;

    use crate::arena::SchemaArena;
    use crate::node::SchemaNode;

    use super::Transform;

    /// Build an arena from a JSON array of nodes.
    pub fn arena(nodes: Value) -> SchemaArena {
        let nodes: Vec<SchemaNode> = serde_json::from_value(nodes).unwrap();
        SchemaArena::from_items(nodes)
    }

    /// Apply `transforms` until no node changes; returns the pass count.
    pub fn run(arena: &mut SchemaArena, transforms: &[Transform]) -> usize {
        let mut passes = 0;
        loop {
            passes += 1;
            assert!(passes < 100, "no fixed point after 100 passes");
            if arena.apply_transform(transforms).unwrap() == 0 {
                return passes;
            }
        }
    }

    /// The arena as JSON, for whole-arena assertions.
    pub fn dump(arena: &SchemaArena) -> Value {
        serde_json::to_value(arena).unwrap()
    }
}
