//! Expand `anyOf` into exclusive alternatives.
//!
//! A value matching `anyOf: [a, b, c]` matches some non-empty subset of the
//! elements. This fallback enumerates those subsets (`2^n - 1` of them) as
//! `allOf` branches of an outer `oneOf`: all 1-subsets, then all 2-subsets,
//! and so on, each group in [`choose`] order. It only runs where
//! `flipAnyOfOneOf` does not apply.

use crate::arena::SchemaArena;
use crate::combinatorics::choose;
use crate::node::{Combinator, NodeKey, SchemaNode};

use super::flip::one_of_branch_sets;
use super::{attach_one_of, TransformResult};

pub fn resolve_any_of_choose(arena: &mut SchemaArena, key: NodeKey) -> TransformResult {
    let node = arena.get_item(key)?;
    let Some(elements) = node.any_of.clone() else {
        return Ok(None);
    };
    if elements.len() < 2 || one_of_branch_sets(arena, key, &elements)?.is_some() {
        return Ok(None);
    }

    let mut resolved = node.clone();
    resolved.any_of = None;

    let mut branches = Vec::new();
    for k in 1..=elements.len() {
        for subset in choose(elements.clone(), k) {
            branches.push(arena.add_item(SchemaNode::with_combinator(Combinator::AllOf, subset)));
        }
    }
    tracing::debug!(
        key,
        elements = elements.len(),
        branches = branches.len(),
        "expanded anyOf into sub-combinations"
    );
    attach_one_of(arena, &mut resolved, branches);
    Ok(Some(resolved))
}
