//! Distribute a combinator over nested `oneOf` alternatives.
//!
//! `{allOf: [a, {oneOf: [b, c]}, {oneOf: [d, e]}]}` becomes
//! `{oneOf: [{allOf: [a, b, d]}, {allOf: [a, b, e]}, {allOf: [a, c, d]}, {allOf: [a, c, e]}]}`.
//! Each element contributes its `oneOf` branches if it resolves to a bare
//! `oneOf`, or itself otherwise; the new branches are the Cartesian product
//! of those sets, in [`product`] order.
//!
//! For `allOf` the rewrite is exact. For `anyOf` the product branches are
//! `anyOf` nodes and the exclusivity of the outer `oneOf` is an
//! approximation, so the node is flagged `exact: false`.

use crate::arena::SchemaArena;
use crate::combinatorics::product;
use crate::error::NormalizeError;
use crate::node::{Combinator, NodeKey, SchemaNode};

use super::TransformResult;

pub fn flip_all_of_one_of(arena: &mut SchemaArena, key: NodeKey) -> TransformResult {
    flip(arena, key, Combinator::AllOf)
}

pub fn flip_any_of_one_of(arena: &mut SchemaArena, key: NodeKey) -> TransformResult {
    flip(arena, key, Combinator::AnyOf)
}

fn flip(arena: &mut SchemaArena, key: NodeKey, kind: Combinator) -> TransformResult {
    let node = arena.get_item(key)?;
    // A node with its own oneOf mixes two concerns; explode separates them.
    if node.one_of.is_some() {
        return Ok(None);
    }
    let Some(elements) = node.combinator(kind) else {
        return Ok(None);
    };
    let Some(sets) = one_of_branch_sets(arena, key, elements)? else {
        return Ok(None);
    };

    let mut flipped = node.clone();
    *flipped.combinator_mut(kind) = None;
    if kind == Combinator::AnyOf {
        flipped.exact = Some(false);
    }

    let branches: Vec<NodeKey> = product(sets)
        .map(|row| arena.add_item(SchemaNode::with_combinator(kind, row)))
        .collect();
    tracing::trace!(key, combinator = kind.name(), branches = branches.len(), "flipped over oneOf");
    flipped.one_of = Some(branches);
    Ok(Some(flipped))
}

/// Branch sets for a distributive flip of `elements`, or `None` when the
/// nested `oneOf` nodes contribute fewer than two branches in total.
pub(crate) fn one_of_branch_sets(
    arena: &SchemaArena,
    key: NodeKey,
    elements: &[NodeKey],
) -> Result<Option<Vec<Vec<NodeKey>>>, NormalizeError> {
    let mut sets = Vec::with_capacity(elements.len());
    let mut nested_branches = 0;
    let mut nested = false;
    for &element in elements {
        let (resolved, target) = arena.resolve_item(element)?;
        match &target.one_of {
            Some(branches) if resolved != key && target.is_bare_one_of() => {
                nested = true;
                nested_branches += branches.len();
                sets.push(branches.clone());
            }
            _ => sets.push(vec![element]),
        }
    }
    if !nested || nested_branches < 2 {
        return Ok(None);
    }
    Ok(Some(sets))
}
