//! Split a node that mixes several structural concerns.
//!
//! Concerns are: `reference`, the `if` conditional (with its branches), `allOf`,
//! `anyOf` and `oneOf`. A node carrying more than one of them is rewritten to
//! keep its remaining content plus an `allOf` over new children, one per
//! concern. Each child gets `parent = key` so that `mergeParent` later folds
//! the shared content (types, properties, bounds) into it.

use crate::arena::SchemaArena;
use crate::node::{Combinator, NodeKey, SchemaNode};

use super::TransformResult;

pub fn explode(arena: &mut SchemaArena, key: NodeKey) -> TransformResult {
    let mut exploded = arena.get_item(key)?.clone();
    if exploded.concern_count() < 2 {
        return Ok(None);
    }

    let mut parts = Vec::new();

    if let Some(reference) = exploded.reference.take() {
        parts.push(SchemaNode {
            parent: Some(key),
            reference: Some(reference),
            ..SchemaNode::default()
        });
    }

    if exploded.has_conditional() {
        parts.push(SchemaNode {
            parent: Some(key),
            if_: exploded.if_.take(),
            then: exploded.then.take(),
            else_: exploded.else_.take(),
            ..SchemaNode::default()
        });
    }

    for kind in [Combinator::AllOf, Combinator::AnyOf, Combinator::OneOf] {
        if let Some(elements) = exploded.combinator_mut(kind).take() {
            let mut part = SchemaNode::with_combinator(kind, elements);
            part.parent = Some(key);
            parts.push(part);
        }
    }

    tracing::trace!(key, parts = parts.len(), "exploding multi-concern node");
    let children = parts.into_iter().map(|part| arena.add_item(part)).collect();
    exploded.all_of = Some(children);
    Ok(Some(exploded))
}
