//! De-duplicate combinator element lists, keeping first occurrences.

use indexmap::IndexSet;

use crate::arena::SchemaArena;
use crate::node::{Combinator, NodeKey};

use super::TransformResult;

pub fn unique_all_of(arena: &mut SchemaArena, key: NodeKey) -> TransformResult {
    unique(arena, key, Combinator::AllOf)
}

pub fn unique_any_of(arena: &mut SchemaArena, key: NodeKey) -> TransformResult {
    unique(arena, key, Combinator::AnyOf)
}

pub fn unique_one_of(arena: &mut SchemaArena, key: NodeKey) -> TransformResult {
    unique(arena, key, Combinator::OneOf)
}

fn unique(arena: &SchemaArena, key: NodeKey, kind: Combinator) -> TransformResult {
    let node = arena.get_item(key)?;
    let Some(elements) = node.combinator(kind) else {
        return Ok(None);
    };
    let distinct: IndexSet<NodeKey> = elements.iter().copied().collect();
    if distinct.len() == elements.len() {
        return Ok(None);
    }

    let mut node = node.clone();
    *node.combinator_mut(kind) = Some(distinct.into_iter().collect());
    Ok(Some(node))
}
