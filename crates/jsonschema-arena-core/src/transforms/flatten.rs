//! Splice nested same-kind combinators into their parent list.
//!
//! `{allOf: [x, c]}` with `c = {allOf: [a, b]}` becomes `{allOf: [x, a, b]}`.
//! Elements are looked through aliases first. Only bare children qualify: a
//! child with any content besides the combinator (and metadata) is kept as
//! an element. One level is spliced per call; deeper nesting converges over
//! successive passes.

use crate::arena::SchemaArena;
use crate::node::{Combinator, NodeKey};

use super::TransformResult;

pub fn flatten_all_of(arena: &mut SchemaArena, key: NodeKey) -> TransformResult {
    flatten(arena, key, Combinator::AllOf)
}

pub fn flatten_any_of(arena: &mut SchemaArena, key: NodeKey) -> TransformResult {
    flatten(arena, key, Combinator::AnyOf)
}

pub fn flatten_one_of(arena: &mut SchemaArena, key: NodeKey) -> TransformResult {
    flatten(arena, key, Combinator::OneOf)
}

fn flatten(arena: &SchemaArena, key: NodeKey, kind: Combinator) -> TransformResult {
    let node = arena.get_item(key)?;
    let Some(elements) = node.combinator(kind) else {
        return Ok(None);
    };

    let mut flattened = Vec::with_capacity(elements.len());
    let mut spliced = false;
    for &element in elements {
        let (resolved, target) = arena.resolve_item(element)?;
        match target.combinator(kind) {
            Some(nested) if resolved != key && target.is_bare_combinator(kind) => {
                flattened.extend(nested.iter().copied());
                spliced = true;
            }
            _ => flattened.push(element),
        }
    }
    if !spliced {
        return Ok(None);
    }

    let mut node = node.clone();
    *node.combinator_mut(kind) = Some(flattened);
    Ok(Some(node))
}
