//! Collapse pass-through nodes into aliases.
//!
//! A node whose only content is a single-element `allOf`/`anyOf`/`oneOf`, or
//! a bare `reference`, means exactly what its target means. It is rewritten
//! to `{alias: target}`; metadata (`id`, `title`, ...) stays on the node for
//! the naming step.

use crate::arena::SchemaArena;
use crate::node::{Combinator, NodeKey};

use super::TransformResult;

pub fn alias(arena: &mut SchemaArena, key: NodeKey) -> TransformResult {
    let node = arena.get_item(key)?;
    if node.is_alias() {
        return Ok(None);
    }

    let target = if node.is_bare_reference() {
        node.reference
    } else {
        [Combinator::AllOf, Combinator::AnyOf, Combinator::OneOf]
            .into_iter()
            .find_map(|kind| match node.combinator(kind) {
                Some(elements) if elements.len() == 1 && node.is_bare_combinator(kind) => {
                    Some(elements[0])
                }
                _ => None,
            })
    };

    let Some(target) = target else {
        return Ok(None);
    };
    // The target must resolve somewhere other than here, or the alias would
    // close a loop (directly, or through aliases made earlier).
    match arena.resolve_key(target) {
        Ok(resolved) if resolved != key => {}
        _ => return Ok(None),
    }

    let mut aliased = node.metadata();
    aliased.alias = Some(target);
    Ok(Some(aliased))
}
