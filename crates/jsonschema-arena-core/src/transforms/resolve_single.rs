//! Resolve combinators with fewer than two elements.
//!
//! A one-element list is a type-equality link: `{allOf: [x], ...}` becomes
//! `{reference: x, ...}`. Nodes that already carry a `reference` are left for
//! `explode`.
//!
//! An empty list is dropped. For `allOf` that is exact (an empty conjunction
//! accepts everything). For `anyOf`/`oneOf` an empty list accepts nothing, which
//! the node model cannot express without inventing a `never` type, so the node
//! is flagged `exact: false` instead.

use crate::arena::SchemaArena;
use crate::node::{Combinator, NodeKey};

use super::TransformResult;

pub fn resolve_single_all_of(arena: &mut SchemaArena, key: NodeKey) -> TransformResult {
    resolve_single(arena, key, Combinator::AllOf)
}

pub fn resolve_single_any_of(arena: &mut SchemaArena, key: NodeKey) -> TransformResult {
    resolve_single(arena, key, Combinator::AnyOf)
}

pub fn resolve_single_one_of(arena: &mut SchemaArena, key: NodeKey) -> TransformResult {
    resolve_single(arena, key, Combinator::OneOf)
}

fn resolve_single(arena: &SchemaArena, key: NodeKey, kind: Combinator) -> TransformResult {
    let node = arena.get_item(key)?;
    let Some(elements) = node.combinator(kind) else {
        return Ok(None);
    };

    match elements.as_slice() {
        [] => {
            let mut resolved = node.clone();
            *resolved.combinator_mut(kind) = None;
            if kind != Combinator::AllOf {
                tracing::debug!(key, combinator = kind.name(), "dropping empty combinator");
                resolved.exact = Some(false);
            }
            Ok(Some(resolved))
        }
        [only] if node.reference.is_none() => {
            let mut resolved = node.clone();
            resolved.reference = Some(*only);
            *resolved.combinator_mut(kind) = None;
            Ok(Some(resolved))
        }
        _ => Ok(None),
    }
}
