//! Partial simplification of `not`.
//!
//! Only one shape is handled: a node that both requires properties and
//! negates a schema requiring some of them. Those names are dropped from the
//! node's own `required`. The `not` link is kept and the node is flagged
//! `exact: false`; every other `not` shape is left for the generator.

use indexmap::IndexSet;

use crate::arena::SchemaArena;
use crate::node::NodeKey;

use super::TransformResult;

pub fn resolve_not(arena: &mut SchemaArena, key: NodeKey) -> TransformResult {
    let node = arena.get_item(key)?;
    let (Some(negated), Some(required)) = (node.not, node.required.as_ref()) else {
        return Ok(None);
    };
    let (_, negated) = arena.resolve_item(negated)?;
    let Some(excluded) = negated.required.as_ref() else {
        return Ok(None);
    };

    let remaining: IndexSet<String> = required
        .iter()
        .filter(|name| !excluded.contains(*name))
        .cloned()
        .collect();
    if remaining.len() == required.len() {
        return Ok(None);
    }

    let mut resolved = node.clone();
    resolved.required = Some(remaining).filter(|names| !names.is_empty());
    resolved.exact = Some(false);
    Ok(Some(resolved))
}
