//! Split an implicit multi-type union into explicit `oneOf` branches.
//!
//! `{types: [string, number]}` becomes `{oneOf: [a, b]}` with
//! `a = {parent, types: [string]}` and `b = {parent, types: [number]}`. The
//! rest of the node stays on the parent and reaches the branches through
//! `mergeParent`. This must run before any pass that merges types.

use indexmap::IndexSet;

use crate::arena::SchemaArena;
use crate::node::{NodeKey, SchemaNode, TypeTag};

use super::{attach_one_of, TransformResult};

pub fn single_type(arena: &mut SchemaArena, key: NodeKey) -> TransformResult {
    let mut node = arena.get_item(key)?.clone();
    if !node.is_type_union() {
        return Ok(None);
    }

    let types: IndexSet<TypeTag> = node.types.take().unwrap_or_default().into_iter().collect();
    if types.len() == 1 {
        node.types = Some(types.into_iter().collect());
        return Ok(Some(node));
    }

    let branches = types
        .into_iter()
        .map(|tag| {
            arena.add_item(SchemaNode {
                parent: Some(key),
                types: Some(vec![tag]),
                ..SchemaNode::default()
            })
        })
        .collect();
    attach_one_of(arena, &mut node, branches);
    Ok(Some(node))
}
