//! Rewrite a conditional as two exclusive alternatives.
//!
//! `{if: i, then: t, else: e}` becomes `{oneOf: [{allOf: [i, t]}, {allOf: [n, e]}]}`
//! with `n = {not: i}`. A missing `then` or `else` branch leaves just the
//! condition (or its negation) in that alternative. Branches with no `if`
//! never apply and are dropped.

use crate::arena::SchemaArena;
use crate::node::{Combinator, NodeKey, SchemaNode};

use super::{attach_one_of, TransformResult};

pub fn resolve_if_then_else(arena: &mut SchemaArena, key: NodeKey) -> TransformResult {
    let mut resolved = arena.get_item(key)?.clone();
    let Some(condition) = resolved.if_.take() else {
        if resolved.then.is_none() && resolved.else_.is_none() {
            return Ok(None);
        }
        resolved.then = None;
        resolved.else_ = None;
        return Ok(Some(resolved));
    };
    let then = resolved.then.take();
    let otherwise = resolved.else_.take();

    let when_true: Vec<NodeKey> = std::iter::once(condition).chain(then).collect();
    let when_true = arena.add_item(SchemaNode::with_combinator(Combinator::AllOf, when_true));

    let negated = arena.add_item(SchemaNode {
        not: Some(condition),
        ..SchemaNode::default()
    });
    let when_false: Vec<NodeKey> = std::iter::once(negated).chain(otherwise).collect();
    let when_false = arena.add_item(SchemaNode::with_combinator(Combinator::AllOf, when_false));

    attach_one_of(arena, &mut resolved, vec![when_true, when_false]);
    Ok(Some(resolved))
}
