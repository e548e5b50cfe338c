//! Fold a split parent's content into its child.
//!
//! Children created by `explode` and `singleType` carry `parent = key`. Once
//! the parent is itself complete (has no `parent` of its own), its content is
//! merged into the child with [`merge_nodes`] and the link is cleared.

use crate::arena::SchemaArena;
use crate::merge::merge_nodes;
use crate::node::NodeKey;

use super::TransformResult;

pub fn merge_parent(arena: &mut SchemaArena, key: NodeKey) -> TransformResult {
    let child = arena.get_item(key)?;
    let Some(parent_key) = child.parent else {
        return Ok(None);
    };
    let parent = arena.get_item(parent_key)?;
    if parent.has_parent() {
        return Ok(None);
    }

    let child = child.clone();
    let parent = parent.clone();
    let mut merged = merge_nodes(arena, &child, &parent)?;
    merged.parent = None;
    Ok(Some(merged))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::error::NormalizeError;
    use crate::transforms::test_support::{arena, dump, run};
    use crate::transforms::Transform;

    #[test]
    fn test_merges_and_clears_parent() {
        let mut a = arena(json!([
            { "types": ["object"], "required": ["id"], "objectProperties": { "id": 3 } },
            { "parent": 0, "required": ["name"], "objectProperties": { "name": 4 } },
            { "parent": 0, "types": ["string"] },
            {}, {}
        ]));
        run(&mut a, &[Transform::MergeParent]);
        let out = dump(&a);
        assert_eq!(
            out[1],
            json!({
                "types": ["object"],
                "required": ["name", "id"],
                "objectProperties": { "name": 4, "id": 3 }
            })
        );
        assert_eq!(
            out[2],
            json!({ "types": ["never"], "required": ["id"], "objectProperties": { "id": 3 } })
        );
    }

    #[test]
    fn test_waits_for_grandparent() {
        let mut a = arena(json!([
            { "types": ["string"] },
            { "parent": 0 },
            { "parent": 1, "types": ["any"] }
        ]));
        // Key 1 merges first in the pass, so key 2 sees a complete parent.
        assert_eq!(a.apply_transform(&[Transform::MergeParent]).unwrap(), 2);
        assert_eq!(dump(&a)[2], json!({ "types": ["string"] }));
    }

    #[test]
    fn test_later_parent_waits_a_pass() {
        let mut a = arena(json!([
            { "parent": 1, "types": ["any"] },
            { "parent": 2 },
            { "types": ["boolean"] }
        ]));
        assert_eq!(a.apply_transform(&[Transform::MergeParent]).unwrap(), 1);
        assert_eq!(a.apply_transform(&[Transform::MergeParent]).unwrap(), 1);
        assert_eq!(dump(&a)[0], json!({ "types": ["boolean"] }));
    }

    #[test]
    fn test_shared_property_becomes_all_of() {
        let mut a = arena(json!([
            { "objectProperties": { "x": 2 } },
            { "parent": 0, "objectProperties": { "x": 3 } },
            {}, {}
        ]));
        run(&mut a, &[Transform::MergeParent]);
        assert_eq!(a.get_item(1).unwrap().object_properties.as_ref().unwrap()["x"], 4);
        assert_eq!(a.get_item(4).unwrap().all_of, Some(vec![3, 2]));
    }

    #[test]
    fn test_multi_type_parent_is_fatal() {
        let mut a = arena(json!([
            { "types": ["string", "null"] },
            { "parent": 0, "types": ["string"] }
        ]));
        let err = a.apply_transform(&[Transform::MergeParent]).unwrap_err();
        assert!(matches!(err, NormalizeError::TypeMergePrecondition { .. }));
    }
}
