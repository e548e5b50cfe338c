//! Merge policies used when a split child absorbs its parent.
//!
//! Merge semantics follow `allOf`: a value must satisfy both sides, so
//! types narrow, value options intersect, `required` unions, and numeric
//! bounds tighten. Sub-schemas present on both sides are not merged
//! structurally; instead a new `{allOf: [left, right]}` node is appended and
//! later passes normalize it like any other conjunction.

use indexmap::IndexSet;
use serde_json::Value;

use crate::arena::SchemaArena;
use crate::error::NormalizeError;
use crate::node::{KeyMap, NodeKey, SchemaNode, TypeTag};

// ---------------------------------------------------------------------------
// Node merge
// ---------------------------------------------------------------------------

/// Merge `parent`'s content into `child`, returning the combined node.
///
/// The child's metadata and control links are kept as-is; the parent's are
/// ignored. Appends one `allOf` node per sub-schema both sides define.
pub fn merge_nodes(
    arena: &mut SchemaArena,
    child: &SchemaNode,
    parent: &SchemaNode,
) -> Result<SchemaNode, NormalizeError> {
    let mut merged = child.clone();

    merged.types = merge_types(child.types.as_deref(), parent.types.as_deref())?;
    merged.options = intersect_options(child.options.as_deref(), parent.options.as_deref());
    merged.required = union_required(child.required.as_ref(), parent.required.as_ref());

    // --- Tighten: lower bounds ---
    merged.minimum_inclusive = tighten_min(child.minimum_inclusive, parent.minimum_inclusive);
    merged.minimum_exclusive = tighten_min(child.minimum_exclusive, parent.minimum_exclusive);
    merged.minimum_length = tighten_min(child.minimum_length, parent.minimum_length);
    merged.minimum_items = tighten_min(child.minimum_items, parent.minimum_items);
    merged.minimum_properties = tighten_min(child.minimum_properties, parent.minimum_properties);

    // --- Tighten: upper bounds ---
    merged.maximum_inclusive = tighten_max(child.maximum_inclusive, parent.maximum_inclusive);
    merged.maximum_exclusive = tighten_max(child.maximum_exclusive, parent.maximum_exclusive);
    merged.maximum_length = tighten_max(child.maximum_length, parent.maximum_length);
    merged.maximum_items = tighten_max(child.maximum_items, parent.maximum_items);
    merged.maximum_properties = tighten_max(child.maximum_properties, parent.maximum_properties);

    // --- Child wins, parent fills the gap ---
    merged.multiple_of = child.multiple_of.or(parent.multiple_of);

    // --- Union: string constraint lists, strictness ---
    merged.value_pattern = union_list(child.value_pattern.as_deref(), parent.value_pattern.as_deref());
    merged.value_format = union_list(child.value_format.as_deref(), parent.value_format.as_deref());
    merged.unique_items = match (child.unique_items, parent.unique_items) {
        (Some(a), Some(b)) => Some(a || b),
        (a, b) => a.or(b),
    };

    // --- Per-key allOf merge: sub-schemas ---
    merged.object_properties = merge_key_maps(
        arena,
        child.object_properties.as_ref(),
        parent.object_properties.as_ref(),
    );
    merged.pattern_properties = merge_key_maps(
        arena,
        child.pattern_properties.as_ref(),
        parent.pattern_properties.as_ref(),
    );
    merged.dependent_schemas = merge_key_maps(
        arena,
        child.dependent_schemas.as_ref(),
        parent.dependent_schemas.as_ref(),
    );
    merged.tuple_items = merge_key_lists(
        arena,
        child.tuple_items.as_deref(),
        parent.tuple_items.as_deref(),
    );
    merged.map_properties = merge_keys(arena, child.map_properties, parent.map_properties);
    merged.array_items = merge_keys(arena, child.array_items, parent.array_items);
    merged.property_names = merge_keys(arena, child.property_names, parent.property_names);
    merged.contains = merge_keys(arena, child.contains, parent.contains);

    Ok(merged)
}

// ---------------------------------------------------------------------------
// Facet policies
// ---------------------------------------------------------------------------

/// Intersect two type facets.
///
/// Both sides must hold at most one type. `any` yields the other side,
/// identical types pass through, and any other pair of distinct types is
/// unsatisfiable (`never`), `integer` against `number` included.
pub fn merge_types(
    left: Option<&[TypeTag]>,
    right: Option<&[TypeTag]>,
) -> Result<Option<Vec<TypeTag>>, NormalizeError> {
    let left = left.filter(|types| !types.is_empty());
    let right = right.filter(|types| !types.is_empty());

    let (left, right) = match (left, right) {
        (None, None) => return Ok(None),
        (Some(only), None) | (None, Some(only)) => return Ok(Some(only.to_vec())),
        (Some(l), Some(r)) => (l, r),
    };

    if left.len() > 1 || right.len() > 1 {
        return Err(NormalizeError::TypeMergePrecondition {
            left: left.to_vec(),
            right: right.to_vec(),
        });
    }

    let merged = match (left[0], right[0]) {
        (TypeTag::Any, other) | (other, TypeTag::Any) => other,
        (a, b) if a == b => a,
        _ => TypeTag::Never,
    };
    Ok(Some(vec![merged]))
}

/// Keep only the values allowed by both sides, in `left` order.
pub fn intersect_options(left: Option<&[Value]>, right: Option<&[Value]>) -> Option<Vec<Value>> {
    match (left, right) {
        (Some(l), Some(r)) => Some(l.iter().filter(|v| r.contains(v)).cloned().collect()),
        (l, r) => l.or(r).map(<[Value]>::to_vec),
    }
}

/// Union of required property names; `left` order first.
pub fn union_required(
    left: Option<&IndexSet<String>>,
    right: Option<&IndexSet<String>>,
) -> Option<IndexSet<String>> {
    match (left, right) {
        (Some(l), Some(r)) => Some(l.union(r).cloned().collect()),
        (l, r) => l.or(r).cloned(),
    }
}

/// Order-preserving, duplicate-free union of two lists.
pub fn union_list<T: PartialEq + Clone>(left: Option<&[T]>, right: Option<&[T]>) -> Option<Vec<T>> {
    match (left, right) {
        (Some(l), Some(r)) => {
            let mut merged = l.to_vec();
            for item in r {
                if !merged.contains(item) {
                    merged.push(item.clone());
                }
            }
            Some(merged)
        }
        (l, r) => l.or(r).map(<[T]>::to_vec),
    }
}

/// Tighten a lower bound: the larger value wins.
pub fn tighten_min<T: PartialOrd + Copy>(left: Option<T>, right: Option<T>) -> Option<T> {
    match (left, right) {
        (Some(l), Some(r)) => Some(if r > l { r } else { l }),
        (l, r) => l.or(r),
    }
}

/// Tighten an upper bound: the smaller value wins.
pub fn tighten_max<T: PartialOrd + Copy>(left: Option<T>, right: Option<T>) -> Option<T> {
    match (left, right) {
        (Some(l), Some(r)) => Some(if r < l { r } else { l }),
        (l, r) => l.or(r),
    }
}

// ---------------------------------------------------------------------------
// Sub-schema policies
// ---------------------------------------------------------------------------

/// Merge two sub-schema links. Distinct links become a new `allOf` node.
pub fn merge_keys(
    arena: &mut SchemaArena,
    left: Option<NodeKey>,
    right: Option<NodeKey>,
) -> Option<NodeKey> {
    match (left, right) {
        (Some(l), Some(r)) if l == r => Some(l),
        (Some(l), Some(r)) => Some(arena.add_item(SchemaNode {
            all_of: Some(vec![l, r]),
            ..SchemaNode::default()
        })),
        (l, r) => l.or(r),
    }
}

/// Per-key merge of two string → key maps; `left` key order first.
pub fn merge_key_maps(
    arena: &mut SchemaArena,
    left: Option<&KeyMap>,
    right: Option<&KeyMap>,
) -> Option<KeyMap> {
    let (left, right) = match (left, right) {
        (Some(l), Some(r)) => (l, r),
        (l, r) => return l.or(r).cloned(),
    };

    let mut merged = KeyMap::with_capacity(left.len() + right.len());
    for (name, key) in left {
        let combined = merge_keys(arena, Some(*key), right.get(name).copied());
        if let Some(combined) = combined {
            merged.insert(name.clone(), combined);
        }
    }
    for (name, key) in right {
        if !merged.contains_key(name) {
            merged.insert(name.clone(), *key);
        }
    }
    Some(merged)
}

/// Per-index merge of two positional lists (tuple items).
pub fn merge_key_lists(
    arena: &mut SchemaArena,
    left: Option<&[NodeKey]>,
    right: Option<&[NodeKey]>,
) -> Option<Vec<NodeKey>> {
    let (left, right) = match (left, right) {
        (Some(l), Some(r)) => (l, r),
        (l, r) => return l.or(r).map(<[NodeKey]>::to_vec),
    };

    let len = left.len().max(right.len());
    let merged = (0..len)
        .filter_map(|i| merge_keys(arena, left.get(i).copied(), right.get(i).copied()))
        .collect();
    Some(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use TypeTag::*;

    fn tags(types: &[TypeTag]) -> Option<&[TypeTag]> {
        Some(types)
    }

    #[test]
    fn test_merge_types_any_is_identity() {
        assert_eq!(
            merge_types(tags(&[Any]), tags(&[String])).unwrap(),
            Some(vec![String])
        );
        assert_eq!(
            merge_types(tags(&[Object]), tags(&[Any])).unwrap(),
            Some(vec![Object])
        );
    }

    #[test]
    fn test_merge_types_same_and_distinct() {
        assert_eq!(
            merge_types(tags(&[Boolean]), tags(&[Boolean])).unwrap(),
            Some(vec![Boolean])
        );
        assert_eq!(
            merge_types(tags(&[String]), tags(&[Boolean])).unwrap(),
            Some(vec![Never])
        );
    }

    #[test]
    fn test_merge_types_integer_and_number_are_distinct() {
        assert_eq!(
            merge_types(tags(&[Number]), tags(&[Integer])).unwrap(),
            Some(vec![Never])
        );
        assert_eq!(
            merge_types(tags(&[Integer]), tags(&[Number])).unwrap(),
            Some(vec![Never])
        );
    }

    #[test]
    fn test_merge_types_one_side_absent() {
        assert_eq!(merge_types(None, tags(&[Null])).unwrap(), Some(vec![Null]));
        assert_eq!(merge_types(tags(&[]), None).unwrap(), None);
    }

    #[test]
    fn test_merge_types_multi_type_is_fatal() {
        let err = merge_types(tags(&[String, Null]), tags(&[String])).unwrap_err();
        assert!(matches!(err, NormalizeError::TypeMergePrecondition { .. }));
    }

    #[test]
    fn test_intersect_options() {
        let left = [json!("a"), json!("b"), json!(1)];
        let right = [json!(1), json!("a")];
        assert_eq!(
            intersect_options(Some(&left[..]), Some(&right[..])),
            Some(vec![json!("a"), json!(1)])
        );
        assert_eq!(intersect_options(None, Some(&right[..])), Some(right.to_vec()));
    }

    #[test]
    fn test_union_required_preserves_order() {
        let left: IndexSet<std::string::String> = ["b", "a"].iter().map(|s| s.to_string()).collect();
        let right: IndexSet<std::string::String> = ["c", "a"].iter().map(|s| s.to_string()).collect();
        let merged = union_required(Some(&left), Some(&right)).unwrap();
        let names: Vec<&str> = merged.iter().map(|s| s.as_str()).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn test_tighten_bounds() {
        assert_eq!(tighten_min(Some(0.0), Some(10.0)), Some(10.0));
        assert_eq!(tighten_max(Some(100u64), Some(50)), Some(50));
        assert_eq!(tighten_min(None, Some(3u64)), Some(3));
    }

    #[test]
    fn test_merge_key_maps_creates_all_of_for_shared_keys() {
        let mut arena = SchemaArena::from_items(vec![SchemaNode::default(); 4]);
        let left: KeyMap = [("a".to_string(), 0), ("b".to_string(), 1)].into_iter().collect();
        let right: KeyMap = [("b".to_string(), 2), ("c".to_string(), 3)].into_iter().collect();

        let merged = merge_key_maps(&mut arena, Some(&left), Some(&right)).unwrap();

        let entries: Vec<(&str, NodeKey)> = merged.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(entries, vec![("a", 0), ("b", 4), ("c", 3)]);
        assert_eq!(arena.get_item(4).unwrap().all_of, Some(vec![1, 2]));
    }

    #[test]
    fn test_merge_keys_same_key_no_new_node() {
        let mut arena = SchemaArena::from_items([SchemaNode::default()]);
        assert_eq!(merge_keys(&mut arena, Some(0), Some(0)), Some(0));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_merge_nodes() {
        let mut arena = SchemaArena::from_items(vec![SchemaNode::default(); 3]);
        let child: SchemaNode = serde_json::from_value(json!({
            "parent": 0,
            "types": ["integer"],
            "minimumInclusive": 5.0,
            "required": ["id"],
            "objectProperties": { "id": 1 }
        }))
        .unwrap();
        let parent: SchemaNode = serde_json::from_value(json!({
            "types": ["integer"],
            "minimumInclusive": 1.0,
            "maximumInclusive": 9.0,
            "required": ["name"],
            "objectProperties": { "id": 2 }
        }))
        .unwrap();

        let merged = merge_nodes(&mut arena, &child, &parent).unwrap();

        assert_eq!(merged.parent, Some(0));
        assert_eq!(merged.types, Some(vec![Integer]));
        assert_eq!(merged.minimum_inclusive, Some(5.0));
        assert_eq!(merged.maximum_inclusive, Some(9.0));
        assert_eq!(merged.required.as_ref().map(IndexSet::len), Some(2));
        assert_eq!(merged.object_properties.as_ref().unwrap()["id"], 3);
        assert_eq!(arena.get_item(3).unwrap().all_of, Some(vec![1, 2]));
    }
}
