//! Schema node model and classification predicates.
//!
//! A [`SchemaNode`] is a sparse record: every field is optional and a node
//! typically carries only a handful of them. Links to other nodes are plain
//! [`NodeKey`] integers into the owning arena, never references, so the graph
//! can hold cycles without any ownership cycle.
//!
//! Fields fall into two groups:
//! - **metadata** (`id`, `title`, `description`, `examples`, `deprecated`,
//!   `exact`) describes the node but never changes what it accepts;
//! - **content** is everything else. The "bare" predicates below ignore
//!   metadata when deciding whether a node carries a single concern.

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Index of a node in its arena.
pub type NodeKey = usize;

/// Ordered string → key mapping (`objectProperties`, `patternProperties`, ...).
pub type KeyMap = IndexMap<String, NodeKey>;

/// A JSON Schema type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Never,
    Any,
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl TypeTag {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::Never => "never",
            TypeTag::Any => "any",
            TypeTag::Null => "null",
            TypeTag::Boolean => "boolean",
            TypeTag::Integer => "integer",
            TypeTag::Number => "number",
            TypeTag::String => "string",
            TypeTag::Array => "array",
            TypeTag::Object => "object",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One arena entry: a fragment of a schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SchemaNode {
    // -- metadata --------------------------------------------------------
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
    /// `Some(false)` once a rewrite produced an approximation of the source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact: Option<bool>,

    // -- control links ---------------------------------------------------
    /// This node means exactly what the target node means.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<NodeKey>,
    /// Transient back-pointer set on split children, cleared by `mergeParent`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeKey>,
    /// Type-equality link kept through code generation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<NodeKey>,

    // -- type and value facets ---------------------------------------------
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<TypeTag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<Value>>,

    // -- combinators -------------------------------------------------------
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<NodeKey>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<NodeKey>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<NodeKey>>,

    // -- conditional -------------------------------------------------------
    #[serde(rename = "if", skip_serializing_if = "Option::is_none")]
    pub if_: Option<NodeKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub then: Option<NodeKey>,
    #[serde(rename = "else", skip_serializing_if = "Option::is_none")]
    pub else_: Option<NodeKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not: Option<NodeKey>,

    // -- structural --------------------------------------------------------
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tuple_items: Option<Vec<NodeKey>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_items: Option<NodeKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains: Option<NodeKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_properties: Option<KeyMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_properties: Option<KeyMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependent_schemas: Option<KeyMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_properties: Option<NodeKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_names: Option<NodeKey>,

    // -- constraints -------------------------------------------------------
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_inclusive: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_exclusive: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_inclusive: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_exclusive: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_pattern: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_format: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_properties: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_properties: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<IndexSet<String>>,
}

/// Which of the three boolean combinators a transform operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    AllOf,
    AnyOf,
    OneOf,
}

impl Combinator {
    pub fn name(self) -> &'static str {
        match self {
            Combinator::AllOf => "allOf",
            Combinator::AnyOf => "anyOf",
            Combinator::OneOf => "oneOf",
        }
    }
}

impl SchemaNode {
    // -----------------------------------------------------------------------
    // Combinator access
    // -----------------------------------------------------------------------

    pub fn combinator(&self, kind: Combinator) -> Option<&Vec<NodeKey>> {
        match kind {
            Combinator::AllOf => self.all_of.as_ref(),
            Combinator::AnyOf => self.any_of.as_ref(),
            Combinator::OneOf => self.one_of.as_ref(),
        }
    }

    pub fn combinator_mut(&mut self, kind: Combinator) -> &mut Option<Vec<NodeKey>> {
        match kind {
            Combinator::AllOf => &mut self.all_of,
            Combinator::AnyOf => &mut self.any_of,
            Combinator::OneOf => &mut self.one_of,
        }
    }

    /// A node carrying only the given combinator list.
    pub fn with_combinator(kind: Combinator, keys: Vec<NodeKey>) -> Self {
        let mut node = SchemaNode::default();
        *node.combinator_mut(kind) = Some(keys);
        node
    }

    // -----------------------------------------------------------------------
    // Metadata split
    // -----------------------------------------------------------------------

    /// Copy of this node with only its metadata fields.
    pub fn metadata(&self) -> SchemaNode {
        SchemaNode {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            examples: self.examples.clone(),
            deprecated: self.deprecated,
            exact: self.exact,
            ..SchemaNode::default()
        }
    }

    /// Copy of this node with every metadata field cleared.
    pub fn content(&self) -> SchemaNode {
        SchemaNode {
            id: None,
            title: None,
            description: None,
            examples: None,
            deprecated: None,
            exact: None,
            ..self.clone()
        }
    }

    /// True when the node carries no content beyond metadata.
    pub fn is_empty(&self) -> bool {
        self.content() == SchemaNode::default()
    }

    // -----------------------------------------------------------------------
    // Classification predicates
    // -----------------------------------------------------------------------

    pub fn is_alias(&self) -> bool {
        self.alias.is_some()
    }

    pub fn is_reference(&self) -> bool {
        self.reference.is_some()
    }

    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// Exactly one type tag.
    pub fn is_single_type(&self) -> bool {
        self.types.as_ref().is_some_and(|t| t.len() == 1)
    }

    /// More than one type tag: an implicit union still to be split.
    pub fn is_type_union(&self) -> bool {
        self.types.as_ref().is_some_and(|t| t.len() > 1)
    }

    /// An `if` is present. `then`/`else` without one constrain nothing.
    pub fn has_conditional(&self) -> bool {
        self.if_.is_some()
    }

    /// Content is nothing but the given combinator list.
    pub fn is_bare_combinator(&self, kind: Combinator) -> bool {
        let Some(keys) = self.combinator(kind) else {
            return false;
        };
        self.content() == SchemaNode::with_combinator(kind, keys.clone())
    }

    pub fn is_bare_all_of(&self) -> bool {
        self.is_bare_combinator(Combinator::AllOf)
    }

    pub fn is_bare_any_of(&self) -> bool {
        self.is_bare_combinator(Combinator::AnyOf)
    }

    pub fn is_bare_one_of(&self) -> bool {
        self.is_bare_combinator(Combinator::OneOf)
    }

    /// Content is nothing but a `reference`.
    pub fn is_bare_reference(&self) -> bool {
        let Some(target) = self.reference else {
            return false;
        };
        self.content()
            == SchemaNode {
                reference: Some(target),
                ..SchemaNode::default()
            }
    }

    /// Number of distinct structural concerns the node mixes:
    /// reference, conditional, allOf, anyOf, oneOf.
    pub fn concern_count(&self) -> usize {
        [
            self.reference.is_some(),
            self.has_conditional(),
            self.all_of.is_some(),
            self.any_of.is_some(),
            self.one_of.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }

    /// Every node key this node links to, in field order.
    pub fn child_keys(&self) -> Vec<NodeKey> {
        let mut keys = Vec::new();
        let singles = [
            self.alias,
            self.parent,
            self.reference,
            self.if_,
            self.then,
            self.else_,
            self.not,
            self.array_items,
            self.contains,
            self.map_properties,
            self.property_names,
        ];
        keys.extend(singles.into_iter().flatten());
        for list in [&self.all_of, &self.any_of, &self.one_of, &self.tuple_items]
            .into_iter()
            .flatten()
        {
            keys.extend(list.iter().copied());
        }
        for map in [
            &self.object_properties,
            &self.pattern_properties,
            &self.dependent_schemas,
        ]
        .into_iter()
        .flatten()
        {
            keys.extend(map.values().copied());
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: Value) -> SchemaNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_deserializes_camel_case_and_keywords() {
        let n = node(json!({
            "types": ["string", "null"],
            "allOf": [1, 2],
            "if": 3,
            "then": 4,
            "else": 5,
            "objectProperties": { "b": 6, "a": 7 },
            "required": ["b", "a"]
        }));
        assert_eq!(n.types, Some(vec![TypeTag::String, TypeTag::Null]));
        assert_eq!(n.all_of, Some(vec![1, 2]));
        assert_eq!((n.if_, n.then, n.else_), (Some(3), Some(4), Some(5)));
        let props: Vec<&str> = n
            .object_properties
            .as_ref()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(props, ["b", "a"]);
        let required: Vec<&str> = n.required.as_ref().unwrap().iter().map(String::as_str).collect();
        assert_eq!(required, ["b", "a"]);
    }

    #[test]
    fn test_serializes_sparse() {
        let n = SchemaNode {
            one_of: Some(vec![1, 2]),
            ..SchemaNode::default()
        };
        assert_eq!(serde_json::to_value(&n).unwrap(), json!({ "oneOf": [1, 2] }));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<SchemaNode, _> = serde_json::from_value(json!({ "$ref": "#/x" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_bare_predicates_ignore_metadata() {
        let n = node(json!({ "id": "#/a", "title": "A", "allOf": [1] }));
        assert!(n.is_bare_all_of());
        assert!(!n.is_bare_one_of());

        let n = node(json!({ "allOf": [1], "types": ["object"] }));
        assert!(!n.is_bare_all_of());

        assert!(node(json!({ "reference": 4, "id": "x" })).is_bare_reference());
        assert!(!node(json!({ "reference": 4, "parent": 0 })).is_bare_reference());
    }

    #[test]
    fn test_is_empty() {
        assert!(node(json!({})).is_empty());
        assert!(node(json!({ "description": "only docs", "exact": false })).is_empty());
        assert!(!node(json!({ "types": ["any"] })).is_empty());
    }

    #[test]
    fn test_concern_count() {
        assert_eq!(node(json!({ "types": ["string"] })).concern_count(), 0);
        assert_eq!(node(json!({ "if": 1, "else": 2 })).concern_count(), 1);
        assert_eq!(node(json!({ "then": 1, "else": 2 })).concern_count(), 0);
        assert_eq!(
            node(json!({ "reference": 1, "allOf": [2], "oneOf": [3] })).concern_count(),
            3
        );
    }

    #[test]
    fn test_type_predicates() {
        assert!(node(json!({ "types": ["string"] })).is_single_type());
        assert!(node(json!({ "types": ["string", "null"] })).is_type_union());
        assert!(!node(json!({})).is_single_type());
    }

    #[test]
    fn test_child_keys() {
        let n = node(json!({
            "reference": 1,
            "oneOf": [2, 3],
            "objectProperties": { "x": 4 },
            "arrayItems": 5
        }));
        assert_eq!(n.child_keys(), vec![1, 5, 2, 3, 4]);
    }
}
