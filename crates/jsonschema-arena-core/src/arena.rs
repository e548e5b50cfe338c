//! Append-only indexed node store.
//!
//! Keys are assigned in creation order and never reused: an item is never
//! removed, only replaced in place. Out-of-range lookups are fatal
//! [`NormalizeError::KeyOutOfRange`] errors rather than `Option`s, since every
//! key in a well-formed arena was handed out by [`Arena::add_item`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::NormalizeError;
use crate::node::{NodeKey, SchemaNode};

/// Generic append-only arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arena<T> {
    items: Vec<T>,
}

/// The arena the pipeline operates on.
pub type SchemaArena = Arena<SchemaNode>;

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an arena; keys follow iteration order.
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }

    /// Append an item, returning its key (the size before insertion).
    pub fn add_item(&mut self, item: T) -> NodeKey {
        let key = self.items.len();
        self.items.push(item);
        key
    }

    pub fn get_item(&self, key: NodeKey) -> Result<&T, NormalizeError> {
        self.items.get(key).ok_or(NormalizeError::KeyOutOfRange {
            key,
            size: self.items.len(),
        })
    }

    /// Replace the item at `key`.
    pub fn set_item(&mut self, key: NodeKey, item: T) -> Result<(), NormalizeError> {
        let size = self.items.len();
        let slot = self
            .items
            .get_mut(key)
            .ok_or(NormalizeError::KeyOutOfRange { key, size })?;
        *slot = item;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `(key, item)` pairs in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &T)> {
        self.items.iter().enumerate()
    }
}

impl SchemaArena {
    /// Seed an arena from `(location, node)` pairs produced by a document
    /// loader. Returns the arena and a location → key index in input order.
    ///
    /// Node links inside the pairs must already be arena keys; the loader
    /// assigns them by position.
    pub fn from_locations<I>(entries: I) -> (Self, IndexMap<String, NodeKey>)
    where
        I: IntoIterator<Item = (String, SchemaNode)>,
    {
        let mut arena = SchemaArena::new();
        let mut locations = IndexMap::new();
        for (location, node) in entries {
            let key = arena.add_item(node);
            locations.insert(location, key);
        }
        (arena, locations)
    }

    /// Load a node document.
    ///
    /// Two shapes are accepted:
    /// - an array of nodes, keyed by position;
    /// - an object of `location → node`, keyed by document order, in which case
    ///   the location index is returned alongside.
    pub fn load_document(
        document: &Value,
    ) -> Result<(Self, IndexMap<String, NodeKey>), NormalizeError> {
        match document {
            Value::Array(nodes) => {
                let mut arena = SchemaArena::new();
                let mut locations = IndexMap::new();
                for node in nodes {
                    let node: SchemaNode = serde_json::from_value(node.clone())?;
                    let key = arena.add_item(node);
                    locations.insert(format!("#/{}", key), key);
                }
                Ok((arena, locations))
            }
            Value::Object(entries) => {
                let mut pairs = Vec::with_capacity(entries.len());
                for (location, node) in entries {
                    let node: SchemaNode = serde_json::from_value(node.clone())?;
                    pairs.push((location.clone(), node));
                }
                Ok(SchemaArena::from_locations(pairs))
            }
            other => Err(NormalizeError::InvalidDocument(format!(
                "expected an array or object of nodes, found {}",
                json_kind(other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
