//! Alias resolution and link validation.
//!
//! An alias node has no meaning of its own; consumers must chase `alias`
//! links to the first non-alias node. In an acyclic arena that chase takes
//! fewer than `len()` hops, so the walk is bounded by the arena size and a
//! longer walk is reported as [`NormalizeError::AliasCycle`].

use crate::arena::SchemaArena;
use crate::error::NormalizeError;
use crate::node::{NodeKey, SchemaNode};

impl SchemaArena {
    /// Follow `alias` links from `key` to the first node without one.
    pub fn resolve_item(&self, key: NodeKey) -> Result<(NodeKey, &SchemaNode), NormalizeError> {
        let mut current = key;
        for _ in 0..=self.len() {
            let node = self.get_item(current)?;
            match node.alias {
                Some(next) => current = next,
                None => return Ok((current, node)),
            }
        }
        Err(NormalizeError::AliasCycle {
            key,
            hops: self.len(),
        })
    }

    /// Key-only variant of [`resolve_item`](Self::resolve_item).
    pub fn resolve_key(&self, key: NodeKey) -> Result<NodeKey, NormalizeError> {
        self.resolve_item(key).map(|(resolved, _)| resolved)
    }

    /// Check that every link in every node addresses an arena slot.
    pub fn validate_references(&self) -> Result<(), NormalizeError> {
        let size = self.len();
        for (_, node) in self.iter() {
            if let Some(key) = node.child_keys().into_iter().find(|k| *k >= size) {
                return Err(NormalizeError::KeyOutOfRange { key, size });
            }
        }
        Ok(())
    }

    /// Check that every key resolves to a non-alias node.
    pub fn validate_aliases(&self) -> Result<(), NormalizeError> {
        for key in 0..self.len() {
            self.resolve_item(key)?;
        }
        Ok(())
    }
}
