//! Per-node field values keyed by node id.

use crate::tree::ContentTree;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Maps node id → the node's field values.
///
/// Independent of tree shape: moving a node never touches this map. Ordered by
/// id so serialized pages are stable across saves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueStore {
    entries: BTreeMap<String, Value>,
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, node_id: &str) -> Option<&Value> {
        self.entries.get(node_id)
    }

    /// Returns a node's values, or an empty object when the node has no entry.
    pub fn values_for(&self, node_id: &str) -> Value {
        self.entries
            .get(node_id)
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()))
    }

    pub fn set(&mut self, node_id: impl Into<String>, values: Value) -> Option<Value> {
        self.entries.insert(node_id.into(), values)
    }

    pub fn remove(&mut self, node_id: &str) -> Option<Value> {
        self.entries.remove(node_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Drops entries for nodes that no longer exist in `tree`.
    /// Returns the number of entries removed.
    pub fn retain_tree(&mut self, tree: &ContentTree) -> usize {
        let ids = tree.ids();
        let before = self.entries.len();
        self.entries.retain(|id, _| ids.contains(id.as_str()));
        before - self.entries.len()
    }
}

impl FromIterator<(String, Value)> for ValueStore {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
