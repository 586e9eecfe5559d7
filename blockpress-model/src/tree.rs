//! The page's ordered tree of typed block nodes.

use crate::error::{ModelError, ModelResult, StructuralError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// One block occurrence in a page.
///
/// Nodes carry only identity, type and nesting. Field values live in the
/// [`ValueStore`](crate::ValueStore) under the node's id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    /// Registry discriminator.
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    /// Creates a node with a fresh time-ordered id.
    #[must_use]
    pub fn new(block_type: impl Into<String>) -> Self {
        Self::with_id(Uuid::now_v7().to_string(), block_type)
    }

    #[must_use]
    pub fn with_id(id: impl Into<String>, block_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            block_type: block_type.into(),
            children: Vec::new(),
        }
    }

    /// Appends a child, builder style.
    #[must_use]
    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }

    fn collect_ids<'a>(&'a self, out: &mut HashSet<&'a str>) {
        out.insert(&self.id);
        for c in &self.children {
            c.collect_ids(out);
        }
    }

    fn contains(&self, id: &str) -> bool {
        self.id == id || self.children.iter().any(|c| c.contains(id))
    }
}

/// An ordered sequence of root nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentTree {
    roots: Vec<Node>,
}

impl ContentTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_roots(roots: Vec<Node>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes at every depth.
    pub fn len(&self) -> usize {
        self.roots.iter().map(Node::subtree_len).sum()
    }

    pub fn find(&self, id: &str) -> Option<&Node> {
        find_in(&self.roots, id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        find_in_mut(&mut self.roots, id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Returns the ids of every node in the tree.
    pub fn ids(&self) -> HashSet<&str> {
        let mut out = HashSet::new();
        for r in &self.roots {
            r.collect_ids(&mut out);
        }
        out
    }

    /// Returns `(parent id, index among siblings)` for a node.
    /// Root-level nodes have no parent.
    pub fn locate(&self, id: &str) -> Option<(Option<String>, usize)> {
        locate_in(&self.roots, None, id)
    }

    /// Inserts `node` (with its subtree) under `parent`, or at root level when
    /// `parent` is `None`, at sibling position `index`.
    pub fn insert(&mut self, parent: Option<&str>, index: usize, node: Node) -> ModelResult<()> {
        let mut incoming = HashSet::new();
        node.collect_ids(&mut incoming);
        let existing = self.ids();
        if let Some(dup) = incoming.iter().find(|id| existing.contains(*id)) {
            return Err(StructuralError::DuplicateId {
                id: (*dup).to_string(),
            }
            .into());
        }

        let siblings = self.siblings_mut(parent)?;
        if index > siblings.len() {
            return Err(ModelError::InvalidPosition {
                index,
                len: siblings.len(),
            });
        }
        siblings.insert(index, node);
        Ok(())
    }

    /// Detaches a node and returns it with its subtree.
    pub fn remove(&mut self, id: &str) -> Option<Node> {
        remove_in(&mut self.roots, id)
    }

    /// Moves a node (with its subtree) under `new_parent` at `index`.
    ///
    /// Moving a node under itself or one of its descendants is rejected as a
    /// cycle. On error the tree is left unchanged.
    pub fn move_node(&mut self, id: &str, new_parent: Option<&str>, index: usize) -> ModelResult<()> {
        let node = self
            .find(id)
            .ok_or_else(|| ModelError::NodeNotFound(id.to_string()))?;
        if let Some(p) = new_parent {
            if node.contains(p) {
                return Err(StructuralError::Cycle { id: id.to_string() }.into());
            }
            if !self.contains(p) {
                return Err(ModelError::NodeNotFound(p.to_string()));
            }
        }

        let (old_parent, old_index) = self
            .locate(id)
            .ok_or_else(|| ModelError::NodeNotFound(id.to_string()))?;
        let detached = self
            .remove(id)
            .ok_or_else(|| ModelError::NodeNotFound(id.to_string()))?;

        let siblings = self.siblings_mut(new_parent)?;
        if index > siblings.len() {
            let len = siblings.len();
            self.siblings_mut(old_parent.as_deref())?
                .insert(old_index, detached);
            return Err(ModelError::InvalidPosition { index, len });
        }
        siblings.insert(index, detached);
        Ok(())
    }

    fn siblings_mut(&mut self, parent: Option<&str>) -> ModelResult<&mut Vec<Node>> {
        match parent {
            None => Ok(&mut self.roots),
            Some(p) => self
                .find_mut(p)
                .map(|n| &mut n.children)
                .ok_or_else(|| ModelError::NodeNotFound(p.to_string())),
        }
    }
}

fn find_in<'a>(nodes: &'a [Node], id: &str) -> Option<&'a Node> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_in(&node.children, id) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut<'a>(nodes: &'a mut [Node], id: &str) -> Option<&'a mut Node> {
    for node in nodes.iter_mut() {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_in_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

fn locate_in(nodes: &[Node], parent: Option<&str>, id: &str) -> Option<(Option<String>, usize)> {
    for (i, node) in nodes.iter().enumerate() {
        if node.id == id {
            return Some((parent.map(str::to_string), i));
        }
        if let Some(found) = locate_in(&node.children, Some(&node.id), id) {
            return Some(found);
        }
    }
    None
}

fn remove_in(nodes: &mut Vec<Node>, id: &str) -> Option<Node> {
    if let Some(pos) = nodes.iter().position(|n| n.id == id) {
        return Some(nodes.remove(pos));
    }
    nodes
        .iter_mut()
        .find_map(|n| remove_in(&mut n.children, id))
}
