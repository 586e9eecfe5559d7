//! Canonical depth-first order over a content tree.
//!
//! Both the prefetch pass and the render pass walk the tree through
//! [`traverse`], so they agree on node order.

use crate::tree::{ContentTree, Node};

/// A node together with the ids of its ancestors, outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit<'a> {
    pub node: &'a Node,
    pub parent_path: Vec<&'a str>,
}

impl Visit<'_> {
    pub fn depth(&self) -> usize {
        self.parent_path.len()
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_path.last().copied()
    }
}

/// Lazy pre-order iterator. Holds only borrowed nodes, so calling
/// [`traverse`] again restarts from the first root.
#[derive(Debug, Clone)]
pub struct Traverse<'a> {
    stack: Vec<(&'a Node, Vec<&'a str>)>,
}

pub fn traverse(tree: &ContentTree) -> Traverse<'_> {
    let stack = tree.roots().iter().rev().map(|n| (n, Vec::new())).collect();
    Traverse { stack }
}

impl<'a> Iterator for Traverse<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (node, parent_path) = self.stack.pop()?;
        if !node.children.is_empty() {
            let mut child_path = parent_path.clone();
            child_path.push(node.id.as_str());
            for child in node.children.iter().rev() {
                self.stack.push((child, child_path.clone()));
            }
        }
        Some(Visit { node, parent_path })
    }
}

impl ContentTree {
    /// Shorthand for [`traverse`].
    pub fn traverse(&self) -> Traverse<'_> {
        traverse(self)
    }
}
