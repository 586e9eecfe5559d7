//! Structural and nesting checks over a content tree.

use crate::error::{ChildConstraintViolation, ModelError, ModelResult, StructuralError};
use crate::page::PageContent;
use crate::policy::BlockCatalog;
use crate::tree::{ContentTree, Node};
use std::collections::HashSet;

/// A single problem found by [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    Structural(StructuralError),
    ChildConstraint(ChildConstraintViolation),
}

impl From<Violation> for ModelError {
    fn from(v: Violation) -> Self {
        match v {
            Violation::Structural(e) => ModelError::Structural(e),
            Violation::ChildConstraint(e) => ModelError::ChildConstraint(e),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::Structural(e) => e.fmt(f),
            Violation::ChildConstraint(e) => e.fmt(f),
        }
    }
}

/// Collects every violation in the tree, in traversal order.
///
/// Nodes whose type the catalog does not know are only checked structurally.
/// A node repeating one of its ancestors' ids is reported as a cycle and its
/// subtree is not descended.
pub fn validate(tree: &ContentTree, catalog: &dyn BlockCatalog) -> Vec<Violation> {
    let mut out = Vec::new();
    let mut ancestors = Vec::new();
    let mut seen = HashSet::new();
    walk(tree.roots(), &mut ancestors, &mut seen, catalog, &mut out);
    out
}

/// Save-time check: fails on the first violation.
pub fn ensure_valid(tree: &ContentTree, catalog: &dyn BlockCatalog) -> ModelResult<()> {
    match validate(tree, catalog).into_iter().next() {
        Some(v) => Err(v.into()),
        None => Ok(()),
    }
}

/// Save-time check of a whole page: structure, nesting, then each node's
/// stored values against its block's field schema.
pub fn ensure_page_valid(page: &PageContent, catalog: &dyn BlockCatalog) -> ModelResult<()> {
    ensure_valid(&page.tree, catalog)?;
    for visit in page.tree.traverse() {
        let node = visit.node;
        let Some(schema) = catalog.field_schema(&node.block_type) else {
            continue;
        };
        let violations = schema.check_values(&page.values.values_for(&node.id));
        if !violations.is_empty() {
            return Err(ModelError::InvalidValues {
                node_id: node.id.clone(),
                violations,
            });
        }
    }
    Ok(())
}

fn walk<'a>(
    nodes: &'a [Node],
    ancestors: &mut Vec<&'a str>,
    seen: &mut HashSet<&'a str>,
    catalog: &dyn BlockCatalog,
    out: &mut Vec<Violation>,
) {
    for node in nodes {
        if node.id.is_empty() {
            out.push(Violation::Structural(StructuralError::EmptyId {
                block_type: node.block_type.clone(),
            }));
        } else if ancestors.contains(&node.id.as_str()) {
            out.push(Violation::Structural(StructuralError::Cycle {
                id: node.id.clone(),
            }));
            continue;
        } else if !seen.insert(node.id.as_str()) {
            out.push(Violation::Structural(StructuralError::DuplicateId {
                id: node.id.clone(),
            }));
        }

        if let Some(policy) = catalog.child_policy(&node.block_type) {
            if let Err(v) = policy.check(&node.id, &node.block_type, node.children.len()) {
                out.push(Violation::ChildConstraint(v));
            }
        }

        ancestors.push(node.id.as_str());
        walk(&node.children, ancestors, seen, catalog, out);
        ancestors.pop();
    }
}
