//! Renderer dispatcher: recursive, children-first rendering through the
//! block registry.

use crate::prefetch::EnrichmentResults;
use blockpress_locale::{LocaleRequest, resolve_fields};
use blockpress_model::{ContentTree, Node, ValueStore};
use blockpress_registry::{BlockRegistry, RenderContext, RenderInput, RenderNode};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::warn;

/// How a node's enrichment went in this pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentStatus {
    /// The block declares no enricher.
    #[default]
    NotRequested,
    Enriched,
    Failed,
}

/// What happened to one node during a render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeOutcome {
    pub block_type: String,
    /// Rendered through the unknown-block passthrough.
    pub unknown_type: bool,
    pub enrichment: EnrichmentStatus,
    /// The renderer returned an error and the node rendered as blank.
    pub render_failed: bool,
}

/// Result of rendering a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderOutput {
    /// A fragment holding the rendered root nodes in order.
    pub root: RenderNode,
    /// Per-node outcome, keyed by node id.
    pub outcomes: BTreeMap<String, NodeOutcome>,
}

impl RenderOutput {
    pub fn to_html(&self) -> String {
        self.root.to_html()
    }

    pub fn outcome(&self, node_id: &str) -> Option<&NodeOutcome> {
        self.outcomes.get(node_id)
    }
}

/// Renders trees against a shared registry.
#[derive(Debug, Clone)]
pub struct RenderDispatcher {
    registry: Arc<BlockRegistry>,
}

impl RenderDispatcher {
    pub fn new(registry: Arc<BlockRegistry>) -> Self {
        Self { registry }
    }

    /// Renders every node depth-first. Each node's children are rendered
    /// before the node itself, and handed to its renderer.
    ///
    /// Never fails: unknown types pass their children through, missing
    /// enrichment data is `None`, and a failing renderer leaves a blank
    /// region.
    pub fn render(
        &self,
        tree: &ContentTree,
        values: &ValueStore,
        enrichment: &EnrichmentResults,
        locale: &LocaleRequest,
        ctx: &RenderContext,
    ) -> RenderOutput {
        let mut pass = RenderPass {
            registry: &self.registry,
            values,
            enrichment,
            locale,
            ctx,
            visited: HashSet::new(),
            outcomes: BTreeMap::new(),
        };
        let roots = tree
            .roots()
            .iter()
            .filter_map(|node| pass.render_node(node))
            .collect();
        RenderOutput {
            root: RenderNode::fragment(roots),
            outcomes: pass.outcomes,
        }
    }
}

struct RenderPass<'a> {
    registry: &'a BlockRegistry,
    values: &'a ValueStore,
    enrichment: &'a EnrichmentResults,
    locale: &'a LocaleRequest,
    ctx: &'a RenderContext,
    visited: HashSet<&'a str>,
    outcomes: BTreeMap<String, NodeOutcome>,
}

impl<'a> RenderPass<'a> {
    fn render_node(&mut self, node: &'a Node) -> Option<RenderNode> {
        if !self.visited.insert(node.id.as_str()) {
            warn!(node_id = %node.id, "node id repeated in tree, skipping duplicate");
            return None;
        }

        let registry = self.registry;
        let def = registry.lookup(&node.block_type);
        let unknown_type = def.is_unknown();
        if unknown_type {
            warn!(node_id = %node.id, block_type = %node.block_type, "unknown block type, rendering children only");
        } else if let Err(violation) = def.child_policy().check(&node.id, &node.block_type, node.children.len()) {
            warn!(%violation, "child policy violated in stored content");
        }

        let mut raw = self.values.values_for(&node.id);
        def.schema().apply_defaults(&mut raw);
        let resolved = resolve_fields(&raw, def.schema(), self.locale);

        let children: Vec<RenderNode> = node
            .children
            .iter()
            .filter_map(|child| self.render_node(child))
            .collect();

        let enrichment = self.enrichment;
        let data = enrichment.get(&node.id);
        let status = if data.is_some() {
            EnrichmentStatus::Enriched
        } else if enrichment.is_failed(&node.id) {
            EnrichmentStatus::Failed
        } else {
            EnrichmentStatus::NotRequested
        };

        let input = RenderInput {
            node_id: &node.id,
            block_type: &node.block_type,
            values: &resolved,
            data,
            children,
            ctx: self.ctx,
        };
        let (rendered, render_failed) = match def.render(input) {
            Ok(out) => (out, false),
            Err(error) => {
                warn!(node_id = %node.id, block_type = %node.block_type, %error, "renderer failed, leaving blank");
                (RenderNode::Empty, true)
            }
        };

        self.outcomes.insert(
            node.id.clone(),
            NodeOutcome {
                block_type: node.block_type.clone(),
                unknown_type,
                enrichment: status,
                render_failed,
            },
        );
        Some(rendered)
    }
}
