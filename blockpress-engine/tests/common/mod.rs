//! Shared block definitions and enrichers for engine tests.

#![allow(dead_code)]

use async_trait::async_trait;
use blockpress_model::{ChildPolicy, ContentTree, FieldDef, FieldSchema, Node, PageContent, ValueStore};
use blockpress_registry::{
    BlockDefinition, BlockRegistry, EnrichError, Enricher, RenderContext, RenderError, RenderNode,
};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Counts calls and tracks peak concurrency; echoes the values it was given.
#[derive(Clone, Default)]
pub struct CallCounter {
    pub started: Arc<AtomicUsize>,
    pub finished: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    pub peak: Arc<AtomicUsize>,
}

impl CallCounter {
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

pub struct CountingEnricher {
    pub counter: CallCounter,
    pub latency: Duration,
}

#[async_trait]
impl Enricher for CountingEnricher {
    async fn enrich(&self, values: &Value, ctx: &RenderContext) -> Result<Value, EnrichError> {
        self.counter.started.fetch_add(1, Ordering::SeqCst);
        let now = self.counter.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.counter.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        self.counter.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.counter.finished.fetch_add(1, Ordering::SeqCst);
        Ok(json!({"echo": values, "locale": ctx.locale}))
    }
}

pub struct FailingEnricher;

#[async_trait]
impl Enricher for FailingEnricher {
    async fn enrich(&self, _values: &Value, _ctx: &RenderContext) -> Result<Value, EnrichError> {
        Err(EnrichError::Source("backend unavailable".into()))
    }
}

pub struct PanickingEnricher;

#[async_trait]
impl Enricher for PanickingEnricher {
    async fn enrich(&self, _values: &Value, _ctx: &RenderContext) -> Result<Value, EnrichError> {
        panic!("enricher bug");
    }
}

/// A card: localized title, enrichment rendered as a `data-echo` attribute or
/// "no data".
pub fn card(block_type: &str) -> BlockDefinition {
    BlockDefinition::new(block_type)
        .with_schema(FieldSchema::new(vec![
            FieldDef::text("title").localized().with_default(json!("Untitled")),
        ]))
        .with_render_fn(|input| {
            let title = input.get_str("/title").unwrap_or_default().to_string();
            let body = match input.data {
                Some(_) => "with data",
                None => "no data",
            };
            Ok(RenderNode::element("article")
                .attr("id", input.node_id)
                .child(RenderNode::element("h3").child(RenderNode::text(title)))
                .child(RenderNode::text(body)))
        })
}

pub fn section() -> BlockDefinition {
    BlockDefinition::new("section")
        .with_child_policy(ChildPolicy::container())
        .with_render_fn(|input| Ok(RenderNode::element("section").children(input.children)))
}

pub fn columns() -> BlockDefinition {
    BlockDefinition::new("columns")
        .with_child_policy(ChildPolicy::bounded(4))
        .with_render_fn(|input| Ok(RenderNode::element("div").attr("class", "columns").children(input.children)))
}

pub fn broken() -> BlockDefinition {
    BlockDefinition::new("broken").with_render_fn(|_| Err(RenderError::Failed("template bug".into())))
}

/// Records the order renderers run in.
pub fn recording(block_type: &str, log: Arc<Mutex<Vec<String>>>) -> BlockDefinition {
    BlockDefinition::new(block_type)
        .with_child_policy(ChildPolicy::container())
        .with_render_fn(move |input| {
            log.lock().unwrap().push(input.node_id.to_string());
            Ok(RenderNode::fragment(input.children))
        })
}

pub fn registry_with(defs: Vec<BlockDefinition>) -> Arc<BlockRegistry> {
    let mut builder = BlockRegistry::builder();
    for def in defs {
        builder.register(def).unwrap();
    }
    Arc::new(builder.build())
}

/// `n` sibling nodes of `block_type` under one section.
pub fn flat_page(block_type: &str, n: usize) -> PageContent {
    let section = (0..n).fold(Node::with_id("root", "section"), |s, i| {
        s.child(Node::with_id(format!("n{i}"), block_type))
    });
    PageContent::new(ContentTree::from_roots(vec![section]), ValueStore::new())
}
