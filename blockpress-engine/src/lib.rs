//! Render pipeline for blockpress pages.
//!
//! # Pipeline
//!
//! 1. **Locale**: the request's locale becomes a [`LocaleRequest`](blockpress_locale::LocaleRequest)
//!    (requested → fallback chain → default)
//! 2. **Prefetch**: [`PrefetchOrchestrator`] runs each node's enricher with
//!    bounded concurrency and per-call timeouts, then waits for all of them
//! 3. **Render**: [`RenderDispatcher`] walks the tree depth-first, rendering
//!    children before their parent, through the block registry
//!
//! Per node, a pass moves `Pending → LocaleResolved → Enriched | EnrichmentFailed
//! → Rendered`; every node reaches `Rendered` (timeouts bound the only step that
//! waits).
//!
//! # Failure policy
//!
//! Structural problems are rejected at save time by [`PageEngine::check_save`].
//! At render time nothing fails the page: unknown block types render their
//! children only, failed enrichments render with no data, and failed renderers
//! leave a blank region. Each is logged with `tracing`.
//!
//! # Example
//!
//! ```
//! use blockpress_engine::{EngineConfig, PageEngine};
//! use blockpress_model::{ContentTree, Node, PageContent, ValueStore};
//! use blockpress_registry::{BlockDefinition, BlockRegistry, RenderContext, RenderNode};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let registry = BlockRegistry::builder()
//!     .with(BlockDefinition::new("divider").with_render_fn(|_| Ok(RenderNode::element("hr"))))
//!     .unwrap()
//!     .build();
//! let engine = PageEngine::new(Arc::new(registry), EngineConfig::default()).unwrap();
//!
//! let tree = ContentTree::from_roots(vec![Node::with_id("d1", "divider")]);
//! let page = PageContent::new(tree, ValueStore::new());
//! let out = engine.render_page(&page, &RenderContext::new("en")).await;
//! assert_eq!(out.to_html(), "<hr>");
//! # }
//! ```

mod config;
mod dispatch;
mod engine;
mod error;
mod prefetch;

pub use config::EngineConfig;
pub use dispatch::{EnrichmentStatus, NodeOutcome, RenderDispatcher, RenderOutput};
pub use engine::PageEngine;
pub use error::{EngineError, EngineResult, PrefetchError};
pub use prefetch::{EnrichmentResults, PrefetchOrchestrator};

pub use tokio_util::sync::CancellationToken;
