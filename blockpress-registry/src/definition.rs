use crate::context::RenderContext;
use crate::error::{EnrichError, RenderError};
use crate::output::RenderNode;
use async_trait::async_trait;
use blockpress_model::{ChildPolicy, FieldSchema};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Type name of the sentinel returned for unregistered block types.
pub const UNKNOWN_BLOCK_TYPE: &str = "$unknown";

/// Fetches auxiliary display data for a node before render.
///
/// Receives the node's values already resolved for the request locale.
/// Typically turns stored reference ids into records (an upload id into a
/// URL and dimensions). Called at most once per node per render pass.
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn enrich(&self, values: &Value, ctx: &RenderContext) -> Result<Value, EnrichError>;
}

/// Everything a renderer sees for one node.
#[derive(Debug)]
pub struct RenderInput<'a> {
    pub node_id: &'a str,
    pub block_type: &'a str,
    /// Locale-resolved values, with schema defaults applied.
    pub values: &'a Value,
    /// Enrichment result; `None` when the block has no enricher or it failed.
    pub data: Option<&'a Value>,
    /// Already-rendered children, in tree order.
    pub children: Vec<RenderNode>,
    pub ctx: &'a RenderContext,
}

impl RenderInput<'_> {
    /// String value at a JSON pointer into `values` (e.g. `"/title"`).
    pub fn get_str(&self, pointer: &str) -> Option<&str> {
        self.values.pointer(pointer).and_then(Value::as_str)
    }

    pub fn get_i64(&self, pointer: &str) -> Option<i64> {
        self.values.pointer(pointer).and_then(Value::as_i64)
    }

    pub fn get_bool(&self, pointer: &str) -> Option<bool> {
        self.values.pointer(pointer).and_then(Value::as_bool)
    }

    /// String value at a JSON pointer into the enrichment data.
    pub fn data_str(&self, pointer: &str) -> Option<&str> {
        self.data?.pointer(pointer).and_then(Value::as_str)
    }
}

/// Turns a node into output. Container blocks embed `input.children`;
/// leaf blocks ignore them.
pub trait BlockRenderer: Send + Sync {
    fn render(&self, input: RenderInput<'_>) -> Result<RenderNode, RenderError>;
}

struct RenderFn<F>(F);

impl<F> BlockRenderer for RenderFn<F>
where
    F: Fn(RenderInput<'_>) -> Result<RenderNode, RenderError> + Send + Sync,
{
    fn render(&self, input: RenderInput<'_>) -> Result<RenderNode, RenderError> {
        (self.0)(input)
    }
}

struct EnrichFn<F>(F);

#[async_trait]
impl<F, Fut> Enricher for EnrichFn<F>
where
    F: Fn(Value, RenderContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, EnrichError>> + Send + 'static,
{
    async fn enrich(&self, values: &Value, ctx: &RenderContext) -> Result<Value, EnrichError> {
        (self.0)(values.clone(), ctx.clone()).await
    }
}

/// Renders nothing of its own; passes children through.
struct Passthrough;

impl BlockRenderer for Passthrough {
    fn render(&self, input: RenderInput<'_>) -> Result<RenderNode, RenderError> {
        Ok(RenderNode::fragment(input.children))
    }
}

/// Schema, nesting policy, enrichment and renderer for one block type.
#[derive(Clone)]
pub struct BlockDefinition {
    block_type: String,
    schema: FieldSchema,
    child_policy: ChildPolicy,
    enricher: Option<Arc<dyn Enricher>>,
    renderer: Arc<dyn BlockRenderer>,
}

impl BlockDefinition {
    /// A leaf block with an empty schema, no enricher, and a passthrough
    /// renderer. Use the `with_*` methods to fill it in.
    pub fn new(block_type: impl Into<String>) -> Self {
        Self {
            block_type: block_type.into(),
            schema: FieldSchema::empty(),
            child_policy: ChildPolicy::leaf(),
            enricher: None,
            renderer: Arc::new(Passthrough),
        }
    }

    /// The sentinel for types missing from the registry: accepts any
    /// children, fetches nothing, renders only its children.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_BLOCK_TYPE).with_child_policy(ChildPolicy::container())
    }

    #[must_use]
    pub fn with_schema(mut self, schema: FieldSchema) -> Self {
        self.schema = schema;
        self
    }

    #[must_use]
    pub fn with_child_policy(mut self, policy: ChildPolicy) -> Self {
        self.child_policy = policy;
        self
    }

    #[must_use]
    pub fn with_enricher(mut self, enricher: impl Enricher + 'static) -> Self {
        self.enricher = Some(Arc::new(enricher));
        self
    }

    /// Uses an async closure as the enricher. It receives owned copies of
    /// the resolved values and the context.
    #[must_use]
    pub fn with_enrich_fn<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Value, RenderContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, EnrichError>> + Send + 'static,
    {
        self.enricher = Some(Arc::new(EnrichFn(f)));
        self
    }

    #[must_use]
    pub fn with_renderer(mut self, renderer: impl BlockRenderer + 'static) -> Self {
        self.renderer = Arc::new(renderer);
        self
    }

    #[must_use]
    pub fn with_render_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(RenderInput<'_>) -> Result<RenderNode, RenderError> + Send + Sync + 'static,
    {
        self.renderer = Arc::new(RenderFn(f));
        self
    }

    pub fn block_type(&self) -> &str {
        &self.block_type
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    pub fn child_policy(&self) -> ChildPolicy {
        self.child_policy
    }

    pub fn enricher(&self) -> Option<&Arc<dyn Enricher>> {
        self.enricher.as_ref()
    }

    pub fn renderer(&self) -> &Arc<dyn BlockRenderer> {
        &self.renderer
    }

    pub fn is_unknown(&self) -> bool {
        self.block_type == UNKNOWN_BLOCK_TYPE
    }

    pub fn render(&self, input: RenderInput<'_>) -> Result<RenderNode, RenderError> {
        self.renderer.render(input)
    }
}

impl fmt::Debug for BlockDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockDefinition")
            .field("block_type", &self.block_type)
            .field("schema", &self.schema)
            .field("child_policy", &self.child_policy)
            .field("enriches", &self.enricher.is_some())
            .finish_non_exhaustive()
    }
}
