use crate::source::{CollectionSource, Query};
use async_trait::async_trait;
use blockpress_model::{FieldDef, FieldSchema};
use blockpress_registry::{
    BlockDefinition, EnrichError, Enricher, RenderContext, RenderError, RenderInput, RenderNode,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

pub const POST_LIST: &str = "post-list";

pub const POSTS_COLLECTION: &str = "posts";

const DEFAULT_LIMIT: u64 = 5;
const MAX_LIMIT: u64 = 50;

/// Latest posts, optionally filtered by category.
pub fn post_list(source: Arc<dyn CollectionSource>) -> BlockDefinition {
    BlockDefinition::new(POST_LIST)
        .with_schema(FieldSchema::new(vec![
            FieldDef::text("heading").localized(),
            FieldDef::text("category"),
            FieldDef::number("limit").with_default(json!(DEFAULT_LIMIT)),
        ]))
        .with_enricher(PostQuery { source })
        .with_render_fn(render_post_list)
}

/// Runs the listing query. Unpublished posts are included only in draft
/// preview.
pub struct PostQuery {
    source: Arc<dyn CollectionSource>,
}

impl PostQuery {
    fn query(values: &Value, ctx: &RenderContext) -> Query {
        let mut query = Query::new()
            .sort_by("published_at", true)
            .limit(limit(values));
        if let Some(category) = values.get("category").and_then(Value::as_str).filter(|c| !c.is_empty()) {
            query = query.where_eq("category", json!(category));
        }
        if !ctx.draft {
            query = query.where_eq("status", json!("published"));
        }
        query
    }
}

/// Any finite number is accepted and rounded into `1..=MAX_LIMIT`.
fn limit(values: &Value) -> usize {
    let requested = values
        .get("limit")
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite())
        .map_or(DEFAULT_LIMIT, |n| n.round().clamp(1.0, MAX_LIMIT as f64) as u64);
    requested as usize
}

#[async_trait]
impl Enricher for PostQuery {
    async fn enrich(&self, values: &Value, ctx: &RenderContext) -> Result<Value, EnrichError> {
        let query = Self::query(values, ctx);
        let records = self.source.find(POSTS_COLLECTION, &query).await?;
        debug!(count = records.len(), "post list query returned");

        let posts: Vec<Value> = records
            .into_iter()
            .map(|r| {
                json!({
                    "id": r.id,
                    "title": r.field("title"),
                    "slug": r.field("slug"),
                })
            })
            .collect();
        Ok(json!({ "posts": posts }))
    }
}

fn render_post_list(input: RenderInput<'_>) -> Result<RenderNode, RenderError> {
    let Some(posts) = input.data.and_then(|d| d.get("posts")).and_then(Value::as_array) else {
        return Ok(RenderNode::Empty);
    };

    let items = posts.iter().filter_map(|post| {
        let title = post.get("title").and_then(Value::as_str)?;
        let slug = post.get("slug").and_then(Value::as_str)?;
        Some(
            RenderNode::element("li").child(
                RenderNode::element("a")
                    .attr("href", format!("/posts/{slug}"))
                    .child(RenderNode::text(title)),
            ),
        )
    });

    let mut node = RenderNode::element("section").attr("class", "post-list");
    if let Some(heading) = input.get_str("/heading").filter(|h| !h.is_empty()) {
        node = node.child(RenderNode::element("h2").child(RenderNode::text(heading)));
    }
    Ok(node.child(RenderNode::element("ul").children(items)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_accepts_whole_floats() {
        assert_eq!(limit(&json!({"limit": 3.0})), 3);
        assert_eq!(limit(&json!({"limit": 2.6})), 3);
    }

    #[test]
    fn limit_is_clamped_into_range() {
        assert_eq!(limit(&json!({"limit": -1})), 1);
        assert_eq!(limit(&json!({"limit": 0})), 1);
        assert_eq!(limit(&json!({"limit": 1000})), MAX_LIMIT as usize);
    }

    #[test]
    fn missing_or_non_numeric_limit_uses_default() {
        assert_eq!(limit(&json!({})), DEFAULT_LIMIT as usize);
        assert_eq!(limit(&json!({"limit": "ten"})), DEFAULT_LIMIT as usize);
    }
}
