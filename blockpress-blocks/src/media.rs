use crate::source::CollectionSource;
use async_trait::async_trait;
use blockpress_model::{FieldDef, FieldSchema};
use blockpress_registry::{
    BlockDefinition, EnrichError, Enricher, RenderContext, RenderError, RenderInput, RenderNode,
};
use serde_json::{Value, json};
use std::sync::Arc;

pub const IMAGE: &str = "image";

/// Collection uploads are stored in.
pub const MEDIA_COLLECTION: &str = "media";

/// An uploaded image. Stored values hold only the upload id; the URL and
/// dimensions come from the media collection at render time.
pub fn image(source: Arc<dyn CollectionSource>) -> BlockDefinition {
    BlockDefinition::new(IMAGE)
        .with_schema(FieldSchema::new(vec![
            FieldDef::upload("image", MEDIA_COLLECTION).required(),
            FieldDef::text("alt").localized(),
            FieldDef::text("caption").localized(),
        ]))
        .with_enricher(UploadEnricher {
            source,
            collection: MEDIA_COLLECTION.to_string(),
        })
        .with_render_fn(render_image)
}

/// Resolves the `image` upload id into `{url, width, height, alt}`.
pub struct UploadEnricher {
    source: Arc<dyn CollectionSource>,
    collection: String,
}

#[async_trait]
impl Enricher for UploadEnricher {
    async fn enrich(&self, values: &Value, _ctx: &RenderContext) -> Result<Value, EnrichError> {
        let id = values
            .get("image")
            .and_then(record_id)
            .ok_or_else(|| EnrichError::InvalidValues("no upload referenced".into()))?;
        let id = id.as_str();

        let record = self
            .source
            .find_by_id(&self.collection, id)
            .await?
            .ok_or_else(|| EnrichError::NotFound {
                collection: self.collection.clone(),
                id: id.to_string(),
            })?;

        Ok(json!({
            "url": record.field("url"),
            "width": record.field("width"),
            "height": record.field("height"),
            "alt": record.field("alt"),
        }))
    }
}

/// Upload ids are stored as strings or numbers.
fn record_id(value: &Value) -> Option<String> {
    match value {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn render_image(input: RenderInput<'_>) -> Result<RenderNode, RenderError> {
    // Without the upload record there is nothing to show.
    let Some(url) = input.data_str("/url") else {
        return Ok(RenderNode::Empty);
    };
    let alt = input
        .get_str("/alt")
        .filter(|a| !a.is_empty())
        .or_else(|| input.data_str("/alt"))
        .unwrap_or_default();

    let mut img = RenderNode::element("img").attr("src", url).attr("alt", alt);
    for dim in ["width", "height"] {
        if let Some(v) = input.data.and_then(|d| d.get(dim)).and_then(Value::as_u64) {
            img = img.attr(dim, v.to_string());
        }
    }

    let mut figure = RenderNode::element("figure").child(img);
    if let Some(caption) = input.get_str("/caption").filter(|c| !c.is_empty()) {
        figure = figure.child(RenderNode::element("figcaption").child(RenderNode::text(caption)));
    }
    Ok(figure)
}
