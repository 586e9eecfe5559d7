use blockpress_model::{FieldDef, FieldSchema};
use blockpress_registry::{BlockDefinition, RenderError, RenderInput, RenderNode};
use serde_json::{Value, json};

pub const HEADING: &str = "heading";
pub const RICH_TEXT: &str = "rich-text";

const LEVELS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// A single localized heading line.
pub fn heading() -> BlockDefinition {
    BlockDefinition::new(HEADING)
        .with_schema(FieldSchema::new(vec![
            FieldDef::text("text").localized().required(),
            FieldDef::select("level", &LEVELS).with_default(json!("h2")),
            FieldDef::text("anchor"),
        ]))
        .with_render_fn(render_heading)
}

fn render_heading(input: RenderInput<'_>) -> Result<RenderNode, RenderError> {
    let text = input
        .get_str("/text")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| RenderError::MissingField("text".into()))?;
    let level = input
        .get_str("/level")
        .filter(|l| LEVELS.contains(l))
        .unwrap_or("h2");

    let mut node = RenderNode::element(level);
    if let Some(anchor) = input.get_str("/anchor").filter(|a| !a.is_empty()) {
        node = node.attr("id", anchor);
    }
    Ok(node.child(RenderNode::text(text)))
}

/// Paragraphs of localized text.
pub fn rich_text() -> BlockDefinition {
    BlockDefinition::new(RICH_TEXT)
        .with_schema(FieldSchema::new(vec![
            FieldDef::array("paragraphs", vec![FieldDef::rich_text("text").localized()]),
            FieldDef::select("align", &["left", "center", "right"]).with_default(json!("left")),
        ]))
        .with_render_fn(render_rich_text)
}

fn render_rich_text(input: RenderInput<'_>) -> Result<RenderNode, RenderError> {
    let align = input.get_str("/align").unwrap_or("left");
    let paragraphs = input
        .values
        .get("paragraphs")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    // Untranslated paragraphs resolve to null and are skipped.
    let rendered = paragraphs
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .filter(|t| !t.is_empty())
        .map(|t| RenderNode::element("p").child(RenderNode::text(t)));

    Ok(RenderNode::element("div")
        .attr("class", format!("rich-text rich-text--{align}"))
        .children(rendered))
}
