use blockpress_model::{ChildPolicy, FieldDef, FieldSchema};
use blockpress_registry::{BlockDefinition, RenderError, RenderInput, RenderNode};
use serde_json::json;

pub const SECTION: &str = "section";
pub const COLUMNS: &str = "columns";

/// Most columns a row may hold.
pub const MAX_COLUMNS: usize = 4;

pub fn section() -> BlockDefinition {
    BlockDefinition::new(SECTION)
        .with_schema(FieldSchema::new(vec![
            FieldDef::text("anchor"),
            FieldDef::select("background", &["none", "muted", "accent"]).with_default(json!("none")),
        ]))
        .with_child_policy(ChildPolicy::container())
        .with_render_fn(render_section)
}

fn render_section(input: RenderInput<'_>) -> Result<RenderNode, RenderError> {
    let background = input.get_str("/background").unwrap_or("none").to_string();
    let anchor = input.get_str("/anchor").filter(|a| !a.is_empty()).map(str::to_string);

    let mut node = RenderNode::element("section").attr("class", format!("section section--{background}"));
    if let Some(anchor) = anchor {
        node = node.attr("id", anchor);
    }
    Ok(node.children(input.children))
}

/// A row of up to [`MAX_COLUMNS`] children, each wrapped in its own column.
pub fn columns() -> BlockDefinition {
    BlockDefinition::new(COLUMNS)
        .with_schema(FieldSchema::new(vec![
            FieldDef::select("gap", &["none", "small", "large"]).with_default(json!("small")),
        ]))
        .with_child_policy(ChildPolicy::bounded(MAX_COLUMNS))
        .with_render_fn(render_columns)
}

fn render_columns(input: RenderInput<'_>) -> Result<RenderNode, RenderError> {
    let gap = input.get_str("/gap").unwrap_or("small").to_string();
    let count = input.children.len();

    let columns = input
        .children
        .into_iter()
        .map(|child| RenderNode::element("div").attr("class", "column").child(child));
    Ok(RenderNode::element("div")
        .attr("class", format!("columns columns--{count} columns--gap-{gap}"))
        .children(columns))
}
