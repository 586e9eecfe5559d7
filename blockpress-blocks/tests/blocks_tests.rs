use blockpress_blocks::{
    CollectionSource, InMemoryCollections, MAX_COLUMNS, Record, register_standard, standard_registry,
};
use blockpress_engine::{EngineConfig, EngineError, EnrichmentStatus, PageEngine};
use blockpress_locale::LocaleSettings;
use blockpress_model::{ChildPolicy, ContentTree, ModelError, Node, PageContent, ValueStore};
use blockpress_registry::{BlockRegistry, RegistryError, RenderContext};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn collections() -> Arc<dyn CollectionSource> {
    Arc::new(
        InMemoryCollections::new()
            .with_record(Record::new(
                "media",
                "m1",
                json!({"url": "/media/harbour.jpg", "width": 800, "height": 600, "alt": "Harbour"}),
            ))
            .with_record(Record::new("media", "7", json!({"url": "/media/seven.png", "alt": "Seven"})))
            .with_record(Record::new("media", "m2", json!({"url": "/media/hills.jpg", "alt": "Hills"})))
            .with_record(post("p1", "Third", "third", "news", "published", "2026-01-03"))
            .with_record(post("p2", "First", "first", "news", "published", "2026-01-01"))
            .with_record(post("p3", "Draft", "draft", "news", "draft", "2026-01-05"))
            .with_record(post("p4", "Gig", "gig", "events", "published", "2026-01-04")),
    )
}

fn post(id: &str, title: &str, slug: &str, category: &str, status: &str, published_at: &str) -> Record {
    Record::new(
        "posts",
        id,
        json!({
            "title": title,
            "slug": slug,
            "category": category,
            "status": status,
            "published_at": published_at,
        }),
    )
}

fn engine() -> PageEngine {
    let registry = standard_registry(collections()).unwrap();
    let config = EngineConfig {
        locales: LocaleSettings::new("en").with_fallback("de-AT", "de"),
        ..EngineConfig::default()
    };
    PageEngine::new(Arc::new(registry), config).unwrap()
}

fn page(roots: Vec<Node>, values: serde_json::Value) -> PageContent {
    let values: ValueStore = serde_json::from_value(values).unwrap();
    PageContent::new(ContentTree::from_roots(roots), values)
}

// ── Registration ─────────────────────────────────────────────────

#[test]
fn standard_registry_exports_all_schemas() {
    let registry = standard_registry(collections()).unwrap();

    assert_eq!(
        registry.block_types(),
        vec!["columns", "heading", "image", "post-list", "rich-text", "section"]
    );
    let columns = registry
        .schemas()
        .into_iter()
        .find(|s| s.block_type == "columns")
        .unwrap();
    assert_eq!(columns.child_policy, ChildPolicy::bounded(MAX_COLUMNS));
}

#[test]
fn registering_twice_is_rejected() {
    let mut builder = BlockRegistry::builder();
    register_standard(&mut builder, collections()).unwrap();

    assert_eq!(
        register_standard(&mut builder, collections()),
        Err(RegistryError::DuplicateBlockType("section".into()))
    );
}

// ── Save-time validation ─────────────────────────────────────────

#[test]
fn heading_without_text_cannot_be_saved() {
    let page = page(vec![Node::with_id("h", "heading")], json!({"h": {"level": "h1"}}));

    let err = engine().check_save(&page).unwrap_err();

    assert!(matches!(
        err,
        EngineError::Validation(ModelError::InvalidValues { ref node_id, .. }) if node_id == "h"
    ));
}

#[test]
fn fifth_column_cannot_be_saved() {
    let row = (0..=MAX_COLUMNS).fold(Node::with_id("row", "columns"), |n, i| {
        n.child(Node::with_id(format!("h{i}"), "heading"))
    });
    let values = (0..=MAX_COLUMNS)
        .map(|i| (format!("h{i}"), json!({"text": "x"})))
        .collect::<serde_json::Map<_, _>>();
    let page = page(vec![row], serde_json::Value::Object(values));

    assert!(matches!(
        engine().check_save(&page),
        Err(EngineError::Validation(ModelError::ChildConstraint(_)))
    ));
}

#[test]
fn heading_cannot_nest_children() {
    let page = page(
        vec![Node::with_id("h", "heading").child(Node::with_id("h2", "heading"))],
        json!({"h": {"text": "a"}, "h2": {"text": "b"}}),
    );

    assert!(matches!(
        engine().check_save(&page),
        Err(EngineError::Validation(ModelError::ChildConstraint(_)))
    ));
}

// ── Rendering ────────────────────────────────────────────────────

#[tokio::test]
async fn renders_layout_text_and_images() {
    let page = page(
        vec![
            Node::with_id("s", "section")
                .child(Node::with_id("h", "heading"))
                .child(
                    Node::with_id("row", "columns")
                        .child(Node::with_id("img1", "image"))
                        .child(Node::with_id("img2", "image")),
                ),
        ],
        json!({
            "h": {"text": {"$locales": {"en": "Welcome", "de": "Willkommen"}}, "level": "h1", "anchor": "top"},
            "img1": {"image": "m1", "caption": {"$locales": {"en": "At dawn"}}},
            "img2": {"image": "m2", "alt": {"$locales": {"de": "Hügel"}}},
        }),
    );

    let out = engine().render_page(&page, &RenderContext::new("de-AT")).await;

    assert_eq!(
        out.to_html(),
        concat!(
            r#"<section class="section section--none">"#,
            r#"<h1 id="top">Willkommen</h1>"#,
            r#"<div class="columns columns--2 columns--gap-small">"#,
            r#"<div class="column"><figure><img alt="Harbour" height="600" src="/media/harbour.jpg" width="800"><figcaption>At dawn</figcaption></figure></div>"#,
            r#"<div class="column"><figure><img alt="Hügel" src="/media/hills.jpg"></figure></div>"#,
            "</div>",
            "</section>"
        )
    );
    assert_eq!(out.outcome("img1").unwrap().enrichment, EnrichmentStatus::Enriched);
}

#[tokio::test]
async fn missing_upload_leaves_blank_and_keeps_siblings() {
    let page = page(
        vec![Node::with_id("img", "image"), Node::with_id("h", "heading")],
        json!({"img": {"image": "deleted"}, "h": {"text": "Still here"}}),
    );

    let out = engine().render_page(&page, &RenderContext::new("en")).await;

    assert_eq!(out.to_html(), "<h2>Still here</h2>");
    assert_eq!(out.outcome("img").unwrap().enrichment, EnrichmentStatus::Failed);
}

#[tokio::test]
async fn numeric_upload_id_is_saved_and_rendered() {
    let engine = engine();
    let page = page(vec![Node::with_id("img", "image")], json!({"img": {"image": 7}}));

    engine.check_save(&page).unwrap();
    let out = engine.render_page(&page, &RenderContext::new("en")).await;

    assert_eq!(
        out.to_html(),
        r#"<figure><img alt="Seven" src="/media/seven.png"></figure>"#
    );
    assert_eq!(out.outcome("img").unwrap().enrichment, EnrichmentStatus::Enriched);
}

#[tokio::test]
async fn heading_stored_without_text_renders_blank() {
    let page = page(
        vec![Node::with_id("h", "heading"), Node::with_id("ok", "heading")],
        json!({"ok": {"text": "Fine", "level": "h3"}}),
    );

    let out = engine().render_page(&page, &RenderContext::new("en")).await;

    assert_eq!(out.to_html(), "<h3>Fine</h3>");
    assert!(out.outcome("h").unwrap().render_failed);
}

#[tokio::test]
async fn rich_text_skips_paragraphs_without_translation() {
    let page = page(
        vec![Node::with_id("t", "rich-text")],
        json!({"t": {"paragraphs": [
            {"text": {"$locales": {"en": "One", "fr": "Un"}}},
            {"text": {"$locales": {"it": "Due"}}},
            {"text": {"$locales": {"en": "Three"}}},
        ]}}),
    );

    let out = engine().render_page(&page, &RenderContext::new("fr")).await;

    assert_eq!(
        out.to_html(),
        r#"<div class="rich-text rich-text--left"><p>Un</p><p>Three</p></div>"#
    );
}

#[tokio::test]
async fn post_list_shows_latest_published_in_category() {
    let page = page(
        vec![Node::with_id("l", "post-list")],
        json!({"l": {"heading": "News", "category": "news", "limit": 2}}),
    );

    let out = engine().render_page(&page, &RenderContext::new("en")).await;

    assert_eq!(
        out.to_html(),
        concat!(
            r#"<section class="post-list"><h2>News</h2><ul>"#,
            r#"<li><a href="/posts/third">Third</a></li>"#,
            r#"<li><a href="/posts/first">First</a></li>"#,
            "</ul></section>"
        )
    );
}

#[tokio::test]
async fn post_list_preview_includes_drafts() {
    let page = page(vec![Node::with_id("l", "post-list")], json!({"l": {"limit": 2}}));

    let out = engine().render_page(&page, &RenderContext::new("en").preview()).await;

    assert_eq!(
        out.to_html(),
        concat!(
            r#"<section class="post-list"><ul>"#,
            r#"<li><a href="/posts/draft">Draft</a></li>"#,
            r#"<li><a href="/posts/gig">Gig</a></li>"#,
            "</ul></section>"
        )
    );
}

#[tokio::test]
async fn post_list_uses_default_limit() {
    let page = page(vec![Node::with_id("l", "post-list")], json!({}));

    let out = engine().render_page(&page, &RenderContext::new("en")).await;

    assert_eq!(out.to_html().matches("<li>").count(), 3);
}

#[tokio::test]
async fn post_list_limit_stored_as_float_is_honoured() {
    let page = page(vec![Node::with_id("l", "post-list")], json!({"l": {"limit": 2.0}}));

    let out = engine().render_page(&page, &RenderContext::new("en")).await;

    assert_eq!(out.to_html().matches("<li>").count(), 2);
}

#[tokio::test]
async fn post_list_negative_limit_shows_one_post() {
    let page = page(vec![Node::with_id("l", "post-list")], json!({"l": {"limit": -1}}));

    let out = engine().render_page(&page, &RenderContext::new("en")).await;

    assert_eq!(
        out.to_html(),
        r#"<section class="post-list"><ul><li><a href="/posts/gig">Gig</a></li></ul></section>"#
    );
}
