use blockpress_blocks::{CollectionSource, InMemoryCollections, Query, Record, SourceError};
use pretty_assertions::assert_eq;
use serde_json::json;

fn posts() -> InMemoryCollections {
    InMemoryCollections::new()
        .with_record(Record::new("posts", "p1", json!({"rank": 3, "tag": "a"})))
        .with_record(Record::new("posts", "p2", json!({"rank": 1, "tag": "b"})))
        .with_record(Record::new("posts", "p3", json!({"rank": 2, "tag": "a"})))
        .with_record(Record::new("posts", "p4", json!({"tag": "a"})))
        .with_collection("media")
}

fn ids(records: &[Record]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

// ── find_by_id ───────────────────────────────────────────────────

#[tokio::test]
async fn find_by_id_returns_record() {
    let source = posts();

    let record = source.find_by_id("posts", "p2").await.unwrap().unwrap();

    assert_eq!(record.collection, "posts");
    assert_eq!(record.field("rank"), Some(&json!(1)));
}

#[tokio::test]
async fn find_by_id_missing_record_is_none() {
    let source = posts();

    assert_eq!(source.find_by_id("posts", "nope").await.unwrap(), None);
    assert_eq!(source.find_by_id("media", "nope").await.unwrap(), None);
}

#[tokio::test]
async fn unknown_collection_is_an_error() {
    let source = posts();

    assert_eq!(
        source.find_by_id("authors", "a1").await,
        Err(SourceError::UnknownCollection("authors".into()))
    );
    assert!(source.find("authors", &Query::new()).await.is_err());
}

// ── find ─────────────────────────────────────────────────────────

#[tokio::test]
async fn find_without_query_returns_all_in_id_order() {
    let source = posts();

    let found = source.find("posts", &Query::new()).await.unwrap();

    assert_eq!(ids(&found), vec!["p1", "p2", "p3", "p4"]);
}

#[tokio::test]
async fn find_filters_sorts_and_limits() {
    let source = posts();
    let query = Query::new().where_eq("tag", json!("a")).sort_by("rank", true).limit(2);

    let found = source.find("posts", &query).await.unwrap();

    assert_eq!(ids(&found), vec!["p1", "p3"]);
}

#[tokio::test]
async fn records_missing_sort_field_sort_first_ascending() {
    let source = posts();

    let found = source
        .find("posts", &Query::new().sort_by("rank", false))
        .await
        .unwrap();

    assert_eq!(ids(&found), vec!["p4", "p2", "p3", "p1"]);
}

// ── Mutation ─────────────────────────────────────────────────────

#[tokio::test]
async fn insert_replaces_and_remove_deletes() {
    let source = posts();

    source.insert(Record::new("posts", "p2", json!({"rank": 9}))).await;
    source.insert(Record::new("authors", "a1", json!({"name": "Ada"}))).await;

    let p2 = source.find_by_id("posts", "p2").await.unwrap().unwrap();
    assert_eq!(p2.field("rank"), Some(&json!(9)));
    assert!(source.find_by_id("authors", "a1").await.unwrap().is_some());

    let removed = source.remove("posts", "p2").await;
    assert_eq!(removed.map(|r| r.id), Some("p2".to_string()));
    assert_eq!(source.find_by_id("posts", "p2").await.unwrap(), None);
}

#[test]
fn query_deserializes_with_defaults() {
    let query: Query = serde_json::from_value(json!({"where_eq": {"status": "published"}})).unwrap();

    assert_eq!(query, Query::new().where_eq("status", json!("published")));
}
