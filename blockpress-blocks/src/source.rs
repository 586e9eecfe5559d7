//! Collection layer boundary.
//!
//! Blocks reach stored records (uploads, posts, authors) only through
//! [`CollectionSource`]. How records are stored or migrated is the host's
//! business; [`InMemoryCollections`] is enough for previews and tests.

use crate::error::{SourceError, SourceResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

/// One stored record with its relation fields already resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub collection: String,
    pub data: Value,
}

impl Record {
    pub fn new(collection: impl Into<String>, id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            collection: collection.into(),
            data,
        }
    }

    /// Top-level field of `data`.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub descending: bool,
}

/// Equality filter, ordering and limit over one collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Field name → required value. All must match.
    #[serde(default)]
    pub where_eq: BTreeMap<String, Value>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub sort: Option<Sort>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn where_eq(mut self, field: impl Into<String>, value: Value) -> Self {
        self.where_eq.insert(field.into(), value);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn sort_by(mut self, field: impl Into<String>, descending: bool) -> Self {
        self.sort = Some(Sort {
            field: field.into(),
            descending,
        });
        self
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.where_eq
            .iter()
            .all(|(field, expected)| record.field(field) == Some(expected))
    }
}

/// Read access to stored collections, used inside enrich functions.
#[async_trait]
pub trait CollectionSource: Send + Sync {
    /// `Ok(None)` when the collection exists but the record does not.
    async fn find_by_id(&self, collection: &str, id: &str) -> SourceResult<Option<Record>>;

    async fn find(&self, collection: &str, query: &Query) -> SourceResult<Vec<Record>>;
}

/// Collections held in memory, keyed by collection then record id.
#[derive(Debug, Default)]
pub struct InMemoryCollections {
    collections: RwLock<HashMap<String, BTreeMap<String, Record>>>,
}

impl InMemoryCollections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an empty collection so lookups in it are not errors.
    #[must_use]
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collections.get_mut().entry(collection.into()).or_default();
        self
    }

    #[must_use]
    pub fn with_record(mut self, record: Record) -> Self {
        self.collections
            .get_mut()
            .entry(record.collection.clone())
            .or_default()
            .insert(record.id.clone(), record);
        self
    }

    /// Inserts or replaces a record.
    pub async fn insert(&self, record: Record) {
        self.collections
            .write()
            .await
            .entry(record.collection.clone())
            .or_default()
            .insert(record.id.clone(), record);
    }

    pub async fn remove(&self, collection: &str, id: &str) -> Option<Record> {
        self.collections.write().await.get_mut(collection)?.remove(id)
    }
}

#[async_trait]
impl CollectionSource for InMemoryCollections {
    async fn find_by_id(&self, collection: &str, id: &str) -> SourceResult<Option<Record>> {
        let collections = self.collections.read().await;
        let records = collections
            .get(collection)
            .ok_or_else(|| SourceError::UnknownCollection(collection.to_string()))?;
        Ok(records.get(id).cloned())
    }

    async fn find(&self, collection: &str, query: &Query) -> SourceResult<Vec<Record>> {
        let collections = self.collections.read().await;
        let records = collections
            .get(collection)
            .ok_or_else(|| SourceError::UnknownCollection(collection.to_string()))?;

        let mut found: Vec<Record> = records.values().filter(|r| query.matches(r)).cloned().collect();
        if let Some(sort) = &query.sort {
            // Stable: ties keep id order.
            found.sort_by(|a, b| {
                let ord = compare_values(a.field(&sort.field), b.field(&sort.field));
                if sort.descending { ord.reverse() } else { ord }
            });
        }
        if let Some(limit) = query.limit {
            found.truncate(limit);
        }
        Ok(found)
    }
}

/// Orders missing < null < bool < number < string; other kinds compare equal.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None => 0,
            Some(Value::Null) => 1,
            Some(Value::Bool(_)) => 2,
            Some(Value::Number(_)) => 3,
            Some(Value::String(_)) => 4,
            Some(_) => 5,
        }
    }
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_sort_numerically() {
        assert_eq!(compare_values(Some(&json!(9)), Some(&json!(10))), Ordering::Less);
        assert_eq!(compare_values(Some(&json!("9")), Some(&json!("10"))), Ordering::Greater);
        assert_eq!(compare_values(None, Some(&json!(0))), Ordering::Less);
    }

    #[test]
    fn query_matches_all_filters() {
        let record = Record::new("posts", "p1", json!({"category": "news", "draft": false}));
        assert!(Query::new().matches(&record));
        assert!(Query::new().where_eq("category", json!("news")).matches(&record));
        assert!(
            !Query::new()
                .where_eq("category", json!("news"))
                .where_eq("draft", json!(true))
                .matches(&record)
        );
    }
}
