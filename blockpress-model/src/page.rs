use crate::error::ModelResult;
use crate::tree::ContentTree;
use crate::values::ValueStore;
use serde::{Deserialize, Serialize};

/// The persisted shape of a page: tree plus value store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    pub tree: ContentTree,
    #[serde(default)]
    pub values: ValueStore,
}

impl PageContent {
    pub fn new(tree: ContentTree, values: ValueStore) -> Self {
        Self { tree, values }
    }

    pub fn to_json(&self) -> ModelResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> ModelResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
