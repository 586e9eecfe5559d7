use crate::definition::{BlockDefinition, UNKNOWN_BLOCK_TYPE};
use crate::error::{RegistryError, RegistryResult};
use blockpress_model::{BlockCatalog, ChildPolicy, FieldSchema};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Collects block definitions at boot.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    blocks: HashMap<String, BlockDefinition>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition. Each type may be registered once.
    pub fn register(&mut self, definition: BlockDefinition) -> RegistryResult<&mut Self> {
        let block_type = definition.block_type();
        if block_type.is_empty() {
            return Err(RegistryError::EmptyBlockType);
        }
        if block_type == UNKNOWN_BLOCK_TYPE {
            return Err(RegistryError::ReservedBlockType(block_type.to_string()));
        }
        if self.blocks.contains_key(block_type) {
            return Err(RegistryError::DuplicateBlockType(block_type.to_string()));
        }
        self.blocks.insert(block_type.to_string(), definition);
        Ok(self)
    }

    /// Consuming variant of [`register`](Self::register) for chained setup.
    pub fn with(mut self, definition: BlockDefinition) -> RegistryResult<Self> {
        self.register(definition)?;
        Ok(self)
    }

    pub fn build(self) -> BlockRegistry {
        info!(block_types = self.blocks.len(), "block registry built");
        BlockRegistry {
            blocks: self.blocks,
            unknown: BlockDefinition::unknown(),
        }
    }
}

/// A block type's editing contract, without render/enrich functions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSchema {
    pub block_type: String,
    pub fields: FieldSchema,
    pub child_policy: ChildPolicy,
}

/// Immutable table of block definitions.
///
/// Built once, then shared read-only across concurrent renders; there is no
/// way to register after [`RegistryBuilder::build`].
#[derive(Debug)]
pub struct BlockRegistry {
    blocks: HashMap<String, BlockDefinition>,
    unknown: BlockDefinition,
}

impl BlockRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Returns the definition for `block_type`, or the unknown-block sentinel.
    pub fn lookup(&self, block_type: &str) -> &BlockDefinition {
        match self.blocks.get(block_type) {
            Some(def) => def,
            None => {
                debug!(block_type, "unregistered block type, using passthrough");
                &self.unknown
            }
        }
    }

    /// Returns the definition only if the type is registered.
    pub fn get(&self, block_type: &str) -> Option<&BlockDefinition> {
        self.blocks.get(block_type)
    }

    pub fn contains(&self, block_type: &str) -> bool {
        self.blocks.contains_key(block_type)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Registered types, sorted.
    pub fn block_types(&self) -> Vec<&str> {
        let mut types: Vec<_> = self.blocks.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Editing contracts for every registered type, sorted by type. This is
    /// all the admin form generator consumes.
    pub fn schemas(&self) -> Vec<BlockSchema> {
        self.block_types()
            .into_iter()
            .filter_map(|t| self.blocks.get(t))
            .map(|def| BlockSchema {
                block_type: def.block_type().to_string(),
                fields: def.schema().clone(),
                child_policy: def.child_policy(),
            })
            .collect()
    }
}

impl BlockCatalog for BlockRegistry {
    fn child_policy(&self, block_type: &str) -> Option<ChildPolicy> {
        self.blocks.get(block_type).map(BlockDefinition::child_policy)
    }

    fn field_schema(&self, block_type: &str) -> Option<&FieldSchema> {
        self.blocks.get(block_type).map(BlockDefinition::schema)
    }
}
