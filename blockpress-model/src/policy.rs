use crate::error::ChildConstraintViolation;
use crate::schema::FieldSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Whether a block type may nest children, and how many.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildPolicy {
    pub allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
}

impl ChildPolicy {
    /// No children.
    pub const fn leaf() -> Self {
        Self {
            allowed: false,
            max: None,
        }
    }

    /// Any number of children.
    pub const fn container() -> Self {
        Self {
            allowed: true,
            max: None,
        }
    }

    /// At most `max` children.
    pub const fn bounded(max: usize) -> Self {
        Self {
            allowed: true,
            max: Some(max),
        }
    }

    /// Checks a child count against this policy.
    pub fn check(&self, node_id: &str, block_type: &str, count: usize) -> Result<(), ChildConstraintViolation> {
        if !self.allowed && count > 0 {
            return Err(ChildConstraintViolation::ChildrenNotAllowed {
                node_id: node_id.into(),
                block_type: block_type.into(),
                count,
            });
        }
        match self.max {
            Some(max) if count > max => Err(ChildConstraintViolation::TooManyChildren {
                node_id: node_id.into(),
                block_type: block_type.into(),
                max,
                count,
            }),
            _ => Ok(()),
        }
    }
}

/// Read-only view of the block types known to the system.
///
/// Implemented by the block registry; validation only needs policies and
/// schemas, never the render or enrich functions.
pub trait BlockCatalog: Send + Sync {
    /// Child policy for a registered type, `None` when the type is unknown.
    fn child_policy(&self, block_type: &str) -> Option<ChildPolicy>;

    /// Field schema for a registered type.
    fn field_schema(&self, block_type: &str) -> Option<&FieldSchema> {
        let _ = block_type;
        None
    }
}

impl BlockCatalog for HashMap<String, ChildPolicy> {
    fn child_policy(&self, block_type: &str) -> Option<ChildPolicy> {
        self.get(block_type).copied()
    }
}
