//! Error types for the content model.

use thiserror::Error;

/// Result type for content model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// A malformed tree. Always rejected before persistence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// Two nodes share the same id.
    #[error("duplicate node id: {id}")]
    DuplicateId { id: String },

    /// A node appears below one of its own ancestors.
    #[error("cycle: node {id} appears inside its own subtree")]
    Cycle { id: String },

    /// A node was stored without an id.
    #[error("node of type '{block_type}' has an empty id")]
    EmptyId { block_type: String },
}

/// A node's children break its block type's nesting policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChildConstraintViolation {
    #[error("block '{block_type}' ({node_id}) does not accept children, found {count}")]
    ChildrenNotAllowed {
        node_id: String,
        block_type: String,
        count: usize,
    },

    #[error("block '{block_type}' ({node_id}) accepts at most {max} children, found {count}")]
    TooManyChildren {
        node_id: String,
        block_type: String,
        max: usize,
        count: usize,
    },
}

/// What is wrong with a single field value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldProblem {
    #[error("required value is missing")]
    Missing,

    #[error("expected {expected}")]
    WrongKind { expected: &'static str },

    #[error("'{0}' is not one of the allowed options")]
    NotAnOption(String),
}

/// A field value that does not match the block's field schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field {path}: {problem}")]
pub struct FieldViolation {
    /// Slash-separated path inside the node's values, e.g. `/items/2/label`.
    pub path: String,
    pub problem: FieldProblem,
}

/// Errors raised by content model operations.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("structural error: {0}")]
    Structural(#[from] StructuralError),

    #[error("child constraint violation: {0}")]
    ChildConstraint(#[from] ChildConstraintViolation),

    #[error("invalid values for node {node_id}: {} problem(s)", violations.len())]
    InvalidValues {
        node_id: String,
        violations: Vec<FieldViolation>,
    },

    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("invalid position {index} (sibling count {len})")]
    InvalidPosition { index: usize, len: usize },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
