//! Error types for block registration, enrichment and rendering.

use thiserror::Error;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Boot-time registration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("block type already registered: {0}")]
    DuplicateBlockType(String),

    #[error("block type must not be empty")]
    EmptyBlockType,

    #[error("block type is reserved: {0}")]
    ReservedBlockType(String),
}

/// Failure returned by a block's enrich function.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnrichError {
    /// A referenced record does not exist.
    #[error("{collection} record not found: {id}")]
    NotFound { collection: String, id: String },

    /// The backing data layer failed.
    #[error("data source error: {0}")]
    Source(String),

    /// The node's values cannot be enriched as stored.
    #[error("invalid values: {0}")]
    InvalidValues(String),
}

/// Failure returned by a block's renderer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("missing field: {0}")]
    MissingField(String),

    #[error("render failed: {0}")]
    Failed(String),
}
