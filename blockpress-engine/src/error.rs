//! Error types for the render pipeline.

use blockpress_model::ModelError;
use blockpress_registry::EnrichError;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that stop an engine operation.
///
/// Render-time anomalies (unknown types, failed enrichments, failed
/// renderers) never surface here; they degrade the affected node only.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Save-time validation rejected the page.
    #[error("page rejected: {0}")]
    Validation(#[from] ModelError),

    /// The render request was cancelled before enrichment settled.
    #[error("render cancelled")]
    Cancelled,

    #[error("invalid engine configuration: {0}")]
    Config(String),
}

/// Why a node's enrichment produced no data. Recorded per node; never
/// aborts sibling or ancestor work.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrefetchError {
    #[error("enrichment of {node_id} ({block_type}) failed: {source}")]
    Failed {
        node_id: String,
        block_type: String,
        #[source]
        source: EnrichError,
    },

    #[error("enrichment of {node_id} ({block_type}) timed out after {timeout_ms}ms")]
    TimedOut {
        node_id: String,
        block_type: String,
        timeout_ms: u64,
    },

    #[error("enrichment of {node_id} ({block_type}) panicked")]
    Panicked { node_id: String, block_type: String },

    /// The task running the call ended without reporting back.
    #[error("enrichment task of {node_id} ({block_type}) did not complete")]
    Aborted { node_id: String, block_type: String },
}

impl PrefetchError {
    pub fn node_id(&self) -> &str {
        match self {
            PrefetchError::Failed { node_id, .. }
            | PrefetchError::TimedOut { node_id, .. }
            | PrefetchError::Panicked { node_id, .. }
            | PrefetchError::Aborted { node_id, .. } => node_id,
        }
    }
}
