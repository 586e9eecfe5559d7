use blockpress_registry::EnrichError;
use thiserror::Error;

pub type SourceResult<T> = Result<T, SourceError>;

/// Failures of the collection layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    #[error("backend error: {0}")]
    Backend(String),
}

impl From<SourceError> for EnrichError {
    fn from(err: SourceError) -> Self {
        EnrichError::Source(err.to_string())
    }
}
