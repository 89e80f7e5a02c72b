use thiserror::Error;

/// Failures raised by a document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid document id \"{0}\"")]
    InvalidId(String),

    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to stamp creation time: {0}")]
    Timestamp(#[from] time::error::Format),

    #[error("failed to read seed file {path}: {source}")]
    Seed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("seed file {0} must contain a JSON array of objects")]
    SeedShape(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
