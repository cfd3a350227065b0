use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pdf parse error: {0}")]
    PdfParse(String),

    #[error("path has no file name: {0}")]
    MissingFileName(String),

    #[error("invalid chunking config: {0}")]
    InvalidChunkConfig(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("embedding service error: {0}")]
    Embedding(#[from] ChatError),
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {service}: {details}")]
    RateLimited { service: String, details: String },

    #[error("generation failed: {0}")]
    Generation(String),

    #[error("invalid response from {service}: {details}")]
    BackendResponse { service: String, details: String },

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("no knowledge available: {0}")]
    EmptyIndex(String),

    #[error("embedding dimension {actual} does not match index dimension {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("chat request failed: {0}")]
    Request(String),

    #[error("index io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("menu parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("menu has no categories")]
    Empty,

    #[error("category {0:?} has no items")]
    EmptyCategory(String),

    #[error("item without a name in category {0:?}")]
    EmptyName(String),

    #[error("item {item:?} in category {category:?} has non-positive price")]
    NonPositivePrice { category: String, item: String },
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
