use thiserror::Error;

#[derive(Debug, Error)]
pub enum VouchError {
    #[error("invalid rating {0}: must be between 1 and 5")]
    InvalidRating(i64),

    #[error("missing configuration: {}", .0.join(", "))]
    MissingConfig(Vec<String>),

    #[error("invalid configuration value for {key}: {reason}")]
    InvalidConfig { key: String, reason: String },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VouchError>;
