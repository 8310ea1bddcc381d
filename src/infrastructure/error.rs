use thiserror::Error;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("backend command failed: {0}")]
    Backend(String),
    #[error("event channel error: {0}")]
    Channel(String),
}
