use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("not a digit string: {0:?}")]
    NotDigits(String),

    #[error("allow-list entry is not a 12-digit identity number: {0:?}")]
    BadAllowListEntry(String),

    #[error("config file not found: {0}")]
    ConfigNotFound(std::path::PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}
