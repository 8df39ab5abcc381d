use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Storage error: {0}")]
    Storage(#[from] crate::storage::error::StorageError),

    #[error("Non-finite number in value for key {0}")]
    NonFinite(String),

    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),
}
