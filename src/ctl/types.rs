use thiserror::Error;

#[derive(Error, Debug)]
pub enum CtlError {
    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Settings error: {0}")]
    Settings(#[from] crate::settings::SettingsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON value: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
