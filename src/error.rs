use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("CSV input is empty")]
    EmptyInput,

    #[error("CSV needs a header row and at least one data row (found {found} row(s))")]
    InsufficientRows { found: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;
