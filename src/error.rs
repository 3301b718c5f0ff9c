use std::io;

/// Failure converting serialized document text.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}
