use gallery_api::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Template error: {0:#}")]
    Template(anyhow::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<&str> for GalleryError {
    fn from(err: &str) -> Self {
        GalleryError::Internal(err.to_string())
    }
}

impl From<String> for GalleryError {
    fn from(err: String) -> Self {
        GalleryError::Internal(err)
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;
