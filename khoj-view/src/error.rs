//! Error types for KhojView

use khoj_grid::PayloadError;
use thiserror::Error;

/// KhojView error type
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Payload error: {0}")]
    Payload(#[from] PayloadError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for ViewError {
    fn from(e: toml::de::Error) -> Self {
        ViewError::Config(e.to_string())
    }
}

impl From<ctrlc::Error> for ViewError {
    fn from(e: ctrlc::Error) -> Self {
        ViewError::Config(format!("Failed to install Ctrl-C handler: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, ViewError>;
