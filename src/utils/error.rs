//! Error Handling Module
//!
//! Defines the error taxonomy for the leaf classification pipeline.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Main error type for LeafScan operations
#[derive(Error, Debug)]
pub enum LeafScanError {
    /// The uploaded bytes could not be decoded as an image
    #[error("Invalid image format: {0}")]
    InvalidImageFormat(String),

    /// Any fault while preprocessing or running the classifier
    #[error("Inference error: {0}")]
    Inference(String),

    /// The classifier or its class metadata could not be loaded
    #[error("Startup error: {0}")]
    Startup(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl LeafScanError {
    /// Whether the error reflects bad client input rather than a system fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, LeafScanError::InvalidImageFormat(_))
    }
}

impl From<serde_json::Error> for LeafScanError {
    fn from(err: serde_json::Error) -> Self {
        LeafScanError::Serialization(err.to_string())
    }
}

impl From<image::ImageError> for LeafScanError {
    fn from(err: image::ImageError) -> Self {
        LeafScanError::InvalidImageFormat(err.to_string())
    }
}

/// Convenience Result type for LeafScan operations
pub type Result<T> = std::result::Result<T, LeafScanError>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error, reporting it as an inference failure
    fn context(self, msg: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| LeafScanError::Inference(format!("{}: {}", msg, e)))
    }
}

impl<T> ResultExt<T> for Option<T> {
    fn context(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| LeafScanError::Inference(msg.to_string()))
    }
}
