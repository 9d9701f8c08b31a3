//! Error types for the artisan-core library.
//!
//! This module provides granular error variants for the different failure
//! modes of the capture, generation and persistence paths. Generation
//! failures carry their own classification ([`GenerationError`]) because the
//! controller reacts differently to a rejected credential than to any other
//! failure.

use thiserror::Error;

/// Classified failures of an image generation request.
///
/// Every [`GenerationClient`](crate::generation::GenerationClient)
/// implementation must map its failures onto these variants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// No usable access credential is configured.
    #[error("No API key selected. Please select your key first.")]
    MissingCredential,

    /// The service rejected the configured credential.
    #[error("The selected API key was rejected. Please select a valid key.")]
    InvalidCredential,

    /// The call succeeded but returned no image payload.
    #[error("The curator was unable to finalize your piece. Please try a different style.")]
    EmptyResult,

    /// Any other failure, forwarded with its message.
    #[error("{0}")]
    Unknown(String),
}

/// Errors that can occur within the artisan-core library.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (invalid values, missing directories).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The capture device is missing or access was denied.
    #[error("Capture unavailable: {0}")]
    CaptureUnavailable(String),

    /// A frame was requested from a device that was never acquired.
    #[error("Capture device unavailable")]
    DeviceUnavailable,

    /// Image decoding or encoding failed.
    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    /// The generation service failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// The persisted gallery could not be parsed.
    #[error("Persisted gallery is corrupt: {0}")]
    PersistenceCorrupt(String),

    /// Writing the persisted gallery failed.
    #[error("Failed to persist gallery: {0}")]
    PersistenceWrite(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An unclassified error.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a capture error with the given message.
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::CaptureUnavailable(msg.into())
    }

    /// Creates an image processing error with the given message.
    pub fn image(msg: impl Into<String>) -> Self {
        Self::ImageProcessing(msg.into())
    }

    /// Creates a persistence write error with the given message.
    pub fn write(msg: impl Into<String>) -> Self {
        Self::PersistenceWrite(msg.into())
    }
}

/// A convenient alias for Result with [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
