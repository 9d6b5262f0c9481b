//! Error types for the Folio queue and rendering pipeline.
//!
//! Errors are organized by layer. Queue and whole-call render errors propagate
//! to the caller; per-image problems never do (see [`SkipReason`]).

use thiserror::Error;

/// Top-level error type for Folio operations.
#[derive(Error, Debug)]
pub enum FolioError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Photo queue admission errors
    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    /// Whole-call render errors
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Admission errors raised when adding a photo to a user's queue.
///
/// Both leave the queue unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// The user's queue already holds the maximum number of photos
    #[error("Photo limit reached ({max} photos)")]
    CapacityExceeded { max: usize },

    /// The payload exceeds the per-file size limit
    #[error("File too large ({size_bytes} bytes > {max_bytes} bytes)")]
    FileTooLarge { size_bytes: u64, max_bytes: u64 },
}

/// Errors that fail a whole render request.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Render was requested with nothing queued
    #[error("No photos queued")]
    EmptyInput,

    /// Every queued image was skipped, so the document has no pages
    #[error("None of the {queued} queued images could be rendered")]
    NoValidImages { queued: usize },

    /// Render exceeded the wall-clock budget
    #[error("Render timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The PDF document could not be assembled or serialized
    #[error("PDF assembly failed: {0}")]
    Pdf(String),

    /// The blocking render task panicked or was cancelled
    #[error("Render task failed: {0}")]
    Task(String),
}

/// Why a single image was left out of the document.
///
/// Collected per image and reported alongside the rendered document; never
/// escalated to a call failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The payload could not be decoded as a raster image
    #[error("decode failed: {0}")]
    Decode(String),

    /// Decoded dimensions exceed the configured limit
    #[error("image too large ({width}x{height} > {max_dim})")]
    TooLarge {
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Re-encoding the resampled image failed
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Enhancement filter failure. The renderer logs it and keeps the
/// unmodified image.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{filter} enhancement failed: {message}")]
pub struct EnhanceError {
    pub filter: String,
    pub message: String,
}

/// Convenience type alias for Folio results.
pub type Result<T> = std::result::Result<T, FolioError>;

/// Convenience type alias for render-specific results.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
