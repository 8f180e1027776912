//! Central error types for CursorGallery.
//!
//! The trail engine itself never fails; these errors cover everything around
//! it (config files, pointer traces, image decoding, preloading, log setup).
//! All errors implement `Serialize` so they can cross the wasm boundary as
//! plain strings.

use serde::Serialize;
use thiserror::Error;

/// Main error type for CursorGallery operations.
#[derive(Error, Debug)]
pub enum GalleryError {
    /// Reading or writing a file failed
    #[error("Storage error: {0}")]
    StorageError(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Image decoding failed
    #[error("Image error: {0}")]
    ImageError(String),

    /// Image id not known to the source or cache
    #[error("Image not found: {id}")]
    ImageNotFound { id: String },

    /// Configuration value rejected
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Preload was cancelled before every image was decoded
    #[error("Preload cancelled after {loaded} of {total} images")]
    PreloadCancelled { loaded: usize, total: usize },

    /// The image cache cannot hold every image of a preload run
    #[error("Image cache holds {capacity} images but {needed} are needed")]
    CacheTooSmall { needed: usize, capacity: usize },

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Serialize for GalleryError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<image::ImageError> for GalleryError {
    fn from(err: image::ImageError) -> Self {
        GalleryError::ImageError(err.to_string())
    }
}

/// Extension trait for adding context to Results.
///
/// # Example
/// ```ignore
/// use cursor_gallery_lib::error::{GalleryResult, ResultExt};
///
/// fn read_trace(path: &Path) -> GalleryResult<String> {
///     std::fs::read_to_string(path).context("failed to read trace file")
/// }
/// ```
pub trait ResultExt<T> {
    /// Add context to an error, converting it to GalleryError::Other.
    fn context(self, msg: &str) -> GalleryResult<T>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F: FnOnce() -> String>(self, f: F) -> GalleryResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn context(self, msg: &str) -> GalleryResult<T> {
        self.map_err(|e| GalleryError::Other(format!("{}: {}", msg, e)))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> GalleryResult<T> {
        self.map_err(|e| GalleryError::Other(format!("{}: {}", f(), e)))
    }
}

/// Type alias for Results using GalleryError.
pub type GalleryResult<T> = Result<T, GalleryError>;
