//! Error types for bucketing and condition-image preparation.
//!
//! Errors are organized by collaborator (storage, codec, resize policy) so a
//! caller can tell a missing file apart from a corrupt one without parsing
//! messages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Multiaspect operations.
#[derive(Error, Debug)]
pub enum MultiaspectError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Byte retrieval errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Image decode/encode errors
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Condition-image resize policy errors
    #[error("Condition error: {0}")]
    Condition(#[from] ConditionError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
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

/// Failures of the byte-retrieval collaborator.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Nothing stored under the requested path
    #[error("Not found: {0}")]
    NotFound(String),

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    TooLarge {
        path: String,
        size_mb: u64,
        max_mb: u64,
    },

    /// Underlying read failed
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Image codec errors.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Content sniffing found no known format
    #[error("Cannot detect image format: {0}")]
    UnknownFormat(String),

    /// Bytes are not a valid image of the detected format
    #[error("Decode failed: {0}")]
    Decode(String),

    /// Image dimensions exceed limit
    #[error("Image too large: {width}x{height} > {max_dim}")]
    ImageTooLarge { width: u32, height: u32, max_dim: u32 },

    /// Encoding to the requested format failed
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Errors from the condition-image resize policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConditionError {
    /// Target resolution of zero pixels
    #[error("Resolution must be > 0")]
    InvalidResolution,

    /// Width/height ratio is zero or undefined after rounding
    #[error("Degenerate aspect ratio for {width}x{height}")]
    DegenerateAspectRatio { width: u32, height: u32 },

    /// Computed target has a zero or unrepresentable side
    #[error("Degenerate target size {width}x{height} at resolution {resolution}")]
    DegenerateTarget {
        width: u64,
        height: u64,
        resolution: u32,
    },
}

/// Why an image was left out of the bucket index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// The storage collaborator could not supply bytes
    Retrieval,
    /// The bytes could not be decoded or measured as an image
    Decode,
}

impl FailureKind {
    /// Stable short code for logs and output records.
    pub fn code(&self) -> &'static str {
        match self {
            FailureKind::Retrieval => "retrieval",
            FailureKind::Decode => "decode",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An image that could not be bucketed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to bucket {path} ({kind}): {message}")]
pub struct BucketFailure {
    /// Storage path of the image
    pub path: String,
    /// Failure category
    pub kind: FailureKind,
    /// Underlying error detail
    pub message: String,
}

impl BucketFailure {
    pub(crate) fn retrieval(path: &str, err: &StorageError) -> Self {
        Self {
            path: path.to_string(),
            kind: FailureKind::Retrieval,
            message: err.to_string(),
        }
    }

    pub(crate) fn decode(path: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            kind: FailureKind::Decode,
            message: message.into(),
        }
    }

    /// Report the skipped image at error level.
    pub fn log(&self) {
        tracing::error!(
            path = %self.path,
            kind = self.kind.code(),
            "Error processing image {}: {}",
            self.path,
            self.message
        );
    }
}

/// Convenience type alias for Multiaspect results.
pub type Result<T> = std::result::Result<T, MultiaspectError>;
