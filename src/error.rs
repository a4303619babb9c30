//! Error types for the annotation engine.
//!
//! Every error is raised synchronously by the call that violates its contract.
//! None of them are transient: callers fix the input and call again.

/// Result type alias for annotation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while annotating a document.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::enum_variant_names)] // "Invalid" prefix is intentional for clarity
pub enum Error {
    /// Malformed or insufficient points, bad rotation, or a location shape
    /// that does not fit the annotation kind
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Out-of-range color, transparency, width or font size
    #[error("Invalid style: {0}")]
    InvalidStyle(String),

    /// Annotation kind outside the supported set
    #[error("Unsupported annotation kind: '{0}'")]
    UnsupportedKind(String),

    /// Font metrics or image dimensions unavailable for a referenced resource
    #[error("Resource error: {0}")]
    ResourceError(String),

    /// Out-of-range configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The document model rejected a request
    #[error("Document error: {0}")]
    Document(String),

    /// IO error while encoding a stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
