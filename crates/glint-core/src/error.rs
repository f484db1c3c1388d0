//! Error types for glint-rs.

use thiserror::Error;

/// The main error type for glint-rs operations.
#[derive(Error, Debug)]
pub enum GlintError {
    /// A mesh was handed inconsistent attribute arrays.
    #[error("geometry size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// A triangle index referenced a vertex past the end of the mesh.
    #[error("index {index} out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds { index: u32, vertex_count: usize },

    /// Rendering error, forwarded from the backend as a message.
    #[error("render error: {0}")]
    Render(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for glint-rs operations.
pub type Result<T> = std::result::Result<T, GlintError>;
