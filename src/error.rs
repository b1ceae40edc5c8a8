//! Error types for html-pluck.
//!
//! This module defines the error types returned by parse and render
//! operations. Traversal and matching never fail: an absent parent or
//! sibling is "no match", not an error.

/// Error type for parse and render operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or decoding HTML input failed.
    #[error("HTML parsing failed: {0}")]
    Parse(String),

    /// Writing serialized HTML to the output sink failed.
    #[error("HTML rendering failed: {0}")]
    Render(#[from] std::io::Error),
}

/// Result type alias for parse and render operations.
pub type Result<T> = std::result::Result<T, Error>;
