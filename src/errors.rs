//! Error types for quakemap.
//!
//! Uses `thiserror` for library-style error definitions.

use thiserror::Error;

/// Errors that can occur while loading a feed or building a map.
#[derive(Error, Debug)]
pub enum QuakemapError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Reading a local feed file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Feed endpoint returned an error status
    #[error("USGS API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid response structure
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A feature cannot be turned into a marker
    #[error("Invalid event data: {0}")]
    Validation(String),

    /// Depth scale thresholds and colors are inconsistent
    #[error("Invalid depth scale: {0}")]
    Scale(String),
}
