//! Error types
//!
//! Nothing in the per-frame path returns these; they surface at the edges
//! (config parsing, backend setup) where the caller decides on a fallback.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    /// Color string is not `#rrggbb`
    #[error("invalid hex color {0:?}")]
    InvalidColor(String),

    /// Config JSON failed to parse
    #[error("invalid grid config: {0}")]
    Config(#[from] serde_json::Error),

    /// Config file could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// A DOM call failed or a required element was missing
    #[error("web platform error: {0}")]
    Web(String),

    /// WebGPU could not be brought up
    #[error("gpu unavailable: {0}")]
    Gpu(String),
}
