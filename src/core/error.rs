//! Error types for the voxwalk core

use thiserror::Error;

/// Main error type for the core
#[derive(Debug, Error)]
pub enum Error {
    #[error("degenerate direction: look vector has near-zero length")]
    DegenerateDirection,

    #[error("config error: {0}")]
    Config(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
