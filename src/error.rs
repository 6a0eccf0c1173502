//! Error types for the engine.
//!
//! Almost everything here is total: malformed observations are filtered, empty
//! input yields empty frames. Errors only come from a bad cell size or a bad
//! configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Cell size must be positive and finite, got: {0}")]
    InvalidCellSize(f64),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "toml")]
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
