//! Error types for the catalog pipeline

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Catalog error type
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Persist error: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Source file missing: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("Failed to move {} to {}: {message}", .from.display(), .to.display())]
    Relocate {
        from: PathBuf,
        to: PathBuf,
        message: String,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CatalogError>;
