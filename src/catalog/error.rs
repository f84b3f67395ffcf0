//! Catalog error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Catalog triggers must not be empty")]
    EmptyTrigger,
    #[error("Exact trigger {0:?} is declared more than once")]
    DuplicateTrigger(String),
    #[error("Substring trigger {trigger:?} can never match, {shadowed_by:?} is declared before it")]
    UnreachableEntry { trigger: String, shadowed_by: String },
    #[error("Assumed intent {0:?} has no exact entry")]
    UnknownAssumedIntent(String),
    #[error("Unknown catalog preset: {0}")]
    UnknownPreset(String),
}
