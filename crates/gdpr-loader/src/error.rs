//! Error types for table loading

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for loader operations
pub type Result<T> = std::result::Result<T, LoadError>;

/// Everything that can abort a load run.
///
/// A field that fails to coerce is not an error; it becomes an absent value.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("CSV not found -> {}", .0.display())]
    MissingFile(PathBuf),

    #[error("{table}: missing columns in CSV: {missing:?}")]
    SchemaMismatch {
        table: &'static str,
        missing: Vec<String>,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
