//! Metadata store error types.

use thiserror::Error;

/// Metadata store operation errors.
///
/// A lookup that matches no row is not an error at this layer; repository
/// methods return `Ok(None)` and callers decide whether that is `NotFound`.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for metadata operations.
pub type MetadataResult<T> = std::result::Result<T, MetadataError>;
