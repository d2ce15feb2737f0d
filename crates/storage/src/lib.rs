//! Blob storage for fileshelf.
//!
//! This crate provides:
//! - The `BlobStore` abstraction addressed by (logical path, name)
//! - A local filesystem backend where a file lives at `base/path/name`
//! - Directory primitives for lazy creation and pruning of the mirrored tree

pub mod backends;
pub mod dirs;
pub mod error;
pub mod traits;

pub use backends::filesystem::FilesystemBackend;
pub use error::{StorageError, StorageResult};
pub use traits::BlobStore;

use fileshelf_core::config::StorageConfig;
use std::sync::Arc;

/// Create a blob store from configuration.
///
/// The base directory is created when missing; failure to do so is returned
/// to the caller, which treats it as fatal at startup.
pub async fn from_config(config: &StorageConfig) -> StorageResult<Arc<dyn BlobStore>> {
    config.validate().map_err(StorageError::Config)?;

    if config.is_default_path() {
        tracing::info!("No storage path configured, using the default base directory");
    }

    match config {
        StorageConfig::Filesystem { path } => {
            let backend = FilesystemBackend::new(path).await?;
            Ok(Arc::new(backend))
        }
    }
}
