//! Storage trait definitions.

use crate::error::StorageResult;
use async_trait::async_trait;
use bytes::Bytes;

/// Blob store addressed by (logical path, name).
///
/// `path` arguments may be passed raw; implementations normalize them the same
/// way the catalog does.
#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    /// Materialize `data` at (path, name), creating missing directories and
    /// replacing any previous content.
    async fn write(&self, path: &str, name: &str, data: Bytes) -> StorageResult<()>;

    /// Load the full content stored at (path, name).
    async fn read(&self, path: &str, name: &str) -> StorageResult<Bytes>;

    /// Remove the blob at (path, name).
    async fn delete(&self, path: &str, name: &str) -> StorageResult<()>;

    /// Remove empty directories from `path` upward, never touching the base.
    ///
    /// Best-effort: failures are logged, never returned. Returns the number of
    /// directories removed.
    async fn prune_empty_ancestors(&self, path: &str) -> usize;

    /// Get the name of this storage backend, for logging.
    fn backend_name(&self) -> &'static str;

    /// Verify the backend is usable.
    ///
    /// The default implementation returns Ok(()).
    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}
