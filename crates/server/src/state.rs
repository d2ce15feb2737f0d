//! Application state shared across handlers.

use fileshelf_metadata::SqliteStore;
use fileshelf_storage::BlobStore;
use std::sync::Arc;

/// Shared state: the catalog and the blob store.
#[derive(Clone)]
pub struct AppState {
    pub metadata: Arc<SqliteStore>,
    pub blobs: Arc<dyn BlobStore>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(metadata: Arc<SqliteStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { metadata, blobs }
    }
}
