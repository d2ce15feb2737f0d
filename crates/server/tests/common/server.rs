//! Server test utilities.

use fileshelf_core::config::AppConfig;
use fileshelf_metadata::SqliteStore;
use fileshelf_server::{
    ApiResult, AppState, Command, CommandResponse, Verb, create_router, dispatch,
};
use super::mocks::FlakyBlobStore;
use fileshelf_storage::{BlobStore, FilesystemBackend};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    files_root: PathBuf,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server with a temporary base directory and database.
    pub async fn new() -> Self {
        Self::with_blob_store(|backend| Arc::new(backend) as Arc<dyn BlobStore>).await
    }

    /// Create a test server whose blob store wraps the filesystem backend.
    pub async fn with_blob_store<F>(wrap: F) -> Self
    where
        F: FnOnce(FilesystemBackend) -> Arc<dyn BlobStore>,
    {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let config = AppConfig::for_testing(temp_dir.path());
        let files_root = temp_dir.path().join("files");

        let backend = FilesystemBackend::new(&files_root)
            .await
            .expect("Failed to create storage backend");
        let blobs = wrap(backend);

        let metadata = Arc::new(
            fileshelf_metadata::from_config(&config.metadata)
                .await
                .expect("Failed to create metadata store"),
        );

        let state = AppState::new(metadata, blobs);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            files_root,
            _temp_dir: temp_dir,
        }
    }

    /// Create a test server backed by a [`FlakyBlobStore`] and return a handle to it.
    pub async fn with_flaky_store<F>(configure: F) -> (Self, Arc<FlakyBlobStore>)
    where
        F: FnOnce(FlakyBlobStore) -> FlakyBlobStore,
    {
        let mut handle = None;
        let server = Self::with_blob_store(|backend| {
            let flaky = Arc::new(configure(FlakyBlobStore::new(backend)));
            handle = Some(flaky.clone());
            flaky as Arc<dyn BlobStore>
        })
        .await;
        let flaky = handle.expect("blob store factory was not called");
        (server, flaky)
    }

    /// Base directory the blob store writes under.
    pub fn files_root(&self) -> &std::path::Path {
        &self.files_root
    }

    /// Access the catalog.
    pub fn metadata(&self) -> Arc<SqliteStore> {
        self.state.metadata.clone()
    }

    /// Run a command through the dispatcher.
    pub async fn run(&self, command: Command) -> ApiResult<CommandResponse> {
        dispatch(&self.state, &command).await
    }

    /// Store `content` at (path, name) and return the assigned id.
    pub async fn store(&self, path: &str, name: &str, content_type: &str, content: &[u8]) -> i64 {
        let response = self
            .run(
                Command::new(Verb::StoreFile)
                    .with_param("path", path)
                    .with_param("name", name)
                    .with_param("type", content_type)
                    .with_content(content.to_vec()),
            )
            .await
            .expect("StoreFile failed");

        response
            .field("id")
            .expect("StoreFile returned no id")
            .parse()
            .expect("StoreFile returned a non-numeric id")
    }

    /// Fetch a file by id.
    pub async fn fetch_id(&self, id: i64) -> ApiResult<CommandResponse> {
        self.run(Command::new(Verb::FetchFile).with_param("id", id.to_string()))
            .await
    }

    /// Count catalog rows.
    pub async fn row_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM files")
            .fetch_one(self.state.metadata.pool())
            .await
            .expect("Failed to count rows")
    }
}
