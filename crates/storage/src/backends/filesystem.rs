//! Local filesystem storage backend.

use crate::dirs;
use crate::error::{StorageError, StorageResult};
use crate::traits::BlobStore;
use async_trait::async_trait;
use bytes::Bytes;
use fileshelf_core::{normalize_path, validate_name, validate_path};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use uuid::Uuid;

/// Local filesystem blob store.
///
/// A blob addressed by (path, name) lives at `root/path/name`, with `path`
/// normalized first.
pub struct FilesystemBackend {
    root: PathBuf,
}

impl FilesystemBackend {
    /// Create a new filesystem backend, creating the base directory if missing.
    pub async fn new(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        if !dirs::is_directory(&root).await? {
            tracing::info!(root = %root.display(), "Creating files directory");
        }
        dirs::ensure_directory_exists(&root).await.map_err(|e| {
            StorageError::Io(std::io::Error::new(
                e.kind(),
                format!("could not create files directory {}: {e}", root.display()),
            ))
        })?;
        Ok(Self { root })
    }

    /// Get the on-disk location for (path, name), with path traversal protection.
    ///
    /// This is an async wrapper around `blob_path_sync` that uses `spawn_blocking`
    /// to avoid blocking the Tokio runtime during `canonicalize` and
    /// `symlink_metadata` calls.
    async fn blob_path(&self, path: &str, name: &str) -> StorageResult<PathBuf> {
        let root = self.root.clone();
        let path = path.to_string();
        let name = name.to_string();
        tokio::task::spawn_blocking(move || Self::blob_path_sync(&root, &path, &name))
            .await
            .map_err(|e| {
                StorageError::Io(std::io::Error::other(format!("spawn_blocking failed: {e}")))
            })?
    }

    /// Synchronous location resolution.
    ///
    /// Returns an error if the location would escape the base directory,
    /// including through a symlinked ancestor.
    fn blob_path_sync(root: &Path, path: &str, name: &str) -> StorageResult<PathBuf> {
        let path = normalize_path(path);
        validate_path(&path)?;
        validate_name(name)?;

        let mut location = root.to_path_buf();
        location.extend(path.split('/').filter(|part| !part.is_empty()));
        location.push(name);

        let root_canonical = root.canonicalize().map_err(|e| {
            StorageError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to canonicalize root: {e}"),
            ))
        })?;

        // Check the nearest existing entry on the way up (the blob itself when
        // present). A symlink anywhere on that chain must still resolve inside
        // the root.
        let mut candidate = location.as_path();
        loop {
            match std::fs::symlink_metadata(candidate) {
                Ok(meta) => {
                    let canonical = candidate.canonicalize().map_err(|e| {
                        if meta.file_type().is_symlink() {
                            StorageError::InvalidPath(format!(
                                "symlink target missing or invalid: {}",
                                candidate.display()
                            ))
                        } else {
                            StorageError::Io(std::io::Error::new(
                                e.kind(),
                                format!("failed to canonicalize path: {e}"),
                            ))
                        }
                    })?;

                    if !canonical.starts_with(&root_canonical) {
                        return Err(StorageError::InvalidPath(format!(
                            "resolved path escapes files directory: {path}/{name}"
                        )));
                    }
                    break;
                }
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => {
                    return Err(StorageError::Io(std::io::Error::new(
                        err.kind(),
                        format!("failed to stat path: {err}"),
                    )));
                }
            }

            match candidate.parent() {
                Some(parent) if parent.starts_with(root) => candidate = parent,
                _ => break,
            }
        }

        Ok(location)
    }

    fn not_found_or_io(location: &Path, e: std::io::Error) -> StorageError {
        if e.kind() == std::io::ErrorKind::NotFound {
            StorageError::NotFound(location.display().to_string())
        } else {
            StorageError::Io(e)
        }
    }
}

#[async_trait]
impl BlobStore for FilesystemBackend {
    #[instrument(skip(self, data), fields(backend = "filesystem", size = data.len()))]
    async fn write(&self, path: &str, name: &str, data: Bytes) -> StorageResult<()> {
        let location = self.blob_path(path, name).await?;
        if let Some(parent) = location.parent() {
            dirs::ensure_directory_exists(parent).await?;
        }

        // Write to a uniquely named sibling, fsync, then rename over the target
        // so readers never observe a partially written file.
        // The temp name has a fixed length so any name that fits the filesystem
        // limit also has a temp sibling that fits.
        let temp_path = location.with_file_name(format!(".tmp.{}", Uuid::new_v4()));
        let written = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(&data).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&temp_path, &location).await
        }
        .await;

        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StorageError::Io(e));
        }

        tracing::debug!(location = %location.display(), "Wrote blob");
        Ok(())
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn read(&self, path: &str, name: &str) -> StorageResult<Bytes> {
        let location = self.blob_path(path, name).await?;
        let data = fs::read(&location)
            .await
            .map_err(|e| Self::not_found_or_io(&location, e))?;
        Ok(Bytes::from(data))
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn delete(&self, path: &str, name: &str) -> StorageResult<()> {
        let location = self.blob_path(path, name).await?;
        fs::remove_file(&location)
            .await
            .map_err(|e| Self::not_found_or_io(&location, e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn prune_empty_ancestors(&self, path: &str) -> usize {
        if let Err(e) = validate_path(&normalize_path(path)) {
            tracing::warn!(path = %path, error = %e, "Refusing to prune invalid path");
            return 0;
        }

        match dirs::prune_empty_ancestors(&self.root, path).await {
            Ok(removed) => {
                if removed > 0 {
                    tracing::debug!(path = %path, removed, "Pruned empty directories");
                }
                removed
            }
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Failed pruning empty directories");
                0
            }
        }
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn health_check(&self) -> StorageResult<()> {
        let metadata = fs::metadata(&self.root).await.map_err(|e| {
            StorageError::Io(std::io::Error::new(
                e.kind(),
                format!("files directory not accessible: {e}"),
            ))
        })?;

        if !metadata.is_dir() {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::NotADirectory,
                format!("files directory is not a directory: {:?}", self.root),
            )));
        }

        Ok(())
    }
}
