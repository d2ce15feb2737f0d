//! Test doubles for the catalog and blob store.

use async_trait::async_trait;
use bytes::Bytes;
use fileshelf_metadata::{FileRepo, FileRow, MetadataError, MetadataResult};
use fileshelf_storage::{BlobStore, FilesystemBackend, StorageError, StorageResult};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Catalog whose lookups find nothing and whose writes always fail.
#[allow(dead_code)]
#[derive(Default)]
pub struct FailingRepo {
    pub lookups: usize,
}

fn write_failure() -> MetadataError {
    MetadataError::Database(sqlx::Error::Protocol("simulated write failure".to_string()))
}

#[async_trait]
impl FileRepo for FailingRepo {
    async fn lookup_by_id(&mut self, _id: i64) -> MetadataResult<Option<FileRow>> {
        self.lookups += 1;
        Ok(None)
    }

    async fn lookup_by_path_name(
        &mut self,
        _path: &str,
        _name: &str,
    ) -> MetadataResult<Option<FileRow>> {
        self.lookups += 1;
        Ok(None)
    }

    async fn insert_file(
        &mut self,
        _path: &str,
        _name: &str,
        _content_type: &str,
        _size: i64,
    ) -> MetadataResult<i64> {
        Err(write_failure())
    }

    async fn update_file(
        &mut self,
        _id: i64,
        _path: &str,
        _name: &str,
        _content_type: &str,
        _size: i64,
    ) -> MetadataResult<()> {
        Err(write_failure())
    }

    async fn delete_by_id(&mut self, _id: i64) -> MetadataResult<u64> {
        Err(write_failure())
    }

    async fn delete_by_path_name(&mut self, _path: &str, _name: &str) -> MetadataResult<u64> {
        Err(write_failure())
    }
}

/// Filesystem backend that counts calls and can be told to fail writes or deletes.
#[allow(dead_code)]
pub struct FlakyBlobStore {
    inner: FilesystemBackend,
    pub fail_writes: AtomicBool,
    pub fail_deletes: AtomicBool,
    pub writes: AtomicUsize,
    pub deletes: AtomicUsize,
    pub prunes: AtomicUsize,
}

#[allow(dead_code)]
impl FlakyBlobStore {
    pub fn new(inner: FilesystemBackend) -> Self {
        Self {
            inner,
            fail_writes: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            prunes: AtomicUsize::new(0),
        }
    }

    pub fn failing_writes(self) -> Self {
        self.fail_writes.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_deletes(self) -> Self {
        self.fail_deletes.store(true, Ordering::SeqCst);
        self
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn prune_count(&self) -> usize {
        self.prunes.load(Ordering::SeqCst)
    }
}

fn simulated(op: &str) -> StorageError {
    StorageError::Io(std::io::Error::other(format!("simulated {op} failure")))
}

#[async_trait]
impl BlobStore for FlakyBlobStore {
    async fn write(&self, path: &str, name: &str, data: Bytes) -> StorageResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(simulated("write"));
        }
        self.inner.write(path, name, data).await
    }

    async fn read(&self, path: &str, name: &str) -> StorageResult<Bytes> {
        self.inner.read(path, name).await
    }

    async fn delete(&self, path: &str, name: &str) -> StorageResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(simulated("delete"));
        }
        self.inner.delete(path, name).await
    }

    async fn prune_empty_ancestors(&self, path: &str) -> usize {
        self.prunes.fetch_add(1, Ordering::SeqCst);
        self.inner.prune_empty_ancestors(path).await
    }

    fn backend_name(&self) -> &'static str {
        "flaky"
    }
}
