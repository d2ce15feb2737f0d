//! File catalog repository.

use crate::error::MetadataResult;
use crate::models::FileRow;
use async_trait::async_trait;
use fileshelf_core::normalize_path;
use sqlx::SqliteConnection;

/// Repository for file records.
///
/// Methods take `&mut self` so the same calls run against a pooled
/// connection or inside the transaction the dispatcher opened for the
/// current command. Every `path` argument is normalized before it is used as
/// a key, so callers may pass the raw parameter.
///
/// There is no unique constraint on (path, name). Writers must call
/// [`FileRepo::lookup_by_path_name`] first and choose between
/// [`FileRepo::insert_file`] and [`FileRepo::update_file`] on the result.
#[async_trait]
pub trait FileRepo: Send {
    /// Get a file record by id.
    async fn lookup_by_id(&mut self, id: i64) -> MetadataResult<Option<FileRow>>;

    /// Get a file record by logical path and name.
    async fn lookup_by_path_name(
        &mut self,
        path: &str,
        name: &str,
    ) -> MetadataResult<Option<FileRow>>;

    /// Insert a new file record and return its assigned id.
    async fn insert_file(
        &mut self,
        path: &str,
        name: &str,
        content_type: &str,
        size: i64,
    ) -> MetadataResult<i64>;

    /// Overwrite every field of an existing record.
    async fn update_file(
        &mut self,
        id: i64,
        path: &str,
        name: &str,
        content_type: &str,
        size: i64,
    ) -> MetadataResult<()>;

    /// Delete a record by id. Returns the number of rows removed.
    async fn delete_by_id(&mut self, id: i64) -> MetadataResult<u64>;

    /// Delete records by logical path and name. Returns the number of rows removed.
    async fn delete_by_path_name(&mut self, path: &str, name: &str) -> MetadataResult<u64>;
}

#[async_trait]
impl FileRepo for SqliteConnection {
    async fn lookup_by_id(&mut self, id: i64) -> MetadataResult<Option<FileRow>> {
        let row = sqlx::query_as::<_, FileRow>(
            "SELECT id, path, name, type, size FROM files WHERE id = ? LIMIT 1",
        )
        .bind(id)
        .fetch_optional(&mut *self)
        .await?;
        Ok(row)
    }

    async fn lookup_by_path_name(
        &mut self,
        path: &str,
        name: &str,
    ) -> MetadataResult<Option<FileRow>> {
        let row = sqlx::query_as::<_, FileRow>(
            "SELECT id, path, name, type, size FROM files WHERE name = ? AND path = ? LIMIT 1",
        )
        .bind(name)
        .bind(normalize_path(path))
        .fetch_optional(&mut *self)
        .await?;
        Ok(row)
    }

    async fn insert_file(
        &mut self,
        path: &str,
        name: &str,
        content_type: &str,
        size: i64,
    ) -> MetadataResult<i64> {
        let result =
            sqlx::query("INSERT INTO files (path, name, type, size) VALUES (?, ?, ?, ?)")
                .bind(normalize_path(path))
                .bind(name)
                .bind(content_type)
                .bind(size)
                .execute(&mut *self)
                .await?;
        Ok(result.last_insert_rowid())
    }

    async fn update_file(
        &mut self,
        id: i64,
        path: &str,
        name: &str,
        content_type: &str,
        size: i64,
    ) -> MetadataResult<()> {
        sqlx::query("UPDATE files SET path = ?, name = ?, type = ?, size = ? WHERE id = ?")
            .bind(normalize_path(path))
            .bind(name)
            .bind(content_type)
            .bind(size)
            .bind(id)
            .execute(&mut *self)
            .await?;
        Ok(())
    }

    async fn delete_by_id(&mut self, id: i64) -> MetadataResult<u64> {
        let result = sqlx::query("DELETE FROM files WHERE id = ?")
            .bind(id)
            .execute(&mut *self)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_by_path_name(&mut self, path: &str, name: &str) -> MetadataResult<u64> {
        let result = sqlx::query("DELETE FROM files WHERE path = ? AND name = ?")
            .bind(normalize_path(path))
            .bind(name)
            .execute(&mut *self)
            .await?;
        Ok(result.rows_affected())
    }
}
