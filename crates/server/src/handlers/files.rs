//! FetchFile, StoreFile and DeleteFile.
//!
//! Each handler works against whatever catalog handle the caller passes in:
//! the dispatcher hands over a pooled connection for reads and an open
//! transaction for writes. The catalog is always mutated before the blob
//! store. A catalog failure returns before the filesystem is touched.

use super::common::{location, parse_id, require_param};
use crate::command::{Command, CommandResponse};
use crate::error::{ApiError, ApiResult};
use fileshelf_core::{MAX_CONTENT_SIZE, normalize_path, validate_name, validate_path};
use fileshelf_metadata::{FileRepo, FileRow};
use fileshelf_storage::BlobStore;

/// Fetch a file's record and content by `id`, falling back to (`path`, `name`).
pub async fn fetch_file(
    repo: &mut dyn FileRepo,
    blobs: &dyn BlobStore,
    command: &Command,
) -> ApiResult<CommandResponse> {
    let mut record = None;

    if let Some(id) = parse_id(command)? {
        record = repo.lookup_by_id(id).await?;
    }

    if record.is_none()
        && let Some((path, name)) = location(command)
    {
        record = repo.lookup_by_path_name(path, name).await?;
    }

    let record = record.ok_or_else(|| ApiError::NotFound("file not found".to_string()))?;
    let content = blobs.read(&record.path, &record.name).await?;

    tracing::debug!(
        id = record.id,
        path = %record.path,
        name = %record.name,
        size = content.len(),
        "Fetched file"
    );

    Ok(record_fields(&record).with_content(content))
}

/// Create or overwrite the file at (`path`, `name`) and return its id.
pub async fn store_file(
    repo: &mut dyn FileRepo,
    blobs: &dyn BlobStore,
    command: &Command,
) -> ApiResult<CommandResponse> {
    let raw_path = require_param(command, "path")?;
    let name = require_param(command, "name")?;
    let content_type = require_param(command, "type")?;

    let normalized = normalize_path(raw_path);
    let path = normalized.as_str();
    validate_path(path)?;
    validate_name(name)?;

    if command.content.is_empty() {
        return Err(ApiError::Validation("missing content body".to_string()));
    }
    if command.content.len() > MAX_CONTENT_SIZE {
        return Err(ApiError::Validation(
            "content too large, 64MB max".to_string(),
        ));
    }

    let size = command.content.len() as i64;

    let id = match repo.lookup_by_path_name(path, name).await? {
        Some(existing) => {
            repo.update_file(existing.id, path, name, content_type, size)
                .await?;
            tracing::info!(
                id = existing.id,
                path = %path,
                name = %name,
                size,
                previous_size = existing.size,
                "Updated file record"
            );
            existing.id
        }
        None => {
            let id = repo.insert_file(path, name, content_type, size).await?;
            tracing::info!(id, path = %path, name = %name, size, "Inserted file record");
            id
        }
    };

    if let Err(e) = blobs.write(path, name, command.content.clone()).await {
        tracing::error!(
            id,
            path = %path,
            name = %name,
            error = %e,
            "Failed to write file content"
        );
        return Err(e.into());
    }

    Ok(CommandResponse::new().with_field("id", id))
}

/// Delete a file by `id`, or by (`path`, `name`) when no id is given.
pub async fn delete_file(
    repo: &mut dyn FileRepo,
    blobs: &dyn BlobStore,
    command: &Command,
) -> ApiResult<CommandResponse> {
    if let Some(id) = parse_id(command)? {
        let record = repo
            .lookup_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("file {id} not found")))?;

        let deleted = repo.delete_by_id(id).await?;
        tracing::info!(id, path = %record.path, name = %record.name, "Deleted file record");

        let response = CommandResponse::new()
            .with_field("id", id)
            .with_field("deleted", deleted);
        let warning = remove_blob(blobs, &record.path, &record.name).await;
        return Ok(with_warning(response, warning));
    }

    let (raw_path, name) = location(command).ok_or_else(|| {
        ApiError::Validation("missing file id or name and path".to_string())
    })?;
    let normalized = normalize_path(raw_path);
    let path = normalized.as_str();
    validate_path(path)?;
    validate_name(name)?;

    // No existence check: the file is removed whether or not a row matched.
    let deleted = repo.delete_by_path_name(path, name).await?;
    tracing::info!(path = %path, name = %name, deleted, "Deleted file records");

    let response = CommandResponse::new().with_field("deleted", deleted);
    let warning = remove_blob(blobs, path, name).await;
    Ok(with_warning(response, warning))
}

fn record_fields(record: &FileRow) -> CommandResponse {
    CommandResponse::new()
        .with_field("id", record.id)
        .with_field("path", &record.path)
        .with_field("name", &record.name)
        .with_field("type", &record.content_type)
        .with_field("size", record.size)
}

/// Remove the blob and prune its directories. Returns a warning instead of failing.
async fn remove_blob(blobs: &dyn BlobStore, path: &str, name: &str) -> Option<String> {
    let warning = match blobs.delete(path, name).await {
        Ok(()) => None,
        Err(e) => {
            tracing::warn!(
                path = %path,
                name = %name,
                backend = blobs.backend_name(),
                error = %e,
                "Failed to delete file content"
            );
            Some(format!("failed to delete file content: {e}"))
        }
    };

    blobs.prune_empty_ancestors(path).await;
    warning
}

fn with_warning(response: CommandResponse, warning: Option<String>) -> CommandResponse {
    match warning {
        Some(warning) => response.with_field("warning", warning),
        None => response,
    }
}
