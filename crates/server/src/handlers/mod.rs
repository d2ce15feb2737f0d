//! Command dispatch and HTTP request handlers.

pub mod api;
pub mod common;
pub mod files;

pub use api::*;

use crate::command::{Command, CommandResponse, Verb};
use crate::error::ApiResult;
use crate::state::AppState;

/// Run a command against the catalog and blob store.
///
/// Read commands use a pooled connection. Write commands run inside a
/// transaction that is committed when the handler succeeds and rolled back
/// when it fails. The blob store is not transactional: anything written to
/// disk before a failure stays there.
pub async fn dispatch(state: &AppState, command: &Command) -> ApiResult<CommandResponse> {
    let blobs = state.blobs.as_ref();

    if command.verb.is_read_only() {
        let mut conn = state.metadata.acquire().await?;
        return files::fetch_file(&mut *conn, blobs, command).await;
    }

    let mut tx = state.metadata.begin().await?;
    let result = match command.verb {
        Verb::StoreFile => files::store_file(&mut *tx, blobs, command).await,
        Verb::DeleteFile => files::delete_file(&mut *tx, blobs, command).await,
        Verb::FetchFile => files::fetch_file(&mut *tx, blobs, command).await,
    };

    match result {
        Ok(response) => {
            tx.commit()
                .await
                .map_err(fileshelf_metadata::MetadataError::from)?;
            Ok(response)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(
                    verb = %command.verb,
                    error = %rollback_err,
                    "Failed to roll back transaction"
                );
            }
            tracing::debug!(verb = %command.verb, error = %e, "Command failed");
            Err(e)
        }
    }
}
