//! Catalog of stored files for fileshelf.
//!
//! This crate provides the relational side of the store:
//! - The `files` table and its (name, path) lookup index
//! - Lookup, insert, update and delete of file records
//! - Transaction and connection handles for the command dispatcher

pub mod error;
pub mod models;
pub mod repos;
pub mod store;

pub use error::{MetadataError, MetadataResult};
pub use models::FileRow;
pub use repos::FileRepo;
pub use store::SqliteStore;

use fileshelf_core::config::MetadataConfig;

/// Create a metadata store from configuration.
pub async fn from_config(config: &MetadataConfig) -> MetadataResult<SqliteStore> {
    config.validate().map_err(MetadataError::Config)?;

    match config {
        MetadataConfig::Sqlite {
            path,
            query_timeout_secs,
        } => SqliteStore::new(path, *query_timeout_secs).await,
    }
}
