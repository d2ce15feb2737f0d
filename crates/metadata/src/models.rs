//! Database models mapping to the metadata schema.

use sqlx::FromRow;

/// A row of the `files` table.
///
/// `path` is always stored normalized (no leading or trailing separator).
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct FileRow {
    pub id: i64,
    pub path: String,
    pub name: String,
    #[sqlx(rename = "type")]
    pub content_type: String,
    pub size: i64,
}
