//! SQLite metadata store and schema management.

use crate::error::MetadataResult;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite, Transaction};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Expected definition of the files table.
///
/// SQLite keeps the original `CREATE TABLE` text in `sqlite_master`; a stored
/// definition that differs from this one (ignoring whitespace and case) is
/// treated as drift and the table is rebuilt.
pub const FILES_TABLE_SQL: &str = "CREATE TABLE files ( \
    id INTEGER PRIMARY KEY AUTOINCREMENT, \
    name TEXT, \
    path TEXT, \
    type TEXT, \
    size INTEGER )";

/// Name of the (name, path) lookup index.
pub const FILES_INDEX_NAME: &str = "filesNamePath";

const FILES_INDEX_SQL: &str = "CREATE INDEX IF NOT EXISTS filesNamePath ON files (name, path)";

/// SQLite-based metadata store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
    query_timeout_secs: u64,
}

impl SqliteStore {
    /// Create a new SQLite store and bring the schema up to date.
    pub async fn new(
        path: impl AsRef<Path>,
        query_timeout_secs: Option<u64>,
    ) -> MetadataResult<Self> {
        let path = path.as_ref();
        let query_timeout_secs = query_timeout_secs.unwrap_or(600); // 10 minutes default

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            // Prevent transient "database is locked" errors under concurrent access.
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            // A single connection serializes commands, which is the isolation
            // model the file handlers rely on.
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(query_timeout_secs))
            .connect_with(opts)
            .await?;

        let store = Self {
            pool,
            query_timeout_secs,
        };
        store.migrate().await?;

        tracing::debug!(
            path = %path.display(),
            query_timeout_secs = store.query_timeout_secs,
            "SQLite metadata store ready"
        );

        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Start a transaction for a command that mutates the catalog.
    pub async fn begin(&self) -> MetadataResult<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin().await?)
    }

    /// Acquire a plain connection for a read-only command.
    pub async fn acquire(&self) -> MetadataResult<PoolConnection<Sqlite>> {
        Ok(self.pool.acquire().await?)
    }

    /// Ensure the files table and its lookup index exist.
    ///
    /// Returns `true` when the table was (re)created by this call.
    pub async fn migrate(&self) -> MetadataResult<bool> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<String> = sqlx::query_scalar(
            "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = 'files'",
        )
        .fetch_optional(&mut *tx)
        .await?;

        let created = match existing {
            Some(sql) if same_definition(&sql, FILES_TABLE_SQL) => false,
            Some(sql) => {
                tracing::warn!(
                    found = %sql,
                    "files table definition drifted, dropping and recreating"
                );
                sqlx::query("DROP INDEX IF EXISTS filesNamePath")
                    .execute(&mut *tx)
                    .await?;
                sqlx::query("DROP TABLE files").execute(&mut *tx).await?;
                true
            }
            None => true,
        };

        if created {
            sqlx::query(FILES_TABLE_SQL).execute(&mut *tx).await?;
            tracing::info!("Created files table");
        }
        sqlx::query(FILES_INDEX_SQL).execute(&mut *tx).await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Check database connectivity and health.
    pub async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn same_definition(found: &str, expected: &str) -> bool {
    fn tokens(sql: &str) -> String {
        sql.split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_lowercase()
    }
    tokens(found) == tokens(expected)
}
