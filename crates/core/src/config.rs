//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default base directory for stored files.
pub const DEFAULT_FILES_PATH: &str = "/var/cache/fileshelf/files";

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Blob storage configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Local filesystem storage.
    Filesystem {
        /// Base directory; a file lives at `path/<logical path>/<name>`.
        #[serde(default = "default_files_path")]
        path: PathBuf,
    },
}

fn default_files_path() -> PathBuf {
    PathBuf::from(DEFAULT_FILES_PATH)
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Filesystem {
            path: default_files_path(),
        }
    }
}

impl StorageConfig {
    /// Validate storage configuration invariants.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            StorageConfig::Filesystem { path } => {
                if path.as_os_str().is_empty() {
                    return Err("filesystem storage requires a non-empty path".to_string());
                }
                Ok(())
            }
        }
    }

    /// Whether this configuration uses the built-in default base directory.
    pub fn is_default_path(&self) -> bool {
        match self {
            StorageConfig::Filesystem { path } => *path == default_files_path(),
        }
    }
}

/// Metadata store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MetadataConfig {
    /// SQLite database.
    Sqlite {
        /// Database file path.
        path: PathBuf,
        /// Query timeout in seconds (advisory only - SQLite cannot force-cancel queries).
        #[serde(default = "default_sqlite_query_timeout_secs")]
        query_timeout_secs: Option<u64>,
    },
}

fn default_sqlite_query_timeout_secs() -> Option<u64> {
    Some(600) // 10 minutes (advisory only)
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from("./data/metadata.db"),
            query_timeout_secs: default_sqlite_query_timeout_secs(),
        }
    }
}

impl MetadataConfig {
    /// Validate metadata configuration invariants.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            MetadataConfig::Sqlite {
                path,
                query_timeout_secs,
            } => {
                if path.as_os_str().is_empty() {
                    return Err("sqlite metadata requires a non-empty path".to_string());
                }
                if *query_timeout_secs == Some(0) {
                    return Err("query_timeout_secs must be greater than zero".to_string());
                }
                Ok(())
            }
        }
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Blob storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Metadata store configuration.
    #[serde(default)]
    pub metadata: MetadataConfig,
}

impl AppConfig {
    /// Create a test configuration rooted in `dir`.
    ///
    /// **For testing only.** Places both the base directory and the SQLite
    /// database under `dir`.
    pub fn for_testing(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::Filesystem {
                path: dir.join("files"),
            },
            metadata: MetadataConfig::Sqlite {
                path: dir.join("metadata.db"),
                query_timeout_secs: None,
            },
        }
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), String> {
        self.storage.validate()?;
        self.metadata.validate()?;
        Ok(())
    }
}
