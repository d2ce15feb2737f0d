//! Core types and shared rules for the fileshelf blob store.
//!
//! This crate defines what every other crate agrees on:
//! - Size limits for command parameters and payloads
//! - Logical path normalization and validation
//! - Configuration types

pub mod config;
pub mod error;
pub mod path;

pub use error::{Error, Result};
pub use path::{normalize_path, validate_name, validate_path};

/// Maximum payload size accepted by StoreFile: 64 MiB
pub const MAX_CONTENT_SIZE: usize = 64 * 1024 * 1024;

/// Maximum length of the `path`, `name` and `type` parameters, in bytes.
pub const MAX_PARAM_SIZE: usize = 255;
