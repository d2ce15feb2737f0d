//! Command handlers and HTTP front end for fileshelf.
//!
//! This crate provides:
//! - The command model (verb, string parameters, optional payload)
//! - FetchFile, StoreFile and DeleteFile handlers over the catalog and blob store
//! - A dispatcher that scopes each command to a connection or transaction
//! - An axum router exposing the commands over HTTP

pub mod command;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use command::{Command, CommandResponse, Verb};
pub use error::{ApiError, ApiResult};
pub use handlers::dispatch;
pub use routes::create_router;
pub use state::AppState;
