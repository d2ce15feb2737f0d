//! HTTP endpoints.
//!
//! Every endpoint builds a [`Command`] from the request and hands it to
//! [`dispatch`](super::dispatch). Query string pairs become parameters and the
//! request body becomes the payload.

use crate::command::{Command, CommandResponse, Verb};
use crate::error::ApiResult;
use crate::state::AppState;
use axum::Json;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde::Serialize;
use std::collections::HashMap;

/// Fallback content type when the stored type is not a valid header value.
const OCTET_STREAM: &str = "application/octet-stream";

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /v1/health - Check the catalog database and the base directory.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    state.metadata.health_check().await?;
    state.blobs.health_check().await?;

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}

/// POST /v1/commands/{verb} - Run a named command.
pub async fn run_command(
    State(state): State<AppState>,
    Path(verb): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> ApiResult<Response> {
    let verb: Verb = verb.parse()?;
    let command = Command::new(verb).with_params(params).with_content(body);
    execute(&state, command).await
}

/// GET /v1/files/{id} - Fetch a file by id.
pub async fn fetch_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let command = Command::new(Verb::FetchFile).with_param("id", id);
    execute(&state, command).await
}

/// DELETE /v1/files/{id} - Delete a file by id.
pub async fn delete_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let command = Command::new(Verb::DeleteFile).with_param("id", id);
    execute(&state, command).await
}

/// GET /v1/files?path=..&name=.. - Fetch a file by location.
pub async fn fetch_by_location(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let command = Command::new(Verb::FetchFile).with_params(params);
    execute(&state, command).await
}

/// PUT /v1/files?path=..&name=..&type=.. - Store a file at a location.
pub async fn store_at_location(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> ApiResult<Response> {
    let command = Command::new(Verb::StoreFile)
        .with_params(params)
        .with_content(body);
    execute(&state, command).await
}

/// DELETE /v1/files?path=..&name=.. - Delete a file by location.
pub async fn delete_by_location(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let command = Command::new(Verb::DeleteFile).with_params(params);
    execute(&state, command).await
}

async fn execute(state: &AppState, command: Command) -> ApiResult<Response> {
    let response = super::dispatch(state, &command).await?;
    Ok(render(command.verb, response))
}

/// Fetches answer with the raw content; everything else answers with the fields as JSON.
fn render(verb: Verb, response: CommandResponse) -> Response {
    if verb != Verb::FetchFile {
        return (StatusCode::OK, Json(response.fields)).into_response();
    }

    let content_type = response
        .field("type")
        .and_then(|value| HeaderValue::from_str(value).ok())
        .unwrap_or_else(|| HeaderValue::from_static(OCTET_STREAM));

    let mut http = Response::new(Body::from(response.content.clone()));
    let headers = http.headers_mut();
    headers.insert(CONTENT_TYPE, content_type);
    headers.insert(CONTENT_LENGTH, HeaderValue::from(response.content.len()));

    for (field, header) in [
        ("id", "x-file-id"),
        ("path", "x-file-path"),
        ("name", "x-file-name"),
        ("size", "x-file-size"),
    ] {
        // Values that cannot be carried in a header are left out.
        if let Some(value) = response
            .field(field)
            .and_then(|value| HeaderValue::from_str(value).ok())
        {
            headers.insert(header, value);
        }
    }

    http
}
