//! Shared handler helpers.

use crate::command::Command;
use crate::error::{ApiError, ApiResult};
use fileshelf_core::MAX_PARAM_SIZE;

/// Get a required, non-empty parameter no longer than `MAX_PARAM_SIZE` bytes.
pub fn require_param<'a>(command: &'a Command, key: &str) -> ApiResult<&'a str> {
    let value = command
        .param(key)
        .ok_or_else(|| ApiError::Validation(format!("missing {key}")))?;

    if value.len() > MAX_PARAM_SIZE {
        return Err(ApiError::Validation(format!(
            "{key} too long, {MAX_PARAM_SIZE} bytes max"
        )));
    }

    Ok(value)
}

/// Parse the optional `id` parameter.
pub fn parse_id(command: &Command) -> ApiResult<Option<i64>> {
    command
        .param("id")
        .map(|raw| {
            raw.trim()
                .parse::<i64>()
                .map_err(|_| ApiError::Validation(format!("invalid file id: {raw:?}")))
        })
        .transpose()
}

/// Get the (path, name) pair when both are present.
pub fn location(command: &Command) -> Option<(&str, &str)> {
    Some((command.param("path")?, command.param("name")?))
}
