//! Command model shared by the dispatcher and the HTTP layer.

use crate::error::ApiError;
use bytes::Bytes;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Named operations understood by the file handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verb {
    FetchFile,
    StoreFile,
    DeleteFile,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FetchFile => "FetchFile",
            Self::StoreFile => "StoreFile",
            Self::DeleteFile => "DeleteFile",
        }
    }

    /// Whether the command only reads the catalog.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::FetchFile)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = ApiError;

    /// Case-insensitive; `ReadFile` and `WriteFile` are accepted as aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fetchfile" | "readfile" => Ok(Self::FetchFile),
            "storefile" | "writefile" => Ok(Self::StoreFile),
            "deletefile" => Ok(Self::DeleteFile),
            _ => Err(ApiError::UnknownCommand(s.to_string())),
        }
    }
}

/// An incoming command: verb, named string parameters and an optional payload.
#[derive(Clone, Debug)]
pub struct Command {
    pub verb: Verb,
    pub params: HashMap<String, String>,
    pub content: Bytes,
}

impl Command {
    pub fn new(verb: Verb) -> Self {
        Self {
            verb,
            params: HashMap::new(),
            content: Bytes::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn with_content(mut self, content: impl Into<Bytes>) -> Self {
        self.content = content.into();
        self
    }

    /// Get a parameter. Empty values count as absent.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

/// Result of a successful command: named string fields and optional content.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CommandResponse {
    pub fields: BTreeMap<String, String>,
    #[serde(skip)]
    pub content: Bytes,
}

impl CommandResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.fields.insert(key.into(), value.to_string());
        self
    }

    pub fn with_content(mut self, content: Bytes) -> Self {
        self.content = content;
        self
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verb_parsing_is_case_insensitive_with_aliases() {
        assert_eq!("FetchFile".parse::<Verb>().unwrap(), Verb::FetchFile);
        assert_eq!("readfile".parse::<Verb>().unwrap(), Verb::FetchFile);
        assert_eq!("WRITEFILE".parse::<Verb>().unwrap(), Verb::StoreFile);
        assert_eq!("storeFile".parse::<Verb>().unwrap(), Verb::StoreFile);
        assert_eq!("DeleteFile".parse::<Verb>().unwrap(), Verb::DeleteFile);
        assert!(matches!(
            "ListFiles".parse::<Verb>(),
            Err(ApiError::UnknownCommand(_))
        ));
    }

    #[test]
    fn only_fetch_is_read_only() {
        assert!(Verb::FetchFile.is_read_only());
        assert!(!Verb::StoreFile.is_read_only());
        assert!(!Verb::DeleteFile.is_read_only());
    }

    #[test]
    fn empty_params_count_as_absent() {
        let command = Command::new(Verb::FetchFile)
            .with_param("id", "")
            .with_param("name", "a.txt");
        assert_eq!(command.param("id"), None);
        assert_eq!(command.param("name"), Some("a.txt"));
        assert_eq!(command.param("path"), None);
    }

    #[test]
    fn response_serializes_fields_only() {
        let response = CommandResponse::new()
            .with_field("id", 7)
            .with_content(Bytes::from_static(b"payload"));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"fields": {"id": "7"}}));
    }
}
