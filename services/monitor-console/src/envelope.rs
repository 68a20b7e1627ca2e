//! The `{status, message, ...}` envelope every admin endpoint answers with

use serde::Deserialize;
use serde_json::{Map, Value};

/// The only status value treated as success
pub const STATUS_SUCCESS: &str = "success";

/// Decoded response envelope.
///
/// Keys other than `status` and `message` are kept as payload; the
/// configuration endpoint, for instance, answers with a sibling `config` key.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiResult {
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub message: Value,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl ApiResult {
    pub fn from_body(body: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// True only for the literal string `"success"`
    pub fn is_success(&self) -> bool {
        self.status.as_str() == Some(STATUS_SUCCESS)
    }

    /// Human-readable message, empty when the server sent none
    pub fn message(&self) -> String {
        match &self.message {
            Value::Null => String::new(),
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }

    pub fn payload(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }
}
