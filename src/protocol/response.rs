//! Response definitions
//!
//! Represents responses to callers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ok,
    NotFound,
    Invalid,
    Error,
}

/// A response to send to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Result value for OK responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,

    /// Explanation for non-OK responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Response {
    /// Create an OK response with a payload
    pub fn ok(payload: Value) -> Self {
        Self {
            status: Status::Ok,
            payload: Some(payload),
            message: None,
        }
    }

    /// Create a NOT_FOUND response
    pub fn not_found(what: impl Into<String>) -> Self {
        Self {
            status: Status::NotFound,
            payload: None,
            message: Some(what.into()),
        }
    }

    /// Create an INVALID response (request rejected by validation)
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            status: Status::Invalid,
            payload: None,
            message: Some(message.into()),
        }
    }

    /// Create an ERROR response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            payload: None,
            message: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}
