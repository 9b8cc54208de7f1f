//! Response envelopes — the uniform success/failure wrapper around every
//! server response.
//!
//! The archive server is not consistent about its reply shapes: some
//! endpoints answer `{"success": 1, ...}`, some `{"success": false, "error":
//! "..."}`, and plenty answer a bare object with no `success` key at all.
//! [`ResponseEnvelope::normalize`] folds all of them, plus transport-level
//! failures, into one shape.

use bytes::Bytes;
use serde_json::Value;

use crate::error::{MinionError, TransportError};

/// A completed HTTP exchange, before any interpretation of the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A response whose body is the serialized `value`.
    pub fn json(status: u16, value: &Value) -> Self {
        Self::new(status, value.to_string())
    }

    /// 2xx, the same test `fetch` applies for `response.ok`.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Normalized `{success, error, successMessage, ...payload}` wrapper.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub success: bool,
    pub error: Option<String>,
    pub success_message: Option<String>,
    /// The full decoded body, passed through untouched.
    pub payload: Value,
}

impl ResponseEnvelope {
    /// Turn a transport outcome into an envelope.
    ///
    /// Non-2xx responses and network failures become a failed envelope
    /// without their body being read. A 2xx body that is not JSON is an
    /// error for the caller to report.
    pub fn normalize(outcome: &Result<RawResponse, TransportError>) -> Result<Self, MinionError> {
        match outcome {
            Err(e) => Ok(Self::transport_failure(e.to_string())),
            Ok(resp) if !resp.is_ok() => Ok(Self::transport_failure(format!(
                "response was not OK (status {})",
                resp.status
            ))),
            Ok(resp) => {
                let payload: Value = serde_json::from_slice(&resp.body)?;
                Ok(Self::from_payload(payload))
            }
        }
    }

    /// Envelope for a request that never produced a usable response.
    pub fn transport_failure(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            payload: serde_json::json!({ "success": 0, "error": message }),
            error: Some(message),
            success_message: None,
        }
    }

    /// Interpret a decoded body.
    ///
    /// A body without a `success` key is a success. Only an explicit falsy
    /// value marks the request as failed.
    pub fn from_payload(payload: Value) -> Self {
        let success = payload.get("success").map_or(true, is_truthy);
        let error = payload.get("error").and_then(display_value);
        let success_message = payload
            .get("successMessage")
            .filter(|v| is_truthy(v))
            .and_then(display_value);

        Self {
            success,
            error,
            success_message,
            payload,
        }
    }

    /// Error text for notifications; empty when the server sent none.
    pub fn error_text(&self) -> &str {
        self.error.as_deref().unwrap_or("")
    }
}

/// JavaScript truthiness, which is what the server's flags are written for:
/// `false`, `0`, `""` and `null` are falsy, everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a JSON value as notification text. Strings lose their quotes,
/// `null` renders as nothing.
pub fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
