//! Turning a captioning reply into a caption or a failure message.
//!
//! Everything here is pure: a reply in, a `NarrationResult` out. Malformed
//! bodies of any kind end up as failures, never as panics.

use bytes::Bytes;
use serde_json::Value;

use crate::error::NarrateError;
use crate::types::NarrationResult;

/// What came back from the endpoint, captured in full before interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServerReply {
    pub status: u16,
    /// Reason phrase for the status, when known.
    pub reason: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl ServerReply {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            reason: None,
            content_type: None,
            body: body.into(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Interpret a reply as the result shown to the user.
pub fn interpret(reply: &ServerReply) -> NarrationResult {
    match caption_or_error(reply) {
        Ok(caption) => NarrationResult::Caption(caption),
        Err(err) => err.into(),
    }
}

/// Like [`interpret`], but keeps the typed error for callers that log it.
pub fn caption_or_error(reply: &ServerReply) -> Result<String, NarrateError> {
    if !reply.is_success() {
        return Err(NarrateError::Server {
            status: reply.status,
            message: server_error_message(reply),
        });
    }

    let value: Value = serde_json::from_slice(&reply.body)
        .map_err(|e| NarrateError::InvalidResponse(format!("body is not JSON: {e}")))?;

    match value.get("caption").and_then(Value::as_str) {
        Some(caption) if !caption.trim().is_empty() => Ok(capitalize_first(caption)),
        Some(_) => Err(NarrateError::InvalidResponse("caption is empty".into())),
        None => Err(NarrateError::InvalidResponse("missing caption field".into())),
    }
}

/// Best available message for a non-2xx reply.
///
/// Order: JSON `error` string, then the raw body text, then a message built
/// from the status code and reason phrase. Never returns an empty string.
pub fn server_error_message(reply: &ServerReply) -> String {
    if let Ok(value) = serde_json::from_slice::<Value>(&reply.body) {
        if let Some(message) = value.get("error").and_then(Value::as_str) {
            let message = message.trim();
            if !message.is_empty() {
                return message.to_string();
            }
        }
    }

    let text = String::from_utf8_lossy(&reply.body);
    let text = text.trim();
    if !text.is_empty() {
        return text.to_string();
    }

    match reply.reason.as_deref().map(str::trim) {
        Some(reason) if !reason.is_empty() => format!("Server error: {} {}", reply.status, reason),
        _ => format!("Server error: {}", reply.status),
    }
}

/// Uppercase the first character and leave the rest untouched.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
