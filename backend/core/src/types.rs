use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Declared media type of a selected file (e.g. `image/jpeg`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaType(String);

impl MediaType {
    pub const OCTET_STREAM: &'static str = "application/octet-stream";

    /// Build a media type, falling back to `application/octet-stream` when blank.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Self(Self::OCTET_STREAM.to_string())
        } else {
            Self(trimmed.to_ascii_lowercase())
        }
    }

    pub fn octet_stream() -> Self {
        Self(Self::OCTET_STREAM.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_image(&self) -> bool {
        self.0.starts_with("image/")
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The file chosen by the user: name, declared media type and raw bytes.
///
/// Immutable once read; owned by a single invocation.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    name: String,
    media_type: MediaType,
    bytes: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, media_type: MediaType, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            media_type,
            bytes: bytes.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &MediaType {
        &self.media_type
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Outcome of one invocation, rendered as plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum NarrationResult {
    Caption(String),
    Failure(String),
}

impl NarrationResult {
    pub fn text(&self) -> &str {
        match self {
            Self::Caption(text) | Self::Failure(text) => text,
        }
    }

    pub fn is_caption(&self) -> bool {
        matches!(self, Self::Caption(_))
    }
}

impl fmt::Display for NarrationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Token identifying one invocation. Later invocations carry larger ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InvocationId(pub u64);

impl fmt::Display for InvocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Display state of the result area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiState {
    #[default]
    Idle,
    Pending,
    Done,
}
