use thiserror::Error;

use crate::types::NarrationResult;

/// Fixed message shown when the selected file cannot be read.
pub const FILE_READ_MESSAGE: &str = "There was an error reading the file.";

/// Fixed message shown when a 2xx reply carries no usable caption.
pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid response from server.";

/// Terminal failures of one invocation. None are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NarrateError {
    #[error("could not read file: {0}")]
    FileRead(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl NarrateError {
    /// The single human-readable string rendered in the result area.
    pub fn user_message(&self) -> String {
        match self {
            Self::FileRead(_) => FILE_READ_MESSAGE.to_string(),
            Self::Transport(message) if message.trim().is_empty() => {
                "Network request failed.".to_string()
            }
            Self::Transport(message) => message.clone(),
            Self::Server { message, .. } => message.clone(),
            Self::InvalidResponse(_) => INVALID_RESPONSE_MESSAGE.to_string(),
        }
    }
}

impl From<NarrateError> for NarrationResult {
    fn from(err: NarrateError) -> Self {
        NarrationResult::Failure(err.user_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_read_uses_fixed_message() {
        let err = NarrateError::FileRead("permission denied".into());
        assert_eq!(err.user_message(), FILE_READ_MESSAGE);
    }

    #[test]
    fn server_error_surfaces_extracted_message() {
        let err = NarrateError::Server {
            status: 500,
            message: "model unavailable".into(),
        };
        assert_eq!(
            NarrationResult::from(err),
            NarrationResult::Failure("model unavailable".into())
        );
    }

    #[test]
    fn empty_transport_message_is_never_rendered_blank() {
        let err = NarrateError::Transport(String::new());
        assert!(!err.user_message().is_empty());
    }
}
