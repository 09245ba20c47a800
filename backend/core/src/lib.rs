pub mod display;
pub mod encode;
pub mod error;
pub mod response;
pub mod transport;
pub mod types;
pub mod workflow;

pub use display::{NarrationView, RecordingView, ViewCall};
pub use encode::{data_uri, encode_body, RequestBody, Transmission};
pub use error::NarrateError;
pub use response::{capitalize_first, interpret, server_error_message, ServerReply};
pub use transport::{mock::MockTransport, NarrateTransport};
pub use types::{InvocationId, MediaType, NarrationResult, SelectedFile, UiState};
pub use workflow::NarrationController;

/// Endpoint path the captioning service listens on.
pub const NARRATE_PATH: &str = "/api/narrate";
