pub mod mock;

use async_trait::async_trait;

use crate::encode::RequestBody;
use crate::error::NarrateError;
use crate::response::ServerReply;

/// Sends one encoded body to the captioning endpoint.
///
/// Any failure to get a complete reply (connect, timeout, truncated body)
/// is a [`NarrateError::Transport`]. Non-2xx statuses are *not* errors here;
/// they come back as a [`ServerReply`] for interpretation.
#[async_trait]
pub trait NarrateTransport: Send + Sync {
    /// Transport name used in logs (e.g. "http", "mock").
    fn name(&self) -> &str;

    /// POST the body and return the captured reply.
    async fn post(&self, body: RequestBody) -> Result<ServerReply, NarrateError>;
}
