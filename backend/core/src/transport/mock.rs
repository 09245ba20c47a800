use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::NarrateTransport;
use crate::encode::RequestBody;
use crate::error::NarrateError;
use crate::response::ServerReply;

/// A transport that replays scripted replies in order.
///
/// Each scripted step may carry a delay, which lets tests hold one request
/// in flight while a newer one completes. Every posted body is recorded.
pub struct MockTransport {
    script: Mutex<VecDeque<(Duration, Result<ServerReply, NarrateError>)>>,
    requests: Mutex<Vec<RequestBody>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a reply returned immediately.
    pub fn with_reply(self, reply: ServerReply) -> Self {
        self.with_delayed_reply(Duration::ZERO, reply)
    }

    /// Queue a reply returned after `delay`.
    pub fn with_delayed_reply(self, delay: Duration, reply: ServerReply) -> Self {
        self.push(delay, Ok(reply));
        self
    }

    /// Queue a transport failure.
    pub fn with_error(self, err: NarrateError) -> Self {
        self.push(Duration::ZERO, Err(err));
        self
    }

    fn push(&self, delay: Duration, step: Result<ServerReply, NarrateError>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back((delay, step));
        }
    }

    /// Bodies posted so far, in call order.
    pub fn requests(&self) -> Vec<RequestBody> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NarrateTransport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn post(&self, body: RequestBody) -> Result<ServerReply, NarrateError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(body);
        }

        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        let Some((delay, step)) = next else {
            return Err(NarrateError::Transport("mock transport has no scripted reply".into()));
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        step
    }
}
