//! The upload-and-narrate workflow controller.
//!
//! One controller per session owns the display state and the current
//! invocation token. Every file selection issues a fresh token; a result is
//! rendered only if its token is still current when it arrives, so a slow
//! earlier request can never overwrite the answer to a newer one.
//!
//! State machine: `Idle -> Pending -> Done`, and any new selection moves
//! back to `Pending`.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::display::NarrationView;
use crate::encode::{encode_body, Transmission};
use crate::error::NarrateError;
use crate::response::{caption_or_error, ServerReply};
use crate::transport::NarrateTransport;
use crate::types::{InvocationId, NarrationResult, SelectedFile, UiState};

pub struct NarrationController<T, V> {
    transport: T,
    view: V,
    transmission: Transmission,
    next_id: AtomicU64,
    current: Mutex<Option<InvocationId>>,
    state: Mutex<UiState>,
}

impl<T, V> NarrationController<T, V>
where
    T: NarrateTransport,
    V: NarrationView,
{
    pub fn new(transport: T, view: V) -> Self {
        Self {
            transport,
            view,
            transmission: Transmission::default(),
            next_id: AtomicU64::new(1),
            current: Mutex::new(None),
            state: Mutex::new(UiState::Idle),
        }
    }

    pub fn with_transmission(mut self, transmission: Transmission) -> Self {
        self.transmission = transmission;
        self
    }

    pub fn transmission(&self) -> Transmission {
        self.transmission
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn state(&self) -> UiState {
        self.state.lock().map(|s| *s).unwrap_or_default()
    }

    /// Token of the invocation whose result will be rendered, if any.
    pub fn current(&self) -> Option<InvocationId> {
        self.current.lock().ok().and_then(|c| *c)
    }

    /// Begin a new invocation for `file`, superseding any in flight.
    pub fn start_invocation(&self, file: &SelectedFile) -> InvocationId {
        self.begin(file.name())
    }

    /// Render `result` if `id` is still the current invocation.
    ///
    /// Returns `false` (and touches nothing) for a superseded or already
    /// completed invocation.
    pub fn complete_invocation(&self, id: InvocationId, result: NarrationResult) -> bool {
        let Ok(mut current) = self.current.lock() else {
            return false;
        };
        if *current != Some(id) {
            let active = *current;
            debug!(invocation = %id, current = ?active, "Discarding stale narration result");
            return false;
        }
        *current = None;

        self.set_state(UiState::Done);
        self.view.show_result(&result);
        true
    }

    /// Run one full invocation for an already-read file.
    ///
    /// `None` is the "no file selected" case and does nothing. Returns the
    /// rendered result, or `None` when the invocation was superseded.
    pub async fn run(&self, file: Option<SelectedFile>) -> Option<NarrationResult> {
        let file = file?;
        let id = self.start_invocation(&file);
        let result = self.narrate(id, &file).await;
        self.complete_invocation(id, result.clone()).then_some(result)
    }

    /// Run one invocation whose file still has to be read.
    ///
    /// The file name is shown before reading starts; a read failure becomes
    /// the invocation's failure result.
    pub async fn run_read<F>(&self, name: &str, read: F) -> Option<NarrationResult>
    where
        F: Future<Output = Result<SelectedFile, NarrateError>>,
    {
        let id = self.begin(name);
        let result = match read.await {
            Ok(file) => self.narrate(id, &file).await,
            Err(err) => {
                warn!(invocation = %id, file = %name, error = %err, "Failed to read selected file");
                err.into()
            }
        };
        self.complete_invocation(id, result.clone()).then_some(result)
    }

    fn begin(&self, name: &str) -> InvocationId {
        let id = InvocationId(self.next_id.fetch_add(1, Ordering::SeqCst));
        if let Ok(mut current) = self.current.lock() {
            if let Some(previous) = current.replace(id) {
                debug!(invocation = %id, superseded = %previous, "New selection supersedes pending invocation");
            }
        }

        self.view.show_file_name(name);
        self.view.clear_result();
        self.set_state(UiState::Pending);
        id
    }

    fn set_state(&self, state: UiState) {
        if let Ok(mut current) = self.state.lock() {
            *current = state;
        }
        self.view.set_state(state);
    }

    /// Encode, send exactly once, and interpret.
    async fn narrate(&self, id: InvocationId, file: &SelectedFile) -> NarrationResult {
        let start = Instant::now();
        info!(
            invocation = %id,
            file = %file.name(),
            media_type = %file.media_type(),
            bytes = file.len(),
            transmission = %self.transmission,
            transport = self.transport.name(),
            "Requesting narration"
        );

        let outcome = match encode_body(file, self.transmission) {
            Ok(body) => match self.transport.post(body).await {
                Ok(reply) => {
                    log_reply(id, &reply);
                    caption_or_error(&reply)
                }
                Err(err) => Err(err),
            },
            Err(err) => Err(err),
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        match outcome {
            Ok(caption) => {
                info!(invocation = %id, elapsed_ms, "Narration succeeded");
                NarrationResult::Caption(caption)
            }
            Err(err) => {
                warn!(invocation = %id, elapsed_ms, error = %err, "Narration failed");
                err.into()
            }
        }
    }
}

fn log_reply(id: InvocationId, reply: &ServerReply) {
    debug!(
        invocation = %id,
        status = reply.status,
        content_type = reply.content_type.as_deref().unwrap_or(""),
        body_bytes = reply.body.len(),
        "Received narration reply"
    );
}
