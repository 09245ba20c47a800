//! The result area the workflow writes to.

use std::sync::Mutex;

use crate::types::{NarrationResult, UiState};

/// Sink for the three user-visible updates of an invocation.
///
/// Implementations render plain text only.
pub trait NarrationView: Send + Sync {
    fn show_file_name(&self, name: &str);

    fn clear_result(&self);

    fn set_state(&self, state: UiState);

    fn show_result(&self, result: &NarrationResult);
}

/// One recorded call on a [`RecordingView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCall {
    FileName(String),
    Cleared,
    State(UiState),
    Result(NarrationResult),
}

/// A view that records every call, for tests and headless runs.
#[derive(Debug, Default)]
pub struct RecordingView {
    calls: Mutex<Vec<ViewCall>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<ViewCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Every result rendered so far, oldest first.
    pub fn results(&self) -> Vec<NarrationResult> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ViewCall::Result(result) => Some(result),
                _ => None,
            })
            .collect()
    }

    /// The text currently displayed in the result area.
    pub fn displayed(&self) -> Option<String> {
        let mut shown = None;
        for call in self.calls() {
            match call {
                ViewCall::Cleared => shown = None,
                ViewCall::Result(result) => shown = Some(result.text().to_string()),
                _ => {}
            }
        }
        shown
    }

    fn record(&self, call: ViewCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl NarrationView for RecordingView {
    fn show_file_name(&self, name: &str) {
        self.record(ViewCall::FileName(name.to_string()));
    }

    fn clear_result(&self) {
        self.record(ViewCall::Cleared);
    }

    fn set_state(&self, state: UiState) {
        self.record(ViewCall::State(state));
    }

    fn show_result(&self, result: &NarrationResult) {
        self.record(ViewCall::Result(result.clone()));
    }
}
