//! `narrate-client` — talks to a captioning endpoint over HTTP.
//!
//! Provides:
//! - [`HttpTransport`], the `reqwest` implementation of `NarrateTransport`
//! - file loading with extension-based media type detection
//! - [`narrate_file`], a one-shot helper for a single path

pub mod files;
pub mod http;

pub use files::{detect_media_type, read_selected_file};
pub use http::{endpoint_url, HttpTransport, HttpTransportOptions};

use std::path::Path;

use narrate_core::{NarrateTransport, NarrationController, NarrationResult, NarrationView};

/// Read `path` and run one invocation on `controller`.
///
/// Returns `None` only when a newer invocation superseded this one.
pub async fn narrate_file<T, V>(
    controller: &NarrationController<T, V>,
    path: &Path,
) -> Option<NarrationResult>
where
    T: NarrateTransport,
    V: NarrationView,
{
    let name = files::display_name(path);
    controller.run_read(&name, read_selected_file(path)).await
}
