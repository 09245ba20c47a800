//! CLI Watch Command
//!
//! Each input line names a file to describe. A new line supersedes the
//! request still in flight, so only the newest file's result is printed.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use narrate_client::narrate_file;
use narrate_core::{NarrateTransport, NarrationController, NarrationResult, NarrationView};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::describe_cmd::{build_controller, exit_status};
use crate::{CliContext, EndpointArgs, EXIT_OK};

pub async fn run(ctx: &CliContext, endpoint: &EndpointArgs) -> Result<u8> {
    let controller = Arc::new(build_controller(ctx, endpoint)?);
    info!("Watching stdin for image paths");
    let last = watch_lines(controller, BufReader::new(tokio::io::stdin())).await?;
    Ok(match last {
        Some(result) => exit_status(Some(&result)),
        None => EXIT_OK,
    })
}

/// Describe every path read from `input`, newest first in line.
///
/// Returns the result of the last selection, or `None` when no line
/// selected a file.
pub async fn watch_lines<T, V, R>(
    controller: Arc<NarrationController<T, V>>,
    input: R,
) -> Result<Option<NarrationResult>>
where
    T: NarrateTransport + 'static,
    V: NarrationView + 'static,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut in_flight: Option<JoinHandle<Option<NarrationResult>>> = None;

    while let Some(line) = lines.next_line().await? {
        let Some(path) = selected_path(&line) else {
            continue;
        };
        if let Some(previous) = in_flight.take() {
            if !previous.is_finished() {
                debug!(file = %path.display(), "Cancelling superseded request");
            }
            previous.abort();
        }

        let controller = Arc::clone(&controller);
        in_flight = Some(tokio::spawn(async move {
            narrate_file(&controller, &path).await
        }));
    }

    let Some(handle) = in_flight else {
        return Ok(None);
    };
    // A panicked task leaves no result.
    Ok(handle.await.ok().flatten())
}

/// A blank line selects nothing.
fn selected_path(line: &str) -> Option<PathBuf> {
    let trimmed = line.trim();
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}
