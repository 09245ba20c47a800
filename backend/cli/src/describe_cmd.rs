//! CLI Describe Command
//!
//! Sends one image to the captioning endpoint and prints the result.

use std::io::Stdout;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use narrate_client::{narrate_file, HttpTransport, HttpTransportOptions};
use narrate_core::{NarrationController, NarrationResult};

use crate::terminal_output::TerminalView;
use crate::{CliContext, EndpointArgs, EXIT_FAILURE, EXIT_OK};

pub type CliController = NarrationController<HttpTransport, TerminalView<Stdout>>;

/// Build a controller rendering to stdout, with command-line overrides applied.
pub fn build_controller(ctx: &CliContext, endpoint: &EndpointArgs) -> Result<CliController> {
    let transport = HttpTransport::new(HttpTransportOptions {
        base_url: endpoint
            .base_url
            .clone()
            .unwrap_or_else(|| ctx.config.base_url().to_string()),
        path: ctx.config.narrate_path().to_string(),
        timeout: Duration::from_secs(ctx.config.timeout_secs()),
    })?;
    let view = TerminalView::new(std::io::stdout(), ctx.palette.clone());
    let transmission = endpoint
        .transmission
        .unwrap_or_else(|| ctx.config.transmission());

    Ok(NarrationController::new(transport, view).with_transmission(transmission))
}

pub async fn run(ctx: &CliContext, endpoint: &EndpointArgs, file: &Path) -> Result<u8> {
    let controller = build_controller(ctx, endpoint)?;
    Ok(exit_status(narrate_file(&controller, file).await.as_ref()))
}

/// Zero only when a caption was shown.
pub fn exit_status(result: Option<&NarrationResult>) -> u8 {
    match result {
        Some(result) if result.is_caption() => EXIT_OK,
        _ => EXIT_FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_context;

    #[test]
    fn caption_is_success_anything_else_fails() {
        let caption = NarrationResult::Caption("A dog running in a field".into());
        let failure = NarrationResult::Failure("Invalid response from server.".into());
        assert_eq!(exit_status(Some(&caption)), EXIT_OK);
        assert_eq!(exit_status(Some(&failure)), EXIT_FAILURE);
        assert_eq!(exit_status(None), EXIT_FAILURE);
    }

    #[tokio::test]
    async fn unreadable_file_exits_with_failure() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        let status = run(&ctx, &EndpointArgs::default(), &dir.path().join("missing.png"))
            .await
            .unwrap();
        assert_eq!(status, EXIT_FAILURE);
    }

    #[test]
    fn overrides_win_over_config() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        let endpoint = EndpointArgs {
            transmission: Some(narrate_core::Transmission::DataUriJson),
            base_url: Some("http://127.0.0.1:9".into()),
        };
        let controller = build_controller(&ctx, &endpoint).unwrap();
        assert_eq!(controller.transmission(), narrate_core::Transmission::DataUriJson);
        assert_eq!(controller.transport().url(), "http://127.0.0.1:9/api/narrate");
    }
}
