//! Structured Logger
//!
//! Wraps `tracing` to provide console output on stderr, optional daily
//! rolling files (NDJSON or plain), and environment-based level control.

use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Where and how much to log.
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Default filter when `RUST_LOG` is unset, e.g. `info` or `narrate_core=debug`.
    pub level: String,
    /// Directory for `narrate.log.YYYY-MM-DD` files; console only when `None`.
    pub dir: Option<PathBuf>,
    /// NDJSON file lines instead of the plain console format.
    pub json: bool,
    pub ansi: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
            json: true,
            ansi: true,
        }
    }
}

/// Initialize the global subscriber.
///
/// Console logs go to stderr so stdout carries only results. Calling this
/// twice is harmless; the second call is ignored.
pub fn init_logger(options: &LogOptions) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&options.level));

    let file_appender = options
        .dir
        .as_ref()
        .map(|dir| RollingFileAppender::new(Rotation::DAILY, dir, "narrate.log"));
    let (json_file_layer, plain_file_layer) = match file_appender {
        Some(appender) if options.json => (
            Some(fmt::layer().json().with_writer(appender).with_ansi(false)),
            None,
        ),
        Some(appender) => (None, Some(fmt::layer().with_writer(appender).with_ansi(false))),
        None => (None, None),
    };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(options.ansi);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(json_file_layer)
        .with(plain_file_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_file_layer_when_json_is_off() {
        let dir = tempfile::tempdir().unwrap();
        init_logger(&LogOptions {
            level: "info".to_string(),
            dir: Some(dir.path().to_path_buf()),
            json: false,
            ansi: false,
        });

        tracing::warn!(caption_len = 24, "plain file line");

        let entry = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .find(|e| e.file_name().to_string_lossy().starts_with("narrate.log"))
            .expect("a log file");
        let content = std::fs::read_to_string(entry.path()).unwrap();
        assert!(content.contains("plain file line"));
        assert!(!content.trim_start().starts_with('{'));
    }
}
