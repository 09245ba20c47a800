mod config_cmd;
mod describe_cmd;
mod terminal_output;
mod theme_cmd;
mod watch_cmd;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::warn;

use narrate_config::{
    check_base_url, config_dir, config_file_path, load_or_default, system_prefers_dark,
    NarrateConfig, Theme, ThemeStore, ValidationReport,
};
use narrate_core::Transmission;
use narrate_logging::{init_logger, LogOptions};

use terminal_output::{note_error, supports_color, Palette};

/// A caption was shown, or there was nothing to do.
pub const EXIT_OK: u8 = 0;
/// The invocation ended in a failure result.
pub const EXIT_FAILURE: u8 = 1;
/// The config (or a command-line override) is unusable.
pub const EXIT_CONFIG_INVALID: u8 = 2;

#[derive(Parser)]
#[command(name = "narrate")]
#[command(about = "Narrate — describe images with a captioning endpoint")]
#[command(version)]
struct Cli {
    /// Config directory (default: $NARRATE_CONFIG_DIR or ~/.narrate)
    #[arg(long, global = true, value_name = "DIR")]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Describe one image file
    Describe {
        /// Image to describe
        file: PathBuf,
        #[command(flatten)]
        endpoint: EndpointArgs,
    },
    /// Read image paths from stdin, one per line; the newest path wins
    Watch {
        #[command(flatten)]
        endpoint: EndpointArgs,
    },
    /// Show or change the display theme
    Theme {
        #[command(subcommand)]
        action: Option<theme_cmd::ThemeAction>,
    },
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: config_cmd::ConfigAction,
    },
}

/// Per-run overrides of the configured endpoint.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct EndpointArgs {
    /// How the file is sent: raw_body or data_uri_json
    #[arg(long, value_name = "STRATEGY")]
    transmission: Option<Transmission>,

    /// Server base URL, e.g. http://localhost:3000
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
}

/// Everything a command needs after startup.
pub struct CliContext {
    pub config_path: PathBuf,
    pub config: NarrateConfig,
    pub report: ValidationReport,
    pub theme_store: ThemeStore,
    pub saved_theme: Option<Theme>,
    pub theme: Theme,
    pub palette: Palette,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config_dir = cli.config.clone().unwrap_or_else(config_dir);
    let config_path = config_file_path(&config_dir);
    let (config, report) = load_or_default(&config_path).await;

    let color = supports_color();
    init_logger(&LogOptions {
        level: if cli.verbose {
            "debug".to_string()
        } else {
            config.log_level().to_string()
        },
        dir: config.log_dir().map(PathBuf::from),
        json: config.log_json(),
        ansi: color,
    });

    for warning in &report.warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }

    let theme_store = ThemeStore::new(&config_dir);
    let saved_theme = theme_store.load().await;
    let theme = Theme::resolve(saved_theme, config.default_theme(), system_prefers_dark());

    let ctx = CliContext {
        config_path,
        config,
        report,
        theme_store,
        saved_theme,
        theme,
        palette: Palette::for_theme(theme, color),
    };

    let status = match cli.command {
        Commands::Config { action } => config_cmd::run(&ctx, action).await?,
        Commands::Theme { action } => theme_cmd::run(&ctx, action.unwrap_or_default()).await?,
        Commands::Describe { file, endpoint } => match reject_invalid_config(&ctx, &endpoint) {
            Some(status) => status,
            None => describe_cmd::run(&ctx, &endpoint, &file).await?,
        },
        Commands::Watch { endpoint } => match reject_invalid_config(&ctx, &endpoint) {
            Some(status) => status,
            None => watch_cmd::run(&ctx, &endpoint).await?,
        },
    };
    Ok(ExitCode::from(status))
}

/// Narration needs a usable endpoint; print every config error and bail.
fn reject_invalid_config(ctx: &CliContext, endpoint: &EndpointArgs) -> Option<u8> {
    let mut problems: Vec<String> = ctx.report.errors.iter().map(ToString::to_string).collect();
    if let Some(problem) = endpoint.base_url.as_deref().and_then(check_base_url) {
        problems.push(format!("--base-url: {problem}"));
    }
    if problems.is_empty() {
        return None;
    }
    for problem in &problems {
        note_error(&ctx.palette, problem);
    }
    Some(EXIT_CONFIG_INVALID)
}

#[cfg(test)]
pub(crate) fn test_context(dir: &std::path::Path) -> CliContext {
    let config = narrate_config::apply_all_defaults(NarrateConfig::default());
    let report = narrate_config::validate(&config);
    CliContext {
        config_path: config_file_path(dir),
        config,
        report,
        theme_store: ThemeStore::new(dir),
        saved_theme: None,
        theme: Theme::Light,
        palette: Palette::plain(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_describe_with_overrides() {
        let cli = Cli::try_parse_from([
            "narrate",
            "--verbose",
            "describe",
            "photo.jpg",
            "--transmission",
            "data-uri-json",
            "--base-url",
            "http://caption.example",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Describe { file, endpoint } => {
                assert_eq!(file, PathBuf::from("photo.jpg"));
                assert_eq!(endpoint.transmission, Some(Transmission::DataUriJson));
                assert_eq!(endpoint.base_url.as_deref(), Some("http://caption.example"));
            }
            _ => panic!("expected describe"),
        }
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["narrate", "theme", "--config", "/tmp/narrate"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/narrate")));
        assert!(matches!(cli.command, Commands::Theme { action: None }));
    }

    #[test]
    fn valid_config_runs() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        assert_eq!(reject_invalid_config(&ctx, &EndpointArgs::default()), None);
    }

    #[test]
    fn config_errors_exit_with_config_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = test_context(dir.path());
        ctx.report.errors.push(narrate_config::ConfigValidationError {
            path: "endpoint.baseUrl".into(),
            message: "Base URL must start with http:// or https://".into(),
        });
        assert_eq!(
            reject_invalid_config(&ctx, &EndpointArgs::default()),
            Some(EXIT_CONFIG_INVALID)
        );
    }

    #[test]
    fn bad_base_url_override_exits_with_config_status() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        let endpoint = EndpointArgs {
            base_url: Some("caption.example".into()),
            ..Default::default()
        };
        assert_eq!(reject_invalid_config(&ctx, &endpoint), Some(EXIT_CONFIG_INVALID));

        let endpoint = EndpointArgs {
            base_url: Some("https://caption.example".into()),
            ..Default::default()
        };
        assert_eq!(reject_invalid_config(&ctx, &endpoint), None);
    }

    #[test]
    fn rejects_unknown_transmission() {
        assert!(Cli::try_parse_from(["narrate", "watch", "--transmission", "pigeon"]).is_err());
    }
}
