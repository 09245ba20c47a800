//! CLI Config Command

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use narrate_config::{apply_all_defaults, write_config, NarrateConfig};

use crate::terminal_output::{note_error, note_info, note_warn};
use crate::{CliContext, EXIT_FAILURE, EXIT_OK};

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the effective config (file, env overrides and defaults) as YAML
    Show,
    /// Print the config file path
    Path,
    /// Check the config and report errors and warnings
    Validate,
    /// Write a config file filled with defaults
    Init {
        /// Replace an existing file (the old one is kept as a backup)
        #[arg(long)]
        force: bool,
    },
}

pub async fn run(ctx: &CliContext, action: ConfigAction) -> Result<u8> {
    match action {
        ConfigAction::Show => {
            let yaml =
                serde_yaml::to_string(&ctx.config).context("Failed to render config as YAML")?;
            print!("{yaml}");
        }
        ConfigAction::Path => println!("{}", ctx.config_path.display()),
        ConfigAction::Validate => return Ok(validate(ctx)),
        ConfigAction::Init { force } => {
            if ctx.config_path.exists() && !force {
                bail!(
                    "Config file already exists: {} (use --force to overwrite)",
                    ctx.config_path.display()
                );
            }
            write_config(&apply_all_defaults(NarrateConfig::default()), &ctx.config_path).await?;
            note_info(
                &ctx.palette,
                &format!("Wrote default config to {}", ctx.config_path.display()),
            );
        }
    }
    Ok(EXIT_OK)
}

fn validate(ctx: &CliContext) -> u8 {
    for warning in &ctx.report.warnings {
        note_warn(&ctx.palette, &warning.to_string());
    }
    for error in &ctx.report.errors {
        note_error(&ctx.palette, &error.to_string());
    }
    if ctx.report.is_valid() {
        note_info(&ctx.palette, &format!("{} is valid", ctx.config_path.display()));
        EXIT_OK
    } else {
        EXIT_FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_context;
    use narrate_config::{load_config, load_or_default};

    #[tokio::test]
    async fn init_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());

        run(&ctx, ConfigAction::Init { force: false }).await.unwrap();
        let written = load_config(&ctx.config_path).await.unwrap();
        assert_eq!(written.base_url(), "http://localhost:3000");
        assert_eq!(written.timeout_secs(), 30);

        let err = run(&ctx, ConfigAction::Init { force: false }).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert!(run(&ctx, ConfigAction::Init { force: true }).await.is_ok());
    }

    #[tokio::test]
    async fn validate_passes_for_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        assert_eq!(run(&ctx, ConfigAction::Validate).await.unwrap(), EXIT_OK);
    }

    #[tokio::test]
    async fn broken_file_still_validates_and_reinits() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = test_context(dir.path());
        tokio::fs::write(&ctx.config_path, "endpoint:\n  baseUrl: ${NARRATE_TEST_UNSET_HOST}\n")
            .await
            .unwrap();
        (ctx.config, ctx.report) = load_or_default(&ctx.config_path).await;

        assert_eq!(run(&ctx, ConfigAction::Validate).await.unwrap(), EXIT_FAILURE);
        assert_eq!(run(&ctx, ConfigAction::Path).await.unwrap(), EXIT_OK);

        run(&ctx, ConfigAction::Init { force: true }).await.unwrap();
        let (_, report) = load_or_default(&ctx.config_path).await;
        assert!(report.is_valid());
        assert!(narrate_config::backup_path(&ctx.config_path).exists());
    }
}
