//! `narrate-config` — configuration for the narrate client.
//!
//! Provides:
//! - Typed config schema (endpoint, logging, display)
//! - YAML read/write with atomic backup rotation
//! - `${ENV_VAR}` substitution
//! - Default value application
//! - Validation with errors and warnings
//! - The persisted theme preference

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod theme;
pub mod validation;

// Re-export most-used types at crate root.
pub use defaults::apply_all_defaults;
pub use env::{resolve_env_vars_with, MissingEnvVarError};
pub use io::{backup_path, config_dir, config_file_path, load_config, write_config};
pub use schema::{EndpointConfig, LoggingConfig, NarrateConfig, UiConfig};
pub use theme::{system_prefers_dark, Theme, ThemeStore};
pub use validation::{check_base_url, validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use narrate_core::Transmission;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Load, substitute env vars, apply env overrides and defaults, then validate.
///
/// This is the main entry point for loading a config at runtime. The report
/// is returned rather than logged so callers can set up logging from the
/// loaded config first and decide whether errors are fatal.
pub async fn load_and_prepare(path: &Path) -> Result<(NarrateConfig, ValidationReport)> {
    let raw_config = load_config(path).await?;
    let env: HashMap<String, String> = std::env::vars().collect();
    prepare(raw_config, &env)
}

/// Like [`load_and_prepare`], but never fails.
///
/// A file that cannot be read, parsed or substituted is replaced by the
/// defaults, and the failure is recorded as an error on the report so that
/// commands needing a working endpoint can refuse to run.
pub async fn load_or_default(path: &Path) -> (NarrateConfig, ValidationReport) {
    match load_and_prepare(path).await {
        Ok(loaded) => loaded,
        Err(e) => {
            let config = apply_all_defaults(NarrateConfig::default());
            let mut report = validate(&config);
            report.errors.push(ConfigValidationError {
                path: path.display().to_string(),
                message: format!("{e:#}"),
            });
            (config, report)
        }
    }
}

/// The pure part of [`load_and_prepare`], with an explicit environment.
pub fn prepare(
    raw: NarrateConfig,
    env: &HashMap<String, String>,
) -> Result<(NarrateConfig, ValidationReport)> {
    let value: Value =
        serde_json::to_value(&raw).context("Failed to serialize config for processing")?;
    let value = resolve_env_vars_with(&value, env).context("Failed to resolve env vars in config")?;
    let config: NarrateConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_env_overrides(config, env)?;
    let config = apply_all_defaults(config);
    let report = validate(&config);
    Ok((config, report))
}

/// `NARRATE_BASE_URL`, `NARRATE_TRANSMISSION` and `RUST_LOG` win over the file.
fn apply_env_overrides(
    mut config: NarrateConfig,
    env: &HashMap<String, String>,
) -> Result<NarrateConfig> {
    let non_empty = |key: &str| env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

    if let Some(base_url) = non_empty("NARRATE_BASE_URL") {
        config.endpoint.get_or_insert_with(Default::default).base_url = Some(base_url.to_string());
    }
    if let Some(raw) = non_empty("NARRATE_TRANSMISSION") {
        let transmission: Transmission = raw
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .context("Invalid NARRATE_TRANSMISSION")?;
        config.endpoint.get_or_insert_with(Default::default).transmission = Some(transmission);
    }
    if let Some(level) = non_empty("RUST_LOG") {
        config.logging.get_or_insert_with(Default::default).level = Some(level.to_string());
    }
    Ok(config)
}
