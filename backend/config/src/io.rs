//! Config file read/write with atomic backup rotation.

use crate::schema::NarrateConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the narrate config directory.
/// Priority: `NARRATE_CONFIG_DIR` env > `~/.narrate/` > `./.narrate`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("NARRATE_CONFIG_DIR") {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    match dirs::home_dir() {
        Some(home) => home.join(".narrate"),
        None => PathBuf::from(".narrate"),
    }
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Load and parse the config from disk.
///
/// Returns `Ok(Default::default())` if the file doesn't exist (first run).
pub async fn load_config(path: &Path) -> Result<NarrateConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(NarrateConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    if raw.trim().is_empty() {
        return Ok(NarrateConfig::default());
    }

    let config: NarrateConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Write `config` to `path` through a temp file and a rename.
///
/// An existing file is copied to `config.yaml.bak` first; only the latest
/// previous version is kept.
pub async fn write_config(config: &NarrateConfig, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.with_context(|| {
            format!("Failed to create config directory: {}", parent.display())
        })?;
    }

    if path.exists() {
        let backup = backup_path(path);
        if let Err(e) = fs::copy(path, &backup).await {
            warn!(path = %backup.display(), error = %e, "Could not back up previous config");
        }
    }

    let tmp_path = path.with_extension("yaml.tmp");
    fs::write(&tmp_path, yaml.as_bytes())
        .await
        .with_context(|| format!("Failed to write temp config: {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("Failed to move config into place: {}", path.display()))?;

    info!(path = %path.display(), "Wrote config");
    Ok(())
}

/// Where [`write_config`] keeps the previous version of `path`.
pub fn backup_path(path: &Path) -> PathBuf {
    path.with_extension("yaml.bak")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EndpointConfig;

    #[tokio::test]
    async fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&config_file_path(dir.path())).await.unwrap();
        assert_eq!(cfg, NarrateConfig::default());
    }

    #[tokio::test]
    async fn write_then_load_keeps_values_and_backs_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(&dir.path().join("nested"));

        let mut cfg = NarrateConfig {
            endpoint: Some(EndpointConfig {
                base_url: Some("https://caption.example".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        write_config(&cfg, &path).await.unwrap();

        cfg.endpoint.as_mut().unwrap().timeout_secs = Some(12);
        write_config(&cfg, &path).await.unwrap();

        let loaded = load_config(&path).await.unwrap();
        assert_eq!(loaded, cfg);
        let backup = load_config(&backup_path(&path)).await.unwrap();
        assert_eq!(backup.timeout_secs(), 30);
        assert_eq!(backup.base_url(), "https://caption.example");
        assert!(!path.with_extension("yaml.tmp").exists());
    }

    #[tokio::test]
    async fn malformed_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        tokio::fs::write(&path, "endpoint: [unclosed").await.unwrap();
        let err = load_config(&path).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config YAML"));
    }
}
