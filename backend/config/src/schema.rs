//! Narrate configuration schema.
//!
//! Every field is optional on disk; [`crate::defaults::apply_all_defaults`]
//! fills the gaps and the accessors below fall back to the same defaults.

use narrate_core::Transmission;
use serde::{Deserialize, Serialize};

use crate::defaults::{
    DEFAULT_BASE_URL, DEFAULT_LOG_JSON, DEFAULT_LOG_LEVEL, DEFAULT_NARRATE_PATH, DEFAULT_TIMEOUT_SECS,
};
use crate::theme::Theme;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration loaded from `config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrateConfig {
    /// Captioning endpoint settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<EndpointConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    /// Display preferences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui: Option<UiConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transmission: Option<Transmission>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>, // "error" | "warn" | "info" | "debug" | "trace"
    /// Directory for daily log files; console only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    /// NDJSON lines in the log files (default) or plain text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiConfig {
    /// Theme used when no preference has been saved yet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

impl NarrateConfig {
    pub fn base_url(&self) -> &str {
        self.endpoint
            .as_ref()
            .and_then(|e| e.base_url.as_deref())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn narrate_path(&self) -> &str {
        self.endpoint
            .as_ref()
            .and_then(|e| e.path.as_deref())
            .unwrap_or(DEFAULT_NARRATE_PATH)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.endpoint
            .as_ref()
            .and_then(|e| e.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn transmission(&self) -> Transmission {
        self.endpoint
            .as_ref()
            .and_then(|e| e.transmission)
            .unwrap_or_default()
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.dir.as_deref())
    }

    pub fn log_json(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.json)
            .unwrap_or(DEFAULT_LOG_JSON)
    }

    pub fn default_theme(&self) -> Option<Theme> {
        self.ui.as_ref().and_then(|u| u.theme)
    }
}
