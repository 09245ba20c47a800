//! Persisted light/dark theme preference.
//!
//! A single value stored as plain text in `<config dir>/theme`. It is read
//! once at startup and written whenever the user sets or toggles it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, warn};

const THEME_FILE_NAME: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Saved preference first, then the configured default, then the system.
    pub fn resolve(saved: Option<Theme>, configured: Option<Theme>, prefers_dark: bool) -> Self {
        saved.or(configured).unwrap_or(if prefers_dark { Self::Dark } else { Self::Light })
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

/// Whether the terminal reports a dark background.
///
/// Reads `COLORFGBG` (`"<fg>;<bg>"`); background colors 0-6 and 8 are dark.
pub fn system_prefers_dark() -> bool {
    std::env::var("COLORFGBG")
        .ok()
        .as_deref()
        .and_then(background_is_dark)
        .unwrap_or(false)
}

fn background_is_dark(colorfgbg: &str) -> Option<bool> {
    let bg: u8 = colorfgbg.rsplit(';').next()?.trim().parse().ok()?;
    Some(matches!(bg, 0..=6 | 8))
}

/// File-backed store for the theme preference.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(config_dir: &Path) -> Self {
        Self {
            path: config_dir.join(THEME_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The saved preference, if any. Unreadable or invalid values count as unset.
    pub async fn load(&self) -> Option<Theme> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "No saved theme preference");
                return None;
            }
        };
        match raw.parse::<Theme>() {
            Ok(theme) => Some(theme),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring invalid theme preference");
                None
            }
        }
    }

    pub async fn save(&self, theme: Theme) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }
        fs::write(&self.path, theme.as_str())
            .await
            .with_context(|| format!("Failed to write theme preference: {}", self.path.display()))?;
        debug!(path = %self.path.display(), theme = %theme, "Saved theme preference");
        Ok(())
    }

    /// Flip the effective theme and persist the result.
    pub async fn toggle(&self, current: Theme) -> Result<Theme> {
        let next = current.toggled();
        self.save(next).await?;
        Ok(next)
    }
}
