//! Config validation: checks with user-friendly error messages.

use crate::schema::NarrateConfig;
use thiserror::Error;

/// Timeouts above this only draw a warning.
const LONG_TIMEOUT_SECS: u64 = 300;

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace", "off"];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &NarrateConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_endpoint(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_endpoint(config: &NarrateConfig, report: &mut ValidationReport) {
    let Some(endpoint) = &config.endpoint else { return };

    if let Some(problem) = endpoint.base_url.as_deref().and_then(check_base_url) {
        report.error("endpoint.baseUrl", problem);
    }

    if let Some(path) = &endpoint.path {
        if !path.starts_with('/') {
            report.error("endpoint.path", "Path must start with '/'");
        }
    }

    match endpoint.timeout_secs {
        Some(0) => report.error("endpoint.timeoutSecs", "Timeout must be greater than 0"),
        Some(secs) if secs > LONG_TIMEOUT_SECS => report.warn(
            "endpoint.timeoutSecs",
            format!("Timeout of {secs}s is unusually long; a stuck request blocks the result"),
        ),
        _ => {}
    }
}

/// What is wrong with `base_url`, if anything.
///
/// Shared by the config file check and command-line overrides.
pub fn check_base_url(base_url: &str) -> Option<&'static str> {
    let base_url = base_url.trim();
    if base_url.is_empty() {
        Some("Base URL cannot be empty")
    } else if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        Some("Base URL must start with http:// or https://")
    } else {
        None
    }
}

fn validate_logging(config: &NarrateConfig, report: &mut ValidationReport) {
    let Some(level) = config.logging.as_ref().and_then(|l| l.level.as_deref()) else {
        return;
    };
    // Full filter directives (`narrate=debug,reqwest=warn`) are left to EnvFilter.
    if level.contains('=') || level.contains(',') {
        return;
    }
    if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        report.warn("logging.level", format!("Unknown log level '{level}'"));
    }
}
