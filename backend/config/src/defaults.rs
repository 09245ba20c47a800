//! Config defaults: applies sensible default values to parsed config.

use narrate_core::{Transmission, NARRATE_PATH};

use crate::schema::{EndpointConfig, LoggingConfig, NarrateConfig};

/// Default captioning server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default endpoint path.
pub const DEFAULT_NARRATE_PATH: &str = NARRATE_PATH;

/// Default request timeout (seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log files are NDJSON unless turned off.
pub const DEFAULT_LOG_JSON: bool = true;

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: NarrateConfig) -> NarrateConfig {
    let config = apply_endpoint_defaults(config);
    apply_logging_defaults(config)
}

/// Fill endpoint URL, path, timeout and transmission strategy.
fn apply_endpoint_defaults(mut config: NarrateConfig) -> NarrateConfig {
    let endpoint = config.endpoint.get_or_insert_with(EndpointConfig::default);
    if endpoint.base_url.is_none() {
        endpoint.base_url = Some(DEFAULT_BASE_URL.to_string());
    }
    if endpoint.path.is_none() {
        endpoint.path = Some(DEFAULT_NARRATE_PATH.to_string());
    }
    if endpoint.timeout_secs.is_none() {
        endpoint.timeout_secs = Some(DEFAULT_TIMEOUT_SECS);
    }
    if endpoint.transmission.is_none() {
        endpoint.transmission = Some(Transmission::default());
    }
    config
}

/// Default log level and file format.
fn apply_logging_defaults(mut config: NarrateConfig) -> NarrateConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    if logging.json.is_none() {
        logging.json = Some(DEFAULT_LOG_JSON);
    }
    config
}
