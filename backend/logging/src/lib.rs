//! Structured logging for narrate.
//!
//! Console output for people, optional rolling NDJSON files for machines,
//! and redaction so image payloads never end up in a log line whole.

pub mod logger;
pub mod redact;

pub use logger::{init_logger, LogOptions};
pub use redact::redact_payload;
