//! Payload Redaction
//!
//! Collapses base64 data URIs and long base64 runs before they are logged.

use regex::Regex;
use std::sync::LazyLock;

static DATA_URI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"data:([a-zA-Z0-9.+/-]+);base64,[A-Za-z0-9+/]+=*").expect("valid data uri pattern")
});
static BASE64_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9+/]{120,}=*").expect("valid base64 pattern"));

/// Replace embedded image payloads with a short placeholder.
pub fn redact_payload(input: &str) -> String {
    let redacted = DATA_URI_RE.replace_all(input, |caps: &regex::Captures| {
        let payload_len = caps[0].len() - caps[1].len() - "data:;base64,".len();
        format!("data:{};base64,[{} chars]", &caps[1], payload_len)
    });
    BASE64_RUN_RE
        .replace_all(&redacted, "[REDACTED_BASE64]")
        .into_owned()
}
