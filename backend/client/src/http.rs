//! `reqwest` transport — one POST per invocation to `<base>/api/narrate`.

use std::error::Error as _;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use narrate_core::{NarrateError, NarrateTransport, RequestBody, ServerReply, NARRATE_PATH};
use narrate_logging::redact_payload;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, info};

/// Connection settings for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransportOptions {
    pub base_url: String,
    pub path: String,
    pub timeout: Duration,
}

impl Default for HttpTransportOptions {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            path: NARRATE_PATH.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Posts encoded files to a captioning endpoint.
///
/// No retries: a failed send is reported once as a transport error.
pub struct HttpTransport {
    client: Client,
    url: String,
}

impl HttpTransport {
    pub fn new(options: HttpTransportOptions) -> Result<Self> {
        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(concat!("narrate/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        let url = endpoint_url(&options.base_url, &options.path);
        info!(url = %url, timeout_secs = options.timeout.as_secs(), "HttpTransport: endpoint");
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl NarrateTransport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn post(&self, body: RequestBody) -> Result<ServerReply, NarrateError> {
        debug!(url = %self.url, content_type = %body.content_type, bytes = body.bytes.len(), "POST narrate");

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, body.content_type)
            .body(body.bytes)
            .send()
            .await
            .map_err(|e| NarrateError::Transport(describe_transport_error(&e)))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| NarrateError::Transport(describe_transport_error(&e)))?;

        if !status.is_success() {
            debug!(
                status = status.as_u16(),
                body = %redact_payload(&String::from_utf8_lossy(&body)),
                "Narrate endpoint returned an error status"
            );
        }

        Ok(ServerReply {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            content_type,
            body,
        })
    }
}

/// Join a base URL and an endpoint path with exactly one slash between them.
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim().trim_start_matches('/');
    format!("{base}/{path}")
}

/// `reqwest` errors hide the useful part in their source chain.
fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        return "Request timed out".to_string();
    }

    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_without_double_slash() {
        assert_eq!(
            endpoint_url("http://localhost:3000/", "/api/narrate"),
            "http://localhost:3000/api/narrate"
        );
        assert_eq!(
            endpoint_url("https://caption.example", "api/narrate"),
            "https://caption.example/api/narrate"
        );
    }

    #[test]
    fn builds_with_default_options() {
        let transport = HttpTransport::new(HttpTransportOptions::default()).unwrap();
        assert_eq!(transport.url(), "http://localhost:3000/api/narrate");
        assert_eq!(transport.name(), "http");
    }
}
