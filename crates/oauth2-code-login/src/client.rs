//! Shared HTTP client construction for the endpoint adapters.
//!
//! Provides a reqwest client with:
//! - Request and connect timeouts from [`HttpConfig`]
//! - No redirect following (token and user-info endpoints must answer directly)
//! - No retry middleware; a failed call surfaces immediately
//!
//! Callers that want retries, tracing or other policies can build their own
//! [`ClientWithMiddleware`] and hand it to the adapters.

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};

use crate::config::HttpConfig;

/// Longest response body quoted in an error message.
const MAX_ERROR_BODY: usize = 512;

/// Build the HTTP client used by the default exchanger and resolver.
///
/// # Errors
///
/// Returns error if HTTP client initialization fails.
pub fn build_http_client(config: &HttpConfig) -> anyhow::Result<ClientWithMiddleware> {
    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    Ok(ClientBuilder::new(client).build())
}

/// Lossy UTF-8 body text, cut to a loggable length.
pub(crate) fn error_body_text(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    if trimmed.len() <= MAX_ERROR_BODY {
        return trimmed.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &trimmed[..end])
}
