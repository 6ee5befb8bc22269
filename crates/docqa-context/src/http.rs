//! Status and transport error mapping shared by every adapter

use docqa_core::{RagError, Result};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| RagError::InvalidInput(format!("failed to build HTTP client: {}", e)))
}

/// Map a non-success status to the error taxonomy
pub fn map_status(
    provider: &str,
    status: StatusCode,
    retry_after: Option<Duration>,
    body: &str,
) -> RagError {
    let message = format!("{} returned {}: {}", provider, status, truncate(body, 300));
    match status.as_u16() {
        401 | 403 => RagError::AuthenticationFailed(message),
        429 => RagError::RateLimited {
            retry_after,
            message,
        },
        500..=599 => RagError::TransientNetwork(message),
        _ => RagError::InvalidInput(message),
    }
}

/// Map a transport or decoding failure
pub fn map_transport(provider: &str, err: reqwest::Error) -> RagError {
    if err.is_decode() {
        RagError::InvalidInput(format!("{} sent a malformed response: {}", provider, err))
    } else {
        RagError::TransientNetwork(format!("{} request failed: {}", provider, err))
    }
}

/// `Retry-After` in seconds; HTTP dates are ignored
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Send `request` and decode a JSON body, mapping every failure
pub async fn send_json<T: DeserializeOwned>(provider: &str, request: RequestBuilder) -> Result<T> {
    let resp = request
        .send()
        .await
        .map_err(|e| map_transport(provider, e))?;
    let resp = check_status(provider, resp).await?;
    let body = resp
        .text()
        .await
        .map_err(|e| map_transport(provider, e))?;
    serde_json::from_str(&body).map_err(|e| {
        RagError::InvalidInput(format!("{} sent a malformed response: {}", provider, e))
    })
}

async fn check_status(provider: &str, resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let after = retry_after(resp.headers());
    let body = resp.text().await.unwrap_or_default();
    Err(map_status(provider, status, after, &body))
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
