//! Shared HTTP plumbing: client construction and failure classification.

use nerkh_core::FetchError;
use reqwest::{Client, Url};

use crate::config::ProviderConfig;
use crate::error::Result;

/// Build the client every shape uses; the timeout bounds each whole request
pub(crate) fn build_client(config: &ProviderConfig) -> Result<Client> {
    let client = Client::builder()
        .timeout(config.timeout)
        .connect_timeout(config.timeout)
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(client)
}

/// GET `url` and return the body.
///
/// Timeouts, connection failures, non-success statuses and blank bodies are
/// all `Unavailable`.
pub(crate) async fn get_body(client: &Client, url: Url) -> std::result::Result<String, FetchError> {
    let target = redacted(&url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| unavailable(&target, e))?;

    let response = response
        .error_for_status()
        .map_err(|e| unavailable(&target, e))?;

    let body = response
        .text()
        .await
        .map_err(|e| unavailable(&target, e))?;

    if body.trim().is_empty() {
        return Err(FetchError::unavailable(format!("{target}: empty body")));
    }

    Ok(body)
}

fn unavailable(target: &str, e: reqwest::Error) -> FetchError {
    let reason = if e.is_timeout() {
        "timed out".to_string()
    } else if e.is_connect() {
        "connection failed".to_string()
    } else if let Some(status) = e.status() {
        format!("status {status}")
    } else {
        e.without_url().to_string()
    };
    FetchError::unavailable(format!("{target}: {reason}"))
}

/// Host and path only, so tokens in the query never reach logs
fn redacted(url: &Url) -> String {
    format!("{}{}", url.host_str().unwrap_or_default(), url.path())
}
