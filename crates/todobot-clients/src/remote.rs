//! Shared request plumbing for the collaborator clients.

use reqwest::Response;
use serde::de::DeserializeOwned;
use todobot_core::{BotError, Result};

/// Bot-identity header recognized by the collaborator services. The clients
/// attach it; the services perform the actual authorization check.
pub(crate) const BOT_ACCESS_HEADER: &str = "X-Bot-Access";
pub(crate) const BOT_ACCESS_VALUE: &str = "true";

/// Maps a transport-level failure (connect error, timeout) to a remote
/// failure with no status.
pub(crate) fn transport_error(err: reqwest::Error) -> BotError {
    BotError::unreachable(format!("request failed: {err}"))
}

/// Checks the response status, turning error statuses into
/// [`BotError::Remote`] carrying the response body.
pub(crate) async fn checked(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "failed to read error body".to_string());
    tracing::warn!(status = status.as_u16(), %body, "collaborator returned an error");
    Err(BotError::remote(status.as_u16(), body))
}

/// Decodes a successful response body, treating malformed payloads as a
/// remote failure as well.
pub(crate) async fn decoded<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let response = checked(response).await?;
    response
        .json()
        .await
        .map_err(|err| BotError::remote(status.as_u16(), format!("invalid response body: {err}")))
}

/// Strips a trailing slash so joined paths stay well-formed.
pub(crate) fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
