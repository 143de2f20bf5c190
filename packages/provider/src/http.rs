//! Shared GET → JSON helper for provider adapters.
//!
//! Adapters call [`get_json`] instead of `reqwest::RequestBuilder::send()`
//! directly so that every request carries the service timeout and every
//! non-2xx answer becomes a [`ProviderError::Status`]. Failed calls are
//! not retried here; repeating a search is the caller's decision.

use std::time::Duration;

use food_map_poi_models::ProviderId;

use crate::ProviderError;

/// Maximum length of the response body preview included in error logs.
const BODY_PREVIEW_LEN: usize = 300;

/// Sends a GET request with `params` and parses the body as JSON.
///
/// # Errors
///
/// Returns [`ProviderError::Http`] if the request fails or times out,
/// [`ProviderError::Status`] for a non-2xx HTTP status, and
/// [`ProviderError::Parse`] if the body is not JSON.
pub async fn get_json(
    client: &reqwest::Client,
    provider: ProviderId,
    url: &str,
    params: &[(&str, String)],
    timeout: Duration,
) -> Result<serde_json::Value, ProviderError> {
    log::debug!("{provider}: GET {url}");

    let response = client
        .get(url)
        .query(params)
        .timeout(timeout)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Status {
            provider,
            code: status.as_u16().to_string(),
            message: status
                .canonical_reason()
                .unwrap_or("unexpected HTTP status")
                .to_string(),
        });
    }

    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        let preview: String = text.chars().take(BODY_PREVIEW_LEN).collect();
        log::warn!("{provider}: response is not JSON: {e}\n  body: {preview}");
        ProviderError::Parse {
            provider,
            message: format!("response is not JSON: {e}"),
        }
    })
}
