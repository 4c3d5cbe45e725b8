use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::RelayAiError;

pub(crate) fn bearer_headers(api_key: Option<&str>) -> Result<HeaderMap, RelayAiError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(key) = api_key.map(str::trim).filter(|key| !key.is_empty()) {
        let bearer = format!("Bearer {key}");
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&bearer)
                .map_err(|e| RelayAiError::InvalidConfig(format!("invalid API key header: {e}")))?,
        );
    }
    Ok(headers)
}

pub(crate) fn build_http_client(
    headers: HeaderMap,
    request_timeout_ms: u64,
) -> Result<reqwest::Client, RelayAiError> {
    let client = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_millis(request_timeout_ms.max(1)))
        .build()?;
    Ok(client)
}

/// Reads the body of a successful response, or logs and returns the failure.
pub(crate) async fn read_success_body(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<String, RelayAiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.text().await?);
    }

    let headers = response.headers().clone();
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(
        provider,
        status = status.as_u16(),
        headers = ?headers,
        body = %body,
        "completion provider returned non-success status"
    );
    Err(RelayAiError::HttpStatus {
        status: status.as_u16(),
        body,
    })
}

pub(crate) fn non_empty_reply(text: Option<String>) -> Result<String, RelayAiError> {
    match text {
        Some(text) if !text.trim().is_empty() => Ok(text),
        Some(_) => Err(RelayAiError::InvalidResponse(
            "response text was empty".to_string(),
        )),
        None => Err(RelayAiError::InvalidResponse(
            "response contained no text content".to_string(),
        )),
    }
}
