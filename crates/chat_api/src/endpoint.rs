use url::Url;

use crate::error::ChatApiError;

/// Parses and validates a chat endpoint.
///
/// Rules:
/// 1) surrounding whitespace is ignored
/// 2) the URL must be absolute with an `http` or `https` scheme
/// 3) the URL must carry a host
pub fn validate_endpoint(input: &str) -> Result<Url, ChatApiError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ChatApiError::InvalidEndpoint(
            "endpoint is required".to_string(),
        ));
    }

    let url = Url::parse(trimmed)
        .map_err(|error| ChatApiError::InvalidEndpoint(format!("{trimmed}: {error}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ChatApiError::InvalidEndpoint(format!(
            "{trimmed}: unsupported scheme '{}'",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ChatApiError::InvalidEndpoint(format!(
            "{trimmed}: missing host"
        )));
    }

    Ok(url)
}
