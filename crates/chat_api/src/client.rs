use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use url::Url;

use crate::config::ChatApiConfig;
use crate::endpoint::validate_endpoint;
use crate::error::{parse_error_message, ChatApiError};
use crate::headers::build_headers;
use crate::payload::{ChatRequest, ChatResponse};

#[derive(Debug)]
pub struct ChatApiClient {
    http: Client,
    endpoint: Url,
    config: ChatApiConfig,
}

impl ChatApiClient {
    pub fn new(config: ChatApiConfig) -> Result<Self, ChatApiError> {
        let endpoint = validate_endpoint(&config.endpoint)?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ChatApiError::from)?;

        Ok(Self {
            http,
            endpoint,
            config,
        })
    }

    pub fn config(&self) -> &ChatApiConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn build_headers(&self, user_agent: Option<&str>) -> Result<HeaderMap, ChatApiError> {
        let headers = build_headers(&self.config, user_agent);
        let mut out = HeaderMap::new();
        for (key, value) in headers {
            out.insert(
                HeaderName::from_bytes(key.as_bytes())
                    .map_err(|_| ChatApiError::InvalidHeader(format!("invalid header key: {key}")))?,
                HeaderValue::from_str(&value).map_err(|_| {
                    ChatApiError::InvalidHeader(format!("invalid header value for {key}"))
                })?,
            );
        }
        Ok(out)
    }

    pub fn build_request(
        &self,
        request: &ChatRequest,
    ) -> Result<reqwest::RequestBuilder, ChatApiError> {
        let headers = self.build_headers(self.config.user_agent.as_deref())?;
        Ok(self
            .http
            .post(self.endpoint.clone())
            .headers(headers)
            .json(request))
    }

    /// Sends exactly one request and decodes the reply.
    ///
    /// Non-success statuses, transport failures, and undecodable success bodies
    /// are all returned as errors; nothing is retried.
    pub async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ChatApiError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            history_len = request.chat_history.len(),
            "sending chat request"
        );

        let response = self.build_request(request)?.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = parse_error_message(status, &body);
            tracing::warn!(%status, %message, "chat endpoint returned failure status");
            return Err(ChatApiError::Status { status, message });
        }

        decode_response(&body)
    }
}

/// Decodes a success body into a [`ChatResponse`].
pub fn decode_response(body: &str) -> Result<ChatResponse, ChatApiError> {
    serde_json::from_str::<ChatResponse>(body)
        .map_err(|error| ChatApiError::Decode(error.to_string()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn decode_response_reads_response_field() {
        let decoded = decode_response(r#"{"response":"hi there","extra":1}"#).expect("decode");
        assert_eq!(decoded.response, "hi there");
    }

    #[test]
    fn decode_response_rejects_missing_field() {
        assert_matches!(
            decode_response(r#"{"reply":"wrong key"}"#),
            Err(ChatApiError::Decode(_))
        );
    }

    #[test]
    fn decode_response_rejects_non_string_response() {
        assert_matches!(
            decode_response(r#"{"response":42}"#),
            Err(ChatApiError::Decode(_))
        );
    }

    #[test]
    fn new_rejects_invalid_endpoint_before_any_request() {
        let error = ChatApiClient::new(ChatApiConfig::new("not a url")).expect_err("invalid");
        assert_matches!(error, ChatApiError::InvalidEndpoint(_));
    }
}
