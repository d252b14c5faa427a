//! Remote-endpoint implementation of the shared `reply_source` contract.
//!
//! This adapter translates one `chat_api` round-trip into the single
//! `Result<String, ReplyError>` outcome expected by the dispatch controller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chat_api::{ChatApiClient, ChatApiConfig, ChatApiError, ChatRequest, ChatResponse};
use reply_source::{ReplyError, ReplyRequest, ReplySource, SourceInitError, SourceProfile};

/// Stable source identifier used by startup selection.
pub const REMOTE_SOURCE_ID: &str = "remote";

/// Runtime configuration for the remote reply source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteReplySourceConfig {
    pub endpoint: String,
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

impl RemoteReplySourceConfig {
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: None,
            user_agent: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    fn into_chat_api_config(self) -> ChatApiConfig {
        let mut config = ChatApiConfig::new(self.endpoint);

        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }

        if let Some(user_agent) = self.user_agent {
            config = config.with_user_agent(user_agent);
        }

        config
    }
}

#[async_trait]
trait ChatTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ChatApiError>;
}

#[derive(Debug)]
struct DefaultChatTransport {
    client: ChatApiClient,
}

#[async_trait]
impl ChatTransport for DefaultChatTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ChatApiError> {
        self.client.send(request).await
    }
}

/// `ReplySource` adapter backed by `chat_api` transport primitives.
pub struct RemoteReplySource {
    endpoint: String,
    transport: Arc<dyn ChatTransport>,
}

impl RemoteReplySource {
    /// Creates a source using real HTTP transport.
    pub fn new(config: RemoteReplySourceConfig) -> Result<Self, SourceInitError> {
        let client = ChatApiClient::new(config.into_chat_api_config()).map_err(map_init_error)?;
        let endpoint = client.endpoint().to_string();

        Ok(Self {
            endpoint,
            transport: Arc::new(DefaultChatTransport { client }),
        })
    }

    #[cfg(test)]
    fn with_transport_for_tests(endpoint: &str, transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            transport,
        }
    }
}

#[async_trait]
impl ReplySource for RemoteReplySource {
    fn profile(&self) -> SourceProfile {
        SourceProfile {
            source_id: REMOTE_SOURCE_ID.to_string(),
            endpoint: Some(self.endpoint.clone()),
        }
    }

    async fn produce_reply(&self, request: ReplyRequest) -> Result<String, ReplyError> {
        let request_id = request.request_id;
        let body = ChatRequest::new(request.message, request.chat_history, request.user_name);

        match self.transport.send(&body).await {
            Ok(response) => Ok(response.response),
            Err(error) => {
                tracing::warn!(request_id, %error, "remote reply request failed");
                Err(map_reply_error(error))
            }
        }
    }
}

fn map_reply_error(error: ChatApiError) -> ReplyError {
    match error {
        ChatApiError::Status { status, message } => ReplyError::Status {
            status: status.as_u16(),
            message,
        },
        ChatApiError::Decode(message) => ReplyError::MalformedResponse(message),
        other => ReplyError::Transport(other.to_string()),
    }
}

fn map_init_error(error: ChatApiError) -> SourceInitError {
    SourceInitError::new(format!("Failed to initialize remote reply source: {error}"))
}
