//! Minimal source-agnostic contract for producing one chat reply.
//!
//! This crate intentionally defines only the provider-format history types and
//! the single-request reply lifecycle. It excludes transport details, wire
//! envelopes, and conversation orchestration concerns.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Process-unique identifier for one reply request. Never reused.
pub type RequestId = u64;

/// Error returned while constructing/configuring a reply source before any request starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInitError {
    message: String,
}

impl SourceInitError {
    /// Creates a new source initialization error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the underlying error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SourceInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SourceInitError {}

impl From<String> for SourceInitError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for SourceInitError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Speaker of one provider-format history turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderRole {
    User,
    Assistant,
}

/// One text part of a provider-format turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPart {
    pub text: String,
}

/// Conversation context entry in the wire format expected by remote sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMessage {
    pub role: ProviderRole,
    pub content: Vec<ContentPart>,
}

impl ProviderMessage {
    /// Builds a single-part user turn.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::single(ProviderRole::User, text)
    }

    /// Builds a single-part assistant turn.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::single(ProviderRole::Assistant, text)
    }

    fn single(role: ProviderRole, text: impl Into<String>) -> Self {
        Self {
            role,
            content: vec![ContentPart { text: text.into() }],
        }
    }

    /// Returns all content parts joined in order.
    #[must_use]
    pub fn text(&self) -> String {
        self.content.iter().map(|part| part.text.as_str()).collect()
    }
}

/// Returns true when `history` starts with a user turn and alternates
/// user/assistant with no gaps. An empty history alternates trivially.
#[must_use]
pub fn has_strict_alternation(history: &[ProviderMessage]) -> bool {
    history.iter().enumerate().all(|(index, message)| {
        let expected = if index % 2 == 0 {
            ProviderRole::User
        } else {
            ProviderRole::Assistant
        };
        message.role == expected
    })
}

/// Input required to produce one reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRequest {
    pub request_id: RequestId,
    /// Trimmed user input for this turn.
    pub message: String,
    /// Prior completed turns; never includes `message` itself.
    pub chat_history: Vec<ProviderMessage>,
    pub user_name: String,
}

/// Failure while producing a reply. Every variant is recoverable by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplyError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed reply: {0}")]
    MalformedResponse(String),

    #[error("{0}")]
    Internal(String),
}

/// Immutable metadata describing a reply source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceProfile {
    pub source_id: String,
    pub endpoint: Option<String>,
}

/// Capability to produce a reply given the input text and prior context.
#[async_trait]
pub trait ReplySource: Send + Sync + 'static {
    /// Returns source identity metadata.
    fn profile(&self) -> SourceProfile;

    /// Produces exactly one reply for `request`.
    ///
    /// This is the only suspension point of a send; implementations must not
    /// retry on their own.
    async fn produce_reply(&self, request: ReplyRequest) -> Result<String, ReplyError>;
}
