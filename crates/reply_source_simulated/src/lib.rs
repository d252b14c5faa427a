//! Deterministic simulated implementation of the shared `reply_source` contract.
//!
//! This crate contains no transport logic and is intended for local sessions
//! and contract-level testing of the dispatch lifecycle.

use std::time::Duration;

use async_trait::async_trait;
use reply_source::{ReplyError, ReplyRequest, ReplySource, SourceProfile};

/// Stable source identifier used for explicit startup selection.
pub const SIMULATED_SOURCE_ID: &str = "simulated";

/// Delay before the simulated reply resolves.
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(700);

/// Prefix placed before the quoted input.
pub const DEFAULT_REPLY_PREFIX: &str = "受け取りました: ";

/// Echoing reply source that resolves after a fixed delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedReplySource {
    delay: Duration,
    prefix: String,
}

impl SimulatedReplySource {
    #[must_use]
    pub fn new() -> Self {
        Self {
            delay: DEFAULT_REPLY_DELAY,
            prefix: DEFAULT_REPLY_PREFIX.to_string(),
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn with_template(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns the reply produced for `input`, without waiting.
    #[must_use]
    pub fn echo(&self, input: &str) -> String {
        format!("{}\"{}\"", self.prefix, input.trim())
    }
}

impl Default for SimulatedReplySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReplySource for SimulatedReplySource {
    fn profile(&self) -> SourceProfile {
        SourceProfile {
            source_id: SIMULATED_SOURCE_ID.to_string(),
            endpoint: None,
        }
    }

    async fn produce_reply(&self, request: ReplyRequest) -> Result<String, ReplyError> {
        let _ = request.chat_history;
        let _ = request.user_name;

        tracing::debug!(
            request_id = request.request_id,
            delay_ms = self.delay.as_millis() as u64,
            "simulated reply scheduled"
        );
        tokio::time::sleep(self.delay).await;

        Ok(self.echo(&request.message))
    }
}
