use reply_source::ProviderMessage;
use serde::{Deserialize, Serialize};

/// Request body for one reply round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Trimmed user input.
    pub message: String,
    /// Prior alternating history, possibly empty.
    pub chat_history: Vec<ProviderMessage>,
    /// Display name, non-empty.
    pub user_name: String,
}

impl ChatRequest {
    pub fn new(
        message: impl Into<String>,
        chat_history: Vec<ProviderMessage>,
        user_name: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            chat_history,
            user_name: user_name.into(),
        }
    }
}

/// Success body returned by the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}
