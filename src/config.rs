//! Environment configuration.

use std::env;

pub const BOT_NAME_ENV_VAR: &str = "CHAT_SYNC_BOT_NAME";
pub const DEFAULT_USER_NAME_ENV_VAR: &str = "CHAT_SYNC_DEFAULT_USER_NAME";
pub const WELCOME_TEXT_ENV_VAR: &str = "CHAT_SYNC_WELCOME_TEXT";
pub const FAILURE_TEXT_ENV_VAR: &str = "CHAT_SYNC_FAILURE_TEXT";

pub const DEFAULT_BOT_NAME: &str = "Bot";
pub const DEFAULT_USER_NAME: &str = "You";
pub const DEFAULT_WELCOME_TEXT: &str = "ようこそ！簡単なチャットです。";
pub const DEFAULT_FAILURE_TEXT: &str = "返信を取得できませんでした。もう一度お試しください。";

/// Fixed texts and identities used by the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationConfig {
    /// Author of the seed message, replies, and failure notices.
    pub bot_name: String,
    /// Author used when the display name is blank.
    pub default_user_name: String,
    pub welcome_text: String,
    pub failure_text: String,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            bot_name: DEFAULT_BOT_NAME.to_string(),
            default_user_name: DEFAULT_USER_NAME.to_string(),
            welcome_text: DEFAULT_WELCOME_TEXT.to_string(),
            failure_text: DEFAULT_FAILURE_TEXT.to_string(),
        }
    }
}

impl ConversationConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            bot_name: env_string_opt(BOT_NAME_ENV_VAR).unwrap_or(defaults.bot_name),
            default_user_name: env_string_opt(DEFAULT_USER_NAME_ENV_VAR)
                .unwrap_or(defaults.default_user_name),
            welcome_text: env_string_opt(WELCOME_TEXT_ENV_VAR).unwrap_or(defaults.welcome_text),
            failure_text: env_string_opt(FAILURE_TEXT_ENV_VAR).unwrap_or(defaults.failure_text),
        }
    }
}

/// Returns the trimmed value of `key`, treating blank values as unset.
pub fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
