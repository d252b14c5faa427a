//! Single-flight dispatch state machine.
//!
//! [`Conversation`] owns the transcript and decides every mutation. It never
//! awaits anything itself: starting a reply and asking for a redraw go
//! through [`ReplyHost`], and completions come back through
//! [`Conversation::on_reply_succeeded`] / [`Conversation::on_reply_failed`].

use std::sync::Arc;

use reply_source::{ProviderMessage, ReplyError, RequestId};

use crate::clock::{Clock, SystemClock};
use crate::config::ConversationConfig;
use crate::transcript::{TranscriptSnapshot, TranscriptStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Sending { request_id: RequestId },
}

/// Everything a host needs to start one reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingReply {
    pub message: String,
    /// Provider history as it was before this turn.
    pub chat_history: Vec<ProviderMessage>,
    pub user_name: String,
}

pub trait ReplyHost {
    /// Starts producing a reply and returns the id its completion will carry.
    fn start_reply(&mut self, reply: OutgoingReply) -> Result<RequestId, String>;
    fn request_render(&mut self);
}

pub struct Conversation {
    mode: Mode,
    input: String,
    display_name: String,
    store: TranscriptStore,
    /// Trimmed input of the in-flight turn, committed to provider history on success.
    pending_user_text: Option<String>,
    config: ConversationConfig,
}

impl Conversation {
    pub fn new(config: ConversationConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: ConversationConfig, clock: Arc<dyn Clock>) -> Self {
        let store = TranscriptStore::with_clock(
            config.bot_name.clone(),
            config.welcome_text.clone(),
            clock,
        );

        Self {
            mode: Mode::Idle,
            input: String::new(),
            display_name: String::new(),
            store,
            pending_user_text: None,
            config,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.mode, Mode::Sending { .. })
    }

    pub fn config(&self) -> &ConversationConfig {
        &self.config
    }

    /// Pending input buffer. Cleared only by a submit that starts a send.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn on_input_replace(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.display_name = name.into();
    }

    /// Display name used as the author of the next user message.
    pub fn effective_user_name(&self) -> String {
        let trimmed = self.display_name.trim();
        if trimmed.is_empty() {
            self.config.default_user_name.clone()
        } else {
            trimmed.to_string()
        }
    }

    /// Number of times the conversation has been cleared.
    pub fn resets(&self) -> u64 {
        self.store.resets()
    }

    pub fn transcript(&self) -> &TranscriptStore {
        &self.store
    }

    pub fn snapshot(&self) -> TranscriptSnapshot {
        self.store.snapshot()
    }

    /// Replaces the input buffer with `text` and submits it.
    ///
    /// While a reply is in flight the buffer is left untouched.
    pub fn submit(&mut self, text: impl Into<String>, host: &mut dyn ReplyHost) {
        if self.is_busy() {
            tracing::debug!("submit ignored while a reply is in flight");
            return;
        }

        self.input = text.into();
        self.on_submit(host);
    }

    pub fn on_submit(&mut self, host: &mut dyn ReplyHost) {
        if let Mode::Sending { request_id } = self.mode {
            tracing::debug!(request_id, "submit ignored while a reply is in flight");
            return;
        }

        let prompt = self.input.trim().to_string();
        if prompt.is_empty() {
            tracing::debug!("blank submit ignored");
            return;
        }

        let author = self.effective_user_name();
        let message = self.store.compose(author.clone(), prompt.clone());
        self.store.append(message);
        self.input.clear();

        let outgoing = OutgoingReply {
            message: prompt.clone(),
            chat_history: self.store.provider_history().to_vec(),
            user_name: author,
        };

        match host.start_reply(outgoing) {
            Ok(request_id) => {
                tracing::debug!(request_id, "reply started");
                self.mode = Mode::Sending { request_id };
                self.pending_user_text = Some(prompt);
                self.store.set_busy(true);
            }
            Err(error) => {
                tracing::warn!(%error, "failed to start reply");
                self.push_failure();
            }
        }

        host.request_render();
    }

    /// Applies a successful reply. Returns false when `request_id` is stale.
    pub fn on_reply_succeeded(&mut self, request_id: RequestId, text: String) -> bool {
        if !self.is_active_request(request_id) {
            tracing::debug!(request_id, "stale reply dropped");
            return false;
        }

        if text.trim().is_empty() {
            tracing::warn!(request_id, "reply source returned blank text");
            self.finish_failed_turn();
            return true;
        }

        let Some(user_text) = self.pending_user_text.take() else {
            self.finish_failed_turn();
            return true;
        };

        let reply = self.store.compose(self.config.bot_name.clone(), text.clone());
        self.store.append(reply);
        self.store.append_provider_turn(ProviderMessage::user(user_text));
        self.store.append_provider_turn(ProviderMessage::assistant(text));
        self.finish_turn();
        tracing::debug!(request_id, "reply applied");
        true
    }

    /// Applies a failed reply. Returns false when `request_id` is stale.
    pub fn on_reply_failed(&mut self, request_id: RequestId, error: &ReplyError) -> bool {
        if !self.is_active_request(request_id) {
            tracing::debug!(request_id, %error, "stale failure dropped");
            return false;
        }

        tracing::warn!(request_id, %error, "reply failed");
        self.finish_failed_turn();
        true
    }

    /// Returns to the seeded state. Any in-flight reply becomes stale.
    pub fn clear(&mut self, host: &mut dyn ReplyHost) {
        if let Mode::Sending { request_id } = self.mode {
            tracing::debug!(request_id, "clear abandons in-flight reply");
        }

        self.mode = Mode::Idle;
        self.pending_user_text = None;
        self.store.reset();
        host.request_render();
    }

    fn is_active_request(&self, request_id: RequestId) -> bool {
        matches!(self.mode, Mode::Sending { request_id: active } if active == request_id)
    }

    fn finish_failed_turn(&mut self) {
        self.pending_user_text = None;
        self.push_failure();
        self.finish_turn();
    }

    fn finish_turn(&mut self) {
        self.mode = Mode::Idle;
        self.store.set_busy(false);
    }

    fn push_failure(&mut self) {
        let notice = self
            .store
            .compose(self.config.bot_name.clone(), self.config.failure_text.clone());
        self.store.append(notice);
    }
}
