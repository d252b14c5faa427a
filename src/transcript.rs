//! Transcript store: the ordered display transcript plus the parallel
//! provider-format history used as reply context.
//!
//! The store never decides *what* to append. Id uniqueness and the
//! user/assistant alternation of the provider history are the caller's
//! responsibility; the store only keeps both sequences ordered and
//! resettable to the seeded state.

use std::sync::Arc;

use reply_source::ProviderMessage;

use crate::clock::{Clock, SystemClock};

/// Monotonic display message identifier. Never reused within a session.
pub type MessageId = u64;

/// Id carried by the seed message after every reset.
pub const SEED_MESSAGE_ID: MessageId = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMessage {
    pub id: MessageId,
    pub author: String,
    pub text: String,
    pub time: String,
}

/// Read-only view handed to the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptSnapshot {
    pub messages: Vec<DisplayMessage>,
    pub provider_history: Vec<ProviderMessage>,
    pub busy: bool,
    /// Number of resets so far. Changes whenever the transcript restarts from the seed.
    pub resets: u64,
}

impl TranscriptSnapshot {
    /// Returns true when only the seed message is present.
    pub fn is_seeded_only(&self) -> bool {
        self.messages.len() == 1 && self.messages[0].id == SEED_MESSAGE_ID
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SeedMessage {
    author: String,
    text: String,
}

pub struct TranscriptStore {
    messages: Vec<DisplayMessage>,
    provider_history: Vec<ProviderMessage>,
    next_id: MessageId,
    busy: bool,
    resets: u64,
    seed: SeedMessage,
    clock: Arc<dyn Clock>,
}

impl TranscriptStore {
    /// Creates a store seeded with one welcome message.
    pub fn new(seed_author: impl Into<String>, seed_text: impl Into<String>) -> Self {
        Self::with_clock(seed_author, seed_text, Arc::new(SystemClock))
    }

    pub fn with_clock(
        seed_author: impl Into<String>,
        seed_text: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut store = Self {
            messages: Vec::new(),
            provider_history: Vec::new(),
            next_id: SEED_MESSAGE_ID,
            busy: false,
            resets: 0,
            seed: SeedMessage {
                author: seed_author.into(),
                text: seed_text.into(),
            },
            clock,
        };
        store.insert_seed();
        store
    }

    /// Builds a message with the next id and the current time without appending it.
    pub fn compose(&mut self, author: impl Into<String>, text: impl Into<String>) -> DisplayMessage {
        let id = self.next_id;
        self.next_id += 1;

        DisplayMessage {
            id,
            author: author.into(),
            text: text.into(),
            time: self.clock.timestamp(),
        }
    }

    /// Inserts `message` at the tail of the display transcript.
    pub fn append(&mut self, message: DisplayMessage) {
        self.messages.push(message);
    }

    /// Inserts `turn` at the tail of the provider-format history.
    pub fn append_provider_turn(&mut self, turn: ProviderMessage) {
        self.provider_history.push(turn);
    }

    /// Truncates both sequences, re-inserts the seed message, and restarts ids.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.provider_history.clear();
        self.next_id = SEED_MESSAGE_ID;
        self.busy = false;
        self.resets += 1;
        self.insert_seed();
    }

    pub fn snapshot(&self) -> TranscriptSnapshot {
        TranscriptSnapshot {
            messages: self.messages.clone(),
            provider_history: self.provider_history.clone(),
            busy: self.busy,
            resets: self.resets,
        }
    }

    pub fn messages(&self) -> &[DisplayMessage] {
        &self.messages
    }

    pub fn provider_history(&self) -> &[ProviderMessage] {
        &self.provider_history
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn resets(&self) -> u64 {
        self.resets
    }

    /// Id the next composed message will receive.
    pub fn next_id(&self) -> MessageId {
        self.next_id
    }

    pub(crate) fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    fn insert_seed(&mut self) {
        let seed = self.compose(self.seed.author.clone(), self.seed.text.clone());
        self.messages.push(seed);
    }
}
