//! Conversation synchronization core for a single-conversation chat client.
//!
//! Invariant: at most one reply is in flight per conversation, and a reply is
//! applied only while the conversation is still waiting for that exact request.
//!
//! # Public API Overview
//! - [`TranscriptStore`] keeps the display transcript and the provider-format history.
//! - [`Conversation`] is the dispatch state machine, driven through a [`ReplyHost`].
//! - [`ChatSession`] hosts a conversation on tokio and publishes [`TranscriptSnapshot`]s.
//! - Reply sources implement [`reply_source::ReplySource`].

pub mod clock;
pub mod config;
pub mod dispatch;
pub mod logging;
pub mod session;
pub mod transcript;

pub use crate::clock::{Clock, FixedClock, SystemClock};
pub use crate::config::ConversationConfig;
pub use crate::dispatch::{Conversation, Mode, OutgoingReply, ReplyHost};
pub use crate::session::{ChatSession, Intent, ReplyEvent, ReplyRuntime};
pub use crate::transcript::{
    DisplayMessage, MessageId, TranscriptSnapshot, TranscriptStore, SEED_MESSAGE_ID,
};

pub use reply_source::{ProviderMessage, ProviderRole, ReplyError, RequestId};
