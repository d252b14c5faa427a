//! Tokio-backed host for [`Conversation`].
//!
//! Reply sources run on spawned tasks and report back through an unbounded
//! channel. Completions are applied only when the session drains that channel,
//! so every transcript mutation happens on the task that owns the session.

use std::sync::Arc;

use reply_source::{ReplyError, ReplyRequest, ReplySource, RequestId, SourceProfile};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};

use crate::clock::{Clock, SystemClock};
use crate::config::ConversationConfig;
use crate::dispatch::{Conversation, OutgoingReply, ReplyHost};
use crate::transcript::TranscriptSnapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyEvent {
    Succeeded { request_id: RequestId, text: String },
    Failed { request_id: RequestId, error: ReplyError },
}

impl ReplyEvent {
    pub fn request_id(&self) -> RequestId {
        match self {
            Self::Succeeded { request_id, .. } | Self::Failed { request_id, .. } => *request_id,
        }
    }
}

/// User intents accepted by [`ChatSession::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Submit(String),
    SetDisplayName(String),
    Clear,
    Quit,
}

pub struct ReplyRuntime {
    source: Arc<dyn ReplySource>,
    events: mpsc::UnboundedSender<ReplyEvent>,
    next_request_id: RequestId,
    render_requested: bool,
}

impl ReplyRuntime {
    pub fn new(source: Arc<dyn ReplySource>, events: mpsc::UnboundedSender<ReplyEvent>) -> Self {
        Self {
            source,
            events,
            next_request_id: 1,
            render_requested: false,
        }
    }

    pub fn profile(&self) -> SourceProfile {
        self.source.profile()
    }

    /// Returns and resets the pending render request.
    pub fn take_render_request(&mut self) -> bool {
        std::mem::take(&mut self.render_requested)
    }

    fn spawn_reply(&self, handle: &Handle, request: ReplyRequest) {
        let request_id = request.request_id;
        let source = Arc::clone(&self.source);
        let events = self.events.clone();

        handle.spawn(async move {
            let task = tokio::spawn(async move { source.produce_reply(request).await });

            let event = match task.await {
                Ok(Ok(text)) => ReplyEvent::Succeeded { request_id, text },
                Ok(Err(error)) => ReplyEvent::Failed { request_id, error },
                Err(join_error) => {
                    let error = if join_error.is_panic() {
                        "Reply source panicked"
                    } else {
                        "Reply task was cancelled"
                    };
                    ReplyEvent::Failed {
                        request_id,
                        error: ReplyError::Internal(error.to_string()),
                    }
                }
            };

            if events.send(event).is_err() {
                tracing::debug!(request_id, "session closed before reply arrived");
            }
        });
    }
}

impl ReplyHost for ReplyRuntime {
    fn start_reply(&mut self, reply: OutgoingReply) -> Result<RequestId, String> {
        let handle =
            Handle::try_current().map_err(|error| format!("Failed to start reply: {error}"))?;

        let request_id = self.next_request_id;
        self.next_request_id += 1;

        let request = ReplyRequest {
            request_id,
            message: reply.message,
            chat_history: reply.chat_history,
            user_name: reply.user_name,
        };
        self.spawn_reply(&handle, request);

        Ok(request_id)
    }

    fn request_render(&mut self) {
        self.render_requested = true;
    }
}

/// Command/query surface over one conversation.
///
/// Observers call [`ChatSession::subscribe`] and receive a fresh
/// [`TranscriptSnapshot`] after every visible change.
pub struct ChatSession {
    conversation: Conversation,
    runtime: ReplyRuntime,
    events: mpsc::UnboundedReceiver<ReplyEvent>,
    snapshots: watch::Sender<TranscriptSnapshot>,
}

impl ChatSession {
    pub fn new(source: Arc<dyn ReplySource>, config: ConversationConfig) -> Self {
        Self::with_clock(source, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        source: Arc<dyn ReplySource>,
        config: ConversationConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let conversation = Conversation::with_clock(config, clock);
        let (snapshots, _) = watch::channel(conversation.snapshot());

        tracing::debug!(source = %source.profile().source_id, "chat session created");

        Self {
            conversation,
            runtime: ReplyRuntime::new(source, events_tx),
            events: events_rx,
            snapshots,
        }
    }

    pub fn source_profile(&self) -> SourceProfile {
        self.runtime.profile()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn snapshot(&self) -> TranscriptSnapshot {
        self.conversation.snapshot()
    }

    pub fn is_busy(&self) -> bool {
        self.conversation.is_busy()
    }

    pub fn resets(&self) -> u64 {
        self.conversation.resets()
    }

    pub fn subscribe(&self) -> watch::Receiver<TranscriptSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn submit(&mut self, text: impl Into<String>) {
        self.conversation.submit(text, &mut self.runtime);
        self.publish_if_requested();
    }

    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.conversation.set_display_name(name);
    }

    pub fn clear(&mut self) {
        self.conversation.clear(&mut self.runtime);
        self.publish_if_requested();
    }

    pub fn apply_intent(&mut self, intent: Intent) {
        match intent {
            Intent::Submit(text) => self.submit(text),
            Intent::SetDisplayName(name) => self.set_display_name(name),
            Intent::Clear => self.clear(),
            Intent::Quit => {}
        }
    }

    /// Waits for the next reply event and applies it.
    ///
    /// Returns whether the event changed the transcript, or `None` when no
    /// more events can arrive.
    pub async fn next_reply_event(&mut self) -> Option<bool> {
        let event = self.events.recv().await?;
        Some(self.apply_reply_event(event))
    }

    /// Applies reply events that have already arrived, without waiting.
    ///
    /// Returns how many events were drained, stale ones included.
    pub fn flush_pending_replies(&mut self) -> usize {
        let mut drained = 0usize;

        while let Ok(event) = self.events.try_recv() {
            self.apply_reply_event(event);
            drained += 1;
        }

        drained
    }

    /// Drives the session from `intents` until `Quit` or the channel closes.
    pub async fn run(&mut self, mut intents: mpsc::UnboundedReceiver<Intent>) {
        loop {
            tokio::select! {
                intent = intents.recv() => match intent {
                    Some(Intent::Quit) | None => break,
                    Some(intent) => self.apply_intent(intent),
                },
                Some(event) = self.events.recv() => {
                    self.apply_reply_event(event);
                }
            }
        }

        tracing::debug!("chat session loop finished");
    }

    fn apply_reply_event(&mut self, event: ReplyEvent) -> bool {
        let applied = match event {
            ReplyEvent::Succeeded { request_id, text } => {
                self.conversation.on_reply_succeeded(request_id, text)
            }
            ReplyEvent::Failed { request_id, error } => {
                self.conversation.on_reply_failed(request_id, &error)
            }
        };

        if applied {
            self.publish();
        }

        applied
    }

    fn publish_if_requested(&mut self) {
        if self.runtime.take_render_request() {
            self.publish();
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.conversation.snapshot());
    }
}
