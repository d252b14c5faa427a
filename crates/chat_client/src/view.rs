//! Line-oriented projection of transcript snapshots.

use chat_sync::{DisplayMessage, TranscriptSnapshot};

pub const WAITING_LINE: &str = "… waiting for reply";
pub const CLEARED_DIVIDER: &str = "──────── conversation cleared ────────";

pub fn format_message(message: &DisplayMessage) -> String {
    format!("[{}] {}: {}", message.time, message.author, message.text)
}

/// Tracks what has been printed and emits only the new lines for each snapshot.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TranscriptView {
    printed: usize,
    resets_seen: u64,
    waiting_shown: bool,
}

impl TranscriptView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, snapshot: &TranscriptSnapshot) -> Vec<String> {
        let mut lines = Vec::new();

        if snapshot.resets != self.resets_seen || snapshot.messages.len() < self.printed {
            lines.push(CLEARED_DIVIDER.to_string());
            self.resets_seen = snapshot.resets;
            self.printed = 0;
            self.waiting_shown = false;
        }

        lines.extend(snapshot.messages[self.printed..].iter().map(format_message));
        self.printed = snapshot.messages.len();

        if snapshot.busy && !self.waiting_shown {
            lines.push(WAITING_LINE.to_string());
        }
        self.waiting_shown = snapshot.busy;

        lines
    }
}
