//! Timestamp source for display messages.

use time::macros::format_description;
use time::OffsetDateTime;

/// Produces the human-readable time label attached to each display message.
pub trait Clock: Send + Sync {
    fn timestamp(&self) -> String;
}

/// Wall clock in the local offset, falling back to UTC when the offset is unknown.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn timestamp(&self) -> String {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        format_time_label(now)
    }
}

/// Clock that always returns the same label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedClock {
    label: String,
}

impl FixedClock {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Clock for FixedClock {
    fn timestamp(&self) -> String {
        self.label.clone()
    }
}

/// Formats `moment` as `HH:MM:SS`.
pub fn format_time_label(moment: OffsetDateTime) -> String {
    moment
        .format(format_description!("[hour]:[minute]:[second]"))
        .unwrap_or_else(|_| {
            format!(
                "{:02}:{:02}:{:02}",
                moment.hour(),
                moment.minute(),
                moment.second()
            )
        })
}
