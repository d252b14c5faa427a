//! Terminal front end for the `chat_sync` conversation core.
//!
//! ## Reply source selection
//!
//! - `CHAT_CLIENT_REPLY_SOURCE=simulated` (default) echoes input after a short delay.
//! - `CHAT_CLIENT_REPLY_SOURCE=remote` posts each turn to `CHAT_CLIENT_ENDPOINT`.
//!   `CHAT_CLIENT_TIMEOUT_SEC` optionally bounds each request and must be > 0.
//!
//! `CHAT_CLIENT_DISPLAY_NAME` sets the initial display name; `/name` changes it.
//! Startup errors are reported and never panic.

pub mod commands;
pub mod config;
pub mod sources;
pub mod view;
