//! Transport-only client for the remote chat reply endpoint.
//!
//! This crate owns request building, header construction, and response/error
//! parsing for one `POST` round-trip. It intentionally contains no retry
//! policy, no streaming, and no conversation state.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod headers;
pub mod payload;

pub use client::ChatApiClient;
pub use config::ChatApiConfig;
pub use endpoint::validate_endpoint;
pub use error::ChatApiError;
pub use payload::{ChatRequest, ChatResponse};
pub use reqwest::StatusCode;
