//! Access to the remote text-completion service.
//! Chat and translation both go through the `Completion` trait so they can be
//! exercised without network access.

pub mod cache;
pub mod client;
pub mod split;

use async_trait::async_trait;
use serde::Serialize;

pub use client::ChatCompletionsClient;
pub use split::{split_reply, SplitReply};

/// Sampling settings for one feature (chat replies, translations).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sampling {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A two-message prompt (system + user).
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub sampling: Sampling,
}

/// Text-completion backend.
#[async_trait]
pub trait Completion: Send + Sync {
    /// Return the text of the first completion.
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("completion request timed out")]
    Timeout,
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed completion response: {0}")]
    Malformed(String),
    #[error("no completion credential configured")]
    MissingCredential,
}
