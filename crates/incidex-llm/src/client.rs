//! Completion capability the extraction pipeline depends on.
//!
//! Implementations:
//! - `OllamaClient`: local Ollama server over HTTP
//! - `CannedCompletion`: fixed reply, for wiring tests and offline runs

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use incidex_core::{Error, Result};

/// Text-completion backend. Shared across concurrent requests.
///
/// Any transport failure, non-success status or malformed envelope must be
/// reported as [`Error::Backend`].
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Returns the same reply for every prompt and counts invocations.
pub struct CannedCompletion {
    reply: std::result::Result<String, String>,
    calls: AtomicUsize,
}

impl CannedCompletion {
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Every call fails with `Error::Backend(message)`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for CannedCompletion {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map_err(Error::Backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_canned_reply_counts_calls() {
        let client = CannedCompletion::reply("{}");
        assert_eq!(client.generate("a").await.unwrap(), "{}");
        assert_eq!(client.generate("b").await.unwrap(), "{}");
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn test_failing_is_backend_error() {
        let client = CannedCompletion::failing("connection refused");
        let err = client.generate("a").await.unwrap_err();
        assert!(matches!(err, Error::Backend(msg) if msg == "connection refused"));
    }
}
