//! Incidex LLM — the completion backend behind the extraction pipeline.
//!
//! The pipeline depends only on the `CompletionClient` trait. `OllamaClient`
//! talks to a local Ollama server; `CannedCompletion` returns a fixed reply.

pub mod client;
pub mod config;
pub mod ollama;
pub mod types;

pub use client::{CannedCompletion, CompletionClient};
pub use config::OllamaConfig;
pub use ollama::OllamaClient;
