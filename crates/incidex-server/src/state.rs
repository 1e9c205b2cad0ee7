//! Shared application state.

use std::sync::Arc;

use incidex_core::ServerConfig;
use incidex_llm::{OllamaClient, OllamaConfig};
use incidex_runtime::ExtractionPipeline;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub pipeline: ExtractionPipeline,
}

impl AppState {
    pub fn new(config: ServerConfig, pipeline: ExtractionPipeline) -> Self {
        Self { config, pipeline }
    }

    /// Wire the pipeline to an Ollama backend. The client's connection pool
    /// lives as long as the state.
    pub fn with_ollama(config: ServerConfig, backend: OllamaConfig) -> incidex_core::Result<Self> {
        let client = OllamaClient::new(backend)?;
        let pipeline = ExtractionPipeline::new(Arc::new(client));
        Ok(Self::new(config, pipeline))
    }
}
